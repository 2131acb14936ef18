use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use serde::Deserialize;
use serde::Serialize;

use crate::KmpkitResult;
use crate::segments::PathSegments;
use crate::walk::collect_dirs;

/// Ordering policy for folder matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FolderOrder {
	/// Shallowest first, and any match nested inside an earlier match is
	/// dropped. Use when matched folders move as whole units: the parent moves
	/// before its children could change path underneath it.
	#[default]
	TopmostFirst,
	/// Deepest first with every match kept, for bottom-up relocation of each
	/// matching folder individually.
	DeepestFirst,
}

/// A directory discovered during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
	/// Absolute (root-joined) path of the directory.
	pub path: PathBuf,
	/// Segments relative to the scanned root.
	pub relative: PathSegments,
	pub is_directory: bool,
}

/// Find every directory below `root` whose relative path contains `fragment`
/// as a contiguous run of segments, ordered by `order`.
///
/// No match is not an error; the result is simply empty.
pub fn find_folders_with_path(
	root: &Path,
	fragment: &PathSegments,
	order: FolderOrder,
	exclude: &Gitignore,
) -> KmpkitResult<Vec<DirectoryEntry>> {
	if fragment.is_empty() {
		return Ok(Vec::new());
	}

	let mut matches: Vec<DirectoryEntry> = collect_dirs(root, exclude)?
		.into_iter()
		.filter_map(|path| {
			let relative = PathSegments::relative(root, &path)?;
			relative.contains_run(fragment).then_some(DirectoryEntry {
				path,
				relative,
				is_directory: true,
			})
		})
		.collect();

	Ok(match order {
		FolderOrder::TopmostFirst => {
			matches.sort_by(|a, b| {
				a.relative
					.len()
					.cmp(&b.relative.len())
					.then_with(|| a.relative.cmp(&b.relative))
			});
			let mut kept: Vec<DirectoryEntry> = Vec::new();
			for entry in matches {
				if kept
					.iter()
					.any(|parent| entry.relative.is_descendant_of(&parent.relative))
				{
					continue;
				}
				kept.push(entry);
			}
			kept
		}
		FolderOrder::DeepestFirst => {
			matches.sort_by(|a, b| {
				b.relative
					.len()
					.cmp(&a.relative.len())
					.then_with(|| a.relative.cmp(&b.relative))
			});
			matches
		}
	})
}
