use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::KmpkitError;
use crate::KmpkitResult;

/// Build a `Gitignore` matcher from exclude patterns. These follow
/// `.gitignore` syntax and are evaluated relative to `root`.
pub fn build_exclude_matcher(root: &Path, patterns: &[String]) -> KmpkitResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			KmpkitError::InvalidPattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
	}
	builder.build().map_err(|e| {
		KmpkitError::InvalidPattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Which entries a walk reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collect {
	Directories,
	Files,
}

/// Every directory below `root` (excluding `root` itself), in depth-first
/// order with siblings sorted by name.
pub fn collect_dirs(root: &Path, exclude: &Gitignore) -> KmpkitResult<Vec<PathBuf>> {
	let mut found = Vec::new();
	walk(root, exclude, Collect::Directories, &mut found)?;
	Ok(found)
}

/// Every regular file below `root`, in depth-first order with siblings sorted
/// by name. Symlinks that do not point at a directory are reported as files.
pub fn collect_files(root: &Path, exclude: &Gitignore) -> KmpkitResult<Vec<PathBuf>> {
	let mut found = Vec::new();
	walk(root, exclude, Collect::Files, &mut found)?;
	Ok(found)
}

fn walk(
	dir: &Path,
	exclude: &Gitignore,
	collect: Collect,
	found: &mut Vec<PathBuf>,
) -> KmpkitResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	let read_dir = std::fs::read_dir(dir)
		.map_err(|e| KmpkitError::path_io("failed to read directory", dir, e))?;
	let mut entries = Vec::new();
	for entry in read_dir {
		let entry = entry.map_err(|e| KmpkitError::path_io("failed to read directory", dir, e))?;
		let file_type = entry
			.file_type()
			.map_err(|e| KmpkitError::path_io("failed to inspect", &entry.path(), e))?;
		entries.push((entry.path(), file_type));
	}
	entries.sort_by(|a, b| a.0.cmp(&b.0));

	for (path, file_type) in entries {
		if file_type.is_dir() {
			if exclude.matched(&path, true).is_ignore() {
				continue;
			}

			if collect == Collect::Directories {
				found.push(path.clone());
			}
			walk(&path, exclude, collect, found)?;
		} else if file_type.is_symlink() && path.is_dir() {
			// Linked directories may point outside the project tree.
			tracing::debug!(path = %path.display(), "skipping symlinked directory");
		} else if collect == Collect::Files && !exclude.matched(&path, false).is_ignore() {
			found.push(path);
		}
	}

	Ok(())
}
