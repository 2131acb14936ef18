use std::collections::HashSet;
use std::path::Path;

use crate::segments::PathSegments;

/// Indentation emitted per navigation depth level.
pub const NAV_INDENT: &str = "  ";

/// A documentation file positioned relative to the navigation root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavNode {
	/// File name, e.g. `index.md`.
	pub name: String,
	/// Full path relative to the navigation root.
	pub relative_path: PathSegments,
	/// Folders between the navigation root and the file.
	pub folder_segments: PathSegments,
}

impl NavNode {
	/// Position `file` under `nav_root`. Paths outside `nav_root` are taken to
	/// be relative to it already.
	pub fn new(nav_root: &Path, file: &Path) -> Option<Self> {
		let relative_path = PathSegments::relative(nav_root, file)
			.unwrap_or_else(|| PathSegments::from_path(file));
		let name = relative_path.last()?.clone();
		let folder_segments = relative_path.truncated(relative_path.len() - 1);

		Some(Self {
			name,
			relative_path,
			folder_segments,
		})
	}
}

/// Build indented navigation outline lines from discovered files.
///
/// Files below a priority folder come first, grouped in the order of
/// `priority_folders` and sorted by path within each group. All other files
/// follow in the order they were given. Each folder heading is emitted once,
/// just before the first file that needs it, and every level is indented by
/// [`NAV_INDENT`]:
///
/// ```text
///   - index.md
///   - modules:
///     - modules/core.md
/// ```
pub fn build_nav<P: AsRef<Path>>(files: &[P], nav_root: &Path, priority_folders: &[String]) -> Vec<String> {
	let priorities: Vec<PathSegments> = priority_folders
		.iter()
		.map(|folder| PathSegments::from_fragment(folder))
		.filter(|folder| !folder.is_empty())
		.collect();

	let mut groups: Vec<Vec<NavNode>> = vec![Vec::new(); priorities.len()];
	let mut rest = Vec::new();
	for node in files.iter().filter_map(|file| NavNode::new(nav_root, file.as_ref())) {
		match priorities
			.iter()
			.position(|priority| node.folder_segments.starts_with(priority))
		{
			Some(index) => groups[index].push(node),
			None => rest.push(node),
		}
	}

	for group in &mut groups {
		group.sort_by_key(|node| node.relative_path.to_slash_string());
	}

	let mut lines = Vec::new();
	let mut seen_folders: HashSet<PathSegments> = HashSet::new();
	for node in groups.into_iter().flatten().chain(rest) {
		let folders = &node.folder_segments;
		for depth in 0..folders.len() {
			if seen_folders.insert(folders.truncated(depth + 1)) {
				lines.push(format!("{}- {}:", NAV_INDENT.repeat(depth + 1), folders[depth]));
			}
		}
		lines.push(format!(
			"{}- {}",
			NAV_INDENT.repeat(folders.len() + 1),
			node.relative_path
		));
	}

	lines
}

/// Replace every line of `content` whose trimmed text is `placeholder` with
/// the navigation `lines`. Returns `None` when no such line exists.
pub fn replace_nav_placeholder(content: &str, placeholder: &str, lines: &[String]) -> Option<String> {
	let mut found = false;
	let mut output = Vec::new();
	for line in content.lines() {
		if line.trim() == placeholder {
			found = true;
			output.extend(lines.iter().map(String::as_str));
		} else {
			output.push(line);
		}
	}

	if !found {
		return None;
	}

	let mut replaced = output.join("\n");
	if content.ends_with('\n') {
		replaced.push('\n');
	}
	Some(replaced)
}
