use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::KmpkitError;
use crate::KmpkitResult;

/// What happened during a single [`relocate`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelocateOutcome {
	/// `true` when the target already existed and the trees were merged,
	/// `false` for a plain rename.
	pub merged: bool,
	/// Number of files copied into the target while merging.
	pub files_moved: usize,
	/// Target files that were replaced by a source file of the same name.
	pub overwritten: Vec<PathBuf>,
	/// Source files that were copied but could not be removed afterwards.
	/// The tree now holds duplicates of these.
	pub leftovers: Vec<PathBuf>,
}

/// Move `source` to `target`.
///
/// When `target` does not exist this is a single filesystem rename, and a
/// failed rename is returned as an error. When it does exist the source tree
/// is merged in: files overwrite their counterparts in the target and are then
/// removed from the source, and every source directory emptied by the merge is
/// deleted.
pub fn relocate(source: &Path, target: &Path) -> KmpkitResult<RelocateOutcome> {
	let mut outcome = RelocateOutcome::default();
	if source == target {
		return Ok(outcome);
	}

	if target.starts_with(source) {
		return Err(KmpkitError::RelocateIntoSelf {
			source_dir: source.display().to_string(),
			target_dir: target.display().to_string(),
		});
	}

	if !target.exists() {
		if let Some(parent) = target.parent() {
			std::fs::create_dir_all(parent)
				.map_err(|e| KmpkitError::path_io("failed to create directory", parent, e))?;
		}
		std::fs::rename(source, target)
			.map_err(|e| KmpkitError::path_io("failed to rename", source, e))?;
		tracing::debug!(from = %source.display(), to = %target.display(), "renamed folder");
		return Ok(outcome);
	}

	outcome.merged = true;
	merge_dir(source, target, &mut outcome)?;
	remove_if_empty(source)?;
	tracing::debug!(
		from = %source.display(),
		to = %target.display(),
		files = outcome.files_moved,
		"merged folder"
	);

	Ok(outcome)
}

fn merge_dir(source: &Path, target: &Path, outcome: &mut RelocateOutcome) -> KmpkitResult<()> {
	let read_dir = std::fs::read_dir(source)
		.map_err(|e| KmpkitError::path_io("failed to read directory", source, e))?;
	let mut children = Vec::new();
	for entry in read_dir {
		let entry = entry.map_err(|e| KmpkitError::path_io("failed to read directory", source, e))?;
		let file_type = entry
			.file_type()
			.map_err(|e| KmpkitError::path_io("failed to inspect", &entry.path(), e))?;
		children.push((entry.file_name(), file_type.is_dir()));
	}
	children.sort();

	for (name, is_dir) in children {
		let source_child = source.join(&name);
		let target_child = target.join(&name);

		if is_dir {
			if target_child.exists() && !target_child.is_dir() {
				tracing::warn!(
					path = %target_child.display(),
					"replacing file with directory from merge source"
				);
				std::fs::remove_file(&target_child)
					.map_err(|e| KmpkitError::path_io("failed to remove", &target_child, e))?;
				outcome.overwritten.push(target_child.clone());
			}
			std::fs::create_dir_all(&target_child)
				.map_err(|e| KmpkitError::path_io("failed to create directory", &target_child, e))?;
			merge_dir(&source_child, &target_child, outcome)?;
			remove_if_empty(&source_child)?;
			continue;
		}

		if target_child.is_dir() {
			tracing::warn!(
				path = %target_child.display(),
				"replacing directory with file from merge source"
			);
			std::fs::remove_dir_all(&target_child)
				.map_err(|e| KmpkitError::path_io("failed to remove", &target_child, e))?;
			outcome.overwritten.push(target_child.clone());
		} else if target_child.exists() {
			tracing::warn!(path = %target_child.display(), "overwriting existing file during merge");
			outcome.overwritten.push(target_child.clone());
		}

		std::fs::copy(&source_child, &target_child)
			.map_err(|e| KmpkitError::path_io("failed to copy", &source_child, e))?;
		outcome.files_moved += 1;

		if let Err(error) = std::fs::remove_file(&source_child) {
			tracing::warn!(
				path = %source_child.display(),
				%error,
				"copied file could not be removed from the merge source; a duplicate remains"
			);
			outcome.leftovers.push(source_child);
		}
	}

	Ok(())
}

/// Delete `dir` when it has no entries left. Returns whether it was removed.
pub(crate) fn remove_if_empty(dir: &Path) -> KmpkitResult<bool> {
	let mut read_dir = std::fs::read_dir(dir)
		.map_err(|e| KmpkitError::path_io("failed to read directory", dir, e))?;
	if read_dir.next().is_some() {
		return Ok(false);
	}

	std::fs::remove_dir(dir).map_err(|e| KmpkitError::path_io("failed to remove", dir, e))?;
	Ok(true)
}

/// Remove `start` and then each of its ancestors while they are empty,
/// stopping before `root`.
pub(crate) fn prune_empty_ancestors(start: &Path, root: &Path) -> KmpkitResult<()> {
	let mut current = Some(start);
	while let Some(dir) = current {
		if dir == root || !dir.starts_with(root) || !dir.is_dir() {
			break;
		}
		if !remove_if_empty(dir)? {
			break;
		}
		current = dir.parent();
	}

	Ok(())
}
