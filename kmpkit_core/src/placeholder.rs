use std::io::ErrorKind;
use std::path::Path;

use ignore::gitignore::Gitignore;

use crate::KmpkitError;
use crate::KmpkitResult;
use crate::walk::collect_files;
use crate::yaml::YamlFlatValue;

/// The token a value replaces: its dotted path wrapped in angle brackets.
pub fn placeholder_token(path: &str) -> String {
	format!("<{path}>")
}

/// Replace every `<dotted.path>` token in `content`.
///
/// Values are applied one after another, so a value whose text itself holds
/// another token may be substituted twice.
pub fn replace_placeholders(content: &str, values: &[YamlFlatValue]) -> String {
	values.iter().fold(content.to_string(), |text, value| {
		let token = placeholder_token(&value.path);
		if text.contains(&token) {
			text.replace(&token, &value.value)
		} else {
			text
		}
	})
}

/// Replace placeholders in every file under `root`, writing back only the
/// files whose content changed. Returns the number of files rewritten.
///
/// Binary files are skipped.
pub fn replace_all(root: &Path, values: &[YamlFlatValue]) -> KmpkitResult<usize> {
	if values.is_empty() {
		return Ok(0);
	}

	let mut changed = 0;
	for file in collect_files(root, &Gitignore::empty())? {
		let original = match std::fs::read_to_string(&file) {
			Ok(content) => content,
			Err(error) if error.kind() == ErrorKind::InvalidData => continue,
			Err(error) => return Err(KmpkitError::path_io("failed to read", &file, error)),
		};

		let updated = replace_placeholders(&original, values);
		if updated != original {
			std::fs::write(&file, updated)
				.map_err(|e| KmpkitError::path_io("failed to write", &file, e))?;
			tracing::debug!(path = %file.display(), "replaced placeholders");
			changed += 1;
		}
	}

	Ok(changed)
}
