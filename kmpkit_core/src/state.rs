use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::KmpkitError;
use crate::KmpkitResult;
use crate::rename::RenameIdentifiers;

/// The identifiers most recently applied to the project.
///
/// Stored as a two-key property file:
///
/// ```properties
/// previousPackageName=com.example.library
/// previousLibraryName=Library
/// ```
///
/// A successful rename overwrites this record with its target identifiers, so
/// repeating the same rename finds nothing to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameState {
	#[serde(rename = "previousPackageName")]
	pub package_name: String,
	#[serde(rename = "previousLibraryName")]
	pub library_name: String,
}

impl RenameState {
	/// Read the state file. Returns `None` if it does not exist.
	pub fn load(path: &Path) -> KmpkitResult<Option<Self>> {
		if !path.is_file() {
			return Ok(None);
		}

		let content = std::fs::read_to_string(path)
			.map_err(|e| KmpkitError::path_io("failed to read", path, e))?;
		let state: Self = serde_ini::from_str(&content).map_err(|e| {
			KmpkitError::StateParse {
				path: path.display().to_string(),
				reason: e.to_string(),
			}
		})?;

		Ok(Some(state))
	}

	/// Overwrite the state file, creating parent directories as needed.
	pub fn save(&self, path: &Path) -> KmpkitResult<()> {
		let content = serde_ini::to_string(self).map_err(|e| {
			KmpkitError::StateParse {
				path: path.display().to_string(),
				reason: e.to_string(),
			}
		})?;

		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)
				.map_err(|e| KmpkitError::path_io("failed to create directory", parent, e))?;
		}
		std::fs::write(path, content).map_err(|e| KmpkitError::path_io("failed to write", path, e))
	}

	pub fn identifiers(&self) -> RenameIdentifiers {
		RenameIdentifiers {
			package_name: self.package_name.clone(),
			library_name: self.library_name.clone(),
		}
	}
}

impl From<&RenameIdentifiers> for RenameState {
	fn from(value: &RenameIdentifiers) -> Self {
		Self {
			package_name: value.package_name.clone(),
			library_name: value.library_name.clone(),
		}
	}
}
