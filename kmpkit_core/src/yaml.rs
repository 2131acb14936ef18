use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use serde_yaml_ng::Value;

use crate::KmpkitError;
use crate::KmpkitResult;

/// A flattened leaf of a structured document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YamlFlatValue {
	/// Dotted path of the leaf, e.g. `library.name`.
	pub path: String,
	pub value: String,
}

impl YamlFlatValue {
	pub fn new(path: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			value: value.into(),
		}
	}
}

/// Flatten `value` into dotted-path leaves in document order.
///
/// Mappings recurse, sequences collapse to one comma-joined value made of
/// their scalar items, and null or tagged nodes are dropped.
pub fn flatten_yaml(value: &Value) -> Vec<YamlFlatValue> {
	let mut values = Vec::new();
	flatten_into(value, "", &mut values);
	values
}

fn flatten_into(value: &Value, prefix: &str, values: &mut Vec<YamlFlatValue>) {
	match value {
		Value::Mapping(mapping) => {
			for (key, child) in mapping {
				let Some(key) = scalar_to_string(key) else {
					continue;
				};
				let path = if prefix.is_empty() {
					key
				} else {
					format!("{prefix}.{key}")
				};
				flatten_into(child, &path, values);
			}
		}
		Value::Sequence(items) => {
			if prefix.is_empty() {
				return;
			}
			let joined = items
				.iter()
				.filter_map(scalar_to_string)
				.collect::<Vec<_>>()
				.join(", ");
			values.push(YamlFlatValue::new(prefix, joined));
		}
		Value::Null | Value::Tagged(_) => {}
		scalar => {
			if let (false, Some(text)) = (prefix.is_empty(), scalar_to_string(scalar)) {
				values.push(YamlFlatValue::new(prefix, text));
			}
		}
	}
}

fn scalar_to_string(value: &Value) -> Option<String> {
	match value {
		Value::String(text) => Some(text.clone()),
		Value::Number(number) => Some(number.to_string()),
		Value::Bool(flag) => Some(flag.to_string()),
		_ => None,
	}
}

/// Parse a structured document from `path`.
pub fn load_document(path: &Path) -> KmpkitResult<Value> {
	if !path.is_file() {
		return Err(KmpkitError::MissingConfigFile(path.display().to_string()));
	}

	let content =
		std::fs::read_to_string(path).map_err(|e| KmpkitError::path_io("failed to read", path, e))?;
	serde_yaml_ng::from_str(&content).map_err(|e| {
		KmpkitError::DocumentParse {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	})
}

/// Load and flatten the document at `path`.
pub fn load_flat_values(path: &Path) -> KmpkitResult<Vec<YamlFlatValue>> {
	Ok(flatten_yaml(&load_document(path)?))
}

/// Configuration of one publishable module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDescriptor {
	/// Module directory relative to the project root.
	#[serde(rename = "path")]
	pub relative_path: PathBuf,
	pub artifact_id: String,
	#[serde(default)]
	pub group_id: Option<String>,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub optional: bool,
	#[serde(default)]
	pub platform_info: Option<String>,
	#[serde(default)]
	pub dependencies: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ModulesDocument {
	modules: Vec<ModuleDescriptor>,
}

/// Parse module descriptors from a `modules:` list and validate them.
pub fn parse_module_descriptors(content: &str, path_display: &str) -> KmpkitResult<Vec<ModuleDescriptor>> {
	let invalid = |reason: String| {
		KmpkitError::InvalidModuleConfig {
			path: path_display.to_string(),
			reason,
		}
	};

	let document: ModulesDocument =
		serde_yaml_ng::from_str(content).map_err(|e| invalid(e.to_string()))?;

	let mut seen = HashSet::new();
	for module in &document.modules {
		if module.relative_path.as_os_str().is_empty() {
			return Err(invalid(format!(
				"module `{}` has an empty path",
				module.artifact_id
			)));
		}
		if module.artifact_id.trim().is_empty() {
			return Err(invalid(format!(
				"module at `{}` has no artifactId",
				module.relative_path.display()
			)));
		}
		if !seen.insert(module.relative_path.clone()) {
			return Err(invalid(format!(
				"module path `{}` is listed twice",
				module.relative_path.display()
			)));
		}
	}

	Ok(document.modules)
}

/// Load module descriptors from the document at `path`.
pub fn load_module_descriptors(path: &Path) -> KmpkitResult<Vec<ModuleDescriptor>> {
	if !path.is_file() {
		return Err(KmpkitError::MissingConfigFile(path.display().to_string()));
	}

	let content =
		std::fs::read_to_string(path).map_err(|e| KmpkitError::path_io("failed to read", path, e))?;
	parse_module_descriptors(&content, &path.display().to_string())
}
