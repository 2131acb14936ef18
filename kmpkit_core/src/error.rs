use std::path::Path;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum KmpkitError {
	#[error(transparent)]
	#[diagnostic(code(kmpkit::io_error))]
	Io(#[from] std::io::Error),

	#[error("{action} `{path}`: {source}")]
	#[diagnostic(code(kmpkit::path_io))]
	PathIo {
		action: &'static str,
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(kmpkit::config_parse),
		help("check that kmpkit.toml is valid TOML with [rename] and/or [docs] sections")
	)]
	ConfigParse(String),

	#[error("required config file not found: `{0}`")]
	#[diagnostic(code(kmpkit::missing_config_file))]
	MissingConfigFile(String),

	#[error("no module descriptor for module directory `{path}`")]
	#[diagnostic(
		code(kmpkit::missing_module_descriptor),
		help("add an entry with `path: {path}` to the modules config")
	)]
	MissingModuleDescriptor { path: String },

	#[error("invalid modules config `{path}`: {reason}")]
	#[diagnostic(code(kmpkit::invalid_module_config))]
	InvalidModuleConfig { path: String, reason: String },

	#[error("failed to parse structured document `{path}`: {reason}")]
	#[diagnostic(code(kmpkit::document_parse))]
	DocumentParse { path: String, reason: String },

	#[error("failed to read rename state `{path}`: {reason}")]
	#[diagnostic(
		code(kmpkit::state_parse),
		help("the state file holds `previousPackageName=` and `previousLibraryName=` lines")
	)]
	StateParse { path: String, reason: String },

	#[error("no rename state found at `{0}`")]
	#[diagnostic(
		code(kmpkit::missing_rename_state),
		help("run `kmpkit init --package <name> --library <name>` or pass the previous identifiers explicitly")
	)]
	MissingRenameState(String),

	#[error("cannot relocate `{source_dir}` into its own descendant `{target_dir}`")]
	#[diagnostic(code(kmpkit::relocate_into_self))]
	RelocateIntoSelf {
		source_dir: String,
		target_dir: String,
	},

	#[error("invalid {kind} `{value}`: {reason}")]
	#[diagnostic(code(kmpkit::invalid_identifier))]
	InvalidIdentifier {
		kind: &'static str,
		value: String,
		reason: &'static str,
	},

	#[error("invalid file pattern `{pattern}`: {reason}")]
	#[diagnostic(code(kmpkit::invalid_pattern))]
	InvalidPattern { pattern: String, reason: String },

	#[error("documentation output `{output}` would overwrite `{protected}`")]
	#[diagnostic(
		code(kmpkit::unsafe_docs_output),
		help("set [docs] output to a folder outside the documentation source, e.g. `build/documentation`")
	)]
	UnsafeDocsOutput { output: String, protected: String },

	#[error("template rendering failed: {0}")]
	#[diagnostic(code(kmpkit::template_render))]
	TemplateRender(String),
}

impl KmpkitError {
	/// Wrap an I/O error with the operation and path that produced it.
	pub fn path_io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
		Self::PathIo {
			action,
			path: path.display().to_string(),
			source,
		}
	}
}

pub type KmpkitResult<T> = Result<T, KmpkitError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
