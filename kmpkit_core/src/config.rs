use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::KmpkitError;
use crate::KmpkitResult;
use crate::path_matcher::FolderOrder;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["kmpkit.toml", ".kmpkit.toml", ".config/kmpkit.toml"];

/// Default location of the rename state file, relative to the project root.
pub const DEFAULT_STATE_FILE: &str = ".kmpkit/rename.properties";

/// Configuration loaded from a `kmpkit.toml` file.
///
/// ```toml
/// [rename]
/// state_file = ".kmpkit/rename.properties"
/// settings_file = "settings.gradle.kts"
/// import_extensions = ["kt"]
/// declaration_extensions = ["kt", "kts"]
/// module_reference_suffix = ".gradle.kts"
/// run_config_dir = ".run"
/// run_config_files = "*.xml"
/// folder_order = "topmost-first"
/// exclude = ["build/", ".gradle/"]
///
/// [docs]
/// source = "documentation"
/// output = "build/documentation"
/// nav_root = "docs"
/// nav_file = "mkdocs.yml"
/// nav_placeholder = "<nav>"
/// priority = ["modules", "guides"]
/// page_extensions = ["md"]
/// library_config = "gradle/library.yml"
/// modules_config = "gradle/modules.yml"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct KmpkitConfig {
	#[serde(default)]
	pub rename: RenameConfig,
	#[serde(default)]
	pub docs: DocsConfig,
}

/// Where the rename phases look for things.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
	/// Property file holding the previously applied identifiers.
	pub state_file: PathBuf,
	/// Root settings file whose library name is rewritten.
	pub settings_file: PathBuf,
	/// Extensions of files whose `import` statements are rewritten.
	pub import_extensions: Vec<String>,
	/// Extensions of files whose `package` declarations are rewritten.
	pub declaration_extensions: Vec<String>,
	/// File name suffix of build scripts holding `":module"` references.
	pub module_reference_suffix: String,
	/// Folder of IDE run configurations.
	pub run_config_dir: PathBuf,
	/// Glob selecting the run configuration files inside `run_config_dir`.
	pub run_config_files: String,
	/// Ordering used when relocating package folders.
	pub folder_order: FolderOrder,
	/// Gitignore-style patterns skipped by every phase.
	pub exclude: Vec<String>,
}

impl Default for RenameConfig {
	fn default() -> Self {
		Self {
			state_file: PathBuf::from(DEFAULT_STATE_FILE),
			settings_file: PathBuf::from("settings.gradle.kts"),
			import_extensions: vec!["kt".to_string()],
			declaration_extensions: vec!["kt".to_string(), "kts".to_string()],
			module_reference_suffix: ".gradle.kts".to_string(),
			run_config_dir: PathBuf::from(".run"),
			run_config_files: "*.xml".to_string(),
			folder_order: FolderOrder::default(),
			exclude: ["build/", ".gradle/", ".git/", ".idea/", ".kotlin/"]
				.into_iter()
				.map(str::to_string)
				.collect(),
		}
	}
}

/// Inputs and outputs of the documentation site generator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
	/// Documentation source tree copied into the output.
	pub source: PathBuf,
	/// Generated output tree. Recreated on every run.
	pub output: PathBuf,
	/// Folder inside the output that navigation is built from.
	pub nav_root: PathBuf,
	/// Navigation file inside the output holding the placeholder line.
	pub nav_file: PathBuf,
	/// Token marking the line replaced by generated navigation.
	pub nav_placeholder: String,
	/// Folders under `nav_root` listed first, in this order.
	pub priority: Vec<String>,
	/// Extensions of files listed in the navigation. Other files under
	/// `nav_root`, such as images and stylesheets, are copied but not listed.
	pub page_extensions: Vec<String>,
	/// Structured document whose values fill `<dotted.path>` placeholders.
	pub library_config: PathBuf,
	/// Structured document listing module descriptors.
	pub modules_config: PathBuf,
	/// File marking a directory as a module.
	pub module_build_file: String,
	/// Optional module page template, relative to `source`.
	pub module_template: Option<PathBuf>,
}

impl Default for DocsConfig {
	fn default() -> Self {
		Self {
			source: PathBuf::from("documentation"),
			output: PathBuf::from("build/documentation"),
			nav_root: PathBuf::from("docs"),
			nav_file: PathBuf::from("mkdocs.yml"),
			nav_placeholder: "<nav>".to_string(),
			priority: vec!["modules".to_string(), "guides".to_string()],
			page_extensions: vec!["md".to_string()],
			library_config: PathBuf::from("gradle/library.yml"),
			modules_config: PathBuf::from("gradle/modules.yml"),
			module_build_file: "build.gradle.kts".to_string(),
			module_template: None,
		}
	}
}

impl KmpkitConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> KmpkitResult<Option<KmpkitConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)
			.map_err(|e| KmpkitError::path_io("failed to read", &config_path, e))?;
		let config: KmpkitConfig =
			toml::from_str(&content).map_err(|e| KmpkitError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}

	/// Load the discovered config, falling back to defaults when none exists.
	pub fn load_or_default(root: &Path) -> KmpkitResult<KmpkitConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}
}

/// Sample `kmpkit.toml` written by `kmpkit init`.
pub const SAMPLE_CONFIG: &str = r#"# kmpkit configuration
# Every key is optional; the values below are the defaults.

[rename]
state_file = ".kmpkit/rename.properties"
settings_file = "settings.gradle.kts"
import_extensions = ["kt"]
declaration_extensions = ["kt", "kts"]
module_reference_suffix = ".gradle.kts"
run_config_dir = ".run"
run_config_files = "*.xml"
# "topmost-first" moves matched package folders as whole units,
# "deepest-first" relocates every matching folder bottom-up.
folder_order = "topmost-first"
exclude = ["build/", ".gradle/", ".git/", ".idea/", ".kotlin/"]

[docs]
source = "documentation"
output = "build/documentation"
nav_root = "docs"
nav_file = "mkdocs.yml"
nav_placeholder = "<nav>"
priority = ["modules", "guides"]
page_extensions = ["md"]
library_config = "gradle/library.yml"
modules_config = "gradle/modules.yml"
module_build_file = "build.gradle.kts"
"#;
