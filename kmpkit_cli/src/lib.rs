use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use kmpkit_core::path_matcher::FolderOrder;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Rename Kotlin Multiplatform library projects and generate their documentation site.",
	long_about = "kmpkit keeps a Kotlin Multiplatform library project consistent with its \
	              identifiers.\n\nIt moves package folders, rewrites imports, package \
	              declarations, module references and run configurations, and records the \
	              applied identifiers so the next rename knows where to start.\n\nQuick \
	              start:\n  kmpkit init    Record the current identifiers\n  kmpkit rename  \
	              Rename the project\n  kmpkit docs    Generate the documentation site\n  \
	              kmpkit state   Show the recorded identifiers"
)]
pub struct KmpkitCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Record the project's current identifiers and write a sample config.
	///
	/// Creates `kmpkit.toml` when no config file exists, and writes the rename
	/// state file with the given package and library names. An existing state
	/// is kept unless `--force` is passed.
	Init {
		/// The package name the project currently uses, e.g.
		/// `io.github.example.widgets`.
		#[arg(long)]
		package: String,

		/// The library name the project currently uses, e.g. `Widgets`.
		#[arg(long)]
		library: String,

		/// Overwrite an existing rename state.
		#[arg(long, default_value_t = false)]
		force: bool,
	},
	/// Rename the project to a new package and library name.
	///
	/// The previous identifiers are read from the rename state file unless
	/// both `--from-package` and `--from-library` are given. Phases run in
	/// order: folders, root settings, imports, declarations, module references
	/// and run configurations. The state is only updated when every phase
	/// succeeded, so a failed rename can simply be run again.
	Rename {
		/// The new package name.
		#[arg(long)]
		package: String,

		/// The new library name.
		#[arg(long)]
		library: String,

		/// The package name to rename from, overriding the rename state.
		#[arg(long, requires = "from_library")]
		from_package: Option<String>,

		/// The library name to rename from, overriding the rename state.
		#[arg(long, requires = "from_package")]
		from_library: Option<String>,

		#[command(flatten)]
		skip: SkipPhases,

		/// Order in which matching package folders are relocated. Defaults
		/// to the `folder_order` config value.
		#[arg(long, value_enum)]
		order: Option<OrderArg>,

		/// Output format for the rename summary.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Generate the documentation site.
	///
	/// Copies the documentation sources to the output folder, renders a page
	/// per module, fills in the navigation and replaces `<dotted.path>`
	/// placeholders with values from the library config.
	Docs {
		/// Output format for the generation summary.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Print the identifiers recorded by the last rename.
	State {
		/// Output format for the recorded state.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

/// Rename phases that can be switched off.
#[derive(Debug, Clone, Copy, Default, clap::Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct SkipPhases {
	/// Do not move package folders.
	#[arg(long, default_value_t = false)]
	pub skip_folders: bool,

	/// Do not rewrite the root settings file.
	#[arg(long, default_value_t = false)]
	pub skip_root_settings: bool,

	/// Do not rewrite import statements.
	#[arg(long, default_value_t = false)]
	pub skip_imports: bool,

	/// Do not rewrite package declarations.
	#[arg(long, default_value_t = false)]
	pub skip_declarations: bool,

	/// Do not rewrite module references in build scripts.
	#[arg(long, default_value_t = false)]
	pub skip_module_references: bool,

	/// Do not rewrite IDE run configurations.
	#[arg(long, default_value_t = false)]
	pub skip_run_configurations: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OrderArg {
	/// Move the outermost matching folders as whole units.
	TopmostFirst,
	/// Relocate every matching folder, deepest first.
	DeepestFirst,
}

impl From<OrderArg> for FolderOrder {
	fn from(value: OrderArg) -> Self {
		match value {
			OrderArg::TopmostFirst => FolderOrder::TopmostFirst,
			OrderArg::DeepestFirst => FolderOrder::DeepestFirst,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
