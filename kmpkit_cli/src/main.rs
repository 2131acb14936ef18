use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use kmpkit_cli::Commands;
use kmpkit_cli::KmpkitCli;
use kmpkit_cli::OrderArg;
use kmpkit_cli::OutputFormat;
use kmpkit_cli::SkipPhases;
use kmpkit_core::KmpkitConfig;
use kmpkit_core::KmpkitError;
use kmpkit_core::SAMPLE_CONFIG;
use kmpkit_core::docs::generate_docs;
use kmpkit_core::rename::PhaseStatus;
use kmpkit_core::rename::RenameIdentifiers;
use kmpkit_core::rename::RenameOptions;
use kmpkit_core::rename::RenameOutcome;
use kmpkit_core::rename::RenamePhase;
use kmpkit_core::rename::rename_from_state;
use kmpkit_core::rename::seed_state;
use kmpkit_core::state::RenameState;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
	let args = KmpkitCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init {
			package,
			library,
			force,
		}) => run_init(&args, package, library, *force),
		Some(Commands::Rename {
			package,
			library,
			from_package,
			from_library,
			skip,
			order,
			format,
		}) => {
			let previous = from_package
				.as_ref()
				.zip(from_library.as_ref())
				.map(|(package, library)| RenameIdentifiers::new(package, library));
			run_rename(
				&args,
				RenameIdentifiers::new(package, library),
				previous,
				*skip,
				*order,
				*format,
			)
		}
		Some(Commands::Docs { format }) => run_docs(&args, *format),
		Some(Commands::State { format }) => run_state(&args, *format),
		None => {
			eprintln!("No subcommand specified. Run `kmpkit --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<KmpkitError>() {
			Ok(kmpkit_err) => {
				let report: miette::Report = (*kmpkit_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr so stdout only carries command output.
fn init_tracing(verbose: bool, use_color: bool) {
	let fallback = if verbose { "debug" } else { "info" };
	let filter = EnvFilter::try_from_env("KMPKIT_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));

	tracing_subscriber::registry()
		.with(filter)
		.with(
			tracing_subscriber::fmt::layer()
				.with_writer(std::io::stderr)
				.with_ansi(use_color)
				.with_target(false),
		)
		.init();
}

fn resolve_root(args: &KmpkitCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(root: &Path) -> Result<KmpkitConfig, Box<dyn std::error::Error>> {
	match KmpkitConfig::resolve_path(root) {
		Some(path) => tracing::debug!(path = %path.display(), "using config file"),
		None => tracing::debug!("no config file found, using defaults"),
	}
	Ok(KmpkitConfig::load_or_default(root)?)
}

fn print_json(value: &impl serde::Serialize) -> CliResult {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}

fn run_init(args: &KmpkitCli, package: &str, library: &str, force: bool) -> CliResult {
	let root = resolve_root(args);

	match KmpkitConfig::resolve_path(&root) {
		Some(path) => println!("Config file already exists: {}", path.display()),
		None => {
			let config_path = root.join("kmpkit.toml");
			std::fs::write(&config_path, SAMPLE_CONFIG)?;
			println!("Created kmpkit.toml");
		}
	}

	let config = load_config(&root)?;
	let identifiers = RenameIdentifiers::new(package, library);
	let state_path = root.join(&config.rename.state_file);
	if seed_state(&root, &config.rename, &identifiers, force)? {
		println!(
			"Recorded rename state: package `{}`, library `{}`",
			identifiers.package_name, identifiers.library_name
		);
	} else {
		println!(
			"Rename state already exists: {} (use --force to overwrite)",
			state_path.display()
		);
	}

	Ok(())
}

fn run_rename(
	args: &KmpkitCli,
	target: RenameIdentifiers,
	previous: Option<RenameIdentifiers>,
	skip: SkipPhases,
	order: Option<OrderArg>,
	format: OutputFormat,
) -> CliResult {
	let root = resolve_root(args);
	let config = load_config(&root)?;

	let options = RenameOptions {
		folders: !skip.skip_folders,
		root_settings: !skip.skip_root_settings,
		imports: !skip.skip_imports,
		declarations: !skip.skip_declarations,
		module_references: !skip.skip_module_references,
		run_configurations: !skip.skip_run_configurations,
		folder_order: order.map_or(config.rename.folder_order, Into::into),
	};

	let outcome = rename_from_state(&root, target, previous, options, config.rename)?;

	match format {
		OutputFormat::Json => print_json(&outcome),
		OutputFormat::Text => {
			print_rename_summary(&outcome);
			Ok(())
		}
	}
}

fn print_rename_summary(outcome: &RenameOutcome) {
	if outcome.changed_count == 0 {
		println!(
			"Nothing to rename: project already uses package `{}` and library `{}`.",
			outcome.target.package_name, outcome.target.library_name
		);
		return;
	}

	println!(
		"{} `{}` ({}) to `{}` ({})",
		colored!("Renamed", bold),
		outcome.previous.library_name,
		outcome.previous.package_name,
		outcome.target.library_name,
		outcome.target.package_name
	);
	for phase in &outcome.phases {
		let status = match phase.status {
			PhaseStatus::Changed => colored!(format!("{} changed", phase.changed), green),
			PhaseStatus::Unchanged => "unchanged".to_string(),
			PhaseStatus::Absent => colored!("not found", yellow),
			PhaseStatus::Disabled => "skipped".to_string(),
		};
		println!("  {:<20} {status}", phase_label(phase.phase));
	}
	println!();
	println!("{} change(s)", outcome.changed_count);
}

fn phase_label(phase: RenamePhase) -> &'static str {
	match phase {
		RenamePhase::Folders => "folders",
		RenamePhase::RootSettings => "root settings",
		RenamePhase::Imports => "imports",
		RenamePhase::Declarations => "declarations",
		RenamePhase::ModuleReferences => "module references",
		RenamePhase::RunConfigurations => "run configurations",
		RenamePhase::State => "rename state",
	}
}

fn run_docs(args: &KmpkitCli, format: OutputFormat) -> CliResult {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	let outcome = generate_docs(&root, &config.docs, &config.rename.exclude)?;

	if format == OutputFormat::Json {
		return print_json(&outcome);
	}

	println!(
		"Generated documentation in {}",
		outcome.output.strip_prefix(&root).unwrap_or(&outcome.output).display()
	);
	println!("  {:<20} {}", "module pages", outcome.module_pages);
	println!("  {:<20} {}", "navigation lines", outcome.nav_lines);
	println!("  {:<20} {}", "placeholder files", outcome.placeholder_files);
	if !outcome.nav_replaced {
		eprintln!(
			"{} navigation placeholder `{}` was not found in {}",
			colored!("warning:", yellow),
			config.docs.nav_placeholder,
			config.docs.nav_file.display()
		);
	}

	Ok(())
}

fn run_state(args: &KmpkitCli, format: OutputFormat) -> CliResult {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	let state_path = root.join(&config.rename.state_file);
	let Some(state) = RenameState::load(&state_path)? else {
		return Err(KmpkitError::MissingRenameState(state_path.display().to_string()).into());
	};

	match format {
		OutputFormat::Json => print_json(&state.identifiers()),
		OutputFormat::Text => {
			println!("{:<10} {}", "package:", state.package_name);
			println!("{:<10} {}", "library:", state.library_name);
			Ok(())
		}
	}
}
