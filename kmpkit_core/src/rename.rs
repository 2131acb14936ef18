use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use serde::Serialize;

use crate::KmpkitError;
use crate::KmpkitResult;
use crate::config::RenameConfig;
use crate::path_matcher::FolderOrder;
use crate::path_matcher::find_folders_with_path;
use crate::segments::PathSegments;
use crate::state::RenameState;
use crate::substitution::FileFilter;
use crate::substitution::SubstitutionRule;
use crate::substitution::apply_rules;
use crate::substitution::apply_rules_to_file;
use crate::tree_merger::prune_empty_ancestors;
use crate::tree_merger::relocate;
use crate::walk::build_exclude_matcher;

/// The pair of identifiers a rename moves between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameIdentifiers {
	/// Dotted package name, e.g. `com.example.library`.
	pub package_name: String,
	/// Display name of the library, e.g. `Library`.
	pub library_name: String,
}

impl RenameIdentifiers {
	pub fn new(package_name: impl Into<String>, library_name: impl Into<String>) -> Self {
		Self {
			package_name: package_name.into(),
			library_name: library_name.into(),
		}
	}

	/// Reject identifiers that could not have come from a Kotlin project.
	pub fn validate(&self) -> KmpkitResult<()> {
		let invalid_package = |reason| {
			KmpkitError::InvalidIdentifier {
				kind: "package name",
				value: self.package_name.clone(),
				reason,
			}
		};

		if self.package_name.is_empty() {
			return Err(invalid_package("must not be empty"));
		}
		for segment in self.package_name.split('.') {
			if segment.is_empty() {
				return Err(invalid_package("contains an empty segment"));
			}
			if segment.starts_with(|c: char| c.is_ascii_digit()) {
				return Err(invalid_package("a segment starts with a digit"));
			}
			if !segment.chars().all(|c| c.is_alphanumeric() || c == '_') {
				return Err(invalid_package("segments may only contain letters, digits and `_`"));
			}
		}

		let library = self.library_name.trim();
		if library.is_empty() {
			return Err(KmpkitError::InvalidIdentifier {
				kind: "library name",
				value: self.library_name.clone(),
				reason: "must not be empty",
			});
		}
		if library.contains(['/', '\\', '"', ':']) {
			return Err(KmpkitError::InvalidIdentifier {
				kind: "library name",
				value: self.library_name.clone(),
				reason: "must not contain path separators, quotes or `:`",
			});
		}

		Ok(())
	}
}

/// Which rename phases run. Disabled phases are reported but not executed;
/// enabled phases always run in declaration order.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct RenameOptions {
	pub folders: bool,
	pub root_settings: bool,
	pub imports: bool,
	pub declarations: bool,
	pub module_references: bool,
	pub run_configurations: bool,
	pub folder_order: FolderOrder,
}

impl Default for RenameOptions {
	fn default() -> Self {
		Self {
			folders: true,
			root_settings: true,
			imports: true,
			declarations: true,
			module_references: true,
			run_configurations: true,
			folder_order: FolderOrder::default(),
		}
	}
}

/// Everything a rename needs. Nothing is read from the process environment.
#[derive(Debug, Clone)]
pub struct RenameContext {
	pub project_root: PathBuf,
	pub previous: RenameIdentifiers,
	pub target: RenameIdentifiers,
	pub options: RenameOptions,
	pub config: RenameConfig,
}

impl RenameContext {
	pub fn state_path(&self) -> PathBuf {
		self.project_root.join(&self.config.state_file)
	}
}

/// The rename phases in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenamePhase {
	Folders,
	RootSettings,
	Imports,
	Declarations,
	ModuleReferences,
	RunConfigurations,
	State,
}

/// How a phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseStatus {
	/// At least one file or folder changed.
	Changed,
	/// The phase ran and found nothing to rewrite.
	Unchanged,
	/// The file or folder the phase operates on does not exist.
	Absent,
	/// The phase was switched off in [`RenameOptions`].
	Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseOutcome {
	pub phase: RenamePhase,
	pub status: PhaseStatus,
	/// Files rewritten, or folders relocated for [`RenamePhase::Folders`].
	pub changed: usize,
}

impl PhaseOutcome {
	fn new(phase: RenamePhase, changed: usize) -> Self {
		let status = if changed == 0 {
			PhaseStatus::Unchanged
		} else {
			PhaseStatus::Changed
		};
		Self {
			phase,
			status,
			changed,
		}
	}

	fn with_status(phase: RenamePhase, status: PhaseStatus) -> Self {
		Self {
			phase,
			status,
			changed: 0,
		}
	}
}

/// Result of a completed rename.
#[derive(Debug, Clone, Serialize)]
pub struct RenameOutcome {
	pub previous: RenameIdentifiers,
	pub target: RenameIdentifiers,
	pub phases: Vec<PhaseOutcome>,
	/// Total of every phase's `changed` count.
	pub changed_count: usize,
}

impl RenameOutcome {
	/// Phases that did not execute because they were disabled or their input
	/// was absent.
	pub fn skipped(&self) -> Vec<RenamePhase> {
		self.phases
			.iter()
			.filter(|outcome| matches!(outcome.status, PhaseStatus::Disabled | PhaseStatus::Absent))
			.map(|outcome| outcome.phase)
			.collect()
	}

	pub fn phase(&self, phase: RenamePhase) -> Option<&PhaseOutcome> {
		self.phases.iter().find(|outcome| outcome.phase == phase)
	}
}

/// Rename the project from `ctx.previous` to `ctx.target`.
///
/// Phases run in a fixed order: folder relocation, root settings, imports,
/// declarations, module references, run configurations. The rename state is
/// written last and only when every enabled phase succeeded; an error in any
/// phase returns immediately and leaves the state file untouched so a retry
/// starts again from the original baseline. Completed phases are not rolled
/// back. A state file that exists but cannot be read fails the rename before
/// any phase runs.
pub fn rename_project(ctx: &RenameContext) -> KmpkitResult<RenameOutcome> {
	ctx.previous.validate()?;
	ctx.target.validate()?;

	let root = ctx.project_root.as_path();
	let exclude = build_exclude_matcher(root, &ctx.config.exclude)?;
	// An unreadable state fails the rename before anything moves.
	let state_path = ctx.state_path();
	let recorded = RenameState::load(&state_path)?;
	let previous_library = ctx.previous.library_name.to_lowercase();
	let target_library = ctx.target.library_name.to_lowercase();
	let mut phases = Vec::with_capacity(7);

	tracing::info!(
		from = %ctx.previous.package_name,
		to = %ctx.target.package_name,
		"renaming project"
	);

	phases.push(if ctx.options.folders {
		relocate_package_folders(ctx, &exclude)?
	} else {
		PhaseOutcome::with_status(RenamePhase::Folders, PhaseStatus::Disabled)
	});

	phases.push(if ctx.options.root_settings {
		rewrite_root_settings(ctx, &previous_library, &target_library)?
	} else {
		PhaseOutcome::with_status(RenamePhase::RootSettings, PhaseStatus::Disabled)
	});

	phases.push(if ctx.options.imports {
		let rule = SubstitutionRule::new(
			format!("import {}", ctx.previous.package_name),
			format!("import {}", ctx.target.package_name),
		);
		let filter = FileFilter::extensions(ctx.config.import_extensions.iter().cloned());
		run_rules(RenamePhase::Imports, root, &[rule], &filter, &exclude)?
	} else {
		PhaseOutcome::with_status(RenamePhase::Imports, PhaseStatus::Disabled)
	});

	phases.push(if ctx.options.declarations {
		let rule = SubstitutionRule::new(
			format!("package {}", ctx.previous.package_name),
			format!("package {}", ctx.target.package_name),
		);
		let filter = FileFilter::extensions(ctx.config.declaration_extensions.iter().cloned());
		run_rules(RenamePhase::Declarations, root, &[rule], &filter, &exclude)?
	} else {
		PhaseOutcome::with_status(RenamePhase::Declarations, PhaseStatus::Disabled)
	});

	phases.push(if ctx.options.module_references {
		let rule = SubstitutionRule::new(
			format!("\":{previous_library}"),
			format!("\":{target_library}"),
		);
		let filter = FileFilter::NameSuffix(ctx.config.module_reference_suffix.clone());
		run_rules(RenamePhase::ModuleReferences, root, &[rule], &filter, &exclude)?
	} else {
		PhaseOutcome::with_status(RenamePhase::ModuleReferences, PhaseStatus::Disabled)
	});

	phases.push(if ctx.options.run_configurations {
		sync_run_configurations(ctx, &previous_library, &target_library, &exclude)?
	} else {
		PhaseOutcome::with_status(RenamePhase::RunConfigurations, PhaseStatus::Disabled)
	});

	let state = RenameState::from(&ctx.target);
	if recorded.as_ref() == Some(&state) {
		tracing::info!(path = %state_path.display(), "rename state already current");
		phases.push(PhaseOutcome::with_status(RenamePhase::State, PhaseStatus::Unchanged));
	} else {
		state.save(&state_path)?;
		tracing::info!(path = %state_path.display(), "recorded rename state");
		phases.push(PhaseOutcome::with_status(RenamePhase::State, PhaseStatus::Changed));
	}

	let changed_count = phases.iter().map(|outcome| outcome.changed).sum();
	Ok(RenameOutcome {
		previous: ctx.previous.clone(),
		target: ctx.target.clone(),
		phases,
		changed_count,
	})
}

/// Rename using the persisted [`RenameState`] as the previous identifiers.
///
/// `previous` overrides the state file when given. Without either, this is a
/// configuration error.
pub fn rename_from_state(
	project_root: &Path,
	target: RenameIdentifiers,
	previous: Option<RenameIdentifiers>,
	options: RenameOptions,
	config: RenameConfig,
) -> KmpkitResult<RenameOutcome> {
	let state_path = project_root.join(&config.state_file);
	let previous = match previous {
		Some(previous) => previous,
		None => {
			RenameState::load(&state_path)?
				.ok_or_else(|| KmpkitError::MissingRenameState(state_path.display().to_string()))?
				.identifiers()
		}
	};

	rename_project(&RenameContext {
		project_root: project_root.to_path_buf(),
		previous,
		target,
		options,
		config,
	})
}

/// Write the initial rename state. Returns `false` without touching the file
/// when a state already exists and `overwrite` is not set.
pub fn seed_state(
	project_root: &Path,
	config: &RenameConfig,
	identifiers: &RenameIdentifiers,
	overwrite: bool,
) -> KmpkitResult<bool> {
	identifiers.validate()?;
	let state_path = project_root.join(&config.state_file);
	if !overwrite && state_path.is_file() {
		tracing::info!(path = %state_path.display(), "rename state already exists");
		return Ok(false);
	}

	RenameState::from(identifiers).save(&state_path)?;
	Ok(true)
}

fn relocate_package_folders(ctx: &RenameContext, exclude: &Gitignore) -> KmpkitResult<PhaseOutcome> {
	let root = ctx.project_root.as_path();
	let from = PathSegments::from_dotted(&ctx.previous.package_name);
	let to = PathSegments::from_dotted(&ctx.target.package_name);

	if from == to {
		tracing::info!("package name unchanged, no folders to relocate");
		return Ok(PhaseOutcome::new(RenamePhase::Folders, 0));
	}

	let matches = find_folders_with_path(root, &from, ctx.options.folder_order, exclude)?;
	if matches.is_empty() {
		tracing::info!(fragment = %from, "no package folders found");
		return Ok(PhaseOutcome::new(RenamePhase::Folders, 0));
	}

	let mut relocated = 0;
	for entry in matches {
		// An earlier relocation may already have carried this folder away.
		if !entry.path.is_dir() {
			tracing::debug!(path = %entry.path.display(), "folder already relocated");
			continue;
		}
		let Some(target) = entry.relative.replace_run(&from, &to) else {
			continue;
		};

		let target_path = target.to_path(root);
		let outcome = relocate(&entry.path, &target_path)?;
		if !outcome.overwritten.is_empty() {
			tracing::warn!(
				count = outcome.overwritten.len(),
				target = %target,
				"existing files were overwritten while merging"
			);
		}
		tracing::info!(from = %entry.relative, to = %target, "relocated folder");
		relocated += 1;

		if let Some(parent) = entry.path.parent() {
			prune_empty_ancestors(parent, root)?;
		}
	}

	Ok(PhaseOutcome::new(RenamePhase::Folders, relocated))
}

fn rewrite_root_settings(
	ctx: &RenameContext,
	previous_library: &str,
	target_library: &str,
) -> KmpkitResult<PhaseOutcome> {
	let path = ctx.project_root.join(&ctx.config.settings_file);
	if !path.is_file() {
		tracing::info!(path = %path.display(), "root settings file not found");
		return Ok(PhaseOutcome::with_status(RenamePhase::RootSettings, PhaseStatus::Absent));
	}

	if previous_library == target_library {
		tracing::info!(path = %path.display(), "library name unchanged in root settings");
		return Ok(PhaseOutcome::new(RenamePhase::RootSettings, 0));
	}

	let rule = SubstitutionRule::case_insensitive(previous_library, target_library)?;
	let changed = apply_rules_to_file(&path, &[rule])?;
	if changed {
		tracing::info!(path = %path.display(), "updated root settings");
	} else {
		tracing::info!(path = %path.display(), "root settings contain no previous library name");
	}

	Ok(PhaseOutcome::new(RenamePhase::RootSettings, usize::from(changed)))
}

fn sync_run_configurations(
	ctx: &RenameContext,
	previous_library: &str,
	target_library: &str,
	exclude: &Gitignore,
) -> KmpkitResult<PhaseOutcome> {
	let dir = ctx.project_root.join(&ctx.config.run_config_dir);
	if !dir.is_dir() {
		tracing::info!(path = %dir.display(), "no run configurations folder");
		return Ok(PhaseOutcome::with_status(
			RenamePhase::RunConfigurations,
			PhaseStatus::Absent,
		));
	}

	let rule = SubstitutionRule::new(previous_library, target_library);
	let filter = FileFilter::glob(&ctx.config.run_config_files)?;
	run_rules(RenamePhase::RunConfigurations, &dir, &[rule], &filter, exclude)
}

fn run_rules(
	phase: RenamePhase,
	root: &Path,
	rules: &[SubstitutionRule],
	filter: &FileFilter,
	exclude: &Gitignore,
) -> KmpkitResult<PhaseOutcome> {
	let changed = apply_rules(root, rules, filter, exclude)?;
	tracing::info!(?phase, changed, "rewrote files");
	Ok(PhaseOutcome::new(phase, changed))
}
