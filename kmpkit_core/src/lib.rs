//! `kmpkit_core` is the engine behind [kmpkit](https://github.com/kmpkit/kmpkit), a
//! maintenance tool for Kotlin Multiplatform library projects. It renames a
//! project's package and library identifiers across the whole source tree and
//! synthesizes the navigation and placeholder values of its documentation site.
//!
//! ## Rename Pipeline
//!
//! ```text
//! RenameState (previous identifiers, from .kmpkit/rename.properties)
//!   → Folder relocation (path matcher finds package folders, tree merger moves them)
//!   → Root settings rewrite (settings.gradle.kts, case-insensitive)
//!   → Import rewrite (*.kt)
//!   → Declaration rewrite (*.kt, *.kts)
//!   → Module reference rewrite (*.gradle.kts)
//!   → Run configuration sync (.run/)
//!   → RenameState overwritten with the target identifiers
//! ```
//!
//! The state is written only after every enabled phase succeeded, so an
//! interrupted rename can be retried from the same baseline, and a repeated
//! rename to the same identifiers changes nothing.
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `kmpkit.toml`.
//! - [`path_matcher`]: Locating folders whose path contains a segment run.
//! - [`tree_merger`]: Moving one directory onto another with merge semantics.
//! - [`substitution`]: Ordered find/replace rules over a filtered file set.
//! - [`rename`]: The rename orchestrator.
//! - [`nav`]: Navigation outline synthesis for the documentation site.
//! - [`placeholder`]: `<dotted.path>` placeholder replacement.
//! - [`docs`]: The documentation generation pipeline.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kmpkit_core::KmpkitConfig;
//! use kmpkit_core::rename::RenameIdentifiers;
//! use kmpkit_core::rename::RenameOptions;
//! use kmpkit_core::rename::rename_from_state;
//! use std::path::Path;
//!
//! let root = Path::new(".");
//! let config = KmpkitConfig::load_or_default(root).unwrap();
//! let outcome = rename_from_state(
//! 	root,
//! 	RenameIdentifiers::new("io.github.example.widgets", "Widgets"),
//! 	None,
//! 	RenameOptions::default(),
//! 	config.rename,
//! )
//! .unwrap();
//! println!("{} change(s)", outcome.changed_count);
//! ```

pub use config::*;
pub use error::*;

pub mod config;
pub mod docs;
#[allow(unused_assignments)]
mod error;
pub mod nav;
pub mod path_matcher;
pub mod placeholder;
pub mod rename;
pub mod segments;
pub mod state;
pub mod substitution;
pub mod tree_merger;
pub(crate) mod walk;
pub mod yaml;

#[cfg(test)]
mod __fixtures;
