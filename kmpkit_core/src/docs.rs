use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use serde::Serialize;

use crate::KmpkitError;
use crate::KmpkitResult;
use crate::config::DocsConfig;
use crate::nav::build_nav;
use crate::nav::replace_nav_placeholder;
use crate::placeholder::replace_all;
use crate::segments::PathSegments;
use crate::substitution::FileFilter;
use crate::walk::build_exclude_matcher;
use crate::walk::collect_dirs;
use crate::walk::collect_files;
use crate::yaml::ModuleDescriptor;
use crate::yaml::load_flat_values;
use crate::yaml::load_module_descriptors;

/// Folder under the navigation root that receives generated module pages.
pub const MODULE_PAGES_DIR: &str = "modules";

/// Page rendered for each module unless the docs source provides its own
/// template. `<library.*>` tokens are filled in afterwards by placeholder
/// replacement.
pub const DEFAULT_MODULE_TEMPLATE: &str = r#"# {{ module.artifactId }}

{{ module.description }}
{% if module.optional %}
!!! note
    This module is optional.
{% endif %}{% if module.platformInfo %}
**Platforms:** {{ module.platformInfo }}
{% endif %}
## Installation

```kotlin
implementation("{{ module.groupId or "<library.group>" }}:{{ module.artifactId }}:<library.version>")
```
{% if module.dependencies %}
## Dependencies
{% for dependency in module.dependencies %}
- `{{ dependency }}`{% endfor %}
{% endif %}"#;

/// Summary of a documentation generation run.
#[derive(Debug, Clone, Serialize)]
pub struct DocsOutcome {
	/// Absolute path of the generated tree.
	pub output: PathBuf,
	/// Module pages written.
	pub module_pages: usize,
	/// Lines of navigation inserted into the nav file.
	pub nav_lines: usize,
	/// Whether the nav placeholder was found and replaced.
	pub nav_replaced: bool,
	/// Files in which at least one placeholder was replaced.
	pub placeholder_files: usize,
}

/// Generate the documentation site for the project at `project_root`.
///
/// 1. Every module directory must have a descriptor in the modules config.
/// 2. The source tree is copied to a fresh output tree.
/// 3. A page is rendered for each module.
/// 4. Navigation is built from the pages under the output's navigation root
///    and written over the placeholder line in the nav file.
/// 5. `<dotted.path>` placeholders are filled from the library config.
pub fn generate_docs(
	project_root: &Path,
	config: &DocsConfig,
	exclude: &[String],
) -> KmpkitResult<DocsOutcome> {
	let exclude = build_exclude_matcher(project_root, exclude)?;
	let modules = load_module_descriptors(&project_root.join(&config.modules_config))?;
	validate_module_coverage(project_root, &modules, &config.module_build_file, &exclude)?;
	let values = load_flat_values(&project_root.join(&config.library_config))?;

	let source = project_root.join(&config.source);
	if !source.is_dir() {
		return Err(KmpkitError::MissingConfigFile(source.display().to_string()));
	}

	let output = project_root.join(&config.output);
	check_output_dir(project_root, &source, &output)?;
	if output.exists() {
		std::fs::remove_dir_all(&output)
			.map_err(|e| KmpkitError::path_io("failed to remove", &output, e))?;
	}
	let copied = copy_tree(&source, &output)?;
	tracing::info!(files = copied, output = %output.display(), "copied documentation sources");

	let template = match &config.module_template {
		Some(path) => {
			let path = source.join(path);
			std::fs::read_to_string(&path)
				.map_err(|e| KmpkitError::path_io("failed to read", &path, e))?
		}
		None => DEFAULT_MODULE_TEMPLATE.to_string(),
	};
	let nav_root = output.join(&config.nav_root);
	let module_pages = write_module_pages(&nav_root.join(MODULE_PAGES_DIR), &modules, &template)?;

	let pages = FileFilter::extensions(config.page_extensions.iter().cloned());
	let files: Vec<PathBuf> = collect_files(&nav_root, &Gitignore::empty())?
		.into_iter()
		.filter(|file| pages.matches(file))
		.collect();
	let nav = build_nav(&files, &nav_root, &config.priority);
	let nav_path = output.join(&config.nav_file);
	let nav_replaced = write_nav(&nav_path, &config.nav_placeholder, &nav)?;

	let placeholder_files = replace_all(&output, &values)?;
	tracing::info!(
		modules = module_pages,
		nav_lines = nav.len(),
		placeholder_files,
		"generated documentation"
	);

	Ok(DocsOutcome {
		output,
		module_pages,
		nav_lines: nav.len(),
		nav_replaced,
		placeholder_files,
	})
}

/// Reject an output folder that is recreated on top of something that must
/// survive the run: the project root or one of its ancestors, the
/// documentation source, or a folder inside the source.
pub fn check_output_dir(project_root: &Path, source: &Path, output: &Path) -> KmpkitResult<()> {
	let root = normalize(project_root);
	let source = normalize(source);
	let output = normalize(output);

	let protected = if root.starts_with(&output) {
		Some(&root)
	} else if source.starts_with(&output) || output.starts_with(&source) {
		Some(&source)
	} else {
		None
	};

	match protected {
		Some(protected) => {
			Err(KmpkitError::UnsafeDocsOutput {
				output: output.display().to_string(),
				protected: protected.display().to_string(),
			})
		}
		None => Ok(()),
	}
}

/// Resolve `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
	let mut normalized = PathBuf::new();
	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
					normalized.pop();
				} else {
					normalized.push(component);
				}
			}
			other => normalized.push(other),
		}
	}
	normalized
}

/// Fail unless every directory containing `build_file` (other than the root)
/// has a descriptor whose path matches it.
pub fn validate_module_coverage(
	project_root: &Path,
	modules: &[ModuleDescriptor],
	build_file: &str,
	exclude: &Gitignore,
) -> KmpkitResult<()> {
	let described: Vec<PathSegments> = modules
		.iter()
		.map(|module| PathSegments::from_path(&module.relative_path))
		.collect();

	for dir in collect_dirs(project_root, exclude)? {
		if !dir.join(build_file).is_file() {
			continue;
		}
		let Some(relative) = PathSegments::relative(project_root, &dir) else {
			continue;
		};
		if !described.contains(&relative) {
			return Err(KmpkitError::MissingModuleDescriptor {
				path: relative.to_slash_string(),
			});
		}
	}

	Ok(())
}

/// Render one page per module into `dir`. Returns the number written.
pub fn write_module_pages(
	dir: &Path,
	modules: &[ModuleDescriptor],
	template: &str,
) -> KmpkitResult<usize> {
	if modules.is_empty() {
		return Ok(0);
	}

	std::fs::create_dir_all(dir)
		.map_err(|e| KmpkitError::path_io("failed to create directory", dir, e))?;

	for module in modules {
		let page = render_module_page(template, module)?;
		let path = dir.join(format!("{}.md", module.artifact_id));
		std::fs::write(&path, page).map_err(|e| KmpkitError::path_io("failed to write", &path, e))?;
	}

	Ok(modules.len())
}

/// Render a module page template. The descriptor is available as `module`,
/// with camelCase field names.
pub fn render_module_page(template: &str, module: &ModuleDescriptor) -> KmpkitResult<String> {
	let mut env = minijinja::Environment::new();
	env.set_keep_trailing_newline(true);
	env.render_str(template, minijinja::context! { module => module })
		.map_err(|e| KmpkitError::TemplateRender(e.to_string()))
}

fn write_nav(nav_path: &Path, placeholder: &str, nav: &[String]) -> KmpkitResult<bool> {
	if !nav_path.is_file() {
		tracing::warn!(path = %nav_path.display(), "navigation file not found");
		return Ok(false);
	}

	let content = std::fs::read_to_string(nav_path)
		.map_err(|e| KmpkitError::path_io("failed to read", nav_path, e))?;
	let Some(updated) = replace_nav_placeholder(&content, placeholder, nav) else {
		tracing::warn!(path = %nav_path.display(), placeholder, "navigation placeholder not found");
		return Ok(false);
	};

	std::fs::write(nav_path, updated)
		.map_err(|e| KmpkitError::path_io("failed to write", nav_path, e))?;
	Ok(true)
}

/// Copy every file under `source` into `target`, creating directories as
/// needed. Returns the number of files copied.
fn copy_tree(source: &Path, target: &Path) -> KmpkitResult<usize> {
	let files = collect_files(source, &Gitignore::empty())?;
	std::fs::create_dir_all(target)
		.map_err(|e| KmpkitError::path_io("failed to create directory", target, e))?;

	for file in &files {
		let Ok(relative) = file.strip_prefix(source) else {
			continue;
		};
		let destination = target.join(relative);
		if let Some(parent) = destination.parent() {
			std::fs::create_dir_all(parent)
				.map_err(|e| KmpkitError::path_io("failed to create directory", parent, e))?;
		}
		std::fs::copy(file, &destination)
			.map_err(|e| KmpkitError::path_io("failed to copy", file, e))?;
	}

	Ok(files.len())
}
