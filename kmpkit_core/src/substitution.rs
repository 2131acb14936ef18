use std::io::ErrorKind;
use std::path::Path;

use globset::Glob;
use globset::GlobMatcher;
use ignore::gitignore::Gitignore;
use regex::Regex;
use regex::RegexBuilder;

use crate::KmpkitError;
use crate::KmpkitResult;
use crate::walk::collect_files;

/// An exact substring replacement.
#[derive(Debug, Clone)]
pub struct SubstitutionRule {
	pub from: String,
	pub to: String,
	/// Compiled matcher for case-insensitive rules.
	matcher: Option<Regex>,
}

impl SubstitutionRule {
	/// Case-sensitive replacement of every occurrence of `from`.
	pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
		Self {
			from: from.into(),
			to: to.into(),
			matcher: None,
		}
	}

	/// Replacement of every occurrence of `from` regardless of ASCII or
	/// Unicode case. The replacement text is inserted verbatim.
	pub fn case_insensitive(from: impl Into<String>, to: impl Into<String>) -> KmpkitResult<Self> {
		let from = from.into();
		let matcher = RegexBuilder::new(&regex::escape(&from))
			.case_insensitive(true)
			.build()
			.map_err(|e| {
				KmpkitError::InvalidPattern {
					pattern: from.clone(),
					reason: e.to_string(),
				}
			})?;

		Ok(Self {
			from,
			to: to.into(),
			matcher: Some(matcher),
		})
	}

	/// A rule whose `from` equals its `to` can never change a file.
	pub fn is_noop(&self) -> bool {
		self.from.is_empty() || (self.matcher.is_none() && self.from == self.to)
	}

	/// Apply this rule to `content`.
	pub fn apply(&self, content: &str) -> String {
		if self.from.is_empty() {
			return content.to_string();
		}

		match &self.matcher {
			Some(matcher) => {
				matcher
					.replace_all(content, regex::NoExpand(&self.to))
					.into_owned()
			}
			None => content.replace(&self.from, &self.to),
		}
	}
}

/// Selects which files a rule set is applied to.
#[derive(Debug, Clone)]
pub enum FileFilter {
	/// Files whose extension is in the list (without the leading dot).
	Extensions(Vec<String>),
	/// Files whose name ends with this suffix, e.g. `.gradle.kts`.
	NameSuffix(String),
	/// Files whose name matches a glob such as `*.run.xml`.
	Glob(GlobMatcher),
}

impl FileFilter {
	pub fn extensions<I, S>(extensions: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::Extensions(
			extensions
				.into_iter()
				.map(|ext| ext.into().trim_start_matches('.').to_string())
				.collect(),
		)
	}

	pub fn glob(pattern: &str) -> KmpkitResult<Self> {
		let glob = Glob::new(pattern).map_err(|e| {
			KmpkitError::InvalidPattern {
				pattern: pattern.to_string(),
				reason: e.to_string(),
			}
		})?;
		Ok(Self::Glob(glob.compile_matcher()))
	}

	pub fn matches(&self, path: &Path) -> bool {
		let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
			return false;
		};

		match self {
			Self::Extensions(extensions) => {
				path.extension()
					.and_then(|ext| ext.to_str())
					.is_some_and(|ext| extensions.iter().any(|allowed| allowed == ext))
			}
			Self::NameSuffix(suffix) => name.ends_with(suffix.as_str()),
			Self::Glob(matcher) => matcher.is_match(name),
		}
	}
}

/// Apply `rules` in declared order to the text of one file and write it back
/// only when the result differs. Returns whether the file changed.
///
/// Files that are not valid UTF-8 are left untouched.
pub fn apply_rules_to_file(path: &Path, rules: &[SubstitutionRule]) -> KmpkitResult<bool> {
	let original = match std::fs::read_to_string(path) {
		Ok(content) => content,
		Err(error) if error.kind() == ErrorKind::InvalidData => {
			tracing::debug!(path = %path.display(), "skipping file that is not valid UTF-8");
			return Ok(false);
		}
		Err(error) => return Err(KmpkitError::path_io("failed to read", path, error)),
	};

	let updated = rules
		.iter()
		.fold(original.clone(), |content, rule| rule.apply(&content));

	if updated == original {
		return Ok(false);
	}

	std::fs::write(path, updated).map_err(|e| KmpkitError::path_io("failed to write", path, e))?;
	tracing::debug!(path = %path.display(), "rewrote file");
	Ok(true)
}

/// Walk `root` and apply `rules` to every file matched by `filter`. Returns
/// the number of files whose content changed.
///
/// Running the same rules a second time is a no-op as long as no rule's `to`
/// contains a later rule's `from`; choosing rules with that property is the
/// caller's job, and rules are never reordered here.
pub fn apply_rules(
	root: &Path,
	rules: &[SubstitutionRule],
	filter: &FileFilter,
	exclude: &Gitignore,
) -> KmpkitResult<usize> {
	let active: Vec<SubstitutionRule> = rules.iter().filter(|rule| !rule.is_noop()).cloned().collect();
	if active.is_empty() {
		return Ok(0);
	}

	let mut changed = 0;
	for file in collect_files(root, exclude)? {
		if !filter.matches(&file) {
			continue;
		}
		if apply_rules_to_file(&file, &active)? {
			changed += 1;
		}
	}

	Ok(changed)
}
