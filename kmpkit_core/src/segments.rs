use std::fmt;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use derive_more::Deref;
use serde::Serialize;

/// An ordered list of path components.
///
/// Path comparisons inside the engine happen on segments rather than on
/// separator-joined strings, so `com/old` never matches `com/older` and the
/// behaviour is identical on every platform. Conversion to a [`PathBuf`] only
/// happens at the I/O boundary.
#[derive(Debug, Clone, Default, Deref, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct PathSegments(Vec<String>);

impl PathSegments {
	pub fn new(segments: Vec<String>) -> Self {
		Self(segments)
	}

	/// Split a dotted identifier such as `com.example.app` into segments.
	/// Empty segments are dropped.
	pub fn from_dotted(identifier: &str) -> Self {
		Self(
			identifier
				.split('.')
				.filter(|segment| !segment.is_empty())
				.map(str::to_string)
				.collect(),
		)
	}

	/// Split a slash separated fragment such as `com/example/app`. Both `/` and
	/// `\` are accepted as separators.
	pub fn from_fragment(fragment: &str) -> Self {
		Self(
			fragment
				.split(['/', '\\'])
				.filter(|segment| !segment.is_empty())
				.map(str::to_string)
				.collect(),
		)
	}

	/// Segments of `path` relative to `root`. Returns `None` when `path` is not
	/// inside `root`.
	pub fn relative(root: &Path, path: &Path) -> Option<Self> {
		let relative = path.strip_prefix(root).ok()?;
		Some(Self::from_path(relative))
	}

	/// Segments of a relative path. Root and prefix components are ignored.
	pub fn from_path(path: &Path) -> Self {
		Self(
			path.components()
				.filter_map(|component| {
					match component {
						Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
						_ => None,
					}
				})
				.collect(),
		)
	}

	/// Index of the first contiguous run of `needle` inside these segments.
	pub fn find(&self, needle: &PathSegments) -> Option<usize> {
		if needle.is_empty() || needle.len() > self.len() {
			return None;
		}

		self.0
			.windows(needle.len())
			.position(|window| window == needle.0.as_slice())
	}

	/// Returns `true` when `needle` appears as a contiguous run.
	pub fn contains_run(&self, needle: &PathSegments) -> bool {
		self.find(needle).is_some()
	}

	/// Returns `true` when `prefix` is a leading run of these segments.
	pub fn starts_with(&self, prefix: &PathSegments) -> bool {
		prefix.len() <= self.len() && self.0[..prefix.len()] == prefix.0[..]
	}

	/// Returns `true` when `self` lies strictly below `ancestor`.
	pub fn is_descendant_of(&self, ancestor: &PathSegments) -> bool {
		self.len() > ancestor.len() && self.starts_with(ancestor)
	}

	/// Replace the first run of `from` with `to`. Returns `None` when `from`
	/// does not occur.
	pub fn replace_run(&self, from: &PathSegments, to: &PathSegments) -> Option<Self> {
		let index = self.find(from)?;
		let mut segments = Vec::with_capacity(self.len() - from.len() + to.len());
		segments.extend_from_slice(&self.0[..index]);
		segments.extend_from_slice(&to.0);
		segments.extend_from_slice(&self.0[index + from.len()..]);
		Some(Self(segments))
	}

	/// The first `len` segments.
	pub fn truncated(&self, len: usize) -> Self {
		Self(self.0.iter().take(len).cloned().collect())
	}

	/// Resolve these segments against `root`.
	pub fn to_path(&self, root: &Path) -> PathBuf {
		let mut path = root.to_path_buf();
		path.extend(self.0.iter());
		path
	}

	/// Forward-slash joined form, used for display and for navigation output.
	pub fn to_slash_string(&self) -> String {
		self.0.join("/")
	}
}

impl fmt::Display for PathSegments {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_slash_string())
	}
}

impl From<PathSegments> for String {
	fn from(value: PathSegments) -> Self {
		value.to_slash_string()
	}
}
