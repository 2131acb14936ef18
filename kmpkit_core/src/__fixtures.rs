use std::path::Path;

use ignore::gitignore::Gitignore;

use crate::walk::collect_files;

pub fn write_file(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create {parent:?}: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write {path:?}: {e}"));
}

pub fn read_file(root: &Path, relative: &str) -> String {
	let path = root.join(relative);
	std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {path:?}: {e}"))
}

pub fn make_dirs(root: &Path, relative: &str) {
	let path = root.join(relative);
	std::fs::create_dir_all(&path).unwrap_or_else(|e| panic!("create {path:?}: {e}"));
}

/// Every file below `root` as a sorted list of slash-separated relative paths.
pub fn file_tree(root: &Path) -> Vec<String> {
	let mut files: Vec<String> = collect_files(root, &Gitignore::empty())
		.unwrap_or_else(|e| panic!("walk {root:?}: {e}"))
		.into_iter()
		.map(|path| {
			path.strip_prefix(root)
				.unwrap_or(&path)
				.to_string_lossy()
				.replace('\\', "/")
		})
		.collect();
	files.sort();
	files
}

/// A small multiplatform library laid out the way a generated project is.
pub fn sample_project(root: &Path) {
	write_file(
		root,
		"settings.gradle.kts",
		"rootProject.name = \"OldLib\"\ninclude(\":oldlib-core\")\n",
	);
	write_file(
		root,
		"oldlib-core/build.gradle.kts",
		"dependencies {\n    api(project(\":oldlib-annotations\"))\n}\n",
	);
	write_file(
		root,
		"oldlib-core/src/commonMain/kotlin/com/old/pkg/File.kt",
		"package com.old.pkg\n\nimport com.old.pkg.Helper\n\nclass File\n",
	);
	write_file(
		root,
		"oldlib-core/src/commonMain/kotlin/com/old/pkg/Helper.kt",
		"package com.old.pkg\n\nobject Helper\n",
	);
	write_file(
		root,
		"oldlib-core/src/jvmMain/kotlin/com/old/pkg/jvm/Platform.kt",
		"package com.old.pkg.jvm\n\nimport com.old.pkg.Helper\n\nactual object Platform\n",
	);
	write_file(
		root,
		".run/oldlib-core tests.run.xml",
		"<component name=\"ProjectRunConfigurationManager\">\n  <configuration name=\"oldlib-core \
		 tests\" />\n</component>\n",
	);
}
