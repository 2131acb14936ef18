#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;

pub fn kmpkit_cmd() -> Command {
	let mut cmd = Command::cargo_bin("kmpkit").unwrap_or_else(|e| panic!("kmpkit binary: {e}"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("KMPKIT_LOG");
	cmd
}

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

/// A one-module library using `com.old.pkg` / `OldLib`.
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
		"oldlib-core/src/commonMain/kotlin/com/old/pkg/Widget.kt",
		"package com.old.pkg\n\nimport com.old.pkg.internal.Helper\n\nclass Widget\n",
	);
	write_file(
		root,
		"oldlib-core/src/commonMain/kotlin/com/old/pkg/internal/Helper.kt",
		"package com.old.pkg.internal\n\nobject Helper\n",
	);
}

/// Record `com.old.pkg` / `OldLib` as the current identifiers.
pub fn seed_state(root: &Path) {
	write_file(
		root,
		".kmpkit/rename.properties",
		"previousPackageName=com.old.pkg\npreviousLibraryName=OldLib\n",
	);
}
