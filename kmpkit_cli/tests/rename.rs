mod common;

use kmpkit_core::AnyEmptyResult;

#[test]
fn rename_rewrites_project() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::sample_project(tmp.path());
	common::seed_state(tmp.path());

	common::kmpkit_cmd()
		.arg("rename")
		.args(["--package", "io.github.fresh", "--library", "FreshLib"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Renamed `OldLib` (com.old.pkg) to `FreshLib` (io.github.fresh)",
		))
		.stdout(predicates::str::contains("run configurations   not found"))
		.stdout(predicates::str::contains("6 change(s)"));

	let root = tmp.path();
	assert_eq!(
		common::read_file(
			root,
			"oldlib-core/src/commonMain/kotlin/io/github/fresh/Widget.kt"
		),
		"package io.github.fresh\n\nimport io.github.fresh.internal.Helper\n\nclass Widget\n"
	);
	assert_eq!(
		common::read_file(
			root,
			"oldlib-core/src/commonMain/kotlin/io/github/fresh/internal/Helper.kt"
		),
		"package io.github.fresh.internal\n\nobject Helper\n"
	);
	assert!(!root.join("oldlib-core/src/commonMain/kotlin/com").exists());
	assert_eq!(
		common::read_file(root, "settings.gradle.kts"),
		"rootProject.name = \"freshlib\"\ninclude(\":freshlib-core\")\n"
	);
	assert!(common::read_file(root, "oldlib-core/build.gradle.kts").contains("\":freshlib-annotations\""));
	assert!(common::read_file(root, ".kmpkit/rename.properties").contains("io.github.fresh"));

	Ok(())
}

#[test]
fn repeated_rename_reports_nothing_to_do() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::sample_project(tmp.path());
	common::seed_state(tmp.path());

	common::kmpkit_cmd()
		.arg("rename")
		.args(["--package", "io.github.fresh", "--library", "FreshLib"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	common::kmpkit_cmd()
		.arg("rename")
		.args(["--package", "io.github.fresh", "--library", "FreshLib"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Nothing to rename: project already uses package `io.github.fresh` and library \
			 `FreshLib`.",
		));

	Ok(())
}

#[test]
fn rename_prints_json_outcome() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::sample_project(tmp.path());

	let output = common::kmpkit_cmd()
		.arg("rename")
		.args(["--package", "io.github.fresh", "--library", "FreshLib"])
		.args(["--from-package", "com.old.pkg", "--from-library", "OldLib"])
		.args(["--skip-imports", "--format", "json", "--path"])
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["previous"]["package_name"], "com.old.pkg");
	assert_eq!(json["target"]["library_name"], "FreshLib");
	assert_eq!(json["phases"][0]["phase"], "folders");
	assert_eq!(json["phases"][0]["changed"], 1);
	assert_eq!(json["phases"][2]["phase"], "imports");
	assert_eq!(json["phases"][2]["status"], "disabled");
	assert_eq!(json["phases"][5]["status"], "absent");

	// Imports were skipped, declarations were not.
	assert_eq!(
		common::read_file(
			tmp.path(),
			"oldlib-core/src/commonMain/kotlin/io/github/fresh/Widget.kt"
		),
		"package io.github.fresh\n\nimport com.old.pkg.internal.Helper\n\nclass Widget\n"
	);

	Ok(())
}

#[test]
fn rename_with_deepest_first_order() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::sample_project(tmp.path());
	common::seed_state(tmp.path());

	common::kmpkit_cmd()
		.arg("rename")
		.args(["--package", "io.github.fresh", "--library", "OldLib"])
		.args(["--order", "deepest-first", "--path"])
		.arg(tmp.path())
		.assert()
		.success();

	assert!(
		tmp.path()
			.join("oldlib-core/src/commonMain/kotlin/io/github/fresh/internal/Helper.kt")
			.is_file()
	);
	assert!(!tmp.path().join("oldlib-core/src/commonMain/kotlin/com").exists());

	Ok(())
}

#[test]
fn rename_without_state_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::sample_project(tmp.path());

	common::kmpkit_cmd()
		.arg("rename")
		.args(["--package", "io.github.fresh", "--library", "FreshLib"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("no rename state found"));

	assert!(
		tmp.path()
			.join("oldlib-core/src/commonMain/kotlin/com/old/pkg/Widget.kt")
			.is_file()
	);

	Ok(())
}

#[test]
fn from_package_requires_from_library() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::kmpkit_cmd()
		.arg("rename")
		.args(["--package", "io.github.fresh", "--library", "FreshLib"])
		.args(["--from-package", "com.old.pkg", "--path"])
		.arg(tmp.path())
		.assert()
		.failure()
		.stderr(predicates::str::contains("--from-library"));

	Ok(())
}
