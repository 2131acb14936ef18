mod common;

use kmpkit_core::AnyEmptyResult;
use kmpkit_core::state::RenameState;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::kmpkit_cmd()
		.arg("init")
		.arg("--package")
		.arg("com.example.widgets")
		.arg("--library")
		.arg("Widgets")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created kmpkit.toml"))
		.stdout(predicates::str::contains(
			"Recorded rename state: package `com.example.widgets`, library `Widgets`",
		));

	let config = std::fs::read_to_string(tmp.path().join("kmpkit.toml"))?;
	assert!(config.contains("[rename]"));
	assert!(config.contains("[docs]"));

	let state = RenameState::load(&tmp.path().join(".kmpkit/rename.properties"))?;
	assert_eq!(
		state.map(|state| (state.package_name, state.library_name)),
		Some(("com.example.widgets".to_string(), "Widgets".to_string()))
	);

	Ok(())
}

#[test]
fn init_keeps_existing_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join(".kmpkit.toml"), "[rename]\n")?;
	common::seed_state(tmp.path());

	common::kmpkit_cmd()
		.arg("init")
		.args(["--package", "com.other", "--library", "Other"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Config file already exists"))
		.stdout(predicates::str::contains("Rename state already exists"));

	assert!(!tmp.path().join("kmpkit.toml").exists());
	assert_eq!(std::fs::read_to_string(tmp.path().join(".kmpkit.toml"))?, "[rename]\n");
	assert_eq!(
		common::read_file(tmp.path(), ".kmpkit/rename.properties"),
		"previousPackageName=com.old.pkg\npreviousLibraryName=OldLib\n"
	);

	Ok(())
}

#[test]
fn init_force_overwrites_state() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::seed_state(tmp.path());

	common::kmpkit_cmd()
		.arg("init")
		.args(["--package", "com.other", "--library", "Other", "--force"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let state = RenameState::load(&tmp.path().join(".kmpkit/rename.properties"))?;
	assert_eq!(
		state.map(|state| state.package_name),
		Some("com.other".to_string())
	);

	Ok(())
}

#[test]
fn init_rejects_invalid_package_name() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::kmpkit_cmd()
		.arg("init")
		.args(["--package", "com..broken", "--library", "Lib"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("invalid package name"));

	assert!(!tmp.path().join(".kmpkit/rename.properties").exists());

	Ok(())
}

#[test]
fn state_prints_recorded_identifiers() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::seed_state(tmp.path());

	common::kmpkit_cmd()
		.arg("state")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("package:   com.old.pkg"))
		.stdout(predicates::str::contains("library:   OldLib"));

	let output = common::kmpkit_cmd()
		.args(["state", "--format", "json", "--path"])
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());
	let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["package_name"], "com.old.pkg");
	assert_eq!(json["library_name"], "OldLib");

	Ok(())
}

#[test]
fn state_without_record_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::kmpkit_cmd()
		.arg("state")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("no rename state found"));

	Ok(())
}
