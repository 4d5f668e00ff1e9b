mod common;

use metadock_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

#[test]
fn list_without_selectors_shows_everything() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_sample_project(tmp.path())?;

	common::metadock_cmd()
		.arg("list")
		.arg("--project-dir")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"List picked up the following content schematics:",
		))
		.stdout(predicates::str::contains("- greeting_letter"))
		.stdout(predicates::str::contains("- farewell_letter"));

	Ok(())
}

#[test]
fn list_with_name_glob_filters() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_sample_project(tmp.path())?;

	common::metadock_cmd()
		.arg("list")
		.arg("--project-dir")
		.arg(tmp.path())
		.arg("-s")
		.arg("farewell_*")
		.assert()
		.success()
		.stdout(predicates::str::contains("- farewell_letter"))
		.stdout(predicates::str::contains("greeting_letter").not());

	Ok(())
}

#[test]
fn list_with_template_glob_matches_template_field() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_sample_project(tmp.path())?;

	common::metadock_cmd()
		.arg("list")
		.arg("--project-dir")
		.arg(tmp.path())
		.arg("-t")
		.arg("letter.*")
		.assert()
		.success()
		.stdout(predicates::str::contains("- greeting_letter"))
		.stdout(predicates::str::contains("- farewell_letter"));

	Ok(())
}

#[test]
fn list_reports_json() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_sample_project(tmp.path())?;

	let assert = common::metadock_cmd()
		.arg("list")
		.arg("--project-dir")
		.arg(tmp.path())
		.arg("--format")
		.arg("json")
		.assert()
		.success();

	let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
	let names: Vec<String> = serde_json::from_str(&stdout)?;
	assert_eq!(names, vec!["farewell_letter", "greeting_letter"]);

	Ok(())
}

#[test]
fn list_rejects_invalid_glob() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_sample_project(tmp.path())?;

	common::metadock_cmd()
		.arg("list")
		.arg("--project-dir")
		.arg(tmp.path())
		.arg("-s")
		.arg("broken[")
		.assert()
		.failure()
		.code(2)
		.stderr(predicates::str::contains("invalid selector glob"));

	Ok(())
}
