mod common;

use metadock_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

#[test]
fn build_writes_then_rebuild_is_unchanged() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_sample_project(tmp.path())?;

	common::metadock_cmd()
		.arg("build")
		.arg("--project-dir")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("new"))
		.stdout(predicates::str::contains("2 document(s) written, 0 unchanged"));

	let generated = tmp
		.path()
		.join(".metadock/generated_documents/greeting_letter.md");
	let first_pass = std::fs::read_to_string(&generated)?;
	assert_eq!(first_pass, "Dear World,\n\nHello from metadock.\n");

	// Nothing changed, so the rebuild performs no writes.
	common::metadock_cmd()
		.arg("build")
		.arg("--project-dir")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("0 document(s) written, 2 unchanged"));

	// An out-of-band edit is detected as updated and overwritten.
	std::fs::write(&generated, "tampered")?;
	common::metadock_cmd()
		.arg("build")
		.arg("--project-dir")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("updated"))
		.stdout(predicates::str::contains("1 document(s) written, 1 unchanged"));

	assert_eq!(std::fs::read_to_string(&generated)?, first_pass);

	Ok(())
}

#[test]
fn build_with_schematic_selector() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_sample_project(tmp.path())?;

	common::metadock_cmd()
		.arg("build")
		.arg("--project-dir")
		.arg(tmp.path())
		.arg("-s")
		.arg("greeting_*")
		.assert()
		.success()
		.stdout(predicates::str::contains("greeting_letter.md"))
		.stdout(predicates::str::contains("farewell_letter").not());

	let output_dir = tmp.path().join(".metadock/generated_documents");
	assert!(output_dir.join("greeting_letter.md").is_file());
	assert!(!output_dir.join("farewell_letter.md").exists());

	Ok(())
}

#[test]
fn build_reports_json() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_sample_project(tmp.path())?;

	let assert = common::metadock_cmd()
		.arg("build")
		.arg("--project-dir")
		.arg(tmp.path())
		.arg("--format")
		.arg("json")
		.assert()
		.success();

	let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
	let value: serde_json::Value = serde_json::from_str(&stdout)?;
	let documents = value["generated_documents"]
		.as_array()
		.expect("generated_documents should be an array");
	assert_eq!(documents.len(), 2);
	assert_eq!(documents[0]["status"], "new");

	Ok(())
}

#[test]
fn build_fails_on_missing_project() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::metadock_cmd()
		.arg("build")
		.arg("--project-dir")
		.arg(tmp.path())
		.assert()
		.failure()
		.code(2)
		.stderr(predicates::str::contains(".metadock"));

	Ok(())
}

#[test]
fn clean_empties_generated_documents() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_sample_project(tmp.path())?;

	common::metadock_cmd()
		.arg("build")
		.arg("--project-dir")
		.arg(tmp.path())
		.assert()
		.success();

	common::metadock_cmd()
		.arg("clean")
		.arg("--project-dir")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Cleaned directory"));

	let output_dir = tmp.path().join(".metadock/generated_documents");
	assert!(output_dir.is_dir());
	assert_eq!(std::fs::read_dir(&output_dir)?.count(), 0);

	Ok(())
}
