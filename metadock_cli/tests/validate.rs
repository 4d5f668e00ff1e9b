mod common;

use metadock_core::AnyEmptyResult;

#[test]
fn validate_fails_without_project_directory() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::metadock_cmd()
		.arg("validate")
		.arg("--project-dir")
		.arg(tmp.path())
		.assert()
		.failure()
		.code(1)
		.stderr(predicates::str::contains("Project validation failed"))
		.stderr(predicates::str::contains("(!)"));

	Ok(())
}

#[test]
fn validate_warns_and_creates_missing_output_directory() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let root = tmp.path().join(".metadock");
	std::fs::create_dir_all(root.join("content_schematics"))?;
	std::fs::create_dir_all(root.join("templated_documents"))?;

	common::metadock_cmd()
		.arg("validate")
		.arg("--project-dir")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Project validation succeeded with 1 warning(s)!",
		))
		.stdout(predicates::str::contains("generated_documents"));

	assert!(root.join("generated_documents").is_dir());

	Ok(())
}
