use std::path::Path;

use assert_cmd::Command;
use metadock_core::AnyEmptyResult;

pub fn metadock_cmd() -> Command {
	let mut cmd = Command::cargo_bin("metadock").expect("metadock binary should build");
	cmd.env("NO_COLOR", "1");
	cmd
}

/// Write a `.metadock` project with one template and two schematics
/// (`greeting_letter` and `farewell_letter`) into `working_dir`.
#[allow(dead_code)]
pub fn write_sample_project(working_dir: &Path) -> AnyEmptyResult {
	let root = working_dir.join(".metadock");
	std::fs::create_dir_all(root.join("templated_documents"))?;
	std::fs::create_dir_all(root.join("content_schematics"))?;
	std::fs::create_dir_all(root.join("generated_documents"))?;

	std::fs::write(
		root.join("templated_documents/letter.md"),
		"Dear {{ recipient }},\n\n{{ body }}\n",
	)?;
	std::fs::write(
		root.join("content_schematics/letters.yml"),
		"content_schematics:\n- name: greeting_letter\n  template: letter.md\n  target_formats: \
		 [ md ]\n  context:\n    recipient: World\n    body: Hello from metadock.\n- name: \
		 farewell_letter\n  template: letter.md\n  target_formats: [ md ]\n  context:\n    \
		 recipient: World\n    body: Goodbye from metadock.\n",
	)?;

	Ok(())
}
