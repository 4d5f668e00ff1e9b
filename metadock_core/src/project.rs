use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use serde::Serialize;

use crate::MetadockError;
use crate::MetadockResult;
use crate::engine::BuildResult;
use crate::engine::GeneratedDocument;
use crate::engine::compile_schematic;
use crate::engine::write_compiled_target;
use crate::schematic::SchematicRegistry;
use crate::template::TemplateRegistry;

/// Name of the project directory created inside the working directory.
pub const METADOCK_DIR: &str = ".metadock";
/// Subdirectory holding schematic declaration files.
pub const CONTENT_SCHEMATICS_DIR: &str = "content_schematics";
/// Subdirectory holding template files.
pub const TEMPLATED_DOCUMENTS_DIR: &str = "templated_documents";
/// Subdirectory receiving build output.
pub const GENERATED_DOCUMENTS_DIR: &str = "generated_documents";

/// Overall outcome of a project structure validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
	Success,
	Warning,
	Failure,
}

/// Accumulated result of validating a project's directory structure.
///
/// Failures and warnings are collected into one report instead of stopping
/// at the first finding. A report with only warnings still counts as ok.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
	pub status: ValidationStatus,
	pub failures: Vec<String>,
	pub warnings: Vec<String>,
}

impl Default for ValidationReport {
	fn default() -> Self {
		Self {
			status: ValidationStatus::Success,
			failures: Vec::new(),
			warnings: Vec::new(),
		}
	}
}

impl ValidationReport {
	pub fn ok(&self) -> bool {
		matches!(
			self.status,
			ValidationStatus::Success | ValidationStatus::Warning
		)
	}

	fn append_warning(&mut self, warning: impl Into<String>) {
		if self.status == ValidationStatus::Success {
			self.status = ValidationStatus::Warning;
		}
		self.warnings.push(warning.into());
	}

	fn append_failure(&mut self, failure: impl Into<String>) {
		self.status = ValidationStatus::Failure;
		self.failures.push(failure.into());
	}
}

/// A loaded metadock project: the `.metadock` directory plus the schematic
/// and template registries built from it.
///
/// Registries are built once by [`MetadockProject::load`] and immutable
/// afterwards; re-scanning means loading a fresh project.
#[derive(Debug)]
pub struct MetadockProject {
	metadock_directory: PathBuf,
	schematics: SchematicRegistry,
	templates: TemplateRegistry,
}

impl MetadockProject {
	/// Initialize a new project: create `.metadock/` and its three
	/// subdirectories inside `working_directory`, then load the (empty)
	/// project.
	///
	/// Fails if a `.metadock` directory already exists there.
	pub fn init(working_directory: &Path) -> MetadockResult<Self> {
		let metadock_directory = working_directory.join(METADOCK_DIR);

		if metadock_directory.exists() {
			return Err(MetadockError::ProjectAlreadyExists {
				path: working_directory.display().to_string(),
			});
		}

		std::fs::create_dir_all(metadock_directory.join(CONTENT_SCHEMATICS_DIR))?;
		std::fs::create_dir_all(metadock_directory.join(TEMPLATED_DOCUMENTS_DIR))?;
		std::fs::create_dir_all(metadock_directory.join(GENERATED_DOCUMENTS_DIR))?;

		tracing::debug!(path = %metadock_directory.display(), "initialized metadock project");

		Self::load(working_directory)
	}

	/// Load the project rooted at `working_directory/.metadock`, scanning
	/// both registries eagerly.
	///
	/// Fails if the `.metadock` directory is missing. Missing subdirectories
	/// are tolerated here (the registries simply come up empty); `validate`
	/// reports on them.
	pub fn load(working_directory: &Path) -> MetadockResult<Self> {
		let metadock_directory = working_directory.join(METADOCK_DIR);

		if !metadock_directory.is_dir() {
			return Err(MetadockError::MissingProjectDirectory {
				path: working_directory.display().to_string(),
			});
		}

		let schematics = SchematicRegistry::scan(&metadock_directory.join(CONTENT_SCHEMATICS_DIR))?;
		let templates = TemplateRegistry::scan(&metadock_directory.join(TEMPLATED_DOCUMENTS_DIR))?;

		Ok(Self {
			metadock_directory,
			schematics,
			templates,
		})
	}

	/// Validate the directory structure under `working_directory` without
	/// loading registries.
	///
	/// A missing `.metadock` directory is a failure and short-circuits the
	/// rest. Missing `templated_documents/` or `content_schematics/` are
	/// warnings. A missing `generated_documents/` is warned about and
	/// created on the spot.
	pub fn validate(working_directory: &Path) -> ValidationReport {
		let mut report = ValidationReport::default();
		let metadock_directory = working_directory.join(METADOCK_DIR);

		if !metadock_directory.is_dir() {
			report.append_failure(format!(
				"could not find `{METADOCK_DIR}` directory in `{}`",
				working_directory.display()
			));
			return report;
		}

		if !metadock_directory.join(TEMPLATED_DOCUMENTS_DIR).is_dir() {
			report.append_warning(format!(
				"could not find `{METADOCK_DIR}/{TEMPLATED_DOCUMENTS_DIR}` directory; no templates \
				 will be used in compilation"
			));
		}

		if !metadock_directory.join(CONTENT_SCHEMATICS_DIR).is_dir() {
			report.append_warning(format!(
				"could not find `{METADOCK_DIR}/{CONTENT_SCHEMATICS_DIR}` directory; no content \
				 will be used in compilation"
			));
		}

		let generated = metadock_directory.join(GENERATED_DOCUMENTS_DIR);
		if !generated.is_dir() {
			report.append_warning(format!(
				"could not find `{METADOCK_DIR}/{GENERATED_DOCUMENTS_DIR}` directory; creating an \
				 empty directory now"
			));
			if let Err(e) = std::fs::create_dir_all(&generated) {
				report.append_failure(format!(
					"failed to create `{}`: {e}",
					generated.display()
				));
			}
		}

		report
	}

	/// The `.metadock` directory this project is rooted at.
	pub fn metadock_directory(&self) -> &Path {
		&self.metadock_directory
	}

	/// Where build output is written.
	pub fn generated_documents_directory(&self) -> PathBuf {
		self.metadock_directory.join(GENERATED_DOCUMENTS_DIR)
	}

	/// The registered content schematics.
	pub fn schematics(&self) -> &SchematicRegistry {
		&self.schematics
	}

	/// The indexed templated documents.
	pub fn templates(&self) -> &TemplateRegistry {
		&self.templates
	}

	/// Resolve selector globs into a concrete set of schematic names.
	///
	/// Schematic globs match against registered names; template globs match
	/// against each schematic's `template` field. The result is the union of
	/// both match sets. Empty glob lists on both sides yield an empty set —
	/// "no selectors means everything" is a CLI convention layered on top,
	/// not a property of this function.
	pub fn select(
		&self,
		schematic_globs: &[String],
		template_globs: &[String],
	) -> MetadockResult<BTreeSet<String>> {
		let name_set = build_glob_set(schematic_globs)?;
		let template_set = build_glob_set(template_globs)?;

		let mut selected = BTreeSet::new();
		for schematic in self.schematics.iter() {
			if name_set.is_match(&schematic.name) || template_set.is_match(&schematic.template) {
				selected.insert(schematic.name.clone());
			}
		}

		Ok(selected)
	}

	/// Build the requested schematics, or every registered schematic when
	/// `names` is `None`.
	///
	/// Each schematic is compiled once per distinct target format and the
	/// result diffed against the destination file: up-to-date destinations
	/// are classified `unchanged` and not rewritten, so repeated builds are
	/// idempotent. The build is sequential and fails fast on the first
	/// error, leaving documents written by earlier iterations on disk.
	pub fn build(&self, names: Option<&[String]>) -> MetadockResult<BuildResult> {
		let requested: Vec<&str> = match names {
			Some(names) => names.iter().map(String::as_str).collect(),
			None => self.schematics.names().collect(),
		};

		let output_dir = self.generated_documents_directory();
		std::fs::create_dir_all(&output_dir)?;

		let mut result = BuildResult::default();
		for name in requested {
			let Some(schematic) = self.schematics.get(name) else {
				return Err(MetadockError::UnknownSchematic(name.to_string()));
			};

			tracing::debug!(schematic = name, "compiling content schematic");
			let compiled = compile_schematic(schematic, &self.templates)?;

			for target in compiled {
				let file_name = format!("{name}.{}", target.target_format.file_extension());
				let destination = output_dir.join(file_name);
				let status = write_compiled_target(&destination, &target.document)?;

				result.generated_documents.push(GeneratedDocument {
					schematic: name.to_string(),
					target_format: target.target_format.identifier().to_string(),
					path: destination,
					status,
				});
			}
		}

		Ok(result)
	}

	/// Delete the output directory wholesale and recreate it empty.
	///
	/// Not incremental: this is the only way to remove documents written by
	/// earlier builds.
	pub fn clean(&self) -> MetadockResult<()> {
		let output_dir = self.generated_documents_directory();

		match std::fs::remove_dir_all(&output_dir) {
			Ok(()) => {}
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
			Err(e) => return Err(e.into()),
		}
		std::fs::create_dir_all(&output_dir)?;

		tracing::debug!(path = %output_dir.display(), "cleaned generated documents");

		Ok(())
	}
}

/// Build a `GlobSet` from selector patterns, failing loudly on an invalid
/// pattern.
fn build_glob_set(patterns: &[String]) -> MetadockResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| MetadockError::InvalidGlob {
			pattern: pattern.clone(),
			reason: e.to_string(),
		})?;
		builder.add(glob);
	}
	builder
		.build()
		.map_err(|e| MetadockError::InvalidGlob {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		})
}
