use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use serde_yaml_ng::Value;

use crate::MetadockError;
use crate::MetadockResult;
use crate::env::install_helpers;
use crate::schematic::ContentSchematic;
use crate::target_format::TargetFormat;
use crate::template::TemplateRegistry;

/// Lifecycle of one generated document within a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
	/// The destination did not exist before this build.
	New,
	/// The destination already matched the compiled output byte for byte, so
	/// no write was performed.
	Unchanged,
	/// The destination existed with different content and was rewritten.
	Updated,
}

impl BuildStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::New => "new",
			Self::Unchanged => "unchanged",
			Self::Updated => "updated",
		}
	}
}

/// One document produced (or confirmed up to date) by a build.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDocument {
	/// Name of the schematic the document came from.
	pub schematic: String,
	/// The target format identifier that produced it.
	pub target_format: String,
	/// Destination path under `generated_documents/`.
	pub path: PathBuf,
	/// What happened to the destination.
	pub status: BuildStatus,
}

/// Result of building a set of schematics, in build order.
#[derive(Debug, Default, Serialize)]
pub struct BuildResult {
	pub generated_documents: Vec<GeneratedDocument>,
}

impl BuildResult {
	/// Number of documents actually written (new or updated).
	pub fn written_count(&self) -> usize {
		self.generated_documents
			.iter()
			.filter(|document| document.status != BuildStatus::Unchanged)
			.count()
	}

	/// Number of documents left untouched.
	pub fn unchanged_count(&self) -> usize {
		self.generated_documents.len() - self.written_count()
	}
}

/// A schematic rendered and post-processed for one target format.
#[derive(Debug)]
pub struct CompiledTarget {
	pub target_format: TargetFormat,
	pub document: String,
}

/// Render a template source with the given context through minijinja.
///
/// The helper environment is installed as globals, so context keys of the
/// same name shadow the helpers for this render. Undefined variables render
/// as empty strings.
pub fn render_template(name: &str, source: &str, context: &Value) -> MetadockResult<String> {
	let mut env = minijinja::Environment::new();
	env.set_keep_trailing_newline(true);
	env.set_undefined_behavior(minijinja::UndefinedBehavior::Chainable);
	install_helpers(&mut env);

	env.add_template(name, source)
		.map_err(|e| MetadockError::TemplateParse {
			template: name.to_string(),
			reason: e.to_string(),
		})?;

	let template = env
		.get_template(name)
		.map_err(|e| MetadockError::TemplateParse {
			template: name.to_string(),
			reason: e.to_string(),
		})?;

	let ctx = minijinja::Value::from_serialize(context);
	template
		.render(ctx)
		.map_err(|e| MetadockError::TemplateRender {
			template: name.to_string(),
			reason: e.to_string(),
		})
}

/// Compile a schematic into one post-processed document per distinct target
/// format.
///
/// The template is rendered once; each target format then post-processes the
/// rendered output. A format identifier repeated in `target_formats`
/// compiles only once.
pub fn compile_schematic(
	schematic: &ContentSchematic,
	templates: &TemplateRegistry,
) -> MetadockResult<Vec<CompiledTarget>> {
	let Some(template) = templates.get(&schematic.template) else {
		return Err(MetadockError::UnknownTemplate {
			schematic: schematic.name.clone(),
			template: schematic.template.clone(),
		});
	};

	let source = template.content()?;
	let rendered = render_template(&schematic.template, source, &schematic.context)?;

	let mut compiled: Vec<CompiledTarget> = Vec::new();
	for identifier in &schematic.target_formats {
		if compiled
			.iter()
			.any(|target| target.target_format.identifier() == identifier)
		{
			continue;
		}

		let target_format = TargetFormat::for_identifier(identifier);
		let document = target_format.apply(rendered.clone())?;
		compiled.push(CompiledTarget {
			target_format,
			document,
		});
	}

	Ok(compiled)
}

/// Write a compiled document to its destination, classifying it against what
/// is already on disk. Up-to-date destinations are left untouched.
pub fn write_compiled_target(destination: &Path, document: &str) -> MetadockResult<BuildStatus> {
	let status = classify_destination(destination, document.as_bytes())?;

	match status {
		BuildStatus::Unchanged => {}
		BuildStatus::New | BuildStatus::Updated => {
			std::fs::write(destination, document)?;
			tracing::debug!(
				path = %destination.display(),
				status = status.as_str(),
				"wrote generated document"
			);
		}
	}

	Ok(status)
}

fn classify_destination(destination: &Path, compiled: &[u8]) -> MetadockResult<BuildStatus> {
	match std::fs::read(destination) {
		Ok(existing) if existing == compiled => Ok(BuildStatus::Unchanged),
		Ok(_) => Ok(BuildStatus::Updated),
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BuildStatus::New),
		Err(e) => Err(e.into()),
	}
}
