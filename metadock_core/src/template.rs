use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::MetadockResult;

/// A template file under `templated_documents/`.
///
/// The source is read from disk on first use and cached for the lifetime of
/// the registry, so templates shared by many schematics are read once.
#[derive(Debug)]
pub struct TemplatedDocument {
	absolute_path: PathBuf,
	relative_path: String,
	content: OnceLock<String>,
}

impl TemplatedDocument {
	fn new(absolute_path: PathBuf, relative_path: String) -> Self {
		Self {
			absolute_path,
			relative_path,
			content: OnceLock::new(),
		}
	}

	/// The template's path relative to the templates directory, with unix
	/// separators.
	pub fn relative_path(&self) -> &str {
		&self.relative_path
	}

	/// The template's absolute path on disk.
	pub fn absolute_path(&self) -> &Path {
		&self.absolute_path
	}

	/// The template source, read lazily.
	pub fn content(&self) -> MetadockResult<&str> {
		if let Some(content) = self.content.get() {
			return Ok(content.as_str());
		}

		let content = std::fs::read_to_string(&self.absolute_path)?;
		Ok(self.content.get_or_init(|| content).as_str())
	}
}

/// All template files discovered under `templated_documents/`, keyed by
/// relative path.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
	templates: BTreeMap<String, TemplatedDocument>,
}

impl TemplateRegistry {
	/// Recursively index every regular file in the templates directory.
	///
	/// Contents are not read here; each template's source is loaded lazily on
	/// first render.
	pub fn scan(templates_dir: &Path) -> MetadockResult<Self> {
		let mut files = Vec::new();
		collect_template_files(templates_dir, &mut files)?;
		// Sort for deterministic ordering.
		files.sort();

		let mut templates = BTreeMap::new();
		for file in files {
			let relative_path = relative_template_key(templates_dir, &file);
			templates.insert(
				relative_path.clone(),
				TemplatedDocument::new(file, relative_path),
			);
		}

		tracing::debug!(count = templates.len(), "indexed templated documents");

		Ok(Self { templates })
	}

	/// Look up a template by its relative path.
	pub fn get(&self, relative_path: &str) -> Option<&TemplatedDocument> {
		self.templates.get(relative_path)
	}

	/// Indexed relative paths in sorted order.
	pub fn paths(&self) -> impl Iterator<Item = &str> {
		self.templates.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.templates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.templates.is_empty()
	}
}

fn collect_template_files(dir: &Path, files: &mut Vec<PathBuf>) -> MetadockResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	let entries = std::fs::read_dir(dir)?;

	for entry in entries {
		let entry = entry?;
		let path = entry.path();

		if path.is_dir() {
			collect_template_files(&path, files)?;
		} else {
			files.push(path);
		}
	}

	Ok(())
}

/// The registry key for a template file: its path relative to the templates
/// directory with `/` separators.
fn relative_template_key(templates_dir: &Path, file: &Path) -> String {
	file.strip_prefix(templates_dir)
		.unwrap_or(file)
		.to_string_lossy()
		.replace('\\', "/")
}
