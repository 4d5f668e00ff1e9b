use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde_yaml_ng::Mapping;
use serde_yaml_ng::Value;

use crate::MetadockError;
use crate::MetadockResult;
use crate::import::ImportResolver;
use crate::value::flatten_merge_keys;

/// Top-level key under which declaration files list their schematics.
const CONTENT_SCHEMATICS_KEY: &str = "content_schematics";

/// A fully resolved content schematic: one named document definition with
/// the template it renders and the formats it renders into.
#[derive(Debug, Clone)]
pub struct ContentSchematic {
	/// Globally unique name, also the stem of every generated document.
	pub name: String,
	/// Template path relative to `templated_documents/`.
	pub template: String,
	/// Target format identifiers in declaration order.
	pub target_formats: Vec<String>,
	/// Render context with every merge key and import marker resolved.
	pub context: Value,
	/// The declaration file this schematic came from.
	pub file: PathBuf,
}

impl ContentSchematic {
	/// Collect every content schematic declared in a single YAML file.
	///
	/// The document is merge-flattened as a whole (so declarations may splice
	/// shared fragments with `<<`), then each entry of the top-level
	/// `content_schematics` sequence is read. `name`, `template`, and
	/// `target_formats` are taken literally; `context` additionally has its
	/// import markers resolved. A file without the top-level key contributes
	/// nothing.
	pub fn collect_from_file(
		path: &Path,
		resolver: &mut ImportResolver,
	) -> MetadockResult<Vec<Self>> {
		let content = std::fs::read_to_string(path)?;
		let parsed: Value =
			serde_yaml_ng::from_str(&content).map_err(|e| MetadockError::SchematicParse {
				path: path.display().to_string(),
				reason: e.to_string(),
			})?;
		let flattened = flatten_merge_keys(parsed);

		let Some(declarations) = flattened.get(CONTENT_SCHEMATICS_KEY) else {
			return Ok(Vec::new());
		};
		let Some(declarations) = declarations.as_sequence() else {
			return Err(MetadockError::SchematicParse {
				path: path.display().to_string(),
				reason: format!("`{CONTENT_SCHEMATICS_KEY}` must be a sequence"),
			});
		};

		declarations
			.iter()
			.map(|declaration| Self::from_declaration(path, declaration, resolver))
			.collect()
	}

	fn from_declaration(
		path: &Path,
		declaration: &Value,
		resolver: &mut ImportResolver,
	) -> MetadockResult<Self> {
		let name = required_string(path, declaration, "name")?;
		let template = required_string(path, declaration, "template")?;
		let target_formats = required_string_sequence(path, declaration, "target_formats")?;

		let context = declaration
			.get("context")
			.cloned()
			.unwrap_or_else(|| Value::Mapping(Mapping::new()));
		let context = resolver.resolve(path, context)?;

		Ok(Self {
			name,
			template,
			target_formats,
			context,
			file: path.to_path_buf(),
		})
	}
}

fn required_string(path: &Path, declaration: &Value, key: &str) -> MetadockResult<String> {
	declaration
		.get(key)
		.and_then(Value::as_str)
		.map(str::to_string)
		.ok_or_else(|| MetadockError::MissingRequiredKey {
			path: path.display().to_string(),
			key: key.to_string(),
		})
}

fn required_string_sequence(
	path: &Path,
	declaration: &Value,
	key: &str,
) -> MetadockResult<Vec<String>> {
	let entries = declaration
		.get(key)
		.and_then(Value::as_sequence)
		.filter(|entries| !entries.is_empty())
		.ok_or_else(|| MetadockError::MissingRequiredKey {
			path: path.display().to_string(),
			key: key.to_string(),
		})?;

	entries
		.iter()
		.map(|entry| {
			entry
				.as_str()
				.map(str::to_string)
				.ok_or_else(|| MetadockError::SchematicParse {
					path: path.display().to_string(),
					reason: format!("`{key}` entries must be strings"),
				})
		})
		.collect()
}

/// All content schematics discovered under `content_schematics/`, keyed by
/// name.
#[derive(Debug, Default)]
pub struct SchematicRegistry {
	schematics: BTreeMap<String, ContentSchematic>,
}

impl SchematicRegistry {
	/// Recursively scan a directory tree of `*.yml` / `*.yaml` declaration
	/// files and register every schematic found.
	///
	/// Schematic names are globally unique: a second declaration of the same
	/// name anywhere in the tree fails the whole scan, naming both files.
	pub fn scan(schematics_dir: &Path) -> MetadockResult<Self> {
		let mut files = Vec::new();
		collect_declaration_files(schematics_dir, &mut files)?;
		// Sort for deterministic ordering.
		files.sort();

		let mut resolver = ImportResolver::new(schematics_dir);
		let mut schematics: BTreeMap<String, ContentSchematic> = BTreeMap::new();

		for file in &files {
			for schematic in ContentSchematic::collect_from_file(file, &mut resolver)? {
				if let Some(existing) = schematics.get(&schematic.name) {
					return Err(MetadockError::DuplicateSchematic {
						name: schematic.name.clone(),
						first_file: existing.file.display().to_string(),
						second_file: schematic.file.display().to_string(),
					});
				}

				schematics.insert(schematic.name.clone(), schematic);
			}
		}

		tracing::debug!(count = schematics.len(), "registered content schematics");

		Ok(Self { schematics })
	}

	/// Look up a schematic by name.
	pub fn get(&self, name: &str) -> Option<&ContentSchematic> {
		self.schematics.get(name)
	}

	/// Registered names in sorted order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.schematics.keys().map(String::as_str)
	}

	/// Registered schematics in name order.
	pub fn iter(&self) -> impl Iterator<Item = &ContentSchematic> {
		self.schematics.values()
	}

	pub fn len(&self) -> usize {
		self.schematics.len()
	}

	pub fn is_empty(&self) -> bool {
		self.schematics.is_empty()
	}
}

fn collect_declaration_files(dir: &Path, files: &mut Vec<PathBuf>) -> MetadockResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	let entries = std::fs::read_dir(dir)?;

	for entry in entries {
		let entry = entry?;
		let path = entry.path();

		if path.is_dir() {
			collect_declaration_files(&path, files)?;
		} else if is_declaration_file(&path) {
			files.push(path);
		}
	}

	Ok(())
}

/// Check if a file is a schematic declaration file.
fn is_declaration_file(path: &Path) -> bool {
	let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
		return false;
	};

	matches!(ext, "yml" | "yaml")
}
