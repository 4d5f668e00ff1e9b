use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use serde_yaml_ng::Mapping;
use serde_yaml_ng::Value;

use crate::MetadockError;
use crate::MetadockResult;
use crate::value::flatten_merge_keys;
use crate::value::navigate_key_path;

/// The key naming the file an import marker pulls in.
const IMPORT_KEY: &str = "import";
/// The optional key selecting a dotted path inside the imported document.
const PROJECTION_KEY: &str = "key";

/// Resolves import markers against files under the content schematics
/// directory.
///
/// An import marker is a mapping whose keys are exactly `{ import }` or
/// `{ import, key }`:
///
/// ```yaml
/// palette:
///   import: shared/colors.yml
///   key: palettes.default
/// ```
///
/// The referenced file is parsed, merge-flattened, and recursively resolved
/// before the optional `key` projection is applied, so imports may themselves
/// import. Fully resolved documents are cached by canonical path, and the
/// chain of in-progress files is tracked so a cyclic import fails instead of
/// recursing forever.
pub struct ImportResolver {
	root: PathBuf,
	canonical_root: PathBuf,
	cache: HashMap<PathBuf, Value>,
	in_progress: Vec<PathBuf>,
}

impl ImportResolver {
	/// Create a resolver rooted at the content schematics directory.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		let root = root.into();
		let canonical_root = root.canonicalize().unwrap_or_else(|_| root.clone());

		Self {
			root,
			canonical_root,
			cache: HashMap::new(),
			in_progress: Vec::new(),
		}
	}

	/// Recursively replace every import marker in `value` with the imported
	/// content. `source` names the document the value came from and is only
	/// used in error messages.
	pub fn resolve(&mut self, source: &Path, value: Value) -> MetadockResult<Value> {
		match value {
			Value::Mapping(mapping) => {
				if is_import_marker(&mapping) {
					self.resolve_marker(source, &mapping)
				} else {
					let mut resolved = Mapping::new();
					for (key, value) in mapping {
						resolved.insert(key, self.resolve(source, value)?);
					}
					Ok(Value::Mapping(resolved))
				}
			}
			Value::Sequence(items) => {
				let resolved: MetadockResult<Vec<Value>> = items
					.into_iter()
					.map(|item| self.resolve(source, item))
					.collect();
				Ok(Value::Sequence(resolved?))
			}
			Value::Tagged(mut tagged) => {
				tagged.value = self.resolve(source, std::mem::take(&mut tagged.value))?;
				Ok(Value::Tagged(tagged))
			}
			other => Ok(other),
		}
	}

	fn resolve_marker(&mut self, source: &Path, marker: &Mapping) -> MetadockResult<Value> {
		let import_path = match marker.get(IMPORT_KEY) {
			Some(Value::String(path)) => path.clone(),
			_ => {
				return Err(MetadockError::ImportMalformed {
					referrer: source.display().to_string(),
					reason: "`import` must be a string path".to_string(),
				});
			}
		};
		let projection = match marker.get(PROJECTION_KEY) {
			None => None,
			Some(Value::String(key)) => Some(key.clone()),
			Some(_) => {
				return Err(MetadockError::ImportMalformed {
					referrer: source.display().to_string(),
					reason: "`key` must be a dotted string path".to_string(),
				});
			}
		};

		let document = self.load_document(source, &import_path)?;

		match projection {
			None => Ok(document),
			Some(key) => match navigate_key_path(&document, &key) {
				Ok(value) => Ok(value.clone()),
				Err(segment) => Err(MetadockError::ImportKeyNotFound {
					key,
					segment,
					path: import_path,
				}),
			},
		}
	}

	/// Load, flatten, and fully resolve an imported file, consulting the
	/// cache first.
	fn load_document(&mut self, source: &Path, import_path: &str) -> MetadockResult<Value> {
		let target = self.root.join(import_path);

		if !target.exists() {
			return Err(MetadockError::ImportTargetMissing {
				path: import_path.to_string(),
				referrer: source.display().to_string(),
			});
		}

		if !target.is_file() {
			return Err(MetadockError::ImportTargetNotAFile {
				path: import_path.to_string(),
				referrer: source.display().to_string(),
			});
		}

		let canonical = target.canonicalize()?;

		if let Some(cached) = self.cache.get(&canonical) {
			return Ok(cached.clone());
		}

		if self.in_progress.contains(&canonical) {
			let mut chain: Vec<String> = self
				.in_progress
				.iter()
				.map(|path| self.display_path(path))
				.collect();
			chain.push(self.display_path(&canonical));
			return Err(MetadockError::CyclicImport {
				chain: chain.join(" -> "),
			});
		}

		tracing::debug!(path = %target.display(), "resolving import");

		let content = std::fs::read_to_string(&target)?;
		let parsed: Value =
			serde_yaml_ng::from_str(&content).map_err(|e| MetadockError::SchematicParse {
				path: import_path.to_string(),
				reason: e.to_string(),
			})?;
		let flattened = flatten_merge_keys(parsed);

		self.in_progress.push(canonical.clone());
		let resolved = self.resolve(&target, flattened);
		self.in_progress.pop();
		let resolved = resolved?;

		self.cache.insert(canonical, resolved.clone());
		Ok(resolved)
	}

	fn display_path(&self, path: &Path) -> String {
		path.strip_prefix(&self.canonical_root)
			.unwrap_or(path)
			.display()
			.to_string()
	}
}

fn is_import_marker(mapping: &Mapping) -> bool {
	if !mapping.contains_key(IMPORT_KEY) {
		return false;
	}

	mapping
		.keys()
		.all(|key| matches!(key.as_str(), Some(IMPORT_KEY | PROJECTION_KEY)))
}
