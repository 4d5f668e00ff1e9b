use serde_yaml_ng::Mapping;
use serde_yaml_ng::Value;

/// The merge key recognized inside mappings.
pub const MERGE_KEY: &str = "<<";

/// Recursively flatten `<<` merge keys in a YAML value.
///
/// A mapping may splice another mapping into itself under the `<<` key:
///
/// ```yaml
/// base: &base
///   color: blue
///   size: small
///
/// derived:
///   <<: *base
///   size: large
/// ```
///
/// After flattening, `derived` is `{ color: blue, size: large }`. The rules
/// are:
///
/// - Literal sibling keys always override entries spliced from the merge
///   value, no matter where the `<<` key appears in the mapping.
/// - A sequence-valued `<<` splices each mapping element in order, so later
///   elements override earlier ones.
/// - A `<<` whose value is neither a mapping nor a sequence of mappings
///   contributes nothing.
///
/// Nested values are flattened first, so a merge value which itself contains
/// `<<` keys is fully resolved before it is spliced. The function is total
/// and idempotent.
pub fn flatten_merge_keys(value: Value) -> Value {
	match value {
		Value::Mapping(mapping) => flatten_mapping(mapping),
		Value::Sequence(items) => Value::Sequence(items.into_iter().map(flatten_merge_keys).collect()),
		Value::Tagged(mut tagged) => {
			tagged.value = flatten_merge_keys(std::mem::take(&mut tagged.value));
			Value::Tagged(tagged)
		}
		other => other,
	}
}

fn flatten_mapping(mapping: Mapping) -> Value {
	let mut flattened = Mapping::new();
	let mut literal = Mapping::new();

	for (key, value) in mapping {
		let value = flatten_merge_keys(value);
		if key.as_str() == Some(MERGE_KEY) {
			splice_merge_value(&mut flattened, value);
		} else {
			literal.insert(key, value);
		}
	}

	// Literal keys land after every spliced entry so they always win.
	for (key, value) in literal {
		flattened.insert(key, value);
	}

	Value::Mapping(flattened)
}

fn splice_merge_value(target: &mut Mapping, source: Value) {
	match source {
		Value::Mapping(entries) => {
			for (key, value) in entries {
				target.insert(key, value);
			}
		}
		Value::Sequence(sources) => {
			for source in sources {
				if let Value::Mapping(entries) = source {
					for (key, value) in entries {
						target.insert(key, value);
					}
				}
			}
		}
		// Scalars, nulls, and tagged values under `<<` carry nothing.
		_ => {}
	}
}

/// Navigate a dot-delimited key path through nested mappings.
///
/// Returns the value at the path, or `Err` with the first segment that has
/// no entry. Segments only descend through mappings, so hitting a scalar or
/// sequence partway fails on the next segment.
pub fn navigate_key_path<'a>(value: &'a Value, key_path: &str) -> Result<&'a Value, String> {
	let mut current = value;

	for segment in key_path.split('.') {
		match current.get(segment) {
			Some(next) => current = next,
			None => return Err(segment.to_string()),
		}
	}

	Ok(current)
}
