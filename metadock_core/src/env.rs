use std::collections::BTreeMap;

use minijinja::Environment;
use minijinja::Error;
use minijinja::Value;
use minijinja::value::Kwargs;
use minijinja::value::Rest;

/// Install the helper environment into a fresh rendering environment.
///
/// Helpers are registered as globals, so a context key with the same name
/// shadows its helper for that render. The `md` and `html` namespaces are
/// plain value maps whose entries are callable, e.g.
/// `{{ md.list(fruits) }}` or `{{ html.bold("hi") }}`.
pub fn install_helpers(env: &mut Environment<'_>) {
	env.add_global("md", markdown_namespace());
	env.add_global("html", html_namespace());
	env.add_function("debug", debug);
	env.add_filter("with_prefix", with_prefix);
	env.add_filter("with_suffix", with_suffix);
	env.add_filter("zip", zip_sequences);
	env.add_filter("chain", chain_sequences);
}

fn markdown_namespace() -> Value {
	let mut helpers: BTreeMap<&str, Value> = BTreeMap::new();
	helpers.insert("blockquote", Value::from_function(md_blockquote));
	helpers.insert("code", Value::from_function(md_code));
	helpers.insert("codeblock", Value::from_function(md_codeblock));
	helpers.insert("list", Value::from_function(md_list));
	helpers.insert("tablerow", Value::from_function(md_tablerow));
	helpers.insert("tablehead", Value::from_function(md_tablehead));
	Value::from(helpers)
}

fn html_namespace() -> Value {
	let mut helpers: BTreeMap<&str, Value> = BTreeMap::new();
	helpers.insert("bold", Value::from_function(html_bold));
	helpers.insert("italics", Value::from_function(html_italics));
	helpers.insert("code", Value::from_function(html_code));
	helpers.insert("underline", Value::from_function(html_underline));
	Value::from(helpers)
}

/// Print a message to stdout during rendering and leave no trace in the
/// document.
fn debug(message: Value) -> String {
	println!("{message}");
	String::new()
}

/// Prefix every line with `"> "`, turning already-quoted text into a nested
/// quote.
fn md_blockquote(text: Value) -> String {
	text.to_string()
		.split('\n')
		.map(|line| format!("> {line}"))
		.collect::<Vec<_>>()
		.join("\n")
}

fn md_code(text: Value) -> String {
	format!("`{text}`")
}

/// Wrap text in a fenced code block. The optional `language` kwarg becomes
/// the fence info string; a trailing newline in the text is not doubled
/// before the closing fence.
fn md_codeblock(text: Value, kwargs: Kwargs) -> Result<String, Error> {
	let language = kwargs.get::<Option<String>>("language")?.unwrap_or_default();
	kwargs.assert_all_used()?;

	let text = text.to_string();
	Ok(format!("```{language}\n{}\n```", text.trim_end_matches('\n')))
}

/// Render items as a bullet list. A single sequence argument is expanded
/// into its items. An item that is itself a rendered list is indented two
/// spaces, nesting it under the previous bullet.
fn md_list(items: Rest<Value>) -> String {
	let mut flattened: Vec<Value> = Vec::new();

	if items.len() == 1 && items[0].as_str().is_none() {
		match items[0].try_iter() {
			Ok(iter) => flattened.extend(iter),
			Err(_) => flattened.push(items[0].clone()),
		}
	} else {
		flattened.extend(items.iter().cloned());
	}

	let lines: Vec<String> = flattened
		.iter()
		.map(|item| {
			let item = item.to_string();
			if item.starts_with("- ") {
				indent_lines(&item, "  ")
			} else {
				format!("- {item}")
			}
		})
		.collect();

	lines.join("\n")
}

fn md_tablerow(cells: Rest<Value>) -> String {
	format!("| {} |", join_cells(&cells))
}

/// Render a table header row followed by its `---` separator row. The
/// `bold` kwarg wraps each header cell in `<b>` tags.
fn md_tablehead(cells: Rest<Value>, kwargs: Kwargs) -> Result<String, Error> {
	let bold = kwargs.get::<Option<bool>>("bold")?.unwrap_or(false);
	kwargs.assert_all_used()?;

	let head = if bold {
		let cells: Vec<String> = cells.iter().map(|cell| format!("<b>{cell}</b>")).collect();
		format!("| {} |", cells.join(" | "))
	} else {
		format!("| {} |", join_cells(&cells))
	};
	let separator = format!("| {} |", vec!["---"; cells.len()].join(" | "));

	Ok(format!("{head}\n{separator}"))
}

fn html_bold(text: Value) -> String {
	format!("<b>{text}</b>")
}

fn html_italics(text: Value) -> String {
	format!("<i>{text}</i>")
}

fn html_code(text: Value) -> String {
	format!("<code>{text}</code>")
}

fn html_underline(text: Value) -> String {
	format!("<u>{text}</u>")
}

fn with_prefix(value: Value, prefix: String) -> String {
	format!("{prefix}{value}")
}

fn with_suffix(value: Value, suffix: String) -> String {
	format!("{value}{suffix}")
}

/// Zip sequences element-wise, stopping at the shortest.
fn zip_sequences(value: Value, others: Rest<Value>) -> Result<Value, Error> {
	let mut columns: Vec<Vec<Value>> = Vec::new();
	columns.push(value.try_iter()?.collect());
	for other in others.iter() {
		columns.push(other.try_iter()?.collect());
	}

	let rows = columns.iter().map(Vec::len).min().unwrap_or(0);
	let zipped: Vec<Value> = (0..rows)
		.map(|row| {
			Value::from(
				columns
					.iter()
					.map(|column| column[row].clone())
					.collect::<Vec<_>>(),
			)
		})
		.collect();

	Ok(Value::from(zipped))
}

/// Flatten one level of nested sequences. Strings chain as whole items, not
/// character by character.
fn chain_sequences(value: Value) -> Result<Value, Error> {
	let mut flattened: Vec<Value> = Vec::new();

	for item in value.try_iter()? {
		if item.as_str().is_some() {
			flattened.push(item);
			continue;
		}

		let inner: Option<Vec<Value>> = item.try_iter().ok().map(Iterator::collect);
		match inner {
			Some(values) => flattened.extend(values),
			None => flattened.push(item),
		}
	}

	Ok(Value::from(flattened))
}

fn indent_lines(text: &str, indent: &str) -> String {
	text.split('\n')
		.map(|line| format!("{indent}{line}"))
		.collect::<Vec<_>>()
		.join("\n")
}

fn join_cells(cells: &[Value]) -> String {
	cells
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join(" | ")
}
