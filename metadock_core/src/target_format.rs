use crate::MetadockError;
use crate::MetadockResult;

/// How rendered output is post-processed before being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetFormatKind {
	/// Convert markdown (including GFM tables) to HTML.
	MarkdownToHtml,
	/// Write the rendered output untouched.
	Plaintext,
}

/// A target format: the identifier declared in `target_formats`, the file
/// extension it writes, and the post-processing it applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFormat {
	identifier: String,
	file_extension: String,
	kind: TargetFormatKind,
}

impl TargetFormat {
	/// Look up the handler for a format identifier.
	///
	/// Identifiers without a registered handler fall back to plaintext
	/// passthrough, with the identifier itself as the file extension — so
	/// `target_formats: [ txt ]` writes `<name>.txt` verbatim without any
	/// format needing to be declared anywhere.
	pub fn for_identifier(identifier: &str) -> Self {
		match identifier {
			"md+html" => Self {
				identifier: identifier.to_string(),
				file_extension: "html".to_string(),
				kind: TargetFormatKind::MarkdownToHtml,
			},
			_ => Self {
				identifier: identifier.to_string(),
				file_extension: identifier.to_string(),
				kind: TargetFormatKind::Plaintext,
			},
		}
	}

	pub fn identifier(&self) -> &str {
		&self.identifier
	}

	pub fn file_extension(&self) -> &str {
		&self.file_extension
	}

	/// Post-process a rendered document into its final written form.
	pub fn apply(&self, rendered: String) -> MetadockResult<String> {
		match self.kind {
			TargetFormatKind::MarkdownToHtml => {
				markdown::to_html_with_options(&rendered, &markdown::Options::gfm()).map_err(|e| {
					MetadockError::TargetFormat {
						identifier: self.identifier.clone(),
						reason: e.to_string(),
					}
				})
			}
			TargetFormatKind::Plaintext => Ok(rendered),
		}
	}
}
