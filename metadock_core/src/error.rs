use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum MetadockError {
	#[error(transparent)]
	#[diagnostic(code(metadock::io_error))]
	Io(#[from] std::io::Error),

	#[error("no `.metadock` project directory found in `{path}`")]
	#[diagnostic(
		code(metadock::missing_project_directory),
		help("run `metadock init` to create a project here")
	)]
	MissingProjectDirectory { path: String },

	#[error("a `.metadock` project directory already exists in `{path}`")]
	#[diagnostic(
		code(metadock::project_already_exists),
		help("remove the existing `.metadock` directory to re-initialize")
	)]
	ProjectAlreadyExists { path: String },

	#[error("failed to parse `{path}`: {reason}")]
	#[diagnostic(code(metadock::schematic_parse))]
	SchematicParse { path: String, reason: String },

	#[error("content schematic in `{path}` is missing required key `{key}`")]
	#[diagnostic(
		code(metadock::missing_required_key),
		help("every content schematic needs `name`, `template`, and a non-empty `target_formats` list")
	)]
	MissingRequiredKey { path: String, key: String },

	#[error("duplicate content schematic `{name}`: defined in `{first_file}` and `{second_file}`")]
	#[diagnostic(
		code(metadock::duplicate_schematic),
		help("each content schematic name must be unique across the project")
	)]
	DuplicateSchematic {
		name: String,
		first_file: String,
		second_file: String,
	},

	#[error("invalid selector glob `{pattern}`: {reason}")]
	#[diagnostic(
		code(metadock::invalid_glob),
		help("selector globs use shell syntax, e.g. `gallery_*` or `*.md`")
	)]
	InvalidGlob { pattern: String, reason: String },

	#[error("import target `{path}` referenced from `{referrer}` does not exist")]
	#[diagnostic(
		code(metadock::import_target_missing),
		help("import paths are resolved relative to `.metadock/content_schematics/`")
	)]
	ImportTargetMissing { path: String, referrer: String },

	#[error("import target `{path}` referenced from `{referrer}` is not a file")]
	#[diagnostic(code(metadock::import_target_not_a_file))]
	ImportTargetNotAFile { path: String, referrer: String },

	#[error("malformed import in `{referrer}`: {reason}")]
	#[diagnostic(
		code(metadock::import_malformed),
		help("an import marker is `{{ import: <path> }}` or `{{ import: <path>, key: <dotted.path> }}`")
	)]
	ImportMalformed { referrer: String, reason: String },

	#[error("key path `{key}` not found in import `{path}`: no entry for segment `{segment}`")]
	#[diagnostic(code(metadock::import_key_not_found))]
	ImportKeyNotFound {
		key: String,
		segment: String,
		path: String,
	},

	#[error("cyclic import detected: {chain}")]
	#[diagnostic(
		code(metadock::cyclic_import),
		help("break the cycle by removing one of the imports in the chain")
	)]
	CyclicImport { chain: String },

	#[error("failed to parse template `{template}`: {reason}")]
	#[diagnostic(code(metadock::template_parse))]
	TemplateParse { template: String, reason: String },

	#[error("failed to render template `{template}`: {reason}")]
	#[diagnostic(code(metadock::template_render))]
	TemplateRender { template: String, reason: String },

	#[error("failed to post-process `{identifier}` output: {reason}")]
	#[diagnostic(code(metadock::target_format))]
	TargetFormat { identifier: String, reason: String },

	#[error("unknown content schematic: `{0}`")]
	#[diagnostic(
		code(metadock::unknown_schematic),
		help("run `metadock list` to see the registered schematic names")
	)]
	UnknownSchematic(String),

	#[error("schematic `{schematic}` references unknown template `{template}`")]
	#[diagnostic(
		code(metadock::unknown_template),
		help("templates are looked up relative to `.metadock/templated_documents/`")
	)]
	UnknownTemplate { schematic: String, template: String },
}

pub type MetadockResult<T> = Result<T, MetadockError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
