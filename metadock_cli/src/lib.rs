use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Generate and format templated documents from YAML content schematics.",
	long_about = "metadock renders documents described once in YAML (\"content schematics\") \
	              through a shared template library into an output directory.\n\nA project lives \
	              in a `.metadock` directory with three subdirectories: content_schematics/ \
	              (YAML declarations), templated_documents/ (minijinja templates), and \
	              generated_documents/ (build output).\n\nQuick start:\n  metadock init      \
	              Create an empty .metadock project\n  metadock validate  Check the project \
	              directory structure\n  metadock build     Render schematics into \
	              generated_documents/\n  metadock list      Show which schematics a selection \
	              picks up\n  metadock clean     Empty the generated_documents directory"
)]
pub struct MetadockCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Project directory containing a `.metadock` directory.
	#[arg(long, short = 'p', global = true)]
	pub project_dir: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

/// Selector flags shared by `build` and `list`.
#[derive(Args)]
pub struct SelectorArgs {
	/// Schematic name glob(s) to pick up, e.g. `gallery_*`.
	#[arg(long, short = 's', value_name = "GLOB", num_args = 1..)]
	pub schematic: Vec<String>,

	/// Template path glob(s) to pick up, e.g. `reports/*.md`.
	#[arg(long, short = 't', value_name = "GLOB", num_args = 1..)]
	pub template: Vec<String>,
}

impl SelectorArgs {
	/// Whether any selector was supplied. No selectors means "everything"
	/// for build and list.
	pub fn is_empty(&self) -> bool {
		self.schematic.is_empty() && self.template.is_empty()
	}
}

#[derive(Subcommand)]
pub enum Commands {
	/// Initialize a new metadock project in a folder which does not
	/// currently have one.
	///
	/// Creates a `.metadock` directory with empty `content_schematics/`,
	/// `templated_documents/`, and `generated_documents/` subdirectories.
	/// Fails if a `.metadock` directory already exists.
	Init,
	/// Validate the structure of an existing metadock project.
	///
	/// A missing `.metadock` directory is a failure. Missing content or
	/// template subdirectories are warnings, and a missing output directory
	/// is warned about and created. Exits non-zero only on failures.
	Validate,
	/// Build the project, rendering some or all documents.
	///
	/// Each selected schematic is rendered through its template and written
	/// to `generated_documents/<name>.<extension>` once per target format.
	/// Destinations whose content already matches are left untouched, so
	/// rebuilds are idempotent. With no selectors, every schematic is built.
	Build {
		#[command(flatten)]
		selectors: SelectorArgs,

		/// Output format for build results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List the content schematics a given selection picks up.
	///
	/// With no selectors, lists every registered schematic.
	List {
		#[command(flatten)]
		selectors: SelectorArgs,

		/// Output format for list results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Empty the generated_documents directory for the project.
	///
	/// Deletes the output directory wholesale and recreates it. This is the
	/// only way to remove documents written by earlier builds.
	Clean,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
