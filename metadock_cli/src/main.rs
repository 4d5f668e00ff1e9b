use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use metadock_cli::Commands;
use metadock_cli::MetadockCli;
use metadock_cli::OutputFormat;
use metadock_cli::SelectorArgs;
use metadock_core::AnyEmptyResult;
use metadock_core::BuildStatus;
use metadock_core::MetadockProject;
use owo_colors::OwoColorize;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = MetadockCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_writer(std::io::stderr)
		.init();

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Validate) => run_validate(&args),
		Some(Commands::Build {
			ref selectors,
			format,
		}) => run_build(&args, selectors, format),
		Some(Commands::List {
			ref selectors,
			format,
		}) => run_list(&args, selectors, format),
		Some(Commands::Clean) => run_clean(&args),
		None => {
			eprintln!("No subcommand specified. Run `metadock --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<metadock_core::MetadockError>() {
			Ok(metadock_err) => {
				let report: miette::Report = (*metadock_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn resolve_root(args: &MetadockCli) -> PathBuf {
	args.project_dir
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn run_init(args: &MetadockCli) -> AnyEmptyResult {
	let root = resolve_root(args);
	let project = MetadockProject::init(&root)?;
	println!(
		"Initialized new metadock project at {}",
		project.metadock_directory().display()
	);
	Ok(())
}

fn run_validate(args: &MetadockCli) -> AnyEmptyResult {
	let root = resolve_root(args);
	let report = MetadockProject::validate(&root);

	if report.ok() {
		println!(
			"Project validation succeeded with {} warning(s)!",
			report.warnings.len()
		);
		for warning in &report.warnings {
			println!("{} {warning}", colored!("(?)", yellow));
		}
		return Ok(());
	}

	eprintln!(
		"Project validation failed with {} failure(s) and {} warning(s)!",
		report.failures.len(),
		report.warnings.len()
	);
	for failure in &report.failures {
		eprintln!("{} {failure}", colored!("(!)", red));
	}
	for warning in &report.warnings {
		eprintln!("{} {warning}", colored!("(?)", yellow));
	}
	process::exit(1);
}

/// Resolve selector flags into a build/list name set. `None` means every
/// registered schematic.
fn selected_names(
	project: &MetadockProject,
	selectors: &SelectorArgs,
) -> Result<Option<Vec<String>>, metadock_core::MetadockError> {
	if selectors.is_empty() {
		return Ok(None);
	}

	let selected = project.select(&selectors.schematic, &selectors.template)?;
	Ok(Some(selected.into_iter().collect()))
}

fn run_build(args: &MetadockCli, selectors: &SelectorArgs, format: OutputFormat) -> AnyEmptyResult {
	let root = resolve_root(args);
	let project = MetadockProject::load(&root)?;
	let names = selected_names(&project, selectors)?;
	let result = project.build(names.as_deref())?;

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(&result)?);
		}
		OutputFormat::Text => {
			for document in &result.generated_documents {
				let rel = make_relative(&document.path, &root);
				let status = match document.status {
					BuildStatus::New => colored!("new      ", green),
					BuildStatus::Updated => colored!("updated  ", yellow),
					BuildStatus::Unchanged => "unchanged".to_string(),
				};
				println!("{status} {rel}");
			}
			println!(
				"Build successful: {} document(s) written, {} unchanged.",
				result.written_count(),
				result.unchanged_count()
			);
		}
	}

	Ok(())
}

fn run_list(args: &MetadockCli, selectors: &SelectorArgs, format: OutputFormat) -> AnyEmptyResult {
	let root = resolve_root(args);
	let project = MetadockProject::load(&root)?;
	let names = match selected_names(&project, selectors)? {
		Some(names) => names,
		None => project
			.schematics()
			.names()
			.map(ToString::to_string)
			.collect(),
	};

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(&names)?);
		}
		OutputFormat::Text => {
			println!("List picked up the following content schematics:");
			for name in &names {
				if args.verbose {
					let schematic = project.schematics().get(name);
					let template = schematic.map_or("?", |s| s.template.as_str());
					println!("- {name} ({template})");
				} else {
					println!("- {name}");
				}
			}
		}
	}

	Ok(())
}

fn run_clean(args: &MetadockCli) -> AnyEmptyResult {
	let root = resolve_root(args);
	let project = MetadockProject::load(&root)?;
	project.clean()?;
	println!(
		"Cleaned directory: {}",
		make_relative(&project.generated_documents_directory(), &root)
	);
	Ok(())
}

/// Make a path relative to the project root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
