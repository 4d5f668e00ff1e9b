//! `metadock_core` is the engine behind the [metadock](https://github.com/metadock/metadock)
//! document generator. It resolves a declarative content model ("content
//! schematics") spread across many YAML files into rendered documents,
//! written incrementally into an output directory.
//!
//! ## Processing Pipeline
//!
//! ```text
//! .metadock/content_schematics/*.yml
//!   → Merge resolver (flattens `<<` merge keys, deepest-first)
//!   → Import resolver (replaces `{ import, key }` markers with resolved file content)
//!   → Schematic registry (name → schematic, globally unique names)
//!   → Compiler (minijinja render + per-format post-processing)
//!   → Build engine (diffs against generated_documents/, writes only on change)
//! ```
//!
//! ## Modules
//!
//! - [`value`] — merge-key flattening and dotted key-path navigation over
//!   YAML values.
//! - [`import`] — cross-file import resolution with caching and cycle
//!   detection.
//! - [`schematic`] — declaration file scanning and the name-keyed registry.
//! - [`template`] — template file indexing with lazy content loading.
//! - [`engine`] — compilation, diff-aware writing, and build results.
//! - [`project`] — the project facade: init, load, validate, select, build,
//!   clean.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use metadock_core::MetadockProject;
//!
//! let project = MetadockProject::load(Path::new(".")).unwrap();
//! let result = project.build(None).unwrap();
//! for document in &result.generated_documents {
//!     println!("{} {}", document.status.as_str(), document.path.display());
//! }
//! ```

pub use engine::*;
pub use error::*;
pub use import::*;
pub use project::*;
pub use schematic::*;
pub use target_format::*;
pub use template::*;
pub use value::*;

pub mod engine;
mod env;
mod error;
pub mod import;
pub mod project;
pub mod schematic;
mod target_format;
pub mod template;
pub mod value;
