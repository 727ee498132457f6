//! docs-from-source - API and database documentation for Go backend modules.
//!
//! This library reads the sources of a Gin + sqlc module (struct declarations, route
//! registrations, controller logic and query files) and writes two markdown
//! documents next to them: an API reference (`API.md`) and a schema reference
//! (`DATABASE.md`).
//!
//! Extraction is pattern matching over raw text, not parsing. Nothing here builds a
//! syntax tree or resolves types across files; unrecognised input is skipped and
//! the documents are generated from whatever was recognised.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Locates module directories, their source files and query files
//! 2. [`extractor`] - Turns each kind of source text into structured records
//! 3. [`type_resolver`] - Links mutating endpoints to their request structs
//! 4. [`module_info`] - Runs the extractors and assembles the module model
//! 5. [`example_generator`] - Builds example JSON values for request fields
//! 6. [`renderer`] - Renders the model into the two markdown documents
//! 7. [`serializer`] - Exports the model as YAML/JSON and writes files
//!
//! # Example Usage
//!
//! ```no_run
//! use docs_from_source::{
//!     module_info::ModuleInfo,
//!     renderer::DocRenderer,
//!     scanner::ModuleLocator,
//! };
//! use std::path::PathBuf;
//!
//! let locator = ModuleLocator::new(PathBuf::from("modules"), PathBuf::from("db/queries"));
//! let files = locator.locate("customers").unwrap();
//! let sources = files.read_sources().unwrap();
//!
//! let module = ModuleInfo::analyze(&files.name, &files.module_path, &sources);
//! let docs = DocRenderer::render(&module);
//! println!("{}", docs.api);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod cli;
pub mod error;
pub mod example_generator;
pub mod extractor;
pub mod module_info;
pub mod renderer;
pub mod scanner;
pub mod serializer;
pub mod type_resolver;
