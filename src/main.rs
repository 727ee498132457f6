//! docs-from-source - Command-line tool for generating module documentation.
//!
//! Reads a Go backend module's types, routes, controllers and sqlc query file and
//! writes `API.md` and `DATABASE.md` into the module directory.
//!
//! # Usage
//!
//! ```bash
//! docs-from-source [OPTIONS] <MODULE_PATH>
//! docs-from-source --all [OPTIONS]
//! ```
//!
//! # Examples
//!
//! Document a single module:
//! ```bash
//! docs-from-source customer/customer.invoices
//! ```
//!
//! Document every module of a project elsewhere on disk:
//! ```bash
//! docs-from-source --all -r ../backend
//! ```
//!
//! Print the extracted model as JSON with verbose logging:
//! ```bash
//! docs-from-source customers -m json -v
//! ```

use anyhow::Result;
use clap::Parser;
use docs_from_source::cli;
use log::info;

fn main() -> Result<()> {
    // The verbose flag is needed before the logger exists, so parse first and
    // validate afterwards
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("docs-from-source starting...");

    let args = cli::parse_args_from_parsed(args)?;
    let summaries = cli::run(args)?;

    info!("Documented {} module(s)", summaries.len());

    Ok(())
}
