use crate::error::Error;
use crate::module_info::ModuleInfo;
use crate::renderer::{DocRenderer, API_FILE, DATABASE_FILE};
use crate::scanner::ModuleLocator;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

const RULE: &str = "==================================================";

/// Generate API.md and DATABASE.md for Go backend modules from their source files
#[derive(Parser, Debug)]
#[command(name = "docs-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Module path relative to the modules directory (e.g. customer/customer.invoices)
    #[arg(value_name = "MODULE_PATH", required_unless_present = "all", conflicts_with = "all")]
    pub module_path: Option<String>,

    /// Project root directory
    #[arg(short = 'r', long = "root", value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Modules directory, relative to the project root
    #[arg(long = "modules-dir", value_name = "DIR", default_value = "modules")]
    pub modules_dir: PathBuf,

    /// Query file directory, relative to the project root
    #[arg(long = "queries-dir", value_name = "DIR", default_value = "db/queries")]
    pub queries_dir: PathBuf,

    /// Generate documentation for every module under the modules directory
    #[arg(short = 'a', long = "all")]
    pub all: bool,

    /// Also print the extracted module model to stdout
    #[arg(short = 'm', long = "model", value_enum, value_name = "FORMAT")]
    pub model: Option<ModelFormat>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Model export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Counts reported after a module has been documented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSummary {
    pub module_path: String,
    pub endpoints: usize,
    pub types: usize,
    pub queries: usize,
    pub api_file: PathBuf,
    pub database_file: PathBuf,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(mut args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.root.is_dir() {
        anyhow::bail!("Project root is not a directory: {}", args.root.display());
    }

    if let Some(module_path) = args.module_path.take() {
        let trimmed = module_path.trim_matches('/');
        if trimmed.is_empty() {
            return Err(Error::InvalidArgument(format!("module path '{}' is empty", module_path)).into());
        }
        args.module_path = Some(trimmed.to_string());
    }

    info!("Project root: {}", args.root.display());
    info!("Modules directory: {}", args.modules_dir.display());
    info!("Queries directory: {}", args.queries_dir.display());
    match &args.module_path {
        Some(module_path) => info!("Module: {}", module_path),
        None => info!("Module: all"),
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<Vec<ModuleSummary>> {
    let locator = ModuleLocator::new(
        args.root.join(&args.modules_dir),
        args.root.join(&args.queries_dir),
    );

    let module_paths = match (&args.module_path, args.all) {
        (_, true) => {
            info!("Discovering modules...");
            locator.discover()?
        }
        (Some(module_path), false) => vec![module_path.clone()],
        (None, false) => {
            return Err(Error::InvalidArgument("a module path or --all is required".to_string()).into())
        }
    };

    if module_paths.is_empty() {
        warn!("No modules found");
    }

    let mut summaries = Vec::with_capacity(module_paths.len());
    for module_path in &module_paths {
        let summary = generate_module(&locator, module_path, args.model)?;
        print_summary(&summary);
        summaries.push(summary);
    }

    Ok(summaries)
}

/// Extract, render and write the documentation for a single module.
pub fn generate_module(
    locator: &ModuleLocator,
    module_path: &str,
    model: Option<ModelFormat>,
) -> Result<ModuleSummary> {
    info!("Generating docs for: {}", module_path);

    // Step 1: Locate the module and read its sources
    let files = locator.locate(module_path)?;
    info!("Module directory: {}", files.dir.display());
    let sources = files.read_sources()?;

    // Step 2: Extract the module model
    let module = ModuleInfo::analyze(&files.name, &files.module_path, &sources);
    info!("Found {} type definitions", module.types.len());
    info!("Found {} filter fields", module.filters.len());
    info!("Found {} endpoints", module.endpoints.len());
    info!("Base URL: /{}", module.base_url);
    info!("Found {} sortable fields", module.sortable_fields.len());
    info!("Found {} SQL queries", module.sql_queries.len());
    if !module.table_name.is_empty() {
        info!("Table: {}", module.table_name);
    }

    // Step 3: Optionally export the model
    if let Some(format) = model {
        let content = match format {
            ModelFormat::Yaml => serialize_yaml(&module)?,
            ModelFormat::Json => serialize_json(&module)?,
        };
        println!("{}", content);
    }

    // Step 4: Render and write both documents
    let docs = DocRenderer::render(&module);
    let api_file = files.dir.join(API_FILE);
    write_to_file(&docs.api, &api_file)?;
    info!("Generated: {}", api_file.display());

    let database_file = files.dir.join(DATABASE_FILE);
    write_to_file(&docs.database, &database_file)?;
    info!("Generated: {}", database_file.display());

    Ok(ModuleSummary {
        module_path: files.module_path,
        endpoints: module.endpoints.len(),
        types: module.types.len(),
        queries: module.sql_queries.len(),
        api_file,
        database_file,
    })
}

fn print_summary(summary: &ModuleSummary) {
    println!("{}", RULE);
    println!("Documentation generated for {}", summary.module_path);
    println!("{}", RULE);
    println!("Endpoints: {}", summary.endpoints);
    println!("Type definitions: {}", summary.types);
    println!("SQL queries: {}", summary.queries);
    println!("{}", RULE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_module_path_is_required_without_all() {
        let result = CliArgs::try_parse_from(["docs-from-source"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_module_path_conflicts_with_all() {
        let result = CliArgs::try_parse_from(["docs-from-source", "customers", "--all"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["docs-from-source", "customers"]).unwrap();

        assert_eq!(args.module_path.as_deref(), Some("customers"));
        assert_eq!(args.root, PathBuf::from("."));
        assert_eq!(args.modules_dir, PathBuf::from("modules"));
        assert_eq!(args.queries_dir, PathBuf::from("db/queries"));
        assert!(!args.all);
        assert_eq!(args.model, None);
    }

    #[test]
    fn test_model_format_flag() {
        let args = CliArgs::try_parse_from(["docs-from-source", "-a", "-m", "json"]).unwrap();

        assert!(args.all);
        assert_eq!(args.model, Some(ModelFormat::Json));
    }

    #[test]
    fn test_parse_args_trims_module_path() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_string_lossy().to_string();
        let args = CliArgs::try_parse_from(["docs-from-source", "/customers/", "-r", &root]).unwrap();

        let args = parse_args_from_parsed(args).unwrap();

        assert_eq!(args.module_path.as_deref(), Some("customers"));
    }

    #[test]
    fn test_parse_args_rejects_missing_root() {
        let args =
            CliArgs::try_parse_from(["docs-from-source", "customers", "-r", "/nonexistent/root"]).unwrap();

        assert!(parse_args_from_parsed(args).is_err());
    }

    #[test]
    fn test_run_missing_module_fails() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("modules")).unwrap();
        let root = temp_dir.path().to_string_lossy().to_string();
        let args = CliArgs::try_parse_from(["docs-from-source", "ghost", "-r", &root]).unwrap();

        let err = run(args).unwrap_err();

        assert!(err.to_string().contains("Module directory not found"));
    }
}
