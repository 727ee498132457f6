use crate::error::{Error, Result};
use crate::module_info::ModuleSources;
use anyhow::Context;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

static CAMEL_BOUNDARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("valid regex"));

/// Locates modules and their source files on disk.
///
/// A module lives at `<modules_dir>/<module_path>` and names its sources after the
/// last path segment: `<name>.types.go`, `<name>.routes.go` and
/// `<name>.controllers.go`. Its query file lives in `queries_dir` under one of
/// several names derived from the module path.
///
/// # Example
///
/// ```no_run
/// use docs_from_source::scanner::ModuleLocator;
/// use std::path::PathBuf;
///
/// let locator = ModuleLocator::new(PathBuf::from("modules"), PathBuf::from("db/queries"));
/// let files = locator.locate("customer/customer.invoices").unwrap();
/// println!("Module directory: {}", files.dir.display());
/// ```
pub struct ModuleLocator {
    modules_dir: PathBuf,
    queries_dir: PathBuf,
}

/// Paths of one module's sources. Source files may or may not exist.
#[derive(Debug, Clone)]
pub struct ModuleFiles {
    /// Module path relative to the modules directory, `/`-separated
    pub module_path: String,
    /// Last segment of the module path
    pub name: String,
    /// Module directory; the generated documents are written here
    pub dir: PathBuf,
    pub types: PathBuf,
    pub routes: PathBuf,
    pub controllers: PathBuf,
    /// First existing query file candidate
    pub queries: Option<PathBuf>,
}

impl ModuleLocator {
    pub fn new(modules_dir: PathBuf, queries_dir: PathBuf) -> Self {
        Self {
            modules_dir,
            queries_dir,
        }
    }

    /// Resolves a module path to its directory and source file paths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModuleNotFound`] if the module directory does not exist.
    pub fn locate(&self, module_path: &str) -> Result<ModuleFiles> {
        let module_path = module_path.trim_matches('/');
        if module_path.is_empty() {
            return Err(Error::InvalidArgument("module path is empty".to_string()));
        }

        let dir = self.modules_dir.join(module_path);
        if !dir.is_dir() {
            return Err(Error::ModuleNotFound(dir));
        }

        let name = module_path.rsplit('/').next().unwrap_or(module_path).to_string();
        debug!("Module {} resolved to {}", module_path, dir.display());

        Ok(ModuleFiles {
            module_path: module_path.to_string(),
            types: dir.join(format!("{}.types.go", name)),
            routes: dir.join(format!("{}.routes.go", name)),
            controllers: dir.join(format!("{}.controllers.go", name)),
            queries: self.find_query_file(module_path),
            name,
            dir,
        })
    }

    /// Returns the first query file candidate that exists.
    pub fn find_query_file(&self, module_path: &str) -> Option<PathBuf> {
        query_file_candidates(module_path)
            .into_iter()
            .map(|name| self.queries_dir.join(name))
            .find(|path| {
                debug!("Trying query file {}", path.display());
                path.is_file()
            })
    }

    /// Finds every module below the modules directory, sorted by path.
    ///
    /// A directory is a module when it holds `<dirname>.routes.go` or
    /// `<dirname>.types.go`. Hidden directories are skipped and unreadable entries
    /// are logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModuleNotFound`] if the modules directory does not exist.
    pub fn discover(&self) -> Result<Vec<String>> {
        if !self.modules_dir.is_dir() {
            return Err(Error::ModuleNotFound(self.modules_dir.clone()));
        }

        let mut modules = Vec::new();
        let walker = WalkDir::new(&self.modules_dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.'));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to access path: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }

            let dir_name = entry.file_name().to_string_lossy();
            let is_module = ["routes", "types"]
                .iter()
                .any(|kind| entry.path().join(format!("{}.{}.go", dir_name, kind)).is_file());
            if !is_module {
                continue;
            }

            if let Ok(relative) = entry.path().strip_prefix(&self.modules_dir) {
                let module_path = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                debug!("Discovered module {}", module_path);
                modules.push(module_path);
            }
        }

        Ok(modules)
    }
}

impl ModuleFiles {
    /// Reads whichever source files exist.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read.
    pub fn read_sources(&self) -> anyhow::Result<ModuleSources> {
        Ok(ModuleSources {
            types: read_if_exists(&self.types, "types")?,
            routes: read_if_exists(&self.routes, "routes")?,
            controllers: read_if_exists(&self.controllers, "controllers")?,
            queries: match &self.queries {
                Some(path) => read_if_exists(path, "SQL")?,
                None => {
                    warn!("No SQL file found for {}", self.module_path);
                    None
                }
            },
        })
    }
}

fn read_if_exists(path: &Path, kind: &str) -> anyhow::Result<Option<String>> {
    if !path.is_file() {
        debug!("No {} file at {}", kind, path.display());
        return Ok(None);
    }

    info!("Reading {}: {}", kind, path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(Some(content))
}

/// Query file names to try for a module, in order, without duplicates.
///
/// For `customer/customer.invoices`: `customer.customer.invoices.sql`,
/// `invoices.sql`, `customer_customer_invoices.sql`, `customer.invoices.sql`,
/// then the snake-cased last segment.
pub fn query_file_candidates(module_path: &str) -> Vec<String> {
    let dotted = module_path.replace(['/', '\\'], ".");
    let last_part = dotted.rsplit('.').next().unwrap_or(&dotted);
    let last_segment = module_path.rsplit('/').next().unwrap_or(module_path);
    let snake_case = CAMEL_BOUNDARY_RE
        .replace_all(last_part, "${1}_${2}")
        .to_lowercase();

    let names = [
        format!("{}.sql", dotted),
        format!("{}.sql", last_part),
        format!("{}.sql", dotted.replace('.', "_")),
        format!("{}.sql", last_segment),
        format!("{}.sql", snake_case),
    ];

    let mut candidates: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !candidates.contains(&name) {
            candidates.push(name);
        }
    }
    candidates
}
