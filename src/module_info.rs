//! The per-module model that the renderers consume.
//!
//! [`ModuleInfo::analyze`] runs every extractor once over the module's source texts
//! and assembles the results. It does no I/O: the caller reads the files and passes
//! in whatever exists.

use crate::extractor::routes::RouteExtractor;
use crate::extractor::sortable::SortableFieldExtractor;
use crate::extractor::sql::{SqlExtractor, TableInferencer};
use crate::extractor::types::{FilterExtractor, TypeExtractor};
use crate::extractor::{Endpoint, FilterSpec, SqlQuery, TableColumn, TypeSet};
use crate::type_resolver::RequestTypeResolver;
use log::debug;
use serde::Serialize;

/// Source texts of one module. A missing file is `None`.
#[derive(Debug, Clone, Default)]
pub struct ModuleSources {
    /// `<module>.types.go`
    pub types: Option<String>,
    /// `<module>.routes.go`
    pub routes: Option<String>,
    /// `<module>.controllers.go`
    pub controllers: Option<String>,
    /// The module's sqlc query file
    pub queries: Option<String>,
}

/// Everything extracted from a module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    /// Last segment of the module path, e.g. `customer.invoices`
    pub name: String,
    /// Module path relative to the modules directory, e.g. `customer/customer.invoices`
    pub path: String,
    /// Base URL without a leading slash
    pub base_url: String,
    pub endpoints: Vec<Endpoint>,
    pub filters: Vec<FilterSpec>,
    pub sortable_fields: Vec<String>,
    pub sql_queries: Vec<SqlQuery>,
    pub table_columns: Vec<TableColumn>,
    pub types: TypeSet,
    pub table_name: String,
    pub primary_key_column: String,
}

impl ModuleInfo {
    /// Creates an empty model whose base URL is the module path.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: name.into(),
            base_url: path.clone(),
            path,
            ..Self::default()
        }
    }

    /// Extracts the full model from a module's sources.
    pub fn analyze(name: &str, path: &str, sources: &ModuleSources) -> Self {
        let mut info = Self::new(name, path);

        if let Some(types) = &sources.types {
            info.types = TypeExtractor::extract(types);
            info.filters = FilterExtractor::extract(types);
            debug!(
                "{}: {} types, {} filter fields",
                name,
                info.types.len(),
                info.filters.len()
            );
        }

        if let Some(routes) = &sources.routes {
            let extraction = RouteExtractor::extract(routes, name);
            info.base_url = extraction.base_path.trim_start_matches('/').to_string();
            info.endpoints = RequestTypeResolver::new(&info.types).resolve_all(extraction.endpoints);
            debug!("{}: {} endpoints", name, info.endpoints.len());
        }

        if let Some(controllers) = &sources.controllers {
            info.sortable_fields = SortableFieldExtractor::extract(controllers);
        }

        if let Some(queries) = &sources.queries {
            info.sql_queries = SqlExtractor::extract(queries);
            let statements: Vec<&str> = info
                .sql_queries
                .iter()
                .map(|q| q.statement.as_str())
                .collect();
            let table = TableInferencer::infer(&statements.join("\n"));
            info.table_name = table.table_name;
            info.primary_key_column = table.primary_key;
            info.table_columns = table.columns;
        }

        info
    }
}
