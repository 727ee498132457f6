//! Extraction module for turning Go module sources into structured records.
//!
//! Each submodule handles one kind of source text. None of them build a syntax tree:
//! they match patterns over raw text and skip anything they do not recognise, so a
//! malformed file yields partial results instead of an error.
//!
//! - **Types**: see [`types::TypeExtractor`] and [`types::FilterExtractor`]
//! - **Routes**: see [`routes::RouteExtractor`]
//! - **Controllers**: see [`sortable::SortableFieldExtractor`]
//! - **Queries**: see [`sql::SqlExtractor`] and [`sql::TableInferencer`]
//!
//! # Example
//!
//! ```
//! use docs_from_source::extractor::routes::RouteExtractor;
//!
//! let routes = r#"
//!     router := rg.Group("/customers")
//!     router.GET("/:id", ctrl.GetCustomer)
//! "#;
//! let extraction = RouteExtractor::extract(routes, "customers");
//! assert_eq!(extraction.endpoints[0].path, "/customers/:id");
//! ```

pub mod routes;
pub mod sortable;
pub mod sql;
pub mod types;

use serde::{Serialize, Serializer};
use std::fmt;

/// A single field of a Go struct together with its tag metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Declared Go identifier
    pub name: String,
    /// Type token exactly as written in the source (e.g. `*string`, `[]int32`)
    pub declared_type: String,
    /// Serialization name from the `json` tag, or the lower-cased identifier
    pub external_name: String,
    /// Whether a `required` rule appears in the `binding` or `validate` tag
    pub required: bool,
    /// Remaining validation rules, in encounter order
    pub validation_rules: Vec<String>,
    /// Trailing line comment, if any
    pub description: String,
}

/// A struct declaration with its fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeSpec {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

/// Type declarations keyed by name, kept in declaration order.
///
/// Lookups that settle on "the first match" walk the types in the order they were
/// declared in the source file, never in hash order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TypeSet {
    types: Vec<TypeSpec>,
}

impl TypeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a type unless one with the same name is already present.
    ///
    /// Returns `false` when the type was rejected as a duplicate.
    pub fn insert(&mut self, spec: TypeSpec) -> bool {
        if self.contains(&spec.name) {
            return false;
        }
        self.types.push(spec);
        true
    }

    pub fn get(&self, name: &str) -> Option<&TypeSpec> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Type names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// HTTP methods recognised in route registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Parse an upper-case Gin method name such as `GET`.
    pub fn parse(method: &str) -> Option<Self> {
        match method {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// POST, PUT and PATCH carry a request body.
    pub fn is_mutating(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authorization required by an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Permission {
    /// A `resource:scope` permission check
    Scoped { resource: String, scope: String },
    /// Authenticated, but no specific permission
    Auth,
    /// No authentication at all
    Public,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::Scoped { resource, scope } => write!(f, "{}:{}", resource, scope),
            Permission::Auth => f.write_str("Auth"),
            Permission::Public => f.write_str("Public"),
        }
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single registered route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub method: HttpMethod,
    /// Fully resolved, normalized path (e.g. `/customers/:id`)
    pub path: String,
    /// Controller method bound to the route, empty when none was found
    pub handler_name: String,
    pub permission: Permission,
    /// Request type name, filled in after extraction by the request type resolver
    pub request_type_name: Option<String>,
    /// Human-readable form of the handler name
    pub description: String,
}

/// One field of the module's filter struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    /// External (JSON) name of the filter
    pub name: String,
    pub declared_type: String,
}

/// Result cardinality of an sqlc query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    One,
    Many,
    Exec,
    ExecRows,
}

impl QueryKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "one" => Some(QueryKind::One),
            "many" => Some(QueryKind::Many),
            "exec" => Some(QueryKind::Exec),
            "execrows" => Some(QueryKind::ExecRows),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::One => "one",
            QueryKind::Many => "many",
            QueryKind::Exec => "exec",
            QueryKind::ExecRows => "execrows",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named query block from a query file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlQuery {
    pub name: String,
    pub kind: QueryKind,
    /// Statement text up to and including the first `;`
    pub statement: String,
    /// Distinct `$n` placeholders, ascending
    pub parameter_ordinals: Vec<u32>,
}

/// Placeholder type for columns whose SQL type cannot be read from a query.
pub const INFERRED_COLUMN_TYPE: &str = "inferred";

/// A column recovered from a `SELECT` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub name: String,
    pub column_type: String,
    pub nullable: bool,
    pub default_value: String,
    pub description: String,
}

impl TableColumn {
    /// A nullable column with the `inferred` placeholder type.
    pub fn inferred(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: INFERRED_COLUMN_TYPE.to_string(),
            nullable: true,
            default_value: String::new(),
            description: String::new(),
        }
    }
}
