use crate::extractor::{Endpoint, TypeSet};
use log::debug;

/// Marker word every request type name must contain.
const REQUEST_MARKER: &str = "Request";

/// Handler prefixes dropped for the second matching pass.
const VERB_PREFIXES: &[&str] = &["Create", "Update"];

/// Request type resolver - links mutating endpoints to a request struct by name
///
/// Matching is by naming convention only:
/// 1. the first type (in declaration order) whose name contains both the handler
///    name and `Request`;
/// 2. failing that, the same search with a leading `Create`/`Update` removed from
///    the handler name.
///
/// The first candidate wins even when a later one would fit better.
pub struct RequestTypeResolver<'a> {
    types: &'a TypeSet,
}

impl<'a> RequestTypeResolver<'a> {
    pub fn new(types: &'a TypeSet) -> Self {
        Self { types }
    }

    /// Request type for a single endpoint, or `None` for GET/DELETE and unmatched handlers.
    pub fn resolve(&self, endpoint: &Endpoint) -> Option<String> {
        if !endpoint.method.is_mutating() || endpoint.handler_name.is_empty() {
            return None;
        }

        let handler = endpoint.handler_name.as_str();
        if let Some(name) = self.find_request_type(handler) {
            return Some(name);
        }

        let stripped = VERB_PREFIXES
            .iter()
            .find_map(|prefix| handler.strip_prefix(prefix))?;
        if stripped.is_empty() {
            return None;
        }
        self.find_request_type(stripped)
    }

    /// Returns the endpoints with `request_type_name` filled in where a match exists.
    pub fn resolve_all(&self, endpoints: Vec<Endpoint>) -> Vec<Endpoint> {
        endpoints
            .into_iter()
            .map(|mut endpoint| {
                endpoint.request_type_name = self.resolve(&endpoint);
                if let Some(ref name) = endpoint.request_type_name {
                    debug!("{} {} uses request type {}", endpoint.method, endpoint.path, name);
                }
                endpoint
            })
            .collect()
    }

    fn find_request_type(&self, needle: &str) -> Option<String> {
        self.types
            .names()
            .find(|name| name.contains(needle) && name.contains(REQUEST_MARKER))
            .map(str::to_string)
    }
}
