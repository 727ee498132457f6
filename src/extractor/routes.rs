//! Gin route registrations from `<module>.routes.go`.

use crate::extractor::{Endpoint, HttpMethod, Permission};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Any `<recv>.Group("/path")` call. The first one fixes the module base path.
static GROUP_CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(\w+)\.Group\s*\(\s*"([^"]+)""#).expect("valid regex"));

/// `<var> := <parent>.Group("/prefix")`
static GROUP_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\w+)\s*:=\s*(\w+)\.Group\s*\(\s*"([^"]*)""#).expect("valid regex")
});

/// `<var>.METHOD("/path"`
static ROUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\w+)\.(GET|POST|PUT|PATCH|DELETE)\s*\(\s*"([^"]*)""#).expect("valid regex")
});

static CONTROLLER_HANDLER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w*[Cc]ontroller\.(\w+)").expect("valid regex"));

/// An argument that is nothing but `recv.Method`
static SELECTOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\w+(?:\.\w+)+$").expect("valid regex"));

static PERMISSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"RequirePermission\s*\(\s*\w+\.(\w+)").expect("valid regex"));

static SCOPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"scopes\.(\w+)").expect("valid regex"));

static CAMEL_BOUNDARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("valid regex"));

/// Router variable that always maps to the module root.
const ROOT_ROUTER: &str = "router";
const AUTH_CHECK: &str = "VerifyAuthToken";
const DEFAULT_SCOPE: &str = "index";

/// Endpoints found in a routes file together with the module base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteExtraction {
    /// Endpoints in source order
    pub endpoints: Vec<Endpoint>,
    /// Module base path, e.g. `/customers`
    pub base_path: String,
}

/// Gin route extractor
pub struct RouteExtractor;

impl RouteExtractor {
    /// Extracts all `GET`/`POST`/`PUT`/`PATCH`/`DELETE` registrations.
    ///
    /// The base path comes from the first `.Group("...")` call and defaults to
    /// `/<module_name>`. Paths are resolved as base path + group prefix + route path.
    pub fn extract(content: &str, module_name: &str) -> RouteExtraction {
        let base_group = GROUP_CALL_RE.captures(content);
        let base_path = base_group
            .as_ref()
            .map(|caps| caps[2].to_string())
            .unwrap_or_else(|| format!("/{}", module_name));
        let base_group_start = base_group.and_then(|caps| caps.get(0)).map(|m| m.start());
        debug!("Base path: {}", base_path);

        let prefixes = Self::group_prefixes(content, base_group_start);

        let mut endpoints = Vec::new();
        for caps in ROUTE_RE.captures_iter(content) {
            let Some(method) = HttpMethod::parse(&caps[2]) else {
                continue;
            };
            let (Some(whole), Some(router_var)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            let prefix = prefixes
                .get(router_var.as_str())
                .map(String::as_str)
                .unwrap_or_default();
            let path = normalize_path(&format!("{}{}{}", base_path, prefix, &caps[3]));

            // Only the call's own argument list is searched for handler and permission
            let args_end = find_call_end(content, whole.end()).unwrap_or(whole.end());
            let args = &content[whole.end()..args_end];
            let statement = &content[whole.start()..args_end];

            let handler_name = Self::handler_name(args);
            let permission = Self::permission(statement);
            debug!("Route: {} {} -> {} [{}]", method, path, handler_name, permission);

            endpoints.push(Endpoint {
                method,
                path,
                description: describe_handler(&handler_name),
                handler_name,
                permission,
                request_type_name: None,
            });
        }

        debug!("Extracted {} endpoints", endpoints.len());
        RouteExtraction {
            endpoints,
            base_path,
        }
    }

    /// Maps group variables to their path prefix relative to the base path.
    ///
    /// `router` and the variable bound by the base group call map to the empty prefix.
    /// A group declared on another group inherits that group's prefix.
    fn group_prefixes(content: &str, base_group_start: Option<usize>) -> HashMap<String, String> {
        let mut prefixes = HashMap::new();
        prefixes.insert(ROOT_ROUTER.to_string(), String::new());

        for caps in GROUP_DECL_RE.captures_iter(content) {
            let var = caps[1].to_string();
            let is_base_group = caps.get(2).map(|m| m.start()) == base_group_start;

            let prefix = if is_base_group {
                String::new()
            } else {
                let parent = prefixes.get(&caps[2]).cloned().unwrap_or_default();
                format!("{}{}", parent, &caps[3])
            };
            debug!("Route group {} -> '{}'", var, prefix);
            prefixes.insert(var, prefix);
        }

        prefixes
    }

    /// Picks the handler method out of a route's argument list.
    ///
    /// A method on a `*Controller` receiver wins. Otherwise the last top-level
    /// argument that is a plain `recv.Method` selector is taken, since Gin handlers
    /// come after middleware. Selectors nested in middleware calls, such as
    /// `scopes.Read`, never count. Returns an empty string when neither is found.
    fn handler_name(args: &str) -> String {
        if let Some(caps) = CONTROLLER_HANDLER_RE.captures(args) {
            return caps[1].to_string();
        }

        top_level_args(args)
            .into_iter()
            .filter(|arg| SELECTOR_RE.is_match(arg))
            .last()
            .and_then(|arg| arg.rsplit('.').next())
            .map(str::to_string)
            .unwrap_or_default()
    }

    fn permission(statement: &str) -> Permission {
        if let Some(caps) = PERMISSION_RE.captures(statement) {
            let scope = SCOPE_RE
                .captures(statement)
                .map(|s| s[1].to_lowercase())
                .unwrap_or_else(|| DEFAULT_SCOPE.to_string());
            return Permission::Scoped {
                resource: caps[1].to_string(),
                scope,
            };
        }

        if statement.contains(AUTH_CHECK) {
            Permission::Auth
        } else {
            Permission::Public
        }
    }
}

/// Finds the end of a call whose opening parenthesis precedes `from`.
///
/// Returns the byte index just past the balancing `)`, or `None` if the text ends first.
fn find_call_end(content: &str, from: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, byte) in content.as_bytes()[from..].iter().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' if depth == 0 => return Some(from + offset + 1),
            b')' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Splits a call's argument text on the commas outside nested parentheses.
///
/// Stops at the `)` closing the call. Each argument is trimmed.
fn top_level_args(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (offset, byte) in args.bytes().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' if depth == 0 => {
                parts.push(args[start..offset].trim());
                return parts;
            }
            b')' => depth -= 1,
            b',' if depth == 0 => {
                parts.push(args[start..offset].trim());
                start = offset + 1;
            }
            _ => {}
        }
    }
    parts.push(args[start..].trim());
    parts
}

/// Collapses repeated slashes and drops a trailing slash, except for the root path.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && normalized.ends_with('/') {
            continue;
        }
        normalized.push(c);
    }

    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    if normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}

/// Turns `GetCustomerByID` into `Get Customer By ID`.
pub fn describe_handler(handler_name: &str) -> String {
    CAMEL_BOUNDARY_RE
        .replace_all(handler_name, "$1 $2")
        .into_owned()
}
