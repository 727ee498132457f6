//! `API.md`: endpoint reference for a module.

use crate::example_generator::ExampleGenerator;
use crate::extractor::{Endpoint, FilterSpec, TypeSpec};
use crate::module_info::ModuleInfo;
use crate::renderer::{module_title, DATABASE_FILE};

/// Filters shown in the example filter object.
const FILTER_EXAMPLE_LIMIT: usize = 3;

const QUERY_PARAMETERS: &[&str] = &[
    "## Query Parameters (GET endpoints)",
    "",
    "| Param | Type | Default | Description |",
    "|-------|------|---------|-------------|",
    "| `q` | string | - | Search query |",
    "| `page` | int | 1 | Page number |",
    "| `page_size` | int | 10 | Items per page |",
    "| `sort_by` | string | - | Sort field |",
    "| `sort_order` | string | desc | asc / desc |",
    "| `filters` | JSON | - | Filter object |",
    "",
];

const ERROR_RESPONSES: &[&str] = &[
    "---",
    "",
    "## Error Responses",
    "",
    "| Code | Message | Description |",
    "|------|---------|-------------|",
    "| 400 | Bad Request | Invalid request parameters |",
    "| 401 | Unauthorized | Missing or invalid authentication |",
    "| 403 | Forbidden | Insufficient permissions |",
    "| 404 | Not Found | Resource not found |",
    "| 500 | Internal Server Error | Server error |",
    "",
    "**Error Format:**",
    "",
    "```json",
    "{",
    "  \"error_code\": 400,",
    "  \"error_message\": \"Bad Request\",",
    "  \"details\": \"Additional error information\"",
    "}",
    "```",
    "",
];

/// Renders the API reference.
pub fn render(info: &ModuleInfo) -> String {
    let mut lines: Vec<String> = vec![
        format!("# {} API Documentation", module_title(info)),
        String::new(),
        format!("Base URL: `/api/v1/{}`", info.base_url),
        String::new(),
    ];

    push_overview(&mut lines, &info.endpoints);

    lines.push("## Endpoint Details".to_string());
    lines.push(String::new());
    for endpoint in &info.endpoints {
        push_endpoint(&mut lines, endpoint, info);
    }

    lines.extend(QUERY_PARAMETERS.iter().map(|l| l.to_string()));

    if !info.filters.is_empty() {
        push_filters(&mut lines, &info.filters);
    }

    if !info.sortable_fields.is_empty() {
        lines.push("## Sortable Fields".to_string());
        lines.push(String::new());
        for field in &info.sortable_fields {
            lines.push(format!("- `{}`", field));
        }
        lines.push(String::new());
    }

    lines.extend(ERROR_RESPONSES.iter().map(|l| l.to_string()));
    push_related_files(&mut lines, info);

    let mut document = lines.join("\n");
    document.push('\n');
    document
}

fn push_overview(lines: &mut Vec<String>, endpoints: &[Endpoint]) {
    lines.push("## Endpoints Overview".to_string());
    lines.push(String::new());
    lines.push("| Method | Endpoint | Description | Permission |".to_string());
    lines.push("|--------|----------|-------------|------------|".to_string());
    for endpoint in endpoints {
        lines.push(format!(
            "| `{}` | `{}` | {} | {} |",
            endpoint.method, endpoint.path, endpoint.description, endpoint.permission
        ));
    }
    lines.extend(["", "---", ""].map(String::from));
}

fn push_endpoint(lines: &mut Vec<String>, endpoint: &Endpoint, info: &ModuleInfo) {
    lines.push(format!("### {} `{}`", endpoint.method, endpoint.path));
    lines.push(String::new());
    lines.push(format!("**Handler:** `{}`  ", endpoint.handler_name));
    lines.push(format!("**Permission:** `{}`  ", endpoint.permission));
    lines.push(format!("**Description:** {}", endpoint.description));
    lines.push(String::new());

    let request_type = endpoint
        .request_type_name
        .as_deref()
        .filter(|_| endpoint.method.is_mutating())
        .and_then(|name| info.types.get(name));
    if let Some(spec) = request_type {
        push_request_body(lines, spec);
    }

    lines.push("**Response:**".to_string());
    lines.push(String::new());
    lines.push("```json".to_string());
    lines.push("{".to_string());
    lines.push("  \"message\": \"OK\",".to_string());
    if is_listing(endpoint) {
        lines.extend(
            [
                "  \"pagination\": {",
                "    \"page\": 1,",
                "    \"page_size\": 10,",
                "    \"total\": 100",
                "  },",
                "  \"results\": [...]",
            ]
            .map(String::from),
        );
    } else {
        lines.push("  \"data\": {...}".to_string());
    }
    lines.extend(["}", "```", "", "---", ""].map(String::from));
}

fn push_request_body(lines: &mut Vec<String>, spec: &TypeSpec) {
    lines.push("**Request Body:**".to_string());
    lines.push(String::new());
    lines.push("```json".to_string());
    lines.push(format!("{:#}", ExampleGenerator::example_object(spec)));
    lines.push("```".to_string());
    lines.push(String::new());
    lines.push("**Request Fields:**".to_string());
    lines.push(String::new());
    lines.push("| Field | Type | Required | Validation | Description |".to_string());
    lines.push("|-------|------|----------|------------|-------------|".to_string());

    for field in &spec.fields {
        let required = if field.required { "✓" } else { "" };
        let rules = if field.validation_rules.is_empty() {
            "-".to_string()
        } else {
            field.validation_rules.join(", ")
        };
        let description = if field.description.is_empty() {
            "-"
        } else {
            field.description.as_str()
        };
        lines.push(format!(
            "| `{}` | `{}` | {} | {} | {} |",
            field.external_name, field.declared_type, required, rules, description
        ));
    }
    lines.push(String::new());
}

/// A list endpoint returns a paginated result set.
///
/// Listing handlers start with `List`, or mention `Get` without `ByID`, and their
/// path carries no `:param` segment.
fn is_listing(endpoint: &Endpoint) -> bool {
    let has_identifier = endpoint.path.split('/').any(|s| s.starts_with(':'));
    let handler = endpoint.handler_name.as_str();
    let lists = handler.starts_with("List") || (handler.contains("Get") && !handler.contains("ByID"));
    lists && !has_identifier
}

fn push_filters(lines: &mut Vec<String>, filters: &[FilterSpec]) {
    lines.push("## Available Filters".to_string());
    lines.push(String::new());
    lines.push("| Filter | Type | Description |".to_string());
    lines.push("|--------|------|-------------|".to_string());
    for filter in filters {
        lines.push(format!(
            "| `{}` | `{}` | Filter by {} |",
            filter.name,
            filter.declared_type,
            filter.name.replace('_', " ")
        ));
    }

    lines.extend(["", "**Example:**", "", "```json", "{"].map(String::from));
    let entries: Vec<String> = filters
        .iter()
        .take(FILTER_EXAMPLE_LIMIT)
        .map(|filter| {
            let value = if filter.declared_type.contains("[]") {
                "[1, 2]"
            } else if filter.declared_type.to_lowercase().contains("int") {
                "1"
            } else {
                "\"value\""
            };
            format!("  \"{}\": {}", filter.name, value)
        })
        .collect();
    lines.push(entries.join(",\n"));
    lines.extend(["}", "```", ""].map(String::from));
}

fn push_related_files(lines: &mut Vec<String>, info: &ModuleInfo) {
    let stem = info.name.rsplit('.').next().unwrap_or(&info.name);
    lines.extend(
        [
            "---",
            "",
            "## Related Files",
            "",
            "| File | Description |",
            "|------|-------------|",
        ]
        .map(String::from),
    );
    lines.push(format!("| `{}.controllers.go` | HTTP handlers |", stem));
    lines.push(format!("| `{}.routes.go` | Route definitions |", stem));
    lines.push(format!("| `{}.types.go` | Request/Response types |", stem));
    lines.push(format!("| `{}` | Database structure |", DATABASE_FILE));
}
