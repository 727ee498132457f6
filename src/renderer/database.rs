//! `DATABASE.md`: table and query reference for a module.

use crate::extractor::sql::column_sql_type;
use crate::extractor::{SqlQuery, TableColumn, INFERRED_COLUMN_TYPE};
use crate::module_info::ModuleInfo;
use crate::renderer::{module_title, title_case};
use std::collections::HashSet;

const STATUS_VALUES: &[&str] = &[
    "---",
    "",
    "## Status / Enum Values",
    "",
    "| Value | Description |",
    "|-------|-------------|",
    "| `pending` | Pending approval |",
    "| `approved` | Approved |",
    "| `rejected` | Rejected |",
    "| `cancelled` | Cancelled |",
];

/// Renders the schema reference.
pub fn render(info: &ModuleInfo) -> String {
    let table = table_name(info);
    let primary_key = primary_key(info, &table);

    let mut lines: Vec<String> = vec![
        format!("# {} Database Structure", module_title(info)),
        String::new(),
        format!("## Table: `{}`", table),
        String::new(),
        "| Column | Type | Nullable | Default | Description |".to_string(),
        "|--------|------|----------|---------|-------------|".to_string(),
        format!("| `{}` | `int4` | No | serial | Primary key |", primary_key),
    ];

    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(primary_key.as_str());
    for column in &info.table_columns {
        if seen.insert(column.name.as_str()) {
            lines.push(column_row(column));
        }
    }

    lines.extend(
        [
            String::new(),
            "### Indexes".to_string(),
            String::new(),
            format!("- Primary key on `{}`", primary_key),
            "- Index on `deleted_at` (soft delete)".to_string(),
            String::new(),
            "---".to_string(),
            String::new(),
            "## SQL Queries".to_string(),
            String::new(),
        ],
    );

    for query in &info.sql_queries {
        push_query(&mut lines, query);
    }

    lines.extend(STATUS_VALUES.iter().map(|l| l.to_string()));

    let mut document = lines.join("\n");
    document.push('\n');
    document
}

/// The inferred table, or the module name with dots replaced by underscores.
fn table_name(info: &ModuleInfo) -> String {
    if info.table_name.is_empty() {
        info.name.replace('.', "_")
    } else {
        info.table_name.clone()
    }
}

/// The inferred key, or `<singular table>_id`.
fn primary_key(info: &ModuleInfo, table: &str) -> String {
    if info.primary_key_column.is_empty() {
        format!("{}_id", table.strip_suffix('s').unwrap_or(table))
    } else {
        info.primary_key_column.clone()
    }
}

fn column_row(column: &TableColumn) -> String {
    let column_type = if column.column_type == INFERRED_COLUMN_TYPE {
        column_sql_type(&column.name)
    } else {
        column.column_type.as_str()
    };
    let nullable = if column.nullable { "Yes" } else { "No" };
    let default_value = if column.default_value.is_empty() {
        "-"
    } else {
        column.default_value.as_str()
    };
    let description = if column.description.is_empty() {
        title_case(&column.name.replace('_', " "))
    } else {
        column.description.clone()
    };

    format!(
        "| `{}` | `{}` | {} | {} | {} |",
        column.name, column_type, nullable, default_value, description
    )
}

fn push_query(lines: &mut Vec<String>, query: &SqlQuery) {
    let parameters = if query.parameter_ordinals.is_empty() {
        "None".to_string()
    } else {
        query
            .parameter_ordinals
            .iter()
            .map(|n| format!("${}", n))
            .collect::<Vec<_>>()
            .join(", ")
    };

    lines.push(format!("### {}", query.name));
    lines.push(String::new());
    lines.push(format!("**Type:** `:{}`  ", query.kind));
    lines.push(format!("**Parameters:** {}", parameters));
    lines.push(String::new());
    lines.push("```sql".to_string());
    lines.push(query.statement.clone());
    lines.push("```".to_string());
    lines.push(String::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::QueryKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_full_document() {
        let mut info = ModuleInfo::new("invoices", "invoices");
        info.table_name = "invoices".to_string();
        info.primary_key_column = "invoice_id".to_string();
        info.table_columns = ["invoice_id", "customer_name", "created_at", "total", "total"]
            .iter()
            .map(|name| TableColumn::inferred(*name))
            .collect();
        info.sql_queries = vec![SqlQuery {
            name: "GetInvoice".to_string(),
            kind: QueryKind::One,
            statement: "SELECT invoice_id, total FROM invoices WHERE invoice_id = $1;".to_string(),
            parameter_ordinals: vec![1],
        }];

        let expected = [
            "# Invoices Database Structure",
            "",
            "## Table: `invoices`",
            "",
            "| Column | Type | Nullable | Default | Description |",
            "|--------|------|----------|---------|-------------|",
            "| `invoice_id` | `int4` | No | serial | Primary key |",
            "| `customer_name` | `varchar` | Yes | - | Customer Name |",
            "| `created_at` | `timestamp` | Yes | - | Created At |",
            "| `total` | `varchar` | Yes | - | Total |",
            "",
            "### Indexes",
            "",
            "- Primary key on `invoice_id`",
            "- Index on `deleted_at` (soft delete)",
            "",
            "---",
            "",
            "## SQL Queries",
            "",
            "### GetInvoice",
            "",
            "**Type:** `:one`  ",
            "**Parameters:** $1",
            "",
            "```sql",
            "SELECT invoice_id, total FROM invoices WHERE invoice_id = $1;",
            "```",
            "",
            "---",
            "",
            "## Status / Enum Values",
            "",
            "| Value | Description |",
            "|-------|-------------|",
            "| `pending` | Pending approval |",
            "| `approved` | Approved |",
            "| `rejected` | Rejected |",
            "| `cancelled` | Cancelled |",
            "",
        ]
        .join("\n");
        assert_eq!(render(&info), expected);
    }

    #[test]
    fn test_fallback_table_and_key() {
        let info = ModuleInfo::new("customer.invoices", "customer/customer.invoices");
        let doc = render(&info);

        assert!(doc.contains("## Table: `customer_invoices`"));
        assert!(doc.contains("| `customer_invoice_id` | `int4` | No | serial | Primary key |"));
    }

    #[test]
    fn test_query_without_parameters() {
        let mut info = ModuleInfo::new("invoices", "invoices");
        info.sql_queries = vec![SqlQuery {
            name: "CountInvoices".to_string(),
            kind: QueryKind::ExecRows,
            statement: "DELETE FROM invoices;".to_string(),
            parameter_ordinals: Vec::new(),
        }];

        let doc = render(&info);

        assert!(doc.contains("**Type:** `:execrows`  \n**Parameters:** None"));
    }
}
