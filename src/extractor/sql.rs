//! sqlc query files and the table shape they imply.

use crate::extractor::{QueryKind, SqlQuery, TableColumn};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Start of a query block; also ends the previous one.
static MARKER_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"--\s*name:").expect("valid regex"));

/// `-- name: GetCustomer :one`
static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^--\s*name:\s*(\w+)\s+:(execrows|exec|many|one)\b").expect("valid regex")
});

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$(\d+)").expect("valid regex"));

static FROM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bFROM\s+(\w+)").expect("valid regex"));

static SELECT_LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\bSELECT\s+(.*?)\s+FROM\b").expect("valid regex"));

/// `alias.column` or a bare word
static COLUMN_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+\.\w+|\w+").expect("valid regex"));

/// Words in a select list that never name a column.
const SELECT_KEYWORDS: &[&str] = &["*", "AS", "CASE", "WHEN", "THEN", "END", "COUNT", "SUM"];

const PRIMARY_KEY_SUFFIX: &str = "_id";

/// Splits a query file into its named queries.
pub struct SqlExtractor;

impl SqlExtractor {
    /// Returns every block that starts with a recognisable `-- name:` marker.
    ///
    /// Text before the first marker and blocks with an unknown kind are dropped.
    pub fn extract(content: &str) -> Vec<SqlQuery> {
        let starts: Vec<usize> = MARKER_START_RE
            .find_iter(content)
            .map(|m| m.start())
            .collect();

        let mut queries = Vec::new();
        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(content.len());
            match Self::parse_block(&content[start..end]) {
                Some(query) => queries.push(query),
                None => debug!("Skipping query block without a valid marker at byte {}", start),
            }
        }

        debug!("Extracted {} SQL queries", queries.len());
        queries
    }

    fn parse_block(block: &str) -> Option<SqlQuery> {
        let caps = MARKER_RE.captures(block)?;
        let marker = caps.get(0)?;
        let kind = QueryKind::parse(&caps[2])?;

        let body = block[marker.end()..].trim();
        let statement = match body.find(';') {
            Some(pos) => &body[..=pos],
            None => body,
        };

        Some(SqlQuery {
            name: caps[1].to_string(),
            kind,
            statement: statement.to_string(),
            parameter_ordinals: parameter_ordinals(statement),
        })
    }
}

/// Distinct `$n` placeholders in ascending order.
pub fn parameter_ordinals(statement: &str) -> Vec<u32> {
    PLACEHOLDER_RE
        .captures_iter(statement)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Table name, primary key and columns inferred from query text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferredTable {
    /// Target of the first `FROM`, empty when there is none
    pub table_name: String,
    /// First selected column ending in `_id`, empty when there is none
    pub primary_key: String,
    /// Columns of the first `SELECT` list, in order, possibly repeated
    pub columns: Vec<TableColumn>,
}

/// Infers the module's table from its queries.
pub struct TableInferencer;

impl TableInferencer {
    /// Reads the first `FROM <table>` and the first `SELECT ... FROM` list.
    ///
    /// The primary key is the first `_id` column in select-list order, even when
    /// several are present. Text without `FROM` yields an empty result.
    pub fn infer(sql: &str) -> InferredTable {
        let mut table = InferredTable::default();

        if let Some(caps) = FROM_RE.captures(sql) {
            table.table_name = caps[1].to_string();
        }

        if let Some(caps) = SELECT_LIST_RE.captures(sql) {
            for token in COLUMN_TOKEN_RE.find_iter(&caps[1]) {
                let column = token.as_str().rsplit('.').next().unwrap_or_default();
                if column.is_empty() || is_select_keyword(column) {
                    continue;
                }
                if table.primary_key.is_empty() && column.ends_with(PRIMARY_KEY_SUFFIX) {
                    table.primary_key = column.to_string();
                }
                table.columns.push(TableColumn::inferred(column));
            }
        }

        debug!(
            "Inferred table '{}' with primary key '{}' and {} columns",
            table.table_name,
            table.primary_key,
            table.columns.len()
        );
        table
    }
}

fn is_select_keyword(word: &str) -> bool {
    SELECT_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

/// Display SQL type for a column whose type could not be read from the queries.
pub fn column_sql_type(column: &str) -> &'static str {
    if column.contains("name") {
        "varchar"
    } else if column.ends_with(PRIMARY_KEY_SUFFIX) {
        "int4"
    } else if column.ends_with("_at") {
        "timestamp"
    } else {
        "varchar"
    }
}
