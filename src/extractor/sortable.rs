//! Sortable field names from `<module>.controllers.go`.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// `case "field":`
static CASE_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"case\s+"(\w+)"\s*:"#).expect("valid regex"));

/// `"key": "value"` entries of a string-to-string map literal.
static MAP_ENTRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""(\w+)"\s*:\s*"[^"]+""#).expect("valid regex"));

/// Case labels that switch on a record status rather than a sort field.
const STATUS_LABELS: &[&str] = &[
    "pending",
    "approved",
    "rejected",
    "cancelled",
    "closed",
    "followup",
];

/// Recovers the fields a list endpoint can sort by.
///
/// Controllers either `switch` on the requested sort field or look it up in a
/// `map[string]string` of field to column. Both are read and unioned.
pub struct SortableFieldExtractor;

impl SortableFieldExtractor {
    /// Returns the sortable field names in sorted order.
    pub fn extract(content: &str) -> Vec<String> {
        let mut fields = BTreeSet::new();

        for caps in CASE_LABEL_RE.captures_iter(content) {
            let label = &caps[1];
            if Self::is_sort_label(label) {
                fields.insert(label.to_string());
            }
        }

        for caps in MAP_ENTRY_RE.captures_iter(content) {
            fields.insert(caps[1].to_string());
        }

        debug!("Extracted {} sortable fields", fields.len());
        fields.into_iter().collect()
    }

    fn is_sort_label(label: &str) -> bool {
        !label.starts_with("asc") && !label.starts_with("desc") && !STATUS_LABELS.contains(&label)
    }
}
