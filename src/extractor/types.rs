//! Struct declarations from `<module>.types.go`.

use crate::extractor::{FieldSpec, FilterSpec, TypeSet, TypeSpec};
use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `type Name struct { ... }` where the body holds no further braces.
static STRUCT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"type\s+(\w+)\s+struct\s*\{([^{}]*)\}").expect("valid regex")
});

/// The first struct whose name ends in `Filter` or `Filters`, any case.
static FILTER_STRUCT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"type\s+(\w*(?i:filters?))\s+struct\s*\{([^{}]*)\}").expect("valid regex")
});

/// `Name Type `tag`` with an optional trailing `// comment`.
static FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\w+)\s+([^\s`]+)\s+`([^`]+)`(?:[ \t]*//[ \t]*([^\r\n]*))?").expect("valid regex")
});

static JSON_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bjson:"([^"]*)""#).expect("valid regex"));
static BINDING_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bbinding:"([^"]*)""#).expect("valid regex"));
static VALIDATE_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bvalidate:"([^"]*)""#).expect("valid regex"));

const REQUIRED_RULE: &str = "required";

/// Extracts struct declarations and their tagged fields.
///
/// Structs with nested braces in their body (inline anonymous structs) are not
/// matched at all, and field lines without a backtick tag are skipped.
pub struct TypeExtractor;

impl TypeExtractor {
    /// Collects every struct declared in `content`, in declaration order.
    ///
    /// A later declaration reusing an earlier name is ignored.
    pub fn extract(content: &str) -> TypeSet {
        let mut types = TypeSet::new();

        for caps in STRUCT_RE.captures_iter(content) {
            let name = caps[1].to_string();
            let fields = Self::extract_fields(&caps[2]);
            debug!("Found struct {} with {} tagged fields", name, fields.len());

            if !types.insert(TypeSpec {
                name: name.clone(),
                fields,
            }) {
                debug!("Skipping duplicate struct declaration: {}", name);
            }
        }

        debug!("Extracted {} struct types", types.len());
        types
    }

    /// Parses the tagged fields of a struct body.
    pub fn extract_fields(body: &str) -> Vec<FieldSpec> {
        let mut fields: Vec<FieldSpec> = Vec::new();

        for caps in FIELD_RE.captures_iter(body) {
            let field = Self::parse_field(&caps);
            if fields.iter().any(|f| f.name == field.name) {
                debug!("Skipping repeated field {}", field.name);
                continue;
            }
            fields.push(field);
        }

        fields
    }

    fn parse_field(caps: &Captures<'_>) -> FieldSpec {
        let name = caps[1].to_string();
        let declared_type = caps[2].to_string();
        let tag = &caps[3];

        let external_name = Self::json_name(tag).unwrap_or_else(|| name.to_lowercase());

        let mut required = false;
        let mut validation_rules = Vec::new();
        for re in [&*BINDING_TAG_RE, &*VALIDATE_TAG_RE] {
            let Some(rules) = re.captures(tag) else {
                continue;
            };
            for rule in rules[1].split(',').filter(|r| !r.is_empty()) {
                if rule == REQUIRED_RULE {
                    required = true;
                } else {
                    validation_rules.push(rule.to_string());
                }
            }
        }

        let description = caps
            .get(4)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        FieldSpec {
            name,
            declared_type,
            external_name,
            required,
            validation_rules,
            description,
        }
    }

    /// The name part of a `json:"name,omitempty"` tag, if it is non-empty.
    fn json_name(tag: &str) -> Option<String> {
        let caps = JSON_TAG_RE.captures(tag)?;
        let name = caps[1].split(',').next().unwrap_or_default();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

/// Extracts the filter fields accepted by the module's list endpoint.
pub struct FilterExtractor;

impl FilterExtractor {
    /// Maps each field of the first `*Filter`/`*Filters` struct to its declared type.
    ///
    /// Only the first such struct is read; later filter structs are not merged in.
    pub fn extract(content: &str) -> Vec<FilterSpec> {
        let Some(caps) = FILTER_STRUCT_RE.captures(content) else {
            debug!("No filter struct found");
            return Vec::new();
        };

        let filters: Vec<FilterSpec> = TypeExtractor::extract_fields(&caps[2])
            .into_iter()
            .map(|field| FilterSpec {
                name: field.external_name,
                declared_type: field.declared_type,
            })
            .collect();

        debug!("Filter struct {} has {} fields", &caps[1], filters.len());
        filters
    }
}
