use crate::extractor::{FieldSpec, TypeSpec};
use serde_json::{json, Map, Value};

/// Example generator - builds representative JSON values for request fields
///
/// Values are chosen from the declared Go type and hints in the field's JSON name.
pub struct ExampleGenerator;

impl ExampleGenerator {
    /// An example value for a single field.
    ///
    /// | Declared type        | Example                                  |
    /// |----------------------|------------------------------------------|
    /// | `[]T`                | two elements, strings or integers        |
    /// | `json.RawMessage`    | `{}`                                     |
    /// | contains `string`    | literal picked from the field name       |
    /// | contains `int`       | `1`                                      |
    /// | contains `bool`      | `true`                                   |
    /// | anything else        | `null`                                   |
    pub fn example_value(field: &FieldSpec) -> Value {
        let declared = field.declared_type.as_str();
        let lowered = declared.to_lowercase();

        if declared.starts_with("[]") {
            return if lowered.contains("string") {
                json!(["value1", "value2"])
            } else {
                json!([1, 2])
            };
        }
        if declared.contains("json.RawMessage") {
            return Value::Object(Map::new());
        }
        if lowered.contains("string") {
            return Value::String(Self::string_example(&field.external_name).to_string());
        }
        if lowered.contains("int") && !lowered.contains("interface") {
            return json!(1);
        }
        if lowered.contains("bool") {
            return Value::Bool(true);
        }
        Value::Null
    }

    /// A JSON object with one example value per field, in declaration order.
    pub fn example_object(spec: &TypeSpec) -> Value {
        let object: Map<String, Value> = spec
            .fields
            .iter()
            .map(|field| (field.external_name.clone(), Self::example_value(field)))
            .collect();
        Value::Object(object)
    }

    fn string_example(external_name: &str) -> &'static str {
        if external_name.contains("email") {
            "user@example.com"
        } else if external_name.contains("name") {
            "John Doe"
        } else if external_name.contains("phone") {
            "+84123456789"
        } else if external_name.contains("url") || external_name.contains("avatar") {
            "https://example.com/image.jpg"
        } else if external_name.contains("date") {
            "2026-01-21"
        } else {
            "example_value"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(external_name: &str, declared_type: &str) -> FieldSpec {
        FieldSpec {
            name: external_name.to_string(),
            declared_type: declared_type.to_string(),
            external_name: external_name.to_string(),
            required: false,
            validation_rules: Vec::new(),
            description: String::new(),
        }
    }

    #[test]
    fn test_string_hints() {
        assert_eq!(ExampleGenerator::example_value(&field("email", "string")), json!("user@example.com"));
        assert_eq!(ExampleGenerator::example_value(&field("full_name", "*string")), json!("John Doe"));
        assert_eq!(ExampleGenerator::example_value(&field("phone", "string")), json!("+84123456789"));
        assert_eq!(
            ExampleGenerator::example_value(&field("avatar", "string")),
            json!("https://example.com/image.jpg")
        );
        assert_eq!(ExampleGenerator::example_value(&field("due_date", "string")), json!("2026-01-21"));
        assert_eq!(ExampleGenerator::example_value(&field("note", "string")), json!("example_value"));
    }

    #[test]
    fn test_scalars() {
        assert_eq!(ExampleGenerator::example_value(&field("count", "int32")), json!(1));
        assert_eq!(ExampleGenerator::example_value(&field("branch_id", "*int64")), json!(1));
        assert_eq!(ExampleGenerator::example_value(&field("active", "bool")), json!(true));
    }

    #[test]
    fn test_sequences() {
        assert_eq!(ExampleGenerator::example_value(&field("tags", "[]string")), json!(["value1", "value2"]));
        assert_eq!(ExampleGenerator::example_value(&field("ids", "[]int32")), json!([1, 2]));
    }

    #[test]
    fn test_raw_message_and_unknown() {
        assert_eq!(ExampleGenerator::example_value(&field("meta", "json.RawMessage")), json!({}));
        assert_eq!(ExampleGenerator::example_value(&field("amount", "float64")), Value::Null);
        assert_eq!(ExampleGenerator::example_value(&field("created", "time.Time")), Value::Null);
        assert_eq!(ExampleGenerator::example_value(&field("extra", "interface{}")), Value::Null);
    }

    #[test]
    fn test_example_object_keeps_field_order() {
        let spec = TypeSpec {
            name: "CreateCustomerRequest".to_string(),
            fields: vec![field("name", "string"), field("age", "int"), field("email", "string")],
        };

        let rendered = serde_json::to_string(&ExampleGenerator::example_object(&spec)).unwrap();
        assert_eq!(rendered, r#"{"name":"John Doe","age":1,"email":"user@example.com"}"#);
    }
}
