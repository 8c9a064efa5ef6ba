//! Record schema for structured extraction
//!
//! Describes the shape the model must return and checks responses against it.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::core::{PagescoutError, Result};

/// One text field of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub description: String,
    /// Whether the model may omit or null this field
    pub optional: bool,
}

impl FieldSpec {
    /// An optional text field
    pub fn optional(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            optional: true,
        }
    }
}

/// A list of text records under one root key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Key of the record array in the response object
    pub root_key: String,
    pub fields: Vec<FieldSpec>,
}

impl RecordSchema {
    /// The six-field interactive element schema
    pub fn interactive_elements() -> Self {
        Self {
            root_key: "interactive_elements".to_string(),
            fields: vec![
                FieldSpec::optional(
                    "website_section",
                    "The section of the website where this element is located (e.g., Header, Sidebar, Main Content, Footer, Navigation, etc.)",
                ),
                FieldSpec::optional(
                    "website_section_selector",
                    "A CSS selector that targets the section containing this element (e.g., 'nav.sidebar', 'header', 'main', '.footer')",
                ),
                FieldSpec::optional(
                    "state_before",
                    "Description of the current state before interacting with this element",
                ),
                FieldSpec::optional(
                    "state_after",
                    "Description of the expected state after interacting with this element",
                ),
                FieldSpec::optional(
                    "change_analysis",
                    "Analysis of what changes occur when this element is interacted with",
                ),
                FieldSpec::optional(
                    "element_aria_label",
                    "The best possible text locator for this element (e.g., aria-label, innerText, label, alt text, etc.)",
                ),
            ],
        }
    }

    /// Render as JSON Schema
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            let ty = if field.optional {
                json!(["string", "null"])
            } else {
                required.push(Value::String(field.name.clone()));
                json!("string")
            };
            properties.insert(
                field.name.clone(),
                json!({ "type": ty, "description": field.description }),
            );
        }

        let mut item = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            item["required"] = Value::Array(required);
        }

        json!({
            "type": "object",
            "properties": {
                self.root_key.clone(): {
                    "type": "array",
                    "items": item,
                }
            },
            "required": [self.root_key],
        })
    }

    /// Check a model response against the schema.
    ///
    /// Unknown fields are tolerated; known fields must be text or null.
    pub fn validate(&self, value: &Value) -> Result<()> {
        let root = value
            .as_object()
            .ok_or_else(|| PagescoutError::extraction("response is not a JSON object"))?;

        let records = root
            .get(&self.root_key)
            .ok_or_else(|| {
                PagescoutError::extraction(format!("response is missing '{}'", self.root_key))
            })?
            .as_array()
            .ok_or_else(|| {
                PagescoutError::extraction(format!("'{}' is not an array", self.root_key))
            })?;

        for (index, record) in records.iter().enumerate() {
            let record = record.as_object().ok_or_else(|| {
                PagescoutError::extraction(format!("record {} is not an object", index))
            })?;

            for field in &self.fields {
                match record.get(&field.name) {
                    Some(Value::String(_)) => {}
                    None | Some(Value::Null) if field.optional => {}
                    None | Some(Value::Null) => {
                        return Err(PagescoutError::extraction(format!(
                            "record {} is missing required field '{}'",
                            index, field.name
                        )))
                    }
                    Some(other) => {
                        return Err(PagescoutError::extraction(format!(
                            "record {} field '{}' is not text: {}",
                            index, field.name, other
                        )))
                    }
                }
            }
        }

        Ok(())
    }
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self::interactive_elements()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_shape() {
        let schema = RecordSchema::interactive_elements().to_json_schema();
        assert_eq!(schema["required"][0], "interactive_elements");

        let items = &schema["properties"]["interactive_elements"]["items"];
        let properties = items["properties"].as_object().unwrap();
        assert_eq!(properties.len(), 6);
        assert_eq!(
            properties["element_aria_label"]["type"],
            json!(["string", "null"])
        );
        assert!(items.get("required").is_none());
    }

    #[test]
    fn test_validate_accepts_partial_records() {
        let schema = RecordSchema::interactive_elements();
        let value = json!({
            "interactive_elements": [
                {"website_section": "Sidebar", "state_after": null, "extra": 3},
                {}
            ]
        });
        assert!(schema.validate(&value).is_ok());
        assert!(schema.validate(&json!({"interactive_elements": []})).is_ok());
    }

    #[test]
    fn test_validate_rejects_wrong_shapes() {
        let schema = RecordSchema::interactive_elements();
        assert!(schema.validate(&json!([])).is_err());
        assert!(schema.validate(&json!({})).is_err());
        assert!(schema
            .validate(&json!({"interactive_elements": {"a": 1}}))
            .is_err());
        assert!(schema
            .validate(&json!({"interactive_elements": ["text"]}))
            .is_err());

        let err = schema
            .validate(&json!({"interactive_elements": [{"state_before": 7}]}))
            .unwrap_err();
        assert!(matches!(err, PagescoutError::Extraction(_)));
        assert!(err.to_string().contains("state_before"));
    }

    #[test]
    fn test_required_fields() {
        let schema = RecordSchema {
            root_key: "links".to_string(),
            fields: vec![FieldSpec {
                name: "href".to_string(),
                description: "target".to_string(),
                optional: false,
            }],
        };
        assert_eq!(
            schema.to_json_schema()["properties"]["links"]["items"]["required"][0],
            "href"
        );
        assert!(schema.validate(&json!({"links": [{"href": "/"}]})).is_ok());
        assert!(schema.validate(&json!({"links": [{"href": null}]})).is_err());
    }
}
