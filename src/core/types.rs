//! Shared types used across Pagescout modules
//!
//! Contains chat message structures and the extraction record types.

use serde::{Deserialize, Serialize};

/// A message sent to a model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (user, assistant, system)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Whether this is a system message
    pub fn is_system(&self) -> bool {
        self.role == "system"
    }
}

/// One interactive element on a page and the state change it causes.
///
/// Every field is optional text; models frequently omit or null some of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractiveElement {
    /// Section of the site holding the element (Header, Sidebar, Footer, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_section: Option<String>,
    /// CSS selector for that section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_section_selector: Option<String>,
    /// Page state before interacting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_before: Option<String>,
    /// Expected page state after interacting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_after: Option<String>,
    /// What changes between the two states
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_analysis: Option<String>,
    /// Best text locator for the element (aria-label, innerText, alt text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_aria_label: Option<String>,
}

/// Records returned by one extraction call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub interactive_elements: Vec<InteractiveElement>,
}

impl ExtractionResult {
    /// Number of extracted records
    pub fn len(&self) -> usize {
        self.interactive_elements.len()
    }

    /// Whether nothing was extracted
    pub fn is_empty(&self) -> bool {
        self.interactive_elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_accepts_nulls_and_missing_fields() {
        let json = r#"{
            "interactive_elements": [
                {"website_section": "Sidebar", "state_before": null},
                {}
            ]
        }"#;
        let result: ExtractionResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(
            result.interactive_elements[0].website_section.as_deref(),
            Some("Sidebar")
        );
        assert!(result.interactive_elements[0].state_before.is_none());
        assert_eq!(result.interactive_elements[1], InteractiveElement::default());
    }

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let element = InteractiveElement {
            element_aria_label: Some("Collapse the sidebar".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&element).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"element_aria_label": "Collapse the sidebar"})
        );
    }

    #[test]
    fn test_empty_result_serializes_empty_sequence() {
        let value = serde_json::to_value(ExtractionResult::default()).unwrap();
        assert_eq!(value, serde_json::json!({"interactive_elements": []}));
    }
}
