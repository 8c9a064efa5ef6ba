//! Snapshot parsing for agent-browser output
//!
//! Parses the accessibility tree JSON from agent-browser.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::{PagescoutError, Result};

/// Roles a user can act on
const INTERACTIVE_ROLES: &[&str] = &[
    "button",
    "link",
    "textbox",
    "checkbox",
    "radio",
    "combobox",
    "menuitem",
    "tab",
    "switch",
    "searchbox",
    "slider",
    "spinbutton",
];

/// Parsed snapshot from agent-browser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Whether the operation succeeded
    #[serde(default)]
    pub success: bool,
    /// Snapshot data
    #[serde(default)]
    pub data: Option<SnapshotData>,
    /// Error text when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Snapshot data content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotData {
    /// Raw snapshot string (accessibility tree)
    #[serde(default)]
    pub snapshot: String,
    /// Element refs mapped to their info
    #[serde(default)]
    pub refs: BTreeMap<String, Element>,
}

/// An element in the snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    /// ARIA role
    #[serde(default)]
    pub role: String,
    /// Accessible name
    #[serde(default)]
    pub name: String,
    /// Element value (for inputs)
    #[serde(default)]
    pub value: Option<String>,
    /// Whether element is focused
    #[serde(default)]
    pub focused: bool,
    /// Additional properties
    #[serde(flatten)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl Snapshot {
    /// Parse `snapshot --json` output, surfacing agent-browser's own failure
    pub fn parse(output: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(output.trim())?;
        if !snapshot.success {
            return Err(PagescoutError::browser(format!(
                "snapshot failed: {}",
                snapshot.error.as_deref().unwrap_or("no error reported")
            )));
        }
        Ok(snapshot)
    }

    /// Count the number of elements with refs
    pub fn count_elements(&self) -> usize {
        self.data.as_ref().map(|d| d.refs.len()).unwrap_or(0)
    }

    /// Get all interactive elements
    pub fn interactive_elements(&self) -> Vec<(&String, &Element)> {
        self.data
            .as_ref()
            .map(|d| d.refs.iter().filter(|(_, el)| el.is_interactive()).collect())
            .unwrap_or_default()
    }

    /// Get the raw accessibility tree string
    pub fn raw_tree(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.snapshot.as_str())
    }

    /// One `@ref: role "name"` line per interactive element
    pub fn interactive_lines(&self) -> String {
        let mut output = String::new();
        for (ref_id, element) in self.interactive_elements() {
            let value_str = element
                .value
                .as_ref()
                .map(|v| format!(" = \"{}\"", v))
                .unwrap_or_default();

            output.push_str(&format!(
                "  @{}: {} \"{}\"{}",
                ref_id, element.role, element.name, value_str
            ));

            if element.focused {
                output.push_str(" [focused]");
            }

            output.push('\n');
        }

        output
    }
}

impl Element {
    /// Check if this is an interactive element
    pub fn is_interactive(&self) -> bool {
        INTERACTIVE_ROLES.contains(&self.role.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "success": true,
        "data": {
            "snapshot": "- navigation\n  - button \"Collapse sidebar\" [ref=e1]\n  - link \"Home\" [ref=e2]\n- heading \"Getting started\" [ref=e3]",
            "refs": {
                "e1": {"role": "button", "name": "Collapse sidebar"},
                "e2": {"role": "link", "name": "Home", "focused": true},
                "e3": {"role": "heading", "name": "Getting started", "level": 1}
            }
        }
    }"#;

    #[test]
    fn test_parse_and_filter() {
        let snapshot = Snapshot::parse(SAMPLE).unwrap();
        assert_eq!(snapshot.count_elements(), 3);

        let interactive = snapshot.interactive_elements();
        assert_eq!(interactive.len(), 2);
        assert_eq!(interactive[0].0, "e1");

        let heading = &snapshot.data.as_ref().unwrap().refs["e3"];
        assert_eq!(heading.properties["level"], 1);
        assert!(snapshot.raw_tree().unwrap().contains("Collapse sidebar"));
    }

    #[test]
    fn test_interactive_lines() {
        let snapshot = Snapshot::parse(SAMPLE).unwrap();
        let text = snapshot.interactive_lines();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("@e1: button \"Collapse sidebar\""));
        assert!(text.contains("@e2: link \"Home\" [focused]"));
        assert!(!text.contains("heading"));
    }

    #[test]
    fn test_failed_snapshot_is_error() {
        let err = Snapshot::parse(r#"{"success": false, "error": "no page open"}"#).unwrap_err();
        assert!(err.to_string().contains("no page open"));
        assert!(Snapshot::parse("not json").is_err());
    }
}
