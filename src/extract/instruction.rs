//! Natural-language extraction instruction
//!
//! The model gets a worked example of the record format because the schema
//! alone does not tell it how fine-grained the records should be.

const EXAMPLE: &str = r#"Example: a page has a sidebar with a collapse button and a link to the home
page, plus a button in the main body that collapses that section. The records are:

[
  {
    "website_section": "Sidebar",
    "website_section_selector": "nav.sidebar",
    "state_before": "The sidebar is visible.",
    "state_after": "The sidebar is hidden.",
    "change_analysis": "The sidebar is hidden after the click.",
    "element_aria_label": "Collapse the sidebar"
  },
  {
    "website_section": "Sidebar",
    "website_section_selector": "nav.sidebar",
    "state_before": "The page is on the getting started page.",
    "state_after": "The page is navigated to the home page.",
    "change_analysis": "The page is navigated to the home page after the click.",
    "element_aria_label": "Navigate to the home page."
  },
  {
    "website_section": "Main Body",
    "website_section_selector": "section.main",
    "state_before": "The main body is visible.",
    "state_after": "The main body is hidden.",
    "change_analysis": "The main body is hidden after the click.",
    "element_aria_label": "Collapse the main body."
  }
]"#;

/// Build the default instruction for a page
pub fn default_instruction(url: &str) -> String {
    format!(
        "List every action a user can take on {url}. Produce one record per interactive \
element, with these fields:\n\
- website_section: the part of the site the element lives in\n\
- website_section_selector: a CSS selector for that section\n\
- state_before / state_after: the page state before and after interacting\n\
- change_analysis: what changes as a result\n\
- element_aria_label: what the action does, phrased as the best text locator \
(aria-label, inner text, label or alt text)\n\n\
{EXAMPLE}\n\n\
An agent will use these records to find the elements and interact with them on its own, \
so selectors must be accurate and descriptions must match what actually happens."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_mentions_url_and_fields() {
        let text = default_instruction("https://vaul.emilkowal.ski/getting-started");
        assert!(text.contains("https://vaul.emilkowal.ski/getting-started"));
        for field in [
            "website_section",
            "website_section_selector",
            "state_before",
            "state_after",
            "change_analysis",
            "element_aria_label",
        ] {
            assert!(text.contains(field), "missing {}", field);
        }
        assert!(text.contains("nav.sidebar"));
    }
}
