//! LLM-backed structured extraction over a page snapshot

use serde_json::Value;
use std::sync::Arc;

use crate::core::{Config, Message, PagescoutError, Result};
use crate::extract::ExtractRequest;
use crate::llm::{GenerateOptions, LLMProvider};

const SYSTEM_PROMPT: &str = "You extract structured data from web pages. \
You are given the page URL, its title and its accessibility tree. \
Answer with a single JSON object that follows the response schema exactly. \
Only describe elements that appear in the page content; never invent elements.";

/// What the model gets to see of a page
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub url: String,
    pub title: String,
    /// Accessibility tree text
    pub tree: String,
    /// One line per interactive element
    pub interactive_summary: String,
}

impl PageContent {
    /// Render for the prompt, cutting the tree to `max_chars`
    pub fn render(&self, max_chars: usize) -> String {
        let (tree, truncated) = truncate_chars(&self.tree, max_chars);
        let mut out = format!("URL: {}\nTitle: {}\n\n", self.url, self.title);
        out.push_str("=== ACCESSIBILITY TREE ===\n");
        out.push_str(tree);
        if truncated {
            out.push_str("\n[... tree truncated ...]");
        }
        out.push_str("\n\n=== INTERACTIVE ELEMENTS ===\n");
        let summary = self.interactive_summary.trim_end();
        out.push_str(if summary.is_empty() { "(none)" } else { summary });
        out.push('\n');
        out
    }
}

/// Cut `text` to at most `max_chars` characters on a char boundary
fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}

/// Pull the JSON object out of a model reply.
///
/// Handles bare JSON, markdown code fences and leading chatter.
pub fn parse_json_payload(content: &str) -> Result<Value> {
    let trimmed = content.trim();

    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|rest| rest.trim_end().trim_end_matches("```").trim())
        .unwrap_or(trimmed);

    if let Ok(value) = serde_json::from_str(unfenced) {
        return Ok(value);
    }

    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => {
            serde_json::from_str(&unfenced[start..=end]).map_err(|e| {
                PagescoutError::extraction(format!("model reply is not valid JSON: {}", e))
            })
        }
        _ => Err(PagescoutError::extraction(
            "model reply contains no JSON object",
        )),
    }
}

/// Runs extraction requests against one model
#[derive(Clone)]
pub struct Extractor {
    provider: Arc<dyn LLMProvider>,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    max_page_chars: usize,
}

impl Extractor {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: Some(0.1),
            max_tokens: None,
            max_page_chars: 60_000,
        }
    }

    /// Build from configuration with an already-created provider
    pub fn from_config(
        config: &Config,
        provider: Arc<dyn LLMProvider>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: config.model.temperature,
            max_tokens: config.model.max_output_tokens,
            max_page_chars: config.workflow.max_page_chars,
        }
    }

    /// Model name requests are sent to
    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_messages(&self, request: &ExtractRequest, page: &PageContent) -> Vec<Message> {
        let user = format!(
            "INSTRUCTION:\n{}\n\n=== PAGE CONTENT ===\n{}",
            request.instruction,
            page.render(self.max_page_chars)
        );
        vec![Message::system(SYSTEM_PROMPT), Message::user(user)]
    }

    /// Ask the model for records matching `request.schema`
    pub async fn extract(&self, request: &ExtractRequest, page: &PageContent) -> Result<Value> {
        let messages = self.build_messages(request, page);
        let options = GenerateOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stop: None,
            response_schema: Some(request.schema.to_json_schema()),
        };

        let response = self.provider.chat(&self.model, &messages, Some(options)).await?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Extraction call finished"
            );
        }

        let value = parse_json_payload(&response.content)?;
        request.schema.validate(&value)?;
        Ok(value)
    }
}
