//! Google Gemini Provider
//!
//! Calls the Generative Language REST API (`models/{model}:generateContent`)
//! with an API key, asking for JSON output when a response schema is given.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::core::{Config, Message, PagescoutError, Result};
use crate::llm::traits::{GenerateOptions, LLMProvider, LLMResponse, TokenUsage};

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl GeminiProvider {
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .model
            .api_key
            .clone()
            .ok_or_else(|| PagescoutError::MissingApiKey(config.model.api_key_env.clone()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.gemini.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.gemini.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn build_request(messages: &[Message], options: Option<GenerateOptions>) -> GenerateRequest {
        let system_text: Vec<&str> = messages
            .iter()
            .filter(|m| m.is_system())
            .map(|m| m.content.as_str())
            .collect();

        let system_instruction = (!system_text.is_empty()).then(|| Content {
            role: None,
            parts: vec![Part {
                text: system_text.join("\n\n"),
            }],
        });

        let contents = messages
            .iter()
            .filter(|m| !m.is_system())
            .map(|m| {
                let role = if m.role == "user" { "user" } else { "model" };
                Content {
                    role: Some(role.to_string()),
                    parts: vec![Part {
                        text: m.content.clone(),
                    }],
                }
            })
            .collect();

        let generation_config = options.map(|opts| {
            let json_mode = opts.response_schema.is_some();
            GenerationConfig {
                temperature: opts.temperature,
                max_output_tokens: opts.max_tokens,
                stop_sequences: opts.stop,
                response_mime_type: json_mode.then(|| "application/json".to_string()),
                response_schema: opts.response_schema.as_ref().map(to_gemini_schema),
            }
        });

        GenerateRequest {
            system_instruction,
            contents,
            generation_config,
        }
    }

    fn parse_response(response: GenerateResponse, model: &str) -> Result<LLMResponse> {
        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(PagescoutError::provider(format!(
                "Gemini blocked the prompt: {}",
                reason
            )));
        }

        let candidate = response
            .candidates
            .first()
            .ok_or_else(|| PagescoutError::provider("Gemini returned no candidates"))?;

        let content: String = candidate
            .content
            .as_ref()
            .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(PagescoutError::provider(format!(
                "Gemini returned an empty candidate (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        let usage = response.usage_metadata.as_ref().and_then(|u| {
            TokenUsage::from_counts(u.prompt_token_count, u.candidates_token_count)
        });

        Ok(LLMResponse {
            content,
            usage,
            model: response.model_version.unwrap_or_else(|| model.to_string()),
        })
    }
}

/// Convert a JSON schema into the OpenAPI subset Gemini accepts.
///
/// Types become upper-case and `["string", "null"]` becomes `STRING` + `nullable`.
pub fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, value) in map {
                match (key.as_str(), value) {
                    ("type", Value::String(t)) => {
                        out.insert(key.clone(), Value::String(t.to_uppercase()));
                    }
                    ("type", Value::Array(types)) => {
                        let mut nullable = false;
                        let mut concrete = None;
                        for t in types.iter().filter_map(Value::as_str) {
                            if t == "null" {
                                nullable = true;
                            } else if concrete.is_none() {
                                concrete = Some(t.to_uppercase());
                            }
                        }
                        if let Some(t) = concrete {
                            out.insert(key.clone(), Value::String(t));
                        }
                        if nullable {
                            out.insert("nullable".to_string(), Value::Bool(true));
                        }
                    }
                    ("additionalProperties", _) | ("$schema", _) => {}
                    ("properties", Value::Object(props)) => {
                        let converted = props
                            .iter()
                            .map(|(name, prop)| (name.clone(), to_gemini_schema(prop)))
                            .collect();
                        out.insert(key.clone(), Value::Object(converted));
                    }
                    _ => {
                        out.insert(key.clone(), to_gemini_schema(value));
                    }
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(to_gemini_schema).collect()),
        other => other.clone(),
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        options: Option<GenerateOptions>,
    ) -> Result<LLMResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let body = Self::build_request(messages, options);
        tracing::debug!(model, "Sending Gemini generateContent request");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();

            if status.as_u16() == 404 {
                return Err(PagescoutError::ModelNotFound(model.to_string()));
            }

            return Err(PagescoutError::provider(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let response: GenerateResponse = resp.json().await?;
        Self::parse_response(response, model)
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let resp = self
            .client
            .get(format!("{}/models", self.base_url))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(PagescoutError::provider("Failed to list models"));
        }

        let models: ModelsResponse = resp.json().await?;
        Ok(models
            .models
            .into_iter()
            .filter(|m| {
                m.supported_generation_methods
                    .iter()
                    .any(|g| g == "generateContent")
            })
            .map(|m| m.name.trim_start_matches("models/").to_string())
            .collect())
    }

    fn name(&self) -> &str {
        "google"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key() {
        let mut config = Config::default();
        config.model.api_key = None;
        config.model.api_key_env = "PAGESCOUT_TEST_KEY".to_string();
        match GeminiProvider::from_config(&config) {
            Err(PagescoutError::MissingApiKey(var)) => assert_eq!(var, "PAGESCOUT_TEST_KEY"),
            other => panic!("expected MissingApiKey, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_request_splits_system_instruction() {
        let messages = [
            Message::system("Extract data."),
            Message::user("Page content"),
        ];
        let options = GenerateOptions {
            temperature: Some(0.1),
            response_schema: Some(serde_json::json!({"type": "object"})),
            ..Default::default()
        };
        let request = GeminiProvider::build_request(&messages, Some(options));
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value["systemInstruction"]["parts"][0]["text"],
            "Extract data."
        );
        assert_eq!(value["contents"].as_array().unwrap().len(), 1);
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_gemini_schema_conversion() {
        let schema = serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "items": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "type": {"type": ["string", "null"], "description": "kind"}
                        }
                    }
                }
            },
            "required": ["items"]
        });
        let converted = to_gemini_schema(&schema);
        assert_eq!(converted["type"], "OBJECT");
        assert!(converted.get("additionalProperties").is_none());
        let field = &converted["properties"]["items"]["items"]["properties"]["type"];
        assert_eq!(field["type"], "STRING");
        assert_eq!(field["nullable"], true);
        assert_eq!(field["description"], "kind");
        assert_eq!(converted["required"][0], "items");
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let raw = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"interactive_"}, {"text": "elements\": []}"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 40, "candidatesTokenCount": 8, "totalTokenCount": 48},
            "modelVersion": "gemini-2.5-flash-preview-05-20"
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        let response = GeminiProvider::parse_response(parsed, "gemini").unwrap();
        assert_eq!(response.content, "{\"interactive_elements\": []}");
        assert_eq!(response.usage.unwrap().total_tokens, 48);
        assert_eq!(response.model, "gemini-2.5-flash-preview-05-20");
    }

    #[test]
    fn test_parse_response_errors() {
        let blocked: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert!(GeminiProvider::parse_response(blocked, "m").is_err());

        let empty: GenerateResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#).unwrap();
        let err = GeminiProvider::parse_response(empty, "m").unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }
}
