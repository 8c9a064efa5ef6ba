//! Ollama client implementation
//!
//! Async HTTP client for a local Ollama server with JSON-schema constrained output.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::{Config, Message, PagescoutError, Result};
use crate::llm::traits::{GenerateOptions, LLMProvider, LLMResponse, TokenUsage};

/// Ollama API client
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

/// Ollama chat request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
    stream: bool,
}

/// Ollama message format
#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

/// Ollama generation options
#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

/// Ollama chat response (non-streaming)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: OllamaMessage,
    model: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

/// Ollama models list response
#[derive(Debug, Deserialize)]
struct ModelsResponse {
    models: Vec<ModelInfo>,
}

/// Model information
#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}

impl OllamaClient {
    /// Create a new Ollama client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.ollama.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.ollama_url(),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Convert internal Message to Ollama format
    fn to_ollama_message(msg: &Message) -> OllamaMessage {
        OllamaMessage {
            role: msg.role.clone(),
            content: msg.content.clone(),
        }
    }

    /// Build the request body for a chat call
    fn build_request<'a>(
        model: &'a str,
        messages: &[Message],
        options: Option<GenerateOptions>,
    ) -> ChatRequest<'a> {
        let (format, ollama_options) = match options {
            Some(opts) => (
                opts.response_schema,
                Some(OllamaOptions {
                    temperature: opts.temperature,
                    num_predict: opts.max_tokens,
                    stop: opts.stop,
                }),
            ),
            None => (None, None),
        };

        ChatRequest {
            model,
            messages: messages.iter().map(Self::to_ollama_message).collect(),
            format,
            options: ollama_options,
            stream: false,
        }
    }

    /// Convert Ollama response to LLMResponse
    fn to_llm_response(response: ChatResponse) -> LLMResponse {
        LLMResponse {
            content: response.message.content,
            usage: TokenUsage::from_counts(response.prompt_eval_count, response.eval_count),
            model: response.model,
        }
    }

    fn connect_error(&self, e: reqwest::Error) -> PagescoutError {
        if e.is_connect() {
            PagescoutError::provider(format!(
                "Cannot connect to Ollama at {}. Is it running?",
                self.base_url
            ))
        } else {
            PagescoutError::from(e)
        }
    }
}

#[async_trait]
impl LLMProvider for OllamaClient {
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        options: Option<GenerateOptions>,
    ) -> Result<LLMResponse> {
        let request = Self::build_request(model, messages, options);
        tracing::debug!(model, "Sending Ollama chat request");

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 404 && error_text.contains("not found") {
                return Err(PagescoutError::ModelNotFound(model.to_string()));
            }

            return Err(PagescoutError::provider(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        let response_text = response.text().await?;
        tracing::debug!(bytes = response_text.len(), "Ollama response received");

        let chat_response: ChatResponse = serde_json::from_str(&response_text)
            .map_err(|e| PagescoutError::provider(format!("Failed to parse response: {}", e)))?;

        Ok(Self::to_llm_response(chat_response))
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;

        if !response.status().is_success() {
            return Err(PagescoutError::provider("Failed to list models"));
        }

        let models_response: ModelsResponse = response.json().await?;
        Ok(models_response.models.into_iter().map(|m| m.name).collect())
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let mut config = Config::default();
        config.ollama.host = "localhost".to_string();
        config.ollama.port = 11434;
        let client = OllamaClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[test]
    fn test_request_carries_schema_as_format() {
        let schema = serde_json::json!({"type": "object"});
        let options = GenerateOptions {
            temperature: Some(0.1),
            response_schema: Some(schema.clone()),
            ..Default::default()
        };
        let messages = [Message::system("be precise"), Message::user("Hello")];
        let request = OllamaClient::build_request("qwen3:8b", &messages, Some(options));

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["format"], schema);
        assert_eq!(value["stream"], false);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "Hello");
        assert!(value["options"].get("stop").is_none());
    }

    #[test]
    fn test_response_conversion() {
        let raw = r#"{
            "model": "qwen3:8b",
            "message": {"role": "assistant", "content": "{\"interactive_elements\": []}"},
            "prompt_eval_count": 100,
            "eval_count": 12
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        let response = OllamaClient::to_llm_response(parsed);
        assert_eq!(response.model, "qwen3:8b");
        assert_eq!(response.usage.unwrap().total_tokens, 112);
    }
}
