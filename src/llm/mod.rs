//! LLM module - Language Model integrations
//!
//! Provides abstractions for the extraction backends: Gemini (default) and Ollama.

pub mod models;
pub mod ollama;
pub mod provider;
pub mod traits;

pub use models::{ModelId, ProviderKind};
pub use ollama::OllamaClient;
pub use provider::create_provider;
pub use traits::{GenerateOptions, LLMProvider, LLMResponse, TokenUsage};
