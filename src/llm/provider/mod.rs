//! LLM Provider implementations and factory
//!
//! Submodules implement hosted providers; Ollama lives in `llm::ollama`.

pub mod gemini;

use std::sync::Arc;

use crate::core::{Config, Result};
use crate::llm::models::{ModelId, ProviderKind};
use crate::llm::traits::LLMProvider;
use crate::llm::OllamaClient;

use self::gemini::GeminiProvider;

/// Create a new LLM provider for the configured model.
///
/// Returns the provider together with the bare model name it expects.
pub fn create_provider(config: &Config) -> Result<(Arc<dyn LLMProvider>, String)> {
    let model = ModelId::parse(&config.model.name)?;
    let provider: Arc<dyn LLMProvider> = match model.provider {
        ProviderKind::Google => Arc::new(GeminiProvider::from_config(config)?),
        ProviderKind::Ollama => Arc::new(OllamaClient::from_config(config)?),
    };
    Ok((provider, model.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PagescoutError;

    #[test]
    fn test_factory_selects_backend() {
        let mut config = Config::default();
        config.model.name = "ollama/qwen3:8b".to_string();
        let (provider, model) = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(model, "qwen3:8b");

        config.model.name = "google/gemini-2.0-flash".to_string();
        config.model.api_key = Some("test-key".to_string());
        let (provider, model) = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "google");
        assert_eq!(model, "gemini-2.0-flash");
    }

    #[test]
    fn test_factory_reports_missing_key() {
        let mut config = Config::default();
        config.model.name = "google/gemini-2.0-flash".to_string();
        config.model.api_key = None;
        assert!(matches!(
            create_provider(&config),
            Err(PagescoutError::MissingApiKey(_))
        ));
    }
}
