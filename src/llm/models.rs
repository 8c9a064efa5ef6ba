//! Model identifiers and presets
//!
//! Model names carry their provider as a prefix: `google/gemini-2.0-flash`,
//! `ollama/qwen3:8b`. A bare name is treated as a Google model.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{PagescoutError, Result};

/// Backend serving a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Generative Language API
    Google,
    /// Local Ollama server
    Ollama,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Google => write!(f, "google"),
            ProviderKind::Ollama => write!(f, "ollama"),
        }
    }
}

/// A parsed `provider/model` identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelId {
    pub provider: ProviderKind,
    pub name: String,
}

impl ModelId {
    /// Parse an identifier such as `google/gemini-2.5-flash-preview-05-20`
    pub fn parse(id: &str) -> Result<Self> {
        let id = id.trim();
        if id.is_empty() {
            return Err(PagescoutError::config("Model name is empty"));
        }

        let (provider, name) = match id.split_once('/') {
            Some((prefix, rest)) => {
                let provider = match prefix.to_lowercase().as_str() {
                    "google" | "gemini" => ProviderKind::Google,
                    "ollama" => ProviderKind::Ollama,
                    other => {
                        return Err(PagescoutError::config(format!(
                            "Unknown model provider '{}' in '{}'",
                            other, id
                        )))
                    }
                };
                (provider, rest)
            }
            None => (ProviderKind::Google, id),
        };

        if name.is_empty() {
            return Err(PagescoutError::config(format!(
                "Model name missing in '{}'",
                id
            )));
        }

        Ok(Self {
            provider,
            name: name.to_string(),
        })
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.name)
    }
}

/// Model preset with recommended settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPreset {
    /// Full model identifier
    pub id: String,
    /// Human-readable display name
    pub display_name: String,
    /// Description of the model
    pub description: String,
}

/// Get predefined model presets
pub fn get_model_presets() -> Vec<ModelPreset> {
    vec![
        ModelPreset {
            id: "google/gemini-2.5-flash-preview-05-20".to_string(),
            display_name: "Gemini 2.5 Flash (preview)".to_string(),
            description: "Fast extraction over large pages".to_string(),
        },
        ModelPreset {
            id: "google/gemini-2.0-flash".to_string(),
            display_name: "Gemini 2.0 Flash".to_string(),
            description: "Cheaper, slightly less thorough".to_string(),
        },
        ModelPreset {
            id: "google/gemini-2.5-pro".to_string(),
            display_name: "Gemini 2.5 Pro".to_string(),
            description: "Most accurate selectors, slowest".to_string(),
        },
        ModelPreset {
            id: "ollama/qwen3:8b".to_string(),
            display_name: "Qwen 3 8B (local)".to_string(),
            description: "Offline extraction through Ollama".to_string(),
        },
    ]
}

/// Find a model preset by identifier
pub fn find_preset(id: &str) -> Option<ModelPreset> {
    get_model_presets().into_iter().find(|p| p.id == id)
}
