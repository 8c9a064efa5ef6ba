//! Configuration management for Pagescout
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: ~/.config/pagescout/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{PagescoutError, Result};

/// Default model identifier (`provider/model`)
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-preview-05-20";

/// Environment variable holding the Google API key
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Environment variable holding the target URL
pub const DEFAULT_URL_ENV: &str = "URL";

/// Main configuration for Pagescout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Model configuration
    #[serde(default)]
    pub model: ModelConfig,
    /// Gemini API configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Ollama server configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
    /// Browser configuration
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Workflow configuration
    #[serde(default)]
    pub workflow: WorkflowConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier, e.g. `google/gemini-2.5-flash-preview-05-20` or `ollama/qwen3:8b`
    pub name: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Sampling temperature for extraction
    pub temperature: Option<f32>,
    /// Cap on generated tokens
    pub max_output_tokens: Option<u32>,
    /// Resolved API key. Never written to disk.
    #[serde(skip)]
    pub api_key: Option<String>,
}

/// Gemini REST API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Base URL of the Generative Language API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Ollama server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Host address (default: localhost)
    pub host: String,
    /// Port number (default: 11434)
    pub port: u16,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Browser automation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// agent-browser executable name or path
    pub executable: String,
    /// Session name for agent-browser
    pub session_name: String,
    /// Whether to run in headed mode (visible browser)
    pub headed: bool,
    /// Timeout for a single browser command in ms
    pub timeout_ms: u64,
    /// Wait for network idle after navigation
    pub wait_for_network_idle: bool,
}

/// Where the target URL comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum UrlSource {
    /// A fixed URL
    Literal { value: String },
    /// Read from an environment variable at run time
    Env { var: String },
}

/// Workflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Target URL source
    pub url: UrlSource,
    /// Replaces the built-in extraction instruction
    pub instruction: Option<String>,
    /// Page content sent to the model is cut at this many characters
    pub max_page_chars: usize,
    /// Write extracted records to this JSON file
    pub output: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 0 = warnings only, 1 = status lines, 2 = debug
    pub verbose: u8,
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default)
}

impl Default for ModelConfig {
    fn default() -> Self {
        let api_key_env = DEFAULT_API_KEY_ENV.to_string();
        Self {
            name: env::var("PAGESCOUT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            api_key: read_api_key(&api_key_env),
            api_key_env,
            temperature: Some(0.1),
            max_output_tokens: None,
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: env::var("OLLAMA_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("OLLAMA_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(11434),
            timeout_secs: 120,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            executable: env::var("PAGESCOUT_AGENT_BROWSER")
                .unwrap_or_else(|_| "agent-browser".to_string()),
            session_name: env::var("PAGESCOUT_BROWSER_SESSION")
                .unwrap_or_else(|_| "pagescout".to_string()),
            headed: env_flag("PAGESCOUT_BROWSER_HEADED", false),
            timeout_ms: 60_000,
            wait_for_network_idle: true,
        }
    }
}

impl Default for UrlSource {
    fn default() -> Self {
        Self::Env {
            var: DEFAULT_URL_ENV.to_string(),
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            url: UrlSource::default(),
            instruction: None,
            max_page_chars: 60_000,
            output: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { verbose: 1 }
    }
}

fn read_api_key(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

impl UrlSource {
    /// Resolve to a validated http(s) URL
    pub fn resolve(&self) -> Result<url::Url> {
        let raw = match self {
            UrlSource::Literal { value } => value.clone(),
            UrlSource::Env { var } => env::var(var)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    PagescoutError::config(format!("{} environment variable is not set", var))
                })?,
        };

        let parsed = url::Url::parse(raw.trim())
            .map_err(|e| PagescoutError::config(format!("Invalid URL '{}': {}", raw, e)))?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(PagescoutError::config(format!(
                "Unsupported URL scheme '{}' in '{}'",
                other, raw
            ))),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pagescout")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > config file > env vars > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        match Self::load_from_path(&Self::config_file()) {
            Ok(config) => config,
            // Fall back to defaults (which respect env vars)
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PagescoutError::config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| PagescoutError::config(format!("Failed to read config: {}", e)))?;

        let mut config: Config = toml::from_str(&content)
            .map_err(|e| PagescoutError::config(format!("Failed to parse config: {}", e)))?;

        config.model.api_key = read_api_key(&config.model.api_key_env);
        Ok(config)
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file();
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| {
                    PagescoutError::config(format!("Failed to create config dir: {}", e))
                })?;
            }
        }

        fs::write(path, self.to_toml()?)
            .map_err(|e| PagescoutError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Get the full Ollama API URL
    pub fn ollama_url(&self) -> String {
        format!("http://{}:{}", self.ollama.host, self.ollama.port)
    }

    /// Render as config file content
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| PagescoutError::config(format!("Failed to serialize config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model.api_key_env, "GOOGLE_API_KEY");
        assert_eq!(config.ollama.timeout_secs, 120);
        assert_eq!(config.logging.verbose, 1);
        assert_eq!(
            config.workflow.url,
            UrlSource::Env {
                var: "URL".to_string()
            }
        );
    }

    #[test]
    fn test_literal_url_resolves() {
        let source = UrlSource::Literal {
            value: "https://vaul.emilkowal.ski/getting-started".to_string(),
        };
        let url = source.resolve().unwrap();
        assert_eq!(url.host_str(), Some("vaul.emilkowal.ski"));
        assert_eq!(url.path(), "/getting-started");
    }

    #[test]
    fn test_missing_env_url_is_config_error() {
        let source = UrlSource::Env {
            var: "PAGESCOUT_TEST_URL_NEVER_SET".to_string(),
        };
        let err = source.resolve().unwrap_err();
        assert!(matches!(err, PagescoutError::Config(_)));
        assert!(err.to_string().contains("PAGESCOUT_TEST_URL_NEVER_SET"));
    }

    #[test]
    fn test_non_http_url_rejected() {
        let source = UrlSource::Literal {
            value: "file:///etc/passwd".to_string(),
        };
        assert!(matches!(source.resolve(), Err(PagescoutError::Config(_))));

        let source = UrlSource::Literal {
            value: "not a url".to_string(),
        };
        assert!(matches!(source.resolve(), Err(PagescoutError::Config(_))));
    }

    #[test]
    fn test_config_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.model.api_key = Some("secret-key".to_string());
        config.workflow.url = UrlSource::Literal {
            value: "https://example.com".to_string(),
        };
        config.save_to(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(!written.contains("secret-key"));
        assert!(written.contains("source = \"literal\""));

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.workflow.url, config.workflow.url);
        assert_eq!(loaded.model.name, config.model.name);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[workflow]\nmax_page_chars = 10\n\n[workflow.url]\nsource = \"env\"\nvar = \"TARGET_PAGE\"\n",
        )
        .unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.workflow.max_page_chars, 10);
        assert_eq!(loaded.browser.session_name, BrowserConfig::default().session_name);
    }

    #[test]
    fn test_ollama_url() {
        let mut config = Config::default();
        config.ollama.host = "localhost".to_string();
        config.ollama.port = 11434;
        assert_eq!(config.ollama_url(), "http://localhost:11434");
    }

    #[test]
    fn test_config_dir() {
        let dir = Config::config_dir();
        assert!(dir.to_string_lossy().contains("pagescout"));
    }

    #[test]
    fn test_to_toml_leaves_out_api_key() {
        let mut config = Config::default();
        config.model.api_key = Some("secret-key".to_string());
        let text = config.to_toml().unwrap();
        assert!(!text.contains("secret-key"));

        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.model.name, config.model.name);
        assert_eq!(parsed.workflow.url, config.workflow.url);
    }
}
