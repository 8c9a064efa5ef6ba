//! Custom error types for Pagescout
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for Pagescout operations
#[derive(Error, Debug)]
pub enum PagescoutError {
    /// Configuration errors (missing URL, bad model id, unreadable config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The automation session could not start or exposed no page
    #[error("Session error: {0}")]
    Session(String),

    /// Page navigation failed
    #[error("Navigation error: {0}")]
    Navigation(String),

    /// The structured-extraction call failed or returned bad data
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Closing the session failed
    #[error("Teardown error: {0}")]
    Teardown(String),

    /// Browser automation errors
    #[error("Browser error: {0}")]
    Browser(String),

    /// LLM provider connection or API errors
    #[error("Provider error: {0}")]
    Provider(String),

    /// Agent-browser not installed
    #[error("agent-browser not found. Install with: npm install -g agent-browser && agent-browser install")]
    AgentBrowserNotFound,

    /// Model not available on the provider
    #[error("Model '{0}' not available from the provider")]
    ModelNotFound(String),

    /// Credential variable not set
    #[error("API key not set. Export {0} or add it to .env")]
    MissingApiKey(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type for Pagescout operations
pub type Result<T> = std::result::Result<T, PagescoutError>;

impl PagescoutError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a session error
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Create a navigation error
    pub fn navigation(msg: impl Into<String>) -> Self {
        Self::Navigation(msg.into())
    }

    /// Create an extraction error
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create a teardown error
    pub fn teardown(msg: impl Into<String>) -> Self {
        Self::Teardown(msg.into())
    }

    /// Create a browser error
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    /// Create a provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Wrap an error with additional context
    pub fn with_context<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PagescoutError::config("URL environment variable is not set");
        assert_eq!(
            err.to_string(),
            "Configuration error: URL environment variable is not set"
        );

        let err = PagescoutError::MissingApiKey("GOOGLE_API_KEY".to_string());
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_with_context_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = PagescoutError::with_context("Failed to write output", io);
        assert_eq!(err.to_string(), "Failed to write output: disk full");
        assert!(std::error::Error::source(&err).is_some());
    }
}
