//! Browser-automation session boundary
//!
//! The workflow only needs three capabilities from the automation engine:
//! start a session that exposes a page, navigate that page, and run a
//! structured extraction on it. Everything behind these traits is replaceable.

mod agent_browser;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::Result;
use crate::extract::ExtractRequest;

pub use agent_browser::AgentBrowserSession;

/// A navigable page inside a session
#[async_trait]
pub trait Page: Send + Sync {
    /// Load `url` in the page
    async fn goto(&self, url: &str) -> Result<()>;

    /// Run a structured extraction over the current page content
    async fn extract(&self, request: &ExtractRequest) -> Result<Value>;
}

/// A managed browser-automation session
#[async_trait]
pub trait AutomationSession: Send {
    /// Start the session
    async fn init(&mut self) -> Result<()>;

    /// Page handle, available after a successful `init`
    fn page(&self) -> Option<&dyn Page>;

    /// Release the session. Closing a session that never started is a no-op.
    async fn close(&mut self) -> Result<()>;
}
