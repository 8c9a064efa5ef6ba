//! Browser executor - wraps agent-browser CLI
//!
//! Provides async interface to agent-browser commands.

use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::browser::snapshot::Snapshot;
use crate::core::config::BrowserConfig;
use crate::core::{PagescoutError, Result};

/// Executor for browser automation via agent-browser CLI
#[derive(Debug, Clone)]
pub struct BrowserExecutor {
    /// agent-browser executable
    executable: String,
    /// Session name for isolation
    session_name: String,
    /// Whether to run in headed mode
    headed: bool,
    /// Per-command timeout
    timeout: Duration,
}

impl BrowserExecutor {
    /// Create a new browser executor
    pub fn new(session_name: impl Into<String>) -> Self {
        Self {
            executable: "agent-browser".to_string(),
            session_name: session_name.into(),
            headed: false,
            timeout: Duration::from_secs(60),
        }
    }

    /// Create an executor from browser configuration
    pub fn from_config(config: &BrowserConfig) -> Self {
        Self {
            executable: config.executable.clone(),
            session_name: config.session_name.clone(),
            headed: config.headed,
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    /// Set headed mode
    pub fn set_headed(&mut self, headed: bool) {
        self.headed = headed;
    }

    /// Session name passed to every command
    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    /// Check if agent-browser is installed
    pub async fn is_available(&self) -> bool {
        Command::new(&self.executable)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Run an agent-browser command
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.executable);
        cmd.args(["--session", &self.session_name]);

        if self.headed {
            cmd.arg("--headed");
        }

        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        tracing::debug!(session = %self.session_name, ?args, "agent-browser");

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| {
                PagescoutError::browser(format!(
                    "agent-browser {} timed out after {:?}",
                    args.first().copied().unwrap_or_default(),
                    self.timeout
                ))
            })?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PagescoutError::AgentBrowserNotFound
                } else {
                    PagescoutError::browser(format!("Failed to run agent-browser: {}", e))
                }
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(PagescoutError::browser(format!(
                "agent-browser command failed: {}",
                stderr.trim()
            )))
        }
    }

    /// Run a command and return JSON output
    async fn run_json_command(&self, args: &[&str]) -> Result<String> {
        let mut full_args: Vec<&str> = args.to_vec();
        full_args.push("--json");
        self.run_command(&full_args).await
    }

    /// Navigate to a URL
    pub async fn open(&self, url: &str, wait_for_load: bool) -> Result<()> {
        self.run_command(&["open", url]).await?;

        // Network idle is best effort; long-polling pages never settle
        if wait_for_load {
            if let Err(e) = self.run_command(&["wait", "--load", "networkidle"]).await {
                tracing::debug!("Network idle wait skipped: {}", e);
            }
        }

        Ok(())
    }

    /// Get page snapshot
    pub async fn snapshot(&self, interactive_only: bool) -> Result<Snapshot> {
        let args = if interactive_only {
            vec!["snapshot", "-i"]
        } else {
            vec!["snapshot"]
        };

        let output = self.run_json_command(&args).await?;
        Snapshot::parse(&output)
    }

    /// Get current URL
    pub async fn get_url(&self) -> Result<String> {
        self.run_command(&["get", "url"])
            .await
            .map(|s| s.trim().to_string())
    }

    /// Get page title
    pub async fn get_title(&self) -> Result<String> {
        self.run_command(&["get", "title"])
            .await
            .map(|s| s.trim().to_string())
    }

    /// Close the browser
    pub async fn close(&self) -> Result<()> {
        self.run_command(&["close"]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_executor() -> BrowserExecutor {
        let config = BrowserConfig {
            executable: "pagescout-no-such-agent-browser".to_string(),
            session_name: "test-session".to_string(),
            headed: false,
            timeout_ms: 5_000,
            wait_for_network_idle: false,
        };
        BrowserExecutor::from_config(&config)
    }

    #[test]
    fn test_executor_creation() {
        let mut executor = BrowserExecutor::new("test-session");
        assert_eq!(executor.session_name(), "test-session");
        assert!(!executor.headed);
        executor.set_headed(true);
        assert!(executor.headed);
    }

    #[test]
    fn test_from_config() {
        let executor = missing_executor();
        assert_eq!(executor.executable, "pagescout-no-such-agent-browser");
        assert_eq!(executor.timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_missing_executable() {
        let executor = missing_executor();
        assert!(!executor.is_available().await);
        assert!(matches!(
            executor.open("https://example.com", false).await,
            Err(PagescoutError::AgentBrowserNotFound)
        ));
        assert!(matches!(
            executor.close().await,
            Err(PagescoutError::AgentBrowserNotFound)
        ));
    }
}
