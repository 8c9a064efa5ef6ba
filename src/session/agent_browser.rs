//! Session backed by the agent-browser CLI and an LLM extractor

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::browser::BrowserExecutor;
use crate::core::{Config, PagescoutError, Result};
use crate::extract::{ExtractRequest, Extractor, PageContent};
use crate::llm::create_provider;
use crate::session::{AutomationSession, Page};

/// agent-browser session with an LLM for extraction
pub struct AgentBrowserSession {
    config: Config,
    executor: Arc<BrowserExecutor>,
    page: Option<AgentBrowserPage>,
}

struct AgentBrowserPage {
    executor: Arc<BrowserExecutor>,
    extractor: Extractor,
    wait_for_network_idle: bool,
}

impl AgentBrowserSession {
    /// Construct without touching the browser or the model
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            executor: Arc::new(BrowserExecutor::from_config(&config.browser)),
            page: None,
        }
    }

    /// Whether `init` has succeeded and `close` has not run yet
    pub fn is_open(&self) -> bool {
        self.page.is_some()
    }
}

#[async_trait]
impl AutomationSession for AgentBrowserSession {
    async fn init(&mut self) -> Result<()> {
        if self.page.is_some() {
            return Ok(());
        }

        let (provider, model) = create_provider(&self.config)?;
        let provider_name = provider.name().to_string();
        let extractor = Extractor::from_config(&self.config, provider, model);
        tracing::debug!(
            provider = %provider_name,
            model = extractor.model(),
            "Extraction model ready"
        );

        if !self.executor.is_available().await {
            return Err(PagescoutError::AgentBrowserNotFound);
        }

        self.page = Some(AgentBrowserPage {
            executor: Arc::clone(&self.executor),
            extractor,
            wait_for_network_idle: self.config.browser.wait_for_network_idle,
        });
        Ok(())
    }

    fn page(&self) -> Option<&dyn Page> {
        self.page.as_ref().map(|p| p as &dyn Page)
    }

    async fn close(&mut self) -> Result<()> {
        match self.page.take() {
            Some(_) => self.executor.close().await.map_err(|e| match e {
                PagescoutError::AgentBrowserNotFound => e,
                other => PagescoutError::teardown(other.to_string()),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Page for AgentBrowserPage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.executor
            .open(url, self.wait_for_network_idle)
            .await
            .map_err(|e| match e {
                PagescoutError::AgentBrowserNotFound => e,
                other => PagescoutError::navigation(other.to_string()),
            })
    }

    async fn extract(&self, request: &ExtractRequest) -> Result<Value> {
        let snapshot = self.executor.snapshot(false).await?;

        let url = self.executor.get_url().await.unwrap_or_else(|e| {
            tracing::debug!("Could not read page URL: {}", e);
            String::new()
        });
        let title = self.executor.get_title().await.unwrap_or_else(|e| {
            tracing::debug!("Could not read page title: {}", e);
            String::new()
        });

        tracing::debug!(
            elements = snapshot.count_elements(),
            interactive = snapshot.interactive_elements().len(),
            "Page snapshot taken"
        );

        let content = PageContent {
            url,
            title,
            tree: snapshot.raw_tree().unwrap_or_default().to_string(),
            interactive_summary: snapshot.interactive_lines(),
        };

        self.extractor.extract(request, &content).await
    }
}
