//! Workflow runner
//!
//! init → navigate → extract → log → close, strictly in order. Every step
//! failure becomes part of the `WorkflowResult`; nothing is retried. Once a
//! session exists, `close` runs exactly once, also when a step panics. A
//! panicking `close` is reported as a teardown failure.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::core::{Config, ExtractionResult, PagescoutError, Result};
use crate::extract::ExtractRequest;
use crate::llm::ModelId;
use crate::session::AutomationSession;
use crate::workflow::result::{Stage, StageFailure, WorkflowResult};

/// Runs one extraction workflow against a session
#[derive(Debug, Clone)]
pub struct WorkflowRunner {
    url: url::Url,
    request: ExtractRequest,
    output: Option<PathBuf>,
}

impl WorkflowRunner {
    pub fn new(url: url::Url, request: ExtractRequest) -> Self {
        Self {
            url,
            request,
            output: None,
        }
    }

    /// Resolve the target URL and the request from configuration.
    ///
    /// Fails with a configuration error when the URL is missing or invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let url = config.workflow.url.resolve()?;
        ModelId::parse(&config.model.name)?;

        let mut request = ExtractRequest::interactive_elements(url.as_str());
        if let Some(ref instruction) = config.workflow.instruction {
            request.instruction = instruction.clone();
        }

        Ok(Self {
            url,
            request,
            output: config.workflow.output.clone(),
        })
    }

    /// Also write the extracted records to `path`
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn url(&self) -> &url::Url {
        &self.url
    }

    pub fn request(&self) -> &ExtractRequest {
        &self.request
    }

    /// Run all steps, then close the session.
    pub async fn run<S>(&self, session: &mut S) -> WorkflowResult
    where
        S: AutomationSession + ?Sized,
    {
        let mut stage = Stage::Init;
        let caught = AssertUnwindSafe(self.drive(session, &mut stage))
            .catch_unwind()
            .await;
        let outcome = caught.unwrap_or_else(|panic| {
            Err(StageFailure::new(
                stage,
                PagescoutError::Other(format!("step panicked: {}", panic_message(panic.as_ref()))),
            ))
        });

        match &outcome {
            Ok(_) => info!("Workflow completed successfully"),
            Err(failure) => error!("Workflow failed: {}", failure),
        }

        info!("Closing browser session.");
        let teardown = AssertUnwindSafe(session.close())
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(PagescoutError::Other(format!(
                    "teardown panicked: {}",
                    panic_message(panic.as_ref())
                )))
            });
        if let Err(ref e) = teardown {
            error!("Error closing browser session: {}", e);
        }

        WorkflowResult::from_run(self.url.as_str(), outcome, teardown)
    }

    async fn drive<S>(
        &self,
        session: &mut S,
        stage: &mut Stage,
    ) -> std::result::Result<ExtractionResult, StageFailure>
    where
        S: AutomationSession + ?Sized,
    {
        *stage = Stage::Init;
        info!("Initializing browser session...");
        session
            .init()
            .await
            .map_err(|e| StageFailure::new(Stage::Init, e))?;
        info!("Browser session initialized successfully.");

        let page = session.page().ok_or_else(|| {
            StageFailure::new(
                Stage::Init,
                PagescoutError::session("Failed to get page handle from session"),
            )
        })?;

        *stage = Stage::Navigate;
        info!("Navigating to: {}", self.url);
        page.goto(self.url.as_str())
            .await
            .map_err(|e| StageFailure::new(Stage::Navigate, e))?;

        *stage = Stage::Extract;
        info!("Extracting: reading interactive elements on this page.");
        let value = page
            .extract(&self.request)
            .await
            .map_err(|e| StageFailure::new(Stage::Extract, e))?;

        let records: ExtractionResult = serde_json::from_value(value).map_err(|e| {
            StageFailure::new(
                Stage::Extract,
                PagescoutError::extraction(format!("response does not match records: {}", e)),
            )
        })?;

        info!(
            "Extracted {} element(s): {}",
            records.len(),
            serde_json::to_string_pretty(&records).unwrap_or_default()
        );

        if let Some(ref path) = self.output {
            *stage = Stage::Output;
            if let Err(e) = write_records(path, &records) {
                return Err(StageFailure::new(Stage::Output, e).with_records(records));
            }
            info!("Wrote records to {}", path.display());
        }

        Ok(records)
    }
}

fn write_records(path: &Path, records: &ExtractionResult) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json).map_err(|e| {
        PagescoutError::with_context(format!("Failed to write {}", path.display()), e)
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Resolve settings, open a session and run the workflow.
///
/// `open_session` is only called once the URL resolved; a configuration
/// failure returns before any session exists.
pub async fn execute<S, F>(config: &Config, open_session: F) -> WorkflowResult
where
    S: AutomationSession,
    F: FnOnce(&Config) -> S,
{
    let runner = match WorkflowRunner::from_config(config) {
        Ok(runner) => runner,
        Err(e) => {
            error!("Workflow failed: {}", e);
            return WorkflowResult::config_failure(&e);
        }
    };

    let mut session = open_session(config);
    runner.run(&mut session).await
}
