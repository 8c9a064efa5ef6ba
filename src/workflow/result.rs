//! Workflow outcome and exit-code mapping

use serde::Serialize;
use std::fmt;

use crate::core::{ExtractionResult, PagescoutError};

/// Step of the workflow a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Resolving the URL and settings, before any session exists
    Config,
    /// Starting the session and obtaining its page
    Init,
    /// Loading the target URL
    Navigate,
    /// The structured-extraction call
    Extract,
    /// Writing records to the output file
    Output,
    /// Closing the session
    Teardown,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::Init => "init",
            Stage::Navigate => "navigate",
            Stage::Extract => "extract",
            Stage::Output => "output",
            Stage::Teardown => "teardown",
        };
        f.write_str(name)
    }
}

/// An error tagged with the step that produced it
#[derive(Debug)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: PagescoutError,
    /// Records obtained before the failing step
    pub extracted: Option<ExtractionResult>,
}

impl StageFailure {
    pub fn new(stage: Stage, error: PagescoutError) -> Self {
        Self {
            stage,
            error,
            extracted: None,
        }
    }

    /// Keep records that were extracted before this failure
    pub fn with_records(mut self, records: ExtractionResult) -> Self {
        self.extracted = Some(records);
        self
    }
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.error)
    }
}

/// Final result of one run
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set whenever closing the session failed, even after an earlier failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teardown_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted: Option<ExtractionResult>,
}

impl WorkflowResult {
    /// Failure before any session was constructed
    pub fn config_failure(error: &PagescoutError) -> Self {
        Self {
            success: false,
            url: None,
            failed_stage: Some(Stage::Config),
            error: Some(error.to_string()),
            teardown_error: None,
            extracted: None,
        }
    }

    /// Combine the step outcome with the teardown outcome.
    ///
    /// A failed teardown makes the whole run fail, even after a good extraction.
    pub fn from_run(
        url: &str,
        outcome: std::result::Result<ExtractionResult, StageFailure>,
        teardown: crate::core::Result<()>,
    ) -> Self {
        let teardown_error = teardown.err().map(|e| e.to_string());

        let (extracted, mut failed_stage, mut error) = match outcome {
            Ok(records) => (Some(records), None, None),
            Err(failure) => (
                failure.extracted,
                Some(failure.stage),
                Some(failure.error.to_string()),
            ),
        };

        if failed_stage.is_none() {
            if let Some(ref msg) = teardown_error {
                failed_stage = Some(Stage::Teardown);
                error = Some(msg.clone());
            }
        }

        Self {
            success: failed_stage.is_none(),
            url: Some(url.to_string()),
            failed_stage,
            error,
            teardown_error,
            extracted,
        }
    }

    /// Process exit code: 0 on full success, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.success {
            0
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_maps_to_zero() {
        let result = WorkflowResult::from_run(
            "https://example.com/",
            Ok(ExtractionResult::default()),
            Ok(()),
        );
        assert!(result.success);
        assert_eq!(result.exit_code(), 0);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["extracted"]["interactive_elements"], serde_json::json!([]));
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_teardown_failure_overrides_success() {
        let result = WorkflowResult::from_run(
            "https://example.com/",
            Ok(ExtractionResult::default()),
            Err(PagescoutError::browser("close failed")),
        );
        assert!(!result.success);
        assert_eq!(result.exit_code(), 1);
        assert_eq!(result.failed_stage, Some(Stage::Teardown));
        assert!(result.extracted.is_some());
    }

    #[test]
    fn test_earlier_failure_is_kept_over_teardown() {
        let result = WorkflowResult::from_run(
            "https://example.com/",
            Err(StageFailure::new(
                Stage::Navigate,
                PagescoutError::browser("net::ERR_NAME_NOT_RESOLVED"),
            )),
            Err(PagescoutError::browser("close failed")),
        );
        assert_eq!(result.failed_stage, Some(Stage::Navigate));
        assert!(result.error.unwrap().contains("ERR_NAME_NOT_RESOLVED"));
        assert!(result.teardown_error.unwrap().contains("close failed"));
    }

    #[test]
    fn test_output_failure_keeps_records() {
        let records: ExtractionResult = serde_json::from_value(serde_json::json!({
            "interactive_elements": [{"element_aria_label": "Open menu"}]
        }))
        .unwrap();
        let result = WorkflowResult::from_run(
            "https://example.com/",
            Err(StageFailure::new(Stage::Output, PagescoutError::Other("disk full".into()))
                .with_records(records)),
            Ok(()),
        );
        assert!(!result.success);
        assert_eq!(result.failed_stage, Some(Stage::Output));
        assert_eq!(result.extracted.unwrap().len(), 1);
    }

    #[test]
    fn test_config_failure() {
        let result =
            WorkflowResult::config_failure(&PagescoutError::config("URL environment variable is not set"));
        assert_eq!(result.exit_code(), 1);
        assert_eq!(result.failed_stage, Some(Stage::Config));
        assert!(result.url.is_none());
        assert_eq!(Stage::Config.to_string(), "config");
    }
}
