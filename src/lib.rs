//! Pagescout - interactive element mapping for web pages
//!
//! Opens a browser-automation session, loads one page and asks an LLM to
//! describe every interactive element on it in a fixed record schema.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, logging and error handling
//! - **LLM**: Provider abstraction with Gemini and Ollama implementations
//! - **Browser**: agent-browser CLI executor and snapshot parsing
//! - **Extract**: Instruction, record schema and the LLM extractor
//! - **Session**: The automation-session boundary the workflow runs against
//! - **Workflow**: The init → navigate → extract → close sequence
//! - **CLI**: Auxiliary commands
//!
//! # Usage
//!
//! ```rust,no_run
//! use pagescout::{execute, AgentBrowserSession, Config};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load();
//!     let result = execute(&config, AgentBrowserSession::new).await;
//!     std::process::exit(result.exit_code());
//! }
//! ```

pub mod browser;
pub mod cli;
pub mod core;
pub mod extract;
pub mod llm;
pub mod session;
pub mod workflow;

// Re-export commonly used items
pub use core::{Config, ExtractionResult, InteractiveElement, PagescoutError, Result};
pub use session::{AgentBrowserSession, AutomationSession, Page};
pub use workflow::{execute, Stage, WorkflowResult, WorkflowRunner};
