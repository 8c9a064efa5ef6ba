//! Workflow module - the sequential init → navigate → extract → close run

mod result;
mod runner;

pub use result::{Stage, StageFailure, WorkflowResult};
pub use runner::{execute, WorkflowRunner};
