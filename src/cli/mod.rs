//! CLI module - command-line interface
//!
//! Contains the auxiliary commands; the workflow itself lives in `workflow`.

pub mod commands;

pub use commands::{config_command, models_text, schema_text, ConfigAction};
