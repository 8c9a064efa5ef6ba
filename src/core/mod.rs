//! Core module - shared infrastructure for Pagescout
//!
//! This module contains foundational types, configuration, logging and error
//! handling used throughout the application.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::{Config, UrlSource};
pub use error::{PagescoutError, Result};
pub use types::*;
