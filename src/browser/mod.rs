//! Browser automation module
//!
//! Wraps the agent-browser CLI for page loading and accessibility snapshots.

mod executor;
mod snapshot;

pub use executor::BrowserExecutor;
pub use snapshot::{Element, Snapshot, SnapshotData};
