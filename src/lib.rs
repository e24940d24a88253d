//! Report dispatch for incident management.
//!
//! This library sends tactical and executive incident reports to chat
//! channels and email groups, and reminds incident commanders when a report
//! is due, through whichever conversation or email plugin is active for the
//! incident's project.
pub mod cli;
pub mod config;
pub mod core;
pub mod formatting;
pub mod messaging;
pub mod plugins;
pub mod report;
pub mod resolve;
pub mod services;
pub mod store;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;

// Re-export core types for convenience
pub use crate::core::*;
pub use crate::report::{DispatchError, ReportMessenger};
