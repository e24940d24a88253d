//! Dispatches incident reports and report reminders.
//!
//! Each operation loads what it needs, looks up the transport active for the
//! incident's project and hands it a template plus the fields that template
//! expects. A project without the required plugin is not an error: the
//! operation logs a warning and returns.
pub mod messaging;

use crate::plugins::TransportError;
use crate::store::StoreError;
use thiserror::Error;

pub use messaging::{get_report_reminder_settings, ReportMessenger};

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),
}
