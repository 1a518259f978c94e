//! Report error types

use crate::client::FetchError;
use crate::soql::ClauseError;
use thiserror::Error;

/// Errors that can occur while producing a report
#[derive(Error, Debug)]
pub enum ReportError {
    /// The report's query could not be built
    #[error(transparent)]
    Clause(#[from] ClauseError),

    /// The remote call failed or returned an unreadable body
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A decoded record lacks the expected columns
    #[error("Malformed record {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    /// No report with this name
    #[error("Unknown report: {0}")]
    UnknownReport(String),
}

impl ReportError {
    /// Network or HTTP status failure
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Fetch(e) if e.is_transport())
    }

    /// Body or record could not be read
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MalformedRecord { .. } | Self::Fetch(FetchError::MalformedResponse(_))
        )
    }
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;
