//! Clause builder error types

use thiserror::Error;

/// Errors that can occur while building query clauses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClauseError {
    /// Empty or malformed input to a clause builder
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for clause building
pub type ClauseResult<T> = Result<T, ClauseError>;
