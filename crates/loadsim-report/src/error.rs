//! Reporting error types.

use thiserror::Error;

/// Errors that can occur while writing reports.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;
