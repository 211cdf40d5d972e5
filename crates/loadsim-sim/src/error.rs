//! Simulation driver error types.

use thiserror::Error;

/// Errors that can occur while running simulations.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] loadsim_core::ConfigError),

    #[error("report error: {0}")]
    Report(#[from] loadsim_report::ReportError),

    #[error("simulation task failed: {0}")]
    Join(String),
}

pub type SimResult<T> = Result<T, SimError>;
