//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading or validating a simulation config.
///
/// Values are rejected, never clamped.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("simulation length must be greater than zero")]
    ZeroHorizon,

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },

    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render config file: {0}")]
    Render(#[from] toml::ser::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
