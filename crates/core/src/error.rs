//! Error types for configuration loading

use thiserror::Error;

/// Startup configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set: add it to the .env file or the process environment")]
    MissingRequiredConfiguration(&'static str),
}

/// Result type alias for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;
