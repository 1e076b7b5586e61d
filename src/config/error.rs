//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Logging initialisation failed: {0}")]
    Logging(String),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("max_sessions_per_consultant must be between 1 and 10000")]
    InvalidMaxSessions,

    #[error("session_timeout_secs must be greater than zero")]
    InvalidSessionTimeout,

    #[error("cleanup_interval_secs must be greater than zero")]
    InvalidCleanupInterval,

    #[error("Invalid roster: {0}")]
    InvalidRoster(#[from] crate::domain::foundation::ValidationError),

    #[error("Invalid log filter: {0}")]
    InvalidLogLevel(String),
}
