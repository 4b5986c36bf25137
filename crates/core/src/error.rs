//! Core error types

use thiserror::Error;

/// Core error type for LaunchCore
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid or unparsable configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML
    #[error("Config file parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
