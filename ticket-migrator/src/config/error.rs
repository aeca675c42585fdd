//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading migration settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse settings in '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Validation error in settings.
    #[error("Validation error in '{path}': {message}")]
    ValidationError { path: String, message: String },

    /// A setting the run cannot proceed without was not provided.
    #[error("Missing required setting '{key}' (set it in the config file or on the command line)")]
    MissingSetting { key: &'static str },
}
