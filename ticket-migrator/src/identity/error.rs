//! Identity map error types.

use thiserror::Error;

/// Errors that can occur while loading the username map.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Failed to open the map file.
    #[error("Failed to read user map '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid CSV.
    #[error("Failed to parse user map '{path}': {source}")]
    CsvError {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// The header row lacks a required column.
    #[error("User map '{path}' has no '{column}' column")]
    MissingColumn { path: String, column: &'static str },
}
