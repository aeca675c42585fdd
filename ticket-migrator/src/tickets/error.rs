//! Ticket loading error types.

use thiserror::Error;

/// Errors that can occur while reading the ticket export.
#[derive(Debug, Error)]
pub enum TicketError {
    /// Failed to open the export.
    #[error("Failed to read tickets file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The export could not be read as CSV.
    #[error("Failed to parse tickets file '{path}': {source}")]
    CsvError {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// The header row lacks a required column.
    #[error("Tickets file '{path}' has no '{column}' column")]
    MissingColumn { path: String, column: &'static str },

    /// A row could not be split into the expected fields.
    #[error("Row {line}: {message}")]
    MalformedRow { line: u64, message: String },

    /// A required field of a row is empty.
    #[error("Row {line}: required field '{field}' is empty")]
    MissingField { line: u64, field: &'static str },

    /// The estimate is not a number.
    #[error("Row {line}: estimate '{value}' is not a number")]
    InvalidEstimate { line: u64, value: String },
}

impl TicketError {
    /// Returns the line of the offending row for row-level errors.
    #[must_use]
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::MalformedRow { line, .. }
            | Self::MissingField { line, .. }
            | Self::InvalidEstimate { line, .. } => Some(*line),
            _ => None,
        }
    }
}
