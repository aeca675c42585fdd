//! API operation error types.

use crate::gateway::GatewayError;
use thiserror::Error;

/// Errors that can occur during a typed API operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The gateway call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The request variables could not be encoded.
    #[error("Failed to encode {operation} variables: {source}")]
    Encode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The response did not have the expected shape.
    #[error("Unexpected {operation} response: {message}")]
    UnexpectedResponse {
        operation: &'static str,
        message: String,
    },
}

impl ApiError {
    pub(crate) fn unexpected(operation: &'static str, message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            operation,
            message: message.into(),
        }
    }
}
