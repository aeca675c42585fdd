//! Gateway error types.

use thiserror::Error;

/// Errors returned by a GraphQL gateway call.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response.
    #[error("Request to GraphQL endpoint failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("GraphQL endpoint returned HTTP {status}: {body}")]
    Transport { status: u16, body: String },

    /// The endpoint reported GraphQL errors and no data.
    #[error("GraphQL error: {message}")]
    GraphQl { message: String },

    /// The response body is not a GraphQL response.
    #[error("Invalid GraphQL response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// The response carried neither data nor errors.
    #[error("GraphQL response contained no data")]
    EmptyResponse,
}
