//! GraphQL transport.
//!
//! Every remote call of the migration goes through [`GraphQlGateway`]. The
//! production implementation, [`ZenHubGateway`], posts to a single endpoint
//! with a bearer token.

mod error;

pub use error::GatewayError;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// A single-call abstraction over a GraphQL endpoint.
#[allow(async_fn_in_trait)]
pub trait GraphQlGateway {
    /// Executes a query or mutation and returns the `data` of the response.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the call did not succeed. Callers treat
    /// any error as "the operation did not happen".
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, GatewayError>;
}

impl<G: GraphQlGateway> GraphQlGateway for &G {
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, GatewayError> {
        (**self).execute(query, variables).await
    }
}

/// Gateway for the ZenHub GraphQL API.
#[derive(Debug, Clone)]
pub struct ZenHubGateway {
    client: reqwest::Client,
    endpoint: Url,
    token: String,
}

impl ZenHubGateway {
    /// Creates a gateway posting to `endpoint` with bearer `token`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Client`] if the HTTP client can't be built.
    pub fn new(endpoint: Url, token: impl Into<String>) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ticket-migrator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GatewayError::Client)?;
        Ok(Self {
            client,
            endpoint,
            token: token.into(),
        })
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl GraphQlGateway for ZenHubGateway {
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, GatewayError> {
        debug!(endpoint = %self.endpoint, "Executing GraphQL request");
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .json(&GraphQlRequest {
                query,
                variables: &variables,
            })
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        interpret_response(status, &body)
    }
}

/// Request body of a GraphQL call.
#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: &'a Value,
}

/// Response body of a GraphQL call.
#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

/// Maps an HTTP status and body to the `data` of a GraphQL response.
pub(crate) fn interpret_response(status: u16, body: &str) -> Result<Value, GatewayError> {
    if !(200..300).contains(&status) {
        return Err(GatewayError::Transport {
            status,
            body: body.to_string(),
        });
    }

    let response: GraphQlResponse = serde_json::from_str(body)?;
    let message = response
        .errors
        .iter()
        .map(|error| error.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");

    match response.data {
        Some(data) if message.is_empty() && !data.is_null() => Ok(data),
        Some(data) if !message.is_empty() && has_result(&data) => {
            warn!(errors = %message, "GraphQL response contained errors alongside data");
            Ok(data)
        }
        _ if !message.is_empty() => Err(GatewayError::GraphQl { message }),
        _ => Err(GatewayError::EmptyResponse),
    }
}

/// Returns true if any root field of `data` carries a value.
///
/// A failed operation still returns its root field, set to `null`.
fn has_result(data: &Value) -> bool {
    data.as_object()
        .is_some_and(|fields| fields.values().any(|value| !value.is_null()))
}
