//! Runner error types.

/// Errors that stop a run before or between tickets.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Settings loading and validation errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Identity mapping errors.
    #[error(transparent)]
    Identity(#[from] crate::identity::IdentityError),

    /// Ticket export errors affecting the whole file.
    #[error(transparent)]
    Tickets(#[from] crate::tickets::TicketError),

    /// HTTP client initialization errors.
    #[error(transparent)]
    Gateway(#[from] crate::gateway::GatewayError),

    /// Workspace lookup errors.
    #[error(transparent)]
    Api(#[from] crate::api::ApiError),

    /// The target repository could not be determined.
    #[error("Cannot select a repository: {message}")]
    RepositorySelection { message: String },

    /// The workspace has no pipelines to place issues in.
    #[error("Workspace '{workspace_id}' has no pipelines")]
    NoStages { workspace_id: String },

    /// The configured fallback stage is not a pipeline of the workspace.
    #[error("Fallback stage '{name}' is not a pipeline of the workspace")]
    UnknownFallbackStage { name: String },
}
