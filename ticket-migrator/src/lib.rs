#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod api;
pub mod config;
pub mod gateway;
pub mod identity;
pub mod orchestrator;
pub mod payload;
pub mod runner;
pub mod stages;
pub mod summary;
pub mod tickets;

pub use api::{ApiError, CreatedIssue, Repository, Workspace};
pub use config::{load_settings, ConfigError, MigrationSettings, MismatchPolicy};
pub use gateway::{GatewayError, GraphQlGateway, ZenHubGateway};
pub use identity::{load_identity_map, IdentityError, IdentityMap};
pub use orchestrator::{
    MigrationContext, MigrationError, MigrationStep, Orchestrator, TicketPhase,
};
pub use payload::{build_payload, MigrationPayload};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use stages::{
    similarity_ratio, FallbackStage, ManualResolver, RejectUnresolved, StageMatch, StageMatcher,
    WorkflowStage,
};
pub use summary::{OutcomeStatus, RunSummary, TicketOutcome};
pub use tickets::{load_tickets, SourceTicket, TicketError};
