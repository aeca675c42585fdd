//! Per-ticket migration error types.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Step of the per-ticket protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStep {
    /// Reading the ticket row.
    Parse,
    /// Creating the target issue.
    Create,
    /// Moving the issue into its pipeline.
    Stage,
    /// Reading the issue back.
    Verify,
}

impl fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Parse => "parse",
            Self::Create => "create",
            Self::Stage => "stage",
            Self::Verify => "verify",
        })
    }
}

/// Why a ticket was not fully migrated.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MigrationError {
    /// The source row was rejected before any remote call.
    #[error("invalid ticket: {reason}")]
    InvalidTicket { reason: String },

    /// No issue was created.
    #[error("failed to create issue: {reason}")]
    Creation { reason: String },

    /// The issue exists but was left in its default pipeline.
    #[error("issue #{issue_number} was created but not moved to a pipeline: {reason}")]
    Staging { issue_number: u64, reason: String },

    /// The issue could not be read back with the id it was created with.
    #[error("verification mismatch for issue #{issue_number}: {detail}")]
    VerificationMismatch {
        issue_number: u64,
        expected_id: String,
        detail: String,
    },
}

impl MigrationError {
    /// Returns the step that produced this error.
    #[must_use]
    pub fn step(&self) -> MigrationStep {
        match self {
            Self::InvalidTicket { .. } => MigrationStep::Parse,
            Self::Creation { .. } => MigrationStep::Create,
            Self::Staging { .. } => MigrationStep::Stage,
            Self::VerificationMismatch { .. } => MigrationStep::Verify,
        }
    }
}
