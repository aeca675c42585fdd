//! Per-ticket state machine phases.

use super::MigrationStep;
use crate::api::CreatedIssue;
use crate::stages::WorkflowStage;
use serde::Serialize;

/// Phase of a single ticket's migration.
///
/// A ticket moves `Pending → Created → Staged → Verified`, or ends in
/// `Failed` at whichever step went wrong. No phase is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum TicketPhase {
    /// Nothing sent yet.
    Pending,

    /// The issue exists in its default pipeline.
    Created {
        /// Issue returned by the create call.
        issue: CreatedIssue,
    },

    /// The issue was moved into its pipeline.
    Staged {
        /// Issue returned by the create call.
        issue: CreatedIssue,
        /// Pipeline the issue was moved to.
        stage: WorkflowStage,
    },

    /// The issue was read back with the expected id.
    Verified {
        /// Issue returned by the create call.
        issue: CreatedIssue,
    },

    /// A step failed; no further steps run.
    Failed {
        /// Step that failed.
        step: MigrationStep,
    },
}

impl TicketPhase {
    /// Returns the phase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Created { .. } => "created",
            Self::Staged { .. } => "staged",
            Self::Verified { .. } => "verified",
            Self::Failed { .. } => "failed",
        }
    }

    /// Returns the created issue once there is one.
    #[must_use]
    pub fn issue(&self) -> Option<&CreatedIssue> {
        match self {
            Self::Created { issue } | Self::Staged { issue, .. } | Self::Verified { issue } => {
                Some(issue)
            }
            Self::Pending | Self::Failed { .. } => None,
        }
    }

    /// Returns true for phases no step leads out of.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Verified { .. } | Self::Failed { .. })
    }
}
