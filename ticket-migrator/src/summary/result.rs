//! Per-ticket outcome types.

use crate::api::CreatedIssue;
use crate::orchestrator::{MigrationError, MigrationStep, TicketPhase};
use crate::tickets::TicketError;
use serde::Serialize;
use std::fmt;

/// Final verdict for one ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Created, staged and verified.
    Migrated,

    /// Created but not staged; the issue sits in its default pipeline.
    PartiallyMigrated {
        /// Staging error.
        error: MigrationError,
    },

    /// Not migrated, or not verified.
    Failed {
        /// Error that stopped the ticket.
        error: MigrationError,
    },
}

impl OutcomeStatus {
    pub(crate) fn from_error(error: MigrationError) -> Self {
        match error {
            MigrationError::Staging { .. } => Self::PartiallyMigrated { error },
            _ => Self::Failed { error },
        }
    }
}

/// Result of migrating a single source ticket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketOutcome {
    /// Source ticket number, or `row N` for rows that could not be read.
    pub ticket: String,

    /// Final verdict.
    #[serde(flatten)]
    pub status: OutcomeStatus,

    /// Created issue, if creation succeeded.
    pub issue: Option<CreatedIssue>,

    /// Phases the ticket went through, in order.
    pub phases: Vec<TicketPhase>,

    /// Non-fatal problems, such as a rejected estimate.
    pub warnings: Vec<String>,
}

impl TicketOutcome {
    /// Outcome for a row rejected while loading the export.
    #[must_use]
    pub fn invalid(error: &TicketError) -> Self {
        let ticket = error
            .line()
            .map_or_else(|| "unknown row".to_string(), |line| format!("row {line}"));
        Self {
            ticket,
            status: OutcomeStatus::Failed {
                error: MigrationError::InvalidTicket {
                    reason: error.to_string(),
                },
            },
            issue: None,
            phases: vec![TicketPhase::Failed {
                step: MigrationStep::Parse,
            }],
            warnings: Vec::new(),
        }
    }

    /// Returns true if the ticket was fully migrated.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Migrated)
    }

    /// Returns the error that stopped the ticket, if any.
    #[must_use]
    pub fn error(&self) -> Option<&MigrationError> {
        match &self.status {
            OutcomeStatus::Migrated => None,
            OutcomeStatus::PartiallyMigrated { error } | OutcomeStatus::Failed { error } => {
                Some(error)
            }
        }
    }

    /// Returns true if the created issue could not be verified.
    #[must_use]
    pub fn is_verification_mismatch(&self) -> bool {
        matches!(
            self.error(),
            Some(MigrationError::VerificationMismatch { .. })
        )
    }
}

impl fmt::Display for TicketOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.status, &self.issue) {
            (OutcomeStatus::Migrated, Some(issue)) => {
                write!(f, "Ticket {} migrated as issue #{}", self.ticket, issue.number)
            }
            (OutcomeStatus::Migrated, None) => write!(f, "Ticket {} migrated", self.ticket),
            (OutcomeStatus::PartiallyMigrated { error }, _) => {
                write!(f, "Ticket {} partially migrated: {error}", self.ticket)
            }
            (OutcomeStatus::Failed { error }, _) => write!(
                f,
                "Ticket {} failed at {} step: {error}",
                self.ticket,
                error.step()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_row_outcome_names_the_row() {
        let outcome = TicketOutcome::invalid(&TicketError::MissingField {
            line: 5,
            field: "summary",
        });

        assert_eq!(outcome.ticket, "row 5");
        assert!(!outcome.is_success());
        assert_eq!(
            outcome.to_string(),
            "Ticket row 5 failed at parse step: invalid ticket: Row 5: required field 'summary' is empty"
        );
    }

    #[test]
    fn staging_error_is_partial() {
        let status = OutcomeStatus::from_error(MigrationError::Staging {
            issue_number: 3,
            reason: "boom".to_string(),
        });
        assert!(matches!(status, OutcomeStatus::PartiallyMigrated { .. }));

        let status = OutcomeStatus::from_error(MigrationError::Creation {
            reason: "boom".to_string(),
        });
        assert!(matches!(status, OutcomeStatus::Failed { .. }));
    }

    #[test]
    fn describes_success() {
        let issue = CreatedIssue {
            id: "Z_1".to_string(),
            number: 17,
        };
        let outcome = TicketOutcome {
            ticket: "42".to_string(),
            status: OutcomeStatus::Migrated,
            issue: Some(issue.clone()),
            phases: vec![TicketPhase::Pending, TicketPhase::Verified { issue }],
            warnings: Vec::new(),
        };

        assert_eq!(outcome.to_string(), "Ticket 42 migrated as issue #17");
    }
}
