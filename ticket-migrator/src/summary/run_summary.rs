//! Run summary types.

use super::result::{OutcomeStatus, TicketOutcome};

/// Summary of a complete run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of rows read from the export.
    pub tickets_read: usize,

    /// Number of tickets created, staged and verified.
    pub tickets_migrated: usize,

    /// Number of tickets created but left unstaged.
    pub tickets_partial: usize,

    /// Number of tickets that failed.
    pub tickets_failed: usize,

    /// Number of tickets never attempted because the run was aborted.
    pub tickets_not_attempted: usize,

    /// Whether the run stopped early on a verification mismatch.
    pub aborted: bool,

    /// Whether this was a dry run.
    pub dry_run: bool,

    /// Outcomes in migration order.
    pub outcomes: Vec<TicketOutcome>,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with a ticket outcome.
    pub fn record_outcome(&mut self, outcome: TicketOutcome) {
        match &outcome.status {
            OutcomeStatus::Migrated => self.tickets_migrated += 1,
            OutcomeStatus::PartiallyMigrated { .. } => self.tickets_partial += 1,
            OutcomeStatus::Failed { .. } => self.tickets_failed += 1,
        }
        self.outcomes.push(outcome);
    }

    /// Marks the run as aborted with `remaining` tickets left untouched.
    pub fn record_abort(&mut self, remaining: usize) {
        self.aborted = true;
        self.tickets_not_attempted += remaining;
    }

    /// Returns true if any failures occurred.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.tickets_failed > 0 || self.tickets_partial > 0 || self.aborted
    }

    /// Returns true if all operations were successful.
    #[must_use]
    pub fn all_success(&self) -> bool {
        !self.has_failures()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::MigrationError;

    fn outcome(status: OutcomeStatus) -> TicketOutcome {
        TicketOutcome {
            ticket: "1".to_string(),
            status,
            issue: None,
            phases: Vec::new(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn can_record_outcomes() {
        let mut summary = RunSummary::new(false);

        summary.record_outcome(outcome(OutcomeStatus::Migrated));
        assert!(summary.all_success());

        summary.record_outcome(outcome(OutcomeStatus::PartiallyMigrated {
            error: MigrationError::Staging {
                issue_number: 1,
                reason: "no pipeline".to_string(),
            },
        }));
        summary.record_outcome(outcome(OutcomeStatus::Failed {
            error: MigrationError::Creation {
                reason: "HTTP 500".to_string(),
            },
        }));

        assert_eq!(summary.tickets_migrated, 1);
        assert_eq!(summary.tickets_partial, 1);
        assert_eq!(summary.tickets_failed, 1);
        assert_eq!(summary.outcomes.len(), 3);
        assert!(summary.has_failures());
    }

    #[test]
    fn abort_counts_as_failure() {
        let mut summary = RunSummary::new(false);
        summary.record_abort(4);

        assert!(summary.aborted);
        assert_eq!(summary.tickets_not_attempted, 4);
        assert!(!summary.all_success());
    }
}
