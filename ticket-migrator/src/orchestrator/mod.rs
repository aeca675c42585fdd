//! Per-ticket migration protocol.
//!
//! For each ticket the orchestrator creates an issue, moves it into the
//! matching pipeline and reads it back, strictly in that order. A ticket
//! only counts as migrated once the read-back returns the id the issue was
//! created with.

mod context;
mod error;
mod state;

pub use context::MigrationContext;
pub use error::{MigrationError, MigrationStep};
pub use state::TicketPhase;

use crate::api::{self, CreatedIssue};
use crate::config::MismatchPolicy;
use crate::gateway::GraphQlGateway;
use crate::payload::{build_payload, MigrationPayload};
use crate::stages::WorkflowStage;
use crate::summary::{OutcomeStatus, RunSummary, TicketOutcome};
use crate::tickets::{SourceTicket, TicketError};
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Position new issues take inside their pipeline (the top).
pub const TOP_OF_PIPELINE: u32 = 0;

/// Drives tickets through the create, stage and verify steps.
#[derive(Debug)]
pub struct Orchestrator<G> {
    gateway: G,
    context: MigrationContext,
}

impl<G: GraphQlGateway> Orchestrator<G> {
    /// Creates an orchestrator for one run.
    pub fn new(gateway: G, context: MigrationContext) -> Self {
        Self { gateway, context }
    }

    /// Returns the run context.
    pub fn context(&self) -> &MigrationContext {
        &self.context
    }

    /// Returns the gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Builds the creation payload for `ticket` without sending anything.
    #[must_use]
    pub fn payload_for(&self, ticket: &SourceTicket) -> MigrationPayload {
        let assignee = self
            .context
            .identities()
            .resolve(ticket.assigned_to_name.as_deref());
        match (ticket.assigned_to_name.as_deref().map(str::trim), assignee) {
            (Some(user), None) if !user.is_empty() => {
                warn!(user, "No mapping for assignee, leaving issue unassigned");
            }
            _ => {}
        }
        build_payload(ticket, assignee, self.context.label_prefix())
    }

    /// Migrates every ticket in order, recording outcomes in `summary`.
    ///
    /// With [`MismatchPolicy::Abort`] the first verification mismatch stops
    /// the run; the tickets after it are counted as not attempted.
    pub async fn migrate_all<I>(&self, tickets: I, summary: &mut RunSummary)
    where
        I: IntoIterator<Item = Result<SourceTicket, TicketError>>,
    {
        let mut tickets = tickets.into_iter();
        while let Some(ticket) = tickets.next() {
            summary.tickets_read += 1;
            let outcome = match ticket {
                Ok(ticket) => self.migrate(&ticket).await,
                Err(e) => TicketOutcome::invalid(&e),
            };

            if outcome.is_success() {
                info!("{outcome}");
            } else {
                error!("{outcome}");
            }

            let abort = outcome.is_verification_mismatch()
                && self.context.mismatch_policy() == MismatchPolicy::Abort;
            summary.record_outcome(outcome);

            if abort {
                let remaining = tickets.by_ref().count();
                summary.tickets_read += remaining;
                summary.record_abort(remaining);
                error!(remaining, "Verification mismatch, aborting run");
                break;
            }
        }
    }

    /// Migrates a single ticket.
    pub async fn migrate(&self, ticket: &SourceTicket) -> TicketOutcome {
        let span = info_span!("migrate_ticket", ticket = %ticket.number);

        async {
            let payload = self.payload_for(ticket);
            let mut current = TicketPhase::Pending;
            let mut phases = vec![current.clone()];
            let mut issue = None;
            let mut warnings = Vec::new();

            let mut status = OutcomeStatus::Migrated;
            while !current.is_terminal() {
                let next = match self.advance(&current, ticket, &payload, &mut warnings).await {
                    Ok(next) => next,
                    Err(e) => {
                        let failed = TicketPhase::Failed { step: e.step() };
                        status = OutcomeStatus::from_error(e);
                        failed
                    }
                };

                debug!(from = current.as_str(), to = next.as_str(), "Ticket advanced");
                if let Some(created) = next.issue() {
                    issue = Some(created.clone());
                }
                phases.push(next.clone());
                current = next;
            }

            TicketOutcome {
                ticket: ticket.number.clone(),
                status,
                issue,
                phases,
                warnings,
            }
        }
        .instrument(span)
        .await
    }

    /// Runs the step leading out of `current`.
    ///
    /// Terminal phases have no step and are returned unchanged.
    async fn advance(
        &self,
        current: &TicketPhase,
        ticket: &SourceTicket,
        payload: &MigrationPayload,
        warnings: &mut Vec<String>,
    ) -> Result<TicketPhase, MigrationError> {
        match current {
            TicketPhase::Pending => self
                .create(payload)
                .await
                .map(|issue| TicketPhase::Created { issue }),
            TicketPhase::Created { issue } => {
                self.stage(ticket, issue, payload, warnings)
                    .await
                    .map(|stage| TicketPhase::Staged {
                        issue: issue.clone(),
                        stage,
                    })
            }
            TicketPhase::Staged { issue, stage } => self
                .verify(issue, stage)
                .await
                .map(|()| TicketPhase::Verified {
                    issue: issue.clone(),
                }),
            TicketPhase::Verified { .. } | TicketPhase::Failed { .. } => Ok(current.clone()),
        }
    }

    async fn create(&self, payload: &MigrationPayload) -> Result<CreatedIssue, MigrationError> {
        info!(title = %payload.title, "Creating issue");
        api::create_issue(&self.gateway, self.context.repository_id(), payload)
            .await
            .map_err(|e| MigrationError::Creation {
                reason: e.to_string(),
            })
    }

    async fn stage(
        &self,
        ticket: &SourceTicket,
        issue: &CreatedIssue,
        payload: &MigrationPayload,
        warnings: &mut Vec<String>,
    ) -> Result<WorkflowStage, MigrationError> {
        let stage = self
            .context
            .stage_for(&ticket.status)
            .cloned()
            .ok_or_else(|| MigrationError::Staging {
                issue_number: issue.number,
                reason: format!("no pipeline resolved for status '{}'", ticket.status),
            })?;

        info!(issue_number = issue.number, stage = %stage.name, "Moving issue to pipeline");
        let moved = api::move_issue(
            &self.gateway,
            self.context.workspace_id(),
            &stage.id,
            &issue.id,
            TOP_OF_PIPELINE,
        )
        .await
        .map_err(|e| MigrationError::Staging {
            issue_number: issue.number,
            reason: e.to_string(),
        })?;

        match moved.pipeline_id {
            Some(pipeline_id) if pipeline_id != stage.id => {
                warn!(
                    issue_number = issue.number,
                    expected = %stage.id,
                    reported = %pipeline_id,
                    "Move reported a different pipeline"
                );
                warnings.push(format!(
                    "move reported pipeline {pipeline_id} instead of {}",
                    stage.id
                ));
            }
            _ => {}
        }

        if let (true, Some(estimate)) = (self.context.apply_estimates(), payload.estimate) {
            if let Err(e) = api::set_estimate(&self.gateway, &issue.id, estimate).await {
                warn!(issue_number = issue.number, error = %e, "Failed to set estimate");
                warnings.push(format!("estimate {estimate} not applied: {e}"));
            }
        }

        Ok(stage)
    }

    async fn verify(
        &self,
        issue: &CreatedIssue,
        stage: &WorkflowStage,
    ) -> Result<(), MigrationError> {
        let mismatch = |detail: String| MigrationError::VerificationMismatch {
            issue_number: issue.number,
            expected_id: issue.id.clone(),
            detail,
        };

        let found = api::issue_by_info(&self.gateway, self.context.repository_id(), issue.number)
            .await
            .map_err(|e| mismatch(format!("lookup failed: {e}")))?
            .ok_or_else(|| mismatch("issue not found".to_string()))?;

        if found.id != issue.id {
            return Err(mismatch(format!(
                "expected id {}, found {}",
                issue.id, found.id
            )));
        }

        if !found.stages.is_empty() && !found.stages.iter().any(|s| s.id == stage.id) {
            warn!(
                issue_number = issue.number,
                expected = %stage.name,
                "Verified issue is not reported in the expected pipeline"
            );
        }

        debug!(issue_number = issue.number, "Issue verified");
        Ok(())
    }
}
