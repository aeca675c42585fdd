//! Orchestrates a complete migration run.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::api::{fetch_workspace, Repository};
use crate::config::{load_settings, MigrationSettings};
use crate::gateway::{GraphQlGateway, ZenHubGateway};
use crate::identity::load_identity_map;
use crate::orchestrator::{MigrationContext, Orchestrator};
use crate::summary::{RunSummary, TicketOutcome};
use crate::tickets::{load_tickets, SourceTicket, TicketError};
use tracing::{info, warn};

/// Runs a migration from CSV exports into a workspace.
#[derive(Debug)]
pub struct Runner<G = ZenHubGateway> {
    config: RunnerConfig,
    settings: MigrationSettings,
    gateway: G,
}

impl Runner<ZenHubGateway> {
    /// Builds a runner from the provided configuration.
    ///
    /// Loads the settings file, applies command-line overrides and creates
    /// the HTTP gateway.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let mut settings = load_settings(config.config_path())?;
        config.apply_overrides(&mut settings);

        let source = config.settings_source();
        settings.validate(&source)?;
        let endpoint = settings.endpoint_url(&source)?;

        let gateway = ZenHubGateway::new(endpoint, config.token())?;
        Ok(Self::with_gateway(config, settings, gateway))
    }
}

impl<G: GraphQlGateway> Runner<G> {
    /// Builds a runner with already resolved settings and a custom gateway.
    pub fn with_gateway(config: RunnerConfig, settings: MigrationSettings, gateway: G) -> Self {
        Self {
            config,
            settings,
            gateway,
        }
    }

    /// Returns the gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Executes the full migration flow.
    ///
    /// Errors returned here stop the whole run. Per-ticket failures are
    /// recorded in the summary instead.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.config.dry_run());
        let workspace_id = self.settings.require_workspace_id()?;

        let identities = load_identity_map(self.config.users_path())?;
        let tickets = load_tickets(self.config.tickets_path())?;
        if tickets.is_empty() {
            warn!("No tickets found");
            return Ok(summary);
        }

        let workspace = fetch_workspace(&self.gateway, workspace_id).await?;
        info!(
            workspace = %workspace.name,
            pipelines = workspace.stages.len(),
            repositories = workspace.repositories.len(),
            "Fetched workspace"
        );
        if workspace.stages.is_empty() {
            return Err(RunnerError::NoStages {
                workspace_id: workspace.id,
            });
        }

        let repository_id =
            select_repository(self.settings.repository_id.as_deref(), &workspace.repositories)?;
        check_fallback_stage(&self.settings, &workspace.stages)?;

        let context = MigrationContext::from_settings(
            &self.settings,
            workspace.id,
            repository_id,
            workspace.stages,
            identities,
        );
        let orchestrator = Orchestrator::new(&self.gateway, context);

        if self.config.dry_run() {
            print_dry_run_preview(&orchestrator, tickets, &mut summary);
            return Ok(summary);
        }

        orchestrator.migrate_all(tickets, &mut summary).await;
        Ok(summary)
    }
}

/// Picks the repository new issues are created in.
///
/// An explicit id must belong to the workspace. Without one, a workspace
/// with exactly one repository selects it.
fn select_repository(
    explicit: Option<&str>,
    repositories: &[Repository],
) -> Result<String, RunnerError> {
    if let Some(id) = explicit.map(str::trim).filter(|id| !id.is_empty()) {
        return match repositories.iter().find(|repo| repo.id == id) {
            Some(repo) => {
                info!(repository = %repo.name, "Using configured repository");
                Ok(repo.id.clone())
            }
            None => Err(RunnerError::RepositorySelection {
                message: format!("repository '{id}' is not connected to the workspace"),
            }),
        };
    }

    match repositories {
        [repo] => {
            info!(repository = %repo.name, "Using the workspace's only repository");
            Ok(repo.id.clone())
        }
        [] => Err(RunnerError::RepositorySelection {
            message: "the workspace has no repositories".to_string(),
        }),
        repos => {
            let names: Vec<_> = repos
                .iter()
                .map(|repo| format!("{} ({})", repo.name, repo.id))
                .collect();
            Err(RunnerError::RepositorySelection {
                message: format!(
                    "the workspace has {} repositories, set repository-id to one of: {}",
                    repos.len(),
                    names.join(", ")
                ),
            })
        }
    }
}

fn check_fallback_stage(
    settings: &MigrationSettings,
    stages: &[crate::stages::WorkflowStage],
) -> Result<(), RunnerError> {
    match &settings.fallback_stage {
        Some(name) if !stages.iter().any(|stage| stage.name == *name) => {
            Err(RunnerError::UnknownFallbackStage { name: name.clone() })
        }
        _ => Ok(()),
    }
}

fn print_dry_run_preview<G: GraphQlGateway>(
    orchestrator: &Orchestrator<G>,
    tickets: Vec<Result<SourceTicket, TicketError>>,
    summary: &mut RunSummary,
) {
    let context = orchestrator.context();
    let total = tickets.len();

    println!("\n[DRY RUN] Repository: {}", context.repository_id());
    println!("  Found {total} tickets:\n");

    for (i, ticket) in tickets.into_iter().enumerate() {
        summary.tickets_read += 1;
        let ticket = match ticket {
            Ok(ticket) => ticket,
            Err(e) => {
                println!("  [{}/{total}] Skipped: {e}", i + 1);
                summary.record_outcome(TicketOutcome::invalid(&e));
                continue;
            }
        };

        println!("  [{}/{total}] Ticket {}", i + 1, ticket.number);
        match orchestrator.payload_for(&ticket).to_json() {
            Ok(json) => println!("    Would create issue: {json}"),
            Err(e) => println!("    Payload could not be encoded: {e}"),
        }
        match context.stage_for(&ticket.status) {
            Some(stage) => println!(
                "    Would move to pipeline: {} (status \"{}\")",
                stage.name, ticket.status
            ),
            None => println!(
                "    No pipeline resolved for status \"{}\"",
                ticket.status
            ),
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::WorkflowStage;

    fn repo(id: &str, name: &str) -> Repository {
        Repository {
            id: id.to_string(),
            name: name.to_string(),
            gh_id: None,
        }
    }

    #[test]
    fn selects_explicit_repository() {
        let repos = vec![repo("r1", "api"), repo("r2", "web")];

        let selected = select_repository(Some("r2"), &repos).unwrap();
        assert_eq!(selected, "r2");
    }

    #[test]
    fn rejects_explicit_repository_outside_workspace() {
        let repos = vec![repo("r1", "api")];

        let result = select_repository(Some("r9"), &repos);
        assert!(matches!(result, Err(RunnerError::RepositorySelection { .. })));
    }

    #[test]
    fn selects_only_repository() {
        let repos = vec![repo("r1", "api")];

        assert_eq!(select_repository(None, &repos).unwrap(), "r1");
        assert_eq!(select_repository(Some("  "), &repos).unwrap(), "r1");
    }

    #[test]
    fn requires_explicit_choice_between_repositories() {
        let repos = vec![repo("r1", "api"), repo("r2", "web")];

        let err = select_repository(None, &repos).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("api (r1)"));
        assert!(message.contains("web (r2)"));
    }

    #[test]
    fn empty_workspace_has_no_repository() {
        let result = select_repository(None, &[]);
        assert!(matches!(result, Err(RunnerError::RepositorySelection { .. })));
    }

    #[test]
    fn fallback_stage_must_exist() {
        let stages = vec![WorkflowStage::new("1", "Backlog")];
        let mut settings = MigrationSettings {
            fallback_stage: Some("Backlog".to_string()),
            ..Default::default()
        };
        assert!(check_fallback_stage(&settings, &stages).is_ok());

        settings.fallback_stage = Some("Icebox".to_string());
        assert!(matches!(
            check_fallback_stage(&settings, &stages),
            Err(RunnerError::UnknownFallbackStage { .. })
        ));
    }
}
