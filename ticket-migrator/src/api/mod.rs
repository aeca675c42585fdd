//! Typed ZenHub operations.
//!
//! Each function encodes structured variables, executes one GraphQL
//! document through a [`GraphQlGateway`] and decodes the expected shape of
//! the response.

mod error;
mod queries;
mod types;

pub use error::ApiError;
pub use types::{CreatedIssue, LookedUpIssue, MovedIssue, Repository, Workspace};

use crate::gateway::GraphQlGateway;
use crate::payload::MigrationPayload;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use types::{
    CreateIssueData, CreateIssueVariables, IssueByInfoData, IssueByInfoVariables, MoveIssueData,
    MoveIssueInput, MoveIssueVariables, SetEstimateData, SetEstimateInput, SetEstimateVariables,
    WorkspaceData, WorkspaceVariables,
};

/// Creates an issue from `payload` in `repository_id`.
///
/// # Errors
///
/// Returns [`ApiError`] if the call fails or the response carries no
/// issue id and number.
pub async fn create_issue<G: GraphQlGateway>(
    gateway: &G,
    repository_id: &str,
    payload: &MigrationPayload,
) -> Result<CreatedIssue, ApiError> {
    const OPERATION: &str = "createIssue";
    let variables = encode(
        OPERATION,
        &CreateIssueVariables {
            repository_id,
            title: &payload.title,
            body: &payload.body,
            assignees: &payload.assignees,
            labels: &payload.labels,
        },
    )?;

    let data: CreateIssueData = decode(
        OPERATION,
        gateway.execute(queries::CREATE_ISSUE, variables).await?,
    )?;
    let issue = data
        .create_issue
        .and_then(|created| created.issue)
        .ok_or_else(|| ApiError::unexpected(OPERATION, "no issue in response"))?;

    debug!(issue_id = %issue.id, issue_number = issue.number, "Issue created");
    Ok(issue)
}

/// Moves an issue into the pipeline `stage_id` at `position`.
///
/// # Errors
///
/// Returns [`ApiError`] if the call fails or the response does not confirm
/// the move.
pub async fn move_issue<G: GraphQlGateway>(
    gateway: &G,
    workspace_id: &str,
    stage_id: &str,
    issue_id: &str,
    position: u32,
) -> Result<MovedIssue, ApiError> {
    const OPERATION: &str = "moveIssue";
    let variables = encode(
        OPERATION,
        &MoveIssueVariables {
            workspace_id,
            move_issue_input: MoveIssueInput {
                pipeline_id: stage_id,
                issue_id,
                position,
            },
        },
    )?;

    let data: MoveIssueData = decode(
        OPERATION,
        gateway.execute(queries::MOVE_ISSUE, variables).await?,
    )?;
    let issue = data
        .move_issue
        .and_then(|moved| moved.issue)
        .ok_or_else(|| ApiError::unexpected(OPERATION, "no issue in response"))?;

    Ok(MovedIssue {
        id: issue.id,
        pipeline_id: issue
            .pipeline_issue
            .and_then(|pipeline_issue| pipeline_issue.pipeline)
            .map(|pipeline| pipeline.id),
    })
}

/// Looks up an issue by repository and number.
///
/// Returns `None` if the API reports no such issue.
///
/// # Errors
///
/// Returns [`ApiError`] if the call fails or the response can't be decoded.
pub async fn issue_by_info<G: GraphQlGateway>(
    gateway: &G,
    repository_id: &str,
    issue_number: u64,
) -> Result<Option<LookedUpIssue>, ApiError> {
    const OPERATION: &str = "issueByInfo";
    let variables = encode(
        OPERATION,
        &IssueByInfoVariables {
            repository_id,
            issue_number,
        },
    )?;

    let data: IssueByInfoData = decode(
        OPERATION,
        gateway.execute(queries::ISSUE_BY_INFO, variables).await?,
    )?;

    Ok(data.issue_by_info.map(|issue| LookedUpIssue {
        id: issue.id,
        number: issue.number,
        stages: issue
            .pipeline_issues
            .map(|connection| {
                connection
                    .edges
                    .into_iter()
                    .map(|edge| edge.node.pipeline)
                    .collect()
            })
            .unwrap_or_default(),
    }))
}

/// Sets the estimate of an issue.
///
/// # Errors
///
/// Returns [`ApiError`] if the call fails or the response does not confirm
/// the update.
pub async fn set_estimate<G: GraphQlGateway>(
    gateway: &G,
    issue_id: &str,
    value: f64,
) -> Result<(), ApiError> {
    const OPERATION: &str = "setEstimate";
    let variables = encode(
        OPERATION,
        &SetEstimateVariables {
            input: SetEstimateInput { issue_id, value },
        },
    )?;

    let data: SetEstimateData = decode(
        OPERATION,
        gateway.execute(queries::SET_ESTIMATE, variables).await?,
    )?;
    data.set_estimate
        .and_then(|set| set.issue)
        .map(|_| ())
        .ok_or_else(|| ApiError::unexpected(OPERATION, "no issue in response"))
}

/// Fetches a workspace with its pipelines and repositories.
///
/// # Errors
///
/// Returns [`ApiError`] if the call fails or the workspace doesn't exist.
pub async fn fetch_workspace<G: GraphQlGateway>(
    gateway: &G,
    workspace_id: &str,
) -> Result<Workspace, ApiError> {
    const OPERATION: &str = "workspace";
    let variables = encode(OPERATION, &WorkspaceVariables { workspace_id })?;

    let data: WorkspaceData = decode(
        OPERATION,
        gateway.execute(queries::WORKSPACE, variables).await?,
    )?;
    let workspace = data.workspace.ok_or_else(|| {
        ApiError::unexpected(OPERATION, format!("workspace '{workspace_id}' not found"))
    })?;

    Ok(Workspace {
        id: workspace.id,
        name: workspace.name,
        stages: workspace.pipelines_connection.nodes,
        repositories: workspace.repositories_connection.nodes,
    })
}

fn encode<T: Serialize>(operation: &'static str, variables: &T) -> Result<Value, ApiError> {
    serde_json::to_value(variables).map_err(|source| ApiError::Encode { operation, source })
}

fn decode<T: DeserializeOwned>(operation: &'static str, data: Value) -> Result<T, ApiError> {
    serde_json::from_value(data).map_err(|e| ApiError::unexpected(operation, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;
    use serde_json::json;
    use std::sync::Mutex;

    /// Gateway answering every call with the same data and recording calls.
    #[derive(Debug)]
    struct FixedGateway {
        data: Value,
        calls: Mutex<Vec<(String, Value)>>,
    }

    impl FixedGateway {
        fn new(data: Value) -> Self {
            Self {
                data,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn last_variables(&self) -> Value {
            self.calls.lock().unwrap().last().unwrap().1.clone()
        }
    }

    impl GraphQlGateway for FixedGateway {
        async fn execute(&self, query: &str, variables: Value) -> Result<Value, GatewayError> {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), variables));
            Ok(self.data.clone())
        }
    }

    /// Gateway answering every call with a raw HTTP 200 body.
    #[derive(Debug)]
    struct RawGateway {
        body: &'static str,
    }

    impl GraphQlGateway for RawGateway {
        async fn execute(&self, _query: &str, _variables: Value) -> Result<Value, GatewayError> {
            crate::gateway::interpret_response(200, self.body)
        }
    }

    fn graphql_message(error: ApiError) -> String {
        match error {
            ApiError::Gateway(GatewayError::GraphQl { message }) => message,
            other => panic!("expected GraphQL error, got {other:?}"),
        }
    }

    fn payload() -> MigrationPayload {
        MigrationPayload {
            title: "Fix bug".to_string(),
            body: String::new(),
            assignees: vec!["johndoe".to_string()],
            labels: vec!["bug".to_string(), "PD-42".to_string()],
            estimate: None,
        }
    }

    #[tokio::test]
    async fn create_issue_sends_structured_variables() {
        let gateway = FixedGateway::new(json!({
            "createIssue": { "issue": { "id": "Z_1", "number": 17 } }
        }));

        let issue = create_issue(&gateway, "repo-1", &payload()).await.unwrap();

        assert_eq!(
            issue,
            CreatedIssue {
                id: "Z_1".to_string(),
                number: 17
            }
        );
        assert_eq!(
            gateway.last_variables(),
            json!({
                "repositoryId": "repo-1",
                "title": "Fix bug",
                "body": "",
                "assignees": ["johndoe"],
                "labels": ["bug", "PD-42"]
            })
        );
    }

    #[tokio::test]
    async fn create_issue_without_issue_is_unexpected() {
        let gateway = FixedGateway::new(json!({ "createIssue": null }));

        let result = create_issue(&gateway, "repo-1", &payload()).await;
        assert!(matches!(
            result,
            Err(ApiError::UnexpectedResponse {
                operation: "createIssue",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn move_issue_places_at_position() {
        let gateway = FixedGateway::new(json!({
            "moveIssue": {
                "issue": { "id": "Z_1", "pipelineIssue": { "pipeline": { "id": "P_2" } } }
            }
        }));

        let moved = move_issue(&gateway, "ws-1", "P_2", "Z_1", 0).await.unwrap();

        assert_eq!(moved.pipeline_id.as_deref(), Some("P_2"));
        assert_eq!(
            gateway.last_variables(),
            json!({
                "workspaceId": "ws-1",
                "moveIssueInput": { "pipelineId": "P_2", "issueId": "Z_1", "position": 0 }
            })
        );
    }

    #[tokio::test]
    async fn issue_by_info_reads_pipelines() {
        let gateway = FixedGateway::new(json!({
            "issueByInfo": {
                "id": "Z_1",
                "number": 17,
                "pipelineIssues": {
                    "edges": [ { "node": { "pipeline": { "id": "P_2", "name": "In Progress" } } } ]
                }
            }
        }));

        let issue = issue_by_info(&gateway, "repo-1", 17).await.unwrap().unwrap();

        assert_eq!(issue.id, "Z_1");
        assert_eq!(issue.stages, vec![crate::stages::WorkflowStage::new("P_2", "In Progress")]);
        assert_eq!(
            gateway.last_variables(),
            json!({ "repositoryId": "repo-1", "issueNumber": 17 })
        );
    }

    #[tokio::test]
    async fn issue_by_info_returns_none_for_missing_issue() {
        let gateway = FixedGateway::new(json!({ "issueByInfo": null }));

        let issue = issue_by_info(&gateway, "repo-1", 17).await.unwrap();
        assert!(issue.is_none());
    }

    #[tokio::test]
    async fn set_estimate_sends_value() {
        let gateway = FixedGateway::new(json!({
            "setEstimate": { "issue": { "id": "Z_1" } }
        }));

        set_estimate(&gateway, "Z_1", 3.0).await.unwrap();
        assert_eq!(
            gateway.last_variables(),
            json!({ "input": { "issueId": "Z_1", "value": 3.0 } })
        );
    }

    #[tokio::test]
    async fn fetch_workspace_reads_pipelines_and_repositories() {
        let gateway = FixedGateway::new(json!({
            "workspace": {
                "id": "ws-1",
                "name": "Mobile",
                "pipelinesConnection": { "nodes": [
                    { "id": "P_1", "name": "Backlog" },
                    { "id": "P_2", "name": "Done" }
                ] },
                "repositoriesConnection": { "nodes": [
                    { "id": "repo-1", "name": "app", "ghId": 1234 }
                ] }
            }
        }));

        let workspace = fetch_workspace(&gateway, "ws-1").await.unwrap();

        assert_eq!(workspace.name, "Mobile");
        assert_eq!(workspace.stages.len(), 2);
        assert_eq!(workspace.stages[0].name, "Backlog");
        assert_eq!(workspace.repositories[0].gh_id, Some(1234));
    }

    #[tokio::test]
    async fn create_issue_reports_graphql_errors() {
        let gateway = RawGateway {
            body: r#"{"data":{"createIssue":null},"errors":[{"message":"Label PD-42 is invalid"}]}"#,
        };

        let error = create_issue(&gateway, "repo-1", &payload()).await.unwrap_err();
        assert!(error.to_string().contains("Label PD-42 is invalid"));
        assert_eq!(graphql_message(error), "Label PD-42 is invalid");
    }

    #[tokio::test]
    async fn move_issue_reports_graphql_errors() {
        let gateway = RawGateway {
            body: r#"{"data":{"moveIssue":null},"errors":[{"message":"Pipeline not found"}]}"#,
        };

        let error = move_issue(&gateway, "ws-1", "P_9", "Z_1", 0).await.unwrap_err();
        assert_eq!(graphql_message(error), "Pipeline not found");
    }

    #[tokio::test]
    async fn issue_by_info_reports_graphql_errors() {
        let gateway = RawGateway {
            body: r#"{"data":{"issueByInfo":null},"errors":[{"message":"Not authorized"}]}"#,
        };

        let error = issue_by_info(&gateway, "repo-1", 17).await.unwrap_err();
        assert_eq!(graphql_message(error), "Not authorized");
    }

    #[tokio::test]
    async fn set_estimate_reports_graphql_errors() {
        let gateway = RawGateway {
            body: r#"{"data":{"setEstimate":null},"errors":[{"message":"Estimates disabled"}]}"#,
        };

        let error = set_estimate(&gateway, "Z_1", 3.0).await.unwrap_err();
        assert_eq!(graphql_message(error), "Estimates disabled");
    }

    #[tokio::test]
    async fn fetch_workspace_reports_graphql_errors() {
        let gateway = RawGateway {
            body: r#"{"data":{"workspace":null},"errors":[{"message":"Workspace access denied"}]}"#,
        };

        let error = fetch_workspace(&gateway, "ws-1").await.unwrap_err();
        assert_eq!(graphql_message(error), "Workspace access denied");
    }

    #[tokio::test]
    async fn fetch_missing_workspace_is_an_error() {
        let gateway = FixedGateway::new(json!({ "workspace": null }));

        let result = fetch_workspace(&gateway, "ws-404").await;
        assert!(matches!(result, Err(ApiError::UnexpectedResponse { .. })));
    }
}
