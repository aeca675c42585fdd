//! Typed request variables and response shapes.

use crate::stages::WorkflowStage;
use serde::{Deserialize, Serialize};

/// An issue returned by the create-issue mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    /// Opaque issue id.
    pub id: String,

    /// Issue number, unique per repository.
    pub number: u64,
}

/// An issue after it was moved into a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedIssue {
    /// Opaque issue id.
    pub id: String,

    /// Pipeline the issue now sits in, if reported.
    pub pipeline_id: Option<String>,
}

/// An issue read back by repository and number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookedUpIssue {
    /// Opaque issue id.
    pub id: String,

    /// Issue number.
    pub number: u64,

    /// Pipelines holding the issue.
    pub stages: Vec<WorkflowStage>,
}

/// A repository connected to a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// Opaque repository id.
    pub id: String,

    /// Repository name.
    pub name: String,

    /// GitHub repository id.
    #[serde(default)]
    pub gh_id: Option<u64>,
}

/// A workspace with its pipelines and repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Opaque workspace id.
    pub id: String,

    /// Workspace name.
    pub name: String,

    /// Pipelines, in board order.
    pub stages: Vec<WorkflowStage>,

    /// Connected repositories.
    pub repositories: Vec<Repository>,
}

// Request variables

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateIssueVariables<'a> {
    pub(crate) repository_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) body: &'a str,
    pub(crate) assignees: &'a [String],
    pub(crate) labels: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MoveIssueVariables<'a> {
    pub(crate) workspace_id: &'a str,
    pub(crate) move_issue_input: MoveIssueInput<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MoveIssueInput<'a> {
    pub(crate) pipeline_id: &'a str,
    pub(crate) issue_id: &'a str,
    pub(crate) position: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IssueByInfoVariables<'a> {
    pub(crate) repository_id: &'a str,
    pub(crate) issue_number: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct SetEstimateVariables<'a> {
    pub(crate) input: SetEstimateInput<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SetEstimateInput<'a> {
    pub(crate) issue_id: &'a str,
    pub(crate) value: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WorkspaceVariables<'a> {
    pub(crate) workspace_id: &'a str,
}

// Response shapes

#[derive(Debug, Deserialize)]
pub(crate) struct IssuePayload<T> {
    pub(crate) issue: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateIssueData {
    pub(crate) create_issue: Option<IssuePayload<CreatedIssue>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MoveIssueData {
    pub(crate) move_issue: Option<IssuePayload<MovedIssueNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MovedIssueNode {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) pipeline_issue: Option<PipelineIssueNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PipelineIssueNode {
    #[serde(default)]
    pub(crate) pipeline: Option<PipelineRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PipelineRef {
    pub(crate) id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IssueByInfoData {
    pub(crate) issue_by_info: Option<IssueInfoNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IssueInfoNode {
    pub(crate) id: String,
    pub(crate) number: u64,
    #[serde(default)]
    pub(crate) pipeline_issues: Option<Edges<PipelineNode>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edges<T> {
    #[serde(default = "Vec::new")]
    pub(crate) edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge<T> {
    pub(crate) node: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PipelineNode {
    pub(crate) pipeline: WorkflowStage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Nodes<T> {
    #[serde(default = "Vec::new")]
    pub(crate) nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkspaceData {
    pub(crate) workspace: Option<WorkspaceNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WorkspaceNode {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) pipelines_connection: Nodes<WorkflowStage>,
    pub(crate) repositories_connection: Nodes<Repository>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SetEstimateData {
    pub(crate) set_estimate: Option<IssuePayload<PipelineRef>>,
}
