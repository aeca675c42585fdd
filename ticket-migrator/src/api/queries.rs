//! GraphQL documents sent to the ZenHub API.
//!
//! All ticket-derived values travel as variables; nothing is interpolated
//! into these documents.

pub(crate) const CREATE_ISSUE: &str = r#"
mutation CreateIssue(
    $repositoryId: ID!,
    $title: String!,
    $body: String,
    $assignees: [String!],
    $labels: [String!]
) {
    createIssue(input: {
        repositoryId: $repositoryId,
        title: $title,
        body: $body,
        assignees: $assignees,
        labels: $labels
    }) {
        issue {
            id
            number
        }
    }
}
"#;

pub(crate) const MOVE_ISSUE: &str = r#"
mutation MoveIssue($moveIssueInput: MoveIssueInput!, $workspaceId: ID!) {
    moveIssue(input: $moveIssueInput) {
        issue {
            id
            pipelineIssue(workspaceId: $workspaceId) {
                pipeline {
                    id
                }
            }
        }
    }
}
"#;

pub(crate) const ISSUE_BY_INFO: &str = r#"
query IssueByInfo($repositoryId: ID!, $issueNumber: Int!) {
    issueByInfo(repositoryId: $repositoryId, issueNumber: $issueNumber) {
        id
        number
        pipelineIssues {
            edges {
                node {
                    pipeline {
                        id
                        name
                    }
                }
            }
        }
    }
}
"#;

pub(crate) const SET_ESTIMATE: &str = r#"
mutation SetEstimate($input: SetEstimateInput!) {
    setEstimate(input: $input) {
        issue {
            id
        }
    }
}
"#;

pub(crate) const WORKSPACE: &str = r#"
query Workspace($workspaceId: ID!) {
    workspace(id: $workspaceId) {
        id
        name
        pipelinesConnection {
            nodes {
                id
                name
            }
        }
        repositoriesConnection {
            nodes {
                id
                name
                ghId
            }
        }
    }
}
"#;
