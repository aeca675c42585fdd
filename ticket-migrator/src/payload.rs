//! Issue creation payloads.
//!
//! Turns a [`SourceTicket`] and its resolved assignee into the fields sent
//! with the create-issue mutation.

use crate::tickets::SourceTicket;
use serde::Serialize;

/// Fields of an issue to be created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationPayload {
    /// Issue title.
    pub title: String,

    /// Issue body.
    pub body: String,

    /// Target usernames to assign; empty or one element.
    pub assignees: Vec<String>,

    /// Source tags followed by the traceability label.
    pub labels: Vec<String>,

    /// Estimate to apply after creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<f64>,
}

impl MigrationPayload {
    /// Serializes the payload as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialization itself fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Builds the creation payload for `ticket`.
///
/// `assignee` is the already-resolved target username. The returned labels
/// always end with the traceability label `{label_prefix}{number}`.
#[must_use]
pub fn build_payload(
    ticket: &SourceTicket,
    assignee: Option<&str>,
    label_prefix: &str,
) -> MigrationPayload {
    let mut labels = split_tags(ticket.tag_names.as_deref());
    labels.push(traceability_label(label_prefix, &ticket.number));

    MigrationPayload {
        title: ticket.summary.clone(),
        body: ticket.description.clone().unwrap_or_default(),
        assignees: assignee.map(str::to_string).into_iter().collect(),
        labels,
        estimate: ticket.estimate,
    }
}

/// Label recording the source ticket number, e.g. `PD-42`.
#[must_use]
pub fn traceability_label(prefix: &str, number: &str) -> String {
    format!("{prefix}{number}")
}

/// Splits a comma-delimited tag list, dropping blank entries.
#[must_use]
pub fn split_tags(tags: Option<&str>) -> Vec<String> {
    tags.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
