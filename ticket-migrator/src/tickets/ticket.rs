//! Source ticket record.

use super::TicketError;
use serde::{Deserialize, Serialize};

/// One ticket of the source export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceTicket {
    /// Ticket title.
    pub summary: String,

    /// Ticket body (optional).
    pub description: Option<String>,

    /// Free-text workflow status in the source system.
    pub status: String,

    /// Source-system username of the assignee (optional).
    pub assigned_to_name: Option<String>,

    /// Comma-delimited tags (optional).
    pub tag_names: Option<String>,

    /// Source ticket number.
    pub number: String,

    /// Story point estimate (optional).
    pub estimate: Option<f64>,
}

/// Raw row as read from the CSV; every field may be missing.
#[derive(Debug, Deserialize)]
pub(crate) struct TicketRow {
    pub(crate) summary: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) status: Option<String>,
    pub(crate) assigned_to_name: Option<String>,
    pub(crate) tag_names: Option<String>,
    pub(crate) number: Option<String>,
    pub(crate) estimate: Option<String>,
}

impl SourceTicket {
    /// Validates a raw row read from line `line` of the export.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::MissingField`] for an empty required field and
    /// [`TicketError::InvalidEstimate`] for a non-numeric estimate.
    pub(crate) fn from_row(row: TicketRow, line: u64) -> Result<Self, TicketError> {
        let summary = required(row.summary, "summary", line)?;
        let status = required(row.status, "status", line)?;
        let number = required(row.number, "number", line)?;

        let estimate = match optional(row.estimate) {
            Some(value) => Some(
                value
                    .parse::<f64>()
                    .ok()
                    .filter(|estimate| estimate.is_finite())
                    .ok_or(TicketError::InvalidEstimate { line, value })?,
            ),
            None => None,
        };

        Ok(Self {
            summary,
            description: row.description.filter(|text| !text.trim().is_empty()),
            status,
            assigned_to_name: optional(row.assigned_to_name),
            tag_names: optional(row.tag_names),
            number,
            estimate,
        })
    }
}

fn required(value: Option<String>, field: &'static str, line: u64) -> Result<String, TicketError> {
    optional(value).ok_or(TicketError::MissingField { line, field })
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> TicketRow {
        TicketRow {
            summary: Some("Fix bug".to_string()),
            description: Some("It crashes\non start".to_string()),
            status: Some("In Progress".to_string()),
            assigned_to_name: Some("jdoe".to_string()),
            tag_names: Some("bug,urgent".to_string()),
            number: Some("42".to_string()),
            estimate: Some("3".to_string()),
        }
    }

    #[test]
    fn converts_complete_row() {
        let ticket = SourceTicket::from_row(row(), 2).unwrap();

        assert_eq!(ticket.summary, "Fix bug");
        assert_eq!(ticket.description.as_deref(), Some("It crashes\non start"));
        assert_eq!(ticket.status, "In Progress");
        assert_eq!(ticket.assigned_to_name.as_deref(), Some("jdoe"));
        assert_eq!(ticket.tag_names.as_deref(), Some("bug,urgent"));
        assert_eq!(ticket.number, "42");
        assert_eq!(ticket.estimate, Some(3.0));
    }

    #[test]
    fn optional_fields_may_be_blank() {
        let ticket = SourceTicket::from_row(
            TicketRow {
                description: Some("  ".to_string()),
                assigned_to_name: None,
                tag_names: Some(String::new()),
                estimate: None,
                ..row()
            },
            2,
        )
        .unwrap();

        assert_eq!(ticket.description, None);
        assert_eq!(ticket.assigned_to_name, None);
        assert_eq!(ticket.tag_names, None);
        assert_eq!(ticket.estimate, None);
    }

    #[test]
    fn missing_required_field_names_the_field() {
        let result = SourceTicket::from_row(
            TicketRow {
                status: Some(" ".to_string()),
                ..row()
            },
            7,
        );

        assert!(matches!(
            result,
            Err(TicketError::MissingField {
                line: 7,
                field: "status"
            })
        ));
    }

    #[test]
    fn rejects_non_numeric_estimate() {
        let result = SourceTicket::from_row(
            TicketRow {
                estimate: Some("large".to_string()),
                ..row()
            },
            3,
        );

        assert!(matches!(
            result,
            Err(TicketError::InvalidEstimate { line: 3, .. })
        ));
    }
}
