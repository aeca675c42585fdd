//! Ticket export loading.
//!
//! Reads the source system's CSV export. File-level problems (unreadable
//! file, missing columns) fail the whole load; problems with a single row
//! are returned in place of that row so the rest of the export can still be
//! migrated.

mod error;
mod ticket;

pub use error::TicketError;
pub use ticket::SourceTicket;

use std::io::Read;
use std::path::Path;
use ticket::TicketRow;
use tracing::{info, warn};

/// Columns every export must have.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "summary",
    "description",
    "status",
    "assigned_to_name",
    "tag_names",
    "number",
    "estimate",
];

/// Loads tickets from a CSV export, in file order.
///
/// # Errors
///
/// Returns [`TicketError`] if the file can't be opened, the header can't be
/// read or a required column is missing. Row-level errors are returned
/// inside the vector.
pub fn load_tickets(path: &Path) -> Result<Vec<Result<SourceTicket, TicketError>>, TicketError> {
    info!(path = %path.display(), "Loading tickets");
    let file = std::fs::File::open(path).map_err(|e| TicketError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;
    let tickets = parse_tickets(file, &path.display().to_string())?;

    let invalid = tickets.iter().filter(|ticket| ticket.is_err()).count();
    info!(count = tickets.len(), invalid, "Loaded tickets");
    Ok(tickets)
}

/// Parses tickets from any CSV reader.
///
/// `source` names the input in error messages.
///
/// # Errors
///
/// See [`load_tickets`].
pub fn parse_tickets<R: Read>(
    reader: R,
    source: &str,
) -> Result<Vec<Result<SourceTicket, TicketError>>, TicketError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    // Column names match case-insensitively, like the user map.
    let headers: csv::StringRecord = reader
        .headers()
        .map_err(|e| TicketError::CsvError {
            path: source.to_string(),
            source: e,
        })?
        .iter()
        .map(str::to_ascii_lowercase)
        .collect();

    if let Some(column) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|header| header == **column))
    {
        return Err(TicketError::MissingColumn {
            path: source.to_string(),
            column: *column,
        });
    }

    let mut tickets = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                    return Err(TicketError::CsvError {
                        path: source.to_string(),
                        source: e,
                    });
                }
                let line = e.position().map(csv::Position::line).unwrap_or_default();
                warn!(line, error = %e, "Skipping malformed ticket row");
                tickets.push(Err(TicketError::MalformedRow {
                    line,
                    message: e.to_string(),
                }));
                continue;
            }
        };

        let line = record.position().map(csv::Position::line).unwrap_or_default();
        let ticket = record
            .deserialize::<TicketRow>(Some(&headers))
            .map_err(|e| TicketError::MalformedRow {
                line,
                message: e.to_string(),
            })
            .and_then(|row| SourceTicket::from_row(row, line));

        if let Err(e) = &ticket {
            warn!(error = %e, "Invalid ticket row");
        }
        tickets.push(ticket);
    }

    Ok(tickets)
}
