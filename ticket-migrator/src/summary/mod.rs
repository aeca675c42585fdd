//! Run summary types and helpers.

mod result;
mod run_summary;

pub use result::{OutcomeStatus, TicketOutcome};
pub use run_summary::RunSummary;
