//! Source-to-target username mapping.
//!
//! The map is read once from a two-column CSV file and stays read-only for
//! the rest of the run. Lookups are best-effort: a user without a mapping
//! simply ends up unassigned on the target issue.

mod error;

pub use error::IdentityError;

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Header names accepted for the source username column.
const SOURCE_COLUMNS: [&str; 2] = ["source_username", "assembla"];

/// Header names accepted for the target username column.
const TARGET_COLUMNS: [&str; 2] = ["target_username", "github"];

/// Mapping from source-system usernames to target-platform usernames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityMap {
    users: HashMap<String, String>,
}

impl IdentityMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping, replacing any previous target for the same source.
    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) {
        self.users.insert(source.into(), target.into());
    }

    /// Resolves a source username to its target username.
    ///
    /// Absent, blank and unmapped usernames all resolve to `None`.
    #[must_use]
    pub fn resolve(&self, source: Option<&str>) -> Option<&str> {
        let source = source.map(str::trim).filter(|name| !name.is_empty())?;
        self.users.get(source).map(String::as_str)
    }

    /// Number of mapped users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns true if no users are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl<S: Into<String>, T: Into<String>> FromIterator<(S, T)> for IdentityMap {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (source, target) in iter {
            map.insert(source, target);
        }
        map
    }
}

/// Loads the username map from a CSV file.
///
/// The header must contain `source_username` and `target_username`
/// (`assembla` and `github` are accepted too). Duplicate source usernames
/// keep the last row.
///
/// # Errors
///
/// Returns [`IdentityError`] if the file can't be read, isn't valid CSV or
/// lacks a required column.
pub fn load_identity_map(path: &Path) -> Result<IdentityMap, IdentityError> {
    info!(path = %path.display(), "Loading user map");
    let file = std::fs::File::open(path).map_err(|e| IdentityError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;
    let map = parse_identity_map(file, &path.display().to_string())?;
    info!(count = map.len(), "Loaded user map");
    Ok(map)
}

/// Parses a username map from any CSV reader.
///
/// `source` names the input in error messages.
///
/// # Errors
///
/// See [`load_identity_map`].
pub fn parse_identity_map<R: Read>(reader: R, source: &str) -> Result<IdentityMap, IdentityError> {
    let csv_error = |e: csv::Error| IdentityError::CsvError {
        path: source.to_string(),
        source: e,
    };

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers().map_err(csv_error)?.clone();
    let source_index = find_column(&headers, &SOURCE_COLUMNS).ok_or(IdentityError::MissingColumn {
        path: source.to_string(),
        column: SOURCE_COLUMNS[0],
    })?;
    let target_index = find_column(&headers, &TARGET_COLUMNS).ok_or(IdentityError::MissingColumn {
        path: source.to_string(),
        column: TARGET_COLUMNS[0],
    })?;

    let mut map = IdentityMap::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let from = record.get(source_index).unwrap_or_default();
        let to = record.get(target_index).unwrap_or_default();

        if from.is_empty() || to.is_empty() {
            let line = record.position().map(csv::Position::line).unwrap_or_default();
            warn!(line, "Skipping user map row with an empty username");
            continue;
        }

        debug!(source = from, target = to, "Mapped user");
        map.insert(from, to);
    }

    Ok(map)
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|header| names.iter().any(|name| header.eq_ignore_ascii_case(name)))
}
