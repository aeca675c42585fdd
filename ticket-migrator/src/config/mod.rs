//! Settings loading.
//!
//! This module parses the optional `config.toml` file that controls the
//! target endpoint, workspace, repository and matching policy of a run.

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{MigrationSettings, MismatchPolicy, DEFAULT_ENDPOINT, DEFAULT_LABEL_PREFIX};

use std::path::Path;
use tracing::{debug, info};

/// Environment variable overriding the configured endpoint.
pub const ENDPOINT_ENV: &str = "ZENHUB_GRAPHQL_ENDPOINT";

/// Loads migration settings.
///
/// When `path` is `None` the defaults are used. The endpoint can be
/// overridden with the `ZENHUB_GRAPHQL_ENDPOINT` environment variable,
/// which takes precedence over the config file.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file can't be read or parsed.
pub fn load_settings(path: Option<&Path>) -> Result<MigrationSettings, ConfigError> {
    let mut settings = match path {
        Some(path) => {
            info!(path = %path.display(), "Loading settings");
            let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
                path: path.display().to_string(),
                source: e,
            })?;
            toml::from_str::<MigrationSettings>(&contents).map_err(|e| ConfigError::TomlError {
                path: path.display().to_string(),
                source: e,
            })?
        }
        None => {
            debug!("No config file given, using default settings");
            MigrationSettings::default()
        }
    };

    if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
        if !endpoint.trim().is_empty() {
            debug!(endpoint = %endpoint, "Endpoint overridden from environment");
            settings.endpoint = endpoint.trim().to_string();
        }
    }

    Ok(settings)
}
