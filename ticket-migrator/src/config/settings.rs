//! Migration settings deserialization and validation.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use url::Url;

/// Public ZenHub GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.zenhub.com/public/graphql";

/// Prefix of the label that records the source ticket number.
pub const DEFAULT_LABEL_PREFIX: &str = "PD-";

/// What to do when a created issue cannot be read back with the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
    /// Stop the whole run after the mismatching ticket.
    #[default]
    Abort,
    /// Record the mismatch as a failure of that ticket and keep going.
    Continue,
}

impl FromStr for MismatchPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "continue" => Ok(Self::Continue),
            other => Err(format!(
                "unknown mismatch policy '{other}' (expected 'abort' or 'continue')"
            )),
        }
    }
}

/// Parsed settings from a `config.toml` file.
///
/// Every key is optional; missing keys take the defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MigrationSettings {
    /// GraphQL endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Workspace holding the target pipelines.
    pub workspace_id: Option<String>,

    /// Repository to create issues in. Optional when the workspace has a
    /// single repository.
    pub repository_id: Option<String>,

    /// Prefix of the traceability label (defaults to "PD-").
    #[serde(default = "default_label_prefix")]
    pub label_prefix: String,

    /// Minimum similarity a status needs to be matched automatically.
    #[serde(default)]
    pub similarity_threshold: f64,

    /// Behaviour on verification mismatches.
    #[serde(default)]
    pub mismatch_policy: MismatchPolicy,

    /// Pipeline name used when a status cannot be matched automatically.
    pub fallback_stage: Option<String>,

    /// Whether to send ticket estimates after staging.
    #[serde(default)]
    pub apply_estimates: bool,
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            workspace_id: None,
            repository_id: None,
            label_prefix: default_label_prefix(),
            similarity_threshold: 0.0,
            mismatch_policy: MismatchPolicy::default(),
            fallback_stage: None,
            apply_estimates: false,
        }
    }
}

impl MigrationSettings {
    /// Validates values that serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming `source` when the
    /// endpoint is not an http(s) URL, the threshold is outside `[0, 1]`
    /// or the label prefix is blank.
    pub fn validate(&self, source: &str) -> Result<(), ConfigError> {
        self.endpoint_url(source)?;

        if !self.similarity_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.similarity_threshold)
        {
            return Err(ConfigError::ValidationError {
                path: source.to_string(),
                message: format!(
                    "similarity-threshold must be within 0.0-1.0, got {}",
                    self.similarity_threshold
                ),
            });
        }

        if self.label_prefix.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                path: source.to_string(),
                message: "label-prefix must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Parses the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the endpoint is not an
    /// absolute http(s) URL.
    pub fn endpoint_url(&self, source: &str) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.endpoint).map_err(|e| ConfigError::ValidationError {
            path: source.to_string(),
            message: format!("endpoint '{}' is not a valid URL: {e}", self.endpoint),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ConfigError::ValidationError {
                path: source.to_string(),
                message: format!("endpoint scheme must be http or https, got '{scheme}'"),
            }),
        }
    }

    /// Returns the workspace id or an error naming the missing key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSetting`] if no workspace id is set.
    pub fn require_workspace_id(&self) -> Result<&str, ConfigError> {
        self.workspace_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(ConfigError::MissingSetting {
                key: "workspace-id",
            })
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_label_prefix() -> String {
    DEFAULT_LABEL_PREFIX.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_settings() {
        let settings: MigrationSettings = toml::from_str(
            r#"
endpoint = "https://zenhub.example.com/graphql"
workspace-id = "ws-1"
repository-id = "repo-1"
label-prefix = "ASM-"
similarity-threshold = 0.6
mismatch-policy = "continue"
fallback-stage = "Backlog"
apply-estimates = true
"#,
        )
        .unwrap();

        assert_eq!(settings.endpoint, "https://zenhub.example.com/graphql");
        assert_eq!(settings.workspace_id.as_deref(), Some("ws-1"));
        assert_eq!(settings.repository_id.as_deref(), Some("repo-1"));
        assert_eq!(settings.label_prefix, "ASM-");
        assert_eq!(settings.similarity_threshold, 0.6);
        assert_eq!(settings.mismatch_policy, MismatchPolicy::Continue);
        assert_eq!(settings.fallback_stage.as_deref(), Some("Backlog"));
        assert!(settings.apply_estimates);
        settings.validate("config.toml").unwrap();
    }

    #[test]
    fn empty_file_uses_defaults() {
        let settings: MigrationSettings = toml::from_str("").unwrap();

        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.label_prefix, DEFAULT_LABEL_PREFIX);
        assert_eq!(settings.similarity_threshold, 0.0);
        assert_eq!(settings.mismatch_policy, MismatchPolicy::Abort);
        assert!(!settings.apply_estimates);
    }

    #[test]
    fn rejects_unknown_keys() {
        let result: Result<MigrationSettings, _> = toml::from_str("colour = \"blue\"");
        assert!(result.is_err());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let settings = MigrationSettings {
            similarity_threshold: 1.5,
            ..Default::default()
        };

        let result = settings.validate("config.toml");
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let settings = MigrationSettings {
            endpoint: "ftp://example.com/graphql".to_string(),
            ..Default::default()
        };

        assert!(settings.validate("config.toml").is_err());
    }

    #[test]
    fn requires_workspace_id() {
        let settings = MigrationSettings::default();
        assert!(matches!(
            settings.require_workspace_id(),
            Err(ConfigError::MissingSetting {
                key: "workspace-id"
            })
        ));
    }

    #[test]
    fn parses_mismatch_policy_from_str() {
        assert_eq!("abort".parse::<MismatchPolicy>(), Ok(MismatchPolicy::Abort));
        assert_eq!(
            "Continue".parse::<MismatchPolicy>(),
            Ok(MismatchPolicy::Continue)
        );
        assert!("retry".parse::<MismatchPolicy>().is_err());
    }
}
