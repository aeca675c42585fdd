//! Runner configuration.

use crate::config::{MigrationSettings, MismatchPolicy};
use std::path::{Path, PathBuf};

/// Configuration for a migration run.
///
/// Paths and the token always come from the caller. The remaining fields
/// are optional overrides applied on top of the settings file.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path to the tickets CSV export.
    tickets_path: PathBuf,
    /// Path to the identity mapping CSV.
    users_path: PathBuf,
    /// API token sent as a bearer credential.
    token: String,
    /// Whether to preview the migration without sending mutations.
    dry_run: bool,
    /// Path to the settings file.
    config_path: Option<PathBuf>,
    workspace_id: Option<String>,
    repository_id: Option<String>,
    label_prefix: Option<String>,
    similarity_threshold: Option<f64>,
    mismatch_policy: Option<MismatchPolicy>,
    fallback_stage: Option<String>,
    apply_estimates: Option<bool>,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(tickets_path: PathBuf, users_path: PathBuf, token: String, dry_run: bool) -> Self {
        Self {
            tickets_path,
            users_path,
            token,
            dry_run,
            config_path: None,
            workspace_id: None,
            repository_id: None,
            label_prefix: None,
            similarity_threshold: None,
            mismatch_policy: None,
            fallback_stage: None,
            apply_estimates: None,
        }
    }

    /// Sets the settings file path.
    pub fn with_config_path(mut self, config_path: PathBuf) -> Self {
        self.config_path = Some(config_path);
        self
    }

    /// Overrides the workspace id.
    pub fn with_workspace_id(mut self, workspace_id: String) -> Self {
        self.workspace_id = Some(workspace_id);
        self
    }

    /// Overrides the repository id.
    pub fn with_repository_id(mut self, repository_id: String) -> Self {
        self.repository_id = Some(repository_id);
        self
    }

    /// Overrides the traceability label prefix.
    pub fn with_label_prefix(mut self, label_prefix: String) -> Self {
        self.label_prefix = Some(label_prefix);
        self
    }

    /// Overrides the stage similarity threshold.
    pub fn with_similarity_threshold(mut self, similarity_threshold: f64) -> Self {
        self.similarity_threshold = Some(similarity_threshold);
        self
    }

    /// Overrides the verification mismatch policy.
    pub fn with_mismatch_policy(mut self, mismatch_policy: MismatchPolicy) -> Self {
        self.mismatch_policy = Some(mismatch_policy);
        self
    }

    /// Overrides the fallback stage.
    pub fn with_fallback_stage(mut self, fallback_stage: String) -> Self {
        self.fallback_stage = Some(fallback_stage);
        self
    }

    /// Overrides whether estimates are sent.
    pub fn with_apply_estimates(mut self, apply_estimates: bool) -> Self {
        self.apply_estimates = Some(apply_estimates);
        self
    }

    /// Returns the tickets CSV path.
    pub fn tickets_path(&self) -> &Path {
        &self.tickets_path
    }

    /// Returns the identity mapping CSV path.
    pub fn users_path(&self) -> &Path {
        &self.users_path
    }

    /// Returns the configured API token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the settings file path, if any.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Returns a description of where settings came from, for error messages.
    pub(crate) fn settings_source(&self) -> String {
        self.config_path
            .as_deref()
            .map_or_else(|| "command line".to_string(), |path| path.display().to_string())
    }

    /// Applies the command-line overrides to `settings`.
    pub fn apply_overrides(&self, settings: &mut MigrationSettings) {
        if let Some(workspace_id) = &self.workspace_id {
            settings.workspace_id = Some(workspace_id.clone());
        }
        if let Some(repository_id) = &self.repository_id {
            settings.repository_id = Some(repository_id.clone());
        }
        if let Some(label_prefix) = &self.label_prefix {
            settings.label_prefix = label_prefix.clone();
        }
        if let Some(threshold) = self.similarity_threshold {
            settings.similarity_threshold = threshold;
        }
        if let Some(policy) = self.mismatch_policy {
            settings.mismatch_policy = policy;
        }
        if let Some(fallback_stage) = &self.fallback_stage {
            settings.fallback_stage = Some(fallback_stage.clone());
        }
        if let Some(apply_estimates) = self.apply_estimates {
            settings.apply_estimates = apply_estimates;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_file_values() {
        let config = RunnerConfig::new(
            PathBuf::from("tickets.csv"),
            PathBuf::from("users.csv"),
            "token".to_string(),
            false,
        )
        .with_workspace_id("ws-cli".to_string())
        .with_mismatch_policy(MismatchPolicy::Continue)
        .with_similarity_threshold(0.5)
        .with_apply_estimates(true);

        let mut settings = MigrationSettings {
            workspace_id: Some("ws-file".to_string()),
            repository_id: Some("repo-file".to_string()),
            ..Default::default()
        };
        config.apply_overrides(&mut settings);

        assert_eq!(settings.workspace_id.as_deref(), Some("ws-cli"));
        assert_eq!(settings.repository_id.as_deref(), Some("repo-file"));
        assert_eq!(settings.mismatch_policy, MismatchPolicy::Continue);
        assert_eq!(settings.similarity_threshold, 0.5);
        assert!(settings.apply_estimates);
        assert_eq!(settings.label_prefix, "PD-");
        assert_eq!(config.settings_source(), "command line");
    }
}
