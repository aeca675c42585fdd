//! Immutable per-run migration context.

use crate::config::{MigrationSettings, MismatchPolicy, DEFAULT_LABEL_PREFIX};
use crate::identity::IdentityMap;
use crate::stages::{FallbackStage, ManualResolver, RejectUnresolved, StageMatcher, WorkflowStage};

/// Everything the orchestrator needs besides the gateway.
///
/// Built once before migration starts and never mutated afterwards.
#[derive(Debug)]
pub struct MigrationContext {
    workspace_id: String,
    repository_id: String,
    stages: Vec<WorkflowStage>,
    identities: IdentityMap,
    matcher: StageMatcher,
    resolver: Box<dyn ManualResolver>,
    label_prefix: String,
    apply_estimates: bool,
    mismatch_policy: MismatchPolicy,
}

impl MigrationContext {
    /// Creates a context with default matching, labelling and mismatch policy.
    pub fn new(
        workspace_id: impl Into<String>,
        repository_id: impl Into<String>,
        stages: Vec<WorkflowStage>,
        identities: IdentityMap,
    ) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            repository_id: repository_id.into(),
            stages,
            identities,
            matcher: StageMatcher::default(),
            resolver: Box::new(RejectUnresolved),
            label_prefix: DEFAULT_LABEL_PREFIX.to_string(),
            apply_estimates: false,
            mismatch_policy: MismatchPolicy::default(),
        }
    }

    /// Creates a context configured from `settings`.
    pub fn from_settings(
        settings: &MigrationSettings,
        workspace_id: impl Into<String>,
        repository_id: impl Into<String>,
        stages: Vec<WorkflowStage>,
        identities: IdentityMap,
    ) -> Self {
        let context = Self::new(workspace_id, repository_id, stages, identities)
            .with_matcher(StageMatcher::new(settings.similarity_threshold))
            .with_label_prefix(settings.label_prefix.clone())
            .with_estimates(settings.apply_estimates)
            .with_mismatch_policy(settings.mismatch_policy);

        match &settings.fallback_stage {
            Some(name) => context.with_resolver(FallbackStage::new(name.clone())),
            None => context,
        }
    }

    /// Sets the stage matcher.
    #[must_use]
    pub fn with_matcher(mut self, matcher: StageMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Sets the resolver consulted when matching is inconclusive.
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl ManualResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Sets the traceability label prefix.
    #[must_use]
    pub fn with_label_prefix(mut self, label_prefix: impl Into<String>) -> Self {
        self.label_prefix = label_prefix.into();
        self
    }

    /// Enables or disables sending estimates.
    #[must_use]
    pub fn with_estimates(mut self, apply_estimates: bool) -> Self {
        self.apply_estimates = apply_estimates;
        self
    }

    /// Sets the verification mismatch policy.
    #[must_use]
    pub fn with_mismatch_policy(mut self, mismatch_policy: MismatchPolicy) -> Self {
        self.mismatch_policy = mismatch_policy;
        self
    }

    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    pub fn repository_id(&self) -> &str {
        &self.repository_id
    }

    pub fn identities(&self) -> &IdentityMap {
        &self.identities
    }

    pub fn matcher(&self) -> &StageMatcher {
        &self.matcher
    }

    pub fn label_prefix(&self) -> &str {
        &self.label_prefix
    }

    pub fn apply_estimates(&self) -> bool {
        self.apply_estimates
    }

    pub fn mismatch_policy(&self) -> MismatchPolicy {
        self.mismatch_policy
    }

    /// Resolves the pipeline for a source status.
    pub fn stage_for(&self, status: &str) -> Option<&WorkflowStage> {
        self.matcher
            .resolve(status, &self.stages, self.resolver.as_ref())
    }
}
