//! Workflow stage matching.
//!
//! Maps a free-text source status onto one of the target workspace's
//! pipelines by approximate string similarity. When no stage is close
//! enough the decision is handed to a [`ManualResolver`].

mod similarity;

pub use similarity::similarity_ratio;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::{debug, warn};

/// A workflow stage (pipeline) of the target workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowStage {
    /// Opaque stage identifier.
    pub id: String,

    /// Display name.
    pub name: String,
}

impl WorkflowStage {
    /// Creates a stage.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Result of automatic stage matching.
#[derive(Debug, Clone, PartialEq)]
pub enum StageMatch<'a> {
    /// A stage scored at or above the threshold.
    Matched {
        /// Best scoring stage.
        stage: &'a WorkflowStage,
        /// Its similarity to the status.
        score: f64,
    },

    /// No stage is close enough; manual resolution is needed.
    Inconclusive {
        /// Best score seen, if there were any stages at all.
        best_score: Option<f64>,
    },
}

/// Picks the stage whose name is most similar to a status.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StageMatcher {
    threshold: f64,
}

impl StageMatcher {
    /// Creates a matcher that accepts matches scoring at least `threshold`.
    ///
    /// A threshold of `0.0` always accepts the best candidate.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Returns the minimum accepted similarity.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Scores every stage against `status` and returns the best one.
    ///
    /// Ties go to the stage that comes first in `stages`.
    #[must_use]
    pub fn match_status<'a>(&self, status: &str, stages: &'a [WorkflowStage]) -> StageMatch<'a> {
        let mut best: Option<(&WorkflowStage, f64)> = None;
        for stage in stages {
            let score = similarity_ratio(&stage.name, status);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((stage, score));
            }
        }

        match best {
            Some((stage, score)) if score >= self.threshold => {
                debug!(status, stage = %stage.name, score, "Matched status to stage");
                StageMatch::Matched { stage, score }
            }
            Some((_, score)) => StageMatch::Inconclusive {
                best_score: Some(score),
            },
            None => StageMatch::Inconclusive { best_score: None },
        }
    }

    /// Matches `status`, falling back to `resolver` when inconclusive.
    pub fn resolve<'a>(
        &self,
        status: &str,
        stages: &'a [WorkflowStage],
        resolver: &dyn ManualResolver,
    ) -> Option<&'a WorkflowStage> {
        match self.match_status(status, stages) {
            StageMatch::Matched { stage, .. } => Some(stage),
            StageMatch::Inconclusive { best_score } => {
                warn!(
                    status,
                    best_score,
                    threshold = self.threshold,
                    "No stage matched automatically, requesting manual resolution"
                );
                resolver.resolve(status, stages)
            }
        }
    }
}

/// Decides the stage for a status that could not be matched automatically.
pub trait ManualResolver: Debug + Send + Sync {
    /// Returns the chosen stage, or `None` to leave the issue unstaged.
    fn resolve<'a>(&self, status: &str, stages: &'a [WorkflowStage])
        -> Option<&'a WorkflowStage>;
}

/// Resolver that never picks a stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectUnresolved;

impl ManualResolver for RejectUnresolved {
    fn resolve<'a>(
        &self,
        _status: &str,
        _stages: &'a [WorkflowStage],
    ) -> Option<&'a WorkflowStage> {
        None
    }
}

/// Resolver that always picks the stage with a given name.
#[derive(Debug, Clone)]
pub struct FallbackStage {
    name: String,
}

impl FallbackStage {
    /// Creates a resolver falling back to the stage called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the fallback stage name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ManualResolver for FallbackStage {
    fn resolve<'a>(
        &self,
        status: &str,
        stages: &'a [WorkflowStage],
    ) -> Option<&'a WorkflowStage> {
        let stage = stages.iter().find(|stage| stage.name == self.name);
        if let Some(stage) = stage {
            debug!(status, stage = %stage.name, "Using fallback stage");
        }
        stage
    }
}
