//! MasteryEngine - single entry point over the mastery components.
//!
//! Holds only configuration; every call takes the learner state it needs and
//! returns fresh values.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::config::MasteryConfig;
use crate::mastery::assessor::assess_performance;
use crate::mastery::breakthrough::detect_breakthrough;
use crate::mastery::profile::{update_profile, ProfileKey};
use crate::mastery::scaffolding::advise_scaffolding;
use crate::mastery::selector::select_next;
use crate::types::{
    Attempt, BreakthroughResult, CognitiveProfile, Item, PerformanceBand, ScaffoldingFlags,
};

#[derive(Debug, Clone, Default)]
pub struct MasteryEngine {
    config: MasteryConfig,
}

impl MasteryEngine {
    pub fn new(config: MasteryConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        let config = MasteryConfig::from_env();
        if let Err(err) = config.validate() {
            tracing::warn!(error = %err, "invalid mastery config from env, using defaults");
            return Self::default();
        }
        Self::new(config)
    }

    pub fn config(&self) -> &MasteryConfig {
        &self.config
    }

    pub fn assess(&self, recent: &[Attempt]) -> PerformanceBand {
        assess_performance(recent, &self.config.assessment)
    }

    pub fn select_next<'a, R: Rng + ?Sized>(
        &self,
        pool: &'a [Item],
        profile: Option<&CognitiveProfile>,
        recent: &[Attempt],
        concept_tag: &str,
        rng: &mut R,
    ) -> Option<&'a Item> {
        select_next(pool, profile, recent, concept_tag, &self.config, rng)
    }

    pub fn scaffold(&self, profile: Option<&CognitiveProfile>, recent: &[Attempt]) -> ScaffoldingFlags {
        advise_scaffolding(profile, recent, &self.config)
    }

    pub fn detect_breakthrough(&self, attempts: &[Attempt]) -> BreakthroughResult {
        detect_breakthrough(attempts, &self.config.breakthrough)
    }

    pub fn update_profile(
        &self,
        existing: Option<&CognitiveProfile>,
        key: ProfileKey<'_>,
        batch: &[Attempt],
        now: DateTime<Utc>,
    ) -> CognitiveProfile {
        update_profile(existing, key, batch, now, &self.config)
    }
}
