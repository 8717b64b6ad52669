//! Profile Updater - folds an attempt batch into the learner profile.
//!
//! The input profile is never mutated; callers persist the returned value.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::config::MasteryConfig;
use crate::mastery::selector::infer_structural_level;
use crate::types::{
    Attempt, CognitiveProfile, ConceptMastery, ScaffoldingAid, ScaffoldingPreferences, Zpd,
};

/// Identifies the profile being updated and labels it.
#[derive(Debug, Clone, Copy)]
pub struct ProfileKey<'a> {
    pub learner_id: &'a str,
    pub domain: &'a str,
    pub context_tag: Option<&'a str>,
}

pub fn update_profile(
    existing: Option<&CognitiveProfile>,
    key: ProfileKey<'_>,
    batch: &[Attempt],
    now: DateTime<Utc>,
    config: &MasteryConfig,
) -> CognitiveProfile {
    let mut profile = match existing {
        Some(p) => p.clone(),
        None => CognitiveProfile::new(key.learner_id, key.domain, now),
    };
    profile.learner_id = key.learner_id.to_string();
    profile.domain = key.domain.to_string();
    if let Some(tag) = key.context_tag {
        profile.context_tag = Some(tag.to_string());
    }

    let mut by_concept: BTreeMap<&str, Vec<&Attempt>> = BTreeMap::new();
    for attempt in batch {
        by_concept
            .entry(attempt.concept_tag.as_str())
            .or_default()
            .push(attempt);
    }

    for (tag, attempts) in &by_concept {
        let previous_total = profile.concept(tag).map_or(0, |m| m.total_attempts);
        let mastery = assess_concept(attempts, previous_total, now, config);
        tracing::debug!(
            learner = key.learner_id,
            concept = tag,
            level = mastery.structural_level.as_str(),
            success_rate = mastery.success_rate,
            total_attempts = mastery.total_attempts,
            "concept mastery updated"
        );
        profile.concepts.insert(tag.to_string(), mastery);
    }

    profile.scaffolding = adjust_preferences(&profile.scaffolding, batch, config.profile.preference_step);
    profile.zpd = Zpd::from_concepts(&profile.concepts);
    profile.last_updated = now;
    profile
}

fn assess_concept(
    attempts: &[&Attempt],
    previous_total: u32,
    now: DateTime<Utc>,
    config: &MasteryConfig,
) -> ConceptMastery {
    let correct = attempts.iter().filter(|a| a.is_correct).count();
    let success_rate = if attempts.is_empty() {
        0.0
    } else {
        correct as f64 / attempts.len() as f64
    };
    let cognitive_level = attempts
        .iter()
        .map(|a| a.cognitive_level)
        .max()
        .unwrap_or_default();
    let batch_count = u32::try_from(attempts.len()).unwrap_or(u32::MAX);

    ConceptMastery {
        structural_level: infer_structural_level(attempts.iter().copied(), &config.profile),
        cognitive_level,
        confidence: success_rate,
        last_assessment: now,
        total_attempts: previous_total.saturating_add(batch_count),
        success_rate,
    }
}

/// Nudges preference weights toward the aids the learner actually used.
fn adjust_preferences(
    current: &ScaffoldingPreferences,
    batch: &[Attempt],
    step: f64,
) -> ScaffoldingPreferences {
    let used = |aid| batch.iter().any(|a| a.used_aid(aid));
    let mut prefs = current.clone();
    if used(ScaffoldingAid::VisualSupport) {
        prefs.visual_learner = ScaffoldingPreferences::nudge(prefs.visual_learner, step);
    }
    if used(ScaffoldingAid::ConcreteObjects) {
        prefs.concrete_materials = ScaffoldingPreferences::nudge(prefs.concrete_materials, step);
    }
    prefs
}
