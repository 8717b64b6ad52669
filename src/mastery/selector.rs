//! Level Selector - picks the next item's target levels and draws a candidate.
//!
//! Filtering relaxes in four stages so that any non-empty pool yields an item
//! while exact pedagogical matches win when present.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::config::{CognitiveDrawWeights, MasteryConfig, ProfileParams};
use crate::mastery::assessor::assess_performance;
use crate::taxonomy::{CognitiveLevel, StructuralLevel};
use crate::types::{Attempt, CognitiveProfile, Item, PerformanceBand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaxStage {
    Exact,
    StructuralAndConcept,
    StructuralOnly,
    WholePool,
}

impl RelaxStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::StructuralAndConcept => "structural_and_concept",
            Self::StructuralOnly => "structural_only",
            Self::WholePool => "whole_pool",
        }
    }
}

/// Infers a structural level from raw attempts.
///
/// With enough attempts and a success ratio at or above the configured
/// fraction, the highest attempted level counts. Everything else falls back to
/// the single-aspect level.
pub fn infer_structural_level<'a, I>(attempts: I, params: &ProfileParams) -> StructuralLevel
where
    I: IntoIterator<Item = &'a Attempt>,
{
    let (total, correct, highest) = attempts.into_iter().fold(
        (0usize, 0usize, None::<StructuralLevel>),
        |(total, correct, highest), a| {
            let level = highest.map_or(a.structural_level, |h| h.max(a.structural_level));
            (total + 1, correct + usize::from(a.is_correct), Some(level))
        },
    );
    if total == 0 || total < params.inference_min_attempts {
        return StructuralLevel::Unistructural;
    }
    // correct / total >= num / den, kept in integers
    if correct * params.inference_denominator >= total * params.inference_numerator {
        highest.unwrap_or(StructuralLevel::Unistructural)
    } else {
        StructuralLevel::Unistructural
    }
}

pub fn current_structural_level(
    profile: Option<&CognitiveProfile>,
    recent: &[Attempt],
    concept_tag: &str,
    params: &ProfileParams,
) -> StructuralLevel {
    match profile.and_then(|p| p.concept(concept_tag)) {
        Some(mastery) => mastery.structural_level,
        None => infer_structural_level(recent, params),
    }
}

pub fn target_structural_level(current: StructuralLevel, band: PerformanceBand) -> StructuralLevel {
    match band {
        PerformanceBand::Excelling => current.next(),
        PerformanceBand::Struggling => current.previous(),
        PerformanceBand::OnTrack => current,
    }
}

/// Maps a uniform draw `r` in [0, 1) to a cognitive level. `evaluate` breaks
/// the analyze/evaluate tie for excelling learners.
pub fn cognitive_level_for_draw(
    r: f64,
    band: PerformanceBand,
    weights: &CognitiveDrawWeights,
    evaluate: bool,
) -> CognitiveLevel {
    if r < weights.recall_below {
        CognitiveLevel::Recall
    } else if r < weights.comprehend_below {
        CognitiveLevel::Comprehend
    } else if r < weights.apply_below {
        CognitiveLevel::Apply
    } else if band == PerformanceBand::Excelling {
        if evaluate {
            CognitiveLevel::Evaluate
        } else {
            CognitiveLevel::Analyze
        }
    } else {
        CognitiveLevel::Apply
    }
}

pub fn draw_cognitive_level<R: Rng + ?Sized>(
    rng: &mut R,
    band: PerformanceBand,
    weights: &CognitiveDrawWeights,
) -> CognitiveLevel {
    let r: f64 = rng.random();
    let evaluate =
        r >= weights.apply_below && band == PerformanceBand::Excelling && rng.random_bool(0.5);
    cognitive_level_for_draw(r, band, weights, evaluate)
}

/// Narrows the pool, relaxing the match until something survives.
pub fn filter_candidates<'a>(
    pool: &'a [Item],
    structural: StructuralLevel,
    cognitive: CognitiveLevel,
    concept_tag: &str,
) -> (Vec<&'a Item>, RelaxStage) {
    let exact: Vec<&Item> = pool
        .iter()
        .filter(|i| {
            i.structural_level == structural
                && i.cognitive_level == cognitive
                && i.concept_tag == concept_tag
        })
        .collect();
    if !exact.is_empty() {
        return (exact, RelaxStage::Exact);
    }

    let by_concept: Vec<&Item> = pool
        .iter()
        .filter(|i| i.structural_level == structural && i.concept_tag == concept_tag)
        .collect();
    if !by_concept.is_empty() {
        return (by_concept, RelaxStage::StructuralAndConcept);
    }

    let by_level: Vec<&Item> = pool.iter().filter(|i| i.structural_level == structural).collect();
    if !by_level.is_empty() {
        return (by_level, RelaxStage::StructuralOnly);
    }

    (pool.iter().collect(), RelaxStage::WholePool)
}

/// Chooses the next item, or `None` when the pool is empty.
pub fn select_next<'a, R: Rng + ?Sized>(
    pool: &'a [Item],
    profile: Option<&CognitiveProfile>,
    recent: &[Attempt],
    concept_tag: &str,
    config: &MasteryConfig,
    rng: &mut R,
) -> Option<&'a Item> {
    if pool.is_empty() {
        tracing::debug!(concept = concept_tag, "no candidate: empty item pool");
        return None;
    }

    let band = assess_performance(recent, &config.assessment);
    let current = current_structural_level(profile, recent, concept_tag, &config.profile);
    let structural = target_structural_level(current, band);
    let cognitive = draw_cognitive_level(rng, band, &config.cognitive_draw);

    let (candidates, stage) = filter_candidates(pool, structural, cognitive, concept_tag);
    tracing::debug!(
        concept = concept_tag,
        band = band.as_str(),
        structural = structural.as_str(),
        cognitive = cognitive.as_str(),
        stage = stage.as_str(),
        candidates = candidates.len(),
        "item candidates filtered"
    );

    candidates.choose(rng).copied()
}
