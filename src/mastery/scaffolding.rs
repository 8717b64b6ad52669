use crate::config::MasteryConfig;
use crate::mastery::assessor::assess_performance;
use crate::types::{Attempt, CognitiveProfile, PerformanceBand, ScaffoldingFlags};

pub fn advise_scaffolding(
    profile: Option<&CognitiveProfile>,
    recent: &[Attempt],
    config: &MasteryConfig,
) -> ScaffoldingFlags {
    let band = assess_performance(recent, &config.assessment);
    flags_for_band(profile, band, config)
}

pub fn flags_for_band(
    profile: Option<&CognitiveProfile>,
    band: PerformanceBand,
    config: &MasteryConfig,
) -> ScaffoldingFlags {
    let struggling = band == PerformanceBand::Struggling;
    let thresholds = &config.scaffolding;
    let prefers_visual =
        profile.is_some_and(|p| p.scaffolding.visual_learner > thresholds.visual_learner);
    let needs_concrete =
        profile.is_some_and(|p| p.scaffolding.concrete_materials > thresholds.concrete_materials);

    ScaffoldingFlags {
        visual_support: struggling || prefers_visual,
        number_line: struggling,
        concrete_objects: struggling && needs_concrete,
        worked_example: struggling,
    }
}
