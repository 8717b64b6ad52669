use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Hard ease bounds. Configured bounds may only narrow this range.
pub const EASE_FLOOR: f64 = 1.3;
pub const EASE_CEILING: f64 = 2.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentParams {
    pub window: usize,
    pub excelling_max_mean_time_ms: f64,
    pub struggling_accuracy: f64,
    pub struggling_mean_hints: f64,
}

impl Default for AssessmentParams {
    fn default() -> Self {
        Self {
            window: 3,
            excelling_max_mean_time_ms: 10_000.0,
            struggling_accuracy: 0.5,
            struggling_mean_hints: 2.0,
        }
    }
}

/// Cumulative cut points for the cognitive-level draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CognitiveDrawWeights {
    pub recall_below: f64,
    pub comprehend_below: f64,
    pub apply_below: f64,
}

impl Default for CognitiveDrawWeights {
    fn default() -> Self {
        Self {
            recall_below: 0.4,
            comprehend_below: 0.7,
            apply_below: 0.9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaffoldingThresholds {
    pub visual_learner: f64,
    pub concrete_materials: f64,
}

impl Default for ScaffoldingThresholds {
    fn default() -> Self {
        Self {
            visual_learner: 0.6,
            concrete_materials: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakthroughParams {
    pub window: usize,
    pub confirm: usize,
}

impl Default for BreakthroughParams {
    fn default() -> Self {
        Self {
            window: 5,
            confirm: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileParams {
    pub preference_step: f64,
    /// Minimum attempts before a level is inferred from history.
    pub inference_min_attempts: usize,
    /// Correct/total ratio at or above which the highest attempted level counts.
    pub inference_numerator: usize,
    pub inference_denominator: usize,
}

impl Default for ProfileParams {
    fn default() -> Self {
        Self {
            preference_step: 0.1,
            inference_min_attempts: 3,
            inference_numerator: 2,
            inference_denominator: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleParams {
    pub max_interval_days: u32,
    pub default_ease: f64,
    pub min_ease: f64,
    pub max_ease: f64,
    pub binary_pass_bonus: f64,
    pub binary_fail_penalty: f64,
    pub pass_quality: u8,
}

impl Default for ScheduleParams {
    fn default() -> Self {
        Self {
            max_interval_days: 36_500,
            default_ease: 2.5,
            min_ease: EASE_FLOOR,
            max_ease: EASE_CEILING,
            binary_pass_bonus: 0.1,
            binary_fail_penalty: 0.2,
            pass_quality: 3,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasteryConfig {
    pub assessment: AssessmentParams,
    pub cognitive_draw: CognitiveDrawWeights,
    pub scaffolding: ScaffoldingThresholds,
    pub breakthrough: BreakthroughParams,
    pub profile: ProfileParams,
    pub schedule: ScheduleParams,
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|val| val.parse().ok())
}

impl MasteryConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(val) = env_parse("MASTERY_ASSESSMENT_WINDOW") {
            config.assessment.window = val;
        }
        if let Some(val) = env_parse("MASTERY_EXCELLING_MAX_TIME_MS") {
            config.assessment.excelling_max_mean_time_ms = val;
        }
        if let Some(val) = env_parse("MASTERY_BREAKTHROUGH_WINDOW") {
            config.breakthrough.window = val;
        }
        if let Some(val) = env_parse("MASTERY_BREAKTHROUGH_CONFIRM") {
            config.breakthrough.confirm = val;
        }
        if let Some(val) = env_parse("MASTERY_PREFERENCE_STEP") {
            config.profile.preference_step = val;
        }
        if let Some(val) = env_parse("MASTERY_DEFAULT_EASE") {
            config.schedule.default_ease = val;
        }
        if let Some(val) = env_parse("MASTERY_MIN_EASE") {
            config.schedule.min_ease = val;
        }

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assessment.window == 0 {
            return Err(ConfigError::Validation("assessment window must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.assessment.struggling_accuracy) {
            return Err(ConfigError::Validation(
                "struggling accuracy must be within [0, 1]".into(),
            ));
        }

        let draw = &self.cognitive_draw;
        let ascending = 0.0 <= draw.recall_below
            && draw.recall_below <= draw.comprehend_below
            && draw.comprehend_below <= draw.apply_below
            && draw.apply_below <= 1.0;
        if !ascending {
            return Err(ConfigError::Validation(
                "cognitive draw cut points must ascend within [0, 1]".into(),
            ));
        }

        let breakthrough = &self.breakthrough;
        if breakthrough.confirm == 0 || breakthrough.confirm > breakthrough.window {
            return Err(ConfigError::Validation(format!(
                "breakthrough confirm {} must be within 1..={}",
                breakthrough.confirm, breakthrough.window
            )));
        }

        let profile = &self.profile;
        if profile.inference_denominator == 0
            || profile.inference_numerator > profile.inference_denominator
        {
            return Err(ConfigError::Validation(
                "inference ratio must be a fraction within [0, 1]".into(),
            ));
        }

        let schedule = &self.schedule;
        if schedule.min_ease < EASE_FLOOR || schedule.max_ease > EASE_CEILING {
            return Err(ConfigError::Validation(format!(
                "ease bounds must lie within [{EASE_FLOOR}, {EASE_CEILING}]: min {} max {}",
                schedule.min_ease, schedule.max_ease
            )));
        }
        if schedule.min_ease > schedule.max_ease {
            return Err(ConfigError::Validation(format!(
                "ease bounds inverted: min {} max {}",
                schedule.min_ease, schedule.max_ease
            )));
        }
        if !(schedule.min_ease..=schedule.max_ease).contains(&schedule.default_ease) {
            return Err(ConfigError::Validation(
                "default ease must lie within ease bounds".into(),
            ));
        }
        if schedule.max_interval_days < crate::review::schedule::SECOND_INTERVAL_DAYS
            || schedule.pass_quality > 5
        {
            return Err(ConfigError::Validation(
                "max interval must cover the second review and pass quality must be <= 5".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(MasteryConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_inverted_ease_bounds() {
        let mut config = MasteryConfig::default();
        config.schedule.min_ease = 3.0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_ease_floor_below_sm2_minimum() {
        let mut config = MasteryConfig::default();
        config.schedule.min_ease = 0.5;
        config.schedule.default_ease = 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_ease_ceiling_above_default_cap() {
        let mut config = MasteryConfig::default();
        config.schedule.max_ease = 3.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn accepts_narrowed_ease_range() {
        let mut config = MasteryConfig::default();
        config.schedule.min_ease = 1.5;
        config.schedule.max_ease = 2.2;
        config.schedule.default_ease = 2.0;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_max_interval_below_second_review() {
        let mut config = MasteryConfig::default();
        config.schedule.max_interval_days = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unordered_draw_weights() {
        let mut config = MasteryConfig::default();
        config.cognitive_draw.comprehend_below = 0.95;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_confirm_larger_than_window() {
        let mut config = MasteryConfig::default();
        config.breakthrough.confirm = 6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_env_overrides_and_ignores_garbage() {
        std::env::set_var("MASTERY_BREAKTHROUGH_WINDOW", "7");
        std::env::set_var("MASTERY_PREFERENCE_STEP", "not-a-number");
        let config = MasteryConfig::from_env();
        std::env::remove_var("MASTERY_BREAKTHROUGH_WINDOW");
        std::env::remove_var("MASTERY_PREFERENCE_STEP");

        assert_eq!(config.breakthrough.window, 7);
        assert_eq!(config.profile.preference_step, 0.1);
    }
}
