//! SM-2 family scheduler shared by recall cards and recorded mistakes.
//!
//! The two item classes differ only in how a review is graded: cards carry a
//! 0-5 quality score and move ease by the SM-2 formula, mistakes carry a
//! pass/fail flag and move ease by flat steps.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{ScheduleParams, EASE_CEILING, EASE_FLOOR};

const MAX_QUALITY: u8 = 5;

pub const FIRST_INTERVAL_DAYS: u32 = 1;
pub const SECOND_INTERVAL_DAYS: u32 = 6;
/// Interval after any failed review.
pub const RESET_INTERVAL_DAYS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ReviewGrade {
    /// 0-5 recall quality.
    Quality(u8),
    /// Plain pass/fail.
    Binary(bool),
}

impl ReviewGrade {
    pub fn passed(&self, params: &ScheduleParams) -> bool {
        match *self {
            Self::Quality(q) => q.min(MAX_QUALITY) >= params.pass_quality,
            Self::Binary(passed) => passed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleState {
    New,
    Scheduled,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSchedule {
    pub interval_days: u32,
    pub ease_factor: f64,
    pub repetitions: u32,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_due: Option<DateTime<Utc>>,
    pub needs_review: bool,
}

impl ReviewSchedule {
    pub fn new(params: &ScheduleParams) -> Self {
        Self {
            interval_days: FIRST_INTERVAL_DAYS,
            ease_factor: params.default_ease,
            repetitions: 0,
            last_reviewed: None,
            next_due: None,
            needs_review: false,
        }
    }

    /// Due when the next review date has arrived or was never set.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_due.map_or(true, |due| due <= now)
    }

    pub fn state(&self) -> ScheduleState {
        match (self.last_reviewed, self.repetitions) {
            (None, _) => ScheduleState::New,
            (Some(_), 0) => ScheduleState::Reset,
            (Some(_), _) => ScheduleState::Scheduled,
        }
    }
}

/// SM-2 ease delta for a 0-5 quality.
pub fn sm2_ease_delta(quality: u8) -> f64 {
    let miss = f64::from(MAX_QUALITY - quality.min(MAX_QUALITY));
    0.1 - miss * (0.08 + miss * 0.02)
}

/// Configured ease bounds, narrowed into `[1.3, 2.5]` and never inverted, so
/// unvalidated params cannot push ease outside the SM-2 range.
fn ease_bounds(params: &ScheduleParams) -> (f64, f64) {
    let lo = if params.min_ease.is_nan() {
        EASE_FLOOR
    } else {
        params.min_ease.clamp(EASE_FLOOR, EASE_CEILING)
    };
    let hi = if params.max_ease.is_nan() {
        EASE_CEILING
    } else {
        params.max_ease.clamp(lo, EASE_CEILING)
    };
    (lo, hi)
}

fn clamp_ease(ease: f64, (lo, hi): (f64, f64)) -> f64 {
    if ease.is_nan() {
        hi
    } else {
        ease.clamp(lo, hi)
    }
}

fn next_ease(ease: f64, grade: ReviewGrade, passed: bool, params: &ScheduleParams) -> f64 {
    let next = match grade {
        ReviewGrade::Quality(q) => ease + sm2_ease_delta(q),
        ReviewGrade::Binary(_) if passed => ease + params.binary_pass_bonus,
        ReviewGrade::Binary(_) => ease - params.binary_fail_penalty,
    };
    clamp_ease(next, ease_bounds(params))
}

fn days_from(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Applies one review to `schedule`, or to a fresh schedule when `None`.
pub fn review_outcome(
    schedule: Option<&ReviewSchedule>,
    grade: ReviewGrade,
    now: DateTime<Utc>,
    params: &ScheduleParams,
) -> ReviewSchedule {
    let grade = match grade {
        ReviewGrade::Quality(q) if q > MAX_QUALITY => {
            tracing::warn!(quality = q, "review quality out of range, clamping to 5");
            ReviewGrade::Quality(MAX_QUALITY)
        }
        other => other,
    };

    let prior = schedule.cloned().unwrap_or_else(|| ReviewSchedule::new(params));
    let prior_ease = clamp_ease(prior.ease_factor, ease_bounds(params));
    let passed = grade.passed(params);
    let ease_factor = next_ease(prior_ease, grade, passed, params);

    if !passed {
        tracing::debug!(
            repetitions = prior.repetitions,
            ease = ease_factor,
            "review failed, schedule reset"
        );
        return ReviewSchedule {
            interval_days: RESET_INTERVAL_DAYS,
            ease_factor,
            repetitions: 0,
            last_reviewed: Some(now),
            next_due: Some(days_from(now, RESET_INTERVAL_DAYS)),
            needs_review: true,
        };
    }

    let interval_days = match prior.repetitions {
        0 => FIRST_INTERVAL_DAYS,
        1 => SECOND_INTERVAL_DAYS,
        _ => (f64::from(prior.interval_days.max(1)) * prior_ease).round() as u32,
    }
    .clamp(1, params.max_interval_days.max(1));

    ReviewSchedule {
        interval_days,
        ease_factor,
        repetitions: prior.repetitions.saturating_add(1),
        last_reviewed: Some(now),
        next_due: Some(days_from(now, interval_days)),
        needs_review: false,
    }
}
