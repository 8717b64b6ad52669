//! Performance Assessor - reduces the recent attempt window to a band.

use crate::config::AssessmentParams;
use crate::types::{Attempt, PerformanceBand};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub accuracy: f64,
    pub mean_hints: f64,
    pub mean_time_ms: f64,
}

impl WindowStats {
    pub fn from_attempts(attempts: &[Attempt]) -> Option<Self> {
        if attempts.is_empty() {
            return None;
        }
        let n = attempts.len() as f64;
        let correct = attempts.iter().filter(|a| a.is_correct).count() as f64;
        let hints: u64 = attempts.iter().map(|a| a.hints_used as u64).sum();
        let time: u64 = attempts.iter().map(|a| a.time_spent_ms).sum();

        Some(Self {
            accuracy: correct / n,
            mean_hints: hints as f64 / n,
            mean_time_ms: time as f64 / n,
        })
    }
}

/// Bands the last `params.window` attempts. Shorter histories are on-track.
pub fn assess_performance(attempts: &[Attempt], params: &AssessmentParams) -> PerformanceBand {
    if params.window == 0 || attempts.len() < params.window {
        return PerformanceBand::OnTrack;
    }
    let window = &attempts[attempts.len() - params.window..];
    let Some(stats) = WindowStats::from_attempts(window) else {
        return PerformanceBand::OnTrack;
    };

    let band = if stats.accuracy >= 1.0
        && stats.mean_hints == 0.0
        && stats.mean_time_ms < params.excelling_max_mean_time_ms
    {
        PerformanceBand::Excelling
    } else if stats.accuracy < params.struggling_accuracy
        || stats.mean_hints > params.struggling_mean_hints
    {
        PerformanceBand::Struggling
    } else {
        PerformanceBand::OnTrack
    };

    tracing::trace!(
        accuracy = stats.accuracy,
        mean_hints = stats.mean_hints,
        mean_time_ms = stats.mean_time_ms,
        band = band.as_str(),
        "performance assessed"
    );
    band
}
