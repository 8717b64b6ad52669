use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ScheduleParams;
use crate::review::schedule::{review_outcome, ReviewGrade, ReviewSchedule};
use crate::types::Attempt;

/// Anything carrying its own review schedule.
pub trait Reviewable {
    fn review_id(&self) -> &str;
    fn schedule(&self) -> &ReviewSchedule;

    fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.schedule().is_due(now)
    }
}

/// Items due at `now`, unscheduled ones first, then oldest due date first.
pub fn due_items<T: Reviewable>(items: &[T], now: DateTime<Utc>) -> Vec<&T> {
    let mut due: Vec<&T> = items.iter().filter(|item| item.is_due(now)).collect();
    due.sort_by_key(|item| item.schedule().next_due);
    due
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallCard {
    pub id: String,
    pub front: String,
    pub back: String,
    pub schedule: ReviewSchedule,
}

impl RecallCard {
    pub fn new(
        id: impl Into<String>,
        front: impl Into<String>,
        back: impl Into<String>,
        params: &ScheduleParams,
    ) -> Self {
        Self {
            id: id.into(),
            front: front.into(),
            back: back.into(),
            schedule: ReviewSchedule::new(params),
        }
    }

    pub fn review(&self, quality: u8, now: DateTime<Utc>, params: &ScheduleParams) -> Self {
        Self {
            schedule: review_outcome(Some(&self.schedule), ReviewGrade::Quality(quality), now, params),
            ..self.clone()
        }
    }
}

impl Reviewable for RecallCard {
    fn review_id(&self) -> &str {
        &self.id
    }

    fn schedule(&self) -> &ReviewSchedule {
        &self.schedule
    }
}

/// A recorded wrong answer, rescheduled until it is answered correctly again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MistakeRecord {
    pub item_id: String,
    pub concept_tag: String,
    pub mistake_count: u32,
    pub last_wrong_answer: String,
    pub schedule: ReviewSchedule,
}

impl MistakeRecord {
    /// Records a miss on `attempt`. A first miss creates the record; a repeat
    /// miss bumps the counter. Either way the schedule takes a failed review.
    pub fn record_mistake(
        existing: Option<&MistakeRecord>,
        attempt: &Attempt,
        now: DateTime<Utc>,
        params: &ScheduleParams,
    ) -> Self {
        let prior_schedule = existing.map(|m| &m.schedule);
        let schedule = review_outcome(prior_schedule, ReviewGrade::Binary(false), now, params);
        let mistake_count = existing.map_or(0, |m| m.mistake_count).saturating_add(1);

        tracing::debug!(
            item = %attempt.item_id,
            mistake_count,
            "mistake recorded"
        );

        Self {
            item_id: attempt.item_id.clone(),
            concept_tag: attempt.concept_tag.clone(),
            mistake_count,
            last_wrong_answer: attempt.answer.clone(),
            schedule,
        }
    }

    pub fn review(&self, passed: bool, now: DateTime<Utc>, params: &ScheduleParams) -> Self {
        let mut next = self.clone();
        next.schedule = review_outcome(Some(&self.schedule), ReviewGrade::Binary(passed), now, params);
        if !passed {
            next.mistake_count = next.mistake_count.saturating_add(1);
        }
        next
    }
}

impl Reviewable for MistakeRecord {
    fn review_id(&self) -> &str {
        &self.item_id
    }

    fn schedule(&self) -> &ReviewSchedule {
        &self.schedule
    }
}
