//! Practice session driver.
//!
//! Per answer: assess, select and annotate the next item. At session end:
//! fold the batch into the profile and look for a breakthrough.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::mastery::{flags_for_band, MasteryEngine, ProfileKey};
use crate::types::{
    Attempt, BreakthroughResult, CognitiveProfile, Item, PerformanceBand, ScaffoldingFlags,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub item: Item,
    pub scaffolding: ScaffoldingFlags,
    pub band: PerformanceBand,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub profile: CognitiveProfile,
    pub breakthrough: BreakthroughResult,
    pub attempts: usize,
}

pub struct PracticeSession<'e> {
    engine: &'e MasteryEngine,
    session_id: String,
    learner_id: String,
    domain: String,
    context_tag: Option<String>,
    profile: Option<CognitiveProfile>,
    history: Vec<Attempt>,
    batch_start: usize,
}

impl<'e> PracticeSession<'e> {
    /// Starts a session. `history` holds earlier attempts for the learner in
    /// chronological order; it informs banding but is not re-folded into the
    /// profile.
    pub fn start(
        engine: &'e MasteryEngine,
        learner_id: impl Into<String>,
        domain: impl Into<String>,
        profile: Option<CognitiveProfile>,
        history: Vec<Attempt>,
    ) -> Self {
        let batch_start = history.len();
        Self {
            engine,
            session_id: Uuid::new_v4().to_string(),
            learner_id: learner_id.into(),
            domain: domain.into(),
            context_tag: None,
            profile,
            history,
            batch_start,
        }
    }

    pub fn with_context(mut self, context_tag: impl Into<String>) -> Self {
        self.context_tag = Some(context_tag.into());
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn learner_id(&self) -> &str {
        &self.learner_id
    }

    pub fn profile(&self) -> Option<&CognitiveProfile> {
        self.profile.as_ref()
    }

    pub fn session_attempts(&self) -> &[Attempt] {
        &self.history[self.batch_start..]
    }

    pub fn recommend<R: Rng + ?Sized>(
        &self,
        pool: &[Item],
        concept_tag: &str,
        rng: &mut R,
    ) -> Option<Recommendation> {
        let band = self.engine.assess(&self.history);
        let item = self
            .engine
            .select_next(pool, self.profile.as_ref(), &self.history, concept_tag, rng)?;
        let scaffolding = flags_for_band(self.profile.as_ref(), band, self.engine.config());

        Some(Recommendation {
            item: item.clone(),
            scaffolding,
            band,
        })
    }

    /// Builds and records an attempt for `item` in this session.
    pub fn answer(
        &mut self,
        item: &Item,
        answer: impl Into<String>,
        is_correct: bool,
        time_spent_ms: u64,
        hints_used: u32,
        scaffolding: &ScaffoldingFlags,
        now: DateTime<Utc>,
    ) -> &Attempt {
        let mut attempt = Attempt::new(
            self.learner_id.clone(),
            self.session_id.clone(),
            item,
            answer,
            is_correct,
            now,
        )
        .with_timing(time_spent_ms, hints_used);
        attempt.scaffolding_used.extend(scaffolding.aids());
        tracing::trace!(
            session = %self.session_id,
            item = %item.id,
            correct = is_correct,
            aids = ?attempt.scaffolding_used.iter().map(|aid| aid.as_str()).collect::<Vec<_>>(),
            "attempt recorded"
        );
        self.record(attempt)
    }

    pub fn record(&mut self, attempt: Attempt) -> &Attempt {
        self.history.push(attempt);
        &self.history[self.history.len() - 1]
    }

    pub fn finish(self, now: DateTime<Utc>) -> SessionSummary {
        let batch = &self.history[self.batch_start..];
        let key = ProfileKey {
            learner_id: &self.learner_id,
            domain: &self.domain,
            context_tag: self.context_tag.as_deref(),
        };
        let profile = self.engine.update_profile(self.profile.as_ref(), key, batch, now);
        let breakthrough = self.engine.detect_breakthrough(&self.history);

        tracing::debug!(
            session = %self.session_id,
            learner = %self.learner_id,
            attempts = batch.len(),
            breakthrough = breakthrough.has_breakthrough,
            "practice session finished"
        );

        SessionSummary {
            session_id: self.session_id.clone(),
            profile,
            breakthrough,
            attempts: batch.len(),
        }
    }
}
