//! Collaborator seams for persistence and item pools.
//!
//! The engine never calls these itself; hosts load a record, hand it to the
//! engine, and save what comes back. Writes are last-writer-wins, so hosts
//! with concurrent sessions for one learner must serialize profile saves.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::StoreError;
use crate::review::ReviewSchedule;
use crate::types::{CognitiveProfile, Item};

pub trait ProfileStore {
    fn load_profile(&self, learner_id: &str, domain: &str)
        -> Result<Option<CognitiveProfile>, StoreError>;
    fn save_profile(&self, profile: &CognitiveProfile) -> Result<(), StoreError>;
}

pub trait ScheduleStore {
    fn load_schedule(&self, item_id: &str) -> Result<Option<ReviewSchedule>, StoreError>;
    fn save_schedule(&self, item_id: &str, schedule: &ReviewSchedule) -> Result<(), StoreError>;
}

pub trait ItemSource {
    fn items_for_concept(&self, concept_tag: &str) -> Result<Vec<Item>, StoreError>;
}

/// Process-local store keeping records as JSON, the shape a real backend
/// would persist.
#[derive(Default)]
pub struct InMemoryStore {
    profiles: RwLock<HashMap<(String, String), String>>,
    schedules: RwLock<HashMap<String, String>>,
    items: RwLock<HashMap<String, Vec<Item>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&self, item: Item) {
        self.items
            .write()
            .entry(item.concept_tag.clone())
            .or_default()
            .push(item);
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.read().len()
    }
}

impl ProfileStore for InMemoryStore {
    fn load_profile(
        &self,
        learner_id: &str,
        domain: &str,
    ) -> Result<Option<CognitiveProfile>, StoreError> {
        let key = (learner_id.to_string(), domain.to_string());
        let guard = self.profiles.read();
        guard
            .get(&key)
            .map(|json| serde_json::from_str(json).map_err(StoreError::from))
            .transpose()
    }

    fn save_profile(&self, profile: &CognitiveProfile) -> Result<(), StoreError> {
        let json = serde_json::to_string(profile)?;
        let key = (profile.learner_id.clone(), profile.domain.clone());
        self.profiles.write().insert(key, json);
        Ok(())
    }
}

impl ScheduleStore for InMemoryStore {
    fn load_schedule(&self, item_id: &str) -> Result<Option<ReviewSchedule>, StoreError> {
        let guard = self.schedules.read();
        guard
            .get(item_id)
            .map(|json| serde_json::from_str(json).map_err(StoreError::from))
            .transpose()
    }

    fn save_schedule(&self, item_id: &str, schedule: &ReviewSchedule) -> Result<(), StoreError> {
        let json = serde_json::to_string(schedule)?;
        self.schedules.write().insert(item_id.to_string(), json);
        Ok(())
    }
}

impl ItemSource for InMemoryStore {
    fn items_for_concept(&self, concept_tag: &str) -> Result<Vec<Item>, StoreError> {
        self.items
            .read()
            .get(concept_tag)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("concept {concept_tag}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScheduleParams;
    use crate::review::{review_outcome, ReviewGrade};
    use crate::taxonomy::{CognitiveLevel, StructuralLevel};
    use chrono::Utc;

    #[test]
    fn profile_round_trips_by_learner_and_domain() {
        let store = InMemoryStore::new();
        let profile = CognitiveProfile::new("l1", "math", Utc::now());
        store.save_profile(&profile).unwrap();

        assert_eq!(store.load_profile("l1", "math").unwrap(), Some(profile));
        assert_eq!(store.load_profile("l1", "reading").unwrap(), None);
        assert_eq!(store.profile_count(), 1);
    }

    #[test]
    fn later_save_wins() {
        let store = InMemoryStore::new();
        let mut profile = CognitiveProfile::new("l1", "math", Utc::now());
        store.save_profile(&profile).unwrap();
        profile.context_tag = Some("age-9".into());
        store.save_profile(&profile).unwrap();

        let loaded = store.load_profile("l1", "math").unwrap().unwrap();
        assert_eq!(loaded.context_tag.as_deref(), Some("age-9"));
    }

    #[test]
    fn schedule_round_trips() {
        let store = InMemoryStore::new();
        let params = ScheduleParams::default();
        let schedule = review_outcome(None, ReviewGrade::Quality(4), Utc::now(), &params);
        store.save_schedule("card-1", &schedule).unwrap();
        assert_eq!(store.load_schedule("card-1").unwrap(), Some(schedule));
        assert_eq!(store.load_schedule("card-2").unwrap(), None);
    }

    #[test]
    fn unknown_concept_is_not_found() {
        let store = InMemoryStore::new();
        store.add_item(Item::new("q1", "fractions", StructuralLevel::Unistructural, CognitiveLevel::Recall));
        assert_eq!(store.items_for_concept("fractions").unwrap().len(), 1);
        assert!(matches!(
            store.items_for_concept("geometry"),
            Err(StoreError::NotFound(_))
        ));
    }
}
