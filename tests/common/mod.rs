#![allow(dead_code)]

use chrono::{DateTime, Utc};
use mastery_engine::{Attempt, CognitiveLevel, Item, StructuralLevel};

pub fn item(id: &str, tag: &str, structural: StructuralLevel, cognitive: CognitiveLevel) -> Item {
    Item::new(id, tag, structural, cognitive)
}

pub fn attempt_at(
    tag: &str,
    structural: StructuralLevel,
    is_correct: bool,
    now: DateTime<Utc>,
) -> Attempt {
    let item = item("q", tag, structural, CognitiveLevel::Recall);
    Attempt::new("learner-1", "session-1", &item, "answer", is_correct, now).with_timing(2500, 0)
}

pub fn fractions_pool() -> Vec<Item> {
    vec![
        item("frac-multi", "fractions", StructuralLevel::Multistructural, CognitiveLevel::Comprehend),
        item("frac-uni", "fractions", StructuralLevel::Unistructural, CognitiveLevel::Recall),
    ]
}
