use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::taxonomy::{CognitiveLevel, StructuralLevel};

/// Practice item supplied by a content collaborator. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub concept_tag: String,
    pub structural_level: StructuralLevel,
    pub cognitive_level: CognitiveLevel,
    pub difficulty: String,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        concept_tag: impl Into<String>,
        structural_level: StructuralLevel,
        cognitive_level: CognitiveLevel,
    ) -> Self {
        Self {
            id: id.into(),
            concept_tag: concept_tag.into(),
            structural_level,
            cognitive_level,
            difficulty: "standard".to_string(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = difficulty.into();
        self
    }
}

/// Instructional aid that can be attached to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaffoldingAid {
    VisualSupport,
    NumberLine,
    ConcreteObjects,
    WorkedExample,
}

impl ScaffoldingAid {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VisualSupport => "visual_support",
            Self::NumberLine => "number_line",
            Self::ConcreteObjects => "concrete_objects",
            Self::WorkedExample => "worked_example",
        }
    }
}

/// One answer submission. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: String,
    pub learner_id: String,
    pub session_id: String,
    pub item_id: String,
    pub concept_tag: String,
    pub answer: String,
    pub is_correct: bool,
    pub time_spent_ms: u64,
    pub hints_used: u32,
    #[serde(default)]
    pub scaffolding_used: BTreeSet<ScaffoldingAid>,
    pub structural_level: StructuralLevel,
    pub cognitive_level: CognitiveLevel,
    pub submitted_at: DateTime<Utc>,
}

impl Attempt {
    /// Builds an attempt for `item`, copying its concept tag and levels.
    pub fn new(
        learner_id: impl Into<String>,
        session_id: impl Into<String>,
        item: &Item,
        answer: impl Into<String>,
        is_correct: bool,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            learner_id: learner_id.into(),
            session_id: session_id.into(),
            item_id: item.id.clone(),
            concept_tag: item.concept_tag.clone(),
            answer: answer.into(),
            is_correct,
            time_spent_ms: 0,
            hints_used: 0,
            scaffolding_used: BTreeSet::new(),
            structural_level: item.structural_level,
            cognitive_level: item.cognitive_level,
            submitted_at,
        }
    }

    pub fn with_timing(mut self, time_spent_ms: u64, hints_used: u32) -> Self {
        self.time_spent_ms = time_spent_ms;
        self.hints_used = hints_used;
        self
    }

    pub fn with_aid(mut self, aid: ScaffoldingAid) -> Self {
        self.scaffolding_used.insert(aid);
        self
    }

    pub fn used_aid(&self, aid: ScaffoldingAid) -> bool {
        self.scaffolding_used.contains(&aid)
    }
}

/// Per-concept mastery inside a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptMastery {
    pub structural_level: StructuralLevel,
    pub cognitive_level: CognitiveLevel,
    /// Recent success rate, in [0, 1].
    pub confidence: f64,
    pub last_assessment: DateTime<Utc>,
    pub total_attempts: u32,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaffoldingPreferences {
    pub visual_learner: f64,
    pub concrete_materials: f64,
    pub worked_examples: f64,
    pub pace: f64,
    pub abstraction_aversion: f64,
}

impl Default for ScaffoldingPreferences {
    fn default() -> Self {
        Self {
            visual_learner: 0.5,
            concrete_materials: 0.5,
            worked_examples: 0.5,
            pace: 0.5,
            abstraction_aversion: 0.5,
        }
    }
}

impl ScaffoldingPreferences {
    /// Moves a weight by `delta`, keeping it inside [0, 1].
    pub fn nudge(weight: f64, delta: f64) -> f64 {
        (weight + delta).clamp(0.0, 1.0)
    }
}

/// Tracked for display; not consumed by any engine decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetacognitionWeights {
    pub self_reflection: f64,
    pub strategy_awareness: f64,
    pub error_detection: f64,
}

impl Default for MetacognitionWeights {
    fn default() -> Self {
        Self {
            self_reflection: 0.5,
            strategy_awareness: 0.5,
            error_detection: 0.5,
        }
    }
}

/// Zone of proximal development over the structural scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zpd {
    pub independent_level: StructuralLevel,
    pub assisted_level: StructuralLevel,
    pub target_level: StructuralLevel,
}

impl Default for Zpd {
    fn default() -> Self {
        let base = StructuralLevel::default();
        Self {
            independent_level: base,
            assisted_level: base,
            target_level: base.next(),
        }
    }
}

impl Zpd {
    /// Recomputes the zone from every concept in the map. An empty map yields
    /// the default zone.
    pub fn from_concepts(concepts: &BTreeMap<String, ConceptMastery>) -> Self {
        let levels = concepts.values().map(|m| m.structural_level);
        let (Some(lowest), Some(highest)) = (levels.clone().min(), levels.max()) else {
            return Self::default();
        };
        Self {
            independent_level: lowest,
            assisted_level: highest,
            target_level: highest.next(),
        }
    }
}

/// Persisted learner state for one (learner, domain) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CognitiveProfile {
    pub learner_id: String,
    pub domain: String,
    /// Age band or other context label. Stored only.
    #[serde(default)]
    pub context_tag: Option<String>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub concepts: BTreeMap<String, ConceptMastery>,
    #[serde(default)]
    pub scaffolding: ScaffoldingPreferences,
    #[serde(default)]
    pub metacognition: MetacognitionWeights,
    #[serde(default)]
    pub zpd: Zpd,
}

impl CognitiveProfile {
    pub fn new(
        learner_id: impl Into<String>,
        domain: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            learner_id: learner_id.into(),
            domain: domain.into(),
            context_tag: None,
            last_updated: now,
            concepts: BTreeMap::new(),
            scaffolding: ScaffoldingPreferences::default(),
            metacognition: MetacognitionWeights::default(),
            zpd: Zpd::default(),
        }
    }

    pub fn concept(&self, tag: &str) -> Option<&ConceptMastery> {
        self.concepts.get(tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum PerformanceBand {
    Excelling,
    #[default]
    OnTrack,
    Struggling,
}

impl PerformanceBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excelling => "excelling",
            Self::OnTrack => "on_track",
            Self::Struggling => "struggling",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaffoldingFlags {
    pub visual_support: bool,
    pub number_line: bool,
    pub concrete_objects: bool,
    pub worked_example: bool,
}

impl ScaffoldingFlags {
    pub fn aids(&self) -> Vec<ScaffoldingAid> {
        [
            (self.visual_support, ScaffoldingAid::VisualSupport),
            (self.number_line, ScaffoldingAid::NumberLine),
            (self.concrete_objects, ScaffoldingAid::ConcreteObjects),
            (self.worked_example, ScaffoldingAid::WorkedExample),
        ]
        .into_iter()
        .filter_map(|(on, aid)| on.then_some(aid))
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakthroughResult {
    pub has_breakthrough: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_level: Option<StructuralLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_level: Option<StructuralLevel>,
}

impl BreakthroughResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn detected(from: StructuralLevel, to: StructuralLevel) -> Self {
        Self {
            has_breakthrough: true,
            from_level: Some(from),
            to_level: Some(to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mastery(level: StructuralLevel) -> ConceptMastery {
        ConceptMastery {
            structural_level: level,
            cognitive_level: CognitiveLevel::Recall,
            confidence: 1.0,
            last_assessment: Utc::now(),
            total_attempts: 3,
            success_rate: 1.0,
        }
    }

    #[test]
    fn aid_names_match_wire_names() {
        for aid in [
            ScaffoldingAid::VisualSupport,
            ScaffoldingAid::NumberLine,
            ScaffoldingAid::ConcreteObjects,
            ScaffoldingAid::WorkedExample,
        ] {
            let wire = serde_json::to_string(&aid).unwrap();
            assert_eq!(wire.trim_matches('"'), aid.as_str());
        }
    }

    #[test]
    fn zpd_spans_lowest_to_highest_concept() {
        let mut concepts = BTreeMap::new();
        concepts.insert("fractions".to_string(), mastery(StructuralLevel::Relational));
        concepts.insert("decimals".to_string(), mastery(StructuralLevel::Unistructural));

        let zpd = Zpd::from_concepts(&concepts);
        assert_eq!(zpd.independent_level, StructuralLevel::Unistructural);
        assert_eq!(zpd.assisted_level, StructuralLevel::Relational);
        assert_eq!(zpd.target_level, StructuralLevel::ExtendedAbstract);
    }

    #[test]
    fn zpd_target_clamps_at_ceiling() {
        let mut concepts = BTreeMap::new();
        concepts.insert("a".to_string(), mastery(StructuralLevel::ExtendedAbstract));
        let zpd = Zpd::from_concepts(&concepts);
        assert_eq!(zpd.target_level, StructuralLevel::ExtendedAbstract);
    }

    #[test]
    fn empty_concepts_give_default_zone() {
        let zpd = Zpd::from_concepts(&BTreeMap::new());
        assert_eq!(zpd, Zpd::default());
        assert_eq!(zpd.target_level, zpd.assisted_level.next());
    }

    #[test]
    fn attempt_copies_item_levels() {
        let item = Item::new("q1", "fractions", StructuralLevel::Relational, CognitiveLevel::Apply);
        let attempt = Attempt::new("learner", "s1", &item, "3/4", true, Utc::now())
            .with_timing(4200, 1)
            .with_aid(ScaffoldingAid::VisualSupport);

        assert_eq!(attempt.concept_tag, "fractions");
        assert_eq!(attempt.structural_level, StructuralLevel::Relational);
        assert_eq!(attempt.cognitive_level, CognitiveLevel::Apply);
        assert!(attempt.used_aid(ScaffoldingAid::VisualSupport));
        assert!(!attempt.used_aid(ScaffoldingAid::ConcreteObjects));
        assert!(!attempt.id.is_empty());
    }

    #[test]
    fn profile_serializes_camel_case() {
        let profile = CognitiveProfile::new("learner", "math", Utc::now());
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("learnerId").is_some());
        assert_eq!(json["scaffolding"]["visualLearner"], 0.5);

        let back: CognitiveProfile = serde_json::from_value(json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn flags_list_active_aids() {
        let flags = ScaffoldingFlags {
            visual_support: true,
            worked_example: true,
            ..Default::default()
        };
        assert_eq!(
            flags.aids(),
            vec![ScaffoldingAid::VisualSupport, ScaffoldingAid::WorkedExample]
        );
    }
}
