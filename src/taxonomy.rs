//! Competence scales used to rank items and learner state.
//!
//! Both scales are totally ordered. Stepping past either end clamps to the
//! boundary level.

use serde::{Deserialize, Serialize};

/// Structural-complexity scale: how many aspects of a concept a learner
/// integrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum StructuralLevel {
    /// No relevant aspect handled.
    Prestructural,
    /// A single aspect.
    #[default]
    Unistructural,
    /// Several aspects, not yet linked.
    Multistructural,
    /// Aspects linked into a whole.
    Relational,
    /// The whole generalized to new situations.
    ExtendedAbstract,
}

impl StructuralLevel {
    pub const ALL: [StructuralLevel; 5] = [
        Self::Prestructural,
        Self::Unistructural,
        Self::Multistructural,
        Self::Relational,
        Self::ExtendedAbstract,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    pub fn next(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(&self) -> Self {
        Self::from_index(self.index().saturating_sub(1))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prestructural => "prestructural",
            Self::Unistructural => "unistructural",
            Self::Multistructural => "multistructural",
            Self::Relational => "relational",
            Self::ExtendedAbstract => "extendedabstract",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "prestructural" | "none" => Some(Self::Prestructural),
            "unistructural" | "singleaspect" => Some(Self::Unistructural),
            "multistructural" | "multipleunlinkedaspects" => Some(Self::Multistructural),
            "relational" | "linkedaspects" => Some(Self::Relational),
            "extendedabstract" | "generalized" => Some(Self::ExtendedAbstract),
            _ => None,
        }
    }
}

/// Cognitive-demand scale of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum CognitiveLevel {
    #[default]
    Recall,
    Comprehend,
    Apply,
    Analyze,
    Evaluate,
    Create,
}

impl CognitiveLevel {
    pub const ALL: [CognitiveLevel; 6] = [
        Self::Recall,
        Self::Comprehend,
        Self::Apply,
        Self::Analyze,
        Self::Evaluate,
        Self::Create,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    pub fn next(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(&self) -> Self {
        Self::from_index(self.index().saturating_sub(1))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recall => "recall",
            Self::Comprehend => "comprehend",
            Self::Apply => "apply",
            Self::Analyze => "analyze",
            Self::Evaluate => "evaluate",
            Self::Create => "create",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "recall" | "remember" => Some(Self::Recall),
            "comprehend" | "understand" => Some(Self::Comprehend),
            "apply" => Some(Self::Apply),
            "analyze" | "analyse" => Some(Self::Analyze),
            "evaluate" => Some(Self::Evaluate),
            "create" => Some(Self::Create),
            _ => None,
        }
    }
}
