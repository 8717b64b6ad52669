//! Adaptive mastery layer
//!
//! Contains:
//! - Performance Assessor - recent-window banding
//! - Level Selector - target levels and staged candidate filtering
//! - Scaffolding Advisor - instructional aids for the next item
//! - Breakthrough Detector - sustained structural-level increases
//! - Profile Updater - batch fold into the persisted learner profile
//! - MasteryEngine - unified entry point

pub mod assessor;
pub mod breakthrough;
pub mod profile;
pub mod scaffolding;
pub mod selector;

mod engine;

pub use assessor::{assess_performance, WindowStats};
pub use breakthrough::detect_breakthrough;
pub use engine::MasteryEngine;
pub use profile::{update_profile, ProfileKey};
pub use scaffolding::{advise_scaffolding, flags_for_band};
pub use selector::{
    cognitive_level_for_draw, draw_cognitive_level, filter_candidates, infer_structural_level,
    select_next, RelaxStage,
};
