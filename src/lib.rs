//! # mastery-engine - adaptive mastery engine for practice sessions
//!
//! After every practice attempt the engine decides:
//!
//! - **Level Selector** - which structural/cognitive level to present next
//! - **Scaffolding Advisor** - which instructional aids to attach
//! - **Breakthrough Detector** - whether the learner just crossed a level
//! - **Profile Updater** - how the persisted learner profile changes
//! - **Review Scheduler** - when a missed or learned item comes back (SM-2)
//!
//! All operations are synchronous functions over plain records. Profiles and
//! schedules go in by reference and come back as new values; persistence
//! belongs to the host (see [`store`]).
//!
//! ```rust
//! use chrono::Utc;
//! use mastery_engine::{review_outcome, ReviewGrade, ScheduleParams};
//!
//! let params = ScheduleParams::default();
//! let first = review_outcome(None, ReviewGrade::Quality(5), Utc::now(), &params);
//! assert_eq!(first.interval_days, 1);
//! let second = review_outcome(Some(&first), ReviewGrade::Quality(4), Utc::now(), &params);
//! assert_eq!(second.interval_days, 6);
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod mastery;
pub mod review;
pub mod session;
pub mod store;
pub mod taxonomy;
pub mod types;

pub use config::{MasteryConfig, ScheduleParams};
pub use error::{ConfigError, StoreError};
pub use mastery::{MasteryEngine, ProfileKey};
pub use review::{
    due_items, review_outcome, MistakeRecord, RecallCard, ReviewGrade, ReviewSchedule, Reviewable,
};
pub use session::{PracticeSession, Recommendation, SessionSummary};
pub use taxonomy::{CognitiveLevel, StructuralLevel};
pub use types::*;
