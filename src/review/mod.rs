//! Review scheduling for recall cards and recorded mistakes.

pub mod items;
pub mod schedule;

pub use items::{due_items, MistakeRecord, RecallCard, Reviewable};
pub use schedule::{review_outcome, sm2_ease_delta, ReviewGrade, ReviewSchedule, ScheduleState};
