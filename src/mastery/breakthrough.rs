use crate::config::BreakthroughParams;
use crate::types::{Attempt, BreakthroughResult};

/// Looks for a sustained structural-level increase at the end of `attempts`.
///
/// The last attempt of the window must sit strictly above the first, and the
/// final `confirm` attempts must all be correct at that new level.
pub fn detect_breakthrough(attempts: &[Attempt], params: &BreakthroughParams) -> BreakthroughResult {
    if params.window == 0 || attempts.len() < params.window {
        return BreakthroughResult::none();
    }
    let window = &attempts[attempts.len() - params.window..];
    let (Some(first), Some(last)) = (window.first(), window.last()) else {
        return BreakthroughResult::none();
    };

    let from = first.structural_level;
    let to = last.structural_level;
    if to <= from {
        return BreakthroughResult::none();
    }

    let confirm = params.confirm.min(window.len());
    let confirmed = window[window.len() - confirm..]
        .iter()
        .all(|a| a.structural_level == to && a.is_correct);
    if !confirmed {
        return BreakthroughResult::none();
    }

    tracing::info!(
        learner = %last.learner_id,
        concept = %last.concept_tag,
        from = from.as_str(),
        to = to.as_str(),
        "structural breakthrough detected"
    );
    BreakthroughResult::detected(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{CognitiveLevel, StructuralLevel};
    use crate::types::Item;
    use chrono::Utc;

    fn at(level: StructuralLevel, correct: bool) -> Attempt {
        let item = Item::new("q", "fractions", level, CognitiveLevel::Apply);
        Attempt::new("l", "s", &item, "a", correct, Utc::now())
    }

    use StructuralLevel::{Multistructural as Multi, Relational as Rel, Unistructural as Uni};

    #[test]
    fn fewer_than_window_is_never_a_breakthrough() {
        let params = BreakthroughParams::default();
        let attempts = vec![at(Uni, true), at(Multi, true), at(Multi, true), at(Multi, true)];
        assert!(!detect_breakthrough(&attempts, &params).has_breakthrough);
    }

    #[test]
    fn three_correct_at_new_level_confirms() {
        let params = BreakthroughParams::default();
        let attempts = vec![
            at(Uni, true),
            at(Uni, false),
            at(Multi, true),
            at(Multi, true),
            at(Multi, true),
        ];
        let result = detect_breakthrough(&attempts, &params);
        assert_eq!(result, BreakthroughResult::detected(Uni, Multi));
    }

    #[test]
    fn one_miss_in_confirmation_blocks() {
        let params = BreakthroughParams::default();
        let attempts = vec![
            at(Uni, true),
            at(Uni, true),
            at(Multi, true),
            at(Multi, false),
            at(Multi, true),
        ];
        assert!(!detect_breakthrough(&attempts, &params).has_breakthrough);
    }

    #[test]
    fn mixed_levels_in_confirmation_block() {
        let params = BreakthroughParams::default();
        let attempts = vec![at(Uni, true), at(Uni, true), at(Multi, true), at(Rel, true), at(Rel, true)];
        assert!(!detect_breakthrough(&attempts, &params).has_breakthrough);
    }

    #[test]
    fn flat_or_falling_level_is_not_a_breakthrough() {
        let params = BreakthroughParams::default();
        let flat = vec![at(Multi, true); 5];
        assert!(!detect_breakthrough(&flat, &params).has_breakthrough);
        let falling = vec![at(Rel, true), at(Rel, true), at(Multi, true), at(Multi, true), at(Multi, true)];
        assert!(!detect_breakthrough(&falling, &params).has_breakthrough);
    }

    #[test]
    fn only_last_window_is_inspected() {
        let params = BreakthroughParams::default();
        let mut attempts = vec![at(Uni, true); 3];
        attempts.extend(vec![at(Multi, true); 5]);
        assert!(!detect_breakthrough(&attempts, &params).has_breakthrough);
    }
}
