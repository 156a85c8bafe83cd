//! Majority-vote status engine.
//!
//! # Responsibility
//! - Derive the persisted global status from a sub-competence sequence.
//! - Derive the display-side validation progress summary.
//!
//! # Invariants
//! - Both functions are total: any slice, including an empty one, yields
//!   a result and no side effects.
//! - `derive_global_status` uses the NON-STRICT rule (`v >= t/2`): a tie
//!   counts as validated.
//! - `ValidationProgress::is_majority` uses the STRICT rule (`v > t/2`).
//!   The two rules diverge on exact ties and are kept as separate
//!   computations on purpose; unifying them changes observable behavior.

use crate::model::competence::{GlobalStatus, SubCompetence};

/// Computes the global status of a sub-competence sequence.
///
/// Empty input is `NotValidated`. Otherwise the record is `Validated`
/// when at least half of the sub-competences are validated. The
/// comparison is done as `v * 2 >= t` to stay in integer arithmetic.
pub fn derive_global_status(sub_competences: &[SubCompetence]) -> GlobalStatus {
    if sub_competences.is_empty() {
        return GlobalStatus::NotValidated;
    }
    let validated = count_validated(sub_competences);
    if validated * 2 >= sub_competences.len() {
        GlobalStatus::Validated
    } else {
        GlobalStatus::NotValidated
    }
}

/// Display-side progress summary for one competence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationProgress {
    pub validated_count: usize,
    pub total_count: usize,
    /// `round(100 * validated / total)`, `0` for an empty sequence.
    pub percentage: u8,
    /// Strict majority: more than half validated. Diverges from
    /// [`derive_global_status`] on exact ties.
    pub is_majority: bool,
}

/// Computes the auxiliary progress view used by dashboards.
pub fn derive_progress(sub_competences: &[SubCompetence]) -> ValidationProgress {
    let total = sub_competences.len();
    let validated = count_validated(sub_competences);
    let percentage = if total == 0 {
        0
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rounded = (100.0 * validated as f64 / total as f64).round() as u8;
        rounded
    };
    ValidationProgress {
        validated_count: validated,
        total_count: total,
        percentage,
        is_majority: validated * 2 > total,
    }
}

fn count_validated(sub_competences: &[SubCompetence]) -> usize {
    sub_competences.iter().filter(|sc| sc.validated).count()
}

#[cfg(test)]
mod tests {
    use super::{derive_global_status, derive_progress};
    use crate::model::competence::{GlobalStatus, SubCompetence};

    fn subs(flags: &[bool]) -> Vec<SubCompetence> {
        flags
            .iter()
            .enumerate()
            .map(|(i, &validated)| SubCompetence::new(format!("s{i}"), validated))
            .collect()
    }

    #[test]
    fn empty_sequence_is_not_validated() {
        assert_eq!(derive_global_status(&[]), GlobalStatus::NotValidated);
        let progress = derive_progress(&[]);
        assert_eq!(progress.total_count, 0);
        assert_eq!(progress.percentage, 0);
        assert!(!progress.is_majority);
    }

    #[test]
    fn half_or_more_validated_is_validated() {
        assert_eq!(
            derive_global_status(&subs(&[true, false])),
            GlobalStatus::Validated
        );
        assert_eq!(
            derive_global_status(&subs(&[true, true, false])),
            GlobalStatus::Validated
        );
        assert_eq!(
            derive_global_status(&subs(&[true, false, false])),
            GlobalStatus::NotValidated
        );
    }

    #[test]
    fn exact_tie_resolves_to_validated() {
        // 2 of 4: the persisted status rule is non-strict.
        assert_eq!(
            derive_global_status(&subs(&[true, true, false, false])),
            GlobalStatus::Validated
        );
    }

    #[test]
    fn tie_is_validated_but_not_a_strict_majority() {
        // Same input, both rules evaluated: they must diverge on ties.
        let input = subs(&[true, true, false, false]);
        assert_eq!(derive_global_status(&input), GlobalStatus::Validated);
        assert!(!derive_progress(&input).is_majority);
    }

    #[test]
    fn strict_majority_holds_above_half() {
        let input = subs(&[true, true, true, false]);
        assert!(derive_progress(&input).is_majority);
    }

    #[test]
    fn progress_counts_and_percentage() {
        let progress = derive_progress(&subs(&[true, false, false]));
        assert_eq!(progress.validated_count, 1);
        assert_eq!(progress.total_count, 3);
        assert_eq!(progress.percentage, 33);

        let progress = derive_progress(&subs(&[true, true, false]));
        assert_eq!(progress.percentage, 67);

        let progress = derive_progress(&subs(&[true, true]));
        assert_eq!(progress.percentage, 100);
    }

    #[test]
    fn all_false_is_not_validated() {
        let input = subs(&[false, false]);
        assert_eq!(derive_global_status(&input), GlobalStatus::NotValidated);
        assert_eq!(derive_progress(&input).validated_count, 0);
    }
}
