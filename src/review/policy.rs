//! The verification rule applied to mentor submissions.

use crate::projects::models::ReviewChecklist;

/// Minimum number of checklist items that must pass.
pub const MIN_CHECKS_PASSED: usize = 3;

/// Minimum mentor rating.
pub const MIN_RATING: u8 = 3;

/// Valid rating range, inclusive.
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Fixed pass/fail rule for a review.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerificationPolicy;

impl VerificationPolicy {
    /// A review verifies the project when at least [`MIN_CHECKS_PASSED`]
    /// checklist items hold and the rating is at least [`MIN_RATING`].
    pub fn evaluate(&self, checklist: &ReviewChecklist, rating: u8) -> bool {
        checklist.passed_count() >= MIN_CHECKS_PASSED && rating >= MIN_RATING
    }

    pub fn is_valid_rating(&self, rating: u8) -> bool {
        RATING_RANGE.contains(&rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checklist_with(passed: usize) -> ReviewChecklist {
        let flags: Vec<bool> = (0..4).map(|i| i < passed).collect();
        ReviewChecklist::new(flags[0], flags[1], flags[2], flags[3])
    }

    #[test]
    fn test_truth_table() {
        let policy = VerificationPolicy;
        let cases = [
            (4, 5, true),
            (3, 3, true),
            (2, 5, false),
            (3, 2, false),
            (0, 1, false),
        ];
        for (passed, rating, expected) in cases {
            assert_eq!(
                policy.evaluate(&checklist_with(passed), rating),
                expected,
                "({}, {})",
                passed,
                rating
            );
        }
    }

    #[test]
    fn test_which_items_pass_does_not_matter() {
        let policy = VerificationPolicy;
        assert!(policy.evaluate(&ReviewChecklist::new(false, true, true, true), 4));
        assert!(policy.evaluate(&ReviewChecklist::new(true, false, true, true), 4));
    }

    #[test]
    fn test_rating_range() {
        let policy = VerificationPolicy;
        assert!(!policy.is_valid_rating(0));
        assert!(policy.is_valid_rating(1));
        assert!(policy.is_valid_rating(5));
        assert!(!policy.is_valid_rating(6));
    }
}
