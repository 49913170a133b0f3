//! Top-N ranking of classifier scores.

use crate::catalog::{Condition, CONDITION_COUNT};
use crate::classifier::ClassScores;
use crate::constants::RANKING_LEN;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A condition with its display percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCondition {
    pub condition: Condition,
    /// Share of the total score, 0..=100.
    pub percent: u8,
}

impl RankedCondition {
    pub fn label(&self) -> &'static str {
        self.condition.label()
    }
}

/// Rounds half up and clamps to a percentage.
pub fn round_percent(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value + 0.5).floor().clamp(0.0, 100.0) as u8
}

/// Ranks all conditions by score, descending.
///
/// Ties keep catalog order. Percentages are `score / total * 100` rounded half up; when the
/// total is not positive every condition gets an equal share of `100 / CONDITION_COUNT`
/// (rounded the same way). Rounded percentages are not adjusted to sum to 100.
pub fn rank_all(scores: &ClassScores) -> Vec<RankedCondition> {
    let values = scores.as_array();
    let mut order: Vec<usize> = (0..CONDITION_COUNT).collect();
    // `sort_by` is stable, so equal scores stay in catalog order.
    order.sort_by(|a, b| {
        values[*b]
            .partial_cmp(&values[*a])
            .unwrap_or(Ordering::Equal)
    });

    let total = scores.total();
    order
        .into_iter()
        .map(|i| {
            let share = if total > 0.0 {
                values[i] / total
            } else {
                1.0 / CONDITION_COUNT as f64
            };
            RankedCondition {
                condition: Condition::ALL[i],
                percent: round_percent(share * 100.0),
            }
        })
        .collect()
}

/// The top [`RANKING_LEN`] conditions of [`rank_all`].
pub fn rank(scores: &ClassScores) -> Vec<RankedCondition> {
    let mut ranking = rank_all(scores);
    ranking.truncate(RANKING_LEN);
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn returns_top_three_descending() {
        let scores = ClassScores::new([0.1, 0.4, 0.05, 0.2, 0.05, 0.1, 0.05, 0.05]);
        let ranking = rank(&scores);

        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking[0].condition, Condition::Gastroenteritis);
        assert_eq!(ranking[0].percent, 40);
        assert_eq!(ranking[1].condition, Condition::CovidSimilar);
        assert_eq!(ranking[1].percent, 20);
        // 0.1 tie between InfeccionRespiratoria (0) and HipertensionDescontrolada (5).
        assert_eq!(ranking[2].condition, Condition::InfeccionRespiratoria);
        assert_eq!(ranking[2].percent, 10);
    }

    #[test]
    fn normalises_unnormalised_scores() {
        let scores = ClassScores::new([3.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let ranking = rank(&scores);
        assert_eq!(ranking[0].percent, 75);
        assert_eq!(ranking[1].percent, 25);
        assert_eq!(ranking[2].percent, 0);
        assert_eq!(ranking[2].condition, Condition::MigranaTensional);
    }

    #[test]
    fn all_zero_scores_share_equally() {
        let scores = ClassScores::new([0.0; CONDITION_COUNT]);
        let ranking = rank_all(&scores);

        assert_eq!(ranking.len(), CONDITION_COUNT);
        for (i, entry) in ranking.iter().enumerate() {
            // 100 / 8 = 12.5, rounded half up.
            assert_eq!(entry.percent, 13);
            assert_eq!(entry.condition, Condition::ALL[i]);
        }
        assert_eq!(rank(&scores).len(), 3);
    }

    #[test]
    fn negative_total_shares_equally() {
        let scores = ClassScores::new([-1.0, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let ranking = rank_all(&scores);

        let order: Vec<Condition> = ranking.iter().map(|r| r.condition).collect();
        let mut expected = Condition::ALL[1..].to_vec();
        expected.push(Condition::ALL[0]);
        assert_eq!(order, expected);
        assert!(ranking.iter().all(|r| r.percent == 13));
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_percent(12.5), 13);
        assert_eq!(round_percent(12.4999), 12);
        assert_eq!(round_percent(0.5), 1);
        assert_eq!(round_percent(99.6), 100);
        assert_eq!(round_percent(f64::NAN), 0);
    }

    #[test]
    fn percentages_may_not_sum_to_one_hundred() {
        let third = 1.0 / 3.0;
        let scores = ClassScores::new([third, third, third, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let sum: u32 = rank(&scores).iter().map(|r| u32::from(r.percent)).sum();
        assert_eq!(sum, 99);
    }

    proptest! {
        #[test]
        fn ranking_is_sorted_and_bounded(
            raw in prop::array::uniform8(0.0f64..1000.0),
            positive in 0usize..CONDITION_COUNT,
        ) {
            let mut values = raw;
            values[positive] += 1.0;
            let scores = ClassScores::new(values);
            let ranking = rank(&scores);

            prop_assert_eq!(ranking.len(), RANKING_LEN);
            for entry in &ranking {
                prop_assert!(entry.percent <= 100);
            }
            for pair in ranking.windows(2) {
                prop_assert!(scores.get(pair[0].condition) >= scores.get(pair[1].condition));
            }
        }
    }
}
