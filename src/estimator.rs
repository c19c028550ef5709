//! Vocabulary size estimation from aggregate quiz performance.
//!
//! The estimate starts from an age-conditioned baseline and scales it by
//! accuracy, weighted by how hard the questions were. The interval narrows
//! as more questions are answered. This is a heuristic, not a calibrated
//! psychometric model.

use serde::Serialize;
use tracing::debug;

/// Lower bound of any estimate, in words
pub const MIN_VOCABULARY: f64 = 300.0;
/// Interval bounds are reported to this granularity
pub const ROUNDING_STEP: f64 = 100.0;
/// Number of questions at which the baseline width is used unscaled
pub const REFERENCE_QUESTIONS: f64 = 20.0;
/// Difficulty at which the difficulty factor is neutral
pub const REFERENCE_DIFFICULTY: f64 = 3.0;

/// Prior belief about vocabulary size before looking at answers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgeBaseline {
    pub mean: f64,
    pub width: f64,
}

impl AgeBaseline {
    const fn new(mean: f64, width: f64) -> Self {
        Self { mean, width }
    }

    /// Step function over age bands. A missing or zero age uses the general prior.
    pub fn for_age(age: Option<u32>) -> Self {
        match age {
            None | Some(0) => Self::new(20_000.0, 12_000.0),
            Some(a) if a <= 7 => Self::new(2_000.0, 2_000.0),
            Some(a) if a <= 12 => Self::new(8_000.0, 7_000.0),
            Some(a) if a <= 17 => Self::new(15_000.0, 12_000.0),
            Some(a) if a <= 25 => Self::new(25_000.0, 12_000.0),
            Some(a) if a <= 40 => Self::new(27_000.0, 12_000.0),
            Some(_) => Self::new(26_000.0, 12_000.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EstimateResult {
    pub mean: i64,
    pub lo: i64,
    pub hi: i64,
    /// Percentage of correct answers, 0..=100
    pub accuracy: i64,
}

impl EstimateResult {
    pub fn interval_width(&self) -> i64 {
        self.hi - self.lo
    }
}

/// Round `n` to the nearest multiple of `step`
pub fn round_to_nearest(n: f64, step: f64) -> f64 {
    (n / step).round() * step
}

/// Estimate vocabulary size.
///
/// Negative counts are treated as zero, `correct` is capped at `total`, and
/// a non-finite `avg_difficulty` counts as the reference difficulty.
pub fn estimate(total: i64, correct: i64, avg_difficulty: f64, age: Option<u32>) -> EstimateResult {
    let total = total.max(0);
    let correct = correct.clamp(0, total);
    let avg_difficulty = if avg_difficulty.is_finite() {
        avg_difficulty
    } else {
        REFERENCE_DIFFICULTY
    };

    let baseline = AgeBaseline::for_age(age);
    let accuracy = if total > 0 {
        correct as f64 / total as f64
    } else {
        0.0
    };

    let difficulty_factor = 0.9 + 0.05 * (avg_difficulty - REFERENCE_DIFFICULTY);
    let weighted = (accuracy * difficulty_factor).clamp(0.0, 1.0);
    let width = baseline.width * (0.9 / (total as f64 / REFERENCE_QUESTIONS).max(1.0).sqrt());
    let mean = baseline.mean * (0.7 + 0.6 * weighted);

    let lo = round_to_nearest((mean - width / 2.0).max(MIN_VOCABULARY), ROUNDING_STEP);
    let hi = round_to_nearest(mean + width / 2.0, ROUNDING_STEP);

    debug!(
        total,
        correct,
        avg_difficulty,
        ?age,
        weighted,
        width,
        mean,
        "estimated vocabulary"
    );

    EstimateResult {
        mean: mean.round() as i64,
        lo: lo as i64,
        hi: hi as i64,
        accuracy: (accuracy * 100.0).round() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_scenario() {
        let est = estimate(20, 15, 3.0, None);
        assert_eq!(
            est,
            EstimateResult {
                mean: 22_100,
                lo: 16_700,
                hi: 27_500,
                accuracy: 75,
            }
        );
    }

    #[test]
    fn test_no_questions() {
        let est = estimate(0, 0, 3.0, None);
        assert_eq!(est.accuracy, 0);
        assert!(est.lo >= 300);
        // zero accuracy maps to 0.7 of the baseline mean
        assert_eq!(est.mean, 14_000);
    }

    #[test]
    fn test_perfect_beats_zero_for_child() {
        let perfect = estimate(20, 20, 3.0, Some(10));
        let zero = estimate(20, 0, 3.0, Some(10));
        assert!(perfect.mean > zero.mean);
        assert_eq!(perfect.accuracy, 100);
        assert_eq!(zero.accuracy, 0);
    }

    #[test]
    fn test_interval_narrows_with_more_questions() {
        let short = estimate(20, 10, 3.0, None);
        let long = estimate(100, 50, 3.0, None);
        assert_eq!(short.accuracy, long.accuracy);
        assert!(short.interval_width() > long.interval_width());
    }

    #[test]
    fn test_few_questions_use_unscaled_width() {
        // below the reference count the width is not widened further
        assert_eq!(
            estimate(5, 5, 3.0, None).interval_width(),
            estimate(20, 20, 3.0, None).interval_width()
        );
    }

    #[test]
    fn test_lower_bound_floor() {
        for age in [None, Some(3), Some(10), Some(16), Some(30), Some(80)] {
            for total in [0, 1, 20, 100] {
                for correct in [0, total / 2, total] {
                    for avg in [-10.0, 1.0, 3.0, 5.0] {
                        let est = estimate(total, correct, avg, age);
                        assert!(est.lo >= 300, "{age:?} {total} {correct} {avg}");
                        assert!(est.hi >= est.lo);
                    }
                }
            }
        }
    }

    #[test]
    fn test_youngest_band_zero_accuracy() {
        let est = estimate(20, 0, 1.0, Some(5));
        assert_eq!(est.mean, 1_400);
        assert_eq!(est.lo, 500);
        assert_eq!(est.hi, 2_300);
    }

    #[test]
    fn test_harder_questions_raise_estimate() {
        let easy = estimate(20, 15, 1.5, None);
        let hard = estimate(20, 15, 4.5, None);
        assert!(hard.mean > easy.mean);
    }

    #[test]
    fn test_weighted_performance_saturates() {
        // accuracy 1.0 at difficulty 5 gives factor 1.0; beyond that it is clamped
        let at_five = estimate(20, 20, 5.0, None);
        let beyond = estimate(20, 20, 9.0, None);
        assert_eq!(at_five.mean, 26_000);
        assert_eq!(beyond.mean, 26_000);
    }

    #[test]
    fn test_negative_and_inconsistent_inputs_are_clamped() {
        assert_eq!(estimate(-5, -1, 3.0, None), estimate(0, 0, 3.0, None));
        assert_eq!(estimate(20, 30, 3.0, None), estimate(20, 20, 3.0, None));
        assert_eq!(estimate(20, 10, f64::NAN, None), estimate(20, 10, 3.0, None));
    }

    #[test]
    fn test_zero_age_uses_general_prior() {
        assert_eq!(AgeBaseline::for_age(Some(0)), AgeBaseline::for_age(None));
    }

    #[test]
    fn test_age_bands() {
        let cases = [
            (Some(5), 2_000.0, 2_000.0),
            (Some(7), 2_000.0, 2_000.0),
            (Some(8), 8_000.0, 7_000.0),
            (Some(12), 8_000.0, 7_000.0),
            (Some(17), 15_000.0, 12_000.0),
            (Some(25), 25_000.0, 12_000.0),
            (Some(40), 27_000.0, 12_000.0),
            (Some(41), 26_000.0, 12_000.0),
            (None, 20_000.0, 12_000.0),
        ];
        for (age, mean, width) in cases {
            assert_eq!(AgeBaseline::for_age(age), AgeBaseline { mean, width }, "{age:?}");
        }
    }

    #[test]
    fn test_round_to_nearest() {
        assert_eq!(round_to_nearest(16_749.0, 100.0), 16_700.0);
        assert_eq!(round_to_nearest(16_750.0, 100.0), 16_800.0);
        assert_eq!(round_to_nearest(49.0, 100.0), 0.0);
    }
}
