//! Adaptive calorie target recalculation
//!
//! Compares the weight change predicted from average net calories
//! (7700 kcal per kg) with the change actually observed, and nudges the
//! calorie target by a fixed step when the two disagree.
//!
//! The flow is a single pass: insufficient data ends immediately; otherwise
//! the observation is classified as an undershoot, an overshoot, or on target
//! and turned into a recommendation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Cumulative surplus/deficit taken to equal one kilogram of body mass
pub const KCAL_PER_KG: f64 = 7700.0;
/// Fewest distinct days of net-calorie data the engine will use
pub const MIN_NET_DAYS: usize = 7;
/// Fewest weight samples the engine will use
pub const MIN_WEIGHT_SAMPLES: usize = 2;
/// Default lookback window in days
pub const DEFAULT_LOOKBACK_DAYS: u32 = 14;
/// Predictions at or below this magnitude are treated as zero
pub const PREDICTION_EPSILON_KG: f64 = 0.01;
/// Observed/predicted ratio below which the change is an undershoot
pub const UNDERSHOOT_RATIO: f64 = 0.8;
/// Observed/predicted ratio above which the change is an overshoot
pub const OVERSHOOT_RATIO: f64 = 1.25;
/// Target step applied after an undershoot
pub const UNDERSHOOT_STEP_KCAL: f64 = 150.0;
/// Target step applied after an overshoot
pub const OVERSHOOT_STEP_KCAL: f64 = 100.0;

/// One day's summed net calories
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyNetSample {
    pub date: NaiveDate,
    pub net_calories: f64,
}

/// One body-weight reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSample {
    pub date: NaiveDate,
    pub weight_kg: f64,
}

/// Why the engine recommended what it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecalcReason {
    InsufficientData,
    PredictedNearZero,
    Undershoot,
    Overshoot,
    WithinRange,
}

impl RecalcReason {
    /// Human-readable justification
    pub fn message(&self) -> &'static str {
        match self {
            RecalcReason::InsufficientData => "not enough data",
            RecalcReason::PredictedNearZero => "predicted near zero — no change",
            RecalcReason::Undershoot => {
                "observed change smaller than predicted → reduce deficit magnitude"
            }
            RecalcReason::Overshoot => {
                "observed change larger than predicted → increase deficit magnitude slightly"
            }
            RecalcReason::WithinRange => "within expected range — no change",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecalcReason::InsufficientData => "insufficient_data",
            RecalcReason::PredictedNearZero => "predicted_near_zero",
            RecalcReason::Undershoot => "undershoot",
            RecalcReason::Overshoot => "overshoot",
            RecalcReason::WithinRange => "within_range",
        }
    }
}

impl std::fmt::Display for RecalcReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of one recalculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecalcResult {
    pub recommended_calories: i64,
    pub reason: RecalcReason,
    pub predicted_kg: f64,
    pub actual_kg: f64,
    pub avg_daily_net: f64,
    pub sufficient_data: bool,
}

/// Signed unit steps for each kind of adjustment.
///
/// Each field is -1, 0 or +1 and is multiplied by the matching step size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustmentDirection {
    /// Moves the target toward maintenance
    pub reduce_deficit: f64,
    /// Moves the target further from maintenance
    pub increase_deficit: f64,
}

/// Direction policy: reducing the deficit moves opposite to the sign of the
/// average net intake, increasing it moves with that sign.
pub fn adjustment_direction(avg_daily_net: f64) -> AdjustmentDirection {
    let sign = if avg_daily_net > 0.0 {
        1.0
    } else if avg_daily_net < 0.0 {
        -1.0
    } else {
        0.0
    };
    AdjustmentDirection {
        reduce_deficit: -sign,
        increase_deficit: sign,
    }
}

/// Recalculate the calorie target.
///
/// `baseline_target` of zero (or below) means "no stored target"; the average
/// net intake is used as the baseline instead.
pub fn recalculate(
    baseline_target: f64,
    net_samples: &[DailyNetSample],
    weight_samples: &[WeightSample],
) -> RecalcResult {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for sample in net_samples {
        *by_day.entry(sample.date).or_insert(0.0) += sample.net_calories;
    }

    if by_day.len() < MIN_NET_DAYS || weight_samples.len() < MIN_WEIGHT_SAMPLES {
        tracing::debug!(
            net_days = by_day.len(),
            weights = weight_samples.len(),
            "Not enough data for recalculation"
        );
        return RecalcResult {
            recommended_calories: round_kcal(baseline_target.max(0.0)),
            reason: RecalcReason::InsufficientData,
            predicted_kg: 0.0,
            actual_kg: 0.0,
            avg_daily_net: 0.0,
            sufficient_data: false,
        };
    }

    let avg_daily_net = by_day.values().sum::<f64>() / by_day.len() as f64;

    let mut weights = weight_samples.to_vec();
    weights.sort_by_key(|w| w.date);
    let (first, last) = (weights[0], weights[weights.len() - 1]);

    let period_days = (last.date - first.date).num_days().max(1);
    let predicted_kg = avg_daily_net * period_days as f64 / KCAL_PER_KG;
    let actual_kg = last.weight_kg - first.weight_kg;

    let (reason, adjustment) = decide(avg_daily_net, predicted_kg, actual_kg);

    let baseline = if baseline_target > 0.0 {
        baseline_target
    } else {
        avg_daily_net
    };

    tracing::debug!(
        reason = reason.as_str(),
        avg_daily_net,
        period_days,
        predicted_kg,
        actual_kg,
        adjustment,
        "Recalculated calorie target"
    );

    RecalcResult {
        recommended_calories: round_kcal(baseline + adjustment),
        reason,
        predicted_kg,
        actual_kg,
        avg_daily_net,
        sufficient_data: true,
    }
}

/// Classify observed vs predicted change and pick the adjustment
fn decide(avg_daily_net: f64, predicted_kg: f64, actual_kg: f64) -> (RecalcReason, f64) {
    if predicted_kg.abs() <= PREDICTION_EPSILON_KG {
        return (RecalcReason::PredictedNearZero, 0.0);
    }

    let direction = adjustment_direction(avg_daily_net);
    let predicted = predicted_kg.abs();
    let actual = actual_kg.abs();

    if actual < predicted * UNDERSHOOT_RATIO {
        (
            RecalcReason::Undershoot,
            direction.reduce_deficit * UNDERSHOOT_STEP_KCAL,
        )
    } else if actual > predicted * OVERSHOOT_RATIO {
        (
            RecalcReason::Overshoot,
            direction.increase_deficit * OVERSHOOT_STEP_KCAL,
        )
    } else {
        (RecalcReason::WithinRange, 0.0)
    }
}

/// Round half up to whole calories, so -400.5 becomes -400
fn round_kcal(kcal: f64) -> i64 {
    if kcal.is_finite() {
        (kcal + 0.5).floor() as i64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap() + chrono::Duration::days(offset)
    }

    fn net_days(count: i64, net: f64) -> Vec<DailyNetSample> {
        (0..count)
            .map(|i| DailyNetSample {
                date: day(i),
                net_calories: net,
            })
            .collect()
    }

    fn weights(start_kg: f64, end_kg: f64, period_days: i64) -> Vec<WeightSample> {
        vec![
            WeightSample { date: day(0), weight_kg: start_kg },
            WeightSample { date: day(period_days), weight_kg: end_kg },
        ]
    }

    #[test]
    fn test_direction_policy() {
        let deficit = adjustment_direction(-500.0);
        assert_eq!(deficit.reduce_deficit, 1.0);
        assert_eq!(deficit.increase_deficit, -1.0);

        let surplus = adjustment_direction(300.0);
        assert_eq!(surplus.reduce_deficit, -1.0);
        assert_eq!(surplus.increase_deficit, 1.0);

        let zero = adjustment_direction(0.0);
        assert_eq!(zero.reduce_deficit, 0.0);
        assert_eq!(zero.increase_deficit, 0.0);
    }

    #[test]
    fn test_insufficient_net_days() {
        let result = recalculate(2000.0, &net_days(6, -500.0), &weights(80.0, 79.0, 14));
        assert!(!result.sufficient_data);
        assert_eq!(result.reason, RecalcReason::InsufficientData);
        assert_eq!(result.recommended_calories, 2000);
    }

    #[test]
    fn test_duplicate_dates_count_once() {
        let mut samples = net_days(6, -250.0);
        samples.extend(net_days(6, -250.0));
        let result = recalculate(2000.0, &samples, &weights(80.0, 79.0, 14));
        assert!(!result.sufficient_data);
    }

    #[test]
    fn test_insufficient_weights() {
        let one = vec![WeightSample { date: day(0), weight_kg: 80.0 }];
        let result = recalculate(2000.0, &net_days(14, -500.0), &one);
        assert!(!result.sufficient_data);
        let result = recalculate(2000.0, &net_days(14, -500.0), &[]);
        assert!(!result.sufficient_data);
    }

    #[test]
    fn test_within_range_when_prediction_matches() {
        // -500 kcal/day over 14 days predicts -7000/7700 kg
        let predicted = -500.0 * 14.0 / KCAL_PER_KG;
        let result = recalculate(
            1800.0,
            &net_days(14, -500.0),
            &weights(80.0, 80.0 + predicted, 14),
        );
        assert!(result.sufficient_data);
        assert_eq!(result.reason, RecalcReason::WithinRange);
        assert_eq!(result.reason.message(), "within expected range — no change");
        assert_eq!(result.recommended_calories, 1800);
        assert!((result.avg_daily_net + 500.0).abs() < 1e-9);
        assert!((result.predicted_kg - predicted).abs() < 1e-9);
    }

    #[test]
    fn test_undershoot_reduces_deficit() {
        let predicted = -500.0 * 14.0 / KCAL_PER_KG;
        let result = recalculate(
            1800.0,
            &net_days(14, -500.0),
            &weights(80.0, 80.0 + predicted * 0.5, 14),
        );
        assert_eq!(result.reason, RecalcReason::Undershoot);
        assert_eq!(result.recommended_calories, 1950);
    }

    #[test]
    fn test_overshoot_increases_deficit() {
        let predicted = -500.0 * 14.0 / KCAL_PER_KG;
        let result = recalculate(
            1800.0,
            &net_days(14, -500.0),
            &weights(80.0, 80.0 + predicted * 1.5, 14),
        );
        assert_eq!(result.reason, RecalcReason::Overshoot);
        assert_eq!(result.recommended_calories, 1700);
    }

    #[test]
    fn test_threshold_band_is_asymmetric() {
        let predicted = -500.0 * 14.0 / KCAL_PER_KG;
        for ratio in [0.81, 1.0, 1.24] {
            let result = recalculate(
                1800.0,
                &net_days(14, -500.0),
                &weights(80.0, 80.0 + predicted * ratio, 14),
            );
            assert_eq!(result.reason, RecalcReason::WithinRange, "ratio {}", ratio);
        }
    }

    #[test]
    fn test_predicted_near_zero() {
        let result = recalculate(2200.0, &net_days(10, 0.0), &weights(80.0, 79.0, 10));
        assert_eq!(result.reason, RecalcReason::PredictedNearZero);
        assert_eq!(result.recommended_calories, 2200);
    }

    #[test]
    fn test_no_baseline_uses_average() {
        let predicted = -400.0 * 14.0 / KCAL_PER_KG;
        let result = recalculate(
            0.0,
            &net_days(14, -400.0),
            &weights(80.0, 80.0 + predicted, 14),
        );
        assert_eq!(result.recommended_calories, -400);
    }

    #[test]
    fn test_same_day_weights_clamp_period() {
        let same_day = vec![
            WeightSample { date: day(3), weight_kg: 80.0 },
            WeightSample { date: day(3), weight_kg: 80.0 },
        ];
        let result = recalculate(2000.0, &net_days(7, -770.0), &same_day);
        assert!((result.predicted_kg + 0.1).abs() < 1e-9);
        assert_eq!(result.reason, RecalcReason::Undershoot);
    }

    #[test]
    fn test_unsorted_weights_use_earliest_and_latest() {
        let shuffled = vec![
            WeightSample { date: day(14), weight_kg: 79.0 },
            WeightSample { date: day(0), weight_kg: 80.0 },
            WeightSample { date: day(7), weight_kg: 79.6 },
        ];
        let result = recalculate(2000.0, &net_days(14, -500.0), &shuffled);
        assert!((result.actual_kg + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_idempotent() {
        let net = net_days(14, -420.0);
        let w = weights(81.2, 80.1, 13);
        let a = recalculate(1900.0, &net, &w);
        let b = recalculate(1900.0, &net, &w);
        assert_eq!(a, b);
        assert_eq!(a.predicted_kg.to_bits(), b.predicted_kg.to_bits());
    }

    #[test]
    fn test_round_kcal_half_up() {
        assert_eq!(round_kcal(-400.5), -400);
        assert_eq!(round_kcal(400.5), 401);
        assert_eq!(round_kcal(-400.6), -401);
        assert_eq!(round_kcal(1849.4), 1849);
        assert_eq!(round_kcal(f64::NAN), 0);
    }
}
