//! Lookback window assembly
//!
//! Turns stored journal and weight history into the engine's inputs.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

use super::engine::{DailyNetSample, WeightSample, MIN_NET_DAYS};

/// Engine inputs for one lookback window
#[derive(Debug, Clone, PartialEq)]
pub struct LookbackWindow {
    pub cutoff: NaiveDate,
    pub net_samples: Vec<DailyNetSample>,
    pub weight_samples: Vec<WeightSample>,
}

/// First day inside the window. The window never spans fewer than seven days.
pub fn cutoff_date(today: NaiveDate, lookback_days: u32) -> NaiveDate {
    let span = lookback_days.max(MIN_NET_DAYS as u32);
    today
        .checked_sub_days(Days::new(u64::from(span)))
        .unwrap_or(NaiveDate::MIN)
}

/// Sum signed calorie contributions per day, keeping days on or after `cutoff`.
/// Output is in ascending date order.
pub fn daily_net_samples<I>(contributions: I, cutoff: NaiveDate) -> Vec<DailyNetSample>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (date, calories) in contributions {
        if date >= cutoff {
            *by_day.entry(date).or_insert(0.0) += calories;
        }
    }
    by_day
        .into_iter()
        .map(|(date, net_calories)| DailyNetSample { date, net_calories })
        .collect()
}

/// Weights on or after `cutoff`, ascending by date
pub fn weight_samples<I>(weights: I, cutoff: NaiveDate) -> Vec<WeightSample>
where
    I: IntoIterator<Item = WeightSample>,
{
    let mut samples: Vec<WeightSample> = weights
        .into_iter()
        .filter(|w| w.date >= cutoff)
        .collect();
    samples.sort_by_key(|w| w.date);
    samples
}

/// Assemble a full window ending at `today`
pub fn build_window<C, W>(
    today: NaiveDate,
    lookback_days: u32,
    contributions: C,
    weights: W,
) -> LookbackWindow
where
    C: IntoIterator<Item = (NaiveDate, f64)>,
    W: IntoIterator<Item = WeightSample>,
{
    let cutoff = cutoff_date(today, lookback_days);
    LookbackWindow {
        cutoff,
        net_samples: daily_net_samples(contributions, cutoff),
        weight_samples: weight_samples(weights, cutoff),
    }
}
