//! Adaptive calorie target module
//!
//! Baseline targets, the recalculation engine and its input assembly.

pub mod baseline;
pub mod engine;
pub mod intake;
pub mod window;

pub use baseline::{basal_metabolic_rate, calculate_calorie_target, BodyMetrics, Sex};
pub use engine::{
    adjustment_direction, recalculate, AdjustmentDirection, DailyNetSample, RecalcReason,
    RecalcResult, WeightSample, DEFAULT_LOOKBACK_DAYS,
};
pub use intake::IntakeStatus;
pub use window::{build_window, cutoff_date, LookbackWindow};
