//! Adaptive target MCP Tools
//!
//! Runs the recalculation engine over the stored lookback window and keeps a
//! history of its recommendations.

use chrono::NaiveDate;
use serde::Serialize;

use crate::adaptive::{build_window, cutoff_date, recalculate, RecalcResult};
use crate::config::normalize_lookback;
use crate::db::{Database, DbResult};
use crate::models::{JournalEntry, Profile, Recommendation, Weight, ADAPTIVE_SOURCE, DATE_FORMAT};

/// Default page size for list_recommendations
pub const DEFAULT_RECOMMENDATION_LIMIT: i64 = 20;

/// Response for recalculate_target
#[derive(Debug, Serialize)]
pub struct RecalculateResponse {
    #[serde(flatten)]
    pub result: RecalcResult,
    pub reason_message: &'static str,
    pub baseline_target: i64,
    pub lookback_days: u32,
    pub window_start: String,
    pub net_days: usize,
    pub weight_samples: usize,
    /// Stored history row, present only for sufficient-data results
    pub recommendation: Option<Recommendation>,
    pub profile_updated: bool,
}

/// Response for list_recommendations
#[derive(Debug, Serialize)]
pub struct ListRecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
    pub total: usize,
}

/// Recalculate the calorie target as of `today`.
///
/// The profile's calorie target is the baseline. Sufficient-data results are
/// stored; with `apply` they also replace the profile's target.
pub fn recalculate_target(
    db: &Database,
    today: NaiveDate,
    lookback_days: u32,
    apply: bool,
) -> Result<RecalculateResponse, String> {
    let lookback_days = normalize_lookback(lookback_days);

    db.with_conn(|conn| {
        let profile = Profile::get(conn)?;
        let baseline_target = profile.as_ref().map(|p| p.calorie_target).unwrap_or(0);

        let cutoff = cutoff_date(today, lookback_days);
        let since = cutoff.format(DATE_FORMAT).to_string();
        let entries = JournalEntry::list_since(conn, &since)?;
        let weights = Weight::list_since(conn, &since)?;

        let window = build_window(
            today,
            lookback_days,
            entries
                .iter()
                .filter_map(|e| e.naive_date().map(|d| (d, e.signed_calories()))),
            weights.iter().filter_map(Weight::to_sample),
        );

        let result = recalculate(
            baseline_target as f64,
            &window.net_samples,
            &window.weight_samples,
        );

        let (recommendation, profile_updated) = if result.sufficient_data {
            let stored = Recommendation::create(conn, &result, ADAPTIVE_SOURCE)?;
            tracing::info!(
                "Stored recommendation {} kcal ({})",
                stored.recommended_calories,
                result.reason.as_str()
            );
            let updated = apply && apply_target(conn, result.recommended_calories)?;
            (Some(stored), updated)
        } else {
            (None, false)
        };

        Ok(RecalculateResponse {
            reason_message: result.reason.message(),
            result,
            baseline_target,
            lookback_days,
            window_start: since,
            net_days: window.net_samples.len(),
            weight_samples: window.weight_samples.len(),
            recommendation,
            profile_updated,
        })
    })
    .map_err(|e| format!("Failed to recalculate target: {}", e))
}

fn apply_target(conn: &rusqlite::Connection, calorie_target: i64) -> DbResult<bool> {
    let updated = Profile::set_calorie_target(conn, calorie_target)?;
    if updated.is_some() {
        tracing::info!("Profile calorie target set to {}", calorie_target);
    }
    Ok(updated.is_some())
}

pub fn list_recommendations(
    db: &Database,
    limit: Option<i64>,
) -> Result<ListRecommendationsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recommendations = Recommendation::list(&conn, limit.unwrap_or(DEFAULT_RECOMMENDATION_LIMIT))
        .map_err(|e| format!("Failed to list recommendations: {}", e))?;

    let total = recommendations.len();
    Ok(ListRecommendationsResponse {
        recommendations,
        total,
    })
}
