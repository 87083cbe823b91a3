//! Weight MCP Tools

use serde::Serialize;

use crate::db::Database;
use crate::models::{Weight, DEFAULT_WEIGHT_LIMIT};

/// Response for list_weights
#[derive(Debug, Serialize)]
pub struct ListWeightsResponse {
    pub weights: Vec<Weight>,
    pub total: usize,
}

/// Response for delete_weight
#[derive(Debug, Serialize)]
pub struct DeleteWeightResponse {
    pub success: bool,
    pub deleted_date: String,
}

pub fn log_weight(db: &Database, date: &str, weight_kg: f64) -> Result<Weight, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let weight = Weight::upsert(&conn, date, weight_kg)
        .map_err(|e| format!("Failed to log weight: {}", e))?;

    tracing::info!("Logged weight {:.1} kg for {}", weight.weight_kg, weight.date);
    Ok(weight)
}

pub fn list_weights(db: &Database, limit: Option<i64>) -> Result<ListWeightsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let weights = Weight::list(&conn, limit.unwrap_or(DEFAULT_WEIGHT_LIMIT))
        .map_err(|e| format!("Failed to list weights: {}", e))?;

    let total = weights.len();
    Ok(ListWeightsResponse { weights, total })
}

pub fn delete_weight(db: &Database, date: &str) -> Result<DeleteWeightResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Weight::delete(&conn, date)
        .map_err(|e| format!("Failed to delete weight: {}", e))?;

    if !deleted {
        return Err(format!("No weight logged for date: {}", date));
    }

    Ok(DeleteWeightResponse {
        success: true,
        deleted_date: date.to_string(),
    })
}
