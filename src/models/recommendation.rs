//! Recommended target model
//!
//! History of adaptive calorie target recommendations.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::adaptive::RecalcResult;
use crate::db::{DbError, DbResult};

/// Source tag for recommendations produced by the adaptive engine
pub const ADAPTIVE_SOURCE: &str = "adaptive_recalc";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: i64,
    pub recommended_calories: i64,
    pub reason: String,
    pub predicted_kg: f64,
    pub actual_kg: f64,
    pub avg_daily_net: f64,
    pub source: String,
    pub created_at: String,
}

impl Recommendation {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            recommended_calories: row.get("recommended_calories")?,
            reason: row.get("reason")?,
            predicted_kg: row.get("predicted_kg")?,
            actual_kg: row.get("actual_kg")?,
            avg_daily_net: row.get("avg_daily_net")?,
            source: row.get("source")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Store an engine result
    pub fn create(conn: &Connection, result: &RecalcResult, source: &str) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO recommended_targets
                (recommended_calories, reason, predicted_kg, actual_kg, avg_daily_net, source)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                result.recommended_calories,
                result.reason.message(),
                result.predicted_kg,
                result.actual_kg,
                result.avg_daily_net,
                source,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| DbError::NotFound(format!("Recommendation {}", id)))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recommended_targets WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(rec) => Ok(Some(rec)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Newest first
    pub fn list(conn: &Connection, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM recommended_targets ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;
        let recs = stmt
            .query_map([limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(recs)
    }

    pub fn latest(conn: &Connection) -> DbResult<Option<Self>> {
        Ok(Self::list(conn, 1)?.into_iter().next())
    }
}
