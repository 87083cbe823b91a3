//! Weight model
//!
//! Body-weight readings, at most one per date.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::adaptive::WeightSample;
use crate::db::{DbError, DbResult};
use super::parse_date;

/// Default number of readings returned by `list`
pub const DEFAULT_WEIGHT_LIMIT: i64 = 52;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weight {
    pub id: i64,
    pub date: String,
    pub weight_kg: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl Weight {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            weight_kg: row.get("weight_kg")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Log a reading; an existing reading for the same date is replaced
    pub fn upsert(conn: &Connection, date: &str, weight_kg: f64) -> DbResult<Self> {
        parse_date(date)?;
        if !(weight_kg.is_finite() && weight_kg > 0.0) {
            return Err(DbError::InvalidInput(format!(
                "weight must be a positive number of kg, got {}",
                weight_kg
            )));
        }

        conn.execute(
            r#"
            INSERT INTO weights (date, weight_kg)
            VALUES (?1, ?2)
            ON CONFLICT(date) DO UPDATE SET
                weight_kg = excluded.weight_kg,
                updated_at = datetime('now')
            "#,
            params![date, weight_kg],
        )?;

        Self::get_by_date(conn, date)?
            .ok_or_else(|| DbError::NotFound(format!("Weight for {}", date)))
    }

    pub fn get_by_date(conn: &Connection, date: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM weights WHERE date = ?1")?;

        let result = stmt.query_row([date], Self::from_row);
        match result {
            Ok(weight) => Ok(Some(weight)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Most recent readings first
    pub fn list(conn: &Connection, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM weights ORDER BY date DESC LIMIT ?1")?;
        let weights = stmt
            .query_map([limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(weights)
    }

    /// Readings on or after `date`, oldest first
    pub fn list_since(conn: &Connection, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM weights WHERE date >= ?1 ORDER BY date ASC")?;
        let weights = stmt
            .query_map([date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(weights)
    }

    pub fn delete(conn: &Connection, date: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM weights WHERE date = ?1", [date])?;
        Ok(rows > 0)
    }

    /// Engine sample for this reading
    pub fn to_sample(&self) -> Option<WeightSample> {
        parse_date(&self.date).ok().map(|date| WeightSample {
            date,
            weight_kg: self.weight_kg,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_conn;

    #[test]
    fn test_upsert_replaces_same_date() {
        let conn = test_conn();
        let first = Weight::upsert(&conn, "2025-03-01", 80.0).unwrap();
        let second = Weight::upsert(&conn, "2025-03-01", 79.4).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.weight_kg, 79.4);
        assert_eq!(Weight::list(&conn, DEFAULT_WEIGHT_LIMIT).unwrap().len(), 1);
    }

    #[test]
    fn test_rejects_invalid_weight() {
        let conn = test_conn();
        assert!(matches!(
            Weight::upsert(&conn, "2025-03-01", 0.0),
            Err(DbError::InvalidInput(_))
        ));
        assert!(matches!(
            Weight::upsert(&conn, "03/01/2025", 80.0),
            Err(DbError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_list_orders() {
        let conn = test_conn();
        Weight::upsert(&conn, "2025-03-05", 79.0).unwrap();
        Weight::upsert(&conn, "2025-03-01", 80.0).unwrap();
        Weight::upsert(&conn, "2025-03-03", 79.5).unwrap();

        let recent = Weight::list(&conn, 2).unwrap();
        let dates: Vec<&str> = recent.iter().map(|w| w.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-03-05", "2025-03-03"]);

        let since = Weight::list_since(&conn, "2025-03-02").unwrap();
        let samples: Vec<WeightSample> = since.iter().filter_map(Weight::to_sample).collect();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].weight_kg, 79.5);
    }

    #[test]
    fn test_delete() {
        let conn = test_conn();
        Weight::upsert(&conn, "2025-03-05", 79.0).unwrap();
        assert!(Weight::delete(&conn, "2025-03-05").unwrap());
        assert!(Weight::get_by_date(&conn, "2025-03-05").unwrap().is_none());
    }
}
