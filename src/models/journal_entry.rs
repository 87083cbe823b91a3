//! Journal entry model
//!
//! One stored row per parsed journal item. Food entries add to a day's net
//! calories; activity entries subtract from it.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::parse_date;

/// Whether an entry was eaten or burned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Food,
    Activity,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Food => "food",
            EntryKind::Activity => "activity",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "activity" | "exercise" => EntryKind::Activity,
            _ => EntryKind::Food,
        }
    }
}

impl Default for EntryKind {
    fn default() -> Self {
        EntryKind::Food
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: i64,
    pub date: String,
    pub text: String,
    pub calories: i64,
    pub kind: EntryKind,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a journal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntryCreate {
    pub date: String,
    pub text: String,
    pub calories: i64,
    pub kind: EntryKind,
}

/// Data for updating a journal entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalEntryUpdate {
    pub date: Option<String>,
    pub text: Option<String>,
    pub calories: Option<i64>,
    pub kind: Option<EntryKind>,
}

/// Calorie totals for one day
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DayTotals {
    pub consumed: i64,
    pub burned: i64,
    pub net: i64,
    pub entry_count: i64,
}

impl JournalEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let kind: String = row.get("kind")?;
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            text: row.get("text")?,
            calories: row.get("calories")?,
            kind: EntryKind::from_str(&kind),
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Calories with activity entries negated
    pub fn signed_calories(&self) -> f64 {
        match self.kind {
            EntryKind::Food => self.calories as f64,
            EntryKind::Activity => -(self.calories as f64),
        }
    }

    fn validate(date: &str, calories: i64) -> DbResult<()> {
        parse_date(date)?;
        if calories < 0 {
            return Err(DbError::InvalidInput(format!(
                "calories must be >= 0, got {}",
                calories
            )));
        }
        Ok(())
    }

    fn insert(conn: &Connection, data: &JournalEntryCreate) -> DbResult<i64> {
        Self::validate(&data.date, data.calories)?;
        conn.execute(
            r#"
            INSERT INTO journal_entries (date, text, calories, kind)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![data.date, data.text, data.calories, data.kind.as_str()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Create a new entry
    pub fn create(conn: &Connection, data: &JournalEntryCreate) -> DbResult<Self> {
        let id = Self::insert(conn, data)?;
        Self::get_by_id(conn, id)?
            .ok_or_else(|| DbError::NotFound(format!("Journal entry {}", id)))
    }

    /// Create several entries in one transaction
    pub fn create_many(conn: &mut Connection, rows: &[JournalEntryCreate]) -> DbResult<Vec<Self>> {
        let tx = conn.transaction()?;
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(Self::insert(&tx, row)?);
        }
        tx.commit()?;

        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            let entry = Self::get_by_id(conn, id)?
                .ok_or_else(|| DbError::NotFound(format!("Journal entry {}", id)))?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Get an entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM journal_entries WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List entries with optional date range, newest first
    pub fn list(
        conn: &Connection,
        start_date: Option<&str>,
        end_date: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Self>> {
        let mut sql = String::from("SELECT * FROM journal_entries WHERE 1=1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(start) = start_date {
            params_vec.push(Box::new(start.to_string()));
            sql.push_str(&format!(" AND date >= ?{}", params_vec.len()));
        }

        if let Some(end) = end_date {
            params_vec.push(Box::new(end.to_string()));
            sql.push_str(&format!(" AND date <= ?{}", params_vec.len()));
        }

        sql.push_str(" ORDER BY date DESC, id DESC");

        params_vec.push(Box::new(limit));
        sql.push_str(&format!(" LIMIT ?{}", params_vec.len()));

        params_vec.push(Box::new(offset));
        sql.push_str(&format!(" OFFSET ?{}", params_vec.len()));

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let entries = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// All entries on or after `date`, oldest first
    pub fn list_since(conn: &Connection, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM journal_entries WHERE date >= ?1 ORDER BY date ASC, id ASC",
        )?;
        let entries = stmt
            .query_map([date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Consumed, burned and net calories for a date
    pub fn totals_for_date(conn: &Connection, date: &str) -> DbResult<DayTotals> {
        let (consumed, burned, entry_count): (i64, i64, i64) = conn.query_row(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN kind = 'food' THEN calories ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN kind = 'activity' THEN calories ELSE 0 END), 0),
                COUNT(*)
            FROM journal_entries WHERE date = ?1
            "#,
            [date],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(DayTotals {
            consumed,
            burned,
            net: consumed - burned,
            entry_count,
        })
    }

    /// Update an entry
    pub fn update(conn: &Connection, id: i64, data: &JournalEntryUpdate) -> DbResult<Option<Self>> {
        let Some(existing) = Self::get_by_id(conn, id)? else {
            return Ok(None);
        };

        let date = data.date.clone().unwrap_or(existing.date);
        let text = data.text.clone().unwrap_or(existing.text);
        let calories = data.calories.unwrap_or(existing.calories);
        let kind = data.kind.unwrap_or(existing.kind);
        Self::validate(&date, calories)?;

        conn.execute(
            r#"
            UPDATE journal_entries SET
                date = ?1,
                text = ?2,
                calories = ?3,
                kind = ?4,
                updated_at = datetime('now')
            WHERE id = ?5
            "#,
            params![date, text, calories, kind.as_str(), id],
        )?;

        Self::get_by_id(conn, id)
    }

    /// Delete an entry
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM journal_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Parsed date of this entry
    pub fn naive_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date).ok()
    }
}
