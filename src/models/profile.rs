//! Profile model
//!
//! Body metrics, goal and the current calorie target (single row table).

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::adaptive::{BodyMetrics, Sex};
use crate::db::{DbError, DbResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Lose => "lose",
            Goal::Maintain => "maintain",
            Goal::Gain => "gain",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "lose" => Goal::Lose,
            "gain" => Goal::Gain,
            _ => Goal::Maintain,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub age: u32,
    pub sex: Sex,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub goal: Goal,
    pub activity_level: f64,
    pub calorie_target: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for setting the profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSet {
    pub age: u32,
    pub sex: Sex,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub goal: Goal,
    pub activity_level: f64,
    pub calorie_target: i64,
}

impl Profile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let sex: String = row.get("sex")?;
        let goal: String = row.get("goal")?;
        Ok(Self {
            age: row.get("age")?,
            sex: Sex::from_str(&sex).unwrap_or(Sex::Female),
            weight_kg: row.get("weight_kg")?,
            height_cm: row.get("height_cm")?,
            goal: Goal::from_str(&goal),
            activity_level: row.get("activity_level")?,
            calorie_target: row.get("calorie_target")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn get(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profile WHERE id = 1")?;

        let result = stmt.query_row([], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set or update the profile (upsert)
    pub fn set(conn: &Connection, data: &ProfileSet) -> DbResult<Self> {
        if data.weight_kg <= 0.0 || data.height_cm <= 0.0 || data.activity_level <= 0.0 {
            return Err(DbError::InvalidInput(
                "weight, height and activity level must be positive".to_string(),
            ));
        }

        conn.execute(
            r#"
            INSERT INTO profile
                (id, age, sex, weight_kg, height_cm, goal, activity_level, calorie_target)
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                age = excluded.age,
                sex = excluded.sex,
                weight_kg = excluded.weight_kg,
                height_cm = excluded.height_cm,
                goal = excluded.goal,
                activity_level = excluded.activity_level,
                calorie_target = excluded.calorie_target,
                updated_at = datetime('now')
            "#,
            params![
                data.age,
                data.sex.as_str(),
                data.weight_kg,
                data.height_cm,
                data.goal.as_str(),
                data.activity_level,
                data.calorie_target,
            ],
        )?;

        Self::get(conn)?.ok_or_else(|| DbError::NotFound("Profile".to_string()))
    }

    /// Replace only the calorie target. Returns None when no profile exists.
    pub fn set_calorie_target(conn: &Connection, calorie_target: i64) -> DbResult<Option<Self>> {
        let rows = conn.execute(
            "UPDATE profile SET calorie_target = ?1, updated_at = datetime('now') WHERE id = 1",
            [calorie_target],
        )?;
        if rows == 0 {
            return Ok(None);
        }
        Self::get(conn)
    }

    pub fn metrics(&self) -> BodyMetrics {
        BodyMetrics {
            age: self.age,
            sex: self.sex,
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            activity_level: self.activity_level,
        }
    }
}
