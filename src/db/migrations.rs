//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- JOURNAL ENTRIES
        -- One row per parsed journal item
        -- ============================================
        CREATE TABLE journal_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,                  -- ISO date: "2025-01-09"
            text TEXT NOT NULL,                  -- fragment label
            calories INTEGER NOT NULL CHECK(calories >= 0),
            kind TEXT NOT NULL CHECK(kind IN ('food', 'activity')) DEFAULT 'food',

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_journal_entries_date ON journal_entries(date);

        -- ============================================
        -- WEIGHTS
        -- One reading per day
        -- ============================================
        CREATE TABLE weights (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL UNIQUE,
            weight_kg REAL NOT NULL CHECK(weight_kg > 0),

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE UNIQUE INDEX idx_weights_date ON weights(date);

        -- ============================================
        -- PROFILE
        -- Single row (id = 1)
        -- ============================================
        CREATE TABLE profile (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            age INTEGER NOT NULL,
            sex TEXT NOT NULL CHECK(sex IN ('male', 'female')),
            weight_kg REAL NOT NULL,
            height_cm REAL NOT NULL,
            goal TEXT NOT NULL CHECK(goal IN ('lose', 'maintain', 'gain')) DEFAULT 'maintain',
            activity_level REAL NOT NULL DEFAULT 1.2,
            calorie_target INTEGER NOT NULL,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- RECOMMENDED TARGETS
        -- History of adaptive recommendations
        -- ============================================
        CREATE TABLE recommended_targets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recommended_calories INTEGER NOT NULL,
            reason TEXT NOT NULL,
            predicted_kg REAL NOT NULL,
            actual_kg REAL NOT NULL,
            avg_daily_net REAL NOT NULL,
            source TEXT NOT NULL DEFAULT 'adaptive_recalc',

            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_recommended_targets_created ON recommended_targets(created_at);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
