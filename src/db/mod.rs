//! Database module
//!
//! Handles SQLite connection and migrations.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};

#[cfg(test)]
pub(crate) fn test_conn() -> rusqlite::Connection {
    let conn = rusqlite::Connection::open_in_memory().expect("in-memory database");
    migrations::run_migrations(&conn).expect("migrations");
    conn
}

/// Pooled database on a fresh temporary file, migrated
#[cfg(test)]
pub(crate) fn test_database() -> Database {
    use std::sync::atomic::{AtomicUsize, Ordering};

    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!(
        "caljournal-test-{}-{}.db",
        std::process::id(),
        n
    ));
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }

    let database = Database::new(&path).expect("test database");
    database
        .with_conn(migrations::run_migrations)
        .expect("migrations");
    database
}
