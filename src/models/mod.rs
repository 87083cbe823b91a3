//! Data models
//!
//! Rust structs representing database entities.

mod journal_entry;
mod profile;
mod recommendation;
mod weight;

use chrono::NaiveDate;

use crate::db::{DbError, DbResult};

pub use journal_entry::{DayTotals, EntryKind, JournalEntry, JournalEntryCreate, JournalEntryUpdate};
pub use profile::{Goal, Profile, ProfileSet};
pub use recommendation::{Recommendation, ADAPTIVE_SOURCE};
pub use weight::{Weight, DEFAULT_WEIGHT_LIMIT};

/// Date format used for every stored date
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a stored `YYYY-MM-DD` date
pub(crate) fn parse_date(s: &str) -> DbResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| DbError::InvalidInput(format!("invalid date '{}', expected YYYY-MM-DD", s)))
}
