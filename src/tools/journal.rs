//! Journal MCP Tools
//!
//! Free-text journal logging: parse, store, list and summarize entries.

use serde::Serialize;

use crate::adaptive::IntakeStatus;
use crate::db::Database;
use crate::models::{DayTotals, EntryKind, JournalEntry, JournalEntryCreate, JournalEntryUpdate};
use crate::nutrition::{CalorieParser, ParsedItem};

/// Default page size for list_journal_entries
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Response for parse_journal_text
#[derive(Debug, Serialize)]
pub struct ParsePreviewResponse {
    pub items: Vec<ParsedItem>,
    pub total_calories: u64,
}

/// Response for log_journal_entry
#[derive(Debug, Serialize)]
pub struct LogJournalResponse {
    pub date: String,
    pub kind: EntryKind,
    pub entries: Vec<JournalEntry>,
    pub logged_calories: i64,
    pub day: DaySummary,
}

/// Totals for one day with the intake check applied to consumed calories
#[derive(Debug, Serialize)]
pub struct DaySummary {
    pub date: String,
    #[serde(flatten)]
    pub totals: DayTotals,
    pub intake_status: IntakeStatus,
    pub intake_message: &'static str,
}

impl DaySummary {
    fn new(date: &str, totals: DayTotals) -> Self {
        let intake_status = IntakeStatus::classify(totals.consumed as f64);
        Self {
            date: date.to_string(),
            totals,
            intake_status,
            intake_message: intake_status.message(),
        }
    }
}

/// Response for get_day_summary
#[derive(Debug, Serialize)]
pub struct DaySummaryResponse {
    #[serde(flatten)]
    pub summary: DaySummary,
    pub entries: Vec<JournalEntry>,
}

/// Response for list_journal_entries
#[derive(Debug, Serialize)]
pub struct ListJournalResponse {
    pub entries: Vec<JournalEntry>,
    pub total: usize,
}

/// Response for delete_journal_entry
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Preview how text would be itemized, without storing anything
pub fn parse_journal_text(parser: &CalorieParser, text: &str) -> ParsePreviewResponse {
    let items = parser.parse(text);
    let total_calories = items.iter().map(|i| u64::from(i.calories)).sum();
    ParsePreviewResponse {
        items,
        total_calories,
    }
}

/// Parse text and store one entry per recognised item
pub fn log_journal_entry(
    db: &Database,
    parser: &CalorieParser,
    date: &str,
    text: &str,
    kind: Option<&str>,
) -> Result<LogJournalResponse, String> {
    let kind = kind.map(EntryKind::from_str).unwrap_or_default();
    let items = parser.parse(text);
    if items.is_empty() {
        return Err("No items recognised in journal text".to_string());
    }

    let rows: Vec<JournalEntryCreate> = items
        .into_iter()
        .map(|item| JournalEntryCreate {
            date: date.to_string(),
            text: item.label,
            calories: i64::from(item.calories),
            kind,
        })
        .collect();

    let (entries, totals) = db
        .with_conn_mut(|conn| {
            let entries = JournalEntry::create_many(conn, &rows)?;
            let totals = JournalEntry::totals_for_date(conn, date)?;
            Ok((entries, totals))
        })
        .map_err(|e| format!("Failed to log journal entry: {}", e))?;

    let logged_calories = entries.iter().map(|e| e.calories).sum();
    tracing::info!(
        "Logged {} {} item(s) for {} ({} kcal)",
        entries.len(),
        kind.as_str(),
        date,
        logged_calories
    );

    Ok(LogJournalResponse {
        date: date.to_string(),
        kind,
        entries,
        logged_calories,
        day: DaySummary::new(date, totals),
    })
}

pub fn list_journal_entries(
    db: &Database,
    start_date: Option<&str>,
    end_date: Option<&str>,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<ListJournalResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entries = JournalEntry::list(
        &conn,
        start_date,
        end_date,
        limit.unwrap_or(DEFAULT_LIST_LIMIT),
        offset.unwrap_or(0),
    )
    .map_err(|e| format!("Failed to list journal entries: {}", e))?;

    let total = entries.len();
    Ok(ListJournalResponse { entries, total })
}

/// Update an entry. New text without explicit calories is re-estimated.
pub fn update_journal_entry(
    db: &Database,
    parser: &CalorieParser,
    id: i64,
    date: Option<&str>,
    text: Option<&str>,
    calories: Option<i64>,
    kind: Option<&str>,
) -> Result<JournalEntry, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let calories = match (calories, text) {
        (Some(c), _) => Some(c),
        (None, Some(t)) => Some(i64::from(parser.estimate(&t.trim().to_lowercase()))),
        (None, None) => None,
    };

    let data = JournalEntryUpdate {
        date: date.map(String::from),
        text: text.map(|t| t.trim().to_lowercase()),
        calories,
        kind: kind.map(EntryKind::from_str),
    };

    JournalEntry::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update journal entry: {}", e))?
        .ok_or_else(|| format!("Journal entry not found with id: {}", id))
}

pub fn delete_journal_entry(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = JournalEntry::delete(&conn, id)
        .map_err(|e| format!("Failed to delete journal entry: {}", e))?;

    if !deleted {
        return Err(format!("Journal entry not found with id: {}", id));
    }

    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}

pub fn get_day_summary(db: &Database, date: &str) -> Result<DaySummaryResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let totals = JournalEntry::totals_for_date(&conn, date)
        .map_err(|e| format!("Failed to compute day totals: {}", e))?;
    let entries = JournalEntry::list(&conn, Some(date), Some(date), i64::MAX, 0)
        .map_err(|e| format!("Failed to list journal entries: {}", e))?;

    Ok(DaySummaryResponse {
        summary: DaySummary::new(date, totals),
        entries,
    })
}
