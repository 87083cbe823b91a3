//! caljournal MCP Server Implementation
//!
//! Implements the MCP server with all journal tools.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::DATE_FORMAT;
use crate::nutrition::CalorieParser;
use crate::tools::profile::SetProfileInput;
use crate::tools::status::StatusTracker;
use crate::tools::{adaptive, foods, journal, profile, weights};

/// caljournal MCP Service
#[derive(Clone)]
pub struct CalJournalService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    parser: Arc<CalorieParser>,
    lookback_days: u32,
    tool_router: ToolRouter<CalJournalService>,
}

impl CalJournalService {
    pub fn new(
        database_path: PathBuf,
        database: Database,
        parser: CalorieParser,
        lookback_days: u32,
    ) -> Self {
        let tracker = StatusTracker::new(database_path, parser.lexicon().len(), lookback_days);
        Self {
            status_tracker: Arc::new(Mutex::new(tracker)),
            database,
            parser: Arc::new(parser),
            lookback_days,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Journal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ParseJournalTextParams {
    /// Free-form journal text, e.g. "rice 150g, 2 eggs and coffee"
    pub text: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogJournalEntryParams {
    /// Date in YYYY-MM-DD format
    pub date: String,
    pub text: String,
    /// "food" (default) or "activity"
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListJournalEntriesParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateJournalEntryParams {
    pub id: i64,
    pub date: Option<String>,
    /// New text; re-estimated unless calories is also given
    pub text: Option<String>,
    pub calories: Option<i64>,
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct JournalEntryIdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateParams {
    /// Date in YYYY-MM-DD format
    pub date: String,
}

// ============================================================================
// Weight Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogWeightParams {
    pub date: String,
    pub weight_kg: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

// ============================================================================
// Profile and Target Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetProfileParams {
    pub age: u32,
    /// "male" or "female"
    pub sex: String,
    pub weight_kg: f64,
    pub height_cm: f64,
    /// "lose", "maintain" (default) or "gain"
    pub goal: Option<String>,
    /// Activity factor, 1.2 (sedentary) to 1.9 (very active)
    pub activity_level: Option<f64>,
    /// Explicit daily target; computed from body metrics when omitted
    pub calorie_target: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecalculateTargetParams {
    /// End of the window (YYYY-MM-DD); defaults to today
    pub today: Option<String>,
    pub lookback_days: Option<u32>,
    /// Write the new target to the profile
    #[serde(default)]
    pub apply: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFoodsParams {
    pub query: String,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl CalJournalService {
    // --- Status ---

    #[tool(description = "Get the current status of the caljournal service including build info, database status, lexicon size and process information")]
    async fn caljournal_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get instructions for keeping the calorie journal. Call this when starting a logging session or when unsure how text is estimated.")]
    fn journal_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::JOURNAL_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(JOURNAL_INSTRUCTIONS)]))
    }

    // --- Journal ---

    #[tool(description = "Preview how journal text is split into items and estimated, without storing anything")]
    fn parse_journal_text(&self, Parameters(p): Parameters<ParseJournalTextParams>) -> Result<CallToolResult, McpError> {
        let result = journal::parse_journal_text(&self.parser, &p.text);
        to_json(&result)
    }

    #[tool(description = "Parse journal text and store one entry per item. Returns the stored entries and the day's totals with an intake check.")]
    fn log_journal_entry(&self, Parameters(p): Parameters<LogJournalEntryParams>) -> Result<CallToolResult, McpError> {
        let result = journal::log_journal_entry(&self.database, &self.parser, &p.date, &p.text, p.kind.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List journal entries, newest first, with optional date range and pagination")]
    fn list_journal_entries(&self, Parameters(p): Parameters<ListJournalEntriesParams>) -> Result<CallToolResult, McpError> {
        let result = journal::list_journal_entries(&self.database, p.start_date.as_deref(), p.end_date.as_deref(), p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Update a journal entry. New text without calories is re-estimated.")]
    fn update_journal_entry(&self, Parameters(p): Parameters<UpdateJournalEntryParams>) -> Result<CallToolResult, McpError> {
        let result = journal::update_journal_entry(
            &self.database,
            &self.parser,
            p.id,
            p.date.as_deref(),
            p.text.as_deref(),
            p.calories,
            p.kind.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete a journal entry")]
    fn delete_journal_entry(&self, Parameters(p): Parameters<JournalEntryIdParams>) -> Result<CallToolResult, McpError> {
        let result = journal::delete_journal_entry(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get consumed, burned and net calories for a day with its entries and the intake check")]
    fn get_day_summary(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = journal::get_day_summary(&self.database, &p.date).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Weights ---

    #[tool(description = "Log body weight in kg for a date. Replaces any reading already logged for that date.")]
    fn log_weight(&self, Parameters(p): Parameters<LogWeightParams>) -> Result<CallToolResult, McpError> {
        let result = weights::log_weight(&self.database, &p.date, p.weight_kg).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List logged weights, most recent first (default 52)")]
    fn list_weights(&self, Parameters(p): Parameters<LimitParams>) -> Result<CallToolResult, McpError> {
        let result = weights::list_weights(&self.database, p.limit).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete the weight logged for a date")]
    fn delete_weight(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = weights::delete_weight(&self.database, &p.date).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Profile ---

    #[tool(description = "Get the profile with its calorie target, BMR and maintenance estimate")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(profile) => to_json(&profile),
            None => Ok(CallToolResult::success(vec![Content::text(
                r#"{"error": "No profile set. Call set_profile first."}"#,
            )])),
        }
    }

    #[tool(description = "Set age, sex, weight, height, goal and activity factor. Without calorie_target the target is computed with Mifflin-St Jeor.")]
    fn set_profile(&self, Parameters(p): Parameters<SetProfileParams>) -> Result<CallToolResult, McpError> {
        let input = SetProfileInput {
            age: p.age,
            sex: &p.sex,
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            goal: p.goal.as_deref(),
            activity_level: p.activity_level,
            calorie_target: p.calorie_target,
        };
        let result = profile::set_profile(&self.database, &input).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Adaptive target ---

    #[tool(description = "Compare predicted and logged weight change over the lookback window and recommend a new calorie target. Needs 7 logged days and 2 weights. apply=true writes it to the profile.")]
    fn recalculate_target(&self, Parameters(p): Parameters<RecalculateTargetParams>) -> Result<CallToolResult, McpError> {
        let today = match p.today.as_deref() {
            Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
                .map_err(|e| McpError::invalid_params(format!("Invalid date '{}': {}", s, e), None))?,
            None => chrono::Local::now().date_naive(),
        };
        let lookback = p.lookback_days.unwrap_or(self.lookback_days);
        let result = adaptive::recalculate_target(&self.database, today, lookback, p.apply)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List stored calorie target recommendations, newest first")]
    fn list_recommendations(&self, Parameters(p): Parameters<LimitParams>) -> Result<CallToolResult, McpError> {
        let result = adaptive::list_recommendations(&self.database, p.limit).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Foods ---

    #[tool(description = "Search the reference food catalog. Every word of the query must match a food's name or tags.")]
    fn search_foods(&self, Parameters(p): Parameters<SearchFoodsParams>) -> Result<CallToolResult, McpError> {
        to_json(&foods::search_foods(&p.query))
    }
}

#[tool_handler]
impl ServerHandler for CalJournalService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "caljournal".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Calorie Journal".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Calorie Journal - free-text food logging with an adaptive calorie target. \
                 IMPORTANT: Call journal_instructions before the first log of a session. \
                 Journal: parse_journal_text (preview), log_journal_entry, list/update/delete_journal_entry, get_day_summary. \
                 Weights: log_weight, list_weights, delete_weight. \
                 Profile: get_profile, set_profile. \
                 Target: recalculate_target, list_recommendations. \
                 Reference foods: search_foods."
                    .into(),
            ),
        }
    }
}
