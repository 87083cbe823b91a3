//! Status Tool
//!
//! Runtime status of the caljournal service and usage instructions for
//! assistants driving it.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Journal logging instructions for AI assistants
pub const JOURNAL_INSTRUCTIONS: &str = r#"
# Calorie Journal Instructions

This guide explains how to keep a calorie journal with the caljournal tools.

## Getting the Current Date

Journal dates are ISO dates (`YYYY-MM-DD`). Do not guess "today": ask the user or use a
calendar tool when one is available.

---

## Logging Food

Pass the user's own words to `log_journal_entry`. The text is split into items on
commas, semicolons, `+`, `&` and the words "and", "with" and "plus". Each item is
estimated on its own and stored as a separate journal entry.

| Written as | How it is estimated |
|------------|---------------------|
| `sandwich 450 kcal` / `kcal 450 sandwich` | the stated number is used as is |
| `rice 150g` | grams × kcal per 100g of the first known food |
| `milk 200ml` | millilitres × kcal per 100ml |
| `chicken 6oz`, `steak 1.5lb` | converted to grams, then per 100g |
| `rice 1cup` | cup weight of the food, else 240 ml of it |
| `butter 1tbsp`, `oil 2tsp` | 120 kcal per tablespoon, 40 per teaspoon |
| `2 eggs` | a leading number multiplies per-serving calories |
| `eggs` | eggs default to two |
| anything unknown | 120 kcal |

Units must be written against the number (`150g`, not `150 g`).

**Tip:** call `parse_journal_text` first to preview estimates without storing them.
If an estimate is wrong, fix it with `update_journal_entry` and an explicit `calories`
value.

---

## Logging Activity

Call `log_journal_entry` with `kind: "activity"` and text that states the calories
burned, e.g. `"run 320 kcal"`. Activity entries are subtracted from the day's net total.

---

## Weights

Log one weight per day with `log_weight` (kilograms). Logging again for the same date
replaces the earlier reading.

---

## Profile and Targets

- `set_profile` stores age, sex, height, weight, goal and activity factor. Without a
  `calorie_target` the maintenance estimate (Mifflin-St Jeor × activity factor) is used.

| Activity factor | Meaning |
|-----------------|---------|
| 1.2 | sedentary |
| 1.375 | light exercise 1-3 days/week |
| 1.55 | moderate exercise 3-5 days/week |
| 1.725 | hard exercise 6-7 days/week |
| 1.9 | very hard exercise or physical job |

- `recalculate_target` compares the predicted weight change (7700 kcal per kg) with the
  logged change over the lookback window and nudges the target:
  - smaller change than predicted → deficit reduced by 150 kcal
  - larger change than predicted → deficit increased by 100 kcal
  - otherwise the target is kept
- It needs at least 7 logged days and 2 weights inside the window. With `apply: true`
  the new target is written to the profile.

---

## Daily Intake Check

`get_day_summary` and `log_journal_entry` report the day's consumed calories as `low`
(under 1200), `high` (over 3500) or `normal`. Mention low or high intake to the user.

---

## Quick Reference

| Task | Tool |
|------|------|
| Preview estimates | `parse_journal_text` |
| Log food or activity | `log_journal_entry` |
| Browse entries | `list_journal_entries` |
| Correct an entry | `update_journal_entry` |
| Remove an entry | `delete_journal_entry` |
| Day totals | `get_day_summary` |
| Weights | `log_weight`, `list_weights`, `delete_weight` |
| Profile | `get_profile`, `set_profile` |
| Adaptive target | `recalculate_target`, `list_recommendations` |
| Reference servings | `search_foods` |
"#;

/// Runtime status of the caljournal service
#[derive(Debug, Clone, Serialize)]
pub struct JournalStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Parser and engine settings
    pub lexicon_entries: usize,
    pub lookback_days: u32,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    lexicon_entries: usize,
    lookback_days: u32,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, lexicon_entries: usize, lookback_days: u32) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            lexicon_entries,
            lookback_days,
        }
    }

    pub fn get_status(&self) -> JournalStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        JournalStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            lexicon_entries: self.lexicon_entries,
            lookback_days: self.lookback_days,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
