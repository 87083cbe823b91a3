//! Calorie Journal (caljournal) Library
//!
//! Free-text calorie estimation, an adaptive calorie target engine and the
//! storage and MCP tools around them.

pub mod adaptive;
pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
