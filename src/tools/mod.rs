//! Tools module
//!
//! MCP tool implementations for the calorie journal.

pub mod adaptive;
pub mod foods;
pub mod journal;
pub mod profile;
pub mod status;
pub mod weights;
