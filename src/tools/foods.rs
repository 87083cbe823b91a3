//! Food search MCP Tool

use serde::Serialize;

use crate::nutrition::{catalog, CatalogItem};

/// Response for search_foods
#[derive(Debug, Serialize)]
pub struct SearchFoodsResponse {
    pub query: String,
    pub results: Vec<&'static CatalogItem>,
    pub total: usize,
}

pub fn search_foods(query: &str) -> SearchFoodsResponse {
    let results = catalog::search(query);
    let total = results.len();
    SearchFoodsResponse {
        query: query.to_string(),
        results,
        total,
    }
}
