//! Reference food catalog
//!
//! A handful of common foods with a labelled serving, used for quick lookups
//! when the user wants a known serving instead of free-text parsing.

use serde::Serialize;

/// A catalog food with its reference serving
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogItem {
    pub name: &'static str,
    pub serving: &'static str,
    pub calories: u32,
    pub tags: &'static [&'static str],
}

pub const FOOD_CATALOG: &[CatalogItem] = &[
    CatalogItem {
        name: "Brown rice",
        serving: "1 cup (195g)",
        calories: 215,
        tags: &["rice", "cup"],
    },
    CatalogItem {
        name: "White rice",
        serving: "1 cup (195g)",
        calories: 205,
        tags: &["rice", "cup"],
    },
    CatalogItem {
        name: "Chicken breast",
        serving: "6 oz (170g)",
        calories: 280,
        tags: &["chicken", "oz"],
    },
    CatalogItem {
        name: "Egg",
        serving: "1 large",
        calories: 78,
        tags: &["egg"],
    },
    CatalogItem {
        name: "Bread (toast)",
        serving: "1 slice",
        calories: 80,
        tags: &["bread", "toast", "slice"],
    },
    CatalogItem {
        name: "Milk (2%)",
        serving: "1 cup (240ml)",
        calories: 122,
        tags: &["milk", "cup"],
    },
];

/// Find catalog items matching every whitespace-separated term of `query`.
///
/// A term matches when it is contained in the item's name or in one of its tags.
pub fn search(query: &str) -> Vec<&'static CatalogItem> {
    let query = query.trim().to_lowercase();
    let terms: Vec<&str> = query.split_whitespace().collect();
    if terms.is_empty() {
        return Vec::new();
    }

    FOOD_CATALOG
        .iter()
        .filter(|item| {
            let name = item.name.to_lowercase();
            terms
                .iter()
                .all(|term| name.contains(term) || item.tags.iter().any(|tag| tag.contains(term)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&CatalogItem]) -> Vec<&'static str> {
        items.iter().map(|i| i.name).collect()
    }

    #[test]
    fn test_empty_query() {
        assert!(search("").is_empty());
        assert!(search("   ").is_empty());
    }

    #[test]
    fn test_matches_by_tag() {
        assert_eq!(names(&search("rice")), vec!["Brown rice", "White rice"]);
        assert_eq!(names(&search("toast")), vec!["Bread (toast)"]);
    }

    #[test]
    fn test_all_terms_must_match() {
        assert_eq!(names(&search("Brown RICE")), vec!["Brown rice"]);
        assert_eq!(names(&search("cup")), vec!["Brown rice", "White rice", "Milk (2%)"]);
        assert!(search("brown milk").is_empty());
    }

    #[test]
    fn test_partial_terms() {
        assert_eq!(names(&search("chick")), vec!["Chicken breast"]);
    }
}
