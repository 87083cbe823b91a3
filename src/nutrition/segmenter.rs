//! Journal text segmentation
//!
//! Splits a free-form entry into independent fragments on punctuation
//! (`,` `;` `+` `&`) and on the words "and", "with" and "plus".

use std::sync::LazyLock;

use regex::Regex;

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[,;+&]|\band\b|\bwith\b|\bplus\b").expect("separator pattern is valid")
});

/// Split `text` into trimmed, non-empty, lower-cased fragments in input order
pub fn segment(text: &str) -> Vec<String> {
    let entry = text.trim().to_lowercase();
    if entry.is_empty() {
        return Vec::new();
    }

    SEPARATORS
        .split(&entry)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(segment("").is_empty());
        assert!(segment("   \t ").is_empty());
    }

    #[test]
    fn test_punctuation_separators() {
        assert_eq!(
            segment("2 eggs, toast; coffee + milk & jam"),
            vec!["2 eggs", "toast", "coffee", "milk", "jam"]
        );
    }

    #[test]
    fn test_word_separators_case_insensitive() {
        assert_eq!(
            segment("Rice 150g WITH chicken 6oz And salad Plus water"),
            vec!["rice 150g", "chicken 6oz", "salad", "water"]
        );
    }

    #[test]
    fn test_separator_words_inside_other_words() {
        // "sandwich" contains "and", "withers" contains "with"
        assert_eq!(segment("sandwich, withers"), vec!["sandwich", "withers"]);
    }

    #[test]
    fn test_drops_empty_fragments() {
        assert_eq!(segment(",, banana ,;and apple,"), vec!["banana", "apple"]);
    }

    #[test]
    fn test_only_separators() {
        assert!(segment(", and ;").is_empty());
    }
}
