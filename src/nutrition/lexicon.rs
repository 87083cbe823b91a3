//! Nutrition lexicon
//!
//! The small knowledge base the journal parser resolves food words against:
//! per-serving, per-100g and per-100ml calorie values, approximate cup
//! weights, and a synonym table mapping alternate spellings to canonical
//! names. A `Lexicon` is immutable once built and is handed to the parser,
//! so callers can swap in their own data (see `from_json_str`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lexicon validation errors
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Duplicate lexicon entry: {0}")]
    DuplicateEntry(String),

    #[error("Lexicon entry '{0}' has no calorie or cup value")]
    EmptyEntry(String),

    #[error("Lexicon entry name must be lowercase letters only: '{0}'")]
    InvalidName(String),

    #[error("Synonym '{alias}' points at unknown entry '{target}'")]
    UnknownSynonymTarget { alias: String, target: String },

    #[error("Synonym '{0}' shadows a lexicon entry of the same name")]
    SynonymShadowsEntry(String),

    #[error("Invalid lexicon JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Calorie data for one canonical food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconEntry {
    /// Canonical lowercase name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_serving_kcal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_100g_kcal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_100ml_kcal: Option<f64>,
    /// Approximate grams in one cup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cup_grams: Option<f64>,
}

impl LexiconEntry {
    fn has_value(&self) -> bool {
        self.per_serving_kcal.is_some()
            || self.per_100g_kcal.is_some()
            || self.per_100ml_kcal.is_some()
            || self.cup_grams.is_some()
    }
}

/// Serialized shape of a lexicon, validated on the way in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconData {
    pub entries: Vec<LexiconEntry>,
    #[serde(default)]
    pub synonyms: BTreeMap<String, String>,
}

/// Validated, immutable nutrition lexicon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LexiconData", into = "LexiconData")]
pub struct Lexicon {
    entries: BTreeMap<String, LexiconEntry>,
    synonyms: BTreeMap<String, String>,
}

impl Lexicon {
    /// Build a lexicon, checking that names are unique, every entry carries
    /// at least one value, and every synonym resolves in a single hop.
    pub fn new(
        entries: Vec<LexiconEntry>,
        synonyms: BTreeMap<String, String>,
    ) -> Result<Self, LexiconError> {
        let mut by_name = BTreeMap::new();
        for entry in entries {
            if entry.name.is_empty() || !entry.name.chars().all(|c| c.is_ascii_lowercase()) {
                return Err(LexiconError::InvalidName(entry.name));
            }
            if !entry.has_value() {
                return Err(LexiconError::EmptyEntry(entry.name));
            }
            if by_name.contains_key(&entry.name) {
                return Err(LexiconError::DuplicateEntry(entry.name));
            }
            by_name.insert(entry.name.clone(), entry);
        }

        for (alias, target) in &synonyms {
            if by_name.contains_key(alias) {
                return Err(LexiconError::SynonymShadowsEntry(alias.clone()));
            }
            // Targets must be entries, and entries are never aliases, so
            // every synonym resolves in exactly one hop.
            if !by_name.contains_key(target) {
                return Err(LexiconError::UnknownSynonymTarget {
                    alias: alias.clone(),
                    target: target.clone(),
                });
            }
        }

        Ok(Self {
            entries: by_name,
            synonyms,
        })
    }

    /// Parse and validate a lexicon from JSON
    pub fn from_json_str(json: &str) -> Result<Self, LexiconError> {
        let data: LexiconData = serde_json::from_str(json)?;
        Self::try_from(data)
    }

    /// The built-in lexicon
    pub fn builtin() -> Self {
        let mut synonyms = BTreeMap::new();
        for (alias, target) in BUILTIN_SYNONYMS {
            synonyms.insert(alias.to_string(), target.to_string());
        }
        let entries = BUILTIN_ENTRIES
            .iter()
            .map(|&(name, per_serving, per_100g, per_100ml, cup)| {
                let entry = LexiconEntry {
                    name: name.to_string(),
                    per_serving_kcal: per_serving,
                    per_100g_kcal: per_100g,
                    per_100ml_kcal: per_100ml,
                    cup_grams: cup,
                };
                (name.to_string(), entry)
            })
            .collect();

        Self { entries, synonyms }
    }

    /// Look up a canonical name
    pub fn entry(&self, name: &str) -> Option<&LexiconEntry> {
        self.entries.get(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &LexiconEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonicalise a raw token: keep only a-z, then follow the synonym table
    pub fn canonicalize(&self, token: &str) -> String {
        let stripped: String = token.chars().filter(|c| c.is_ascii_lowercase()).collect();
        match self.synonyms.get(&stripped) {
            Some(target) => target.clone(),
            None => stripped,
        }
    }

    /// Per-serving calories for a canonical name
    pub fn per_serving(&self, name: &str) -> Option<f64> {
        self.entry(name).and_then(|e| e.per_serving_kcal)
    }

    /// First food in `foods` for which `field` has a value, returning that value
    pub fn first_with<F>(&self, foods: &[String], field: F) -> Option<f64>
    where
        F: Fn(&LexiconEntry) -> Option<f64>,
    {
        self.position_with(foods, field).map(|(_, value)| value)
    }

    /// Like `first_with`, also returning the index of the food in `foods`
    pub fn position_with<F>(&self, foods: &[String], field: F) -> Option<(usize, f64)>
    where
        F: Fn(&LexiconEntry) -> Option<f64>,
    {
        foods
            .iter()
            .enumerate()
            .find_map(|(i, food)| self.entry(food).and_then(&field).map(|value| (i, value)))
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<LexiconData> for Lexicon {
    type Error = LexiconError;

    fn try_from(data: LexiconData) -> Result<Self, Self::Error> {
        Self::new(data.entries, data.synonyms)
    }
}

impl From<Lexicon> for LexiconData {
    fn from(lexicon: Lexicon) -> Self {
        Self {
            entries: lexicon.entries.into_values().collect(),
            synonyms: lexicon.synonyms,
        }
    }
}

// ============================================================================
// Built-in Data
// ============================================================================

/// (name, per serving, per 100g, per 100ml, grams per cup)
type BuiltinEntry = (&'static str, Option<f64>, Option<f64>, Option<f64>, Option<f64>);

const BUILTIN_ENTRIES: &[BuiltinEntry] = &[
    ("apple", Some(95.0), Some(52.0), None, None),
    ("banana", Some(105.0), Some(89.0), None, None),
    ("beef", Some(250.0), Some(250.0), None, None),
    ("bread", Some(80.0), Some(265.0), None, None),
    ("cereal", Some(200.0), None, None, Some(30.0)),
    ("chicken", Some(165.0), Some(165.0), None, None),
    ("egg", Some(78.0), None, None, None),
    ("milk", Some(60.0), None, Some(42.0), Some(240.0)),
    ("orange", Some(62.0), None, None, None),
    ("pasta", Some(220.0), Some(131.0), None, Some(140.0)),
    ("potato", Some(160.0), Some(77.0), None, None),
    ("rice", Some(200.0), Some(130.0), None, Some(195.0)),
    ("yogurt", Some(150.0), None, Some(59.0), Some(245.0)),
];

const BUILTIN_SYNONYMS: &[(&str, &str)] = &[
    ("apples", "apple"),
    ("bananas", "banana"),
    ("eggs", "egg"),
    ("oats", "cereal"),
    ("oranges", "orange"),
    ("potatoes", "potato"),
    ("steak", "beef"),
    ("toast", "bread"),
    ("yoghurt", "yogurt"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, per_serving: Option<f64>) -> LexiconEntry {
        LexiconEntry {
            name: name.to_string(),
            per_serving_kcal: per_serving,
            per_100g_kcal: None,
            per_100ml_kcal: None,
            cup_grams: None,
        }
    }

    #[test]
    fn test_builtin_is_valid() {
        let builtin = Lexicon::builtin();
        let data = LexiconData::from(builtin.clone());
        let rebuilt = Lexicon::try_from(data).unwrap();
        assert_eq!(rebuilt.len(), builtin.len());
        assert_eq!(builtin.per_serving("egg"), Some(78.0));
    }

    #[test]
    fn test_canonicalize() {
        let lexicon = Lexicon::builtin();
        assert_eq!(lexicon.canonicalize("eggs,"), "egg");
        assert_eq!(lexicon.canonicalize("yoghurt"), "yogurt");
        assert_eq!(lexicon.canonicalize("150g"), "g");
        assert_eq!(lexicon.canonicalize("rice"), "rice");
    }

    #[test]
    fn test_first_with_skips_foods_without_field() {
        let lexicon = Lexicon::builtin();
        let foods = vec!["egg".to_string(), "milk".to_string(), "rice".to_string()];
        assert_eq!(lexicon.first_with(&foods, |e| e.per_100g_kcal), Some(130.0));
        assert_eq!(lexicon.first_with(&foods, |e| e.per_100ml_kcal), Some(42.0));
        assert_eq!(lexicon.position_with(&foods, |e| e.per_100g_kcal), Some((2, 130.0)));
        assert_eq!(lexicon.position_with(&foods, |e| e.cup_grams), Some((1, 240.0)));
    }

    #[test]
    fn test_rejects_duplicate_entry() {
        let err = Lexicon::new(
            vec![entry("kiwi", Some(42.0)), entry("kiwi", Some(50.0))],
            BTreeMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, LexiconError::DuplicateEntry(name) if name == "kiwi"));
    }

    #[test]
    fn test_rejects_empty_entry() {
        let err = Lexicon::new(vec![entry("kiwi", None)], BTreeMap::new()).unwrap_err();
        assert!(matches!(err, LexiconError::EmptyEntry(_)));
    }

    #[test]
    fn test_rejects_uppercase_name() {
        let err = Lexicon::new(vec![entry("Kiwi", Some(42.0))], BTreeMap::new()).unwrap_err();
        assert!(matches!(err, LexiconError::InvalidName(_)));
    }

    #[test]
    fn test_rejects_multi_hop_synonym() {
        let mut synonyms = BTreeMap::new();
        synonyms.insert("kiwis".to_string(), "kiwifruit".to_string());
        synonyms.insert("kiwifruit".to_string(), "kiwi".to_string());
        let err = Lexicon::new(vec![entry("kiwi", Some(42.0))], synonyms).unwrap_err();
        assert!(matches!(err, LexiconError::UnknownSynonymTarget { .. }));
    }

    #[test]
    fn test_rejects_shadowing_synonym() {
        let mut synonyms = BTreeMap::new();
        synonyms.insert("kiwi".to_string(), "lime".to_string());
        let err = Lexicon::new(
            vec![entry("kiwi", Some(42.0)), entry("lime", Some(20.0))],
            synonyms,
        )
        .unwrap_err();
        assert!(matches!(err, LexiconError::SynonymShadowsEntry(_)));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "entries": [
                {"name": "kiwi", "per_serving_kcal": 42, "per_100g_kcal": 61}
            ],
            "synonyms": {"kiwis": "kiwi"}
        }"#;
        let lexicon = Lexicon::from_json_str(json).unwrap();
        assert_eq!(lexicon.canonicalize("kiwis"), "kiwi");
        assert_eq!(lexicon.entry("kiwi").unwrap().per_100g_kcal, Some(61.0));
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            Lexicon::from_json_str("{\"entries\": 3}"),
            Err(LexiconError::Json(_))
        ));
        let json = r#"{"entries": [], "synonyms": {"kiwis": "kiwi"}}"#;
        assert!(matches!(
            Lexicon::from_json_str(json),
            Err(LexiconError::UnknownSynonymTarget { .. })
        ));
    }
}
