//! Runtime configuration
//!
//! Everything is read from the environment at startup.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::adaptive::DEFAULT_LOOKBACK_DAYS;
use crate::adaptive::engine::MIN_NET_DAYS;
use crate::nutrition::{Lexicon, LexiconError};

pub const DATABASE_PATH_VAR: &str = "CALJOURNAL_DATABASE_PATH";
pub const LOOKBACK_DAYS_VAR: &str = "CALJOURNAL_LOOKBACK_DAYS";
pub const LEXICON_PATH_VAR: &str = "CALJOURNAL_LEXICON_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read lexicon file {path}: {source}")]
    LexiconRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid lexicon file {path}: {source}")]
    LexiconInvalid {
        path: PathBuf,
        source: LexiconError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    pub lookback_days: u32,
    pub lexicon_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup(DATABASE_PATH_VAR)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let lookback_days = match lookup(LOOKBACK_DAYS_VAR) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(days) => normalize_lookback(days),
                Err(_) => {
                    tracing::warn!("Ignoring invalid {}={:?}", LOOKBACK_DAYS_VAR, raw);
                    DEFAULT_LOOKBACK_DAYS
                }
            },
            None => DEFAULT_LOOKBACK_DAYS,
        };

        let lexicon_path = lookup(LEXICON_PATH_VAR)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Self {
            database_path,
            lookback_days,
            lexicon_path,
        }
    }

    /// The configured lexicon, or the built-in one
    pub fn load_lexicon(&self) -> Result<Lexicon, ConfigError> {
        match &self.lexicon_path {
            Some(path) => load_lexicon_file(path),
            None => Ok(Lexicon::builtin()),
        }
    }
}

/// Raise short windows to the minimum usable span
pub fn normalize_lookback(days: u32) -> u32 {
    days.max(MIN_NET_DAYS as u32)
}

pub fn load_lexicon_file(path: &Path) -> Result<Lexicon, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::LexiconRead {
        path: path.to_path_buf(),
        source,
    })?;
    let lexicon = Lexicon::from_json_str(&json).map_err(|source| ConfigError::LexiconInvalid {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Loaded {} lexicon entries from {}", lexicon.len(), path.display());
    Ok(lexicon)
}

/// `<project root>/data/caljournal.db`, where the project root is the
/// executable's directory with any trailing `target/{debug,release}` removed
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(parent) = path.parent() {
            if let Some(grandparent) = parent.parent() {
                path = grandparent.to_path_buf();
            }
        }
    }

    path.push("data");
    path.push("caljournal.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.lookback_days, 14);
        assert!(cfg.lexicon_path.is_none());
        assert!(cfg.database_path.ends_with("data/caljournal.db"));
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            (DATABASE_PATH_VAR, "/tmp/journal.db"),
            (LOOKBACK_DAYS_VAR, "21"),
            (LEXICON_PATH_VAR, "/tmp/lexicon.json"),
        ]);
        assert_eq!(cfg.database_path, PathBuf::from("/tmp/journal.db"));
        assert_eq!(cfg.lookback_days, 21);
        assert_eq!(cfg.lexicon_path, Some(PathBuf::from("/tmp/lexicon.json")));
    }

    #[test]
    fn test_lookback_minimum_and_garbage() {
        assert_eq!(config(&[(LOOKBACK_DAYS_VAR, "3")]).lookback_days, 7);
        assert_eq!(config(&[(LOOKBACK_DAYS_VAR, "two weeks")]).lookback_days, 14);
    }

    #[test]
    fn test_builtin_lexicon_without_path() {
        let lexicon = config(&[]).load_lexicon().unwrap();
        assert!(lexicon.entry("rice").is_some());
    }

    #[test]
    fn test_missing_lexicon_file() {
        let cfg = config(&[(LEXICON_PATH_VAR, "/nonexistent/caljournal/lexicon.json")]);
        assert!(matches!(cfg.load_lexicon(), Err(ConfigError::LexiconRead { .. })));
    }

    #[test]
    fn test_lexicon_file_roundtrip() {
        let path = std::env::temp_dir()
            .join(format!("caljournal-lexicon-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"entries":[{"name":"kiwi","per_serving_kcal":42.0}],"synonyms":{"kiwis":"kiwi"}}"#,
        )
        .unwrap();

        let lexicon = load_lexicon_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(lexicon.per_serving("kiwi"), Some(42.0));
        assert_eq!(lexicon.canonicalize("kiwis"), "kiwi");
    }
}
