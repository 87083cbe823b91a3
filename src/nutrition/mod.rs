//! Nutrition parsing module
//!
//! Turns free-text food journal entries into calorie estimates.

pub mod catalog;
pub mod lexicon;
pub mod parser;
pub mod resolver;
pub mod segmenter;
pub mod units;

pub use catalog::{search, CatalogItem, FOOD_CATALOG};
pub use lexicon::{Lexicon, LexiconData, LexiconEntry, LexiconError};
pub use parser::{parse, CalorieParser, ParsedItem, DEFAULT_FRAGMENT_KCAL};
pub use resolver::{resolve, Resolution, UnitMention};
pub use segmenter::segment;
pub use units::{Measurement, UnitKind, UnitRule, UNIT_RULES};
