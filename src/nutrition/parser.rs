//! Journal text to calorie estimates
//!
//! `CalorieParser` runs segmentation, resolution and calorie aggregation over
//! a free-text entry and returns one `ParsedItem` per fragment. It never
//! fails: anything it cannot recognise degrades to a default estimate.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::lexicon::Lexicon;
use super::resolver::{resolve, Resolution};
use super::segmenter::segment;

/// Estimate for a fragment nothing in the lexicon matched
pub const DEFAULT_FRAGMENT_KCAL: f64 = 120.0;
/// Eggs assumed when "eggs" appears without a leading quantity
pub const DEFAULT_EGG_COUNT: f64 = 2.0;

const EGG: &str = "egg";
const EGG_FALLBACK_KCAL: f64 = 78.0;

static DEFAULT_PARSER: LazyLock<CalorieParser> = LazyLock::new(CalorieParser::default);

/// One recognised sub-item of a journal entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedItem {
    /// Fragment text, lower-cased
    pub label: String,
    pub calories: u32,
}

/// Parser bound to a lexicon
#[derive(Debug, Clone, Default)]
pub struct CalorieParser {
    lexicon: Lexicon,
}

impl CalorieParser {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Parse an entry into per-fragment estimates, in input order.
    /// Empty or whitespace-only text yields no items.
    pub fn parse(&self, text: &str) -> Vec<ParsedItem> {
        segment(text)
            .into_iter()
            .map(|fragment| {
                let calories = self.estimate(&fragment);
                ParsedItem {
                    label: fragment,
                    calories,
                }
            })
            .collect()
    }

    /// Calorie estimate for a single fragment
    pub fn estimate(&self, fragment: &str) -> u32 {
        let resolution = resolve(fragment);
        tracing::trace!(fragment, ?resolution, "Resolved journal fragment");

        if let Some(kcal) = resolution.explicit_kcal {
            return to_calories(kcal);
        }

        let foods: Vec<String> = resolution
            .remainder
            .iter()
            .map(|token| self.lexicon.canonicalize(token))
            .collect();

        let mut total = 0.0;
        let mut measured: Vec<&str> = Vec::new();

        for unit in &resolution.units {
            let measurement = unit.kind.to_kcal(unit.amount, &foods, &self.lexicon);
            total += measurement.kcal;
            if let Some(i) = measurement.food {
                measured.push(foods[i].as_str());
            }
        }

        // A food measured by a unit is not counted again per serving
        total += self.serving_kcal(&resolution, &foods, &measured);

        if total == 0.0 {
            total = match self.lexicon.first_with(&foods, |e| e.per_serving_kcal) {
                Some(kcal) => kcal,
                None => {
                    tracing::debug!(fragment, "No lexicon match, using default estimate");
                    DEFAULT_FRAGMENT_KCAL
                }
            };
        }

        to_calories(total)
    }

    /// Per-serving contributions of every known food token not in `measured`
    fn serving_kcal(&self, resolution: &Resolution, foods: &[String], measured: &[&str]) -> f64 {
        foods
            .iter()
            .filter(|food| !measured.contains(&food.as_str()))
            .map(|food| {
                if food == EGG {
                    let count = if resolution.explicit_quantity {
                        resolution.quantity
                    } else {
                        DEFAULT_EGG_COUNT
                    };
                    let per_egg = self.lexicon.per_serving(EGG).unwrap_or(EGG_FALLBACK_KCAL);
                    return per_egg * count;
                }
                self.lexicon
                    .per_serving(food)
                    .map(|kcal| kcal * resolution.quantity)
                    .unwrap_or(0.0)
            })
            .sum()
    }
}

/// Parse with the built-in lexicon
pub fn parse(text: &str) -> Vec<ParsedItem> {
    DEFAULT_PARSER.parse(text)
}

/// Round to the nearest whole calorie, never below zero
fn to_calories(kcal: f64) -> u32 {
    if !kcal.is_finite() || kcal <= 0.0 {
        return 0;
    }
    kcal.round().min(u32::MAX as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::lexicon::LexiconEntry;
    use crate::nutrition::units::G_PER_OZ;
    use std::collections::BTreeMap;

    fn single(text: &str) -> u32 {
        let items = parse(text);
        assert_eq!(items.len(), 1, "expected one item for {:?}", text);
        items[0].calories
    }

    #[test]
    fn test_empty_text() {
        assert!(parse("").is_empty());
        assert!(parse("  \n ").is_empty());
    }

    #[test]
    fn test_eggs_with_quantity() {
        assert_eq!(single("2 eggs"), 156);
        assert_eq!(single("3 eggs"), 234);
    }

    #[test]
    fn test_eggs_default_two() {
        assert_eq!(single("eggs"), 156);
        assert_eq!(single("egg"), 156);
    }

    #[test]
    fn test_explicit_kcal_wins() {
        assert_eq!(single("350 kcal snack"), 350);
        assert_eq!(single("2 bananas kcal 90"), 90);
    }

    #[test]
    fn test_grams() {
        assert_eq!(single("rice 150g"), 195);
        assert_eq!(single("150g rice"), 195);
    }

    #[test]
    fn test_unknown_text_defaults() {
        assert_eq!(single("gibberish zzz"), 120);
        let items = parse("gibberish zzz");
        assert_eq!(items[0].label, "gibberish zzz");
    }

    #[test]
    fn test_per_serving_with_quantity_and_synonyms() {
        assert_eq!(single("banana"), 105);
        assert_eq!(single("3 bananas"), 315);
        assert_eq!(single("yoghurt"), 150);
        assert_eq!(single("2 toast"), 160);
        assert_eq!(single("0.5 banana"), 53);
    }

    #[test]
    fn test_volume_and_imperial_units() {
        assert_eq!(single("milk 200ml"), 84);
        let chicken = (165.0 * 6.0 * G_PER_OZ / 100.0_f64).round() as u32;
        assert_eq!(single("chicken 6oz"), chicken);
        assert_eq!(single("steak 0.5lb"), 567);
        assert_eq!(single("rice 1.5cups"), 380);
        assert_eq!(single("milk 1cup"), 101);
    }

    #[test]
    fn test_spoons() {
        assert_eq!(single("olive oil 2tbsp"), 240);
        assert_eq!(single("butter 1tsp"), 40);
    }

    #[test]
    fn test_multiple_unit_tokens_add_up() {
        // 150g and 6oz of chicken are both counted
        let expected = (165.0 * 1.5 + 165.0 * 6.0 * G_PER_OZ / 100.0_f64).round() as u32;
        assert_eq!(single("chicken 150g 6oz"), expected);
    }

    #[test]
    fn test_flat_units_keep_servings() {
        // spoons measure no food, so the eggs still count
        assert_eq!(single("eggs 1tbsp butter"), 156 + 120);
        assert_eq!(single("2 toast 1tbsp butter"), 160 + 120);
    }

    #[test]
    fn test_unit_that_measures_nothing_keeps_quantity() {
        // eggs have no per-100g value, so the grams convert nothing
        assert_eq!(single("2 eggs 100g"), 156);
    }

    #[test]
    fn test_only_measured_food_loses_its_serving() {
        // rice is measured by grams; the banana still counts per serving
        assert_eq!(single("rice 150g banana"), 195 + 105);
    }

    #[test]
    fn test_unit_without_convertible_food_falls_back_to_serving() {
        // cereal has a cup weight but no per-100g or per-100ml value
        assert_eq!(single("cereal 1cup"), 200);
        assert_eq!(single("gravel 200g"), 120);
    }

    #[test]
    fn test_zero_quantity_falls_back() {
        assert_eq!(single("0 bananas"), 105);
    }

    #[test]
    fn test_order_and_labels() {
        let items = parse("Toast with 2tbsp butter, 2 Eggs");
        let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["toast", "2tbsp butter", "2 eggs"]);
        let calories: Vec<u32> = items.iter().map(|i| i.calories).collect();
        assert_eq!(calories, vec![80, 240, 156]);
    }

    #[test]
    fn test_segments_parse_independently() {
        let pairs = [
            ("2 eggs", "rice 150g"),
            ("350 kcal snack", "gibberish zzz"),
            ("milk 200ml", "3 bananas"),
        ];
        for (a, b) in pairs {
            let combined = parse(&format!("{}, {}", a, b));
            let mut separate = parse(a);
            separate.extend(parse(b));
            assert_eq!(combined, separate);
        }
    }

    #[test]
    fn test_never_zero_for_non_empty_fragment() {
        for text in ["x", "42", "and then", "--", "kcal"] {
            for item in parse(text) {
                assert!(item.calories > 0, "{:?} -> {:?}", text, item);
            }
        }
    }

    #[test]
    fn test_custom_lexicon() {
        let mut synonyms = BTreeMap::new();
        synonyms.insert("kiwis".to_string(), "kiwi".to_string());
        let lexicon = Lexicon::new(
            vec![LexiconEntry {
                name: "kiwi".to_string(),
                per_serving_kcal: Some(42.0),
                per_100g_kcal: Some(61.0),
                per_100ml_kcal: None,
                cup_grams: None,
            }],
            synonyms,
        )
        .unwrap();
        let parser = CalorieParser::new(lexicon);

        assert_eq!(parser.estimate("3 kiwis"), 126);
        assert_eq!(parser.estimate("kiwi 200g"), 122);
        // built-in foods are unknown to this lexicon
        assert_eq!(parser.estimate("banana"), 120);
    }

    #[test]
    fn test_to_calories_clamps() {
        assert_eq!(to_calories(-5.0), 0);
        assert_eq!(to_calories(f64::NAN), 0);
        assert_eq!(to_calories(12.5), 13);
    }
}
