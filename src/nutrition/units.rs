//! Unit kinds and conversion constants
//!
//! The unit table lists the suffixes the journal parser recognises, in the
//! fixed order they are tried, together with the function that turns an
//! amount of that unit into calories.

use serde::{Deserialize, Serialize};

use super::lexicon::Lexicon;

// ============================================================================
// Conversion Constants
// ============================================================================

/// Grams per ounce
pub const G_PER_OZ: f64 = 28.3495;
/// Grams per pound
pub const G_PER_LB: f64 = 453.592;
/// Milliliters per cup, used when a food only has a per-volume value
pub const ML_PER_CUP: f64 = 240.0;
/// Flat calories per tablespoon (oil/butter approximation)
pub const KCAL_PER_TBSP: f64 = 120.0;
/// Flat calories per teaspoon (oil/butter approximation)
pub const KCAL_PER_TSP: f64 = 40.0;

/// A unit suffix recognised on a journal token ("150g", "1.5cups")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Grams,
    Millilitres,
    Ounces,
    Pounds,
    Cups,
    Tablespoons,
    Teaspoons,
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Grams => "g",
            UnitKind::Millilitres => "ml",
            UnitKind::Ounces => "oz",
            UnitKind::Pounds => "lb",
            UnitKind::Cups => "cup",
            UnitKind::Tablespoons => "tbsp",
            UnitKind::Teaspoons => "tsp",
        }
    }

    /// The table rule for this unit
    pub fn rule(&self) -> &'static UnitRule {
        match self {
            UnitKind::Grams => &UNIT_RULES[0],
            UnitKind::Millilitres => &UNIT_RULES[1],
            UnitKind::Ounces => &UNIT_RULES[2],
            UnitKind::Pounds => &UNIT_RULES[3],
            UnitKind::Cups => &UNIT_RULES[4],
            UnitKind::Tablespoons => &UNIT_RULES[5],
            UnitKind::Teaspoons => &UNIT_RULES[6],
        }
    }

    /// Convert an amount of this unit to calories for the given fragment foods
    pub fn to_kcal(&self, amount: f64, foods: &[String], lexicon: &Lexicon) -> Measurement {
        (self.rule().convert)(amount, foods, lexicon)
    }
}

/// Result of converting one unit mention
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub kcal: f64,
    /// Index into the fragment foods of the food the amount was measured
    /// against. `None` for flat-rate units and conversions that found nothing.
    pub food: Option<usize>,
}

impl Measurement {
    const NONE: Measurement = Measurement {
        kcal: 0.0,
        food: None,
    };

    fn of(food: usize, kcal: f64) -> Self {
        Self {
            kcal,
            food: Some(food),
        }
    }

    fn flat(kcal: f64) -> Self {
        Self { kcal, food: None }
    }
}

/// Converts `amount` of a unit into calories.
///
/// `foods` holds the fragment's canonicalised tokens in order; the conversion
/// picks the first one its table knows about.
pub type ConversionFn = fn(amount: f64, foods: &[String], lexicon: &Lexicon) -> Measurement;

/// One row of the unit table
#[derive(Debug)]
pub struct UnitRule {
    pub kind: UnitKind,
    /// Anchored regex for the amount-plus-suffix at the end of a token.
    /// Capture group 1 is the amount.
    pub pattern: &'static str,
    pub convert: ConversionFn,
}

/// Unit table in precedence order: the first rule matching a token wins.
/// `UnitKind::rule` indexes into it by position.
pub static UNIT_RULES: [UnitRule; 7] = [
    UnitRule {
        kind: UnitKind::Grams,
        pattern: r"(\d{2,4})g$",
        convert: grams_to_kcal,
    },
    UnitRule {
        kind: UnitKind::Millilitres,
        pattern: r"(\d{2,4})ml$",
        convert: ml_to_kcal,
    },
    UnitRule {
        kind: UnitKind::Ounces,
        pattern: r"(\d{1,3})oz$",
        convert: ounces_to_kcal,
    },
    UnitRule {
        kind: UnitKind::Pounds,
        pattern: r"(\d{1,3}(?:\.\d+)?)lb$",
        convert: pounds_to_kcal,
    },
    UnitRule {
        kind: UnitKind::Cups,
        pattern: r"(\d{1,3}(?:\.\d+)?)(?:cup|cups)$",
        convert: cups_to_kcal,
    },
    UnitRule {
        kind: UnitKind::Tablespoons,
        pattern: r"(\d{1,2})tbsp$",
        convert: tbsp_to_kcal,
    },
    UnitRule {
        kind: UnitKind::Teaspoons,
        pattern: r"(\d{1,2})tsp$",
        convert: tsp_to_kcal,
    },
];

// ============================================================================
// Conversion Functions
// ============================================================================

fn grams_to_kcal(grams: f64, foods: &[String], lexicon: &Lexicon) -> Measurement {
    lexicon
        .position_with(foods, |e| e.per_100g_kcal)
        .map(|(food, per_100g)| Measurement::of(food, per_100g * grams / 100.0))
        .unwrap_or(Measurement::NONE)
}

fn ml_to_kcal(ml: f64, foods: &[String], lexicon: &Lexicon) -> Measurement {
    lexicon
        .position_with(foods, |e| e.per_100ml_kcal)
        .map(|(food, per_100ml)| Measurement::of(food, per_100ml * ml / 100.0))
        .unwrap_or(Measurement::NONE)
}

fn ounces_to_kcal(oz: f64, foods: &[String], lexicon: &Lexicon) -> Measurement {
    grams_to_kcal(oz * G_PER_OZ, foods, lexicon)
}

fn pounds_to_kcal(lb: f64, foods: &[String], lexicon: &Lexicon) -> Measurement {
    grams_to_kcal(lb * G_PER_LB, foods, lexicon)
}

/// Cups go through the food's cup weight when it has a per-mass value,
/// otherwise through a 240 ml cup when it has a per-volume value.
fn cups_to_kcal(cups: f64, foods: &[String], lexicon: &Lexicon) -> Measurement {
    let found = foods
        .iter()
        .enumerate()
        .filter_map(|(i, food)| lexicon.entry(food).map(|e| (i, e)))
        .find(|(_, e)| e.cup_grams.is_some() || e.per_100ml_kcal.is_some());

    let Some((food, entry)) = found else {
        return Measurement::NONE;
    };

    if let (Some(cup_grams), Some(per_100g)) = (entry.cup_grams, entry.per_100g_kcal) {
        return Measurement::of(food, per_100g * cups * cup_grams / 100.0);
    }
    if let Some(per_100ml) = entry.per_100ml_kcal {
        return Measurement::of(food, per_100ml * cups * ML_PER_CUP / 100.0);
    }
    Measurement::NONE
}

fn tbsp_to_kcal(tbsp: f64, _foods: &[String], _lexicon: &Lexicon) -> Measurement {
    Measurement::flat(tbsp * KCAL_PER_TBSP)
}

fn tsp_to_kcal(tsp: f64, _foods: &[String], _lexicon: &Lexicon) -> Measurement {
    Measurement::flat(tsp * KCAL_PER_TSP)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foods(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_table_order() {
        let order: Vec<&str> = UNIT_RULES.iter().map(|r| r.kind.as_str()).collect();
        assert_eq!(order, vec!["g", "ml", "oz", "lb", "cup", "tbsp", "tsp"]);
    }

    #[test]
    fn test_rule_lookup_matches_every_kind() {
        for rule in &UNIT_RULES {
            assert_eq!(rule.kind.rule().kind, rule.kind);
        }
    }

    #[test]
    fn test_grams_use_first_per_100g_food() {
        let lexicon = Lexicon::builtin();
        // "milk" has no per-100g value, so rice is used
        let m = UnitKind::Grams.to_kcal(150.0, &foods(&["milk", "rice"]), &lexicon);
        assert!((m.kcal - 195.0).abs() < 1e-9);
        assert_eq!(m.food, Some(1));
    }

    #[test]
    fn test_grams_without_known_food() {
        let lexicon = Lexicon::builtin();
        let m = UnitKind::Grams.to_kcal(150.0, &foods(&["gravel"]), &lexicon);
        assert_eq!(m, Measurement::NONE);
    }

    #[test]
    fn test_ounces_and_pounds() {
        let lexicon = Lexicon::builtin();
        let oz = UnitKind::Ounces.to_kcal(6.0, &foods(&["chicken"]), &lexicon);
        assert!((oz.kcal - 165.0 * 6.0 * G_PER_OZ / 100.0).abs() < 1e-9);

        let lb = UnitKind::Pounds.to_kcal(0.5, &foods(&["beef"]), &lexicon);
        assert!((lb.kcal - 250.0 * 0.5 * G_PER_LB / 100.0).abs() < 1e-9);
        assert_eq!(lb.food, Some(0));
    }

    #[test]
    fn test_cups_by_weight() {
        let lexicon = Lexicon::builtin();
        // 1.5 cups rice = 292.5 g at 130 kcal/100g
        let m = UnitKind::Cups.to_kcal(1.5, &foods(&["rice"]), &lexicon);
        assert!((m.kcal - 380.25).abs() < 1e-9);
    }

    #[test]
    fn test_cups_fall_back_to_volume() {
        let lexicon = Lexicon::builtin();
        // milk has a cup weight but no per-100g value
        let m = UnitKind::Cups.to_kcal(1.0, &foods(&["milk"]), &lexicon);
        assert!((m.kcal - 42.0 * 2.4).abs() < 1e-9);
        assert_eq!(m.food, Some(0));
    }

    #[test]
    fn test_cups_with_cup_weight_only() {
        let lexicon = Lexicon::builtin();
        let m = UnitKind::Cups.to_kcal(1.0, &foods(&["cereal"]), &lexicon);
        assert_eq!(m, Measurement::NONE);
    }

    #[test]
    fn test_spoons_ignore_food() {
        let lexicon = Lexicon::builtin();
        assert_eq!(
            UnitKind::Tablespoons.to_kcal(2.0, &[], &lexicon),
            Measurement::flat(240.0)
        );
        assert_eq!(
            UnitKind::Teaspoons.to_kcal(3.0, &foods(&["rice"]), &lexicon),
            Measurement::flat(120.0)
        );
    }
}
