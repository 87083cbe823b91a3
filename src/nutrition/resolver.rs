//! Quantity and unit resolution for a single journal fragment
//!
//! Precedence, evaluated once per fragment:
//! 1. an explicit "N kcal" / "kcal N" value ends resolution
//! 2. a leading number followed by whitespace is the quantity (default 1)
//! 3. each remaining token is matched against the unit table, first rule wins

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::units::{UnitKind, UNIT_RULES};

static EXPLICIT_KCAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(\d{2,4})\s*kcal)|(?:kcal\s*(\d{2,4}))").expect("kcal pattern is valid")
});

static LEADING_QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(\d+(?:\.\d+)?)\s+(.*)$").expect("quantity pattern is valid")
});

static UNIT_PATTERNS: LazyLock<Vec<(UnitKind, Regex)>> = LazyLock::new(|| {
    UNIT_RULES
        .iter()
        .map(|rule| {
            let re = Regex::new(rule.pattern).expect("unit pattern is valid");
            (rule.kind, re)
        })
        .collect()
});

/// A unit-suffixed token such as "150g"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitMention {
    pub kind: UnitKind,
    pub amount: f64,
    pub token: String,
}

/// What a fragment resolved to, before any calorie arithmetic
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    /// Literal calorie value; when set nothing else was resolved
    pub explicit_kcal: Option<f64>,
    /// Leading quantity, 1 when the fragment had none
    pub quantity: f64,
    /// Whether `quantity` came from the text
    pub explicit_quantity: bool,
    /// Whitespace tokens after the leading quantity, unmodified
    pub remainder: Vec<String>,
    /// Unit-suffixed tokens in fragment order
    pub units: Vec<UnitMention>,
}

impl Resolution {
    fn explicit(kcal: f64) -> Self {
        Self {
            explicit_kcal: Some(kcal),
            quantity: 1.0,
            explicit_quantity: false,
            remainder: Vec::new(),
            units: Vec::new(),
        }
    }
}

/// Resolve one lower-cased fragment
pub fn resolve(fragment: &str) -> Resolution {
    if let Some(kcal) = explicit_kcal(fragment) {
        return Resolution::explicit(kcal);
    }

    let (quantity, explicit_quantity, rest) = match LEADING_QUANTITY.captures(fragment) {
        Some(caps) => match caps[1].parse::<f64>() {
            Ok(qty) => (qty, true, caps.get(2).map_or("", |m| m.as_str())),
            Err(_) => (1.0, false, fragment),
        },
        None => (1.0, false, fragment),
    };

    let remainder: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
    let units = remainder.iter().filter_map(|token| match_unit(token)).collect();

    Resolution {
        explicit_kcal: None,
        quantity,
        explicit_quantity,
        remainder,
        units,
    }
}

/// Find an explicit calorie literal anywhere in the fragment
pub fn explicit_kcal(fragment: &str) -> Option<f64> {
    let caps = EXPLICIT_KCAL.captures(fragment)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Match a token against the unit table in precedence order
pub fn match_unit(token: &str) -> Option<UnitMention> {
    UNIT_PATTERNS.iter().find_map(|(kind, re)| {
        let caps = re.captures(token)?;
        let amount = caps[1].parse::<f64>().ok()?;
        Some(UnitMention {
            kind: *kind,
            amount,
            token: token.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_kcal_either_order() {
        assert_eq!(explicit_kcal("350 kcal snack"), Some(350.0));
        assert_eq!(explicit_kcal("snack kcal 350"), Some(350.0));
        assert_eq!(explicit_kcal("bar 220kcal"), Some(220.0));
        assert_eq!(explicit_kcal("snack"), None);
    }

    #[test]
    fn test_explicit_kcal_stops_resolution() {
        let r = resolve("2 rice 150g 350 kcal");
        assert_eq!(r.explicit_kcal, Some(350.0));
        assert!(r.units.is_empty());
        assert!(r.remainder.is_empty());
    }

    #[test]
    fn test_leading_quantity() {
        let r = resolve("2 eggs");
        assert_eq!(r.quantity, 2.0);
        assert!(r.explicit_quantity);
        assert_eq!(r.remainder, vec!["eggs"]);

        let r = resolve("1.5 bananas ripe");
        assert_eq!(r.quantity, 1.5);
        assert_eq!(r.remainder, vec!["bananas", "ripe"]);
    }

    #[test]
    fn test_no_leading_quantity() {
        let r = resolve("eggs");
        assert_eq!(r.quantity, 1.0);
        assert!(!r.explicit_quantity);

        // a number glued to its unit is not a leading quantity
        let r = resolve("150g rice");
        assert!(!r.explicit_quantity);
        assert_eq!(r.units.len(), 1);
    }

    #[test]
    fn test_unit_suffixes() {
        let cases = [
            ("150g", UnitKind::Grams, 150.0),
            ("200ml", UnitKind::Millilitres, 200.0),
            ("6oz", UnitKind::Ounces, 6.0),
            ("0.5lb", UnitKind::Pounds, 0.5),
            ("1.5cups", UnitKind::Cups, 1.5),
            ("2cup", UnitKind::Cups, 2.0),
            ("2tbsp", UnitKind::Tablespoons, 2.0),
            ("3tsp", UnitKind::Teaspoons, 3.0),
        ];
        for (token, kind, amount) in cases {
            let mention = match_unit(token).unwrap();
            assert_eq!(mention.kind, kind, "token {}", token);
            assert_eq!(mention.amount, amount, "token {}", token);
        }
    }

    #[test]
    fn test_unit_digit_widths() {
        // grams need at least two digits
        assert!(match_unit("5g").is_none());
        assert!(match_unit("rice").is_none());
        assert!(match_unit("2tbspx").is_none());
    }

    #[test]
    fn test_multiple_unit_tokens_are_all_kept() {
        let r = resolve("chicken 150g 6oz");
        let kinds: Vec<UnitKind> = r.units.iter().map(|u| u.kind).collect();
        assert_eq!(kinds, vec![UnitKind::Grams, UnitKind::Ounces]);
    }
}
