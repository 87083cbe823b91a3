//! Baseline calorie target
//!
//! Mifflin-St Jeor resting energy scaled by an activity factor.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Sex::Male),
            "female" | "f" => Some(Sex::Female),
            _ => None,
        }
    }

    /// Mifflin-St Jeor sex constant
    fn bmr_offset(&self) -> f64 {
        match self {
            Sex::Male => 5.0,
            Sex::Female => -161.0,
        }
    }
}

/// Inputs for the baseline calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyMetrics {
    pub age: u32,
    pub sex: Sex,
    pub weight_kg: f64,
    pub height_cm: f64,
    /// Activity multiplier, 1.2 (sedentary) to 1.9 (very active)
    pub activity_level: f64,
}

/// Resting metabolic rate in kcal/day
pub fn basal_metabolic_rate(metrics: &BodyMetrics) -> f64 {
    10.0 * metrics.weight_kg + 6.25 * metrics.height_cm - 5.0 * f64::from(metrics.age)
        + metrics.sex.bmr_offset()
}

/// Daily calorie target: BMR times activity factor, rounded
pub fn calculate_calorie_target(metrics: &BodyMetrics) -> i64 {
    (basal_metabolic_rate(metrics) * metrics.activity_level).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_male_target() {
        let metrics = BodyMetrics {
            age: 30,
            sex: Sex::Male,
            weight_kg: 80.0,
            height_cm: 180.0,
            activity_level: 1.55,
        };
        // 800 + 1125 - 150 + 5 = 1780
        assert!((basal_metabolic_rate(&metrics) - 1780.0).abs() < 1e-9);
        assert_eq!(calculate_calorie_target(&metrics), 2759);
    }

    #[test]
    fn test_female_target() {
        let metrics = BodyMetrics {
            age: 40,
            sex: Sex::Female,
            weight_kg: 65.0,
            height_cm: 165.0,
            activity_level: 1.2,
        };
        // 650 + 1031.25 - 200 - 161 = 1320.25
        assert_eq!(calculate_calorie_target(&metrics), 1584);
    }

    #[test]
    fn test_sex_from_str() {
        assert_eq!(Sex::from_str("Male"), Some(Sex::Male));
        assert_eq!(Sex::from_str("f"), Some(Sex::Female));
        assert_eq!(Sex::from_str("other"), None);
    }
}
