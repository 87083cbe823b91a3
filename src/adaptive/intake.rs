//! Daily intake check

use serde::Serialize;

/// Totals under this (but above zero) are flagged as low
pub const LOW_INTAKE_KCAL: f64 = 1200.0;
/// Totals over this are flagged as high
pub const HIGH_INTAKE_KCAL: f64 = 3500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntakeStatus {
    Low,
    Normal,
    High,
}

impl IntakeStatus {
    pub fn classify(calories_today: f64) -> Self {
        if calories_today > 0.0 && calories_today < LOW_INTAKE_KCAL {
            IntakeStatus::Low
        } else if calories_today > HIGH_INTAKE_KCAL {
            IntakeStatus::High
        } else {
            IntakeStatus::Normal
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            IntakeStatus::Low => "Your calorie intake looks low. Consider consulting guidelines.",
            IntakeStatus::Normal => "Calorie intake is within expected range.",
            IntakeStatus::High => "Your calorie intake is high for today.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(IntakeStatus::classify(0.0), IntakeStatus::Normal);
        assert_eq!(IntakeStatus::classify(800.0), IntakeStatus::Low);
        assert_eq!(IntakeStatus::classify(1200.0), IntakeStatus::Normal);
        assert_eq!(IntakeStatus::classify(3500.0), IntakeStatus::Normal);
        assert_eq!(IntakeStatus::classify(3501.0), IntakeStatus::High);
    }
}
