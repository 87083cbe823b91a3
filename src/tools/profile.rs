//! Profile MCP Tools
//!
//! Body metrics and the baseline calorie target.

use serde::Serialize;

use crate::adaptive::{basal_metabolic_rate, calculate_calorie_target, BodyMetrics, Sex};
use crate::db::Database;
use crate::models::{Goal, Profile, ProfileSet};

/// Profile with derived energy figures
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: Profile,
    pub bmr: i64,
    pub maintenance_calories: i64,
}

impl ProfileResponse {
    fn new(profile: Profile) -> Self {
        let metrics = profile.metrics();
        Self {
            bmr: basal_metabolic_rate(&metrics).round() as i64,
            maintenance_calories: calculate_calorie_target(&metrics),
            profile,
        }
    }
}

/// Input for set_profile
#[derive(Debug, Clone)]
pub struct SetProfileInput<'a> {
    pub age: u32,
    pub sex: &'a str,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub goal: Option<&'a str>,
    pub activity_level: Option<f64>,
    pub calorie_target: Option<i64>,
}

/// Sedentary activity factor
pub const DEFAULT_ACTIVITY_LEVEL: f64 = 1.2;

pub fn get_profile(db: &Database) -> Result<Option<ProfileResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = Profile::get(&conn).map_err(|e| format!("Failed to get profile: {}", e))?;
    Ok(profile.map(ProfileResponse::new))
}

/// Store the profile. Without an explicit target the Mifflin-St Jeor
/// maintenance estimate is used.
pub fn set_profile(db: &Database, input: &SetProfileInput) -> Result<ProfileResponse, String> {
    let sex = Sex::from_str(input.sex)
        .ok_or_else(|| format!("Invalid sex '{}', expected 'male' or 'female'", input.sex))?;
    let activity_level = input.activity_level.unwrap_or(DEFAULT_ACTIVITY_LEVEL);

    let calorie_target = match input.calorie_target {
        Some(target) => target,
        None => calculate_calorie_target(&BodyMetrics {
            age: input.age,
            sex,
            weight_kg: input.weight_kg,
            height_cm: input.height_cm,
            activity_level,
        }),
    };

    let data = ProfileSet {
        age: input.age,
        sex,
        weight_kg: input.weight_kg,
        height_cm: input.height_cm,
        goal: input.goal.map(Goal::from_str).unwrap_or(Goal::Maintain),
        activity_level,
        calorie_target,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = Profile::set(&conn, &data).map_err(|e| format!("Failed to set profile: {}", e))?;

    tracing::info!("Profile updated, calorie target {}", profile.calorie_target);
    Ok(ProfileResponse::new(profile))
}
