use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// Meal-slot family used for cooldown lengths, exemptions and nutrition coverage
#[derive(
    EnumString,
    Display,
    AsRefStr,
    VariantArray,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum MealFamily {
    Breakfast,
    Lunch,
    Dinner,
    /// Snacks and desserts
    Snack,
}

impl MealFamily {
    /// Family of a free-text meal-slot type, if it belongs to one
    pub fn of(meal_type: &str) -> Option<Self> {
        match normalize_slot(meal_type).as_str() {
            "breakfast" => Some(MealFamily::Breakfast),
            "lunch" => Some(MealFamily::Lunch),
            "dinner" | "supper" | "main-course" => Some(MealFamily::Dinner),
            "snack" | "dessert" => Some(MealFamily::Snack),
            _ => None,
        }
    }

    /// Share of a full day's nutrition this family accounts for when no snack
    /// family is present in the plan
    pub fn base_share(self) -> f64 {
        match self {
            MealFamily::Breakfast => 0.25,
            MealFamily::Lunch => 0.35,
            MealFamily::Dinner => 0.40,
            MealFamily::Snack => 0.20,
        }
    }
}

/// Canonical form of a meal-slot name
///
/// Cosmetic variants collapse onto one name: `"Afternoon Snack"`,
/// `"evening_snack"` and `"snacks"` all become `"snack"`.
pub fn normalize_slot(slot: &str) -> String {
    let slot = slot
        .trim()
        .to_ascii_lowercase()
        .replace(['_', ' '], "-");

    match slot.as_str() {
        "afternoon-snack" | "evening-snack" | "morning-snack" | "late-night-snack"
        | "snacks" => "snack".to_string(),
        "desserts" => "dessert".to_string(),
        "breakfasts" => "breakfast".to_string(),
        "lunches" => "lunch".to_string(),
        "dinners" => "dinner".to_string(),
        "main" | "main-courses" | "maincourse" => "main-course".to_string(),
        _ => slot,
    }
}
