use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::error::ValidationError;
use crate::slot::MealFamily;

/// One cell of a candidate weekly plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduledMeal {
    /// Day name as written by the generator ("Tuesday")
    pub day: String,
    /// Meal-slot type ("breakfast", "afternoon-snack", ...)
    pub meal_type: String,
    #[serde(default)]
    pub recipe_id: Option<String>,
    #[serde(default)]
    pub recipe_name: Option<String>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Reheated food cooked on an earlier day
    #[serde(default, alias = "isLeftover")]
    pub is_leftover: bool,
    /// Day whose cooking produced this leftover
    #[serde(default, alias = "batchCookSourceDay", alias = "batch_cook_source_day")]
    pub source_day: Option<String>,
}

impl ScheduledMeal {
    pub fn new(day: &str, meal_type: &str, recipe_id: &str) -> Self {
        Self {
            day: day.to_string(),
            meal_type: meal_type.to_string(),
            recipe_id: Some(recipe_id.to_string()),
            ..Default::default()
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.recipe_name = Some(name.to_string());
        self
    }

    pub fn with_servings(mut self, servings: u32) -> Self {
        self.servings = Some(servings);
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    /// Mark as a leftover of the dish cooked on `source_day`
    pub fn leftover_from(mut self, source_day: &str) -> Self {
        self.is_leftover = true;
        self.source_day = Some(source_day.to_string());
        self
    }

    /// Human-readable label used in findings
    pub fn display_name(&self) -> &str {
        self.recipe_name
            .as_deref()
            .or(self.recipe_id.as_deref())
            .unwrap_or("Unnamed meal")
    }

    pub fn family(&self) -> Option<MealFamily> {
        MealFamily::of(&self.meal_type)
    }

    /// Whether the free-text note declares batch cooking or leftovers
    pub fn notes_mention_batch(&self) -> bool {
        const KEYWORDS: [&str; 6] = [
            "batch",
            "leftover",
            "left over",
            "left-over",
            "reheat",
            "cook once",
        ];

        self.notes
            .as_deref()
            .map(|notes| {
                let notes = notes.to_ascii_lowercase();
                KEYWORDS.iter().any(|keyword| notes.contains(keyword))
            })
            .unwrap_or(false)
    }
}

/// A recipe use recorded before the candidate week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageHistoryEntry {
    pub recipe_id: String,
    pub used_on: NaiveDate,
    #[serde(default)]
    pub meal_type: String,
}

/// Minimum days between two cooked uses of a recipe, per meal family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CooldownSettings {
    pub dinner_days: u32,
    pub lunch_days: u32,
    pub breakfast_days: u32,
    pub snack_days: u32,
}

impl Default for CooldownSettings {
    fn default() -> Self {
        Self {
            dinner_days: 14,
            lunch_days: 7,
            breakfast_days: 3,
            snack_days: 2,
        }
    }
}

impl CooldownSettings {
    /// Cooldown for a family; slot types outside the four families use the
    /// dinner cooldown
    pub fn for_family(&self, family: Option<MealFamily>) -> u32 {
        match family {
            Some(MealFamily::Breakfast) => self.breakfast_days,
            Some(MealFamily::Lunch) => self.lunch_days,
            Some(MealFamily::Snack) => self.snack_days,
            Some(MealFamily::Dinner) | None => self.dinner_days,
        }
    }
}

/// How tightly the plan's nutrition must follow the profile targets
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
    Default,
    PartialEq,
    Eq,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum MacroMode {
    Strict,
    #[default]
    Balanced,
    /// Tight on Monday to Friday, relaxed at the weekend
    WeekdayDiscipline,
    /// Flat daily band; weekday deficits are expected to offset weekend surplus
    CalorieBanking,
}

impl MacroMode {
    /// Parse a configured mode, accepting `-` or `_` as word separators
    pub fn from_setting(value: &str) -> Result<Self, ValidationError> {
        value
            .trim()
            .replace('-', "_")
            .parse()
            .map_err(|_| ValidationError::UnknownMacroMode(value.to_string()))
    }

    /// Accepted fractional deviation from target for a weekday or weekend day
    pub fn tolerance(self, weekend: bool) -> f64 {
        match self {
            MacroMode::Strict => 0.05,
            MacroMode::Balanced => 0.10,
            MacroMode::WeekdayDiscipline if weekend => 0.25,
            MacroMode::WeekdayDiscipline => 0.05,
            MacroMode::CalorieBanking => 0.15,
        }
    }
}

/// Per-user planning configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanSettings {
    pub cooldowns: CooldownSettings,
    pub macro_mode: MacroMode,
    /// Most important first
    pub priorities: Vec<String>,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            cooldowns: CooldownSettings::default(),
            macro_mode: MacroMode::default(),
            priorities: vec!["variety".to_string(), "cost".to_string()],
        }
    }
}

impl PlanSettings {
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether "macros" is among the three highest priorities
    pub fn prioritizes_macros(&self) -> bool {
        self.priorities
            .iter()
            .take(3)
            .any(|priority| priority.trim().eq_ignore_ascii_case("macros"))
    }
}

/// Daily nutrition targets for one household member
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionProfile {
    pub name: Option<String>,
    pub daily_calories: f64,
    pub daily_protein_g: f64,
    pub daily_carbs_g: f64,
    pub daily_fat_g: f64,
    pub tracking_enabled: bool,
}

impl NutritionProfile {
    /// Tracking is on and there is a calorie or protein target to track
    pub fn is_trackable(&self) -> bool {
        self.tracking_enabled && (self.daily_calories > 0.0 || self.daily_protein_g > 0.0)
    }
}

/// Per-serving nutrition of a recipe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeNutrition {
    pub recipe_id: String,
    pub calories: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fat_g: f64,
}

/// Recipe id to the meal-slot types the recipe may fill
pub type RecipeSlotCatalog = HashMap<String, Vec<String>>;

fn default_true() -> bool {
    true
}

/// Optional inputs and switches for a validation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Families allowed to repeat freely (e.g. the same breakfast every day)
    pub exempt_families: Vec<MealFamily>,
    /// Pre-packaged products grabbed from the pantry rather than cooked
    pub product_recipe_ids: Vec<String>,
    pub nutrition_profiles: Vec<NutritionProfile>,
    pub recipe_nutrition: Vec<RecipeNutrition>,
    /// A dinner recipe may fill a lunch slot (never the reverse)
    pub allow_dinner_for_lunch: bool,
    #[serde(default = "default_true")]
    pub check_meal_slots: bool,
    #[serde(default = "default_true")]
    pub check_macros: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            exempt_families: Vec::new(),
            product_recipe_ids: Vec::new(),
            nutrition_profiles: Vec::new(),
            recipe_nutrition: Vec::new(),
            allow_dinner_for_lunch: false,
            check_meal_slots: true,
            check_macros: true,
        }
    }
}

/// Parse configured family names
pub fn parse_families(values: &[String]) -> Result<Vec<MealFamily>, ValidationError> {
    values
        .iter()
        .map(|value| {
            MealFamily::of(value)
                .ok_or_else(|| ValidationError::UnknownMealFamily(value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macros_priority_must_be_in_top_three() {
        let mut settings = PlanSettings {
            priorities: vec!["variety".into(), "Macros".into(), "cost".into()],
            ..Default::default()
        };
        assert!(settings.prioritizes_macros());

        settings.priorities = vec![
            "variety".into(),
            "cost".into(),
            "time".into(),
            "macros".into(),
        ];
        assert!(!settings.prioritizes_macros());
    }

    #[test]
    fn test_macro_mode_from_setting() {
        assert_eq!(
            MacroMode::from_setting("weekday-discipline").unwrap(),
            MacroMode::WeekdayDiscipline
        );
        assert_eq!(
            MacroMode::from_setting("CALORIE_BANKING").unwrap(),
            MacroMode::CalorieBanking
        );
        assert!(MacroMode::from_setting("keto").is_err());
    }

    #[test]
    fn test_tolerance_bands() {
        assert_eq!(MacroMode::Strict.tolerance(true), 0.05);
        assert_eq!(MacroMode::Balanced.tolerance(false), 0.10);
        assert_eq!(MacroMode::WeekdayDiscipline.tolerance(false), 0.05);
        assert_eq!(MacroMode::WeekdayDiscipline.tolerance(true), 0.25);
        assert_eq!(MacroMode::CalorieBanking.tolerance(true), 0.15);
    }

    #[test]
    fn test_cooldown_for_unknown_family_uses_dinner() {
        let cooldowns = CooldownSettings::default();
        assert_eq!(cooldowns.for_family(None), cooldowns.dinner_days);
        assert_eq!(cooldowns.for_family(Some(MealFamily::Snack)), 2);
    }

    #[test]
    fn test_notes_mention_batch() {
        let meal = ScheduledMeal::new("Monday", "dinner", "r1").with_notes("Double BATCH for Wed");
        assert!(meal.notes_mention_batch());

        let meal = ScheduledMeal::new("Monday", "dinner", "r1").with_notes("Serve with rice");
        assert!(!meal.notes_mention_batch());
    }

    #[test]
    fn test_scheduled_meal_accepts_camel_case_leftover_fields() {
        let json = r#"{
            "day": "Thursday",
            "meal_type": "dinner",
            "recipe_id": "chili",
            "isLeftover": true,
            "batchCookSourceDay": "Tuesday"
        }"#;
        let meal: ScheduledMeal = serde_json::from_str(json).unwrap();
        assert!(meal.is_leftover);
        assert_eq!(meal.source_day.as_deref(), Some("Tuesday"));
    }

    #[test]
    fn test_options_default_enable_optional_checks() {
        let options: ValidationOptions = serde_json::from_str("{}").unwrap();
        assert!(options.check_meal_slots);
        assert!(options.check_macros);
        assert!(!options.allow_dinner_for_lunch);
    }

    #[test]
    fn test_parse_families() {
        let families = parse_families(&["Breakfast".into(), "dessert".into()]).unwrap();
        assert_eq!(families, vec![MealFamily::Breakfast, MealFamily::Snack]);
        assert!(parse_families(&["brunch".into()]).is_err());
    }
}
