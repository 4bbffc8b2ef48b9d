//! Acceptance checks for generated weekly meal plans
//!
//! A candidate schedule is judged against recipe cooldowns, batch-cooking
//! chronology, meal-slot eligibility and macro-nutrient targets. Judging is a
//! pure function over in-memory data: no I/O, no shared state.

pub mod batch;
pub mod compatibility;
pub mod context;
pub mod cooldown;
pub mod day;
pub mod engine;
pub mod error;
pub mod finding;
pub mod macros;
pub mod rule;
pub mod slot;
pub mod types;

pub use context::{PlanContext, RecipeGroup};
pub use day::{DayName, day_index, parse_week_start};
pub use engine::{ValidationResult, validate};
pub use error::ValidationError;
pub use finding::{Finding, MacroPeriod, Nutrient, Severity};
pub use macros::{MacroCheck, MacroSkipReason};
pub use rule::{PlanRule, RuleReport};
pub use slot::{MealFamily, normalize_slot};
pub use types::{
    CooldownSettings, MacroMode, NutritionProfile, PlanSettings, RecipeNutrition,
    RecipeSlotCatalog, ScheduledMeal, UsageHistoryEntry, ValidationOptions,
};
