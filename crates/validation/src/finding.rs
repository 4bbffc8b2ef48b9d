use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use strum::{AsRefStr, Display};

use crate::day::DayName;
use crate::slot::MealFamily;

/// Whether a finding blocks the plan
#[derive(Display, AsRefStr, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Which stretch of the week a nutrition average covers
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MacroPeriod {
    Daily,
    Weekdays,
    Weekend,
}

impl fmt::Display for MacroPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroPeriod::Daily => write!(f, "daily average"),
            MacroPeriod::Weekdays => write!(f, "weekday average"),
            MacroPeriod::Weekend => write!(f, "weekend average"),
        }
    }
}

#[derive(Display, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Nutrient {
    Protein,
    Carbs,
    Fat,
}

/// One rule outcome, with the data needed to explain it
///
/// The rendered text is fed back to the plan generator as a correction, so every
/// message names the recipe, the day(s) and the number that was breached.
#[derive(AsRefStr, Clone, Debug, PartialEq)]
#[strum(serialize_all = "kebab-case")]
pub enum Finding {
    UnresolvedDay {
        recipe: String,
        day: String,
    },
    UnresolvedSourceDay {
        recipe: String,
        day: DayName,
        source_day: String,
    },
    CooldownViolation {
        recipe_id: String,
        recipe: String,
        family: Option<MealFamily>,
        first_day: DayName,
        second_day: DayName,
        gap: usize,
        required: u32,
    },
    HistoryCooldown {
        recipe_id: String,
        recipe: String,
        family: Option<MealFamily>,
        last_used: NaiveDate,
        day: DayName,
        gap: i64,
        required: u32,
    },
    BatchUndeclaredRepeat {
        recipe_id: String,
        recipe: String,
        days: Vec<DayName>,
    },
    BatchFirstIsLeftover {
        recipe: String,
        day: DayName,
    },
    BatchMissingFlag {
        recipe: String,
        day: DayName,
        first_day: DayName,
    },
    BatchMissingSource {
        recipe: String,
        day: DayName,
        expected: DayName,
    },
    BatchSourceMismatch {
        recipe: String,
        day: DayName,
        source_day: String,
        expected: DayName,
    },
    BatchFutureReference {
        recipe: String,
        day: DayName,
        source_day: DayName,
    },
    ServingsShortfall {
        recipe: String,
        first_day: DayName,
        cooked: u32,
        needed: u64,
    },
    SlotMismatch {
        recipe: String,
        day: String,
        assigned: String,
        allowed: Vec<String>,
    },
    MacroCaloriesLow {
        period: MacroPeriod,
        actual: f64,
        minimum: f64,
        target: f64,
        tolerance: f64,
    },
    MacroCaloriesHigh {
        period: MacroPeriod,
        actual: f64,
        maximum: f64,
        target: f64,
        tolerance: f64,
    },
    MacroSoftBand {
        nutrient: Nutrient,
        period: MacroPeriod,
        actual: f64,
        target: f64,
        tolerance: f64,
    },
    InsufficientNutritionData {
        known: usize,
        total: usize,
    },
}

impl Finding {
    pub fn severity(&self) -> Severity {
        match self {
            Finding::CooldownViolation { .. }
            | Finding::BatchUndeclaredRepeat { .. }
            | Finding::BatchFirstIsLeftover { .. }
            | Finding::BatchMissingFlag { .. }
            | Finding::BatchMissingSource { .. }
            | Finding::BatchSourceMismatch { .. }
            | Finding::BatchFutureReference { .. }
            | Finding::SlotMismatch { .. }
            | Finding::MacroCaloriesLow { .. }
            | Finding::MacroCaloriesHigh { .. } => Severity::Error,
            Finding::UnresolvedDay { .. }
            | Finding::UnresolvedSourceDay { .. }
            | Finding::HistoryCooldown { .. }
            | Finding::ServingsShortfall { .. }
            | Finding::MacroSoftBand { .. }
            | Finding::InsufficientNutritionData { .. } => Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    /// Stable kebab-case identifier, e.g. `"cooldown-violation"`
    pub fn kind(&self) -> &str {
        self.as_ref()
    }
}

fn family_label(family: &Option<MealFamily>) -> String {
    family
        .map(|family| family.to_string())
        .unwrap_or_else(|| "meal".to_string())
}

fn percent(tolerance: f64) -> String {
    format!("{:.0}%", tolerance * 100.0)
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::UnresolvedDay { recipe, day } => write!(
                f,
                "\"{recipe}\" is scheduled on unrecognised day \"{day}\"; its timing could not be validated"
            ),
            Finding::UnresolvedSourceDay {
                recipe,
                day,
                source_day,
            } => write!(
                f,
                "\"{recipe}\" on {day} references unrecognised batchCookSourceDay=\"{source_day}\""
            ),
            Finding::CooldownViolation {
                recipe,
                family,
                first_day,
                second_day,
                gap,
                required,
                ..
            } => write!(
                f,
                "\"{recipe}\" is used on {first_day} and {second_day}: {gap} days apart, requires {required} days between {} uses",
                family_label(family)
            ),
            Finding::HistoryCooldown {
                recipe,
                family,
                last_used,
                day,
                gap,
                required,
                ..
            } => write!(
                f,
                "\"{recipe}\" was last served on {last_used} and returns on {day}: {gap} days apart, the {} cooldown is {required} days",
                family_label(family)
            ),
            Finding::BatchUndeclaredRepeat { recipe, days, .. } => {
                let days = days
                    .iter()
                    .map(|day| day.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "\"{recipe}\" is used on {days} without batch cooking; choose different recipes or mark the later servings as leftovers of the first"
                )
            }
            Finding::BatchFirstIsLeftover { recipe, day } => write!(
                f,
                "\"{recipe}\" first appears on {day} but is marked as a leftover; the first occurrence must be the cooking day"
            ),
            Finding::BatchMissingFlag {
                recipe,
                day,
                first_day,
            } => write!(
                f,
                "\"{recipe}\" on {day} repeats the dish cooked on {first_day} but is not marked isLeftover=true with batchCookSourceDay=\"{first_day}\""
            ),
            Finding::BatchMissingSource {
                recipe,
                day,
                expected,
            } => write!(
                f,
                "\"{recipe}\" on {day} is a leftover without batchCookSourceDay; it should reference {expected}"
            ),
            Finding::BatchSourceMismatch {
                recipe,
                day,
                source_day,
                expected,
            } => write!(
                f,
                "\"{recipe}\" on {day} references batchCookSourceDay=\"{source_day}\" but should reference {expected}"
            ),
            Finding::BatchFutureReference {
                recipe,
                day,
                source_day,
            } => write!(
                f,
                "\"{recipe}\" on {day} cannot use leftovers from the future: {source_day} is not before {day}"
            ),
            Finding::ServingsShortfall {
                recipe,
                first_day,
                cooked,
                needed,
            } => write!(
                f,
                "\"{recipe}\" cooks {cooked} servings on {first_day} but {needed} servings are eaten across the week"
            ),
            Finding::SlotMismatch {
                recipe,
                day,
                assigned,
                allowed,
            } => write!(
                f,
                "\"{recipe}\" on {day} is assigned to {assigned} but is only suitable for: {}",
                allowed.join(", ")
            ),
            Finding::MacroCaloriesLow {
                period,
                actual,
                minimum,
                target,
                tolerance,
            } => write!(
                f,
                "Calories too low: {period} of {actual:.0} kcal is below the minimum of {minimum:.0} kcal ({target:.0} kcal target, ±{})",
                percent(*tolerance)
            ),
            Finding::MacroCaloriesHigh {
                period,
                actual,
                maximum,
                target,
                tolerance,
            } => write!(
                f,
                "Calories exceeded: {period} of {actual:.0} kcal is above the maximum of {maximum:.0} kcal ({target:.0} kcal target, ±{})",
                percent(*tolerance)
            ),
            Finding::MacroSoftBand {
                nutrient,
                period,
                actual,
                target,
                tolerance,
            } => {
                let direction = if actual > target { "above" } else { "below" };
                write!(
                    f,
                    "{nutrient} {direction} target: {period} of {actual:.0}g vs {target:.0}g (±{})",
                    percent(*tolerance)
                )
            }
            Finding::InsufficientNutritionData { known, total } => write!(
                f,
                "Only {known} of {total} cooked meals have nutrition data; macro targets were not checked"
            ),
        }
    }
}
