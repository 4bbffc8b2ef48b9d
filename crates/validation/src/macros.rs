use std::collections::{BTreeSet, HashMap};
use std::ops::{Add, AddAssign};

use serde::Serialize;

use crate::context::PlanContext;
use crate::day::DAYS_IN_WEEK;
use crate::finding::{Finding, MacroPeriod, Nutrient};
use crate::rule::RuleReport;
use crate::slot::MealFamily;
use crate::types::{MacroMode, NutritionProfile, RecipeNutrition};

/// Share of daily nutrition left to the main meals once snacks are planned
const MAIN_MEALS_SHARE_WITH_SNACKS: f64 = 0.8;

const WEEKDAYS: f64 = 5.0;
const WEEKEND_DAYS: f64 = 2.0;

/// Why macro validation did not judge the plan
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum MacroSkipReason {
    /// Turned off in the validation options
    Disabled,
    /// "macros" is not among the top three priorities
    NotPrioritized,
    /// No profile tracks a calorie or protein target
    NoTrackedProfile,
    /// No cooked meal falls in a known meal family
    NoCoverage,
    /// Fewer than half of the cooked meals have nutrition data
    InsufficientData { known: usize, total: usize },
}

/// Outcome of the macro pre-check and, when applicable, the comparison
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum MacroCheck {
    Skipped(MacroSkipReason),
    Checked {
        /// Fraction of a full day's nutrition the plan accounts for
        coverage: f64,
        passed: bool,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl NutritionTotals {
    fn from_profile(profile: &NutritionProfile) -> Self {
        Self {
            calories: profile.daily_calories,
            protein_g: profile.daily_protein_g,
            carbs_g: profile.daily_carbs_g,
            fat_g: profile.daily_fat_g,
        }
    }

    fn scaled(self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein_g: self.protein_g * factor,
            carbs_g: self.carbs_g * factor,
            fat_g: self.fat_g * factor,
        }
    }
}

impl Add for NutritionTotals {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein_g: self.protein_g + other.protein_g,
            carbs_g: self.carbs_g + other.carbs_g,
            fat_g: self.fat_g + other.fat_g,
        }
    }
}

impl AddAssign<&RecipeNutrition> for NutritionTotals {
    fn add_assign(&mut self, recipe: &RecipeNutrition) {
        self.calories += recipe.calories;
        self.protein_g += recipe.protein_g;
        self.carbs_g += recipe.carbs_g;
        self.fat_g += recipe.fat_g;
    }
}

/// Fraction of a day's nutrition covered by the planned meal families
///
/// Breakfast, lunch and dinner carry 25/35/40%. When any snack family is
/// planned those shares shrink to 80% of their value and snacks take 20%.
pub fn coverage_fraction(families: &BTreeSet<MealFamily>) -> f64 {
    let has_snacks = families.contains(&MealFamily::Snack);
    let main_scale = if has_snacks {
        MAIN_MEALS_SHARE_WITH_SNACKS
    } else {
        1.0
    };

    families
        .iter()
        .map(|family| match family {
            MealFamily::Snack => family.base_share(),
            _ => family.base_share() * main_scale,
        })
        .sum()
}

/// Pick the profile macro validation is judged against, or say why it is skipped
pub fn applicability<'a>(ctx: &PlanContext<'a>) -> Result<&'a NutritionProfile, MacroSkipReason> {
    if !ctx.options.check_macros {
        return Err(MacroSkipReason::Disabled);
    }
    if !ctx.settings.prioritizes_macros() {
        return Err(MacroSkipReason::NotPrioritized);
    }

    ctx.options
        .nutrition_profiles
        .iter()
        .find(|profile| profile.is_trackable())
        .ok_or(MacroSkipReason::NoTrackedProfile)
}

/// Aggregate the plan's nutrition and compare it with the scaled targets
pub fn evaluate(ctx: &PlanContext<'_>) -> (MacroCheck, RuleReport) {
    let mut report = RuleReport::default();

    let profile = match applicability(ctx) {
        Ok(profile) => profile,
        Err(reason) => {
            report.note(format!("macros: skipped ({reason:?})"));
            return (MacroCheck::Skipped(reason), report);
        }
    };

    // Slots outside the known families carry no coverage share, so their
    // nutrition stays out of the totals too
    let cooked: Vec<usize> = (0..ctx.meals.len())
        .filter(|&index| {
            let meal = ctx.meal(index);
            !meal.is_leftover && meal.family().is_some() && ctx.day_index(index).is_some()
        })
        .collect();

    let families: BTreeSet<MealFamily> = cooked
        .iter()
        .filter_map(|&index| ctx.meal(index).family())
        .collect();
    let coverage = coverage_fraction(&families);
    if coverage <= 0.0 {
        report.note("macros: no cooked meals in a known meal family");
        return (MacroCheck::Skipped(MacroSkipReason::NoCoverage), report);
    }

    let nutrition: HashMap<&str, &RecipeNutrition> = ctx
        .options
        .recipe_nutrition
        .iter()
        .map(|recipe| (recipe.recipe_id.as_str(), recipe))
        .collect();

    let mut weekdays = NutritionTotals::default();
    let mut weekend = NutritionTotals::default();
    let mut known = 0;

    for &index in &cooked {
        let Some(recipe) = ctx
            .meal(index)
            .recipe_id
            .as_deref()
            .and_then(|recipe_id| nutrition.get(recipe_id))
        else {
            continue;
        };
        known += 1;

        let is_weekend = ctx.day_name(index).is_some_and(|day| day.is_weekend());
        if is_weekend {
            weekend += *recipe;
        } else {
            weekdays += *recipe;
        }
    }

    if known * 2 < cooked.len() {
        report.push(Finding::InsufficientNutritionData {
            known,
            total: cooked.len(),
        });
        let reason = MacroSkipReason::InsufficientData {
            known,
            total: cooked.len(),
        };
        return (MacroCheck::Skipped(reason), report);
    }

    let targets = NutritionTotals::from_profile(profile).scaled(coverage);
    let mode = ctx.settings.macro_mode;
    report.note(format!(
        "macros: mode {mode}, coverage {:.0}%, {known}/{} meals with nutrition",
        coverage * 100.0,
        cooked.len()
    ));

    match mode {
        MacroMode::WeekdayDiscipline => {
            compare(
                MacroPeriod::Weekdays,
                weekdays.scaled(1.0 / WEEKDAYS),
                targets,
                mode.tolerance(false),
                &mut report,
            );
            compare(
                MacroPeriod::Weekend,
                weekend.scaled(1.0 / WEEKEND_DAYS),
                targets,
                mode.tolerance(true),
                &mut report,
            );
        }
        // Calorie banking only checks the flat daily band, not a weekly balance
        MacroMode::Strict | MacroMode::Balanced | MacroMode::CalorieBanking => {
            let total = weekdays + weekend;

            compare(
                MacroPeriod::Daily,
                total.scaled(1.0 / DAYS_IN_WEEK as f64),
                targets,
                mode.tolerance(false),
                &mut report,
            );
        }
    }

    let passed = report.is_valid();
    (MacroCheck::Checked { coverage, passed }, report)
}

fn compare(
    period: MacroPeriod,
    actual: NutritionTotals,
    target: NutritionTotals,
    tolerance: f64,
    report: &mut RuleReport,
) {
    if target.calories > 0.0 {
        let minimum = target.calories * (1.0 - tolerance);
        let maximum = target.calories * (1.0 + tolerance);

        if actual.calories > maximum {
            report.push(Finding::MacroCaloriesHigh {
                period,
                actual: actual.calories,
                maximum,
                target: target.calories,
                tolerance,
            });
        } else if actual.calories < minimum {
            report.push(Finding::MacroCaloriesLow {
                period,
                actual: actual.calories,
                minimum,
                target: target.calories,
                tolerance,
            });
        }
    }

    let soft = [
        (Nutrient::Protein, actual.protein_g, target.protein_g),
        (Nutrient::Carbs, actual.carbs_g, target.carbs_g),
        (Nutrient::Fat, actual.fat_g, target.fat_g),
    ];
    for (nutrient, actual, target) in soft {
        if target <= 0.0 {
            continue;
        }
        if (actual - target).abs() > target * tolerance {
            report.push(Finding::MacroSoftBand {
                nutrient,
                period,
                actual,
                target,
                tolerance,
            });
        }
    }
}
