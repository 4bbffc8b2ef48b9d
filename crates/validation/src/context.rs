use std::collections::HashMap;

use chrono::NaiveDate;

use crate::day::{self, DayName};
use crate::finding::Finding;
use crate::slot::MealFamily;
use crate::types::{
    PlanSettings, RecipeSlotCatalog, ScheduledMeal, UsageHistoryEntry, ValidationOptions,
};

/// Every resolved occurrence of one recipe, in chronological order
///
/// Members are indices into the plan's meal list; the meals themselves are never
/// copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeGroup {
    pub recipe_id: String,
    pub members: Vec<usize>,
}

impl RecipeGroup {
    pub fn first(&self) -> usize {
        self.members[0]
    }

    pub fn is_repeated(&self) -> bool {
        self.members.len() >= 2
    }
}

/// Read-only view of one validation run shared by all rules
pub struct PlanContext<'a> {
    pub meals: &'a [ScheduledMeal],
    pub settings: &'a PlanSettings,
    pub week_start: NaiveDate,
    pub history: &'a [UsageHistoryEntry],
    pub recipe_slots: Option<&'a RecipeSlotCatalog>,
    pub options: &'a ValidationOptions,
    days: Vec<Option<usize>>,
    groups: Vec<RecipeGroup>,
}

impl<'a> PlanContext<'a> {
    pub fn new(
        meals: &'a [ScheduledMeal],
        settings: &'a PlanSettings,
        week_start: NaiveDate,
        history: &'a [UsageHistoryEntry],
        recipe_slots: Option<&'a RecipeSlotCatalog>,
        options: &'a ValidationOptions,
    ) -> Self {
        let days: Vec<Option<usize>> = meals
            .iter()
            .map(|meal| day::day_index(&meal.day, week_start))
            .collect();
        let groups = group_by_recipe(meals, &days);

        Self {
            meals,
            settings,
            week_start,
            history,
            recipe_slots,
            options,
            days,
            groups,
        }
    }

    pub fn meal(&self, index: usize) -> &'a ScheduledMeal {
        &self.meals[index]
    }

    /// Chronological position of a meal, `None` when its day name is unknown
    pub fn day_index(&self, index: usize) -> Option<usize> {
        self.days[index]
    }

    /// Canonical day name of a meal whose day resolved
    pub fn day_name(&self, index: usize) -> Option<DayName> {
        self.days[index].map(|position| day::day_at(self.week_start, position))
    }

    /// Day label for messages; falls back to the raw text
    pub fn day_label(&self, index: usize) -> String {
        self.day_name(index)
            .map(|day| day.to_string())
            .unwrap_or_else(|| self.meals[index].day.clone())
    }

    pub fn groups(&self) -> &[RecipeGroup] {
        &self.groups
    }

    /// Warnings for meals whose day cannot be placed in the week
    pub fn unresolved_days(&self) -> Vec<Finding> {
        self.meals
            .iter()
            .zip(&self.days)
            .filter(|(_, position)| position.is_none())
            .map(|(meal, _)| Finding::UnresolvedDay {
                recipe: meal.display_name().to_string(),
                day: meal.day.clone(),
            })
            .collect()
    }

    /// Whether a pantry product or an exempt family puts a recipe's repeats
    /// outside the cooldown and batch-cooking rules
    pub fn is_exempt(&self, group: &RecipeGroup) -> bool {
        if self
            .options
            .product_recipe_ids
            .iter()
            .any(|id| *id == group.recipe_id)
        {
            return true;
        }

        !self.options.exempt_families.is_empty()
            && group.members.iter().all(|&index| {
                self.meals[index]
                    .family()
                    .is_some_and(|family| self.options.exempt_families.contains(&family))
            })
    }

    /// Recipe group a resolved meal belongs to
    pub fn group_of(&self, index: usize) -> Option<&RecipeGroup> {
        self.groups
            .iter()
            .find(|group| group.members.contains(&index))
    }

    /// Whether a single meal falls under an exemption
    ///
    /// Exemption belongs to the recipe group, so a breakfast leftover of a
    /// dinner recipe is not exempt. Ungrouped meals are judged on their own.
    pub fn is_meal_exempt(&self, index: usize) -> bool {
        if let Some(group) = self.group_of(index) {
            return self.is_exempt(group);
        }

        let meal = &self.meals[index];
        let is_product = meal.recipe_id.as_deref().is_some_and(|recipe_id| {
            self.options
                .product_recipe_ids
                .iter()
                .any(|id| id == recipe_id)
        });

        is_product
            || meal
                .family()
                .is_some_and(|family: MealFamily| self.options.exempt_families.contains(&family))
    }
}

/// Build recipe groups in order of first appearance, members sorted by day
///
/// Meals without a recipe id or with an unresolved day take no part.
fn group_by_recipe(meals: &[ScheduledMeal], days: &[Option<usize>]) -> Vec<RecipeGroup> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<RecipeGroup> = Vec::new();

    for (index, meal) in meals.iter().enumerate() {
        let (Some(recipe_id), Some(_)) = (meal.recipe_id.as_deref(), days[index]) else {
            continue;
        };

        let slot = *positions.entry(recipe_id).or_insert_with(|| {
            groups.push(RecipeGroup {
                recipe_id: recipe_id.to_string(),
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].members.push(index);
    }

    for group in &mut groups {
        // Stable sort keeps plan order for meals on the same day
        group.members.sort_by_key(|&index| days[index]);
    }

    groups
}
