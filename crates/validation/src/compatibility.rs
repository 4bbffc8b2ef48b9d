use crate::context::PlanContext;
use crate::finding::Finding;
use crate::rule::{PlanRule, RuleReport};
use crate::slot::normalize_slot;

/// Recipes that declare eligible meal slots must be placed in one of them
pub struct SlotCompatibilityRule;

impl PlanRule for SlotCompatibilityRule {
    fn name(&self) -> &'static str {
        "meal-slot"
    }

    fn check(&self, ctx: &PlanContext<'_>) -> RuleReport {
        let mut report = RuleReport::default();
        let Some(catalog) = ctx.recipe_slots else {
            report.note("meal-slot: no recipe slot catalog supplied, skipped");
            return report;
        };

        for (index, meal) in ctx.meals.iter().enumerate() {
            let Some(eligible) = meal
                .recipe_id
                .as_deref()
                .and_then(|recipe_id| catalog.get(recipe_id))
                .filter(|eligible| !eligible.is_empty())
            else {
                continue;
            };

            let assigned = normalize_slot(&meal.meal_type);
            let allowed: Vec<String> = eligible.iter().map(|slot| normalize_slot(slot)).collect();

            if !slot_accepts(&assigned, &allowed, ctx.options.allow_dinner_for_lunch) {
                report.push(Finding::SlotMismatch {
                    recipe: meal.display_name().to_string(),
                    day: ctx.day_label(index),
                    assigned,
                    allowed,
                });
            }
        }

        report
    }
}

/// Whether a slot accepts a recipe with the given normalized eligible slots
///
/// "main-course" and "supper" recipes fill both lunch and dinner. A slot
/// named "supper" is a dinner slot. With `dinner_for_lunch`, dinner recipes
/// may also fill lunch.
pub fn slot_accepts(assigned: &str, allowed: &[String], dinner_for_lunch: bool) -> bool {
    let allows = |slot: &str| allowed.iter().any(|candidate| candidate == slot);
    let assigned = match assigned {
        "supper" => "dinner",
        other => other,
    };

    if allows(assigned) {
        return true;
    }

    match assigned {
        "lunch" | "dinner" if allows("main-course") || allows("supper") => true,
        "lunch" => dinner_for_lunch && allows("dinner"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::{PlanSettings, RecipeSlotCatalog, ScheduledMeal, ValidationOptions};

    fn slots(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_exact_and_normalized_matches() {
        assert!(slot_accepts("dinner", &slots(&["dinner"]), false));
        assert!(slot_accepts(
            &normalize_slot("evening-snack"),
            &slots(&["snack"]),
            false
        ));
    }

    #[test]
    fn test_main_course_fills_lunch_and_dinner() {
        let allowed = slots(&["main-course"]);
        assert!(slot_accepts("lunch", &allowed, false));
        assert!(slot_accepts("dinner", &allowed, false));
        assert!(!slot_accepts("breakfast", &allowed, false));

        assert!(slot_accepts("lunch", &slots(&["supper"]), false));
    }

    #[test]
    fn test_supper_slot_takes_dinner_recipes() {
        assert!(slot_accepts(&normalize_slot("Supper"), &slots(&["dinner"]), false));
        assert!(slot_accepts("supper", &slots(&["main-course"]), false));
        assert!(!slot_accepts("supper", &slots(&["lunch"]), false));
        assert!(!slot_accepts("supper", &slots(&["breakfast"]), true));
    }

    #[test]
    fn test_dinner_for_lunch_is_one_way() {
        assert!(!slot_accepts("lunch", &slots(&["dinner"]), false));
        assert!(slot_accepts("lunch", &slots(&["dinner"]), true));
        assert!(!slot_accepts("dinner", &slots(&["lunch"]), true));
    }

    #[test]
    fn test_rule_reports_mismatch_with_eligible_slots() {
        let meals = vec![
            ScheduledMeal::new("Monday", "breakfast", "roast").named("Sunday Roast"),
            ScheduledMeal::new("Monday", "afternoon-snack", "nuts"),
            ScheduledMeal::new("Monday", "dinner", "unlisted"),
        ];
        let mut catalog = RecipeSlotCatalog::new();
        catalog.insert("roast".to_string(), slots(&["Dinner"]));
        catalog.insert("nuts".to_string(), slots(&["snack"]));
        let settings = PlanSettings::default();
        let options = ValidationOptions::default();
        let week_start = NaiveDate::from_ymd_opt(2025, 10, 20).unwrap();
        let ctx = PlanContext::new(&meals, &settings, week_start, &[], Some(&catalog), &options);

        let report = SlotCompatibilityRule.check(&ctx);

        assert_eq!(report.findings.len(), 1);
        assert_eq!(
            report.findings[0].to_string(),
            "\"Sunday Roast\" on Monday is assigned to breakfast but is only suitable for: dinner"
        );
    }
}
