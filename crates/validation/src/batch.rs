use crate::context::{PlanContext, RecipeGroup};
use crate::day::DayName;
use crate::finding::Finding;
use crate::rule::{PlanRule, RuleReport};

/// "Cook once, reheat later" consistency for repeated recipes
///
/// A repeated recipe is legal only when its first occurrence is the cooking day
/// and every later occurrence is a leftover pointing back at that day.
pub struct BatchCookRule;

impl PlanRule for BatchCookRule {
    fn name(&self) -> &'static str {
        "batch"
    }

    fn check(&self, ctx: &PlanContext<'_>) -> RuleReport {
        let mut report = RuleReport::default();

        for group in ctx.groups().iter().filter(|group| group.is_repeated()) {
            if ctx.is_exempt(group) {
                report.note(format!(
                    "batch: recipe {} is exempt, skipped",
                    group.recipe_id
                ));
                continue;
            }

            check_group(ctx, group, &mut report);
        }

        check_leftover_chronology(ctx, &mut report);

        report
    }
}

fn check_group(ctx: &PlanContext<'_>, group: &RecipeGroup, report: &mut RuleReport) {
    let first = group.first();
    let first_meal = ctx.meal(first);
    let Some(first_day) = ctx.day_name(first) else {
        return;
    };

    let declared = group.members.iter().any(|&index| {
        let meal = ctx.meal(index);
        meal.is_leftover || meal.notes_mention_batch()
    });

    if !declared {
        report.push(Finding::BatchUndeclaredRepeat {
            recipe_id: group.recipe_id.clone(),
            recipe: first_meal.display_name().to_string(),
            days: group
                .members
                .iter()
                .filter_map(|&index| ctx.day_name(index))
                .collect(),
        });
        return;
    }

    if first_meal.is_leftover {
        report.push(Finding::BatchFirstIsLeftover {
            recipe: first_meal.display_name().to_string(),
            day: first_day,
        });
    }

    for &index in &group.members[1..] {
        let meal = ctx.meal(index);
        let Some(day) = ctx.day_name(index) else {
            continue;
        };
        let recipe = meal.display_name().to_string();

        if !meal.is_leftover {
            report.push(Finding::BatchMissingFlag {
                recipe,
                day,
                first_day,
            });
            continue;
        }

        match meal.source_day.as_deref() {
            None => report.push(Finding::BatchMissingSource {
                recipe,
                day,
                expected: first_day,
            }),
            Some(source) if DayName::parse(source) != Some(first_day) => {
                report.push(Finding::BatchSourceMismatch {
                    recipe,
                    day,
                    source_day: source.trim().to_string(),
                    expected: first_day,
                })
            }
            Some(_) => {}
        }
    }

    if !first_meal.is_leftover {
        check_servings(ctx, group, first_day, report);
    }
}

/// Servings are a quantity hint, so a shortfall only warns
fn check_servings(
    ctx: &PlanContext<'_>,
    group: &RecipeGroup,
    first_day: DayName,
    report: &mut RuleReport,
) {
    let first_meal = ctx.meal(group.first());
    let Some(cooked) = first_meal.servings else {
        report.note(format!(
            "batch: recipe {} has no serving count on {first_day}, servings not checked",
            group.recipe_id
        ));
        return;
    };

    // u64 so large counts cannot overflow
    let needed: Option<u64> = group
        .members
        .iter()
        .map(|&index| ctx.meal(index).servings.map(u64::from))
        .sum();

    match needed {
        Some(needed) if u64::from(cooked) < needed => report.push(Finding::ServingsShortfall {
            recipe: first_meal.display_name().to_string(),
            first_day,
            cooked,
            needed,
        }),
        Some(_) => {}
        None => report.note(format!(
            "batch: recipe {} has occurrences without serving counts, servings not checked",
            group.recipe_id
        )),
    }
}

/// Every leftover must come from a strictly earlier day, whether or not its
/// recipe repeats
fn check_leftover_chronology(ctx: &PlanContext<'_>, report: &mut RuleReport) {
    for (index, meal) in ctx.meals.iter().enumerate() {
        if !meal.is_leftover || ctx.is_meal_exempt(index) {
            continue;
        }
        let (Some(source), Some(position), Some(day)) = (
            meal.source_day.as_deref(),
            ctx.day_index(index),
            ctx.day_name(index),
        ) else {
            continue;
        };

        let Some(source_day) = DayName::parse(source) else {
            report.push(Finding::UnresolvedSourceDay {
                recipe: meal.display_name().to_string(),
                day,
                source_day: source.to_string(),
            });
            continue;
        };

        if crate::day::index_of(source_day, ctx.week_start) >= position {
            report.push(Finding::BatchFutureReference {
                recipe: meal.display_name().to_string(),
                day,
                source_day,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::{PlanSettings, ScheduledMeal, ValidationOptions};

    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 21).unwrap()
    }

    fn run(meals: &[ScheduledMeal]) -> RuleReport {
        run_with(meals, &ValidationOptions::default())
    }

    fn run_with(meals: &[ScheduledMeal], options: &ValidationOptions) -> RuleReport {
        let settings = PlanSettings::default();
        let ctx = PlanContext::new(meals, &settings, tuesday(), &[], None, options);
        BatchCookRule.check(&ctx)
    }

    fn kinds(report: &RuleReport) -> Vec<&str> {
        report.findings.iter().map(Finding::kind).collect()
    }

    #[test]
    fn test_valid_batch_cook() {
        let meals = vec![
            ScheduledMeal::new("Tuesday", "dinner", "chili").with_servings(7),
            ScheduledMeal::new("Thursday", "dinner", "chili")
                .with_servings(3)
                .leftover_from("Tuesday"),
        ];
        let report = run(&meals);

        assert!(report.is_valid());
        assert!(report.errors().next().is_none());
    }

    #[test]
    fn test_undeclared_repeat_is_single_error() {
        let meals = vec![
            ScheduledMeal::new("Tuesday", "dinner", "chili"),
            ScheduledMeal::new("Friday", "dinner", "chili"),
        ];
        let report = run(&meals);

        assert_eq!(kinds(&report), vec!["batch-undeclared-repeat"]);
    }

    #[test]
    fn test_notes_declare_batch_but_flags_missing() {
        let meals = vec![
            ScheduledMeal::new("Tuesday", "dinner", "chili").with_notes("Cook a double batch"),
            ScheduledMeal::new("Friday", "dinner", "chili"),
        ];
        let report = run(&meals);

        assert_eq!(kinds(&report), vec!["batch-missing-flag"]);
    }

    #[test]
    fn test_first_occurrence_must_not_be_leftover() {
        let meals = vec![
            ScheduledMeal::new("Wednesday", "dinner", "chili").leftover_from("Tuesday"),
            ScheduledMeal::new("Friday", "dinner", "chili").leftover_from("Wednesday"),
        ];
        let report = run(&meals);

        assert!(kinds(&report).contains(&"batch-first-is-leftover"));
    }

    #[test]
    fn test_source_mismatch_and_future_reference() {
        let meals = vec![
            ScheduledMeal::new("Tuesday", "dinner", "chili"),
            ScheduledMeal::new("Thursday", "dinner", "chili").leftover_from("Friday"),
        ];
        let report = run(&meals);
        let kinds = kinds(&report);

        assert_eq!(
            kinds
                .iter()
                .filter(|kind| **kind == "batch-source-mismatch")
                .count(),
            1
        );
        assert!(kinds.contains(&"batch-future-reference"));
        let mismatch = report
            .findings
            .iter()
            .find(|finding| finding.kind() == "batch-source-mismatch")
            .unwrap();
        assert!(mismatch.to_string().contains("but should reference Tuesday"));
    }

    #[test]
    fn test_leftover_without_source_day() {
        let mut leftover = ScheduledMeal::new("Thursday", "dinner", "chili");
        leftover.is_leftover = true;
        let meals = vec![ScheduledMeal::new("Tuesday", "dinner", "chili"), leftover];
        let report = run(&meals);

        assert_eq!(kinds(&report), vec!["batch-missing-source"]);
    }

    #[test]
    fn test_future_reference_on_single_leftover() {
        // Monday is the last day of a week starting on Tuesday
        let meals = vec![ScheduledMeal::new("Sunday", "lunch", "soup").leftover_from("Monday")];
        let report = run(&meals);

        assert_eq!(kinds(&report), vec!["batch-future-reference"]);
    }

    #[test]
    fn test_same_day_source_is_future_reference() {
        let meals = vec![ScheduledMeal::new("Friday", "lunch", "soup").leftover_from("Friday")];
        let report = run(&meals);

        assert!(report.findings[0].to_string().contains("cannot use leftovers from the future"));
    }

    #[test]
    fn test_servings_shortfall_is_warning() {
        let meals = vec![
            ScheduledMeal::new("Tuesday", "dinner", "chili").with_servings(4),
            ScheduledMeal::new("Wednesday", "lunch", "chili")
                .with_servings(2)
                .leftover_from("Tuesday"),
            ScheduledMeal::new("Thursday", "lunch", "chili")
                .with_servings(2)
                .leftover_from("Tuesday"),
        ];
        let report = run(&meals);

        assert!(report.is_valid());
        assert_eq!(kinds(&report), vec!["servings-shortfall"]);
        assert!(report.findings[0].to_string().contains("cooks 4 servings"));
    }

    #[test]
    fn test_large_servings_do_not_overflow() {
        let meals = vec![
            ScheduledMeal::new("Tuesday", "dinner", "stew").with_servings(u32::MAX),
            ScheduledMeal::new("Wednesday", "dinner", "stew")
                .with_servings(u32::MAX)
                .leftover_from("Tuesday"),
        ];
        let report = run(&meals);

        assert!(report.is_valid());
        assert_eq!(kinds(&report), vec!["servings-shortfall"]);
        assert!(report.findings[0].to_string().contains("but 8589934590 servings"));
    }

    #[test]
    fn test_missing_servings_skips_quantity_check() {
        let meals = vec![
            ScheduledMeal::new("Tuesday", "dinner", "chili"),
            ScheduledMeal::new("Wednesday", "lunch", "chili").leftover_from("Tuesday"),
        ];
        let report = run(&meals);

        assert!(report.findings.is_empty());
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn test_exempt_family_bypasses_batch_rules() {
        let meals = vec![
            ScheduledMeal::new("Tuesday", "breakfast", "oats"),
            ScheduledMeal::new("Wednesday", "breakfast", "oats"),
            ScheduledMeal::new("Thursday", "breakfast", "oats"),
        ];
        let options = ValidationOptions {
            exempt_families: vec![crate::slot::MealFamily::Breakfast],
            ..Default::default()
        };
        let report = run_with(&meals, &options);

        assert!(report.findings.is_empty());
    }

    #[test]
    fn test_exempt_slot_leftover_of_cooked_recipe_keeps_chronology() {
        let meals = vec![
            ScheduledMeal::new("Tuesday", "dinner", "stew").named("Stew"),
            ScheduledMeal::new("Wednesday", "breakfast", "stew")
                .named("Stew")
                .leftover_from("Thursday"),
        ];
        let options = ValidationOptions {
            exempt_families: vec![crate::slot::MealFamily::Breakfast],
            ..Default::default()
        };
        let report = run_with(&meals, &options);
        let kinds = kinds(&report);

        assert!(kinds.contains(&"batch-source-mismatch"));
        assert!(kinds.contains(&"batch-future-reference"));
    }
}
