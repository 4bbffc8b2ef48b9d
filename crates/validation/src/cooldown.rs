use crate::context::{PlanContext, RecipeGroup};
use crate::day;
use crate::finding::Finding;
use crate::rule::{PlanRule, RuleReport};

/// Minimum spacing between cooked uses of the same recipe
///
/// Repeats inside the week are errors. Collisions with prior history are only
/// warnings, since a deliberate comfort-food repeat is the user's call.
pub struct CooldownRule;

impl PlanRule for CooldownRule {
    fn name(&self) -> &'static str {
        "cooldown"
    }

    fn check(&self, ctx: &PlanContext<'_>) -> RuleReport {
        let mut report = RuleReport::default();

        for group in ctx.groups() {
            if ctx.is_exempt(group) {
                report.note(format!(
                    "cooldown: recipe {} is exempt, skipped",
                    group.recipe_id
                ));
                continue;
            }

            check_week_spacing(ctx, group, &mut report);
            check_history(ctx, group, &mut report);
        }

        report
    }
}

/// Leftovers are not cooking events, so spacing is measured between
/// consecutive cooked occurrences only
fn check_week_spacing(ctx: &PlanContext<'_>, group: &RecipeGroup, report: &mut RuleReport) {
    if !group.is_repeated() {
        return;
    }

    let cooked: Vec<usize> = group
        .members
        .iter()
        .copied()
        .filter(|&index| !ctx.meal(index).is_leftover)
        .collect();

    for pair in cooked.windows(2) {
        let (earlier, later) = (pair[0], pair[1]);
        let (Some(from), Some(to)) = (ctx.day_index(earlier), ctx.day_index(later)) else {
            continue;
        };

        let meal = ctx.meal(later);
        let family = meal.family();
        let required = ctx.settings.cooldowns.for_family(family);
        let gap = to - from;

        if (gap as u64) < u64::from(required) {
            report.push(Finding::CooldownViolation {
                recipe_id: group.recipe_id.clone(),
                recipe: meal.display_name().to_string(),
                family,
                first_day: day::day_at(ctx.week_start, from),
                second_day: day::day_at(ctx.week_start, to),
                gap,
                required,
            });
        }
    }
}

fn check_history(ctx: &PlanContext<'_>, group: &RecipeGroup, report: &mut RuleReport) {
    let Some(last_used) = ctx
        .history
        .iter()
        .filter(|entry| entry.recipe_id == group.recipe_id && entry.used_on < ctx.week_start)
        .map(|entry| entry.used_on)
        .max()
    else {
        return;
    };

    let first = group.first();
    let Some(position) = ctx.day_index(first) else {
        return;
    };
    let Some(planned_on) = day::date_for_index(ctx.week_start, position) else {
        return;
    };

    let meal = ctx.meal(first);
    let family = meal.family();
    let required = ctx.settings.cooldowns.for_family(family);
    let gap = (planned_on - last_used).num_days();

    if gap < i64::from(required) {
        report.push(Finding::HistoryCooldown {
            recipe_id: group.recipe_id.clone(),
            recipe: meal.display_name().to_string(),
            family,
            last_used,
            day: day::day_at(ctx.week_start, position),
            gap,
            required,
        });
    }
}
