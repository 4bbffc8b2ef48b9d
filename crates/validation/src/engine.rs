use chrono::NaiveDate;

use crate::batch::BatchCookRule;
use crate::compatibility::SlotCompatibilityRule;
use crate::context::PlanContext;
use crate::cooldown::CooldownRule;
use crate::finding::Finding;
use crate::macros::{self, MacroCheck};
use crate::rule::{PlanRule, RuleReport};
use crate::types::{
    PlanSettings, RecipeSlotCatalog, ScheduledMeal, UsageHistoryEntry, ValidationOptions,
};

/// Verdict on a candidate plan
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    /// Step-by-step trail of what each rule checked or skipped
    pub diagnostics: Vec<String>,
    pub macro_check: MacroCheck,
}

impl ValidationResult {
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// Number of findings of a kind, errors and warnings alike
    pub fn count(&self, kind: &str) -> usize {
        self.errors
            .iter()
            .chain(&self.warnings)
            .filter(|finding| finding.kind() == kind)
            .count()
    }

    pub fn has(&self, kind: &str) -> bool {
        self.count(kind) > 0
    }

    /// Errors rendered as corrective instructions for the next generation
    /// attempt; `None` when there is nothing to correct
    pub fn correction_prompt(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }

        let mut prompt =
            String::from("The previous meal plan was rejected. Fix these problems:\n");
        for (position, error) in self.errors.iter().enumerate() {
            prompt.push_str(&format!("{}. {error}\n", position + 1));
        }
        Some(prompt)
    }

    fn absorb(&mut self, report: RuleReport) {
        self.is_valid &= report.is_valid();
        for finding in report.findings {
            if finding.is_error() {
                self.errors.push(finding);
            } else {
                self.warnings.push(finding);
            }
        }
        self.diagnostics.extend(report.diagnostics);
    }
}

/// Judge a candidate weekly plan
///
/// Runs the cooldown, batch-cooking, meal-slot and macro rules and merges their
/// findings. Meal-slot checks need `recipe_slots`; macro checks need nutrition
/// profiles and recipe nutrition in `options`. The plan is valid when no rule
/// reports an error; warnings never block it.
#[tracing::instrument(skip_all, fields(meals = meals.len(), week_start = %week_start))]
pub fn validate(
    meals: &[ScheduledMeal],
    settings: &PlanSettings,
    week_start: NaiveDate,
    history: &[UsageHistoryEntry],
    recipe_slots: Option<&RecipeSlotCatalog>,
    options: Option<&ValidationOptions>,
) -> ValidationResult {
    let fallback = ValidationOptions::default();
    let options = options.unwrap_or(&fallback);
    let ctx = PlanContext::new(meals, settings, week_start, history, recipe_slots, options);

    let mut result = ValidationResult {
        is_valid: true,
        errors: Vec::new(),
        warnings: ctx.unresolved_days(),
        diagnostics: vec![format!(
            "plan: {} meals, {} recipes, week starting {week_start}",
            meals.len(),
            ctx.groups().len()
        )],
        macro_check: MacroCheck::Skipped(macros::MacroSkipReason::Disabled),
    };

    let mut rules: Vec<Box<dyn PlanRule>> = vec![Box::new(CooldownRule), Box::new(BatchCookRule)];
    if options.check_meal_slots {
        rules.push(Box::new(SlotCompatibilityRule));
    } else {
        result
            .diagnostics
            .push("meal-slot: disabled by options".to_string());
    }

    for rule in &rules {
        let report = rule.check(&ctx);
        tracing::debug!(
            rule = rule.name(),
            errors = report.errors().count(),
            warnings = report.warnings().count(),
            "rule checked"
        );
        result.absorb(report);
    }

    let (macro_check, report) = macros::evaluate(&ctx);
    tracing::debug!(rule = "macros", outcome = ?macro_check, "rule checked");
    result.macro_check = macro_check;
    result.absorb(report);

    tracing::debug!(
        valid = result.is_valid,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "meal plan validated"
    );

    result
}
