use std::path::Path;

use chrono::NaiveDate;
use mealguard_validation::{
    Finding, MacroCheck, MealFamily, PlanSettings, RecipeSlotCatalog, ScheduledMeal,
    UsageHistoryEntry, ValidationError, ValidationOptions, ValidationResult, validate,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A candidate plan and everything needed to judge it, as read from disk
#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    pub week_start: NaiveDate,
    pub meals: Vec<ScheduledMeal>,
    #[serde(default)]
    pub history: Vec<UsageHistoryEntry>,
    #[serde(default)]
    pub settings: Option<PlanSettings>,
    #[serde(default)]
    pub recipe_slots: Option<RecipeSlotCatalog>,
    #[serde(default)]
    pub options: Option<ValidationOptions>,
}

/// Configured fallbacks for requests that omit settings or options
#[derive(Debug, Clone, Default)]
pub struct PlanDefaults {
    pub settings: PlanSettings,
    pub exempt_families: Vec<MealFamily>,
    pub allow_dinner_for_lunch: bool,
}

impl PlanRequest {
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path).map_err(|source| AppError::ReadError {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_json(&json)?)
    }

    pub fn run(&self, defaults: &PlanDefaults) -> ValidationResult {
        let settings = self.settings.as_ref().unwrap_or(&defaults.settings);
        let options = self.options.clone().unwrap_or_else(|| ValidationOptions {
            exempt_families: defaults.exempt_families.clone(),
            allow_dinner_for_lunch: defaults.allow_dinner_for_lunch,
            ..Default::default()
        });

        validate(
            &self.meals,
            settings,
            self.week_start,
            &self.history,
            self.recipe_slots.as_ref(),
            Some(&options),
        )
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportEntry {
    pub kind: String,
    pub message: String,
}

impl From<&Finding> for ReportEntry {
    fn from(finding: &Finding) -> Self {
        Self {
            kind: finding.kind().to_string(),
            message: finding.to_string(),
        }
    }
}

/// Printable form of a validation result
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub valid: bool,
    pub errors: Vec<ReportEntry>,
    pub warnings: Vec<ReportEntry>,
    pub diagnostics: Vec<String>,
    pub macro_check: MacroCheck,
}

impl From<&ValidationResult> for Report {
    fn from(result: &ValidationResult) -> Self {
        Self {
            valid: result.is_valid,
            errors: result.errors.iter().map(ReportEntry::from).collect(),
            warnings: result.warnings.iter().map(ReportEntry::from).collect(),
            diagnostics: result.diagnostics.clone(),
            macro_check: result.macro_check,
        }
    }
}

impl Report {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self) -> String {
        let mut text = if self.valid {
            String::from("Plan accepted\n")
        } else {
            format!("Plan rejected: {} error(s)\n", self.errors.len())
        };

        for entry in &self.errors {
            text.push_str(&format!("  error   [{}] {}\n", entry.kind, entry.message));
        }
        for entry in &self.warnings {
            text.push_str(&format!("  warning [{}] {}\n", entry.kind, entry.message));
        }

        text
    }
}
