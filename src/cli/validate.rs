use std::path::PathBuf;

use clap::ValueEnum;
use mealguard::{Config, PlanRequest, Report, plan_defaults};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Judge a plan file and print the report. Returns whether the plan passed.
#[tracing::instrument(skip(config))]
pub fn validate_plan(config: &Config, plan: PathBuf, format: OutputFormat) -> anyhow::Result<bool> {
    let defaults = plan_defaults(config)?;
    let request = PlanRequest::from_file(&plan)?;

    tracing::info!(
        meals = request.meals.len(),
        week_start = %request.week_start,
        "validating meal plan"
    );

    let result = request.run(&defaults);
    let report = Report::from(&result);

    match format {
        OutputFormat::Text => {
            print!("{}", report.to_text());
            if let Some(prompt) = result.correction_prompt() {
                tracing::debug!(prompt = %prompt, "correction prompt");
            }
        }
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    if result.is_valid {
        tracing::info!(warnings = result.warnings.len(), "plan accepted");
    } else {
        tracing::warn!(errors = result.errors.len(), "plan rejected");
    }

    Ok(result.is_valid)
}
