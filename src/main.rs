use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

use cli::validate::OutputFormat;

/// mealguard - Meal plan acceptance checks
#[derive(Parser)]
#[command(name = "mealguard")]
#[command(about = "Validate generated weekly meal plans", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a plan request file
    Validate {
        /// JSON file holding the plan request
        #[arg(long)]
        plan: PathBuf,

        /// Report format written to stdout
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the day offset of a day name within a week
    ResolveDay {
        /// First day of the plan week (YYYY-MM-DD)
        #[arg(long)]
        week_start: String,

        /// Day name, full or abbreviated
        day: String,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let config = mealguard::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let log_format = config.logging.log_format().map_err(|e| anyhow::anyhow!(e))?;
    mealguard::observability::init_observability(
        "mealguard",
        env!("CARGO_PKG_VERSION"),
        &config.logging.level,
        log_format,
    )?;

    let passed = match cli.command {
        Commands::Validate { plan, format } => cli::validate::validate_plan(&config, plan, format)?,
        Commands::ResolveDay { week_start, day } => cli::day::resolve_day(&week_start, &day)?,
    };

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
