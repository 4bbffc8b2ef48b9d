use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use mealguard_validation::types::parse_families;
use mealguard_validation::{CooldownSettings, MacroMode, MealFamily, PlanSettings};
use serde::Deserialize;
use std::env;
use strum::{AsRefStr, Display, EnumString};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub planning: PlanningConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Household defaults applied when a request carries no settings of its own
#[derive(Debug, Deserialize, Clone)]
pub struct PlanningConfig {
    pub dinner_cooldown_days: u32,
    pub lunch_cooldown_days: u32,
    pub breakfast_cooldown_days: u32,
    pub snack_cooldown_days: u32,
    pub macro_mode: String,
    pub priorities: Vec<String>,
    #[serde(default)]
    pub allow_dinner_for_lunch: bool,
    /// Families that may repeat without batch-cooking (e.g. "breakfast")
    #[serde(default)]
    pub exempt_families: Vec<String>,
}

impl PlanningConfig {
    /// Engine settings described by this section
    pub fn plan_settings(&self) -> Result<PlanSettings, String> {
        let macro_mode = MacroMode::from_setting(&self.macro_mode).map_err(|e| e.to_string())?;

        Ok(PlanSettings {
            cooldowns: CooldownSettings {
                dinner_days: self.dinner_cooldown_days,
                lunch_days: self.lunch_cooldown_days,
                breakfast_days: self.breakfast_cooldown_days,
                snack_days: self.snack_cooldown_days,
            },
            macro_mode,
            priorities: self.priorities.clone(),
        })
    }

    pub fn exempt_families(&self) -> Result<Vec<MealFamily>, String> {
        parse_families(&self.exempt_families).map_err(|e| e.to_string())
    }
}

#[derive(EnumString, Display, AsRefStr, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn log_format(&self) -> Result<LogFormat, String> {
        self.format
            .parse()
            .map_err(|_| format!("Unknown log format: {} (expected pretty or json)", self.format))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (MEALGUARD__PLANNING__MACRO_MODE, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("planning.dinner_cooldown_days", 14)?
            .set_default("planning.lunch_cooldown_days", 7)?
            .set_default("planning.breakfast_cooldown_days", 3)?
            .set_default("planning.snack_cooldown_days", 2)?
            .set_default("planning.macro_mode", "balanced")?
            .set_default("planning.priorities", vec!["variety", "cost", "macros"])?
            .set_default("planning.allow_dinner_for_lunch", false)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional: a missing file leaves the defaults in place
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("MEALGUARD")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("planning.priorities")
                .with_list_parse_key("planning.exempt_families")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.planning.priorities.is_empty() {
            return Err("planning.priorities must list at least one priority".to_string());
        }
        self.planning.plan_settings()?;
        self.planning.exempt_families()?;
        self.logging.log_format()?;
        Ok(())
    }
}
