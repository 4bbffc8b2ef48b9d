pub mod config;
pub mod error;
pub mod observability;
pub mod request;

pub use config::Config;
pub use error::AppError;
pub use request::{PlanDefaults, PlanRequest, Report};

/// Build request fallbacks from loaded configuration
pub fn plan_defaults(config: &Config) -> Result<PlanDefaults, AppError> {
    Ok(PlanDefaults {
        settings: config
            .planning
            .plan_settings()
            .map_err(AppError::InvalidConfig)?,
        exempt_families: config
            .planning
            .exempt_families()
            .map_err(AppError::InvalidConfig)?,
        allow_dinner_for_lunch: config.planning.allow_dinner_for_lunch,
    })
}
