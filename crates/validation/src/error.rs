use thiserror::Error;

/// Errors raised while decoding validation inputs
///
/// Judging a plan never fails; these only surface when settings or plans arrive
/// as text and cannot be understood.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Unknown macro mode: {0} (expected strict, balanced, weekday_discipline or calorie_banking)")]
    UnknownMacroMode(String),

    #[error("Unknown meal family: {0} (expected breakfast, lunch, dinner or snack)")]
    UnknownMealFamily(String),

    #[error("Invalid week start date: {0}")]
    InvalidWeekStart(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
