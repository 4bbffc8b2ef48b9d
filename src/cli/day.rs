use mealguard_validation::{day, parse_week_start};

/// Print the 0-based offset of a day name from the week start
pub fn resolve_day(week_start: &str, name: &str) -> anyhow::Result<bool> {
    let week_start = parse_week_start(week_start)?;

    match day::day_index(name, week_start) {
        Some(index) => {
            println!("{index}");
            Ok(true)
        }
        None => {
            tracing::warn!(day = name, "day name not recognised");
            Ok(false)
        }
    }
}
