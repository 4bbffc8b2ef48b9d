use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::error::ValidationError;

/// Number of days in a planning week
pub const DAYS_IN_WEEK: usize = 7;

/// Day of the week as written in a generated schedule
///
/// Parsing is case-insensitive and accepts the three-letter abbreviation.
#[derive(
    EnumString,
    Display,
    AsRefStr,
    VariantArray,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
)]
#[strum(ascii_case_insensitive)]
pub enum DayName {
    #[strum(to_string = "Sunday", serialize = "Sun")]
    Sunday,
    #[strum(to_string = "Monday", serialize = "Mon")]
    Monday,
    #[strum(to_string = "Tuesday", serialize = "Tue")]
    Tuesday,
    #[strum(to_string = "Wednesday", serialize = "Wed")]
    Wednesday,
    #[strum(to_string = "Thursday", serialize = "Thu")]
    Thursday,
    #[strum(to_string = "Friday", serialize = "Fri")]
    Friday,
    #[strum(to_string = "Saturday", serialize = "Sat")]
    Saturday,
}

impl DayName {
    /// Parse a free-text day name, trimming surrounding whitespace
    pub fn parse(name: &str) -> Option<Self> {
        name.trim().parse().ok()
    }

    pub fn weekday(self) -> Weekday {
        match self {
            DayName::Sunday => Weekday::Sun,
            DayName::Monday => Weekday::Mon,
            DayName::Tuesday => Weekday::Tue,
            DayName::Wednesday => Weekday::Wed,
            DayName::Thursday => Weekday::Thu,
            DayName::Friday => Weekday::Fri,
            DayName::Saturday => Weekday::Sat,
        }
    }

    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => DayName::Sunday,
            Weekday::Mon => DayName::Monday,
            Weekday::Tue => DayName::Tuesday,
            Weekday::Wed => DayName::Wednesday,
            Weekday::Thu => DayName::Thursday,
            Weekday::Fri => DayName::Friday,
            Weekday::Sat => DayName::Saturday,
        }
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, DayName::Saturday | DayName::Sunday)
    }
}

/// Resolve a day name to its chronological position (0-6) within the week
/// that starts on `week_start`.
///
/// The canonical Sunday..Saturday sequence is rotated so that it begins on the
/// weekday of `week_start`; the same name can therefore be day 0 in one plan and
/// day 6 in another. Returns `None` when the name is not a recognised day.
pub fn day_index(day_name: &str, week_start: NaiveDate) -> Option<usize> {
    let day = DayName::parse(day_name)?;
    Some(index_of(day, week_start))
}

/// Position of an already-parsed day within the week starting on `week_start`
pub fn index_of(day: DayName, week_start: NaiveDate) -> usize {
    let start = week_start.weekday().num_days_from_sunday() as usize;
    let target = day.weekday().num_days_from_sunday() as usize;

    (target + DAYS_IN_WEEK - start) % DAYS_IN_WEEK
}

/// Day name occupying `index` in the week starting on `week_start`
pub fn day_at(week_start: NaiveDate, index: usize) -> DayName {
    DayName::from_weekday(
        date_for_index(week_start, index)
            .map(|date| date.weekday())
            .unwrap_or_else(|| week_start.weekday()),
    )
}

/// Calendar date of the day at `index`, or `None` past the end of the calendar
pub fn date_for_index(week_start: NaiveDate, index: usize) -> Option<NaiveDate> {
    week_start.checked_add_days(Days::new(index as u64))
}

/// Parse an ISO `YYYY-MM-DD` week start date
pub fn parse_week_start(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidWeekStart(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monday_start_orders_monday_first() {
        // 2025-10-20 is a Monday
        let start = date(2025, 10, 20);
        assert_eq!(day_index("Monday", start), Some(0));
        assert_eq!(day_index("Wednesday", start), Some(2));
        assert_eq!(day_index("Sunday", start), Some(6));
    }

    #[test]
    fn test_tuesday_start_wraps_monday_to_end() {
        // 2025-10-21 is a Tuesday
        let start = date(2025, 10, 21);
        assert_eq!(day_index("Tuesday", start), Some(0));
        assert_eq!(day_index("Thursday", start), Some(2));
        assert_eq!(day_index("Friday", start), Some(3));
        assert_eq!(day_index("Monday", start), Some(6));
    }

    #[test]
    fn test_parsing_is_case_insensitive_and_accepts_abbreviations() {
        let start = date(2025, 10, 20);
        assert_eq!(day_index("tuesday", start), Some(1));
        assert_eq!(day_index("  FRIDAY ", start), Some(4));
        assert_eq!(day_index("Sat", start), Some(5));
    }

    #[test]
    fn test_unknown_day_is_unresolved() {
        let start = date(2025, 10, 20);
        assert_eq!(day_index("Funday", start), None);
        assert_eq!(day_index("", start), None);
    }

    #[test]
    fn test_every_start_day_is_a_bijection() {
        for offset in 0..7 {
            let start = date(2025, 10, 19 + offset);
            let mut seen: Vec<usize> = DayName::VARIANTS
                .iter()
                .map(|day| index_of(*day, start))
                .collect();
            seen.sort_unstable();
            assert_eq!(seen, (0..7).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_day_at_inverts_index_of() {
        let start = date(2025, 10, 23);
        for day in DayName::VARIANTS {
            assert_eq!(day_at(start, index_of(*day, start)), *day);
        }
    }

    #[test]
    fn test_parse_week_start() {
        assert_eq!(parse_week_start("2025-10-21").unwrap(), date(2025, 10, 21));
        assert!(parse_week_start("21/10/2025").is_err());
    }

    #[test]
    fn test_date_for_index() {
        let start = date(2025, 10, 30);
        assert_eq!(date_for_index(start, 3), Some(date(2025, 11, 2)));
    }
}
