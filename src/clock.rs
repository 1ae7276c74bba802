use chrono::{DateTime, Datelike, Days, Local, NaiveDate, Utc, Weekday};

use crate::error::{PlannerError, Result};

/// A single captured "now". Every day key used during one run is derived
/// from the same capture so a run straddling midnight stays consistent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Moment {
    pub instant: DateTime<Utc>,
    pub day: NaiveDate,
}

impl Moment {
    pub fn capture() -> Self {
        Self::from_local(Local::now())
    }

    pub fn from_local(local: DateTime<Local>) -> Self {
        Self {
            instant: local.with_timezone(&Utc),
            day: local.date_naive(),
        }
    }

    pub fn fixed(day: NaiveDate, instant: DateTime<Utc>) -> Self {
        Self { instant, day }
    }
}

pub fn day_before(day: NaiveDate, days: u64) -> NaiveDate {
    day.checked_sub_days(Days::new(days))
        .unwrap_or(NaiveDate::MIN)
}

pub fn weekday_of(day: NaiveDate) -> Weekday {
    day.weekday()
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

pub fn parse_weekday(s: &str) -> Result<Weekday> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| PlannerError::InvalidWeekday(s.to_string()))
}

pub fn parse_day(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Ok(today),
        "yesterday" => return Ok(day_before(today, 1)),
        "tomorrow" => {
            return today
                .succ_opt()
                .ok_or_else(|| PlannerError::InvalidDay(s.clone()));
        }
        _ => {}
    }

    // YYYY-MM-DD
    if let Ok(d) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        return Ok(d);
    }

    // DDMMYYYY (e.g. 18022026)
    if s.len() == 8 && s.chars().all(|c| c.is_ascii_digit()) {
        return NaiveDate::parse_from_str(&s, "%d%m%Y").map_err(|_| PlannerError::InvalidDay(s));
    }

    Err(PlannerError::InvalidDay(s))
}

/// Resolves an optional `--day` argument against the captured day.
pub fn resolve_day(arg: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match arg {
        Some(value) => parse_day(value, today),
        None => Ok(today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_day_before_crosses_month_and_year() {
        assert_eq!(day_before(d(2026, 3, 1), 1), d(2026, 2, 28));
        assert_eq!(day_before(d(2026, 1, 3), 7), d(2025, 12, 27));
        assert_eq!(day_before(d(2026, 5, 10), 0), d(2026, 5, 10));
    }

    #[test]
    fn test_parse_day_keywords_and_formats() {
        let today = d(2026, 10, 18);
        assert_eq!(parse_day("today", today).unwrap(), today);
        assert_eq!(parse_day(" Yesterday ", today).unwrap(), d(2026, 10, 17));
        assert_eq!(parse_day("tomorrow", today).unwrap(), d(2026, 10, 19));
        assert_eq!(parse_day("2026-01-02", today).unwrap(), d(2026, 1, 2));
        assert_eq!(parse_day("18022026", today).unwrap(), d(2026, 2, 18));
    }

    #[test]
    fn test_parse_day_rejects_garbage() {
        let today = d(2026, 10, 18);
        assert!(matches!(
            parse_day("next week", today),
            Err(PlannerError::InvalidDay(_))
        ));
        assert!(parse_day("32132026", today).is_err());
    }

    #[test]
    fn test_weekday_parsing_and_names() {
        assert_eq!(parse_weekday("Monday").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday("sun").unwrap(), Weekday::Sun);
        assert!(parse_weekday("someday").is_err());
        assert_eq!(weekday_name(weekday_of(d(2026, 10, 18))), "sunday");
    }
}
