//! Anchor dates: year-specific reference dates other holidays are derived from,
//! either by a day offset or by searching forward for a weekday.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::date_rule::DateRuleError;

/// Reference date a holiday rule is anchored on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorKind {
    /// Western (Gregorian) Easter Sunday
    EasterSunday,
    /// The same month and day in every year, e.g. June 19 for midsummer
    FixedCalendar { month: u32, day: u32 },
    /// Rule type found in the data source that no calculator exists for.
    /// Loading keeps it; resolving it fails with `UnknownAnchorKind`.
    Unsupported(String),
}

impl AnchorKind {
    /// Compute the anchor date for the given year
    pub fn date_in(&self, year: i32) -> Result<NaiveDate, DateRuleError> {
        match self {
            AnchorKind::EasterSunday => easter_sunday(year),
            AnchorKind::FixedCalendar { month, day } => fixed_anchor(year, *month, *day),
            AnchorKind::Unsupported(name) => Err(DateRuleError::UnknownAnchorKind(name.clone())),
        }
    }
}

/// Easter Sunday in the Gregorian calendar.
/// Only years from 1583 on are meaningful.
pub fn easter_sunday(year: i32) -> Result<NaiveDate, DateRuleError> {
    let easter = computus::gregorian(year)
        .map_err(|reason| DateRuleError::EasterUndefined { year, reason: reason.to_string() })?;
    fixed_anchor(easter.year, easter.month, easter.day)
}

/// Build the date `year-month-day`, failing if that day does not exist
pub fn fixed_anchor(year: i32, month: u32, day: u32) -> Result<NaiveDate, DateRuleError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(DateRuleError::InvalidDate { year, month, day })
}

/// First date on or after `date` that falls on `weekday`
pub fn next_weekday_on_or_after(date: NaiveDate, weekday: Weekday) -> Result<NaiveDate, DateRuleError> {
    let from = date.weekday().num_days_from_monday();
    let to = weekday.num_days_from_monday();
    let ahead = (to + 7 - from) % 7;
    shift_days(date, i64::from(ahead))
}

/// Add a (possibly negative) number of calendar days
pub fn shift_days(date: NaiveDate, days: i64) -> Result<NaiveDate, DateRuleError> {
    date.checked_add_signed(Duration::days(days))
        .ok_or(DateRuleError::DateOutOfRange { date, days })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easter_dates() {
        assert_eq!(easter_sunday(2019).unwrap(), NaiveDate::from_ymd_opt(2019, 4, 21).unwrap());
        assert_eq!(easter_sunday(2020).unwrap(), NaiveDate::from_ymd_opt(2020, 4, 12).unwrap());
        assert_eq!(easter_sunday(2024).unwrap(), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        // earliest and latest possible dates
        assert_eq!(easter_sunday(1818).unwrap(), NaiveDate::from_ymd_opt(1818, 3, 22).unwrap());
        assert_eq!(easter_sunday(1943).unwrap(), NaiveDate::from_ymd_opt(1943, 4, 25).unwrap());
    }

    #[test]
    fn easter_is_sunday_in_window() {
        for year in 1900..=2400 {
            let easter = easter_sunday(year).unwrap();
            assert_eq!(easter.weekday(), Weekday::Sun, "year {}", year);
            let earliest = NaiveDate::from_ymd_opt(year, 3, 22).unwrap();
            let latest = NaiveDate::from_ymd_opt(year, 4, 25).unwrap();
            assert!(easter >= earliest && easter <= latest, "year {}: {}", year, easter);
        }
    }

    #[test]
    fn fixed_anchors() {
        assert_eq!(fixed_anchor(2019, 6, 19).unwrap(), NaiveDate::from_ymd_opt(2019, 6, 19).unwrap());
        assert_eq!(
            fixed_anchor(2019, 1, 32),
            Err(DateRuleError::InvalidDate { year: 2019, month: 1, day: 32 })
        );
        assert!(fixed_anchor(2019, 2, 29).is_err());
        assert!(fixed_anchor(2020, 2, 29).is_ok());
        assert!(fixed_anchor(2020, 13, 1).is_err());
    }

    #[test]
    fn weekday_search() {
        // 2019-06-19 was a Wednesday
        let anchor = NaiveDate::from_ymd_opt(2019, 6, 19).unwrap();
        assert_eq!(next_weekday_on_or_after(anchor, Weekday::Wed).unwrap(), anchor);
        assert_eq!(
            next_weekday_on_or_after(anchor, Weekday::Fri).unwrap(),
            NaiveDate::from_ymd_opt(2019, 6, 21).unwrap()
        );
        assert_eq!(
            next_weekday_on_or_after(anchor, Weekday::Tue).unwrap(),
            NaiveDate::from_ymd_opt(2019, 6, 25).unwrap()
        );
        // crossing a year boundary
        let anchor = NaiveDate::from_ymd_opt(2019, 12, 31).unwrap();
        assert_eq!(
            next_weekday_on_or_after(anchor, Weekday::Mon).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 6).unwrap()
        );
    }

    #[test]
    fn anchor_kinds() {
        assert_eq!(
            AnchorKind::EasterSunday.date_in(2019).unwrap(),
            NaiveDate::from_ymd_opt(2019, 4, 21).unwrap()
        );
        assert_eq!(
            AnchorKind::FixedCalendar { month: 10, day: 31 }.date_in(2019).unwrap(),
            NaiveDate::from_ymd_opt(2019, 10, 31).unwrap()
        );
        assert_eq!(
            AnchorKind::Unsupported("kwanzaa".to_string()).date_in(2019),
            Err(DateRuleError::UnknownAnchorKind("kwanzaa".to_string()))
        );
    }
}
