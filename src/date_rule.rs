//! Year-independent date rules and their resolution to a concrete date.

use chrono::{NaiveDate, Weekday};
use thiserror::Error;

use crate::anchor::{fixed_anchor, next_weekday_on_or_after, shift_days, AnchorKind};

/// Error raised while resolving a rule for a given year
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRuleError {
    #[error("{year:04}-{month:02}-{day:02} is not a valid calendar date")]
    InvalidDate { year: i32, month: u32, day: u32 },
    #[error("shifting {date} by {days} days leaves the supported date range")]
    DateOutOfRange { date: NaiveDate, days: i64 },
    #[error("Easter is undefined for year {year}: {reason}")]
    EasterUndefined { year: i32, reason: String },
    #[error("unknown anchor kind '{0}'")]
    UnknownAnchorKind(String),
}

/// Rule describing on which date a holiday falls in any given year
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateRule {
    /// Same month and day every year
    FixedDate { month: u32, day: u32 },
    /// A number of days before (negative) or after the anchor date
    AnchorOffset { anchor: AnchorKind, day_offset: i32 },
    /// First `weekday` on or after the anchor date
    AnchorWeekday { anchor: AnchorKind, weekday: Weekday },
}

impl DateRule {
    /// Anchor the rule is relative to, if any
    pub fn anchor(&self) -> Option<&AnchorKind> {
        match self {
            DateRule::FixedDate { .. } => None,
            DateRule::AnchorOffset { anchor, .. } | DateRule::AnchorWeekday { anchor, .. } => Some(anchor),
        }
    }

    /// Compute the date this rule refers to in `year`
    pub fn resolve(&self, year: i32) -> Result<NaiveDate, DateRuleError> {
        match self {
            DateRule::FixedDate { month, day } => fixed_anchor(year, *month, *day),
            DateRule::AnchorOffset { anchor, day_offset } => {
                let date = anchor.date_in(year)?;
                shift_days(date, i64::from(*day_offset))
            }
            DateRule::AnchorWeekday { anchor, weekday } => {
                let date = anchor.date_in(year)?;
                next_weekday_on_or_after(date, *weekday)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn fixed_dates() {
        let new_year = DateRule::FixedDate { month: 1, day: 1 };
        for year in 1900..=2400 {
            assert_eq!(new_year.resolve(year).unwrap(), ymd(year, 1, 1));
        }
        let leap_day = DateRule::FixedDate { month: 2, day: 29 };
        assert_eq!(leap_day.resolve(2020).unwrap(), ymd(2020, 2, 29));
        assert_eq!(
            leap_day.resolve(2019),
            Err(DateRuleError::InvalidDate { year: 2019, month: 2, day: 29 })
        );
    }

    #[test]
    fn easter_offsets() {
        let good_friday = DateRule::AnchorOffset { anchor: AnchorKind::EasterSunday, day_offset: -2 };
        let ascension = DateRule::AnchorOffset { anchor: AnchorKind::EasterSunday, day_offset: 39 };
        let easter = DateRule::AnchorOffset { anchor: AnchorKind::EasterSunday, day_offset: 0 };
        assert_eq!(good_friday.resolve(2019).unwrap(), ymd(2019, 4, 19));
        assert_eq!(ascension.resolve(2019).unwrap(), ymd(2019, 5, 30));
        assert_eq!(easter.resolve(2019).unwrap(), ymd(2019, 4, 21));
    }

    #[test]
    fn offsets_cross_boundaries() {
        let before = DateRule::AnchorOffset {
            anchor: AnchorKind::FixedCalendar { month: 1, day: 1 },
            day_offset: -1,
        };
        assert_eq!(before.resolve(2020).unwrap(), ymd(2019, 12, 31));
        let after = DateRule::AnchorOffset {
            anchor: AnchorKind::FixedCalendar { month: 2, day: 28 },
            day_offset: 1,
        };
        assert_eq!(after.resolve(2020).unwrap(), ymd(2020, 2, 29));
        assert_eq!(after.resolve(2019).unwrap(), ymd(2019, 3, 1));
    }

    #[test]
    fn offsets_are_reversible() {
        for year in 1900..=2100 {
            for offset in [-47, -2, 0, 1, 39, 49, 400] {
                let easter = AnchorKind::EasterSunday.date_in(year).unwrap();
                let shifted = DateRule::AnchorOffset { anchor: AnchorKind::EasterSunday, day_offset: offset }
                    .resolve(year)
                    .unwrap();
                if offset == 0 {
                    assert_eq!(shifted, easter);
                }
                let back = DateRule::AnchorOffset {
                    anchor: AnchorKind::FixedCalendar { month: shifted.month(), day: shifted.day() },
                    day_offset: -offset,
                }
                .resolve(shifted.year())
                .unwrap();
                assert_eq!(back, easter, "year {} offset {}", year, offset);
            }
        }
    }

    #[test]
    fn weekday_anchored() {
        let weekdays = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        let anchor = AnchorKind::FixedCalendar { month: 6, day: 19 };
        for year in 1900..=2400 {
            let anchor_date = anchor.date_in(year).unwrap();
            for weekday in weekdays {
                let rule = DateRule::AnchorWeekday { anchor: anchor.clone(), weekday };
                let date = rule.resolve(year).unwrap();
                assert_eq!(date.weekday(), weekday);
                assert!(date >= anchor_date);
                assert!((date - anchor_date).num_days() <= 6);
            }
        }
    }

    #[test]
    fn midsummer_and_all_saints() {
        let midsummer_eve = DateRule::AnchorWeekday {
            anchor: AnchorKind::FixedCalendar { month: 6, day: 19 },
            weekday: Weekday::Fri,
        };
        let all_saints = DateRule::AnchorWeekday {
            anchor: AnchorKind::FixedCalendar { month: 10, day: 31 },
            weekday: Weekday::Sat,
        };
        assert_eq!(midsummer_eve.resolve(2019).unwrap(), ymd(2019, 6, 21));
        assert_eq!(midsummer_eve.resolve(2020).unwrap(), ymd(2020, 6, 19));
        assert_eq!(all_saints.resolve(2019).unwrap(), ymd(2019, 11, 2));
        assert_eq!(all_saints.resolve(2020).unwrap(), ymd(2020, 10, 31));
    }

    #[test]
    fn unsupported_anchor() {
        let rule = DateRule::AnchorOffset {
            anchor: AnchorKind::Unsupported("kwanzaa".to_string()),
            day_offset: 0,
        };
        assert_eq!(rule.resolve(2019), Err(DateRuleError::UnknownAnchorKind("kwanzaa".to_string())));
        let rule = DateRule::AnchorWeekday {
            anchor: AnchorKind::Unsupported("kwanzaa".to_string()),
            weekday: Weekday::Mon,
        };
        assert!(matches!(rule.resolve(2019), Err(DateRuleError::UnknownAnchorKind(_))));
    }
}
