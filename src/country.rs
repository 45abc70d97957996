//! A country's holiday specifications, as loaded from a JSON data source.
//!
//! Loading is strict: any missing, unknown or inconsistent field rejects the whole
//! country, nothing is silently defaulted except an absent `tags` list.

use std::io::Read;
use std::path::PathBuf;

use chrono::{NaiveDate, Weekday};
use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::anchor::AnchorKind;
use crate::date_rule::DateRule;
use crate::holiday::{HolidaySpecification, Names, ResolvedHoliday, Tags};
use crate::holiday_set::{bind_year, BindingError};

/// Error related to loading holiday specifications
#[derive(Error, Debug)]
pub enum SpecificationError {
    #[error("malformed holiday specification: {0}")]
    MalformedSpecification(String),
    #[error("unknown country '{0}'")]
    UnknownCountry(String),
    #[error("failed to access '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SpecificationError {
    fn malformed<T: Into<String>>(msg: T) -> Self {
        SpecificationError::MalformedSpecification(msg.into())
    }
}

impl From<serde_json::Error> for SpecificationError {
    fn from(err: serde_json::Error) -> Self {
        SpecificationError::MalformedSpecification(err.to_string())
    }
}

/// Anchor names accepted in the `type` field of a `special-date`
const EASTER: &str = "easter";
const MIDSUMMER: &str = "midsummer";
const ALL_SAINTS: &str = "allsaints";
const FIXED: &str = "fixed";

#[derive(Deserialize)]
#[serde(untagged)]
enum NumericCodeJsonProp {
    Text(String),
    Number(u64),
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct CountryJsonProp {
    names: Names,
    countrycode_alpha2: String,
    countrycode_alpha3: String,
    countrycode_numeric: NumericCodeJsonProp,
    days: Vec<DayJsonProp>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct DayJsonProp {
    names: Names,
    #[serde(default)]
    tags: Tags,
    date: Option<FixedDateJsonProp>,
    special_date: Option<SpecialDateJsonProp>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FixedDateJsonProp {
    month: u32,
    day: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct SpecialDateJsonProp {
    #[serde(rename = "type")]
    kind: String,
    days_difference: Option<i32>,
    weekday: Option<u8>,
    month: Option<u32>,
    day: Option<u32>,
}

/// Month and day must exist at least in leap years
fn check_month_day(month: u32, day: u32) -> Result<(), SpecificationError> {
    match NaiveDate::from_ymd_opt(2000, month, day) {
        Some(_) => Ok(()),
        None => Err(SpecificationError::malformed(format!(
            "month {} and day {} do not form a calendar day",
            month, day
        ))),
    }
}

fn check_code(code: &str, len: usize, what: &str) -> Result<String, SpecificationError> {
    let code = code.trim();
    if code.len() == len && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(SpecificationError::malformed(format!(
            "{} must consist of {} letters, found '{}'",
            what, len, code
        )))
    }
}

fn numeric_code(prop: NumericCodeJsonProp) -> Result<String, SpecificationError> {
    let code = match prop {
        NumericCodeJsonProp::Text(text) => text.trim().to_string(),
        NumericCodeJsonProp::Number(number) => format!("{:03}", number),
    };
    if !code.is_empty() && code.len() <= 3 && code.chars().all(|c| c.is_ascii_digit()) {
        Ok(format!("{:0>3}", code))
    } else {
        Err(SpecificationError::malformed(format!(
            "countrycode-numeric must consist of up to 3 digits, found '{}'",
            code
        )))
    }
}

fn anchor_from_json(prop: &SpecialDateJsonProp) -> Result<AnchorKind, SpecificationError> {
    let has_month_day = prop.month.is_some() || prop.day.is_some();
    let anchor = match prop.kind.as_str() {
        EASTER => AnchorKind::EasterSunday,
        MIDSUMMER => AnchorKind::FixedCalendar { month: 6, day: 19 },
        ALL_SAINTS => AnchorKind::FixedCalendar { month: 10, day: 31 },
        FIXED => {
            return match (prop.month, prop.day) {
                (Some(month), Some(day)) => {
                    check_month_day(month, day)?;
                    Ok(AnchorKind::FixedCalendar { month, day })
                }
                _ => Err(SpecificationError::malformed(
                    "special-date of type 'fixed' requires month and day",
                )),
            };
        }
        other => AnchorKind::Unsupported(other.to_string()),
    };
    if has_month_day && !matches!(anchor, AnchorKind::Unsupported(_)) {
        return Err(SpecificationError::malformed(format!(
            "special-date of type '{}' does not take month or day",
            prop.kind
        )));
    }
    Ok(anchor)
}

fn rule_from_json(day: &DayJsonProp) -> Result<DateRule, SpecificationError> {
    match (&day.date, &day.special_date) {
        (Some(date), None) => {
            check_month_day(date.month, date.day)?;
            Ok(DateRule::FixedDate {
                month: date.month,
                day: date.day,
            })
        }
        (None, Some(special)) => {
            let anchor = anchor_from_json(special)?;
            match (special.days_difference, special.weekday) {
                (Some(day_offset), None) => Ok(DateRule::AnchorOffset { anchor, day_offset }),
                (None, None) => Ok(DateRule::AnchorOffset { anchor, day_offset: 0 }),
                (None, Some(weekday)) => {
                    let weekday = Weekday::try_from(weekday).map_err(|_| {
                        SpecificationError::malformed(format!(
                            "weekday must be within 0 (Monday) and 6 (Sunday), found {}",
                            weekday
                        ))
                    })?;
                    Ok(DateRule::AnchorWeekday { anchor, weekday })
                }
                (Some(_), Some(_)) => Err(SpecificationError::malformed(
                    "special-date must not have both days-difference and weekday",
                )),
            }
        }
        (None, None) => Err(SpecificationError::malformed(
            "day has neither date nor special-date",
        )),
        (Some(_), Some(_)) => Err(SpecificationError::malformed(
            "day has both date and special-date",
        )),
    }
}

fn specification_from_json(index: usize, day: DayJsonProp) -> Result<HolidaySpecification, SpecificationError> {
    let context = |err: SpecificationError| match err {
        SpecificationError::MalformedSpecification(msg) => {
            SpecificationError::MalformedSpecification(format!("day #{}: {}", index, msg))
        }
        other => other,
    };
    let rule = rule_from_json(&day).map_err(context)?;
    HolidaySpecification::new(day.names, day.tags, rule).map_err(context)
}

/// All holiday specifications of a country together with its ISO 3166 codes.
/// The set is read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryHolidaySet {
    alpha2: String,
    alpha3: String,
    numeric_code: String,
    names: Names,
    specifications: Vec<HolidaySpecification>,
}

impl CountryHolidaySet {
    pub fn new(
        alpha2: &str,
        alpha3: &str,
        numeric: &str,
        names: Names,
        specifications: Vec<HolidaySpecification>,
    ) -> Result<Self, SpecificationError> {
        Ok(CountryHolidaySet {
            alpha2: check_code(alpha2, 2, "countrycode-alpha2")?,
            alpha3: check_code(alpha3, 3, "countrycode-alpha3")?,
            numeric_code: numeric_code(NumericCodeJsonProp::Text(numeric.to_string()))?,
            names,
            specifications,
        })
    }

    /// Parse a country description given as JSON text
    pub fn from_json_str(json: &str) -> Result<Self, SpecificationError> {
        let prop: CountryJsonProp = serde_json::from_str(json)?;
        Self::from_json_prop(prop)
    }

    /// Parse a country description read from any reader, e.g. a file
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SpecificationError> {
        let prop: CountryJsonProp = serde_json::from_reader(reader)?;
        Self::from_json_prop(prop)
    }

    pub fn from_json_value(json: serde_json::Value) -> Result<Self, SpecificationError> {
        let prop: CountryJsonProp = serde_json::from_value(json)?;
        Self::from_json_prop(prop)
    }

    fn from_json_prop(prop: CountryJsonProp) -> Result<Self, SpecificationError> {
        let specifications = prop
            .days
            .into_iter()
            .enumerate()
            .map(|(index, day)| specification_from_json(index, day))
            .collect::<Result<Vec<_>, _>>()?;
        let set = CountryHolidaySet {
            alpha2: check_code(&prop.countrycode_alpha2, 2, "countrycode-alpha2")?,
            alpha3: check_code(&prop.countrycode_alpha3, 3, "countrycode-alpha3")?,
            numeric_code: numeric_code(prop.countrycode_numeric)?,
            names: prop.names,
            specifications,
        };
        debug!(
            "loaded {} holiday specifications for {}",
            set.specifications.len(),
            set.alpha2
        );
        Ok(set)
    }

    pub fn alpha2(&self) -> &str {
        &self.alpha2
    }

    pub fn alpha3(&self) -> &str {
        &self.alpha3
    }

    pub fn numeric_code(&self) -> &str {
        &self.numeric_code
    }

    /// Name of the country per locale, possibly empty
    pub fn names(&self) -> &Names {
        &self.names
    }

    pub fn specifications(&self) -> &[HolidaySpecification] {
        &self.specifications
    }

    /// Resolve every specification for `year`, keeping the load order
    pub fn bind_year(&self, year: i32) -> Result<Vec<ResolvedHoliday>, BindingError> {
        bind_year(self, year)
    }
}
