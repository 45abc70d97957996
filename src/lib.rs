//! # holidays
//!
//! Computes public and common holiday dates for a country and year from
//! declarative, year-independent data.
//!
//! A country is described once by a list of holiday specifications, each with
//! names per locale, classification tags and a date rule. A rule is either a fixed
//! calendar day, a number of days relative to an anchor date (e.g. Good Friday is
//! two days before Easter Sunday), or the first given weekday on or after an
//! anchor date (e.g. Midsummer Eve in Finland is the Friday between June 19th
//! and 25th). Binding a country to a year resolves every rule to a concrete date.
//!
//! ```
//! use holidays::{EmbeddedSource, SpecificationSource};
//!
//! let finland = EmbeddedSource::builtin().load("FI").unwrap();
//! for holiday in finland.bind_year(2019).unwrap() {
//!     println!("{} {}", holiday.date, holiday.name("en").unwrap_or_default());
//! }
//! ```
//!
//! Resolved holidays can be rendered as JSON or CSV (see [`export`]) or served
//! over HTTP (see [`web`]).

pub mod anchor;
pub mod config;
pub mod country;
pub mod date_rule;
pub mod export;
pub mod holiday;
pub mod holiday_set;
pub mod source;
pub mod web;

pub use anchor::{easter_sunday, fixed_anchor, AnchorKind};
pub use country::{CountryHolidaySet, SpecificationError};
pub use date_rule::{DateRule, DateRuleError};
pub use holiday::{HolidaySpecification, Names, ResolvedHoliday, Tags};
pub use holiday_set::{bind_year, BindingError};
pub use source::{DirectorySource, EmbeddedSource, HolidayStore, SpecificationSource};
