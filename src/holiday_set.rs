//! Binding a country's holiday specifications to a concrete year.

use log::debug;
use thiserror::Error;

use crate::country::CountryHolidaySet;
use crate::date_rule::DateRuleError;
use crate::holiday::ResolvedHoliday;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("failed to bind holiday #{index} '{name}' of {country} to year {year}")]
    HolidayBindingFailed {
        country: String,
        index: usize,
        name: String,
        year: i32,
        #[source]
        source: DateRuleError,
    },
}

/// Resolve all holidays of `set` for `year`.
///
/// The result holds exactly one holiday per specification, in the order the
/// specifications were loaded. The first specification that can't be resolved
/// aborts the binding, a partial holiday list is never returned.
pub fn bind_year(set: &CountryHolidaySet, year: i32) -> Result<Vec<ResolvedHoliday>, BindingError> {
    let holidays = set
        .specifications()
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            spec.resolve(year)
                .map_err(|source| BindingError::HolidayBindingFailed {
                    country: set.alpha2().to_string(),
                    index,
                    name: spec.display_name().to_string(),
                    year,
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!("bound {} holidays of {} to year {}", holidays.len(), set.alpha2(), year);
    Ok(holidays)
}
