//! Rendering resolved holidays as JSON documents or CSV tables.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::country::CountryHolidaySet;
use crate::holiday::{Names, ResolvedHoliday};
use crate::holiday_set::BindingError;

const JSON_INDENT: &[u8] = b"    ";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("binding holidays failed")]
    Binding(#[from] BindingError),
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),
    #[error("CSV serialization failed")]
    Csv(#[from] csv::Error),
    #[error("failed to write '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A country with its holidays for one year, as written to JSON files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryDocument {
    #[serde(rename = "countrycode-alpha2")]
    pub alpha2: String,
    #[serde(rename = "countrycode-alpha3")]
    pub alpha3: String,
    #[serde(rename = "countrycode-numeric")]
    pub numeric_code: String,
    pub names: Names,
    pub holidays: Vec<ResolvedHoliday>,
}

impl CountryDocument {
    pub fn new(set: &CountryHolidaySet, holidays: Vec<ResolvedHoliday>) -> Self {
        CountryDocument {
            alpha2: set.alpha2().to_string(),
            alpha3: set.alpha3().to_string(),
            numeric_code: set.numeric_code().to_string(),
            names: set.names().clone(),
            holidays,
        }
    }

    pub fn bind(set: &CountryHolidaySet, year: i32) -> Result<Self, BindingError> {
        Ok(Self::new(set, set.bind_year(year)?))
    }
}

/// Write the holidays of `set` in `year` as a pretty printed JSON document
pub fn render_json<W: Write>(writer: W, set: &CountryHolidaySet, year: i32) -> Result<(), ExportError> {
    let document = CountryDocument::bind(set, year)?;
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    document.serialize(&mut serializer)?;
    serializer.into_inner().flush().map_err(serde_json::Error::io)?;
    Ok(())
}

/// Read back a document written by [`render_json`]
pub fn parse_json<R: Read>(reader: R) -> Result<CountryDocument, ExportError> {
    Ok(serde_json::from_reader(reader)?)
}

/// All locales used either for the country or any of its holidays, sorted
pub fn known_locales(set: &CountryHolidaySet) -> Vec<String> {
    let locales: BTreeSet<&String> = set
        .names()
        .keys()
        .chain(set.specifications().iter().flat_map(|s| s.names().keys()))
        .collect();
    locales.into_iter().cloned().collect()
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Write the holidays of `set` in `year` as CSV, one row per holiday
/// and one name column per known locale.
pub fn render_csv<W: Write>(writer: W, set: &CountryHolidaySet, year: i32) -> Result<(), ExportError> {
    let holidays = set.bind_year(year)?;
    let locales = known_locales(set);

    let mut wtr = csv::Writer::from_writer(writer);
    let mut header: Vec<String> = locales.iter().map(|l| format!("name_{}", l)).collect();
    header.extend(["date", "public_holiday", "common_holiday"].iter().map(|s| s.to_string()));
    wtr.write_record(&header)?;

    for holiday in &holidays {
        let mut row: Vec<String> = locales
            .iter()
            .map(|l| holiday.name(l).unwrap_or_default().to_string())
            .collect();
        row.push(holiday.date.to_string());
        row.push(yes_no(holiday.is_public()).to_string());
        row.push(yes_no(holiday.is_common()).to_string());
        wtr.write_record(&row)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn export_file<F>(folder: &Path, set: &CountryHolidaySet, year: i32, extension: &str, render: F) -> Result<PathBuf, ExportError>
where
    F: FnOnce(BufWriter<File>, &CountryHolidaySet, i32) -> Result<(), ExportError>,
{
    let path = folder.join(format!("{}-{}.{}", set.alpha2(), year, extension));
    let file = File::create(&path).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    render(BufWriter::new(file), set, year)?;
    Ok(path)
}

/// Create `<folder>/<ALPHA2>-<year>.json`
pub fn create_json_file(folder: &Path, set: &CountryHolidaySet, year: i32) -> Result<PathBuf, ExportError> {
    let path = export_file(folder, set, year, "json", |w, s, y| render_json(w, s, y))?;
    info!("Created JSON file {}", path.display());
    Ok(path)
}

/// Create `<folder>/<ALPHA2>-<year>.csv`
pub fn create_csv_file(folder: &Path, set: &CountryHolidaySet, year: i32) -> Result<PathBuf, ExportError> {
    let path = export_file(folder, set, year, "csv", |w, s, y| render_csv(w, s, y))?;
    info!("Created CSV file {}", path.display());
    Ok(path)
}

pub fn holidays_in_month(holidays: &[ResolvedHoliday], month: u32) -> Vec<ResolvedHoliday> {
    holidays.iter().filter(|h| h.date.month() == month).cloned().collect()
}

pub fn holidays_on(holidays: &[ResolvedHoliday], date: NaiveDate) -> Vec<ResolvedHoliday> {
    holidays.iter().filter(|h| h.date == date).cloned().collect()
}
