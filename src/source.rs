//! Sources of country holiday specifications.
//!
//! A source only knows which countries it can deliver and how to read their raw
//! JSON description. Parsing is done by [`CountryHolidaySet`]. Country
//! identifiers are ISO 3166 alpha-2 codes in upper case, lookups ignore case.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::country::{CountryHolidaySet, SpecificationError};

const SPECIFICATION_EXTENSION: &str = "json";

const BUILTIN_COUNTRIES: &[(&str, &str)] = &[("FI", include_str!("../countries/FI.json"))];

/// General interface for anything that provides country holiday specifications
pub trait SpecificationSource {
    /// Identifiers of all countries, sorted ascending
    fn list_available_countries(&self) -> Result<Vec<String>, SpecificationError>;

    /// Raw JSON description of a country
    fn read_specification(&self, country: &str) -> Result<String, SpecificationError>;

    /// Read and parse the specification of a single country.
    /// The alpha-2 code inside must match the identifier it is stored under.
    fn load(&self, country: &str) -> Result<CountryHolidaySet, SpecificationError> {
        let id = normalize_country(country);
        let json = self.read_specification(country)?;
        let set = CountryHolidaySet::from_json_str(&json).map_err(|err| match err {
            SpecificationError::MalformedSpecification(msg) => {
                SpecificationError::MalformedSpecification(format!("{}: {}", id, msg))
            }
            other => other,
        })?;
        if set.alpha2() != id {
            return Err(SpecificationError::MalformedSpecification(format!(
                "{}: countrycode-alpha2 is '{}'",
                id,
                set.alpha2()
            )));
        }
        Ok(set)
    }
}

pub fn normalize_country(country: &str) -> String {
    country.trim().to_ascii_uppercase()
}

/// Country specifications stored as `<ID>.json` files in one directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    path: PathBuf,
}

impl DirectorySource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        DirectorySource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(path: &Path, source: std::io::Error) -> SpecificationError {
        SpecificationError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl SpecificationSource for DirectorySource {
    fn list_available_countries(&self) -> Result<Vec<String>, SpecificationError> {
        let entries = fs::read_dir(&self.path).map_err(|e| Self::io_error(&self.path, e))?;
        let mut countries = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Self::io_error(&self.path, e))?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(SPECIFICATION_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                countries.push(normalize_country(stem));
            }
        }
        countries.sort();
        countries.dedup();
        Ok(countries)
    }

    fn read_specification(&self, country: &str) -> Result<String, SpecificationError> {
        let country = normalize_country(country);
        if !self.list_available_countries()?.contains(&country) {
            return Err(SpecificationError::UnknownCountry(country));
        }
        // the file name may differ in case from the normalized identifier
        let path = fs::read_dir(&self.path)
            .map_err(|e| Self::io_error(&self.path, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .find(|path| {
                path.extension().and_then(|e| e.to_str()) == Some(SPECIFICATION_EXTENSION)
                    && path.file_stem().and_then(|s| s.to_str()).map(normalize_country).as_deref()
                        == Some(country.as_str())
            })
            .ok_or_else(|| SpecificationError::UnknownCountry(country.clone()))?;
        debug!("reading holiday specification from {}", path.display());
        fs::read_to_string(&path).map_err(|e| Self::io_error(&path, e))
    }
}

/// Country specifications held in memory
#[derive(Debug, Clone, Default)]
pub struct EmbeddedSource {
    countries: BTreeMap<String, String>,
}

impl EmbeddedSource {
    pub fn new() -> Self {
        EmbeddedSource::default()
    }

    /// The data sets compiled into this crate
    pub fn builtin() -> Self {
        let mut source = EmbeddedSource::new();
        for (country, json) in BUILTIN_COUNTRIES {
            source.insert(country, *json);
        }
        source
    }

    pub fn insert<S: Into<String>>(&mut self, country: &str, json: S) {
        self.countries.insert(normalize_country(country), json.into());
    }
}

impl SpecificationSource for EmbeddedSource {
    fn list_available_countries(&self) -> Result<Vec<String>, SpecificationError> {
        Ok(self.countries.keys().cloned().collect())
    }

    fn read_specification(&self, country: &str) -> Result<String, SpecificationError> {
        let country = normalize_country(country);
        self.countries
            .get(&country)
            .cloned()
            .ok_or(SpecificationError::UnknownCountry(country))
    }
}

/// All countries of a source, loaded once and read-only afterwards
#[derive(Debug, Default)]
pub struct HolidayStore {
    countries: BTreeMap<String, CountryHolidaySet>,
    failures: Vec<(String, SpecificationError)>,
}

impl HolidayStore {
    /// Load every country the source offers. Countries that can't be loaded are
    /// logged and left out, the error is kept in [`HolidayStore::failures`].
    pub fn load_all(source: &dyn SpecificationSource) -> Result<Self, SpecificationError> {
        let mut store = HolidayStore::default();
        for country in source.list_available_countries()? {
            match source.load(&country) {
                Ok(set) => {
                    store.countries.insert(country, set);
                }
                Err(err) => {
                    warn!("skipping country {}: {}", country, err);
                    store.failures.push((country, err));
                }
            }
        }
        debug!("holiday store holds {} countries", store.countries.len());
        Ok(store)
    }

    pub fn get(&self, country: &str) -> Result<&CountryHolidaySet, SpecificationError> {
        let country = normalize_country(country);
        self.countries
            .get(&country)
            .ok_or(SpecificationError::UnknownCountry(country))
    }

    /// Identifiers of the loaded countries, sorted ascending
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryHolidaySet> {
        self.countries.values()
    }

    pub fn failures(&self) -> &[(String, SpecificationError)] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    const MINIMAL_SE: &str = r#"{
        "names": {"sv": "Sverige"},
        "countrycode-alpha2": "SE",
        "countrycode-alpha3": "SWE",
        "countrycode-numeric": "752",
        "days": [{"names": {"sv": "Nyårsdagen"}, "tags": ["public"], "date": {"month": 1, "day": 1}}]
    }"#;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn builtin_source() {
        let source = EmbeddedSource::builtin();
        assert_eq!(source.list_available_countries().unwrap(), vec!["FI".to_string()]);
        let fi = source.load("fi").unwrap();
        assert_eq!(fi.alpha2(), "FI");
        assert!(matches!(source.load("XX"), Err(SpecificationError::UnknownCountry(c)) if c == "XX"));
    }

    #[test]
    fn directory_source() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "SE.json", MINIMAL_SE);
        write_file(dir.path(), "fi.json", &EmbeddedSource::builtin().read_specification("FI").unwrap());
        write_file(dir.path(), "README.txt", "not a country");
        fs::create_dir(dir.path().join("DE.json")).unwrap();

        let source = DirectorySource::new(dir.path());
        assert_eq!(source.list_available_countries().unwrap(), vec!["FI".to_string(), "SE".to_string()]);
        assert_eq!(source.load("se").unwrap().alpha3(), "SWE");
        assert_eq!(source.load("FI").unwrap().alpha3(), "FIN");
        assert!(matches!(source.load("DE"), Err(SpecificationError::UnknownCountry(_))));
    }

    #[test]
    fn file_name_must_match_country_code() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "FI.json", MINIMAL_SE);
        let source = DirectorySource::new(dir.path());
        match source.load("FI") {
            Err(SpecificationError::MalformedSpecification(msg)) => {
                assert_eq!(msg, "FI: countrycode-alpha2 is 'SE'")
            }
            other => panic!("unexpected result {:?}", other),
        }

        let store = HolidayStore::load_all(&source).unwrap();
        assert_eq!(store.countries().count(), 0);
        assert_eq!(store.failures().len(), 1);
    }

    #[test]
    fn missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path().join("does-not-exist"));
        assert!(matches!(source.list_available_countries(), Err(SpecificationError::Io { .. })));
    }

    #[test]
    fn store_keeps_valid_countries() {
        let mut source = EmbeddedSource::builtin();
        source.insert("se", MINIMAL_SE);
        source.insert("XX", r#"{"countrycode-alpha2": "XX"}"#);
        let store = HolidayStore::load_all(&source).unwrap();

        assert_eq!(store.countries().collect::<Vec<_>>(), vec!["FI", "SE"]);
        assert_eq!(store.get("se").unwrap().alpha2(), "SE");
        assert!(matches!(store.get("XX"), Err(SpecificationError::UnknownCountry(_))));
        assert_eq!(store.failures().len(), 1);
        let (country, err) = &store.failures()[0];
        assert_eq!(country, "XX");
        match err {
            SpecificationError::MalformedSpecification(msg) => assert!(msg.starts_with("XX: ")),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
