//! Holiday specifications and their resolution for a single year.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::country::SpecificationError;
use crate::date_rule::{DateRule, DateRuleError};

/// Locale code (e.g. "fi", "en") mapped to a display name
pub type Names = BTreeMap<String, String>;

/// Classification tags, e.g. "public" or "common"
pub type Tags = BTreeSet<String>;

pub const PUBLIC_TAG: &str = "public";
pub const COMMON_TAG: &str = "common";

const DEFAULT_LOCALE: &str = "en";

/// Pick the English name if available, the first name otherwise
pub fn display_name(names: &Names) -> Option<&str> {
    names
        .get(DEFAULT_LOCALE)
        .or_else(|| names.values().next())
        .map(String::as_str)
}

/// A named holiday whose date is given by a rule rather than fixed to a year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidaySpecification {
    names: Names,
    tags: Tags,
    rule: DateRule,
}

impl HolidaySpecification {
    /// A holiday needs a name in at least one locale
    pub fn new(names: Names, tags: Tags, rule: DateRule) -> Result<Self, SpecificationError> {
        if names.is_empty() {
            return Err(SpecificationError::MalformedSpecification(
                "holiday has no names".to_string(),
            ));
        }
        Ok(HolidaySpecification { names, tags, rule })
    }

    pub fn names(&self) -> &Names {
        &self.names
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn rule(&self) -> &DateRule {
        &self.rule
    }

    pub fn name(&self, locale: &str) -> Option<&str> {
        self.names.get(locale).map(String::as_str)
    }

    pub fn display_name(&self) -> &str {
        display_name(&self.names).unwrap_or_default()
    }

    /// Bind the specification to a concrete year
    pub fn resolve(&self, year: i32) -> Result<ResolvedHoliday, DateRuleError> {
        let date = self.rule.resolve(year)?;
        Ok(ResolvedHoliday {
            date,
            names: self.names.clone(),
            tags: self.tags.clone(),
        })
    }
}

/// A holiday bound to one calendar date
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedHoliday {
    pub date: NaiveDate,
    pub names: Names,
    pub tags: Tags,
}

impl ResolvedHoliday {
    pub fn name(&self, locale: &str) -> Option<&str> {
        self.names.get(locale).map(String::as_str)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_public(&self) -> bool {
        self.has_tag(PUBLIC_TAG)
    }

    pub fn is_common(&self) -> bool {
        self.has_tag(COMMON_TAG)
    }
}
