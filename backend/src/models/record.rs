//! Operational-presence records and the dimensions they can be grouped by.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::transformations::cleaning::parse_observed_at;

/// One operational-presence observation.
///
/// The four interpreted attributes are pulled out of the source row through a
/// [`ColumnMapping`]; every other column is kept verbatim in `attributes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub sector: Option<String>,
    pub department_code: Option<String>,
    pub organization_type: Option<String>,
    pub observed_at: Option<NaiveDateTime>,
    /// Passthrough columns, keyed by source column name
    #[serde(default)]
    pub attributes: BTreeMap<String, Option<String>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_department_code(mut self, code: impl Into<String>) -> Self {
        self.department_code = Some(code.into());
        self
    }

    pub fn with_organization_type(mut self, org_type: impl Into<String>) -> Self {
        self.organization_type = Some(org_type.into());
        self
    }

    pub fn with_observed_at(mut self, observed_at: NaiveDateTime) -> Self {
        self.observed_at = Some(observed_at);
        self
    }

    /// Set `observed_at` to midnight of `date`.
    pub fn with_observed_on(self, date: NaiveDate) -> Self {
        self.with_observed_at(date.and_time(chrono::NaiveTime::MIN))
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: Option<String>) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Calendar date of the observation, if present.
    pub fn observed_on(&self) -> Option<NaiveDate> {
        self.observed_at.map(|ts| ts.date())
    }

    /// Value of a passthrough attribute; missing and absent look the same.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(|v| v.as_deref())
    }
}

/// Which source columns feed the interpreted record attributes.
///
/// Defaults match the column names of the operational-presence extract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    #[serde(default = "default_sector_column")]
    pub sector: String,
    #[serde(default = "default_department_column")]
    pub department_code: String,
    #[serde(default = "default_organization_type_column")]
    pub organization_type: String,
    #[serde(default = "default_date_column")]
    pub observed_at: String,
}

fn default_sector_column() -> String {
    "Secteur".to_string()
}

fn default_department_column() -> String {
    "adm1code".to_string()
}

fn default_organization_type_column() -> String {
    "Typedorganisation".to_string()
}

fn default_date_column() -> String {
    "date".to_string()
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            sector: default_sector_column(),
            department_code: default_department_column(),
            organization_type: default_organization_type_column(),
            observed_at: default_date_column(),
        }
    }
}

impl ColumnMapping {
    /// True if `column` is one of the four interpreted columns.
    pub fn is_mapped(&self, column: &str) -> bool {
        column == self.sector
            || column == self.department_code
            || column == self.organization_type
            || column == self.observed_at
    }
}

/// A categorical attribute used for filtering and grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Sector,
    DepartmentCode,
    OrganizationType,
    /// Passthrough column by source name
    Attribute(String),
}

impl Dimension {
    /// The record's value for this dimension, `None` when missing.
    pub fn value_of<'a>(&self, record: &'a Record) -> Option<&'a str> {
        match self {
            Dimension::Sector => record.sector.as_deref(),
            Dimension::DepartmentCode => record.department_code.as_deref(),
            Dimension::OrganizationType => record.organization_type.as_deref(),
            Dimension::Attribute(name) => record.attribute(name),
        }
    }

    /// Human-readable axis label.
    pub fn label(&self) -> String {
        match self {
            Dimension::Sector => "Sector".to_string(),
            Dimension::DepartmentCode => "Department".to_string(),
            Dimension::OrganizationType => "Organization Type".to_string(),
            Dimension::Attribute(name) => name.clone(),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Sector => write!(f, "sector"),
            Dimension::DepartmentCode => write!(f, "department"),
            Dimension::OrganizationType => write!(f, "organization_type"),
            Dimension::Attribute(name) => write!(f, "attr:{}", name),
        }
    }
}

impl FromStr for Dimension {
    type Err = String;

    /// Parses `sector`, `department`, `organization_type` (plus a few aliases)
    /// or `attr:<column>` for passthrough columns.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(name) = s.strip_prefix("attr:") {
            if name.is_empty() {
                return Err("Attribute dimension needs a column name".to_string());
            }
            return Ok(Dimension::Attribute(name.to_string()));
        }

        match s.to_lowercase().as_str() {
            "sector" | "secteur" => Ok(Dimension::Sector),
            "department" | "department_code" | "dept" | "adm1code" => {
                Ok(Dimension::DepartmentCode)
            }
            "organization_type" | "org_type" | "typedorganisation" => {
                Ok(Dimension::OrganizationType)
            }
            other => Err(format!(
                "Unknown dimension '{}'. Use sector, department, organization_type or attr:<column>",
                other
            )),
        }
    }
}

/// A temporal attribute used for date-bucketed series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateDimension {
    #[default]
    ObservedAt,
    /// Passthrough column, coerced with the loader's date rules
    Attribute(String),
}

impl DateDimension {
    pub fn value_of(&self, record: &Record) -> Option<NaiveDateTime> {
        match self {
            DateDimension::ObservedAt => record.observed_at,
            DateDimension::Attribute(name) => record.attribute(name).and_then(parse_observed_at),
        }
    }
}
