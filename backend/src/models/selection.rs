//! Filter selections: the user's current combination of constraints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Label the filter controls use for "no constraint".
pub const ALL_SENTINEL: &str = "All";

/// Exact-match constraint on one categorical attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    #[default]
    Any,
    Exactly(String),
}

impl Constraint {
    /// Build from an optional request parameter; `None` and `"All"` mean no constraint.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            None => Constraint::Any,
            Some(v) if v == ALL_SENTINEL => Constraint::Any,
            Some(v) => Constraint::Exactly(v.to_string()),
        }
    }

    /// A missing attribute never satisfies a concrete constraint.
    pub fn accepts(&self, value: Option<&str>) -> bool {
        match self {
            Constraint::Any => true,
            Constraint::Exactly(expected) => value == Some(expected.as_str()),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Constraint::Any)
    }
}

/// Date range as entered; only a range with both bounds constrains anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn partial(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Inclusive bounds when the range is well formed.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

/// Immutable filter selection. The default value constrains nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub sector: Constraint,
    #[serde(default)]
    pub department_code: Constraint,
    #[serde(default)]
    pub organization_type: Constraint,
    #[serde(default)]
    pub date_range: Option<DateRange>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Constraint::Exactly(sector.into());
        self
    }

    pub fn with_department_code(mut self, code: impl Into<String>) -> Self {
        self.department_code = Constraint::Exactly(code.into());
        self
    }

    pub fn with_organization_type(mut self, org_type: impl Into<String>) -> Self {
        self.organization_type = Constraint::Exactly(org_type.into());
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Inclusive date bounds, if the selection carries a two-bound range.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_range.as_ref().and_then(DateRange::bounds)
    }

    /// True when applying this selection can't drop any record.
    pub fn is_unconstrained(&self) -> bool {
        self.sector.is_any()
            && self.department_code.is_any()
            && self.organization_type.is_any()
            && self.date_bounds().is_none()
    }
}
