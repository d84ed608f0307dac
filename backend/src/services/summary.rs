//! Headline metrics and filter-control options.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::aggregation::count_distinct;
use crate::models::{Dimension, Record, ALL_SENTINEL};

/// Headline numbers shown above the charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_records: usize,
    pub unique_sectors: usize,
    pub unique_departments: usize,
    pub unique_organization_types: usize,
}

/// Earliest and latest observation dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

/// Choices offered by the filter controls.
///
/// Each list starts with the "All" sentinel followed by the sorted distinct values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub sectors: Vec<String>,
    pub departments: Vec<String>,
    pub organization_types: Vec<String>,
    /// `None` when no record has a date; the date filter is then hidden
    pub date_bounds: Option<DateBounds>,
}

pub fn compute_summary(records: &[Record]) -> SummaryMetrics {
    SummaryMetrics {
        total_records: records.len(),
        unique_sectors: count_distinct(records, &Dimension::Sector),
        unique_departments: count_distinct(records, &Dimension::DepartmentCode),
        unique_organization_types: count_distinct(records, &Dimension::OrganizationType),
    }
}

/// `"All"` followed by the distinct non-missing values of `dimension`, sorted.
pub fn options_for(records: &[Record], dimension: &Dimension) -> Vec<String> {
    let distinct: BTreeSet<&str> = records.iter().filter_map(|r| dimension.value_of(r)).collect();

    std::iter::once(ALL_SENTINEL.to_string())
        .chain(distinct.into_iter().map(str::to_string))
        .collect()
}

pub fn date_bounds(records: &[Record]) -> Option<DateBounds> {
    let mut dates = records.iter().filter_map(Record::observed_on);
    let first = dates.next()?;
    let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some(DateBounds { min, max })
}

pub fn filter_options(records: &[Record]) -> FilterOptions {
    FilterOptions {
        sectors: options_for(records, &Dimension::Sector),
        departments: options_for(records, &Dimension::DepartmentCode),
        organization_types: options_for(records, &Dimension::OrganizationType),
        date_bounds: date_bounds(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_records() -> Vec<Record> {
        vec![
            Record::new()
                .with_sector("WASH")
                .with_department_code("HT01")
                .with_organization_type("ONG")
                .with_observed_on(day(2023, 3, 1)),
            Record::new()
                .with_sector("Health")
                .with_department_code("HT01")
                .with_observed_on(day(2022, 12, 24)),
            Record::new().with_sector("WASH"),
        ]
    }

    #[test]
    fn test_compute_summary() {
        let metrics = compute_summary(&sample_records());
        assert_eq!(
            metrics,
            SummaryMetrics {
                total_records: 3,
                unique_sectors: 2,
                unique_departments: 1,
                unique_organization_types: 1,
            }
        );
    }

    #[test]
    fn test_compute_summary_empty() {
        assert_eq!(compute_summary(&[]), SummaryMetrics::default());
    }

    #[test]
    fn test_filter_options() {
        let options = filter_options(&sample_records());
        assert_eq!(options.sectors, vec!["All", "Health", "WASH"]);
        assert_eq!(options.departments, vec!["All", "HT01"]);
        assert_eq!(options.organization_types, vec!["All", "ONG"]);
        assert_eq!(
            options.date_bounds,
            Some(DateBounds {
                min: day(2022, 12, 24),
                max: day(2023, 3, 1)
            })
        );
    }

    #[test]
    fn test_date_bounds_without_dates() {
        let records = vec![Record::new().with_sector("WASH")];
        assert_eq!(date_bounds(&records), None);
        assert_eq!(filter_options(&records).departments, vec!["All"]);
    }
}
