//! Group-by counting for chart series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{DateDimension, Dimension, Record};

/// One bar (or slice) of a categorical chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
}

/// One point of a date-bucketed series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// A pie slice with its share of the series total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub share: f64,
}

/// Columnar form handed to bar/pie renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySeries {
    pub categories: Vec<String>,
    pub values: Vec<usize>,
}

/// Columnar form handed to line renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSeries {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<usize>,
}

/// Count records per distinct value of `dimension`, ascending by key.
///
/// Records missing the dimension are dropped rather than bucketed.
pub fn group_and_count(records: &[Record], dimension: &Dimension) -> Vec<GroupCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in records.iter().filter_map(|r| dimension.value_of(r)) {
        *counts.entry(value).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(key, count)| GroupCount {
            key: key.to_string(),
            count,
        })
        .collect()
}

/// Count records per calendar date, ascending. Time of day is truncated.
pub fn time_series(records: &[Record], date_dimension: &DateDimension) -> Vec<DateCount> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for ts in records.iter().filter_map(|r| date_dimension.value_of(r)) {
        *counts.entry(ts.date()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(date, count)| DateCount { date, count })
        .collect()
}

/// Grouped counts with each slice's fraction of the total.
pub fn pie_slices(records: &[Record], dimension: &Dimension) -> Vec<PieSlice> {
    let groups = group_and_count(records, dimension);
    let total: usize = groups.iter().map(|g| g.count).sum();

    groups
        .into_iter()
        .map(|g| PieSlice {
            share: if total == 0 {
                0.0
            } else {
                g.count as f64 / total as f64
            },
            label: g.key,
            count: g.count,
        })
        .collect()
}

/// Number of distinct non-missing values of `dimension`.
pub fn count_distinct(records: &[Record], dimension: &Dimension) -> usize {
    records
        .iter()
        .filter_map(|r| dimension.value_of(r))
        .collect::<BTreeSet<_>>()
        .len()
}

impl From<Vec<GroupCount>> for CategorySeries {
    fn from(groups: Vec<GroupCount>) -> Self {
        let (categories, values) = groups.into_iter().map(|g| (g.key, g.count)).unzip();
        Self { categories, values }
    }
}

impl From<Vec<PieSlice>> for CategorySeries {
    fn from(slices: Vec<PieSlice>) -> Self {
        let (categories, values) = slices.into_iter().map(|s| (s.label, s.count)).unzip();
        Self { categories, values }
    }
}

impl From<Vec<DateCount>> for DateSeries {
    fn from(points: Vec<DateCount>) -> Self {
        let (dates, values) = points.into_iter().map(|p| (p.date, p.count)).unzip();
        Self { dates, values }
    }
}

impl CategorySeries {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn total(&self) -> usize {
        self.values.iter().sum()
    }
}

impl DateSeries {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[cfg(test)]
#[path = "aggregation_tests.rs"]
mod tests;
