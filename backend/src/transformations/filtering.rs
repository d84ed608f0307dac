use chrono::NaiveDate;
use tracing::debug;

use crate::models::{Dimension, FilterSelection, Record};

/// True if `record` satisfies every constraint of `selection`.
pub fn matches(record: &Record, selection: &FilterSelection) -> bool {
    if !selection.sector.accepts(record.sector.as_deref()) {
        return false;
    }
    if !selection
        .department_code
        .accepts(record.department_code.as_deref())
    {
        return false;
    }
    if !selection
        .organization_type
        .accepts(record.organization_type.as_deref())
    {
        return false;
    }

    match selection.date_bounds() {
        Some((start, end)) => within(record, start, end),
        None => true,
    }
}

fn within(record: &Record, start: NaiveDate, end: NaiveDate) -> bool {
    record
        .observed_on()
        .map(|date| date >= start && date <= end)
        .unwrap_or(false)
}

/// Apply a filter selection, returning a new record set.
///
/// Constraints compose with AND. The input is never modified; an unconstrained
/// selection returns a copy of the input.
pub fn apply(records: &[Record], selection: &FilterSelection) -> Vec<Record> {
    if selection.is_unconstrained() {
        return records.to_vec();
    }

    let filtered: Vec<Record> = records
        .iter()
        .filter(|r| matches(r, selection))
        .cloned()
        .collect();

    debug!(
        input = records.len(),
        output = filtered.len(),
        "applied filter selection"
    );
    filtered
}

/// Filter records by exact value of one dimension
pub fn filter_by_dimension(records: &[Record], dimension: &Dimension, value: &str) -> Vec<Record> {
    records
        .iter()
        .filter(|r| dimension.value_of(r) == Some(value))
        .cloned()
        .collect()
}

/// Filter records whose observation date lies in `[start, end]`
pub fn filter_by_date_range(records: &[Record], start: NaiveDate, end: NaiveDate) -> Vec<Record> {
    records
        .iter()
        .filter(|r| within(r, start, end))
        .cloned()
        .collect()
}

/// Report how many records lack each interpreted attribute.
///
/// Missing values are legal; the report only tells the user how much of the
/// data drops out of each chart.
pub fn validate_records(records: &[Record]) -> (bool, Vec<String>) {
    let mut issues: Vec<String> = Vec::new();

    let checks: [(&str, fn(&Record) -> bool); 4] = [
        ("sector", |r| r.sector.is_none()),
        ("department code", |r| r.department_code.is_none()),
        ("organization type", |r| r.organization_type.is_none()),
        ("date", |r| r.observed_at.is_none()),
    ];

    for (label, is_missing) in checks {
        let missing = records.iter().filter(|r| is_missing(r)).count();
        if missing > 0 {
            issues.push(format!(
                "{} of {} rows have a missing {}",
                missing,
                records.len(),
                label
            ));
        }
    }

    (issues.is_empty(), issues)
}
