use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Cell contents read as missing, matching the usual spreadsheet/CSV NA markers.
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// True if a raw cell should be treated as missing.
pub fn is_missing(raw: &str) -> bool {
    let trimmed = raw.trim();
    MISSING_MARKERS.contains(&trimmed)
}

/// Normalize a raw cell: NA markers become `None`, anything else is kept as written.
pub fn normalize_missing(raw: Option<&str>) -> Option<String> {
    match raw {
        Some(value) if !is_missing(value) => Some(value.to_string()),
        _ => None,
    }
}

/// Coerce a raw cell to a timestamp.
///
/// Unparseable input is missing, never an error. Offsets are dropped in favour of
/// the wall-clock time as written so the calendar date is preserved.
pub fn parse_observed_at(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ts.naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(ts);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
}
