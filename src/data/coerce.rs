//! Value Coercion Module
//! Forgiving conversions from raw CSV text into typed values.
//!
//! Numeric failures become `None` and are later skipped by the sums; date
//! failures are reported by the loader since they make the row unusable.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Days between 0001-01-01 (CE) and 1970-01-01, the epoch of the Polars Date type.
const CE_TO_UNIX_EPOCH_DAYS: i32 = 719_163;

const DAY_FIRST_DATE_FORMATS: [&str; 4] = ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d"];
const DAY_FIRST_DATETIME_FORMATS: [&str; 3] =
    ["%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M", "%Y-%m-%d %H:%M:%S"];

/// Separators used by a source file's numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    pub thousands: Option<char>,
    pub decimal: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::plain()
    }
}

impl NumberFormat {
    /// `1234.5`
    pub const fn plain() -> Self {
        Self {
            thousands: None,
            decimal: '.',
        }
    }

    /// `1.234,5`
    pub const fn brazilian() -> Self {
        Self {
            thousands: Some('.'),
            decimal: ',',
        }
    }
}

/// Parse a numeric cell, returning `None` for blanks and anything unparseable.
pub fn parse_number(raw: Option<&str>, format: &NumberFormat) -> Option<f64> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }

    let mut normalized: String = match format.thousands {
        Some(sep) => s.chars().filter(|&c| c != sep).collect(),
        None => s.to_string(),
    };
    if format.decimal != '.' {
        normalized = normalized.replace(format.decimal, ".");
    }

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an integral code such as `DIST` or `TUC`. Fractional parts are truncated.
pub fn parse_code(raw: Option<&str>) -> Option<i64> {
    parse_number(raw, &NumberFormat::plain()).map(|v| v.trunc() as i64)
}

/// Equipment codes: blanks and non-numeric text collapse to 0, which the
/// remapper then drops.
pub fn coerce_tuc(raw: Option<&str>) -> i64 {
    parse_code(raw).unwrap_or(0)
}

/// Parse a day-first date (`31/12/2023`), with or without a time part.
pub fn parse_day_first_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    DAY_FIRST_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DAY_FIRST_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Physical representation of a date in a Polars `Date` column.
pub fn days_since_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - CE_TO_UNIX_EPOCH_DAYS
}

/// Round to two decimal places (pivot tables only).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
