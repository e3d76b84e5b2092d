//! Row Filter Module
//! Year interval plus per-dimension accepted value sets.

use crate::data::loader::ANO;
use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use thiserror::Error;

/// Display value standing in for nulls, so missing labels stay selectable.
pub const MISSING_LABEL: &str = "(sem valor)";

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Accepted values for one text column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub column: String,
    pub accepted: BTreeSet<String>,
}

impl Dimension {
    pub fn new(column: &str, accepted: impl IntoIterator<Item = String>) -> Self {
        Self {
            column: column.to_string(),
            accepted: accepted.into_iter().collect(),
        }
    }
}

/// Row predicate: `lo <= Ano <= hi` and every dimension value accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFilter {
    pub years: (i32, i32),
    pub dimensions: Vec<Dimension>,
}

impl RowFilter {
    /// The default selection: full observed year range and every observed value.
    pub fn observed(df: &DataFrame, columns: &[&str]) -> Self {
        Self {
            years: year_bounds(df).unwrap_or((i32::MIN, i32::MAX)),
            dimensions: columns
                .iter()
                .map(|c| Dimension::new(c, observed_values(df, c)))
                .collect(),
        }
    }

    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame, FilterError> {
        let (lo, hi) = self.years;
        let mut mask: Vec<bool> = df
            .column(ANO)?
            .i32()?
            .into_iter()
            .map(|y| y.is_some_and(|y| lo <= y && y <= hi))
            .collect();

        for dim in &self.dimensions {
            let values = df.column(&dim.column)?.str()?;
            for (keep, value) in mask.iter_mut().zip(values.into_iter()) {
                if *keep {
                    *keep = dim.accepted.contains(value.unwrap_or(MISSING_LABEL));
                }
            }
        }

        let mask = Series::new("mask".into(), mask);
        Ok(df.filter(mask.bool()?)?)
    }
}

/// Smallest and largest year in the frame, `None` when it is empty.
pub fn year_bounds(df: &DataFrame) -> Option<(i32, i32)> {
    let years = df.column(ANO).ok()?.i32().ok()?;
    Some((years.min()?, years.max()?))
}

/// Distinct values of a text column in natural order, nulls as [`MISSING_LABEL`].
pub fn observed_values(df: &DataFrame, column: &str) -> Vec<String> {
    let Some(ca) = df.column(column).ok().and_then(|c| c.str().ok()) else {
        return Vec::new();
    };

    let distinct: BTreeSet<&str> = ca
        .into_iter()
        .map(|v| v.unwrap_or(MISSING_LABEL))
        .collect();

    let mut values: Vec<String> = distinct.into_iter().map(str::to_string).collect();
    values.sort_by(|a, b| natural_cmp(a, b));
    values
}

/// Numbers compare numerically and sort before text; text compares lexically.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
