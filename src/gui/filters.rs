//! Filter widget state for both dashboards.
//! Each state defaults to "everything observed" and converts into a [`RowFilter`].

use crate::data::columns::{DESCRICAO_TUC, DIST, GRUPO};
use crate::data::{observed_values, year_bounds, Dimension, RowFilter, MISSING_LABEL};
use polars::prelude::DataFrame;

/// Closed year interval chosen inside the observed bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearRange {
    pub bounds: (i32, i32),
    pub lo: i32,
    pub hi: i32,
}

impl YearRange {
    pub fn observed(df: &DataFrame) -> Option<Self> {
        let (min, max) = year_bounds(df)?;
        Some(Self {
            bounds: (min, max),
            lo: min,
            hi: max,
        })
    }

    /// Keep `lo <= hi` after one of the sliders moved.
    pub fn normalize(&mut self, lo_moved: bool) {
        self.lo = self.lo.clamp(self.bounds.0, self.bounds.1);
        self.hi = self.hi.clamp(self.bounds.0, self.bounds.1);
        if self.lo > self.hi {
            if lo_moved {
                self.hi = self.lo;
            } else {
                self.lo = self.hi;
            }
        }
    }
}

/// Checkbox list over observed values, all checked by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSelect {
    pub options: Vec<String>,
    pub selected: Vec<bool>,
}

impl MultiSelect {
    pub fn new(options: Vec<String>) -> Self {
        let selected = vec![true; options.len()];
        Self { options, selected }
    }

    pub fn set_all(&mut self, value: bool) {
        self.selected.iter_mut().for_each(|v| *v = value);
    }

    pub fn accepted(&self) -> Vec<String> {
        self.options
            .iter()
            .zip(self.selected.iter())
            .filter(|(_, &selected)| selected)
            .map(|(value, _)| value.clone())
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|&&v| v).count()
    }
}

/// Single choice with an "All" entry (`choice == None`), the default.
///
/// The drop-down lists only labelled values; "All" still accepts rows with a
/// missing label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleSelect {
    observed: Vec<String>,
    pub choice: Option<String>,
}

impl SingleSelect {
    pub fn new(observed: Vec<String>) -> Self {
        Self {
            observed,
            choice: None,
        }
    }

    pub fn options(&self) -> impl Iterator<Item = &String> {
        self.observed.iter().filter(|v| v.as_str() != MISSING_LABEL)
    }

    pub fn accepted(&self) -> Vec<String> {
        match &self.choice {
            None => self.observed.clone(),
            Some(value) => vec![value.clone()],
        }
    }
}

/// ICO filters: year range, distributors, item groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostFilters {
    pub years: YearRange,
    pub distributors: MultiSelect,
    pub groups: MultiSelect,
}

impl CostFilters {
    pub fn observed(df: &DataFrame) -> Option<Self> {
        Some(Self {
            years: YearRange::observed(df)?,
            distributors: MultiSelect::new(observed_values(df, DIST)),
            groups: MultiSelect::new(observed_values(df, GRUPO)),
        })
    }

    pub fn row_filter(&self) -> RowFilter {
        RowFilter {
            years: (self.years.lo, self.years.hi),
            dimensions: vec![
                Dimension::new(DIST, self.distributors.accepted()),
                Dimension::new(GRUPO, self.groups.accepted()),
            ],
        }
    }
}

/// BDGD filters: year range, company, equipment description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFilters {
    pub years: YearRange,
    pub company: SingleSelect,
    pub equipment: SingleSelect,
}

impl AssetFilters {
    pub fn observed(df: &DataFrame) -> Option<Self> {
        Some(Self {
            years: YearRange::observed(df)?,
            company: SingleSelect::new(observed_values(df, DIST)),
            equipment: SingleSelect::new(observed_values(df, DESCRICAO_TUC)),
        })
    }

    pub fn row_filter(&self) -> RowFilter {
        RowFilter {
            years: (self.years.lo, self.years.hi),
            dimensions: vec![
                Dimension::new(DIST, self.company.accepted()),
                Dimension::new(DESCRICAO_TUC, self.equipment.accepted()),
            ],
        }
    }
}
