//! Dashboard Views Module
//! One full recomputation per filter change: filter, then every aggregate.

use crate::data::columns::{GRUPO, ITEM};
use crate::data::filter::{FilterError, RowFilter};
use crate::data::processor::{DataProcessor, ProcessorError};
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
}

/// Everything the ICO dashboard displays.
#[derive(Clone)]
pub struct CostViews {
    pub rows: usize,
    pub by_year: DataFrame,
    pub by_year_long: DataFrame,
    pub item_pivot: DataFrame,
    pub group_pivot: DataFrame,
}

impl CostViews {
    pub fn compute(df: &DataFrame, filter: &RowFilter) -> Result<Self, ViewError> {
        let filtered = filter.apply(df)?;
        let by_year = DataProcessor::cost_by_year(&filtered)?;
        let by_year_long = DataProcessor::melt_by_year(&by_year)?;
        let item_pivot = DataProcessor::pivot_total(&filtered, ITEM)?;
        let group_pivot = DataProcessor::pivot_total(&filtered, GRUPO)?;

        debug!(rows = filtered.height(), years = by_year.height(), "Recomputed ICO views");
        Ok(Self {
            rows: filtered.height(),
            by_year,
            by_year_long,
            item_pivot,
            group_pivot,
        })
    }
}

/// Everything the BDGD dashboard displays.
#[derive(Clone)]
pub struct AssetViews {
    pub rows: usize,
    pub summary: DataFrame,
}

impl AssetViews {
    pub fn compute(df: &DataFrame, filter: &RowFilter) -> Result<Self, ViewError> {
        let filtered = filter.apply(df)?;
        let summary = DataProcessor::asset_summary(&filtered)?;

        debug!(rows = filtered.height(), types = summary.height(), "Recomputed BDGD views");
        Ok(Self {
            rows: filtered.height(),
            summary,
        })
    }
}
