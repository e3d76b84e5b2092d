//! Data module - CSV loading, filtering and aggregation

pub mod catalog;
pub mod coerce;
mod filter;
mod loader;
mod processor;
mod views;

pub use coerce::NumberFormat;
pub use filter::{observed_values, year_bounds, Dimension, RowFilter, MISSING_LABEL};
pub use loader::{DataLoader, Dataset};
pub use views::{AssetViews, CostViews};

/// Column names shared by the loaders, views and tables.
pub mod columns {
    pub use super::loader::{ANO, DESCRICAO_TUC, DIFERENTE, DIST, GRUPO, ITEM, PROPRIO, TOTAL, TUC};
    pub use super::processor::{TIPO, VALOR};
}
