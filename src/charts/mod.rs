//! Charts module - Chart and table rendering

pub mod format;
mod plotter;
mod table;

pub use plotter::{ChartData, ChartPlotter};
pub use table::DataTable;
