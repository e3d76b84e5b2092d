//! Data Table Widget
//! Renders any DataFrame as a striped egui grid.

use crate::charts::format::format_number;
use egui::{RichText, ScrollArea};
use polars::prelude::*;

const MAX_TABLE_HEIGHT: f32 = 320.0;

/// Text shown for one cell. Floats get two decimals and thousands separators;
/// integers (years, codes) are printed as-is.
pub fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => "-".to_string(),
        AnyValue::Float64(v) => format_number(*v, 2),
        AnyValue::Float32(v) => format_number(*v as f64, 2),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Tabular display for aggregated views.
pub struct DataTable;

impl DataTable {
    pub fn draw(ui: &mut egui::Ui, id: &str, df: &DataFrame) {
        if df.height() == 0 {
            ui.label(
                RichText::new("No rows for the current filters")
                    .italics()
                    .color(egui::Color32::GRAY),
            );
            return;
        }

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::both()
                    .id_salt(id)
                    .max_height(MAX_TABLE_HEIGHT)
                    .auto_shrink([false, true])
                    .show(ui, |ui| {
                        egui::Grid::new(ui.make_persistent_id(id))
                            .striped(true)
                            .min_col_width(60.0)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                for name in df.get_column_names() {
                                    ui.label(RichText::new(name.as_str()).strong().size(12.0));
                                }
                                ui.end_row();

                                for row in 0..df.height() {
                                    for column in df.get_columns() {
                                        let text = column
                                            .get(row)
                                            .map(|v| cell_text(&v))
                                            .unwrap_or_default();
                                        ui.label(RichText::new(text).size(12.0));
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&AnyValue::Null), "-");
        assert_eq!(cell_text(&AnyValue::Float64(1234.5)), "1.234,50");
        assert_eq!(cell_text(&AnyValue::Int32(2023)), "2023");
        assert_eq!(cell_text(&AnyValue::Int64(565)), "565");
        assert_eq!(cell_text(&AnyValue::String("Rede")), "Rede");
    }
}
