//! Chart Plotter Module
//! Time-series line chart of the ICO cost measures using egui_plot.

use crate::charts::format::format_number;
use crate::data::columns::{ANO, TIPO, VALOR};
use egui::Color32;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};
use polars::prelude::*;

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(255, 87, 34),   // Deep Orange
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

/// One colored line: (x = year, y = value) points in year order.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// Chart input built from a long `[Ano, Tipo, Valor]` frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    pub series: Vec<LineSeries>,
}

impl ChartData {
    /// Split a long frame by `Tipo`, keeping first-appearance order of the series.
    pub fn from_long(df: &DataFrame) -> PolarsResult<Self> {
        let years = df.column(ANO)?.i32()?;
        let kinds = df.column(TIPO)?.str()?;
        let values = df.column(VALOR)?.f64()?;

        let mut series: Vec<LineSeries> = Vec::new();
        for ((year, kind), value) in years.into_iter().zip(kinds.into_iter()).zip(values.into_iter()) {
            let (Some(year), Some(kind), Some(value)) = (year, kind, value) else {
                continue;
            };
            let point = [year as f64, value];
            match series.iter_mut().find(|s| s.name == kind) {
                Some(s) => s.points.push(point),
                None => series.push(LineSeries {
                    name: kind.to_string(),
                    points: vec![point],
                }),
            }
        }

        for s in &mut series {
            s.points
                .sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap_or(std::cmp::Ordering::Equal));
        }

        Ok(Self { series })
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }
}

/// Draws the dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Line chart with point markers.
    /// X-axis: year (ordinal, integer ticks only), Y-axis: cost in R$.
    pub fn draw_line_chart(ui: &mut egui::Ui, id: &str, data: &ChartData, height: f32) {
        Plot::new(id)
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Ano")
            .y_axis_label("Custo (R$)")
            .x_axis_formatter(|mark, _range| {
                if (mark.value - mark.value.round()).abs() < 1e-6 {
                    format!("{}", mark.value.round() as i64)
                } else {
                    String::new()
                }
            })
            .y_axis_formatter(|mark, _range| format_number(mark.value, 0))
            .label_formatter(|name, value| {
                if name.is_empty() {
                    String::new()
                } else {
                    format!("{}\n{}: {}", name, value.x.round() as i64, format_number(value.y, 2))
                }
            })
            .show(ui, |plot_ui| {
                for (i, s) in data.series.iter().enumerate() {
                    let color = Self::series_color(i);

                    plot_ui.line(
                        Line::new(PlotPoints::from(s.points.clone()))
                            .color(color)
                            .width(2.0)
                            .name(&s.name),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from(s.points.clone()))
                            .radius(4.0)
                            .color(color)
                            .name(&s.name),
                    );
                }
            });
    }
}
