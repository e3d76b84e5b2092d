//! Report Viewer Widget
//! Central scrollable panel with the aggregated tables and the cost chart.

use crate::charts::format::format_int;
use crate::charts::{ChartData, ChartPlotter, DataTable};
use crate::data::{AssetViews, CostViews, Dataset};
use egui::{RichText, ScrollArea};

const SECTION_SPACING: f32 = 15.0;
const CHART_HEIGHT: f32 = 400.0;

/// Central panel content for both dashboards.
#[derive(Default)]
pub struct ReportViewer {
    cost: Option<(CostViews, ChartData)>,
    asset: Option<AssetViews>,
}

impl ReportViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self, dataset: Dataset) {
        match dataset {
            Dataset::Cost => self.cost = None,
            Dataset::Asset => self.asset = None,
        }
    }

    pub fn set_cost_views(&mut self, views: CostViews, chart: ChartData) {
        self.cost = Some((views, chart));
    }

    pub fn set_asset_views(&mut self, views: AssetViews) {
        self.asset = Some(views);
    }

    pub fn show(&self, ui: &mut egui::Ui, dashboard: Dataset) {
        match dashboard {
            Dataset::Cost => match &self.cost {
                Some((views, chart)) => Self::show_cost(ui, views, chart),
                None => Self::show_empty(ui),
            },
            Dataset::Asset => match &self.asset {
                Some(views) => Self::show_asset(ui, views),
                None => Self::show_empty(ui),
            },
        }
    }

    fn show_empty(ui: &mut egui::Ui) {
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new("No Data").size(20.0));
        });
    }

    fn heading(ui: &mut egui::Ui, text: &str) {
        ui.add_space(SECTION_SPACING);
        ui.label(RichText::new(text).size(16.0).strong());
        ui.add_space(5.0);
    }

    fn show_cost(ui: &mut egui::Ui, views: &CostViews, chart: &ChartData) {
        ScrollArea::vertical()
            .id_salt("cost_report")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(RichText::new("💰 Operational costs - ICO").size(22.0).strong());
                ui.label(
                    RichText::new(format!("{} rows match the filters", format_int(views.rows)))
                        .color(egui::Color32::GRAY),
                );

                Self::heading(ui, "📊 Aggregated by year");
                DataTable::draw(ui, "cost_by_year", &views.by_year);

                Self::heading(ui, "📈 Cost evolution");
                if chart.is_empty() {
                    ui.label(RichText::new("Nothing to plot").italics());
                } else {
                    ChartPlotter::draw_line_chart(ui, "cost_evolution", chart, CHART_HEIGHT);
                }

                Self::heading(ui, "🧾 Total by ITEM and year (R$)");
                DataTable::draw(ui, "item_pivot", &views.item_pivot);

                Self::heading(ui, "📁 Total by group and year (R$)");
                DataTable::draw(ui, "group_pivot", &views.group_pivot);

                ui.add_space(SECTION_SPACING);
                ui.label(
                    RichText::new(
                        "Totals per item and thematic group, in reais (R$). \
                         Use the filters to explore other combinations.",
                    )
                    .size(11.0)
                    .color(egui::Color32::GRAY),
                );
            });
    }

    fn show_asset(ui: &mut egui::Ui, views: &AssetViews) {
        ScrollArea::vertical()
            .id_salt("asset_report")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(RichText::new("🌐 Technical data - BDGD").size(22.0).strong());
                ui.label(
                    RichText::new(format!("{} rows match the filters", format_int(views.rows)))
                        .color(egui::Color32::GRAY),
                );

                Self::heading(ui, "📦 Summary by equipment type (TUC)");
                DataTable::draw(ui, "asset_summary", &views.summary);

                ui.add_space(SECTION_SPACING);
                ui.label(
                    RichText::new("Unit count and network length (km) per equipment type.")
                        .size(11.0)
                        .color(egui::Color32::GRAY),
                );
            });
    }
}
