//! GridPanel - Distribution grid cost & asset dashboards
//!
//! Loads the ICO cost report and the BDGD asset inventory, filters them
//! interactively and shows aggregated tables and a cost chart.

mod charts;
mod config;
mod data;
mod gui;

use config::{AppConfig, CONFIG_FILE};
use eframe::egui;
use gui::GridPanelApp;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load(Path::new(CONFIG_FILE))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_target(false)
        .compact()
        .init();
    tracing::info!("gridpanel v{}", env!("CARGO_PKG_VERSION"));

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([1000.0, 600.0])
            .with_title("GridPanel"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "GridPanel",
        options,
        Box::new(|cc| Ok(Box::new(GridPanelApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {e}"))
}
