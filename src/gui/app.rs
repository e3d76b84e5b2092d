//! GridPanel Main Application
//! Main window with control panel and report viewer.

use crate::charts::format::format_int;
use crate::charts::ChartData;
use crate::config::AppConfig;
use crate::data::{AssetViews, CostViews, DataLoader, Dataset, NumberFormat};
use crate::gui::control_panel::UserSettings;
use crate::gui::filters::{AssetFilters, CostFilters};
use crate::gui::{ControlPanel, ControlPanelAction, ReportViewer};
use egui::SidePanel;
use polars::prelude::DataFrame;
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info};

/// Loading result from background thread
enum LoadResult {
    Complete {
        dataset: Dataset,
        df: Arc<DataFrame>,
    },
    Error {
        dataset: Dataset,
        path: PathBuf,
        error: String,
    },
}

/// Main application window.
pub struct GridPanelApp {
    config: AppConfig,
    loader: Arc<DataLoader>,
    control_panel: ControlPanel,
    report_viewer: ReportViewer,

    cost_df: Option<Arc<DataFrame>>,
    asset_df: Option<Arc<DataFrame>>,

    // Async loading
    load_tx: Sender<LoadResult>,
    load_rx: Receiver<LoadResult>,
    pending_loads: usize,
}

impl GridPanelApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let settings = UserSettings {
            dashboard: Dataset::Cost,
            cost_path: config.cost_path.clone(),
            asset_path: config.asset_path.clone(),
        };
        let (load_tx, load_rx) = channel();

        let mut app = Self {
            config,
            loader: Arc::new(DataLoader::new()),
            control_panel: ControlPanel::new(settings),
            report_viewer: ReportViewer::new(),
            cost_df: None,
            asset_df: None,
            load_tx,
            load_rx,
            pending_loads: 0,
        };

        app.start_loading(&[Dataset::Cost, Dataset::Asset]);
        app
    }

    fn number_format(&self, dataset: Dataset) -> NumberFormat {
        match dataset {
            Dataset::Cost => self.config.cost_format,
            Dataset::Asset => self.config.asset_format,
        }
    }

    /// Load the given datasets in a background thread, in parallel.
    fn start_loading(&mut self, datasets: &[Dataset]) {
        let jobs: Vec<(Dataset, PathBuf, NumberFormat)> = datasets
            .iter()
            .map(|&d| {
                (
                    d,
                    self.control_panel.settings.path(d).clone(),
                    self.number_format(d),
                )
            })
            .collect();

        self.pending_loads += jobs.len();
        self.control_panel.is_loading = true;
        self.control_panel.set_status("Loading data...");

        let loader = Arc::clone(&self.loader);
        let tx = self.load_tx.clone();

        thread::spawn(move || {
            jobs.into_par_iter()
                .for_each_with(tx, |tx, (dataset, path, format)| {
                    let result = match loader.load(dataset, &path, format) {
                        Ok(df) => LoadResult::Complete { dataset, df },
                        Err(e) => LoadResult::Error {
                            dataset,
                            path,
                            error: e.to_string(),
                        },
                    };
                    let _ = tx.send(result);
                });
        });
    }

    /// Handle file selection for one dashboard
    fn handle_browse(&mut self, dataset: Dataset) {
        if self.pending_loads > 0 {
            return; // Already loading
        }

        let mut dialog = rfd::FileDialog::new()
            .add_filter("Delimited text", &["csv", "txt"])
            .add_filter("All files", &["*"]);
        if let Some(dir) = self.control_panel.settings.path(dataset).parent() {
            if dir.is_dir() {
                dialog = dialog.set_directory(dir);
            }
        }

        if let Some(path) = dialog.pick_file() {
            info!(dataset = dataset.label(), path = %path.display(), "Source file selected");
            self.control_panel.settings.set_path(dataset, path);
            self.start_loading(&[dataset]);
        }
    }

    /// Check for loading results
    fn check_load_results(&mut self) {
        while let Ok(result) = self.load_rx.try_recv() {
            self.pending_loads = self.pending_loads.saturating_sub(1);

            match result {
                LoadResult::Complete { dataset, df } => {
                    debug!(cached = self.loader.cached_frames(), "Frame ready");
                    self.control_panel.set_status(&format!(
                        "Loaded {}: {} rows",
                        dataset.label(),
                        format_int(df.height())
                    ));
                    self.install_frame(dataset, df);
                }
                LoadResult::Error {
                    dataset,
                    path,
                    error,
                } => {
                    error!(dataset = dataset.label(), path = %path.display(), %error, "Load failed");
                    self.control_panel
                        .set_status(&format!("Error loading {}: {}", dataset.label(), error));
                    self.install_frame_failed(dataset);
                }
            }
        }

        self.control_panel.is_loading = self.pending_loads > 0;
    }

    /// Reset the filters to everything observed in the new frame and recompute.
    fn install_frame(&mut self, dataset: Dataset, df: Arc<DataFrame>) {
        match dataset {
            Dataset::Cost => {
                self.control_panel.cost_filters = CostFilters::observed(&df);
                self.cost_df = Some(df);
            }
            Dataset::Asset => {
                self.control_panel.asset_filters = AssetFilters::observed(&df);
                self.asset_df = Some(df);
            }
        }
        self.recompute(dataset);
    }

    fn install_frame_failed(&mut self, dataset: Dataset) {
        match dataset {
            Dataset::Cost => {
                self.cost_df = None;
                self.control_panel.cost_filters = None;
            }
            Dataset::Asset => {
                self.asset_df = None;
                self.control_panel.asset_filters = None;
            }
        }
        self.report_viewer.clear(dataset);
    }

    /// Rebuild every view of one dashboard from the cached frame.
    fn recompute(&mut self, dataset: Dataset) {
        let result = match dataset {
            Dataset::Cost => {
                let (Some(df), Some(filters)) = (&self.cost_df, &self.control_panel.cost_filters)
                else {
                    self.report_viewer.clear(dataset);
                    return;
                };
                CostViews::compute(df, &filters.row_filter())
                    .map_err(|e| e.to_string())
                    .and_then(|views| {
                        let chart = ChartData::from_long(&views.by_year_long)
                            .map_err(|e| e.to_string())?;
                        self.report_viewer.set_cost_views(views, chart);
                        Ok(())
                    })
            }
            Dataset::Asset => {
                let (Some(df), Some(filters)) = (&self.asset_df, &self.control_panel.asset_filters)
                else {
                    self.report_viewer.clear(dataset);
                    return;
                };
                AssetViews::compute(df, &filters.row_filter())
                    .map(|views| self.report_viewer.set_asset_views(views))
                    .map_err(|e| e.to_string())
            }
        };

        if let Err(e) = result {
            error!(dataset = dataset.label(), error = %e, "Recompute failed");
            self.control_panel.set_status(&format!("Error: {}", e));
            self.report_viewer.clear(dataset);
        }
    }
}

impl eframe::App for GridPanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.pending_loads > 0 {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::Browse(dataset) => self.handle_browse(dataset),
                        ControlPanelAction::FiltersChanged(dataset) => self.recompute(dataset),
                        ControlPanelAction::DashboardChanged | ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Report Viewer
        let dashboard = self.control_panel.settings.dashboard;
        egui::CentralPanel::default().show(ctx, |ui| {
            self.report_viewer.show(ui, dashboard);
        });
    }
}
