//! Control Panel Widget
//! Left side panel with dashboard selection, data source and filter controls.

use crate::charts::format::format_int;
use crate::data::Dataset;
use crate::gui::filters::{AssetFilters, CostFilters, MultiSelect, SingleSelect, YearRange};
use egui::{Color32, ComboBox, RichText, ScrollArea};
use std::path::PathBuf;

/// User settings that survive a reload
#[derive(Clone)]
pub struct UserSettings {
    pub dashboard: Dataset,
    pub cost_path: PathBuf,
    pub asset_path: PathBuf,
}

impl UserSettings {
    pub fn path(&self, dataset: Dataset) -> &PathBuf {
        match dataset {
            Dataset::Cost => &self.cost_path,
            Dataset::Asset => &self.asset_path,
        }
    }

    pub fn set_path(&mut self, dataset: Dataset, path: PathBuf) {
        match dataset {
            Dataset::Cost => self.cost_path = path,
            Dataset::Asset => self.asset_path = path,
        }
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub cost_filters: Option<CostFilters>,
    pub asset_filters: Option<AssetFilters>,
    pub is_loading: bool,
    pub status: String,
}

impl ControlPanel {
    pub fn new(settings: UserSettings) -> Self {
        Self {
            settings,
            cost_filters: None,
            asset_filters: None,
            is_loading: false,
            status: "Ready".to_string(),
        }
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("⚡ GridPanel")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("ICO & BDGD dashboards")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Dashboard Section =====
        ui.label(RichText::new("🗂 Dashboard").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            let before = self.settings.dashboard;
            ui.radio_value(&mut self.settings.dashboard, Dataset::Cost, "ICO costs");
            ui.radio_value(&mut self.settings.dashboard, Dataset::Asset, "BDGD assets");
            if self.settings.dashboard != before {
                action = ControlPanelAction::DashboardChanged;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Data Source Section =====
        let dashboard = self.settings.dashboard;
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .path(dashboard)
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0))
                        .on_hover_text(self.settings.path(dashboard).display().to_string());

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_enabled_ui(!self.is_loading, |ui| {
                            if ui.button("📂 Browse").clicked() {
                                action = ControlPanelAction::Browse(dashboard);
                            }
                        });
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filter Section =====
        ui.label(RichText::new("🔧 Filters").size(14.0).strong());
        ui.add_space(8.0);

        let changed = match dashboard {
            Dataset::Cost => match self.cost_filters.as_mut() {
                Some(filters) => Self::show_cost_filters(ui, filters),
                None => Self::show_no_data(ui),
            },
            Dataset::Asset => match self.asset_filters.as_mut() {
                Some(filters) => Self::show_asset_filters(ui, filters),
                None => Self::show_no_data(ui),
            },
        };
        if changed {
            action = ControlPanelAction::FiltersChanged(dashboard);
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            if self.is_loading {
                ui.add(egui::Spinner::new());
            }
            let status_color = if self.status.contains("Error") {
                Color32::from_rgb(220, 53, 69)
            } else if self.status.starts_with("Loaded") {
                Color32::from_rgb(40, 167, 69)
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        });

        action
    }

    fn show_no_data(ui: &mut egui::Ui) -> bool {
        ui.label(RichText::new("No data loaded").color(Color32::GRAY));
        false
    }

    fn show_cost_filters(ui: &mut egui::Ui, filters: &mut CostFilters) -> bool {
        let mut changed = Self::show_year_range(ui, &mut filters.years);
        ui.add_space(10.0);
        changed |= Self::show_multi_select(ui, "DIST (distributor or area)", "dist", &mut filters.distributors);
        ui.add_space(10.0);
        changed |= Self::show_multi_select(ui, "Group", "group", &mut filters.groups);
        changed
    }

    fn show_asset_filters(ui: &mut egui::Ui, filters: &mut AssetFilters) -> bool {
        let mut changed = Self::show_year_range(ui, &mut filters.years);
        ui.add_space(10.0);
        changed |= Self::show_single_select(ui, "Company (DIST):", "company", &mut filters.company);
        ui.add_space(5.0);
        changed |= Self::show_single_select(ui, "Equipment (TUC):", "equipment", &mut filters.equipment);
        changed
    }

    fn show_year_range(ui: &mut egui::Ui, years: &mut YearRange) -> bool {
        let (min, max) = years.bounds;
        let label_width = 40.0;
        let mut lo_moved = false;
        let mut hi_moved = false;

        ui.label("Year:");
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("From"));
            lo_moved = ui.add(egui::Slider::new(&mut years.lo, min..=max)).changed();
        });
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("To"));
            hi_moved = ui.add(egui::Slider::new(&mut years.hi, min..=max)).changed();
        });

        if lo_moved || hi_moved {
            years.normalize(lo_moved);
        }
        lo_moved || hi_moved
    }

    fn show_multi_select(ui: &mut egui::Ui, title: &str, id: &str, select: &mut MultiSelect) -> bool {
        let mut changed = false;

        ui.label(format!(
            "{} ({}/{}):",
            title,
            format_int(select.selected_count()),
            format_int(select.options.len())
        ));
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt(id)
                    .max_height(120.0)
                    .show(ui, |ui| {
                        for (i, value) in select.options.iter().enumerate() {
                            if i < select.selected.len() {
                                changed |= ui.checkbox(&mut select.selected[i], value).changed();
                            }
                        }
                    });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                select.set_all(true);
                changed = true;
            }
            if ui.small_button("Clear All").clicked() {
                select.set_all(false);
                changed = true;
            }
        });

        changed
    }

    fn show_single_select(ui: &mut egui::Ui, title: &str, id: &str, select: &mut SingleSelect) -> bool {
        let mut picked: Option<Option<String>> = None;
        let label_width = 110.0;
        let combo_width = 150.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new(title));
            ComboBox::from_id_salt(id)
                .width(combo_width)
                .selected_text(select.choice.as_deref().unwrap_or("All"))
                .show_ui(ui, |ui| {
                    if ui.selectable_label(select.choice.is_none(), "All").clicked() {
                        picked = Some(None);
                    }
                    for value in select.options() {
                        let is_selected = select.choice.as_deref() == Some(value.as_str());
                        if ui.selectable_label(is_selected, value).clicked() {
                            picked = Some(Some(value.clone()));
                        }
                    }
                });
        });

        match picked {
            Some(choice) if choice != select.choice => {
                select.choice = choice;
                true
            }
            _ => false,
        }
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    DashboardChanged,
    Browse(Dataset),
    FiltersChanged(Dataset),
}
