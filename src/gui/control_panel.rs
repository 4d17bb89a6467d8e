//! Control Panel Widget
//! Left side panel with the country selector, dataset info and export controls.

use crate::data::{Dataset, LoadReport, ViewProjector};
use egui::{Color32, ComboBox, RichText};
use std::path::{Path, PathBuf};

/// Left side control panel.
pub struct ControlPanel {
    pub countries: Vec<String>,
    pub selected: String,
    pub filter: String,
    pub data_path: PathBuf,
    pub dataset_info: Vec<(String, String)>,
    pub export_dir: Option<PathBuf>,
    pub exporting: bool,
    pub progress: f32,
    pub status: String,
}

impl ControlPanel {
    pub fn new(dataset: &Dataset, report: &LoadReport, data_path: &Path) -> Self {
        let countries = ViewProjector::countries(dataset);
        let years = dataset
            .year_range()
            .map(|(first, last)| format!("{} - {}", first, last))
            .unwrap_or_else(|| "-".to_string());

        Self {
            selected: countries.first().cloned().unwrap_or_default(),
            dataset_info: vec![
                ("Rows".to_string(), report.rows_kept.to_string()),
                ("Dropped".to_string(), report.rows_dropped().to_string()),
                ("Countries".to_string(), countries.len().to_string()),
                ("Years".to_string(), years),
            ],
            countries,
            filter: String::new(),
            data_path: data_path.to_path_buf(),
            export_dir: None,
            exporting: false,
            progress: 0.0,
            status: "Ready".to_string(),
        }
    }

    /// Countries matching the filter text, case-insensitively.
    pub fn filtered_countries(&self) -> Vec<&String> {
        let needle = self.filter.trim().to_lowercase();
        self.countries
            .iter()
            .filter(|c| needle.is_empty() || c.to_lowercase().contains(&needle))
            .collect()
    }

    /// Move the selection by `step` entries, wrapping around.
    pub fn step_selection(&mut self, step: isize) -> bool {
        if self.countries.is_empty() {
            return false;
        }
        let n = self.countries.len() as isize;
        let current = self
            .countries
            .iter()
            .position(|c| *c == self.selected)
            .unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(n) as usize;
        self.selected = self.countries[next].clone();
        true
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌍 Happiness Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("World Happiness Report explorer")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let file_name = self
                    .data_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| self.data_path.display().to_string());
                ui.label(RichText::new(file_name).size(12.0));
                ui.add_space(4.0);

                egui::Grid::new("dataset_info")
                    .num_columns(2)
                    .spacing([12.0, 2.0])
                    .show(ui, |ui| {
                        for (label, value) in &self.dataset_info {
                            ui.label(RichText::new(label).size(11.0).color(Color32::GRAY));
                            ui.label(RichText::new(value).size(11.0));
                            ui.end_row();
                        }
                    });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Country Section =====
        ui.label(RichText::new("🏳 Country").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.label("Filter:");
            ui.text_edit_singleline(&mut self.filter);
        });
        ui.add_space(5.0);

        let mut picked = None;
        ui.horizontal(|ui| {
            if ui.small_button("◀").clicked() && self.step_selection(-1) {
                action = ControlPanelAction::CountryChanged;
            }
            ComboBox::from_id_salt("country")
                .width(200.0)
                .height(400.0)
                .selected_text(&self.selected)
                .show_ui(ui, |ui| {
                    for country in self.filtered_countries() {
                        if ui
                            .selectable_label(self.selected == *country, country)
                            .clicked()
                        {
                            picked = Some(country.clone());
                        }
                    }
                });
            if ui.small_button("▶").clicked() && self.step_selection(1) {
                action = ControlPanelAction::CountryChanged;
            }
        });
        if let Some(country) = picked {
            if country != self.selected {
                self.selected = country;
                action = ControlPanelAction::CountryChanged;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Section =====
        ui.label(RichText::new("💾 Export").size(14.0).strong());
        ui.add_space(5.0);

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(!self.selected.is_empty() && !self.exporting, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export Charts").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }
            });

            ui.add_space(8.0);

            ui.add_enabled_ui(self.export_dir.is_some(), |ui| {
                let button = egui::Button::new(RichText::new("📂 Open Folder").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::OpenExportFolder;
                }
            });
        });

        ui.add_space(10.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== About Section =====
        ui.label(RichText::new("ℹ About").size(14.0).strong());
        ui.add_space(5.0);
        ui.label(
            RichText::new(
                "Happiness scores come from the World Happiness Report. The score is a \
                 national average of answers to the Cantril ladder question (0 to 10). \
                 The six indicators estimate how much GDP, social support, healthy life \
                 expectancy, freedom, generosity and perceived corruption contribute to it.",
            )
            .size(11.0)
            .color(Color32::GRAY),
        );

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    CountryChanged,
    ExportCharts,
    OpenExportFolder,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::fixtures::{record, scenario};

    fn panel(dataset: &Dataset) -> ControlPanel {
        ControlPanel::new(dataset, &LoadReport::default(), Path::new("data/happiness.csv"))
    }

    #[test]
    fn test_new_selects_first_country() {
        let p = panel(&scenario());
        assert_eq!(p.countries, vec!["A", "B"]);
        assert_eq!(p.selected, "A");
        assert!(p
            .dataset_info
            .contains(&("Years".to_string(), "2021 - 2022".to_string())));
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let ds = Dataset::from_records(vec![
            record("Finland", 2023, "FI", 7.7),
            record("France", 2023, "FR", 6.6),
            record("Chile", 2023, "CL", 6.0),
        ]);
        let mut p = panel(&ds);
        p.filter = "  fIN ".to_string();
        assert_eq!(p.filtered_countries(), vec!["Finland"]);
        p.filter.clear();
        assert_eq!(p.filtered_countries().len(), 3);
    }

    #[test]
    fn test_step_selection_wraps() {
        let mut p = panel(&scenario());
        assert!(p.step_selection(1));
        assert_eq!(p.selected, "B");
        assert!(p.step_selection(1));
        assert_eq!(p.selected, "A");
        assert!(p.step_selection(-1));
        assert_eq!(p.selected, "B");

        let mut empty = panel(&Dataset::default());
        assert!(!empty.step_selection(1));
        assert!(empty.selected.is_empty());
    }
}
