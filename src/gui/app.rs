//! Happiness Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::charts::DashboardData;
use crate::data::{Dataset, LoadReport};
use crate::gui::export::{ExportResult, ExportTask};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, FlagLoader};
use egui::SidePanel;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Main application window.
pub struct DashboardApp {
    dataset: Arc<Dataset>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    flag: FlagLoader,
    export_size: (u32, u32),

    // Async export
    export_task: Option<ExportTask>,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        dataset: Arc<Dataset>,
        report: LoadReport,
        data_path: &Path,
        initial_country: Option<String>,
        export_size: (u32, u32),
    ) -> Self {
        let mut control_panel = ControlPanel::new(&dataset, &report, data_path);
        if let Some(country) = initial_country {
            control_panel.selected = country;
        }
        control_panel.set_progress(
            0.0,
            &format!("Loaded {} rows, {} countries", report.rows_kept, control_panel.countries.len()),
        );

        let mut app = Self {
            dataset,
            control_panel,
            chart_viewer: ChartViewer::new(),
            flag: FlagLoader::new(),
            export_size,
            export_task: None,
        };
        app.select_country();
        app
    }

    /// Recompute every view for the selected country.
    fn select_country(&mut self) {
        let country = self.control_panel.selected.clone();
        debug!("Selected country: {}", country);

        let data = DashboardData::compute(&self.dataset, &country);
        self.flag.request(data.flag_url.as_deref());
        self.chart_viewer.set_data(data);
    }

    /// Render the current views to PNG files in a folder picked by the user.
    fn handle_export_charts(&mut self) {
        if self.export_task.is_some() {
            return; // Already exporting
        }
        let Some(data) = &self.chart_viewer.data else {
            self.control_panel.set_progress(0.0, "No charts to export");
            return;
        };

        let dir = match rfd::FileDialog::new()
            .set_title("Export charts to folder")
            .pick_folder()
        {
            Some(dir) => dir,
            None => return, // User cancelled
        };

        self.control_panel.set_progress(10.0, "Rendering charts...");
        self.control_panel.exporting = true;
        self.export_task = Some(ExportTask::spawn(data.clone(), dir, self.export_size));
    }

    /// Check for export results
    fn check_export_results(&mut self) {
        let Some(result) = self.export_task.as_ref().and_then(ExportTask::poll) else {
            return;
        };
        self.export_task = None;
        self.control_panel.exporting = false;

        match result {
            ExportResult::Complete(summary) => {
                self.control_panel.set_progress(
                    100.0,
                    &format!("Complete! {} charts exported", summary.images.len()),
                );
                self.control_panel.export_dir = Some(summary.dir);
            }
            ExportResult::Error(e) => {
                error!("Chart export failed: {}", e);
                self.control_panel.set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }

    fn handle_open_export_folder(&mut self) {
        let Some(dir) = &self.control_panel.export_dir else {
            return;
        };
        info!("Opening {}", dir.display());
        if let Err(e) = open::that(dir) {
            self.control_panel
                .set_progress(self.control_panel.progress, &format!("Error: {}", e));
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.flag.poll(ctx);
        self.check_export_results();

        // Request repaint while loading or exporting
        if self.flag.is_loading() || self.export_task.is_some() {
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
                        ControlPanelAction::CountryChanged => self.select_country(),
                        ControlPanelAction::ExportCharts => self.handle_export_charts(),
                        ControlPanelAction::OpenExportFolder => self.handle_open_export_folder(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, &self.flag);
        });
    }
}
