//! Chart Viewer Widget
//! Right side scrollable panel with the dashboard cards, drawn with egui_plot.

use crate::charts::{ChartPlotter, DashboardData, MapTile};
use crate::gui::FlagLoader;
use egui::{Color32, RichText, ScrollArea};

const CARD_SPACING: f32 = 15.0;
const CHART_HEIGHT: f32 = 320.0;
const FLAG_WIDTH: f32 = 150.0;

/// Scrollable dashboard for the selected country.
#[derive(Default)]
pub struct ChartViewer {
    pub data: Option<DashboardData>,
    hovered_tile: Option<MapTile>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_data(&mut self, data: DashboardData) {
        self.hovered_tile = None;
        self.data = Some(data);
    }

    pub fn show(&mut self, ui: &mut egui::Ui, flag: &FlagLoader) {
        let Some(data) = &self.data else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        let mut hovered = None;
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let avail = ui.available_width() - CARD_SPACING;
                let left = (avail * 2.0 / 3.0).max(300.0);
                let right = (avail - left).max(200.0);

                // Country row: trend and radar on the left, flag and key stats on the right.
                ui.horizontal_top(|ui| {
                    ui.vertical(|ui| {
                        card(ui, &format!("📈 Happiness Score Trend for {}", data.country), left, |ui| {
                            if data.has_country() {
                                ChartPlotter::draw_trend_chart(ui, &data.country, &data.trend, CHART_HEIGHT);
                            } else {
                                no_data(ui);
                            }
                        });
                        ui.add_space(CARD_SPACING);
                        card(ui, "🕸 Happiness Factors Breakdown", left, |ui| match &data.indicators {
                            Some(profile) => {
                                ui.label(
                                    RichText::new(format!("Latest year: {}", profile.year))
                                        .size(12.0)
                                        .color(Color32::GRAY),
                                );
                                ChartPlotter::draw_radar_chart(ui, profile, CHART_HEIGHT)
                            }
                            None => no_data(ui),
                        });
                    });
                    ui.add_space(CARD_SPACING);
                    card(ui, &format!("🏳 {}", data.country), right, |ui| {
                        ui.vertical_centered(|ui| flag.show(ui, FLAG_WIDTH));
                        ui.add_space(10.0);
                        match &data.key_stats {
                            Some(stats) => ChartPlotter::draw_key_stats(ui, stats),
                            None => no_data(ui),
                        }
                    });
                });

                ui.add_space(CARD_SPACING);
                let year = data
                    .latest_year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "-".to_string());
                card(ui, &format!("🗺 Global Happiness Map ({})", year), avail, |ui| {
                    if data.map_tiles.is_empty() {
                        no_data(ui);
                        return;
                    }
                    let tile_label = self
                        .hovered_tile
                        .as_ref()
                        .map(|t| format!("{} ({}): {:.3}", t.country, t.iso_code, t.score))
                        .unwrap_or_else(|| "Hover a tile for details".to_string());
                    ui.label(RichText::new(tile_label).size(12.0).color(Color32::GRAY));
                    hovered = ChartPlotter::draw_map(ui, &data.map_tiles, data.score_range, CHART_HEIGHT);
                });

                ui.add_space(CARD_SPACING);
                card(ui, "🔥 Correlation Heatmap of Happiness Factors", avail, |ui| {
                    if data.correlation.is_empty() {
                        no_data(ui);
                    } else {
                        ChartPlotter::draw_heatmap(ui, &data.correlation, CHART_HEIGHT + 80.0);
                    }
                });

                ui.add_space(CARD_SPACING);
                card(ui, "🏆 Top 10 Happiest Countries", avail, |ui| {
                    ChartPlotter::draw_summary(ui, data.latest_year, &data.summary);
                    if data.top.is_empty() {
                        no_data(ui);
                    } else {
                        ChartPlotter::draw_bar_chart(ui, &data.top, CHART_HEIGHT);
                    }
                });

                ui.add_space(CARD_SPACING);
                card(ui, "💰 GDP vs Happiness Score", avail, |ui| {
                    if data.scatter.is_empty() {
                        no_data(ui);
                    } else {
                        ChartPlotter::draw_scatter_chart(ui, &data.scatter, CHART_HEIGHT);
                    }
                });
                ui.add_space(CARD_SPACING);
            });

        self.hovered_tile = hovered;
    }
}

/// Framed card with a title, fixed to `width`.
fn card(ui: &mut egui::Ui, title: &str, width: f32, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .rounding(8.0)
        .stroke(egui::Stroke::new(1.0, Color32::from_gray(80)))
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_width(width - 24.0);
            ui.label(RichText::new(title).size(18.0).strong());
            ui.add_space(8.0);
            add_contents(ui);
        });
}

fn no_data(ui: &mut egui::Ui) {
    ui.label(RichText::new("No data for this selection").color(Color32::GRAY));
}
