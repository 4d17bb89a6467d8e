//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::charts::data::{nearest_scatter_point, MapTile, ScatterPoint};
use crate::charts::palette::{self, ColorScale};
use crate::data::{HappinessRecord, IndicatorProfile, KeyStats, Metric, TrendPoint};
use crate::stats::{CorrelationMatrix, ScoreSummary};
use egui::{Align2, Color32, RichText, Stroke};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text,
};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Rings drawn behind the radar polygon, as fractions of the outer radius.
const RADAR_RINGS: [f64; 4] = [0.25, 0.5, 0.75, 1.0];

pub fn color(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// Integer grid marks `0..n`, used to pin category labels to their rows.
fn category_marks(n: usize) -> Vec<GridMark> {
    (0..n)
        .map(|i| GridMark {
            value: i as f64,
            step_size: 1.0,
        })
        .collect()
}

/// Label for an integer mark, empty for anything between categories.
fn category_label(labels: &[String], value: f64) -> String {
    if (value - value.round()).abs() > 1e-6 || value < 0.0 {
        return String::new();
    }
    labels.get(value.round() as usize).cloned().unwrap_or_default()
}

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Cartesian vertices of a radar polygon. The first spoke points up and
    /// the rest follow clockwise; missing values sit at the centre.
    pub fn radar_vertices(values: &[Option<f64>], scale: f64) -> Vec<[f64; 2]> {
        let n = values.len().max(1) as f64;
        values
            .iter()
            .enumerate()
            .map(|(k, v)| {
                let r = v.unwrap_or(0.0).max(0.0) * scale;
                let theta = FRAC_PI_2 - TAU * k as f64 / n;
                [r * theta.cos(), r * theta.sin()]
            })
            .collect()
    }

    /// Outer radius of the radar: the largest value rounded up to a tenth.
    pub fn radar_extent(values: &[Option<f64>]) -> f64 {
        let max = values
            .iter()
            .filter_map(|v| *v)
            .fold(0.0f64, f64::max);
        if max <= 0.0 {
            1.0
        } else {
            (max * 10.0).ceil() / 10.0
        }
    }

    /// Line + markers of the score per year.
    pub fn draw_trend_chart(ui: &mut egui::Ui, country: &str, trend: &[TrendPoint], height: f32) {
        let points: Vec<[f64; 2]> = trend.iter().map(|p| [p.year as f64, p.score]).collect();
        let series = color(palette::SERIES_RGB);

        Plot::new(format!("trend_{}", country))
            .height(height)
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label("Score")
            .x_axis_formatter(|mark, _range| {
                if mark.value.fract() == 0.0 {
                    format!("{:.0}", mark.value)
                } else {
                    String::new()
                }
            })
            .label_formatter(|_name, value| format!("{:.0}: {:.3}", value.x, value.y))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .color(series)
                        .width(2.0)
                        .name("Happiness Score"),
                );
                plot_ui.points(Points::new(PlotPoints::from(points)).radius(4.0).color(series));
            });
    }

    /// Radar of the six indicators of the latest year.
    pub fn draw_radar_chart(ui: &mut egui::Ui, profile: &IndicatorProfile, height: f32) {
        let values: Vec<Option<f64>> = profile.values.iter().map(|(_, v)| *v).collect();
        let extent = Self::radar_extent(&values);
        let series = color(palette::SERIES_RGB);
        let grid = ui.visuals().weak_text_color();
        let text = ui.visuals().text_color();
        let labels: Vec<&'static str> = profile.values.iter().map(|(m, _)| m.column()).collect();

        Plot::new(format!("radar_{}", profile.country))
            .height(height)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .show_x(false)
            .show_y(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_x(-1.6 * extent)
            .include_x(1.6 * extent)
            .include_y(-1.25 * extent)
            .include_y(1.25 * extent)
            .show(ui, |plot_ui| {
                let spokes = vec![Some(extent); values.len()];
                for ring in RADAR_RINGS {
                    let mut ring_points = Self::radar_vertices(&spokes, ring);
                    if let Some(first) = ring_points.first().copied() {
                        ring_points.push(first);
                    }
                    plot_ui.line(Line::new(PlotPoints::from(ring_points)).color(grid).width(0.5));
                }

                let tips = Self::radar_vertices(&spokes, 1.0);
                for (tip, label) in tips.iter().zip(&labels) {
                    plot_ui.line(
                        Line::new(PlotPoints::from(vec![[0.0, 0.0], *tip]))
                            .color(grid)
                            .width(0.5),
                    );
                    let anchor = if tip[0].abs() < 1e-9 {
                        Align2::CENTER_CENTER
                    } else if tip[0] > 0.0 {
                        Align2::LEFT_CENTER
                    } else {
                        Align2::RIGHT_CENTER
                    };
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(tip[0] * 1.08, tip[1] * 1.12),
                            RichText::new(*label).size(11.0),
                        )
                        .color(text)
                        .anchor(anchor),
                    );
                }

                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(Self::radar_vertices(&values, 1.0)))
                        .fill_color(series.gamma_multiply(0.35))
                        .stroke(Stroke::new(2.0, series))
                        .name(&profile.country),
                );
            });
    }

    /// Tile map coloured by score; the selected country gets a red outline.
    /// Returns the tile under the pointer.
    pub fn draw_map(
        ui: &mut egui::Ui,
        tiles: &[MapTile],
        score_range: (f64, f64),
        height: f32,
    ) -> Option<MapTile> {
        let highlight = color(palette::HIGHLIGHT_RGB);
        let response = Plot::new("tile_map")
            .height(height)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .show_x(false)
            .show_y(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for tile in tiles {
                    let x = tile.col as f64;
                    let y = -(tile.row as f64);
                    let fill = ColorScale::Plasma.sample_range(tile.score, score_range.0, score_range.1);
                    let stroke = if tile.selected {
                        Stroke::new(3.0, highlight)
                    } else {
                        Stroke::new(0.5, Color32::from_gray(40))
                    };
                    let square = vec![
                        [x - 0.45, y - 0.45],
                        [x + 0.45, y - 0.45],
                        [x + 0.45, y + 0.45],
                        [x - 0.45, y + 0.45],
                    ];
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(square))
                            .fill_color(color(fill))
                            .stroke(stroke),
                    );
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(x, y),
                            RichText::new(&tile.iso_code).size(9.0),
                        )
                        .color(color(palette::contrast_text(fill))),
                    );
                }

                let pointer = plot_ui.pointer_coordinate()?;
                tiles
                    .iter()
                    .find(|t| {
                        (pointer.x - t.col as f64).abs() <= 0.5
                            && (pointer.y + t.row as f64).abs() <= 0.5
                    })
                    .cloned()
            });
        response.inner
    }

    /// Correlation heatmap, first metric in the top row.
    pub fn draw_heatmap(ui: &mut egui::Ui, matrix: &CorrelationMatrix, height: f32) {
        let n = matrix.len();
        let labels: Vec<String> = matrix
            .metrics
            .iter()
            .map(|m| m.short_label().to_string())
            .collect();
        let y_labels: Vec<String> = labels.iter().rev().cloned().collect();

        Plot::new("correlation_heatmap")
            .height(height)
            .data_aspect(1.0)
            .show_grid(false)
            .show_x(false)
            .show_y(false)
            .allow_scroll(false)
            .x_grid_spacer(move |_input| category_marks(n))
            .y_grid_spacer(move |_input| category_marks(n))
            .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
            .y_axis_formatter(move |mark, _range| category_label(&y_labels, mark.value))
            .show(ui, |plot_ui| {
                for i in 0..n {
                    for j in 0..n {
                        let value = matrix.get(i, j);
                        let x = j as f64;
                        let y = (n - 1 - i) as f64;
                        let fill = ColorScale::Viridis.sample_range(value, -1.0, 1.0);
                        let cell = vec![
                            [x - 0.5, y - 0.5],
                            [x + 0.5, y - 0.5],
                            [x + 0.5, y + 0.5],
                            [x - 0.5, y + 0.5],
                        ];
                        plot_ui.polygon(
                            Polygon::new(PlotPoints::from(cell))
                                .fill_color(color(fill))
                                .stroke(Stroke::new(0.5, Color32::from_gray(30))),
                        );
                        let label = if value.is_nan() {
                            "-".to_string()
                        } else {
                            format!("{:.2}", value)
                        };
                        plot_ui.text(
                            Text::new(PlotPoint::new(x, y), RichText::new(label).size(11.0))
                                .color(color(palette::contrast_text(fill))),
                        );
                    }
                }
            });
    }

    /// Horizontal bars, ascending input so the largest ends up on top.
    pub fn draw_bar_chart(ui: &mut egui::Ui, top: &[HappinessRecord], height: f32) {
        let names: Vec<String> = top.iter().map(|r| r.country.clone()).collect();
        let n = names.len();
        let bars: Vec<Bar> = top
            .iter()
            .enumerate()
            .map(|(i, r)| {
                Bar::new(i as f64, r.happiness_score)
                    .width(0.7)
                    .name(&r.country)
                    .fill(color(palette::BAR_RGB))
            })
            .collect();

        Plot::new("top_countries")
            .height(height)
            .allow_scroll(false)
            .allow_drag(false)
            .show_grid([true, false])
            .include_x(0.0)
            .x_axis_label("Happiness Score")
            .y_grid_spacer(move |_input| category_marks(n))
            .y_axis_formatter(move |mark, _range| category_label(&names, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .horizontal()
                        .color(color(palette::BAR_RGB))
                        .name("Happiness score"),
                );
            });
    }

    /// GDP per capita against score; the selected country is drawn on top in red.
    pub fn draw_scatter_chart(ui: &mut egui::Ui, points: &[ScatterPoint], height: f32) {
        let (selected, others): (Vec<&ScatterPoint>, Vec<&ScatterPoint>) =
            points.iter().partition(|p| p.selected);
        let to_plot = |pts: &[&ScatterPoint]| -> PlotPoints {
            PlotPoints::from(
                pts.iter()
                    .map(|p| [p.gdp_per_capita, p.score])
                    .collect::<Vec<_>>(),
            )
        };

        let span = |f: fn(&ScatterPoint) -> f64| {
            let (lo, hi) = points
                .iter()
                .map(f)
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
            hi - lo
        };
        let spans = (span(|p| p.gdp_per_capita), span(|p| p.score));
        let hover_points = points.to_vec();

        Plot::new("gdp_scatter")
            .height(height)
            .allow_scroll(false)
            .x_axis_label(Metric::GdpPerCapita.column())
            .y_axis_label(Metric::HappinessScore.column())
            .legend(Legend::default())
            .label_formatter(move |_name, value| {
                match nearest_scatter_point(&hover_points, value.x, value.y, spans, 0.03) {
                    Some(p) => format!(
                        "{}\nGDP per capita: {:.3}\nScore: {:.3}",
                        p.country, p.gdp_per_capita, p.score
                    ),
                    None => format!("GDP {:.3}, score {:.3}", value.x, value.y),
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(to_plot(&others[..]))
                        .radius(3.5)
                        .color(color(palette::SERIES_RGB).gamma_multiply(0.8))
                        .name("Countries"),
                );
                if let Some(first) = selected.first() {
                    plot_ui.points(
                        Points::new(to_plot(&selected[..]))
                            .radius(6.0)
                            .color(color(palette::HIGHLIGHT_RGB))
                            .name(&first.country),
                    );
                }
            });
    }

    /// Key figures of the country's latest record.
    pub fn draw_key_stats(ui: &mut egui::Ui, stats: &KeyStats) {
        let fmt = |v: Option<f64>| v.map(|x| format!("{:.3}", x)).unwrap_or_else(|| "-".to_string());

        egui::Grid::new(ui.make_persistent_id(format!("key_stats_{}", stats.country)))
            .striped(true)
            .min_col_width(90.0)
            .spacing([10.0, 4.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Year").strong());
                ui.label(stats.year.to_string());
                ui.end_row();

                ui.label(RichText::new("Happiness Score").strong());
                ui.label(format!("{:.3}", stats.happiness_score));
                ui.end_row();

                ui.label(RichText::new("GDP per capita").strong());
                ui.label(fmt(stats.gdp_per_capita));
                ui.end_row();

                ui.label(RichText::new("Social Support").strong());
                ui.label(fmt(stats.social_support));
                ui.end_row();

                if let Some((rank, of)) = stats.global_rank {
                    ui.label(RichText::new("Global Rank").strong());
                    ui.label(format!("{} of {}", rank, of));
                    ui.end_row();
                }
            });
    }

    /// One-line summary of the latest-year scores.
    pub fn draw_summary(ui: &mut egui::Ui, year: Option<i32>, summary: &ScoreSummary) {
        let year = year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string());
        ui.label(
            RichText::new(format!(
                "{}: {} countries, mean {:.3}, median {:.3}, std {:.3}, range {:.3} - {:.3}",
                year, summary.count, summary.mean, summary.median, summary.std, summary.min, summary.max
            ))
            .size(12.0)
            .color(Color32::GRAY),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f64; 2], b: [f64; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-9 && (a[1] - b[1]).abs() < 1e-9
    }

    #[test]
    fn test_radar_vertices_start_up_and_go_clockwise() {
        let v = ChartPlotter::radar_vertices(&[Some(1.0), Some(2.0), None, Some(1.0)], 1.0);
        assert!(close(v[0], [0.0, 1.0]));
        assert!(close(v[1], [2.0, 0.0]));
        assert!(close(v[2], [0.0, 0.0]));
        assert!(close(v[3], [-1.0, 0.0]));
    }

    #[test]
    fn test_radar_extent() {
        assert_eq!(ChartPlotter::radar_extent(&[Some(1.53), Some(0.2)]), 1.6);
        assert_eq!(ChartPlotter::radar_extent(&[None, None]), 1.0);
    }

    #[test]
    fn test_category_label_only_on_integers() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(category_label(&labels, 1.0), "b");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }
}
