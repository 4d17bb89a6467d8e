//! Static Chart Renderer
//! Writes the dashboard charts to PNG files with plotters.
//!
//! Files written for one selection:
//! 1. trend.png   - score per year for the country
//! 2. radar.png   - latest-year indicator profile
//! 3. map.png     - latest-year tile map, selection outlined in red
//! 4. heatmap.png - indicator correlation matrix
//! 5. top10.png   - ten happiest countries
//! 6. scatter.png - GDP per capita against score
//!
//! plus `views.json`, the serialized view bundle.

use crate::charts::data::{DashboardData, MAP_COLUMNS};
use crate::charts::palette::{self, ColorScale};
use crate::charts::plotter::ChartPlotter;
use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const FONT: &str = "sans-serif";
const TITLE_SIZE: u32 = 28;
const LABEL_SIZE: u32 = 14;

type RenderFn = fn(&DashboardData, &Path, (u32, u32)) -> Result<()>;

/// Files produced by one export.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub dir: PathBuf,
    pub images: Vec<PathBuf>,
    pub json: PathBuf,
}

fn rgb(c: [u8; 3]) -> RGBColor {
    RGBColor(c[0], c[1], c[2])
}

fn text_style(size: u32, c: [u8; 3], h: HPos, v: VPos) -> TextStyle<'static> {
    (FONT, size).into_font().color(&rgb(c)).pos(Pos::new(h, v))
}

/// Value range widened by `pad` on each side, never empty.
fn padded_range(values: impl Iterator<Item = f64>, pad: f64) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if max - min < f64::EPSILON {
        return (min - pad.max(0.5), max + pad.max(0.5));
    }
    (min - pad, max + pad)
}

/// Renders dashboard charts to image files.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    const JOBS: [(&'static str, RenderFn); 6] = [
        ("trend.png", Self::render_trend),
        ("radar.png", Self::render_radar),
        ("map.png", Self::render_map),
        ("heatmap.png", Self::render_heatmap),
        ("top10.png", Self::render_top),
        ("scatter.png", Self::render_scatter),
    ];

    /// Render every chart into `dir` (created if needed) in parallel and
    /// write the view bundle next to them.
    pub fn export(data: &DashboardData, dir: &Path, size: (u32, u32)) -> Result<ExportSummary> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

        let images = Self::JOBS
            .par_iter()
            .map(|(name, render)| -> Result<PathBuf> {
                let path = dir.join(name);
                render(data, &path, size)
                    .with_context(|| format!("Failed to render {}", path.display()))?;
                debug!("Rendered {}", path.display());
                Ok(path)
            })
            .collect::<Result<Vec<PathBuf>>>()?;

        let json = dir.join("views.json");
        let body = serde_json::to_string_pretty(data).context("Failed to serialize views")?;
        fs::write(&json, body).with_context(|| format!("Failed to write {}", json.display()))?;

        info!(
            "Exported {} charts for {} to {}",
            images.len(),
            data.country,
            dir.display()
        );

        Ok(ExportSummary {
            dir: dir.to_path_buf(),
            images,
            json,
        })
    }

    fn draw_empty(
        root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
        size: (u32, u32),
        message: &str,
    ) -> Result<()> {
        root.draw(&Text::new(
            message.to_string(),
            (size.0 as i32 / 2, size.1 as i32 / 2),
            text_style(24, [90, 90, 90], HPos::Center, VPos::Center),
        ))?;
        root.present()?;
        Ok(())
    }

    pub fn render_trend(data: &DashboardData, path: &Path, size: (u32, u32)) -> Result<()> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;
        let (Some(first), Some(last)) = (data.trend.first(), data.trend.last()) else {
            return Self::draw_empty(&root, size, &format!("No records for {}", data.country));
        };

        let (x0, x1) = if first.year == last.year {
            (first.year - 1, last.year + 1)
        } else {
            (first.year, last.year)
        };
        let (y0, y1) = padded_range(data.trend.iter().map(|p| p.score), 0.2);
        let series = rgb(palette::SERIES_RGB);

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Happiness Score Trend for {}", data.country), (FONT, TITLE_SIZE))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("Score")
            .x_labels((x1 - x0 + 1).clamp(2, 20) as usize)
            .label_style((FONT, LABEL_SIZE))
            .draw()?;

        chart.draw_series(LineSeries::new(
            data.trend.iter().map(|p| (p.year, p.score)),
            series.stroke_width(2),
        ))?;
        chart.draw_series(
            data.trend
                .iter()
                .map(|p| Circle::new((p.year, p.score), 5, series.filled())),
        )?;

        root.present()?;
        Ok(())
    }

    pub fn render_radar(data: &DashboardData, path: &Path, size: (u32, u32)) -> Result<()> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;
        let Some(profile) = &data.indicators else {
            return Self::draw_empty(&root, size, &format!("No records for {}", data.country));
        };

        let values: Vec<Option<f64>> = profile.values.iter().map(|(_, v)| *v).collect();
        let extent = ChartPlotter::radar_extent(&values);
        let aspect = size.0 as f64 / size.1.max(1) as f64;
        let half_h = 1.35 * extent;
        let half_w = (half_h * aspect).max(1.8 * extent);

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Indicator Profile for {} ({})", profile.country, profile.year),
                (FONT, TITLE_SIZE),
            )
            .margin(20)
            .build_cartesian_2d(-half_w..half_w, -half_h..half_h)?;

        let grid = RGBColor(200, 200, 200);
        let spokes = vec![Some(extent); values.len()];
        for ring in [0.25, 0.5, 0.75, 1.0] {
            let mut pts: Vec<(f64, f64)> = ChartPlotter::radar_vertices(&spokes, ring)
                .into_iter()
                .map(|[x, y]| (x, y))
                .collect();
            if let Some(first) = pts.first().copied() {
                pts.push(first);
            }
            chart.draw_series(std::iter::once(PathElement::new(pts, grid)))?;
        }

        let tips = ChartPlotter::radar_vertices(&spokes, 1.0);
        for ([x, y], (metric, value)) in tips.iter().zip(&profile.values) {
            chart.draw_series(std::iter::once(PathElement::new(vec![(0.0, 0.0), (*x, *y)], grid)))?;
            let h = if x.abs() < 1e-9 {
                HPos::Center
            } else if *x > 0.0 {
                HPos::Left
            } else {
                HPos::Right
            };
            let label = match value {
                Some(v) => format!("{} ({:.2})", metric.column(), v),
                None => format!("{} (n/a)", metric.column()),
            };
            chart.draw_series(std::iter::once(Text::new(
                label,
                (x * 1.06, y * 1.1),
                text_style(LABEL_SIZE, [40, 40, 40], h, VPos::Center),
            )))?;
        }

        let shape: Vec<(f64, f64)> = ChartPlotter::radar_vertices(&values, 1.0)
            .into_iter()
            .map(|[x, y]| (x, y))
            .collect();
        let series = rgb(palette::SERIES_RGB);
        chart.draw_series(std::iter::once(Polygon::new(shape.clone(), series.mix(0.35).filled())))?;
        let mut outline = shape;
        if let Some(first) = outline.first().copied() {
            outline.push(first);
        }
        chart.draw_series(std::iter::once(PathElement::new(outline, series.stroke_width(2))))?;

        root.present()?;
        Ok(())
    }

    pub fn render_map(data: &DashboardData, path: &Path, size: (u32, u32)) -> Result<()> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;
        if data.map_tiles.is_empty() {
            return Self::draw_empty(&root, size, "No latest-year records");
        }

        let rows = data.map_tiles.iter().map(|t| t.row).max().unwrap_or(0) + 1;
        let (lo, hi) = data.score_range;
        let year = data.latest_year.map(|y| y.to_string()).unwrap_or_default();

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Happiness Scores by Country {} (Highlight: {})", year, data.country),
                (FONT, TITLE_SIZE),
            )
            .margin(20)
            .build_cartesian_2d(-0.5..(MAP_COLUMNS as f64 - 0.5), -(rows as f64) - 0.5..0.5)?;

        for tile in &data.map_tiles {
            let (x, y) = (tile.col as f64, -(tile.row as f64));
            let fill = ColorScale::Plasma.sample_range(tile.score, lo, hi);
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x - 0.45, y - 0.45), (x + 0.45, y + 0.45)],
                rgb(fill).filled(),
            )))?;
            if tile.selected {
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x - 0.48, y - 0.48), (x + 0.48, y + 0.48)],
                    rgb(palette::HIGHLIGHT_RGB).stroke_width(3),
                )))?;
            }
            chart.draw_series(std::iter::once(Text::new(
                tile.iso_code.clone(),
                (x, y),
                text_style(12, palette::contrast_text(fill), HPos::Center, VPos::Center),
            )))?;
        }

        // Colour key along the bottom row.
        let key_y = -(rows as f64);
        let steps = 40;
        let width = (MAP_COLUMNS as f64 - 4.0) / steps as f64;
        for s in 0..steps {
            let t = s as f64 / (steps - 1) as f64;
            let x = 1.5 + s as f64 * width;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x, key_y - 0.2), (x + width, key_y + 0.2)],
                rgb(ColorScale::Plasma.sample(t)).filled(),
            )))?;
        }
        chart.draw_series([
            Text::new(
                format!("{:.2}", lo),
                (1.4, key_y),
                text_style(LABEL_SIZE, [40, 40, 40], HPos::Right, VPos::Center),
            ),
            Text::new(
                format!("{:.2}", hi),
                (1.6 + steps as f64 * width, key_y),
                text_style(LABEL_SIZE, [40, 40, 40], HPos::Left, VPos::Center),
            ),
        ])?;

        root.present()?;
        Ok(())
    }

    pub fn render_heatmap(data: &DashboardData, path: &Path, size: (u32, u32)) -> Result<()> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;
        let matrix = &data.correlation;
        let n = matrix.len();
        if n == 0 {
            return Self::draw_empty(&root, size, "No metrics");
        }
        let nf = n as f64;

        let mut chart = ChartBuilder::on(&root)
            .caption("Correlation Heatmap of Happiness Indicators", (FONT, TITLE_SIZE))
            .margin(20)
            .build_cartesian_2d(-1.8..nf + 0.1, -0.8..nf + 0.1)?;

        for i in 0..n {
            let y = (n - 1 - i) as f64;
            for j in 0..n {
                let x = j as f64;
                let value = matrix.get(i, j);
                let fill = ColorScale::Viridis.sample_range(value, -1.0, 1.0);
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x, y), (x + 1.0, y + 1.0)],
                    rgb(fill).filled(),
                )))?;
                let label = if value.is_nan() {
                    "-".to_string()
                } else {
                    format!("{:.2}", value)
                };
                chart.draw_series(std::iter::once(Text::new(
                    label,
                    (x + 0.5, y + 0.5),
                    text_style(LABEL_SIZE, palette::contrast_text(fill), HPos::Center, VPos::Center),
                )))?;
            }

            let name = matrix.metrics[i].short_label();
            chart.draw_series([
                Text::new(
                    name.to_string(),
                    (-0.1, y + 0.5),
                    text_style(LABEL_SIZE, [30, 30, 30], HPos::Right, VPos::Center),
                ),
                Text::new(
                    name.to_string(),
                    (i as f64 + 0.5, -0.15),
                    text_style(LABEL_SIZE, [30, 30, 30], HPos::Center, VPos::Top),
                ),
            ])?;
        }

        root.present()?;
        Ok(())
    }

    pub fn render_top(data: &DashboardData, path: &Path, size: (u32, u32)) -> Result<()> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;
        if data.top.is_empty() {
            return Self::draw_empty(&root, size, "No latest-year records");
        }

        let n = data.top.len() as f64;
        let max = data
            .top
            .iter()
            .map(|r| r.happiness_score)
            .fold(0.0f64, f64::max);

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Top {} Happiest Countries", data.top.len()), (FONT, TITLE_SIZE))
            .margin(20)
            .x_label_area_size(45)
            .build_cartesian_2d(0.0..(max * 1.08).max(1.0), -0.5..n - 0.5)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc("Happiness Score")
            .label_style((FONT, LABEL_SIZE))
            .draw()?;

        let bar = rgb(palette::BAR_RGB);
        // Input is ascending, so the last record lands on the top row.
        for (i, record) in data.top.iter().enumerate() {
            let y = i as f64;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(0.0, y - 0.35), (record.happiness_score, y + 0.35)],
                bar.filled(),
            )))?;
            chart.draw_series(std::iter::once(Text::new(
                format!("{}  {:.3}", record.country, record.happiness_score),
                (max * 0.02, y),
                text_style(LABEL_SIZE, [255, 255, 255], HPos::Left, VPos::Center),
            )))?;
        }

        root.present()?;
        Ok(())
    }

    pub fn render_scatter(data: &DashboardData, path: &Path, size: (u32, u32)) -> Result<()> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;
        if data.scatter.is_empty() {
            return Self::draw_empty(&root, size, "No GDP values in the latest year");
        }

        let (x0, x1) = padded_range(data.scatter.iter().map(|p| p.gdp_per_capita), 0.1);
        let (y0, y1) = padded_range(data.scatter.iter().map(|p| p.score), 0.3);

        let mut chart = ChartBuilder::on(&root)
            .caption("Happiness vs GDP per Capita", (FONT, TITLE_SIZE))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .x_desc("GDP per capita")
            .y_desc("Happiness score")
            .label_style((FONT, LABEL_SIZE))
            .draw()?;

        let series = rgb(palette::SERIES_RGB);
        chart.draw_series(
            data.scatter
                .iter()
                .filter(|p| !p.selected)
                .map(|p| Circle::new((p.gdp_per_capita, p.score), 4, series.mix(0.7).filled())),
        )?;

        let highlight = rgb(palette::HIGHLIGHT_RGB);
        for point in data.scatter.iter().filter(|p| p.selected) {
            chart.draw_series(std::iter::once(Circle::new(
                (point.gdp_per_capita, point.score),
                7,
                highlight.filled(),
            )))?;
            chart.draw_series(std::iter::once(Text::new(
                point.country.clone(),
                (point.gdp_per_capita, point.score + (y1 - y0) * 0.03),
                text_style(LABEL_SIZE, palette::HIGHLIGHT_RGB, HPos::Center, VPos::Bottom),
            )))?;
        }

        root.present()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range([1.0, 3.0, 2.0].into_iter(), 0.5), (0.5, 3.5));
        assert_eq!(padded_range([2.0].into_iter(), 0.1), (1.5, 2.5));
        assert_eq!(padded_range(std::iter::empty(), 0.1), (0.0, 1.0));
    }

    #[test]
    fn test_export_jobs_cover_every_chart() {
        let names: Vec<&str> = StaticChartRenderer::JOBS.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec!["trend.png", "radar.png", "map.png", "heatmap.png", "top10.png", "scatter.png"]
        );
    }
}
