//! Dashboard view bundle: every projection needed to draw one selection.

use crate::data::{
    Dataset, HappinessRecord, IndicatorProfile, KeyStats, Metric, TrendPoint, ViewProjector,
};
use crate::stats::{CorrelationMatrix, ScoreSummary, StatsCalculator};
use serde::Serialize;

/// Bars on the ranking chart.
pub const TOP_N: usize = 10;

/// Tiles per row on the map.
pub const MAP_COLUMNS: usize = 16;

/// One country on the tile map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapTile {
    pub iso_code: String,
    pub country: String,
    pub score: f64,
    pub col: usize,
    pub row: usize,
    pub selected: bool,
}

/// One point of the GDP / score scatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub country: String,
    pub gdp_per_capita: f64,
    pub score: f64,
    pub selected: bool,
}

/// All views for a selected country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub country: String,
    pub trend: Vec<TrendPoint>,
    pub indicators: Option<IndicatorProfile>,
    pub key_stats: Option<KeyStats>,
    pub flag_url: Option<String>,
    /// Dataset-wide latest year; the multi-country views all use it.
    pub latest_year: Option<i32>,
    pub map_tiles: Vec<MapTile>,
    pub score_range: (f64, f64),
    pub correlation: CorrelationMatrix,
    pub top: Vec<HappinessRecord>,
    pub summary: ScoreSummary,
    pub scatter: Vec<ScatterPoint>,
}

impl DashboardData {
    /// Project every view for `country`.
    pub fn compute(dataset: &Dataset, country: &str) -> Self {
        let latest = ViewProjector::global_latest(dataset);
        let summary = StatsCalculator::score_summary(&latest);
        let key_stats = ViewProjector::key_stats(dataset, country);

        let data = Self {
            country: country.to_string(),
            trend: ViewProjector::trend(dataset, country),
            indicators: ViewProjector::latest_indicators(dataset, country),
            flag_url: ViewProjector::latest_record(dataset, country).and_then(|r| r.flag_url()),
            key_stats,
            latest_year: latest.iter().next().map(|r| r.year),
            map_tiles: tile_layout(&latest, country, MAP_COLUMNS),
            score_range: (summary.min, summary.max),
            correlation: StatsCalculator::correlation_matrix(&latest, &Metric::ALL),
            top: ViewProjector::top_n(latest.records(), TOP_N, Metric::HappinessScore),
            scatter: scatter_points(&latest, country),
            summary,
        };
        data
    }

    pub fn has_country(&self) -> bool {
        !self.trend.is_empty()
    }
}

/// Lay the records out row-major in ISO-code order. Records without an ISO
/// code have no tile.
pub fn tile_layout(snapshot: &Dataset, selected: &str, columns: usize) -> Vec<MapTile> {
    let columns = columns.max(1);
    let mut coded: Vec<(String, &HappinessRecord)> = snapshot
        .iter()
        .filter_map(|r| r.iso_code.as_deref().map(|iso| (iso.to_uppercase(), r)))
        .collect();
    coded.sort_by(|a, b| a.0.cmp(&b.0));

    coded
        .into_iter()
        .enumerate()
        .map(|(i, (iso_code, r))| MapTile {
            iso_code,
            country: r.country.clone(),
            score: r.happiness_score,
            col: i % columns,
            row: i / columns,
            selected: r.country == selected,
        })
        .collect()
}

/// GDP against score for every record that has a GDP value.
pub fn scatter_points(snapshot: &Dataset, selected: &str) -> Vec<ScatterPoint> {
    snapshot
        .iter()
        .filter_map(|r| {
            Some(ScatterPoint {
                country: r.country.clone(),
                gdp_per_capita: r.gdp_per_capita?,
                score: r.happiness_score,
                selected: r.country == selected,
            })
        })
        .collect()
}

/// Point closest to `(x, y)` when it lies within `radius` of it. Distances
/// are measured in units of `span` on each axis so both axes weigh equally.
pub fn nearest_scatter_point(
    points: &[ScatterPoint],
    x: f64,
    y: f64,
    span: (f64, f64),
    radius: f64,
) -> Option<&ScatterPoint> {
    let sx = if span.0 > 0.0 { span.0 } else { 1.0 };
    let sy = if span.1 > 0.0 { span.1 } else { 1.0 };
    points
        .iter()
        .map(|p| {
            let dx = (p.gdp_per_capita - x) / sx;
            let dy = (p.score - y) / sy;
            (dx.hypot(dy), p)
        })
        .filter(|(d, _)| *d <= radius)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, p)| p)
}
