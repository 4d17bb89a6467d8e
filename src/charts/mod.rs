//! Charts module - view bundle and chart rendering

mod data;
pub mod palette;
mod plotter;
mod renderer;

pub use data::{nearest_scatter_point, scatter_points, tile_layout, DashboardData, MapTile, ScatterPoint, MAP_COLUMNS, TOP_N};
pub use palette::ColorScale;
pub use plotter::ChartPlotter;
pub use renderer::{ExportSummary, StaticChartRenderer};
