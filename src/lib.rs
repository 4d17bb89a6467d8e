//! Happiness Dashboard - World Happiness Report explorer
//!
//! Loads the happiness table once, projects per-country and latest-year views
//! from it, and renders them interactively (egui) or to PNG files (plotters).

pub mod charts;
pub mod cli;
pub mod data;
pub mod gui;
pub mod stats;

pub use charts::{DashboardData, StaticChartRenderer};
pub use data::{DataLoader, Dataset, HappinessRecord, LoaderError, Metric, ViewProjector};
