//! Data module - CSV loading, record model and view projections

pub mod loader;
pub mod projector;
pub mod record;

pub use loader::{DataLoader, LoadReport, LoaderError};
pub use projector::{CountryProfile, IndicatorProfile, KeyStats, TrendPoint, ViewProjector};
pub use record::{flag_url, Dataset, HappinessRecord, Metric};
