//! Stats module - correlation and descriptive statistics

mod calculator;

pub use calculator::{CorrelationMatrix, ScoreSummary, StatsCalculator};
