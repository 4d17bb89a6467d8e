//! Record Model
//! Fixed-schema happiness record, the numeric metrics it carries, and the
//! immutable dataset they are loaded into.

use serde::{Deserialize, Serialize};

/// Base URL for 80px-high country flags, keyed by lowercase ISO code.
pub const FLAG_URL_BASE: &str = "https://flagpedia.net/data/flags/h80";

pub const COUNTRY_COL: &str = "Country";
pub const YEAR_COL: &str = "Year";
pub const ISO_CODE_COL: &str = "ISO_Code";

/// Numeric columns of the happiness table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    HappinessScore,
    GdpPerCapita,
    SocialSupport,
    HealthyLifeExpectancy,
    Freedom,
    Generosity,
    Corruption,
}

impl Metric {
    /// The six sub-indicators, in the order they appear on the radar chart.
    pub const INDICATORS: [Metric; 6] = [
        Metric::GdpPerCapita,
        Metric::SocialSupport,
        Metric::HealthyLifeExpectancy,
        Metric::Freedom,
        Metric::Generosity,
        Metric::Corruption,
    ];

    /// Score followed by the indicators (correlation heatmap order).
    pub const ALL: [Metric; 7] = [
        Metric::HappinessScore,
        Metric::GdpPerCapita,
        Metric::SocialSupport,
        Metric::HealthyLifeExpectancy,
        Metric::Freedom,
        Metric::Generosity,
        Metric::Corruption,
    ];

    /// Exact column name in the input file.
    pub fn column(self) -> &'static str {
        match self {
            Metric::HappinessScore => "Happiness score",
            Metric::GdpPerCapita => "GDP per capita",
            Metric::SocialSupport => "Social support",
            Metric::HealthyLifeExpectancy => "Healthy life expectancy",
            Metric::Freedom => "Freedom to make life choices",
            Metric::Generosity => "Generosity",
            Metric::Corruption => "Perceptions of corruption",
        }
    }

    /// Compact label for axes where the full column name does not fit.
    pub fn short_label(self) -> &'static str {
        match self {
            Metric::HappinessScore => "Score",
            Metric::GdpPerCapita => "GDP",
            Metric::SocialSupport => "Social",
            Metric::HealthyLifeExpectancy => "Health",
            Metric::Freedom => "Freedom",
            Metric::Generosity => "Generosity",
            Metric::Corruption => "Corruption",
        }
    }
}

/// One row of the dataset: a country in a given year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HappinessRecord {
    pub country: String,
    pub year: i32,
    pub iso_code: Option<String>,
    /// Always finite; rows without a usable score never become records.
    pub happiness_score: f64,
    pub gdp_per_capita: Option<f64>,
    pub social_support: Option<f64>,
    pub healthy_life_expectancy: Option<f64>,
    pub freedom: Option<f64>,
    pub generosity: Option<f64>,
    pub corruption: Option<f64>,
}

impl HappinessRecord {
    /// Value of a metric for this record, `None` when the cell was missing.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::HappinessScore => Some(self.happiness_score),
            Metric::GdpPerCapita => self.gdp_per_capita,
            Metric::SocialSupport => self.social_support,
            Metric::HealthyLifeExpectancy => self.healthy_life_expectancy,
            Metric::Freedom => self.freedom,
            Metric::Generosity => self.generosity,
            Metric::Corruption => self.corruption,
        }
    }

    /// Flag image URL for this record's ISO code.
    pub fn flag_url(&self) -> Option<String> {
        self.iso_code.as_deref().map(flag_url)
    }
}

/// Build the flag image URL for an ISO code.
pub fn flag_url(iso_code: &str) -> String {
    format!("{}/{}.png", FLAG_URL_BASE, iso_code.to_lowercase())
}

/// Immutable, load-ordered collection of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    records: Vec<HappinessRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<HappinessRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[HappinessRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HappinessRecord> {
        self.records.iter()
    }

    /// Records of one country, in load order.
    pub fn for_country<'a>(&'a self, country: &'a str) -> impl Iterator<Item = &'a HappinessRecord> {
        self.records.iter().filter(move |r| r.country == country)
    }

    /// Smallest and largest year present.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some((min, max))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Record with every indicator derived from the score, enough for most tests.
    pub fn record(country: &str, year: i32, iso: &str, score: f64) -> HappinessRecord {
        HappinessRecord {
            country: country.to_string(),
            year,
            iso_code: Some(iso.to_string()),
            happiness_score: score,
            gdp_per_capita: Some(score / 5.0),
            social_support: Some(score / 10.0),
            healthy_life_expectancy: Some(score / 8.0),
            freedom: Some(0.5),
            generosity: Some(0.1),
            corruption: Some(1.0 - score / 10.0),
        }
    }

    /// The three-row scenario: A(2021, 5.0), A(2022, 6.0), B(2022, 7.0).
    pub fn scenario() -> Dataset {
        Dataset::from_records(vec![
            record("A", 2021, "AA", 5.0),
            record("A", 2022, "AA", 6.0),
            record("B", 2022, "BB", 7.0),
        ])
    }
}
