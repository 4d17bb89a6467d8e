//! View Projector Module
//! Derives the per-country and global views from a loaded `Dataset`.
//! Every function here is pure: same dataset and selection, same output.

use crate::data::record::{Dataset, HappinessRecord, Metric};
use serde::Serialize;
use std::collections::BTreeSet;

/// One point of a country's score trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub score: f64,
}

/// A country's records sorted by year, plus its latest record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryProfile {
    pub country: String,
    pub records: Vec<HappinessRecord>,
    pub latest: Option<HappinessRecord>,
}

/// Indicator values of a country's latest record, in radar order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorProfile {
    pub country: String,
    pub year: i32,
    pub values: Vec<(Metric, Option<f64>)>,
}

/// Headline numbers shown beside the flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyStats {
    pub country: String,
    pub year: i32,
    pub iso_code: Option<String>,
    pub happiness_score: f64,
    pub gdp_per_capita: Option<f64>,
    pub social_support: Option<f64>,
    /// 1-based rank by score within the global latest year, with the field size.
    pub global_rank: Option<(usize, usize)>,
}

/// Builds dashboard views from the dataset.
pub struct ViewProjector;

impl ViewProjector {
    /// Distinct country names, sorted alphabetically.
    pub fn countries(dataset: &Dataset) -> Vec<String> {
        dataset
            .iter()
            .map(|r| r.country.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The country's records, stable-sorted by year.
    pub fn country_profile(dataset: &Dataset, country: &str) -> CountryProfile {
        let mut records: Vec<HappinessRecord> = dataset.for_country(country).cloned().collect();
        records.sort_by_key(|r| r.year);

        CountryProfile {
            country: country.to_string(),
            latest: Self::latest_record(dataset, country).cloned(),
            records,
        }
    }

    /// Score by year for one country. Empty when the country is absent.
    pub fn trend(dataset: &Dataset, country: &str) -> Vec<TrendPoint> {
        let mut points: Vec<TrendPoint> = dataset
            .for_country(country)
            .map(|r| TrendPoint {
                year: r.year,
                score: r.happiness_score,
            })
            .collect();
        points.sort_by_key(|p| p.year);
        points
    }

    /// The country's record with the greatest year; the first one in load
    /// order wins when several share that year.
    pub fn latest_record<'a>(dataset: &'a Dataset, country: &'a str) -> Option<&'a HappinessRecord> {
        let max_year = dataset.for_country(country).map(|r| r.year).max()?;
        dataset
            .for_country(country)
            .find(|r| r.year == max_year)
    }

    /// The six indicators of the country's latest record.
    pub fn latest_indicators(dataset: &Dataset, country: &str) -> Option<IndicatorProfile> {
        let latest = Self::latest_record(dataset, country)?;
        Some(IndicatorProfile {
            country: latest.country.clone(),
            year: latest.year,
            values: Metric::INDICATORS
                .iter()
                .map(|&m| (m, latest.metric(m)))
                .collect(),
        })
    }

    /// All records from the dataset-wide latest year.
    pub fn global_latest(dataset: &Dataset) -> Dataset {
        let Some(max_year) = dataset.iter().map(|r| r.year).max() else {
            return Dataset::default();
        };
        Dataset::from_records(
            dataset
                .iter()
                .filter(|r| r.year == max_year)
                .cloned()
                .collect(),
        )
    }

    /// Records carrying `metric`, greatest first. Ties keep load order.
    fn ranked_desc(records: &[HappinessRecord], metric: Metric) -> Vec<&HappinessRecord> {
        let mut ranked: Vec<(f64, &HappinessRecord)> = records
            .iter()
            .filter_map(|r| r.metric(metric).map(|v| (v, r)))
            .collect();
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
        ranked.into_iter().map(|(_, r)| r).collect()
    }

    /// The `n` records with the greatest `metric`, returned ascending so a
    /// horizontal bar chart reads largest-at-top.
    ///
    /// Among equal values the earlier-loaded record wins the selection and
    /// sits above the later one. Records missing the metric are never selected.
    pub fn top_n(records: &[HappinessRecord], n: usize, metric: Metric) -> Vec<HappinessRecord> {
        let mut top = Self::ranked_desc(records, metric);
        top.truncate(n);
        top.into_iter().rev().cloned().collect()
    }

    /// 1-based position of `country` by descending score within `snapshot`,
    /// with the same tie order as `top_n`.
    pub fn rank_of(snapshot: &Dataset, country: &str) -> Option<(usize, usize)> {
        let ranked = Self::ranked_desc(snapshot.records(), Metric::HappinessScore);
        let position = ranked.iter().position(|r| r.country == country)?;
        Some((position + 1, ranked.len()))
    }

    /// Headline numbers from the country's latest record.
    pub fn key_stats(dataset: &Dataset, country: &str) -> Option<KeyStats> {
        let latest = Self::latest_record(dataset, country)?;
        let snapshot = Self::global_latest(dataset);
        let same_year = snapshot.iter().next().map(|r| r.year) == Some(latest.year);

        Some(KeyStats {
            country: latest.country.clone(),
            year: latest.year,
            iso_code: latest.iso_code.clone(),
            happiness_score: latest.happiness_score,
            gdp_per_capita: latest.gdp_per_capita,
            social_support: latest.social_support,
            global_rank: if same_year {
                Self::rank_of(&snapshot, country)
            } else {
                None
            },
        })
    }
}
