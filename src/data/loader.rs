//! CSV Data Loader Module
//! Reads the happiness table with Polars and validates it into a fixed-schema
//! `Dataset`.

use crate::data::record::{Dataset, HappinessRecord, Metric, COUNTRY_COL, ISO_CODE_COL, YEAR_COL};
use polars::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Dataset not found at path: {path}")]
    NotFound { path: PathBuf },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("{} is an Excel workbook; export the sheet to CSV first", path.display())]
    UnsupportedFormat { path: PathBuf },
}

/// What happened to the rows of the input file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub missing_country: usize,
    /// Missing, non-numeric or non-finite happiness score.
    pub missing_score: usize,
    /// Missing or fractional year.
    pub missing_year: usize,
}

impl LoadReport {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.rows_kept
    }
}

/// Loads the happiness table. Stateless: the resulting `Dataset` is owned by the caller.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file using Polars.
    pub fn load_csv(file_path: impl AsRef<Path>) -> Result<(Dataset, LoadReport), LoaderError> {
        let path = file_path.as_ref();
        if !path.is_file() {
            return Err(LoaderError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let is_workbook = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xls"));
        if is_workbook {
            return Err(LoaderError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }

        let path_str = path.to_string_lossy().to_string();
        let df = LazyCsvReader::new(&path_str)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        debug!("Read {} rows, {} columns from {}", df.height(), df.width(), path_str);

        let (dataset, report) = Self::from_dataframe(&df)?;
        info!(
            "Loaded {} records from {} ({} rows read, {} dropped)",
            report.rows_kept,
            path_str,
            report.rows_read,
            report.rows_dropped()
        );
        Ok((dataset, report))
    }

    /// Validate a DataFrame into records.
    ///
    /// Score and indicator cells are coerced to numbers; anything that does not
    /// parse becomes missing. Rows missing country, score or year are dropped.
    pub fn from_dataframe(df: &DataFrame) -> Result<(Dataset, LoadReport), LoaderError> {
        let countries = Self::string_column(df, COUNTRY_COL)?;
        let iso_codes = Self::string_column(df, ISO_CODE_COL)?;
        let years = Self::numeric_column(df, YEAR_COL)?;
        let scores = Self::numeric_column(df, Metric::HappinessScore.column())?;

        let mut indicators = Vec::with_capacity(Metric::INDICATORS.len());
        for metric in Metric::INDICATORS {
            indicators.push(Self::numeric_column(df, metric.column())?);
        }

        let mut report = LoadReport {
            rows_read: df.height(),
            ..LoadReport::default()
        };
        let mut records = Vec::with_capacity(df.height());

        for i in 0..df.height() {
            let Some(country) = countries[i].clone() else {
                report.missing_country += 1;
                continue;
            };
            let Some(happiness_score) = scores[i] else {
                report.missing_score += 1;
                continue;
            };
            let Some(year) = years[i].and_then(Self::as_year) else {
                report.missing_year += 1;
                continue;
            };

            records.push(HappinessRecord {
                country,
                year,
                iso_code: iso_codes[i].clone(),
                happiness_score,
                gdp_per_capita: indicators[0][i],
                social_support: indicators[1][i],
                healthy_life_expectancy: indicators[2][i],
                freedom: indicators[3][i],
                generosity: indicators[4][i],
                corruption: indicators[5][i],
            });
        }

        report.rows_kept = records.len();
        if report.missing_country > 0 {
            debug!("Dropped {} rows without a country", report.missing_country);
        }
        if report.missing_score > 0 {
            debug!("Dropped {} rows without a numeric happiness score", report.missing_score);
        }
        if report.missing_year > 0 {
            debug!("Dropped {} rows without a valid year", report.missing_year);
        }

        Ok((Dataset::from_records(records), report))
    }

    fn required<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, LoaderError> {
        df.column(name)
            .map_err(|_| LoaderError::MissingColumn(name.to_string()))
    }

    /// Trimmed strings; empty cells become `None`.
    fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
        let as_string = Self::required(df, name)?.cast(&DataType::String)?;
        let values = as_string
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|v| {
                v.map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .collect();
        Ok(values)
    }

    /// Non-strict cast to f64; unparseable and non-finite cells become `None`.
    fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, LoaderError> {
        let as_f64 = Self::required(df, name)?.cast(&DataType::Float64)?;
        let values = as_f64
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        Ok(values)
    }

    fn as_year(value: f64) -> Option<i32> {
        if value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64 {
            Some(value as i32)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Country,Year,ISO_Code,Happiness score,GDP per capita,Social support,\
Healthy life expectancy,Freedom to make life choices,Generosity,Perceptions of corruption";

    fn write_csv(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_rows() {
        let file = write_csv(&[
            "Finland,2022,FIN,7.8,1.9,1.6,0.8,0.7,0.1,0.5",
            "Denmark,2022,DNK,7.6,1.95,1.5,0.8,0.7,0.2,0.5",
        ]);

        let (ds, report) = DataLoader::load_csv(file.path()).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(report.rows_read, 2);
        assert_eq!(report.rows_dropped(), 0);

        let finland = &ds.records()[0];
        assert_eq!(finland.country, "Finland");
        assert_eq!(finland.year, 2022);
        assert_eq!(finland.iso_code.as_deref(), Some("FIN"));
        assert_eq!(finland.happiness_score, 7.8);
        assert_eq!(finland.gdp_per_capita, Some(1.9));
        assert_eq!(finland.corruption, Some(0.5));
    }

    #[test]
    fn test_non_numeric_score_row_is_dropped() {
        let file = write_csv(&[
            "A,2021,AA,5.0,1,1,1,1,1,1",
            "A,2022,AA,N/A,1,1,1,1,1,1",
            "B,2022,BB,7.0,1,1,1,1,1,1",
        ]);

        let (ds, report) = DataLoader::load_csv(file.path()).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(report.missing_score, 1);
        assert!(ds.iter().all(|r| !(r.country == "A" && r.year == 2022)));
    }

    #[test]
    fn test_missing_country_and_year_are_dropped() {
        let file = write_csv(&[
            ",2021,AA,5.0,1,1,1,1,1,1",
            "   ,2021,AA,5.0,1,1,1,1,1,1",
            "C,,CC,6.0,1,1,1,1,1,1",
            "D,2021,DD,6.5,1,1,1,1,1,1",
        ]);

        let (ds, report) = DataLoader::load_csv(file.path()).unwrap();

        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].country, "D");
        assert_eq!(report.missing_country, 2);
        assert_eq!(report.missing_year, 1);
        assert_eq!(report.rows_dropped(), 3);
    }

    #[test]
    fn test_bad_indicator_cell_keeps_row() {
        let file = write_csv(&[
            "A,2021,AA,5.0,n/a,1,1,1,1,1",
            "B,2021,,6.0,2.0,1,1,1,1,",
        ]);

        let (ds, _) = DataLoader::load_csv(file.path()).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].gdp_per_capita, None);
        assert_eq!(ds.records()[1].gdp_per_capita, Some(2.0));
        assert_eq!(ds.records()[1].iso_code, None);
        assert_eq!(ds.records()[1].corruption, None);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = DataLoader::load_csv("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoaderError::NotFound { .. }));
    }

    #[test]
    fn test_excel_workbook_is_rejected_by_name() {
        let file = tempfile::Builder::new().suffix(".XLSX").tempfile().unwrap();

        let err = DataLoader::load_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::UnsupportedFormat { .. }));
        assert!(err.to_string().contains("export the sheet to CSV"));
    }

    #[test]
    fn test_missing_column_is_reported() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Country,Year,ISO_Code,Happiness score").unwrap();
        writeln!(file, "A,2021,AA,5.0").unwrap();
        file.flush().unwrap();

        let err = DataLoader::load_csv(file.path()).unwrap_err();
        match err {
            LoaderError::MissingColumn(name) => assert_eq!(name, "GDP per capita"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_as_year_rejects_fractions() {
        assert_eq!(DataLoader::as_year(2021.0), Some(2021));
        assert_eq!(DataLoader::as_year(2021.5), None);
    }
}
