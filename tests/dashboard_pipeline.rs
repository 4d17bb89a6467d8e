//! End-to-end checks: CSV file -> Dataset -> dashboard views.

use happiness_dashboard::charts::DashboardData;
use happiness_dashboard::data::{DataLoader, Metric, ViewProjector};
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

fn sample() -> NamedTempFile {
    write_csv(&[
        "Aland,2021,AX,5.0,1.0,0.8,60.0,0.5,0.1,0.7",
        "Aland,2022,AX,6.0,1.1,0.8,61.0,0.6,0.1,0.6",
        "Borduria,2022,BD,7.0,1.5,0.9,70.0,0.8,0.2,0.3",
        "Carpania,2022,CP,N/A,1.2,0.7,65.0,0.4,0.0,0.8",
        "Carpania,2021,CP,4.0,1.2,0.7,64.0,0.4,0.0,0.8",
    ])
}

#[test]
fn test_load_and_project_scenario() {
    let file = sample();
    let (dataset, report) = DataLoader::load_csv(file.path()).unwrap();

    assert_eq!(report.rows_read, 5);
    assert_eq!(report.rows_kept, 4);
    assert_eq!(report.missing_score, 1);
    assert_eq!(
        ViewProjector::countries(&dataset),
        vec!["Aland", "Borduria", "Carpania"]
    );

    let data = DashboardData::compute(&dataset, "Aland");
    let years: Vec<i32> = data.trend.iter().map(|p| p.year).collect();
    assert_eq!(years, vec![2021, 2022]);
    assert_eq!(data.latest_year, Some(2022));

    let top: Vec<&str> = data.top.iter().map(|r| r.country.as_str()).collect();
    assert_eq!(top, vec!["Aland", "Borduria"]);

    let stats = data.key_stats.as_ref().unwrap();
    assert_eq!(stats.global_rank, Some((2, 2)));
    assert_eq!(
        data.flag_url.as_deref(),
        Some("https://flagpedia.net/data/flags/h80/ax.png")
    );
}

#[test]
fn test_unparseable_score_is_excluded_everywhere() {
    let file = sample();
    let (dataset, _) = DataLoader::load_csv(file.path()).unwrap();
    let data = DashboardData::compute(&dataset, "Carpania");

    // Only the 2021 row survives, so Carpania is absent from the 2022 views.
    assert_eq!(data.trend.len(), 1);
    assert_eq!(data.trend[0].year, 2021);
    assert!(data.top.iter().all(|r| r.country != "Carpania"));
    assert!(data.map_tiles.iter().all(|t| t.country != "Carpania"));
    assert!(data.scatter.iter().all(|p| p.country != "Carpania"));
    assert_eq!(data.key_stats.as_ref().unwrap().global_rank, None);
}

#[test]
fn test_correlation_matrix_shape() {
    let file = sample();
    let (dataset, _) = DataLoader::load_csv(file.path()).unwrap();
    let data = DashboardData::compute(&dataset, "Aland");
    let matrix = &data.correlation;

    assert_eq!(matrix.metrics[0], Metric::HappinessScore);
    for i in 0..matrix.len() {
        assert_eq!(matrix.get(i, i), 1.0);
        for j in 0..matrix.len() {
            let (a, b) = (matrix.get(i, j), matrix.get(j, i));
            assert!(a == b || (a.is_nan() && b.is_nan()));
        }
    }
    // Two latest-year records: score and GDP rise together.
    let gdp = matrix
        .metrics
        .iter()
        .position(|m| *m == Metric::GdpPerCapita)
        .unwrap();
    assert!((matrix.get(0, gdp) - 1.0).abs() < 1e-9);
}

#[test]
fn test_view_bundle_serializes() {
    let file = sample();
    let (dataset, _) = DataLoader::load_csv(file.path()).unwrap();
    let data = DashboardData::compute(&dataset, "Borduria");

    let json: serde_json::Value = serde_json::to_value(&data).unwrap();
    assert_eq!(json["country"], "Borduria");
    assert_eq!(json["top"].as_array().unwrap().len(), 2);
    assert_eq!(json["map_tiles"].as_array().unwrap().len(), 2);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = DataLoader::load_csv(dir.path().join("absent.csv")).unwrap_err();
    assert!(err.to_string().contains("absent.csv"));
}
