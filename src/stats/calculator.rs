//! Statistics Calculator Module
//! Pairwise-complete Pearson correlation and descriptive statistics.

use crate::data::{Dataset, Metric};
use serde::Serialize;
use statrs::statistics::Statistics;

/// Symmetric correlation matrix over a list of metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub metrics: Vec<Metric>,
    /// Row-major; `NaN` where a coefficient is undefined.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// Descriptive statistics of a set of scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for ScoreSummary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Handles statistical calculations over the dataset.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Pearson correlation between every pair of `metrics`, each pair using
    /// only the rows where both values are present.
    ///
    /// The diagonal is 1.0 for any metric with at least one value. Pairs with
    /// fewer than two complete rows or zero variance are `NaN`.
    pub fn correlation_matrix(dataset: &Dataset, metrics: &[Metric]) -> CorrelationMatrix {
        let n = metrics.len();
        let mut values = vec![vec![f64::NAN; n]; n];

        for i in 0..n {
            let has_values = dataset.iter().any(|r| r.metric(metrics[i]).is_some());
            values[i][i] = if has_values { 1.0 } else { f64::NAN };

            for j in (i + 1)..n {
                let (xs, ys): (Vec<f64>, Vec<f64>) = dataset
                    .iter()
                    .filter_map(|r| Some((r.metric(metrics[i])?, r.metric(metrics[j])?)))
                    .unzip();
                let r = Self::pearson(&xs, &ys);
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        CorrelationMatrix {
            metrics: metrics.to_vec(),
            values,
        }
    }

    /// Sample Pearson coefficient of two equally long samples.
    pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
        if xs.len() != ys.len() || xs.len() < 2 {
            return f64::NAN;
        }

        let sx = xs.std_dev();
        let sy = ys.std_dev();
        if sx == 0.0 || sy == 0.0 || sx.is_nan() || sy.is_nan() {
            return f64::NAN;
        }

        let r = xs.covariance(ys) / (sx * sy);
        r.clamp(-1.0, 1.0)
    }

    /// Compute descriptive statistics for an array of values.
    pub fn summarize(values: &[f64]) -> ScoreSummary {
        let n = values.len();
        if n == 0 {
            return ScoreSummary::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        ScoreSummary {
            count: n,
            mean: values.mean(),
            median,
            std: if n > 1 { values.std_dev() } else { 0.0 },
            min: sorted[0],
            max: sorted[n - 1],
        }
    }

    /// Summary of happiness scores over a dataset (usually the latest-year snapshot).
    pub fn score_summary(dataset: &Dataset) -> ScoreSummary {
        let scores: Vec<f64> = dataset.iter().map(|r| r.happiness_score).collect();
        Self::summarize(&scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::fixtures::record;
    use crate::data::HappinessRecord;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn dataset() -> Dataset {
        let mut rows = vec![
            record("A", 2020, "AA", 3.0),
            record("B", 2020, "BB", 5.0),
            record("C", 2020, "CC", 6.5),
            record("D", 2020, "DD", 7.5),
        ];
        // Noise so generosity is not constant.
        rows[0].generosity = Some(0.3);
        rows[2].generosity = Some(-0.2);
        rows[3].generosity = None;
        Dataset::from_records(rows)
    }

    #[test]
    fn test_diagonal_and_symmetry() {
        let m = StatsCalculator::correlation_matrix(&dataset(), &Metric::ALL);
        assert_eq!(m.len(), 7);
        for i in 0..m.len() {
            for j in 0..m.len() {
                let (a, b) = (m.get(i, j), m.get(j, i));
                assert!(a == b || (a.is_nan() && b.is_nan()));
            }
        }
        // Freedom is constant: its diagonal is still 1.0, off-diagonal NaN.
        let freedom = Metric::ALL.iter().position(|&x| x == Metric::Freedom).unwrap();
        assert_eq!(m.get(freedom, freedom), 1.0);
        assert!(m.get(freedom, 0).is_nan());
        for i in 0..m.len() {
            assert_eq!(m.get(i, i), 1.0);
        }
    }

    #[test]
    fn test_linear_metrics_correlate_perfectly() {
        let m = StatsCalculator::correlation_matrix(&dataset(), &Metric::ALL);
        // GDP is score / 5 and corruption is 1 - score / 10 in the fixture.
        assert!(approx(m.get(0, 1), 1.0));
        assert!(approx(m.get(0, 6), -1.0));
    }

    #[test]
    fn test_pairwise_complete_observations() {
        let m = StatsCalculator::correlation_matrix(
            &dataset(),
            &[Metric::HappinessScore, Metric::Generosity],
        );
        // D has no generosity, so only A, B, C take part.
        let expected = StatsCalculator::pearson(&[3.0, 5.0, 6.5], &[0.3, 0.1, -0.2]);
        assert!(approx(m.get(0, 1), expected));
        assert!(expected < 0.0);
    }

    #[test]
    fn test_field_without_values() {
        let mut rec: HappinessRecord = record("A", 2020, "AA", 5.0);
        rec.generosity = None;
        let ds = Dataset::from_records(vec![rec]);
        let m = StatsCalculator::correlation_matrix(
            &ds,
            &[Metric::HappinessScore, Metric::Generosity],
        );
        assert_eq!(m.get(0, 0), 1.0);
        assert!(m.get(1, 1).is_nan());
        assert!(m.get(0, 1).is_nan());
    }

    #[test]
    fn test_pearson_small_samples() {
        assert!(StatsCalculator::pearson(&[1.0], &[2.0]).is_nan());
        assert!(StatsCalculator::pearson(&[1.0, 2.0], &[3.0]).is_nan());
        assert!(approx(StatsCalculator::pearson(&[1.0, 2.0], &[4.0, 2.0]), -1.0));
    }

    #[test]
    fn test_summarize() {
        let s = StatsCalculator::summarize(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(s.count, 4);
        assert!(approx(s.mean, 2.5));
        assert!(approx(s.median, 2.5));
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert!(approx(s.std, (5.0f64 / 3.0).sqrt()));

        let empty = StatsCalculator::summarize(&[]);
        assert_eq!(empty.count, 0);
        assert!(empty.mean.is_nan());
    }
}
