//! Descriptive statistics for a single sample group.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// z-score of the two-sided 95% normal interval.
const Z_95: f64 = 1.96;

/// How a percentile is read off the sorted samples.
///
/// `Interpolated` is the convention used throughout reports. `InclusiveRank`
/// reproduces the alternate report format and yields slightly different
/// tail percentiles (p95/p99), so a single method is applied to a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PercentileMethod {
    /// Linear interpolation between the ranks around `p/100 * (n-1)`.
    #[default]
    Interpolated,
    /// The sample at index `ceil(p/100 * n) - 1`, no interpolation.
    InclusiveRank,
}

impl PercentileMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PercentileMethod::Interpolated => "interpolated",
            PercentileMethod::InclusiveRank => "inclusive-rank",
        }
    }
}

impl fmt::Display for PercentileMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PercentileMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interpolated" => Ok(PercentileMethod::Interpolated),
            "inclusive-rank" => Ok(PercentileMethod::InclusiveRank),
            other => Err(format!(
                "unknown percentile method '{}' (expected 'interpolated' or 'inclusive-rank')",
                other
            )),
        }
    }
}

/// Summary of one sample group. Latencies are in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRecord {
    pub n: usize,
    pub mean: f64,
    pub sd: f64,
    pub min: f64,
    pub max: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
    pub iqr: f64,
    /// Coefficient of variation in percent; `None` when the mean is zero.
    pub cv: Option<f64>,
    pub ci95_lower: f64,
    pub ci95_upper: f64,
}

impl StatisticsRecord {
    /// The record reported for an empty group.
    pub fn empty() -> Self {
        Self {
            n: 0,
            mean: 0.0,
            sd: 0.0,
            min: 0.0,
            max: 0.0,
            p25: 0.0,
            p50: 0.0,
            p75: 0.0,
            p90: 0.0,
            p95: 0.0,
            p99: 0.0,
            iqr: 0.0,
            cv: None,
            ci95_lower: 0.0,
            ci95_upper: 0.0,
        }
    }
}

/// Arithmetic mean, 0 for an empty slice.
pub(crate) fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Sample variance with Bessel's correction (n-1 denominator).
/// Defined as 0 for fewer than two samples.
pub(crate) fn sample_variance(samples: &[f64], mean: f64) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let sum_sq_diff: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
    sum_sq_diff / (samples.len() - 1) as f64
}

/// Read percentile `p` (0-100) from samples sorted ascending.
///
/// Returns 0 for an empty slice.
pub fn percentile(sorted: &[f64], p: f64, method: PercentileMethod) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }

    match method {
        PercentileMethod::Interpolated => {
            let idx = (p / 100.0) * (n - 1) as f64;
            let lower = (idx.floor() as usize).min(n - 1);
            let upper = (lower + 1).min(n - 1);
            let weight = idx - lower as f64;
            sorted[lower] * (1.0 - weight) + sorted[upper] * weight
        }
        PercentileMethod::InclusiveRank => {
            let idx = ((p / 100.0) * n as f64).ceil() - 1.0;
            let idx = idx.clamp(0.0, (n - 1) as f64) as usize;
            sorted[idx]
        }
    }
}

/// Compute the statistics record using interpolated percentiles.
pub fn compute_statistics(samples: &[f64]) -> StatisticsRecord {
    compute_statistics_with(samples, PercentileMethod::default())
}

/// Compute the statistics record with an explicit percentile convention.
///
/// The 95% confidence interval is the normal approximation
/// `mean +/- 1.96 * sd / sqrt(n)`; it is only trustworthy for n above ~30.
pub fn compute_statistics_with(samples: &[f64], method: PercentileMethod) -> StatisticsRecord {
    if samples.is_empty() {
        return StatisticsRecord::empty();
    }

    let n = samples.len();
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mean = mean(&sorted);
    let sd = sample_variance(&sorted, mean).sqrt();

    let p25 = percentile(&sorted, 25.0, method);
    let p75 = percentile(&sorted, 75.0, method);

    let cv = if mean == 0.0 {
        None
    } else {
        Some((sd / mean) * 100.0)
    };

    let se = sd / (n as f64).sqrt();

    StatisticsRecord {
        n,
        mean,
        sd,
        min: sorted[0],
        max: sorted[n - 1],
        p25,
        p50: percentile(&sorted, 50.0, method),
        p75,
        p90: percentile(&sorted, 90.0, method),
        p95: percentile(&sorted, 95.0, method),
        p99: percentile(&sorted, 99.0, method),
        iqr: p75 - p25,
        cv,
        ci95_lower: mean - Z_95 * se,
        ci95_upper: mean + Z_95 * se,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_samples() {
        let stats = compute_statistics(&[]);
        assert_eq!(stats, StatisticsRecord::empty());
        assert_eq!(stats.n, 0);
        assert!(stats.cv.is_none());
    }

    #[test]
    fn test_single_sample_has_zero_sd() {
        let stats = compute_statistics(&[42.0]);
        assert_eq!(stats.n, 1);
        assert_eq!(stats.mean, 42.0);
        assert_eq!(stats.sd, 0.0);
        assert_eq!(stats.p99, 42.0);
        assert_eq!(stats.ci95_lower, 42.0);
        assert_eq!(stats.ci95_upper, 42.0);
        assert_eq!(stats.cv, Some(0.0));
    }

    #[test]
    fn test_basic_statistics() {
        let stats = compute_statistics(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stats.n, 8);
        assert!(approx(stats.mean, 5.0));
        assert!(approx(stats.sd, (32.0f64 / 7.0).sqrt()));
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);

        let half_width = 1.96 * stats.sd / 8f64.sqrt();
        assert!(approx(stats.ci95_lower, 5.0 - half_width));
        assert!(approx(stats.ci95_upper, 5.0 + half_width));
        assert!(approx(stats.cv.unwrap(), stats.sd / 5.0 * 100.0));
    }

    #[test]
    fn test_interpolated_percentiles() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!(approx(percentile(&sorted, 25.0, PercentileMethod::Interpolated), 1.75));
        assert!(approx(percentile(&sorted, 50.0, PercentileMethod::Interpolated), 2.5));
        assert!(approx(percentile(&sorted, 100.0, PercentileMethod::Interpolated), 4.0));
        assert!(approx(percentile(&sorted, 0.0, PercentileMethod::Interpolated), 1.0));

        let ten: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        assert!(approx(percentile(&ten, 95.0, PercentileMethod::Interpolated), 9.55));
    }

    #[test]
    fn test_inclusive_rank_percentiles() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 25.0, PercentileMethod::InclusiveRank), 1.0);
        assert_eq!(percentile(&sorted, 50.0, PercentileMethod::InclusiveRank), 2.0);
        assert_eq!(percentile(&sorted, 0.0, PercentileMethod::InclusiveRank), 1.0);
        assert_eq!(percentile(&sorted, 100.0, PercentileMethod::InclusiveRank), 4.0);

        let ten: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        assert_eq!(percentile(&ten, 95.0, PercentileMethod::InclusiveRank), 10.0);
    }

    #[test]
    fn test_methods_differ_in_the_tail() {
        let samples: Vec<f64> = (1..=10).map(|x| x as f64 * 10.0).collect();
        let interpolated = compute_statistics_with(&samples, PercentileMethod::Interpolated);
        let inclusive = compute_statistics_with(&samples, PercentileMethod::InclusiveRank);
        assert!(inclusive.p95 > interpolated.p95);
        assert_eq!(interpolated.mean, inclusive.mean);
    }

    #[test]
    fn test_zero_mean_cv_is_undefined() {
        let stats = compute_statistics(&[-1.0, 1.0]);
        assert_eq!(stats.mean, 0.0);
        assert!(stats.cv.is_none());
    }

    #[test]
    fn test_identical_values() {
        let stats = compute_statistics(&[7.0; 12]);
        assert_eq!(stats.mean, 7.0);
        assert_eq!(stats.sd, 0.0);
        for p in [stats.p25, stats.p50, stats.p75, stats.p90, stats.p95, stats.p99] {
            assert_eq!(p, 7.0);
        }
        assert_eq!(stats.iqr, 0.0);
        assert_eq!(stats.cv, Some(0.0));
        assert_eq!(stats.ci95_lower, 7.0);
        assert_eq!(stats.ci95_upper, 7.0);
    }

    #[test]
    fn test_outlier_pulls_mean_not_median() {
        let stats = compute_statistics(&[10.0, 12.0, 11.0, 13.0, 12.0, 100.0]);
        assert!(approx(stats.p50, 12.0));
        assert!(stats.mean > 2.0 * stats.p50);
    }

    #[test]
    fn test_percentile_method_parsing() {
        assert_eq!(
            "interpolated".parse::<PercentileMethod>(),
            Ok(PercentileMethod::Interpolated)
        );
        assert_eq!(
            "inclusive-rank".parse::<PercentileMethod>(),
            Ok(PercentileMethod::InclusiveRank)
        );
        assert!("nearest".parse::<PercentileMethod>().is_err());
        assert_eq!(PercentileMethod::InclusiveRank.to_string(), "inclusive-rank");
    }

    #[test]
    fn test_record_field_names() {
        let json = serde_json::to_value(compute_statistics(&[1.0, 2.0])).unwrap();
        for field in [
            "n",
            "mean",
            "sd",
            "min",
            "max",
            "p25",
            "p50",
            "p75",
            "p90",
            "p95",
            "p99",
            "iqr",
            "cv",
            "ci95_lower",
            "ci95_upper",
        ] {
            assert!(json.get(field).is_some(), "missing field {}", field);
        }
    }
}
