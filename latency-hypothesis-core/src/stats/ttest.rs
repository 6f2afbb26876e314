use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::descriptive::{mean, sample_variance};
use super::distribution::DistributionProvider;
use super::{require_samples, StatisticalTest, StatsError};

/// Outcome of Welch's t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WelchResult {
    /// Welch's t statistic, positive when group 1 has the larger mean.
    pub t: f64,
    /// Welch-Satterthwaite degrees of freedom.
    pub df: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Whether `p_value` comes from a normal approximation.
    pub approximate: bool,
}

/// Welch's t-test for comparing two independent samples with potentially unequal variances.
///
/// Latency distributions of different protocols rarely share a variance, so the
/// pooled-variance Student's test is not offered.
#[derive(Debug, Clone)]
pub struct WelchTTest {
    provider: Arc<dyn DistributionProvider>,
}

impl WelchTTest {
    /// Create a Welch's t-test that converts t statistics with `provider`.
    pub fn new(provider: Arc<dyn DistributionProvider>) -> Self {
        Self { provider }
    }

    /// Calculate degrees of freedom using the Welch-Satterthwaite equation.
    ///
    /// df = (var1/n1 + var2/n2)^2 / ((var1/n1)^2/(n1-1) + (var2/n2)^2/(n2-1))
    fn welch_satterthwaite_df(var1: f64, n1: usize, var2: f64, n2: usize) -> f64 {
        let s1 = var1 / n1 as f64;
        let s2 = var2 / n2 as f64;
        let numerator = (s1 + s2).powi(2);
        let denominator = (s1.powi(2) / (n1 - 1) as f64) + (s2.powi(2) / (n2 - 1) as f64);

        if denominator == 0.0 {
            return (n1 + n2 - 2) as f64;
        }

        numerator / denominator
    }
}

impl StatisticalTest for WelchTTest {
    type Output = WelchResult;

    fn name(&self) -> &'static str {
        "Welch's t-test"
    }

    fn analyze(&self, group1: &[f64], group2: &[f64]) -> Result<WelchResult, StatsError> {
        require_samples(self.name(), "group 1", group1, 2)?;
        require_samples(self.name(), "group 2", group2, 2)?;

        let n1 = group1.len();
        let n2 = group2.len();

        let mean1 = mean(group1);
        let mean2 = mean(group2);
        let var1 = sample_variance(group1, mean1);
        let var2 = sample_variance(group2, mean2);

        // Standard error of the difference
        let se = (var1 / n1 as f64 + var2 / n2 as f64).sqrt();

        // Constant samples carry no evidence either way
        if se == 0.0 {
            return Ok(WelchResult {
                t: 0.0,
                df: (n1 + n2 - 2) as f64,
                p_value: 1.0,
                approximate: false,
            });
        }

        let t = (mean1 - mean2) / se;
        let df = Self::welch_satterthwaite_df(var1, n1, var2, n2);
        let p = self.provider.two_sided_t(t, df);

        Ok(WelchResult {
            t,
            df,
            p_value: p.value,
            approximate: p.approximate,
        })
    }
}
