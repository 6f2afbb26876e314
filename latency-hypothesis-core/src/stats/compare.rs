use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::descriptive::{compute_statistics_with, PercentileMethod, StatisticsRecord};
use super::distribution::DistributionProvider;
use super::effect::{cohens_d, EffectInterpretation};
use super::mann_whitney::MannWhitneyU;
use super::ttest::WelchTTest;
use super::{require_samples, Side, StatisticalTest, StatsError};

/// Pairwise comparison of two sample groups.
///
/// Differences are always `a - b`; a positive `mean_difference` means group
/// A is slower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub name_a: String,
    pub name_b: String,
    pub stats_a: StatisticsRecord,
    pub stats_b: StatisticsRecord,
    /// Welch's t statistic.
    pub t: f64,
    /// Welch-Satterthwaite degrees of freedom.
    pub df: f64,
    pub t_p_value: f64,
    /// Mann-Whitney `min(U1, U2)`.
    #[serde(rename = "U")]
    pub u: f64,
    pub z: f64,
    pub mw_p_value: f64,
    pub cohens_d: f64,
    pub effect_interpretation: EffectInterpretation,
    pub mean_difference: f64,
    /// `mean_difference / mean_b * 100`; `None` when `mean_b` is zero.
    pub percentage_difference: Option<f64>,
    /// Name of the distribution provider that produced the p-values.
    pub distribution: String,
    /// True when at least one p-value is a normal approximation.
    pub approximate: bool,
    pub confidence_level: f64,
    /// The faster group, when Welch's test is significant.
    pub winner: Option<Side>,
}

impl ComparisonRecord {
    /// Whether Welch's p-value is below `1 - confidence_level`.
    pub fn is_significant(&self) -> bool {
        self.t_p_value < 1.0 - self.confidence_level
    }
}

/// Runs the descriptive estimator, both hypothesis tests and the effect size
/// over a pair of groups.
#[derive(Debug, Clone)]
pub struct Comparator {
    provider: Arc<dyn DistributionProvider>,
    welch: WelchTTest,
    mann_whitney: MannWhitneyU,
    percentile_method: PercentileMethod,
    confidence_level: f64,
}

impl Comparator {
    /// Create a comparator with interpolated percentiles and 95% confidence.
    pub fn new(provider: Arc<dyn DistributionProvider>) -> Self {
        Self {
            welch: WelchTTest::new(Arc::clone(&provider)),
            mann_whitney: MannWhitneyU::new(Arc::clone(&provider)),
            provider,
            percentile_method: PercentileMethod::default(),
            confidence_level: 0.95,
        }
    }

    pub fn with_percentile_method(mut self, method: PercentileMethod) -> Self {
        self.percentile_method = method;
        self
    }

    /// Set the confidence level used to pick a winner.
    ///
    /// # Panics
    /// Panics if confidence_level is not in the range (0, 1).
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        assert!(
            confidence_level > 0.0 && confidence_level < 1.0,
            "confidence_level must be between 0 and 1 (exclusive)"
        );
        self.confidence_level = confidence_level;
        self
    }

    pub fn provider(&self) -> &dyn DistributionProvider {
        self.provider.as_ref()
    }

    pub fn percentile_method(&self) -> PercentileMethod {
        self.percentile_method
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Compare group A against group B.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InsufficientSampleSize`] if either group has
    /// fewer than two samples.
    pub fn compare(
        &self,
        group_a: &[f64],
        group_b: &[f64],
        name_a: &str,
        name_b: &str,
    ) -> Result<ComparisonRecord, StatsError> {
        const TEST: &str = "comparison";
        require_samples(TEST, name_a, group_a, 2)?;
        require_samples(TEST, name_b, group_b, 2)?;

        let stats_a = compute_statistics_with(group_a, self.percentile_method);
        let stats_b = compute_statistics_with(group_b, self.percentile_method);

        let welch = self.welch.analyze(group_a, group_b)?;
        let mann_whitney = self.mann_whitney.analyze(group_a, group_b)?;
        let effect = cohens_d(group_a, group_b)?;

        let mean_difference = stats_a.mean - stats_b.mean;
        let percentage_difference = if stats_b.mean == 0.0 {
            None
        } else {
            Some(mean_difference / stats_b.mean * 100.0)
        };

        // Lower latency wins
        let alpha = 1.0 - self.confidence_level;
        let winner = if welch.p_value < alpha {
            if stats_a.mean < stats_b.mean {
                Some(Side::GroupA)
            } else if stats_b.mean < stats_a.mean {
                Some(Side::GroupB)
            } else {
                None
            }
        } else {
            None
        };

        tracing::debug!(
            name_a,
            name_b,
            t = welch.t,
            t_p_value = welch.p_value,
            u = mann_whitney.u,
            mw_p_value = mann_whitney.p_value,
            d = effect.d,
            "compared groups"
        );

        Ok(ComparisonRecord {
            name_a: name_a.to_string(),
            name_b: name_b.to_string(),
            stats_a,
            stats_b,
            t: welch.t,
            df: welch.df,
            t_p_value: welch.p_value,
            u: mann_whitney.u,
            z: mann_whitney.z,
            mw_p_value: mann_whitney.p_value,
            cohens_d: effect.d,
            effect_interpretation: effect.interpretation,
            mean_difference,
            percentage_difference,
            distribution: self.provider.name().to_string(),
            approximate: welch.approximate || mann_whitney.approximate,
            confidence_level: self.confidence_level,
            winner,
        })
    }
}
