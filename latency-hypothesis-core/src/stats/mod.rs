//! Statistics engine for two-group latency comparisons.
//!
//! Every function here is a pure transform of its inputs. Hypothesis tests
//! obtain their p-values from an injected [`DistributionProvider`], so the
//! caller decides once (at startup) whether exact or approximate
//! distributions are used.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies which group of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    GroupA,
    GroupB,
}

/// Structural failures surfaced to the caller.
///
/// Numeric degeneracies (zero variance, zero mean) are not errors; they are
/// absorbed by the individual computations with documented sentinel values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// A group holds fewer samples than the statistic requires.
    #[error("{test} requires at least {required} samples in {group}, got {actual}")]
    InsufficientSampleSize {
        test: &'static str,
        group: String,
        required: usize,
        actual: usize,
    },
}

/// A two-sample statistical test.
pub trait StatisticalTest: Send + Sync {
    type Output;

    /// Human readable name used in error messages and logs.
    fn name(&self) -> &'static str;

    /// Analyze two independent samples.
    fn analyze(&self, group1: &[f64], group2: &[f64]) -> Result<Self::Output, StatsError>;
}

/// Fail with [`StatsError::InsufficientSampleSize`] when `samples` is too short.
pub(crate) fn require_samples(
    test: &'static str,
    group: &str,
    samples: &[f64],
    required: usize,
) -> Result<(), StatsError> {
    if samples.len() < required {
        return Err(StatsError::InsufficientSampleSize {
            test,
            group: group.to_string(),
            required,
            actual: samples.len(),
        });
    }
    Ok(())
}

mod compare;
mod descriptive;
mod distribution;
mod effect;
mod mann_whitney;
mod normal;
mod ttest;

pub use compare::{Comparator, ComparisonRecord};
pub use descriptive::{
    compute_statistics, compute_statistics_with, percentile, PercentileMethod, StatisticsRecord,
};
pub use distribution::{
    ApproximateDistribution, DistributionKind, DistributionProvider, ExactDistribution, PValue,
    UStatistic, EXACT_U_MAX_CELLS,
};
pub use effect::{cohens_d, CohensD, EffectInterpretation};
pub use mann_whitney::{rank_with_ties, MannWhitneyResult, MannWhitneyU};
pub use normal::normal_cdf;
pub use ttest::{WelchResult, WelchTTest};
