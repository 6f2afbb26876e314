//! Distribution providers used to turn test statistics into p-values.
//!
//! A provider is chosen once at startup ([`DistributionKind::provider`]) and
//! injected into the tests that need it. [`ApproximateDistribution`] relies
//! only on the Abramowitz-Stegun normal CDF; [`ExactDistribution`] uses
//! statrs for Student's t and the normal distribution, and enumerates the
//! exact null distribution of U for small tie-free samples.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

use super::normal::normal_cdf;

/// Largest `n1 * n2` for which the exact U distribution is enumerated.
pub const EXACT_U_MAX_CELLS: usize = 400;

/// A two-sided p-value and whether it came from an approximation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PValue {
    pub value: f64,
    pub approximate: bool,
}

impl PValue {
    pub fn exact(value: f64) -> Self {
        Self {
            value: value.clamp(0.0, 1.0),
            approximate: false,
        }
    }

    pub fn approximate(value: f64) -> Self {
        Self {
            value: value.clamp(0.0, 1.0),
            approximate: true,
        }
    }
}

/// The Mann-Whitney statistic as seen by a distribution provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UStatistic {
    /// `min(U1, U2)`.
    pub u: f64,
    /// Normal-approximation z-score of `u`.
    pub z: f64,
    pub n1: usize,
    pub n2: usize,
    /// Whether the combined sample contained tied values.
    pub has_ties: bool,
}

/// Capability for converting test statistics into two-sided p-values.
pub trait DistributionProvider: Send + Sync + fmt::Debug {
    /// Short name recorded next to every p-value this provider produces.
    fn name(&self) -> &'static str;

    /// Two-sided p-value of a Welch t statistic with `df` degrees of freedom.
    fn two_sided_t(&self, t: f64, df: f64) -> PValue;

    /// Two-sided p-value of a Mann-Whitney U statistic.
    fn mann_whitney(&self, statistic: &UStatistic) -> PValue;
}

/// Normal approximation for every test.
///
/// Only accurate for large samples (df above ~30 for the t-test).
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateDistribution;

impl DistributionProvider for ApproximateDistribution {
    fn name(&self) -> &'static str {
        "approximate"
    }

    fn two_sided_t(&self, t: f64, _df: f64) -> PValue {
        PValue::approximate(2.0 * (1.0 - normal_cdf(t.abs())))
    }

    fn mann_whitney(&self, statistic: &UStatistic) -> PValue {
        PValue::approximate(2.0 * (1.0 - normal_cdf(statistic.z.abs())))
    }
}

/// Student's t for Welch's test and the exact U distribution where feasible.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactDistribution;

impl ExactDistribution {
    fn standard_normal_two_sided(z: f64) -> PValue {
        match Normal::new(0.0, 1.0) {
            Ok(normal) => PValue::approximate(2.0 * normal.sf(z.abs())),
            Err(_) => PValue::approximate(2.0 * (1.0 - normal_cdf(z.abs()))),
        }
    }
}

impl DistributionProvider for ExactDistribution {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn two_sided_t(&self, t: f64, df: f64) -> PValue {
        match StudentsT::new(0.0, 1.0, df) {
            // Two-tailed: p = 2 * P(T > |t|)
            Ok(dist) => PValue::exact(2.0 * dist.sf(t.abs())),
            Err(_) => {
                tracing::debug!(df, "invalid degrees of freedom, using normal approximation");
                PValue::approximate(2.0 * (1.0 - normal_cdf(t.abs())))
            }
        }
    }

    fn mann_whitney(&self, statistic: &UStatistic) -> PValue {
        let cells = statistic.n1 * statistic.n2;
        if statistic.has_ties || cells == 0 || cells > EXACT_U_MAX_CELLS {
            return Self::standard_normal_two_sided(statistic.z);
        }

        let counts = u_distribution(statistic.n1, statistic.n2);
        let total: f64 = counts.iter().sum();
        // Without ties U is an integer.
        let u = statistic.u.round() as usize;
        let lower_tail: f64 = counts.iter().take(u + 1).sum::<f64>() / total;
        PValue::exact((2.0 * lower_tail).min(1.0))
    }
}

/// Frequencies of `U1 = 0..=n1*n2` over all orderings of two tie-free groups.
///
/// `counts[i][j][u]` is built from the largest of the `i + j` values: if it
/// belongs to group 1 it beats all `j` values of group 2, otherwise it adds
/// nothing to `U1`.
fn u_distribution(n1: usize, n2: usize) -> Vec<f64> {
    let mut table: Vec<Vec<Vec<f64>>> = vec![vec![Vec::new(); n2 + 1]; n1 + 1];

    for i in 0..=n1 {
        for j in 0..=n2 {
            if i == 0 || j == 0 {
                table[i][j] = vec![1.0];
                continue;
            }
            let mut counts = vec![0.0; i * j + 1];
            for (u, &c) in table[i - 1][j].iter().enumerate() {
                counts[u + j] += c;
            }
            for (u, &c) in table[i][j - 1].iter().enumerate() {
                counts[u] += c;
            }
            table[i][j] = counts;
        }
    }

    std::mem::take(&mut table[n1][n2])
}

/// Which provider to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionKind {
    #[default]
    Exact,
    Approximate,
}

impl DistributionKind {
    pub fn provider(&self) -> Arc<dyn DistributionProvider> {
        match self {
            DistributionKind::Exact => Arc::new(ExactDistribution),
            DistributionKind::Approximate => Arc::new(ApproximateDistribution),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionKind::Exact => "exact",
            DistributionKind::Approximate => "approximate",
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(DistributionKind::Exact),
            "approximate" => Ok(DistributionKind::Approximate),
            other => Err(format!(
                "unknown distribution '{}' (expected 'exact' or 'approximate')",
                other
            )),
        }
    }
}
