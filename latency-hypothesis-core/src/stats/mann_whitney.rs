//! Mann-Whitney U test.
//!
//! Rank based, so a single slow outlier moves the statistic by at most one
//! rank instead of dragging a mean.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::distribution::{DistributionProvider, UStatistic};
use super::{require_samples, StatisticalTest, StatsError};

/// Outcome of the Mann-Whitney U test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MannWhitneyResult {
    /// `min(U1, U2)`.
    pub u: f64,
    /// U computed from the rank sum of group 1.
    pub u1: f64,
    /// `n1 * n2 - u1`.
    pub u2: f64,
    /// Normal-approximation z-score of `u`, without tie correction.
    pub z: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Whether `p_value` comes from a normal approximation.
    pub approximate: bool,
}

/// Assign ranks 1..=n to `sorted`, giving tied values the average of their positions.
///
/// Returns the ranks and whether any tie was found.
pub fn rank_with_ties(sorted: &[f64]) -> (Vec<f64>, bool) {
    let mut ranks = vec![0.0; sorted.len()];
    let mut has_ties = false;
    let mut start = 0;

    while start < sorted.len() {
        let mut end = start + 1;
        while end < sorted.len() && sorted[end] == sorted[start] {
            end += 1;
        }
        if end - start > 1 {
            has_ties = true;
        }
        // Positions start+1..=end share their mean rank
        let mid_rank = (start + 1 + end) as f64 / 2.0;
        for rank in &mut ranks[start..end] {
            *rank = mid_rank;
        }
        start = end;
    }

    (ranks, has_ties)
}

/// Mann-Whitney U test with an injected distribution provider.
#[derive(Debug, Clone)]
pub struct MannWhitneyU {
    provider: Arc<dyn DistributionProvider>,
}

impl MannWhitneyU {
    pub fn new(provider: Arc<dyn DistributionProvider>) -> Self {
        Self { provider }
    }
}

impl StatisticalTest for MannWhitneyU {
    type Output = MannWhitneyResult;

    fn name(&self) -> &'static str {
        "Mann-Whitney U test"
    }

    fn analyze(&self, group1: &[f64], group2: &[f64]) -> Result<MannWhitneyResult, StatsError> {
        require_samples(self.name(), "group 1", group1, 1)?;
        require_samples(self.name(), "group 2", group2, 1)?;

        let n1 = group1.len() as f64;
        let n2 = group2.len() as f64;

        let mut combined: Vec<(f64, bool)> = group1
            .iter()
            .map(|&v| (v, true))
            .chain(group2.iter().map(|&v| (v, false)))
            .collect();
        combined.sort_by(|a, b| a.0.total_cmp(&b.0));

        let values: Vec<f64> = combined.iter().map(|&(v, _)| v).collect();
        let (ranks, has_ties) = rank_with_ties(&values);

        let r1: f64 = combined
            .iter()
            .zip(&ranks)
            .filter(|((_, from_group1), _)| *from_group1)
            .map(|(_, rank)| rank)
            .sum();

        let u1 = r1 - n1 * (n1 + 1.0) / 2.0;
        let u2 = n1 * n2 - u1;
        let u = u1.min(u2);

        let mean_u = n1 * n2 / 2.0;
        let std_u = (n1 * n2 * (n1 + n2 + 1.0) / 12.0).sqrt();
        let z = if std_u > 0.0 { (u - mean_u) / std_u } else { 0.0 };

        let p = self.provider.mann_whitney(&UStatistic {
            u,
            z,
            n1: group1.len(),
            n2: group2.len(),
            has_ties,
        });

        Ok(MannWhitneyResult {
            u,
            u1,
            u2,
            z,
            p_value: p.value,
            approximate: p.approximate,
        })
    }
}
