use std::fmt;

use serde::{Deserialize, Serialize};

use super::descriptive::{mean, sample_variance};
use super::{require_samples, StatsError};

/// Interpretation of effect size magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectInterpretation {
    /// |d| < 0.2
    Negligible,
    /// 0.2 <= |d| < 0.5
    Small,
    /// 0.5 <= |d| < 0.8
    Medium,
    /// |d| >= 0.8
    Large,
    /// Both groups are constant, so there is no spread to scale by.
    Undefined,
}

impl EffectInterpretation {
    /// Bucket a Cohen's d value by magnitude.
    pub fn from_d(d: f64) -> Self {
        let abs_d = d.abs();
        if abs_d < 0.2 {
            EffectInterpretation::Negligible
        } else if abs_d < 0.5 {
            EffectInterpretation::Small
        } else if abs_d < 0.8 {
            EffectInterpretation::Medium
        } else {
            EffectInterpretation::Large
        }
    }
}

impl fmt::Display for EffectInterpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectInterpretation::Negligible => write!(f, "negligible"),
            EffectInterpretation::Small => write!(f, "small"),
            EffectInterpretation::Medium => write!(f, "medium"),
            EffectInterpretation::Large => write!(f, "large"),
            EffectInterpretation::Undefined => write!(f, "undefined"),
        }
    }
}

/// Standardized mean difference of two groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CohensD {
    pub d: f64,
    pub interpretation: EffectInterpretation,
}

/// Cohen's d using the pooled standard deviation.
///
/// Positive when group 1 has the larger mean. Both groups need two samples.
pub fn cohens_d(group1: &[f64], group2: &[f64]) -> Result<CohensD, StatsError> {
    const TEST: &str = "Cohen's d";
    require_samples(TEST, "group 1", group1, 2)?;
    require_samples(TEST, "group 2", group2, 2)?;

    let n1 = group1.len() as f64;
    let n2 = group2.len() as f64;
    let mean1 = mean(group1);
    let mean2 = mean(group2);
    let var1 = sample_variance(group1, mean1);
    let var2 = sample_variance(group2, mean2);

    let pooled_sd = (((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / (n1 + n2 - 2.0)).sqrt();

    if pooled_sd == 0.0 {
        return Ok(CohensD {
            d: 0.0,
            interpretation: EffectInterpretation::Undefined,
        });
    }

    let d = (mean1 - mean2) / pooled_sd;
    Ok(CohensD {
        d,
        interpretation: EffectInterpretation::from_d(d),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpretation_boundaries() {
        assert_eq!(EffectInterpretation::from_d(0.0), EffectInterpretation::Negligible);
        assert_eq!(EffectInterpretation::from_d(0.1999), EffectInterpretation::Negligible);
        assert_eq!(EffectInterpretation::from_d(0.2), EffectInterpretation::Small);
        assert_eq!(EffectInterpretation::from_d(0.4999), EffectInterpretation::Small);
        assert_eq!(EffectInterpretation::from_d(0.5), EffectInterpretation::Medium);
        assert_eq!(EffectInterpretation::from_d(-0.5), EffectInterpretation::Medium);
        assert_eq!(EffectInterpretation::from_d(0.7999), EffectInterpretation::Medium);
        assert_eq!(EffectInterpretation::from_d(0.8), EffectInterpretation::Large);
        assert_eq!(EffectInterpretation::from_d(-3.0), EffectInterpretation::Large);
    }

    #[test]
    fn test_known_value() {
        // pooled sd = sqrt(2.5), mean difference = -1
        let result = cohens_d(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert!((result.d + 1.0 / 2.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(result.interpretation, EffectInterpretation::Medium);
    }

    #[test]
    fn test_sign_flips_on_swap() {
        let a = [10.0, 12.0, 11.0, 13.0, 12.0, 100.0];
        let b = [20.0, 22.0, 21.0, 23.0, 22.0, 20.0];
        let ab = cohens_d(&a, &b).unwrap();
        let ba = cohens_d(&b, &a).unwrap();
        assert!((ab.d + ba.d).abs() < 1e-12);
        assert_eq!(ab.interpretation, ba.interpretation);
    }

    #[test]
    fn test_constant_groups_are_undefined() {
        let result = cohens_d(&[7.0, 7.0, 7.0], &[9.0, 9.0]).unwrap();
        assert_eq!(result.d, 0.0);
        assert_eq!(result.interpretation, EffectInterpretation::Undefined);
        assert_eq!(result.interpretation.to_string(), "undefined");
    }

    #[test]
    fn test_insufficient_samples() {
        assert!(matches!(
            cohens_d(&[1.0, 2.0], &[3.0]),
            Err(StatsError::InsufficientSampleSize { actual: 1, .. })
        ));
    }

    #[test]
    fn test_serialized_labels() {
        let json = serde_json::to_string(&EffectInterpretation::Negligible).unwrap();
        assert_eq!(json, "\"negligible\"");
    }
}
