//! Property-based tests for the statistics engine.

use std::sync::Arc;

use latency_hypothesis_core::stats::{
    cohens_d, compute_statistics, normal_cdf, ApproximateDistribution, MannWhitneyU,
    StatisticalTest, WelchTTest,
};
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-9;

fn latencies(min_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.1f64..1000.0, min_len..40)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOLERANCE * (1.0 + a.abs().max(b.abs()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_percentiles_are_ordered(samples in latencies(1)) {
        let s = compute_statistics(&samples);
        let ordered = [s.min, s.p25, s.p50, s.p75, s.p90, s.p95, s.p99, s.max];
        for pair in ordered.windows(2) {
            prop_assert!(pair[0] <= pair[1] + TOLERANCE, "{:?}", ordered);
        }
        prop_assert!(s.iqr >= -TOLERANCE);
        prop_assert!(s.ci95_lower <= s.mean && s.mean <= s.ci95_upper);
    }

    #[test]
    fn prop_statistics_ignore_sample_order(samples in latencies(2)) {
        let mut reversed = samples.clone();
        reversed.reverse();
        let forward = compute_statistics(&samples);
        let backward = compute_statistics(&reversed);

        prop_assert_eq!(forward.n, backward.n);
        prop_assert!(close(forward.mean, backward.mean));
        prop_assert!(close(forward.sd, backward.sd));
        prop_assert_eq!(forward.p50, backward.p50);
        prop_assert_eq!(forward.p95, backward.p95);
    }

    #[test]
    fn prop_identical_values_have_no_spread(value in 0.1f64..1000.0, n in 2usize..30) {
        let samples = vec![value; n];
        let s = compute_statistics(&samples);
        prop_assert!(s.sd <= TOLERANCE * value);
        prop_assert!(close(s.p50, value));
        prop_assert!(close(s.p99, value));
        prop_assert_eq!(s.min, value);
        prop_assert_eq!(s.max, value);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_welch_is_antisymmetric(a in latencies(2), b in latencies(2)) {
        let test = WelchTTest::new(Arc::new(ApproximateDistribution));
        let forward = test.analyze(&a, &b).unwrap();
        let backward = test.analyze(&b, &a).unwrap();

        prop_assert!(close(forward.t, -backward.t));
        prop_assert!(close(forward.df, backward.df));
        prop_assert!(close(forward.p_value, backward.p_value));
        prop_assert!((0.0..=1.0).contains(&forward.p_value));
    }

    #[test]
    fn prop_mann_whitney_u_partitions_pairs(a in latencies(1), b in latencies(1)) {
        let test = MannWhitneyU::new(Arc::new(ApproximateDistribution));
        let forward = test.analyze(&a, &b).unwrap();
        let backward = test.analyze(&b, &a).unwrap();
        let pairs = (a.len() * b.len()) as f64;

        prop_assert!(close(forward.u1 + forward.u2, pairs));
        prop_assert!(close(forward.u, backward.u));
        prop_assert!(forward.u <= pairs / 2.0 + TOLERANCE);
        prop_assert!((0.0..=1.0).contains(&forward.p_value));
    }

    #[test]
    fn prop_cohens_d_flips_sign(a in latencies(2), b in latencies(2)) {
        let forward = cohens_d(&a, &b).unwrap();
        let backward = cohens_d(&b, &a).unwrap();
        prop_assert!(close(forward.d, -backward.d));
        prop_assert_eq!(forward.interpretation, backward.interpretation);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_normal_cdf_is_symmetric(x in -8.0f64..8.0) {
        prop_assert!((normal_cdf(x) + normal_cdf(-x) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn prop_normal_cdf_is_monotone(x in -8.0f64..8.0, step in 0.001f64..2.0) {
        prop_assert!(normal_cdf(x) <= normal_cdf(x + step) + 1e-7);
        prop_assert!((0.0..=1.0).contains(&normal_cdf(x)));
    }
}
