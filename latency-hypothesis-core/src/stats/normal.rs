/// Standard normal CDF via the Abramowitz-Stegun rational approximation
/// (formula 26.2.17).
///
/// The absolute error is on the order of 1e-7, which is fine for p-value
/// reporting but not exact: `normal_cdf(0.0)` is 0.5 only to about 1e-7.
pub fn normal_cdf(x: f64) -> f64 {
    let t = 1.0 / (1.0 + 0.2316419 * x.abs());
    let d = 0.3989423 * (-x * x / 2.0).exp();
    let p = d
        * t
        * (0.3193815 + t * (-0.3565638 + t * (1.781478 + t * (-1.821256 + t * 1.330274))));

    if x > 0.0 {
        1.0 - p
    } else {
        p
    }
}
