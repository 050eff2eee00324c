//! Logistic link: linear predictor → probability.

/// The sigmoid `1 / (1 + e^(-x))`.
///
/// The result is kept strictly inside (0, 1): saturated predictors are
/// clamped to the nearest representable probability short of 0 or 1.
///
/// Panics on a NaN predictor; validated configs cannot produce one.
pub fn logistic(x: f64) -> f64 {
    assert!(!x.is_nan(), "linear predictor is NaN; check model coefficients");
    let p = 1.0 / (1.0 + (-x).exp());
    p.clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON)
}
