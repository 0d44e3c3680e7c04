//! Return-series statistics
//!
//! Standard deviations use the sample (n - 1) definition throughout. A series
//! with fewer than two points has zero deviation.

/// Added to the Sharpe denominator so a constant series does not divide by zero
pub const SHARPE_EPSILON: f64 = 1e-9;

#[must_use]
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

/// Sample standard deviation
#[must_use]
pub fn std_dev(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let m = mean(xs);
    let ss: f64 = xs.iter().map(|x| (x - m).powi(2)).sum();
    (ss / (xs.len() - 1) as f64).sqrt()
}

/// Round-over-round simple returns of a value path (`V[i] / V[i-1] - 1`)
///
/// A zero prior value yields a zero return for that step.
#[must_use]
pub fn simple_returns(path: &[f64]) -> Vec<f64> {
    path.windows(2)
        .map(|w| if w[0] == 0.0 { 0.0 } else { w[1] / w[0] - 1.0 })
        .collect()
}

/// `mean(r) / (std(r) + ε) * sqrt(periods)`
#[must_use]
pub fn sharpe_ratio(returns: &[f64], periods: u32) -> f64 {
    mean(returns) / (std_dev(returns) + SHARPE_EPSILON) * f64::from(periods).sqrt()
}

/// Standard deviation of returns, in percent
#[must_use]
pub fn volatility_pct(returns: &[f64]) -> f64 {
    std_dev(returns) * 100.0
}

/// Worst peak-to-trough decline of a value path, in percent (zero or negative)
///
/// The running peak includes the first point, so a path that only falls
/// from its start still registers a drawdown.
#[must_use]
pub fn max_drawdown_pct(path: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst: f64 = 0.0;
    for &value in path {
        peak = peak.max(value);
        if peak > 0.0 {
            worst = worst.min((value - peak) / peak);
        }
    }
    worst * 100.0
}
