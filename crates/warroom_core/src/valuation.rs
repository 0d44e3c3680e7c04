//! Single-period portfolio revaluation

use crate::model::{AssetClass, ReturnVector, Weights};

/// Revalue `prior_value` held at `weights` through one round of `returns`
///
/// `Σ prior * w[a] * (1 + r[a])`. Fully invested, no fees, no slippage.
/// Weights are not checked: any uninvested remainder drops out of the value.
#[must_use]
#[inline]
pub fn apply_returns(prior_value: f64, weights: &Weights, returns: &ReturnVector) -> f64 {
    AssetClass::ALL
        .iter()
        .map(|&asset| prior_value * weights[asset] * (1.0 + returns[asset]))
        .sum()
}
