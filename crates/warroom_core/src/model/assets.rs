//! Asset classes and the per-asset vectors built on them
//!
//! The asset universe is closed, so every per-asset quantity is stored as a
//! fixed-size array indexed by [`AssetClass::index`]. Serialized forms are
//! plain sequences in [`AssetClass::ALL`] order.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Number of asset classes in the universe
pub const ASSET_COUNT: usize = 6;

/// The fixed set of asset classes a portfolio can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    IndianEquity,
    USEquity,
    Bonds,
    Gold,
    Crypto,
    Cash,
}

impl AssetClass {
    /// All asset classes in canonical order
    pub const ALL: [AssetClass; ASSET_COUNT] = [
        AssetClass::IndianEquity,
        AssetClass::USEquity,
        AssetClass::Bonds,
        AssetClass::Gold,
        AssetClass::Crypto,
        AssetClass::Cash,
    ];

    /// Position of this asset in every per-asset array
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human readable name, also used as the export column header
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            AssetClass::IndianEquity => "Indian Equity",
            AssetClass::USEquity => "US Equity",
            AssetClass::Bonds => "Bonds",
            AssetClass::Gold => "Gold",
            AssetClass::Crypto => "Crypto",
            AssetClass::Cash => "Cash",
        }
    }

    /// Whether the asset counts toward equity exposure
    #[must_use]
    pub const fn is_equity(self) -> bool {
        matches!(self, AssetClass::IndianEquity | AssetClass::USEquity)
    }

    /// Parse a label or a loose variant name ("gold", "us equity", "US_EQUITY")
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "indianequity" | "india" | "indian" | "in" => Some(AssetClass::IndianEquity),
            "usequity" | "us" => Some(AssetClass::USEquity),
            "bonds" | "bond" => Some(AssetClass::Bonds),
            "gold" => Some(AssetClass::Gold),
            "crypto" => Some(AssetClass::Crypto),
            "cash" => Some(AssetClass::Cash),
            _ => None,
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Signed fractional return per asset for one round (-0.07 = -7%)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReturnVector(pub [f64; ASSET_COUNT]);

impl ReturnVector {
    #[must_use]
    pub const fn new(returns: [f64; ASSET_COUNT]) -> Self {
        Self(returns)
    }

    /// Asset with the highest return; the earliest asset wins ties
    #[must_use]
    pub fn best_asset(&self) -> AssetClass {
        let mut best = AssetClass::ALL[0];
        for asset in AssetClass::ALL {
            if self[asset] > self[best] {
                best = asset;
            }
        }
        best
    }

    /// Iterate `(asset, return)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, f64)> + '_ {
        AssetClass::ALL.iter().map(|&a| (a, self[a]))
    }
}

impl Index<AssetClass> for ReturnVector {
    type Output = f64;

    fn index(&self, asset: AssetClass) -> &f64 {
        &self.0[asset.index()]
    }
}

/// Fractional portfolio weights per asset, nominally summing to 1
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weights(pub [f64; ASSET_COUNT]);

impl Weights {
    #[must_use]
    pub const fn new(weights: [f64; ASSET_COUNT]) -> Self {
        Self(weights)
    }

    /// `1/N` in every asset
    #[must_use]
    pub fn equal() -> Self {
        Self([1.0 / ASSET_COUNT as f64; ASSET_COUNT])
    }

    /// Build from whole-number percentages (30.0 -> 0.30)
    #[must_use]
    pub fn from_percentages(percentages: [f64; ASSET_COUNT]) -> Self {
        Self(percentages.map(|p| p / 100.0))
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// True when the weights form a full partition within `tolerance`
    #[must_use]
    pub fn is_fully_invested(&self, tolerance: f64) -> bool {
        self.0.iter().all(|w| *w >= 0.0) && (self.sum() - 1.0).abs() <= tolerance
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, f64)> + '_ {
        AssetClass::ALL.iter().map(|&a| (a, self[a]))
    }
}

impl Index<AssetClass> for Weights {
    type Output = f64;

    fn index(&self, asset: AssetClass) -> &f64 {
        &self.0[asset.index()]
    }
}

impl IndexMut<AssetClass> for Weights {
    fn index_mut(&mut self, asset: AssetClass) -> &mut f64 {
        &mut self.0[asset.index()]
    }
}

/// Whole-number percentage split chosen by the user for one round
///
/// Only complete allocations (summing to exactly 100) are accepted by the
/// session; an `Allocation` itself may hold any values while being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allocation(pub [u8; ASSET_COUNT]);

impl Allocation {
    #[must_use]
    pub const fn from_percentages(percentages: [u8; ASSET_COUNT]) -> Self {
        Self(percentages)
    }

    /// 100% in a single asset
    #[must_use]
    pub fn all_in(asset: AssetClass) -> Self {
        Self::default().with(asset, 100)
    }

    /// Set one asset's percentage
    #[must_use]
    pub fn with(mut self, asset: AssetClass, percent: u8) -> Self {
        self.0[asset.index()] = percent;
        self
    }

    /// Sum of all percentages
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().map(|&p| u32::from(p)).sum()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total() == 100
    }

    /// Convert percentages to fractional weights
    #[must_use]
    pub fn to_weights(&self) -> Weights {
        Weights(self.0.map(|p| f64::from(p) / 100.0))
    }

    /// Combined percentage held in equity asset classes
    #[must_use]
    pub fn equity_share(&self) -> u32 {
        AssetClass::ALL
            .iter()
            .filter(|a| a.is_equity())
            .map(|&a| u32::from(self[a]))
            .sum()
    }

    /// Percentages as floats, for statistics
    #[must_use]
    pub fn as_f64(&self) -> [f64; ASSET_COUNT] {
        self.0.map(f64::from)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, u8)> + '_ {
        AssetClass::ALL.iter().map(|&a| (a, self[a]))
    }
}

impl Index<AssetClass> for Allocation {
    type Output = u8;

    fn index(&self, asset: AssetClass) -> &u8 {
        &self.0[asset.index()]
    }
}

impl IndexMut<AssetClass> for Allocation {
    fn index_mut(&mut self, asset: AssetClass) -> &mut u8 {
        &mut self.0[asset.index()]
    }
}
