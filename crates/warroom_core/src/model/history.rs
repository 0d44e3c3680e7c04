//! Strategy identities and the per-round value history they accumulate

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three portfolios tracked side by side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    User,
    Benchmark,
    RegimeAi,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::User,
        StrategyKind::Benchmark,
        StrategyKind::RegimeAi,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            StrategyKind::User => "You",
            StrategyKind::Benchmark => "Benchmark",
            StrategyKind::RegimeAi => "Regime AI",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per tracked strategy
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerStrategy<T> {
    pub user: T,
    pub benchmark: T,
    pub regime_ai: T,
}

impl<T> PerStrategy<T> {
    pub fn from_fn(mut f: impl FnMut(StrategyKind) -> T) -> Self {
        Self {
            user: f(StrategyKind::User),
            benchmark: f(StrategyKind::Benchmark),
            regime_ai: f(StrategyKind::RegimeAi),
        }
    }

    #[must_use]
    pub fn get(&self, kind: StrategyKind) -> &T {
        match kind {
            StrategyKind::User => &self.user,
            StrategyKind::Benchmark => &self.benchmark,
            StrategyKind::RegimeAi => &self.regime_ai,
        }
    }

    pub fn get_mut(&mut self, kind: StrategyKind) -> &mut T {
        match kind {
            StrategyKind::User => &mut self.user,
            StrategyKind::Benchmark => &mut self.benchmark,
            StrategyKind::RegimeAi => &mut self.regime_ai,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (StrategyKind, &T)> {
        StrategyKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}

/// Portfolio value at the end of a round (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub round: u32,
    pub value: f64,
}
