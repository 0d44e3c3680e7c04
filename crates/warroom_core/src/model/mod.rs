mod assets;
mod history;
mod scenario;

pub use assets::{ASSET_COUNT, Allocation, AssetClass, ReturnVector, Weights};
pub use history::{HistoryEntry, PerStrategy, StrategyKind};
pub use scenario::{RegimeStance, RegimeTag, Scenario};
