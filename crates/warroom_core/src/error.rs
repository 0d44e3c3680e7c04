use std::fmt;

use crate::sequencer::SamplingPolicy;

/// Errors raised when a submitted allocation is not a full partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// Percentages do not add up to exactly 100
    SumMismatch { total: u32 },
}

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationError::SumMismatch { total } => {
                write!(f, "allocation must total 100%, got {total}%")
            }
        }
    }
}

impl std::error::Error for AllocationError {}

/// Errors raised when a session operation is called in the wrong phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// `start` called on a session that is already running or finished
    AlreadyStarted,
    /// Operation requires a started session
    NotStarted,
    /// `submit` called twice in the same round
    AlreadySubmitted { round: u32 },
    /// `advance` (or a reveal) called before the round was submitted
    NotSubmitted { round: u32 },
    /// Operation requires an unfinished session
    Finished,
    /// Analytics requested before the last round was played
    NotFinished { round: u32 },
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::AlreadyStarted => write!(f, "session already started"),
            TransitionError::NotStarted => write!(f, "session not started"),
            TransitionError::AlreadySubmitted { round } => {
                write!(f, "round {round} already submitted")
            }
            TransitionError::NotSubmitted { round } => {
                write!(f, "round {round} has not been submitted")
            }
            TransitionError::Finished => write!(f, "session is finished"),
            TransitionError::NotFinished { round } => {
                write!(f, "session still in progress (round {round})")
            }
        }
    }
}

impl std::error::Error for TransitionError {}

/// Errors raised while resolving the scenario for a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    /// Round is zero or past the configured total
    RoundOutOfRange { round: u32, total_rounds: u32 },
    /// Catalog lacks a fixed scenario for this round
    MissingFixedScenario { round: u32 },
    /// Random rounds are required but the pool has no scenarios
    EmptyPool,
    /// Sampling without replacement needs more scenarios than the pool holds
    PoolExhausted { required: usize, available: usize },
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::RoundOutOfRange {
                round,
                total_rounds,
            } => write!(f, "round {round} outside 1..={total_rounds}"),
            ScenarioError::MissingFixedScenario { round } => {
                write!(f, "no fixed scenario for round {round}")
            }
            ScenarioError::EmptyPool => write!(f, "scenario pool is empty"),
            ScenarioError::PoolExhausted {
                required,
                available,
            } => write!(
                f,
                "need {required} distinct scenarios but pool holds {available}"
            ),
        }
    }
}

impl std::error::Error for ScenarioError {}

/// Errors raised by session configuration validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NoRounds,
    FixedRoundsExceedTotal { fixed: u32, total: u32 },
    NotEnoughFixedScenarios { required: u32, available: usize },
    InvalidWeights { strategy: &'static str, sum: f64 },
    /// The pool cannot supply the randomized rounds under the sampling policy
    PoolTooSmall {
        required: usize,
        available: usize,
        policy: SamplingPolicy,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoRounds => write!(f, "total_rounds must be at least 1"),
            ConfigError::FixedRoundsExceedTotal { fixed, total } => write!(
                f,
                "fixed_round_count ({fixed}) exceeds total_rounds ({total})"
            ),
            ConfigError::NotEnoughFixedScenarios {
                required,
                available,
            } => write!(
                f,
                "catalog has {available} fixed scenarios, {required} required"
            ),
            ConfigError::InvalidWeights { strategy, sum } => {
                write!(f, "{strategy} weights must sum to 1 (got {sum:.4})")
            }
            ConfigError::PoolTooSmall {
                required,
                available,
                policy,
            } => write!(
                f,
                "pool of {available} scenarios cannot supply {required} randomized \
                 rounds ({policy:?})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Umbrella error for every session operation
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    Allocation(AllocationError),
    Transition(TransitionError),
    Scenario(ScenarioError),
    /// Initial capital must be a finite, positive amount
    InvalidCapital(f64),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Allocation(e) => write!(f, "{e}"),
            SessionError::Transition(e) => write!(f, "{e}"),
            SessionError::Scenario(e) => write!(f, "{e}"),
            SessionError::InvalidCapital(v) => {
                write!(f, "initial capital must be positive, got {v}")
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Allocation(e) => Some(e),
            SessionError::Transition(e) => Some(e),
            SessionError::Scenario(e) => Some(e),
            SessionError::InvalidCapital(_) => None,
        }
    }
}

impl From<AllocationError> for SessionError {
    fn from(err: AllocationError) -> Self {
        SessionError::Allocation(err)
    }
}

impl From<TransitionError> for SessionError {
    fn from(err: TransitionError) -> Self {
        SessionError::Transition(err)
    }
}

impl From<ScenarioError> for SessionError {
    fn from(err: ScenarioError) -> Self {
        SessionError::Scenario(err)
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
