//! Tests for the round state machine

use super::{CAPITAL, play_out, started_session};
use crate::catalog::ScenarioCatalog;
use crate::config::SessionBuilder;
use crate::error::{AllocationError, SessionError, TransitionError};
use crate::model::{Allocation, AssetClass, RegimeTag, StrategyKind};
use crate::session::{Phase, SimulationState};
use crate::strategies::BenchmarkPolicy;

fn balanced() -> Allocation {
    Allocation::from_percentages([20, 20, 20, 20, 10, 10])
}

#[test]
fn test_round_is_one_before_start() {
    let session = SessionBuilder::new().seed(1).build().unwrap();
    assert_eq!(session.phase(), Phase::NotStarted);
    assert_eq!(session.current_round(), 1);
    assert!(!session.is_finished());
}

#[test]
fn test_start_sets_every_strategy_to_capital() {
    let session = started_session(1);
    let state = session.state();
    for kind in StrategyKind::ALL {
        assert_eq!(state.value(kind), CAPITAL);
        assert!(state.history(kind).is_empty());
    }
    assert_eq!(
        session.phase(),
        Phase::InProgress {
            round: 1,
            submitted: false
        }
    );
}

#[test]
fn test_start_rejects_invalid_capital() {
    let mut session = SessionBuilder::new().seed(1).build().unwrap();
    for capital in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            session.start(capital),
            Err(SessionError::InvalidCapital(_))
        ));
    }
    assert_eq!(session.phase(), Phase::NotStarted);
}

#[test]
fn test_start_twice_is_rejected() {
    let mut session = started_session(1);
    assert_eq!(
        session.start(CAPITAL),
        Err(SessionError::Transition(TransitionError::AlreadyStarted))
    );
}

#[test]
fn test_operations_before_start_are_rejected() {
    let mut session = SessionBuilder::new().seed(1).build().unwrap();
    let not_started = Err(SessionError::Transition(TransitionError::NotStarted));

    assert_eq!(session.submit(balanced()).map(|_| ()), not_started);
    assert_eq!(session.advance().map(|_| ()), not_started);
    assert_eq!(session.current_scenario().map(|_| ()), not_started);
    assert_eq!(session.dashboard().map(|_| ()), not_started);
}

#[test]
fn test_incomplete_allocation_leaves_state_unchanged() {
    let mut session = started_session(3);
    let before = session.state().clone();

    let result = session.submit(Allocation::from_percentages([50, 40, 0, 0, 0, 0]));
    assert_eq!(
        result.map(|_| ()),
        Err(SessionError::Allocation(AllocationError::SumMismatch { total: 90 }))
    );

    let result = session.submit(Allocation::from_percentages([60, 50, 0, 0, 0, 0]));
    assert!(matches!(
        result,
        Err(SessionError::Allocation(AllocationError::SumMismatch { total: 110 }))
    ));

    assert_eq!(session.state(), &before);
}

#[test]
fn test_allocation_must_total_exactly_one_hundred() {
    let mut session = started_session(3);
    let before = session.state().clone();

    for (percentages, total) in [
        ([50, 49, 0, 0, 0, 0], 99),
        ([50, 51, 0, 0, 0, 0], 101),
        ([0, 0, 0, 0, 0, 0], 0),
        ([100, 100, 100, 100, 100, 100], 600),
    ] {
        assert_eq!(
            session
                .submit(Allocation::from_percentages(percentages))
                .map(|_| ()),
            Err(SessionError::Allocation(AllocationError::SumMismatch { total }))
        );
        assert_eq!(session.state(), &before);
    }
}

#[test]
fn test_any_single_asset_allocation_is_accepted() {
    for asset in AssetClass::ALL {
        let mut session = started_session(3);
        let outcome = session.submit(Allocation::all_in(asset)).unwrap();

        let expected = CAPITAL * (1.0 + outcome.scenario.returns[asset]);
        assert!((outcome.values.user - expected).abs() < 1e-6);
        assert_eq!(session.state().allocation_history(), &[Allocation::all_in(asset)]);
    }
}

#[test]
fn test_first_round_all_indian_equity() {
    let mut session = started_session(3);
    let outcome = session
        .submit(Allocation::all_in(AssetClass::IndianEquity))
        .unwrap();

    assert_eq!(outcome.round, 1);
    assert_eq!(outcome.scenario.regime, RegimeTag::RateHike);
    assert!((outcome.values.user - 930_000.0).abs() < 1e-6);
    assert!((outcome.change(StrategyKind::User) + 0.07).abs() < 1e-12);
}

#[test]
fn test_baselines_use_their_own_weights() {
    let mut session = started_session(3);
    let outcome = session.submit(balanced()).unwrap();

    // 30/20/25/15/5/5 against the rate-hike returns
    assert!((outcome.values.benchmark - 978_500.0).abs() < 1e-6);
    // Defensive table 10/10/35/30/0/15
    assert!((outcome.values.regime_ai - 1_010_500.0).abs() < 1e-6);
}

#[test]
fn test_equal_weight_benchmark() {
    let mut session = SessionBuilder::new()
        .benchmark(BenchmarkPolicy::EqualWeight)
        .seed(1)
        .build()
        .unwrap();
    session.start(CAPITAL).unwrap();

    let outcome = session.submit(balanced()).unwrap();
    let mean_return = (-0.07 - 0.03 + 0.02 + 0.04 - 0.12 + 0.01) / 6.0;
    assert!((outcome.values.benchmark - CAPITAL * (1.0 + mean_return)).abs() < 1e-6);
}

#[test]
fn test_double_submit_is_rejected() {
    let mut session = started_session(3);
    session.submit(balanced()).unwrap();
    let before = session.state().clone();

    assert_eq!(
        session.submit(balanced()).map(|_| ()),
        Err(SessionError::Transition(TransitionError::AlreadySubmitted {
            round: 1
        }))
    );
    assert_eq!(session.state(), &before);
}

#[test]
fn test_advance_requires_submission() {
    let mut session = started_session(3);
    assert_eq!(
        session.advance(),
        Err(SessionError::Transition(TransitionError::NotSubmitted {
            round: 1
        }))
    );

    session.submit(balanced()).unwrap();
    assert_eq!(
        session.advance(),
        Ok(Phase::InProgress {
            round: 2,
            submitted: false
        })
    );

    // A second advance without a new submit must not skip a round
    assert_eq!(
        session.advance(),
        Err(SessionError::Transition(TransitionError::NotSubmitted {
            round: 2
        }))
    );
    assert_eq!(session.current_round(), 2);
}

#[test]
fn test_reveal_available_only_between_submit_and_advance() {
    let mut session = started_session(3);
    assert!(session.revealed().is_err());

    session.submit(balanced()).unwrap();
    let returns = *session.revealed_returns().unwrap();
    assert_eq!(returns, session.revealed().unwrap().scenario.returns);
    assert_eq!(returns.best_asset(), AssetClass::Gold);

    session.advance().unwrap();
    assert!(session.revealed().is_err());
}

#[test]
fn test_fixed_rounds_do_not_depend_on_seed() {
    let fixed = ScenarioCatalog::standard().fixed;

    for seed in [1, 2, 99] {
        let mut session = started_session(seed);
        for expected in fixed.iter() {
            assert_eq!(session.current_scenario().unwrap(), expected);
            session.submit(balanced()).unwrap();
            session.advance().unwrap();
        }
    }
}

#[test]
fn test_random_round_scenario_is_stable() {
    let mut session = started_session(11);
    for _ in 0..5 {
        session.submit(balanced()).unwrap();
        session.advance().unwrap();
    }
    assert_eq!(session.current_round(), 6);

    let first = session.current_scenario().unwrap().clone();
    let second = session.current_scenario().unwrap().clone();
    assert_eq!(first, second);

    let outcome = session.submit(balanced()).unwrap();
    assert_eq!(outcome.scenario, first);
    assert_eq!(session.random_sequence().map(<[_]>::len), Some(5));
}

#[test]
fn test_same_seed_plays_the_same_game() {
    let mut a = started_session(5);
    let mut b = started_session(5);
    play_out(&mut a, balanced());
    play_out(&mut b, balanced());
    assert_eq!(a.state(), b.state());
}

#[test]
fn test_full_game_bookkeeping() {
    let mut session = started_session(8);
    play_out(&mut session, balanced());

    assert!(session.is_finished());
    assert_eq!(session.phase(), Phase::Finished);
    assert_eq!(session.current_round(), 11);

    let state = session.state();
    for kind in StrategyKind::ALL {
        let history = state.history(kind);
        assert_eq!(history.len(), 10);
        assert_eq!(history.last().map(|e| e.value), Some(state.value(kind)));
        let rounds: Vec<u32> = history.iter().map(|e| e.round).collect();
        assert_eq!(rounds, (1..=10).collect::<Vec<_>>());
    }
    assert_eq!(state.allocation_history().len(), 10);
    assert_eq!(state.regime_labels().len(), 10);
    assert_eq!(state.value_path(StrategyKind::User).len(), 11);
}

#[test]
fn test_finished_session_rejects_play() {
    let mut session = started_session(8);
    play_out(&mut session, balanced());
    let before = session.state().clone();

    let finished = Err(SessionError::Transition(TransitionError::Finished));
    assert_eq!(session.submit(balanced()).map(|_| ()), finished);
    assert_eq!(session.advance().map(|_| ()), finished);
    assert_eq!(session.current_scenario().map(|_| ()), finished);
    assert_eq!(session.state(), &before);
}

#[test]
fn test_dashboard_requires_finished_session() {
    let mut session = started_session(8);
    session.submit(balanced()).unwrap();
    assert_eq!(
        session.dashboard().map(|_| ()),
        Err(SessionError::Transition(TransitionError::NotFinished {
            round: 1
        }))
    );
    assert!(session.export_dataset().is_err());
}

#[test]
fn test_reset_restores_initial_state() {
    let mut session = started_session(8);
    session
        .submit_with_prediction(balanced(), Some(AssetClass::Gold))
        .unwrap();
    session.advance().unwrap();
    play_out(&mut session, balanced());

    session.reset();
    assert_eq!(session.state(), &SimulationState::new(10));
    assert_eq!(session.phase(), Phase::NotStarted);
    assert_eq!(session.current_round(), 1);
    assert!(session.random_sequence().is_none());

    // A reset session can be played again from the top
    session.start(500_000.0).unwrap();
    let outcome = session
        .submit(Allocation::all_in(AssetClass::IndianEquity))
        .unwrap();
    assert!((outcome.values.user - 465_000.0).abs() < 1e-6);
}

#[test]
fn test_reset_mid_round() {
    let mut session = started_session(8);
    session.submit(balanced()).unwrap();
    session.reset();
    assert_eq!(session.state(), &SimulationState::new(10));
}

#[test]
fn test_predictions_are_scored_against_best_asset() {
    let mut session = started_session(2);

    // Round 1 (rate hike): gold is best
    let outcome = session
        .submit_with_prediction(balanced(), Some(AssetClass::Gold))
        .unwrap();
    assert!(outcome.prediction.is_some_and(|p| p.is_correct()));
    session.advance().unwrap();

    // Round 2 (AI boom): crypto is best
    let outcome = session
        .submit_with_prediction(balanced(), Some(AssetClass::Bonds))
        .unwrap();
    let prediction = outcome.prediction.unwrap();
    assert!(!prediction.is_correct());
    assert_eq!(prediction.best, AssetClass::Crypto);
    session.advance().unwrap();

    // Round 3 submitted without a guess
    session.submit(balanced()).unwrap();
    assert_eq!(session.state().predictions().len(), 2);
}

#[test]
fn test_short_session_without_random_rounds() {
    let mut session = SessionBuilder::new()
        .total_rounds(3)
        .fixed_rounds(3)
        .seed(1)
        .build()
        .unwrap();
    session.start(CAPITAL).unwrap();
    play_out(&mut session, balanced());

    let expected = [RegimeTag::RateHike, RegimeTag::GrowthRally, RegimeTag::Crisis];
    assert_eq!(session.state().regime_labels(), &expected);
    assert!(session.random_sequence().is_none());
}
