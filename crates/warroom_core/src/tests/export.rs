//! Tests for the flattened per-round dataset

use super::{play_out, started_session};
use crate::model::{Allocation, AssetClass, StrategyKind};

#[test]
fn test_dataset_has_one_row_per_round() {
    let mut session = started_session(12);
    play_out(&mut session, Allocation::all_in(AssetClass::Gold));

    let dataset = session.export_dataset().unwrap();
    let dashboard = session.dashboard().unwrap();
    let state = session.state();

    assert_eq!(dataset.len(), 10);
    for (i, row) in dataset.rows.iter().enumerate() {
        assert_eq!(row.round, i as u32 + 1);
        assert_eq!(row.value, state.history(StrategyKind::User)[i].value);
        assert_eq!(row.allocation, Allocation::all_in(AssetClass::Gold));
        assert_eq!(row.regime, state.regime_labels()[i]);
        assert_eq!(row.sharpe, dashboard.user().sharpe);
        assert_eq!(row.volatility, dashboard.user().volatility);
    }
}

#[test]
fn test_csv_export_of_finished_session() {
    let mut session = started_session(12);
    play_out(&mut session, Allocation::all_in(AssetClass::IndianEquity));

    let csv = session.export_dataset().unwrap().to_csv();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 11);
    assert!(lines[0].starts_with("Round,Value,Indian Equity"));
    for line in &lines[1..] {
        assert_eq!(line.split(',').count(), 11);
    }

    let first: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(first[0], "1");
    assert!((first[1].parse::<f64>().unwrap() - 930_000.0).abs() < 1e-6);
    assert_eq!(&first[2..8], &["100", "0", "0", "0", "0", "0"]);
    assert_eq!(first[8], "Rate Hike");
}

#[test]
fn test_export_rejected_after_reset() {
    let mut session = started_session(12);
    play_out(&mut session, Allocation::all_in(AssetClass::Cash));
    assert!(session.export_dataset().is_ok());

    session.reset();
    assert!(session.export_dataset().is_err());
}
