//! Plain-text rendering of the game screens
//!
//! Every function writes to a caller-supplied `Write` so the screens can be
//! rendered to a terminal or captured in tests.

use std::io::{self, Write};

use warroom_core::analytics::DashboardMetrics;
use warroom_core::model::{AssetClass, PerStrategy, Scenario, StrategyKind};
use warroom_core::session::RoundOutcome;

use crate::data::ExportPaths;
use crate::util::format::{
    format_compact_currency, format_currency, format_percentage, format_signed_percentage,
};

const RULE: &str = "------------------------------------------------------------";

/// Short column tags in asset order
const ASSET_TAGS: [&str; 6] = ["IND", "US", "BND", "GLD", "CRY", "CSH"];

pub fn render_banner(out: &mut impl Write, total_rounds: u32, capital: f64) -> io::Result<()> {
    writeln!(out, "PORTFOLIO WAR ROOM")?;
    writeln!(out, "{RULE}")?;
    writeln!(
        out,
        "Allocate {} across six asset classes for {total_rounds} rounds.",
        format_currency(capital)
    )?;
    writeln!(
        out,
        "A benchmark portfolio and a regime-aware model play alongside you."
    )?;
    writeln!(out, "Type 'help' at any prompt for the input format.")?;
    writeln!(out)
}

pub fn render_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Enter six whole percentages that add up to 100, in order:")?;
    let names: Vec<&str> = AssetClass::ALL.iter().map(|a| a.label()).collect();
    writeln!(out, "  {}", names.join(", "))?;
    writeln!(
        out,
        "Optionally name the asset you expect to do best, e.g. '30 20 20 15 5 10 gold'."
    )?;
    writeln!(out, "Commands: help, reset, quit")
}

pub fn render_scenario(
    out: &mut impl Write,
    round: u32,
    total_rounds: u32,
    scenario: &Scenario,
    values: &PerStrategy<f64>,
) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "ROUND {round} of {total_rounds}")?;
    writeln!(out, "Market news: {}", scenario.headline)?;
    writeln!(out, "Regime: {}", scenario.regime)?;
    writeln!(out)?;
    render_values(out, values)?;
    writeln!(out)
}

fn render_values(out: &mut impl Write, values: &PerStrategy<f64>) -> io::Result<()> {
    for (kind, value) in values.iter() {
        writeln!(out, "  {:<12} {:>14}", kind.label(), format_currency(*value))?;
    }
    Ok(())
}

/// The reveal screen shown after a submit
pub fn render_outcome(out: &mut impl Write, outcome: &RoundOutcome) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Round {} results: {}", outcome.round, outcome.scenario.regime)?;
    for (asset, ret) in outcome.scenario.returns.iter() {
        writeln!(
            out,
            "  {:<14} {:>8}   you held {:>3}%",
            asset.label(),
            format_signed_percentage(ret),
            outcome.allocation[asset]
        )?;
    }
    writeln!(out)?;
    for kind in StrategyKind::ALL {
        writeln!(
            out,
            "  {:<12} {:>14}  ({})",
            kind.label(),
            format_currency(*outcome.values.get(kind)),
            format_signed_percentage(outcome.change(kind))
        )?;
    }
    if let Some(prediction) = outcome.prediction {
        if prediction.is_correct() {
            writeln!(out, "  Your call on {} was right.", prediction.guess)?;
        } else {
            writeln!(
                out,
                "  You picked {}; {} did best.",
                prediction.guess, prediction.best
            )?;
        }
    }
    if let Some(note) = &outcome.scenario.concept_note {
        writeln!(out, "  Lesson: {note}")?;
    }
    Ok(())
}

pub fn render_dashboard(out: &mut impl Write, dashboard: &DashboardMetrics) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "FINAL DASHBOARD")?;
    writeln!(out, "{RULE}")?;

    writeln!(
        out,
        "  {:<12} {:>12} {:>9} {:>8} {:>8} {:>9}",
        "Strategy", "Final", "Return", "Sharpe", "Vol", "Drawdown"
    )?;
    for (kind, m) in dashboard.strategies.iter() {
        writeln!(
            out,
            "  {:<12} {:>12} {:>8.2}% {:>8.2} {:>7.2}% {:>8.2}%",
            kind.label(),
            format_compact_currency(m.final_value),
            m.total_return_pct,
            m.sharpe,
            m.volatility,
            m.max_drawdown
        )?;
    }
    writeln!(out)?;
    writeln!(out, "  Leader: {}", dashboard.leader())?;
    for kind in [StrategyKind::Benchmark, StrategyKind::RegimeAi] {
        let edge = dashboard.user_edge_over(kind);
        let sign = if edge.round() > 0.0 { "+" } else { "" };
        writeln!(
            out,
            "  Your edge over {}: {sign}{}",
            kind.label(),
            format_currency(edge)
        )?;
    }
    writeln!(
        out,
        "  Diversification score: {:.2}",
        dashboard.diversification_score
    )?;
    writeln!(
        out,
        "  Adaptive behavior: {} (mean turnover {:.1})",
        dashboard.adaptive_behavior, dashboard.mean_turnover
    )?;
    writeln!(
        out,
        "  Investor archetype: {} - {}",
        dashboard.archetype,
        dashboard.archetype.description()
    )?;
    if let Some(accuracy) = dashboard.prediction_accuracy {
        writeln!(out, "  Prediction accuracy: {}", format_percentage(accuracy))?;
    }

    writeln!(out)?;
    writeln!(out, "  Regime performance")?;
    for row in &dashboard.regime_table {
        writeln!(
            out,
            "  {:>3}  {:<14} {:>10} {:>10} {:>10}",
            row.round,
            row.regime.label(),
            format_compact_currency(row.values.user),
            format_compact_currency(row.values.benchmark),
            format_compact_currency(row.values.regime_ai)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "  Allocation heatmap (%)")?;
    write!(out, "  {:>3} ", "")?;
    for tag in ASSET_TAGS {
        write!(out, " {tag:>4}")?;
    }
    writeln!(out)?;
    for row in &dashboard.allocation_table {
        write!(out, "  {:>3} ", row.round)?;
        for (_, pct) in row.allocation.iter() {
            write!(out, " {pct:>4}")?;
        }
        writeln!(out)?;
    }
    writeln!(out)
}

pub fn render_export(out: &mut impl Write, paths: &ExportPaths) -> io::Result<()> {
    writeln!(out, "Dataset saved to {}", paths.csv.display())?;
    writeln!(out, "Summary saved to {}", paths.summary.display())
}
