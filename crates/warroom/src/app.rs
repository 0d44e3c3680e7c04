//! Line-oriented game loop
//!
//! The loop reads one line per step and dispatches on the session phase.
//! The start screen asks for capital. An open round expects an allocation
//! and a submitted round waits for Enter before advancing. A finished game
//! shows the dashboard, exports the dataset and offers a reset.

use std::fmt;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use rand::Rng;
use rand::rngs::SmallRng;
use warroom_core::error::SessionError;
use warroom_core::model::{ASSET_COUNT, Allocation, AssetClass};
use warroom_core::session::{Phase, SimulationSession};

use crate::data::DataDirectory;
use crate::util::format::format_currency;
use crate::view;

/// One parsed line of player input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Submit {
        allocation: Allocation,
        prediction: Option<AssetClass>,
    },
    Help,
    Reset,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    WrongCount(usize),
    InvalidPercent(String),
    UnknownAsset(String),
    InvalidCapital(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty input"),
            ParseError::WrongCount(n) => {
                write!(f, "expected {ASSET_COUNT} percentages, got {n}")
            }
            ParseError::InvalidPercent(s) => write!(f, "'{s}' is not a percentage from 0 to 100"),
            ParseError::UnknownAsset(s) => write!(f, "'{s}' is not an asset class"),
            ParseError::InvalidCapital(s) => write!(f, "'{s}' is not a positive amount"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a command word, or six percentages with an optional best-asset guess
///
/// Percentages may be separated by spaces or commas.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" => return Err(ParseError::Empty),
        "q" | "quit" | "exit" => return Ok(Command::Quit),
        "h" | "help" | "?" => return Ok(Command::Help),
        "r" | "reset" => return Ok(Command::Reset),
        _ => {}
    }

    let tokens: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    let numeric = tokens
        .iter()
        .take_while(|t| t.chars().all(|c| c.is_ascii_digit()))
        .count();
    if numeric != ASSET_COUNT {
        if numeric < tokens.len() && numeric < ASSET_COUNT {
            return Err(ParseError::InvalidPercent(tokens[numeric].to_string()));
        }
        return Err(ParseError::WrongCount(numeric));
    }

    let mut percentages = [0u8; ASSET_COUNT];
    for (slot, token) in percentages.iter_mut().zip(&tokens) {
        *slot = token
            .parse::<u8>()
            .ok()
            .filter(|p| *p <= 100)
            .ok_or_else(|| ParseError::InvalidPercent(token.to_string()))?;
    }

    let prediction = match &tokens[ASSET_COUNT..] {
        [] => None,
        rest => {
            let name = rest.join(" ");
            Some(AssetClass::parse(&name).ok_or(ParseError::UnknownAsset(name))?)
        }
    };

    Ok(Command::Submit {
        allocation: Allocation::from_percentages(percentages),
        prediction,
    })
}

/// Parse a starting capital such as `1000000`, `5,00,000` or `₹250000`
///
/// An empty line yields `None` so the caller can keep its default.
pub fn parse_capital(line: &str) -> Result<Option<f64>, ParseError> {
    let line = line.trim();
    let digits: String = line
        .trim_start_matches('₹')
        .chars()
        .filter(|c| !matches!(c, ',' | '_'))
        .collect();
    if digits.is_empty() {
        return Ok(None);
    }
    digits
        .parse::<f64>()
        .ok()
        .filter(|c| c.is_finite() && *c > 0.0)
        .map(Some)
        .ok_or_else(|| ParseError::InvalidCapital(line.to_string()))
}

/// The interactive front end: a session plus where its exports go
pub struct App<R = SmallRng> {
    session: SimulationSession<R>,
    storage: DataDirectory,
    /// Offered at the start screen; the last capital played becomes the default
    capital: f64,
    export_path: Option<PathBuf>,
}

impl<R: Rng> App<R> {
    pub fn new(session: SimulationSession<R>, storage: DataDirectory, capital: f64) -> Self {
        Self {
            session,
            storage,
            capital,
            export_path: None,
        }
    }

    /// Write the dataset to `path` instead of a timestamped file
    #[must_use]
    pub fn with_export_path(mut self, path: Option<PathBuf>) -> Self {
        self.export_path = path;
        self
    }

    pub fn session(&self) -> &SimulationSession<R> {
        &self.session
    }

    /// Play until the input is exhausted or the player quits
    pub fn run<I: BufRead, O: Write>(
        &mut self,
        mut input: I,
        mut out: O,
    ) -> color_eyre::Result<()> {
        let total = self.session.config().total_rounds;
        view::render_banner(&mut out, total, self.capital)?;

        let mut show_screen = true;
        loop {
            let phase = self.session.phase();
            match phase {
                Phase::NotStarted => {
                    write!(
                        out,
                        "Starting capital [{}]> ",
                        format_currency(self.capital)
                    )?;
                }
                Phase::InProgress {
                    round,
                    submitted: false,
                } => {
                    if show_screen {
                        self.show_round(&mut out, round, total)?;
                    }
                    write!(out, "Allocation> ")?;
                }
                Phase::InProgress {
                    submitted: true, ..
                } => {
                    write!(out, "Press Enter for the next round ")?;
                }
                Phase::Finished => {
                    if show_screen {
                        self.finish(&mut out)?;
                    }
                    write!(out, "Type 'reset' to play again or 'quit' to leave> ")?;
                }
            }
            out.flush()?;
            show_screen = false;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                break;
            }
            let command = parse_command(&line);

            match command {
                Ok(Command::Quit) => break,
                Ok(Command::Reset) => {
                    self.session.reset();
                    writeln!(out, "Game reset.")?;
                    continue;
                }
                Ok(Command::Help) => {
                    view::render_help(&mut out)?;
                    continue;
                }
                _ => {}
            }

            match phase {
                Phase::NotStarted => self.begin(&mut out, &line)?,
                Phase::InProgress {
                    submitted: false, ..
                } => match command {
                    Ok(Command::Submit {
                        allocation,
                        prediction,
                    }) => self.submit(&mut out, allocation, prediction)?,
                    Err(ParseError::Empty) => {}
                    Err(e) => writeln!(out, "{e}. Type 'help' for the input format.")?,
                    Ok(_) => {}
                },
                Phase::InProgress {
                    submitted: true, ..
                } => {
                    self.session.advance()?;
                }
                Phase::Finished => {}
            }
            show_screen = self.session.phase() != phase;
        }

        tracing::info!(round = self.session.current_round(), "Leaving the war room");
        Ok(())
    }

    fn begin(&mut self, out: &mut impl Write, line: &str) -> color_eyre::Result<()> {
        let capital = match parse_capital(line) {
            Ok(capital) => capital.unwrap_or(self.capital),
            Err(e) => {
                writeln!(out, "{e}. Enter an amount or press Enter for the default.")?;
                return Ok(());
            }
        };
        match self.session.start(capital) {
            Ok(()) => self.capital = capital,
            Err(e) => writeln!(out, "{e}. Try again.")?,
        }
        Ok(())
    }

    /// Render the round screen, or report a scenario that cannot be resolved
    fn show_round(
        &mut self,
        out: &mut impl Write,
        round: u32,
        total: u32,
    ) -> color_eyre::Result<()> {
        match self.session.current_scenario() {
            Ok(scenario) => {
                let scenario = scenario.clone();
                let values = *self.session.state().values();
                view::render_scenario(out, round, total, &scenario, &values)?;
            }
            Err(SessionError::Scenario(e)) => {
                tracing::error!(round, error = %e, "No scenario for round");
                writeln!(out, "Round {round} cannot be played: {e}. Type 'reset' or 'quit'.")?;
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn submit(
        &mut self,
        out: &mut impl Write,
        allocation: Allocation,
        prediction: Option<AssetClass>,
    ) -> color_eyre::Result<()> {
        match self.session.submit_with_prediction(allocation, prediction) {
            Ok(outcome) => view::render_outcome(out, &outcome)?,
            Err(SessionError::Allocation(e)) => writeln!(out, "{e}. Try again.")?,
            Err(SessionError::Scenario(e)) => writeln!(out, "Round cannot be played: {e}.")?,
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    /// Show the dashboard and export the dataset
    ///
    /// A failed export is reported to the player without ending the game.
    fn finish(&mut self, out: &mut impl Write) -> color_eyre::Result<()> {
        let dashboard = self.session.dashboard()?;
        view::render_dashboard(out, &dashboard)?;

        let dataset = self.session.export_dataset()?;
        match self
            .storage
            .write_export(&dataset, &dashboard, self.export_path.as_deref())
        {
            Ok(paths) => view::render_export(out, &paths)?,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                writeln!(out, "Could not save the dataset: {e}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;
    use warroom_core::config::SessionBuilder;
    use warroom_core::model::StrategyKind;

    fn app_in(dir: &std::path::Path) -> App {
        let session = SessionBuilder::new().seed(17).build().unwrap();
        App::new(session, DataDirectory::new(dir.to_path_buf()), 1_000_000.0)
    }

    fn play(app: &mut App, script: &str) -> String {
        let mut out = Vec::new();
        app.run(Cursor::new(script.to_string()), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_allocation() {
        assert_eq!(
            parse_command("30 20 20 15 5 10"),
            Ok(Command::Submit {
                allocation: Allocation::from_percentages([30, 20, 20, 15, 5, 10]),
                prediction: None,
            })
        );
        assert_eq!(
            parse_command("30,20,20,15,5,10 us equity"),
            Ok(Command::Submit {
                allocation: Allocation::from_percentages([30, 20, 20, 15, 5, 10]),
                prediction: Some(AssetClass::USEquity),
            })
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("  Quit "), Ok(Command::Quit));
        assert_eq!(parse_command("reset"), Ok(Command::Reset));
        assert_eq!(parse_command("?"), Ok(Command::Help));
        assert_eq!(parse_command("\n"), Err(ParseError::Empty));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_command("50 50"), Err(ParseError::WrongCount(2)));
        assert_eq!(
            parse_command("50 50 0 0 0 0 0"),
            Err(ParseError::WrongCount(7))
        );
        assert_eq!(
            parse_command("50 -10 0 0 0 60"),
            Err(ParseError::InvalidPercent("-10".into()))
        );
        assert_eq!(
            parse_command("150 0 0 0 0 0"),
            Err(ParseError::InvalidPercent("150".into()))
        );
        assert_eq!(
            parse_command("50 50 0 0 0 0 silver"),
            Err(ParseError::UnknownAsset("silver".into()))
        );
    }

    #[test]
    fn test_parse_capital() {
        assert_eq!(parse_capital("\n"), Ok(None));
        assert_eq!(parse_capital("500000"), Ok(Some(500_000.0)));
        assert_eq!(parse_capital(" ₹5,00,000 "), Ok(Some(500_000.0)));
        assert_eq!(parse_capital("2_500.50"), Ok(Some(2_500.5)));
        assert_eq!(
            parse_capital("-100"),
            Err(ParseError::InvalidCapital("-100".into()))
        );
        assert_eq!(parse_capital("0"), Err(ParseError::InvalidCapital("0".into())));
        assert_eq!(
            parse_capital("lots"),
            Err(ParseError::InvalidCapital("lots".into()))
        );
    }

    #[test]
    fn test_start_screen_asks_for_capital() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path());

        let text = play(&mut app, "plenty\n250000\nquit\n");

        assert!(text.contains("Starting capital [₹1,000,000]> "));
        assert!(text.contains("'plenty' is not a positive amount"));
        assert!(text.contains("ROUND 1 of 10"));
        assert_eq!(app.session().state().value(StrategyKind::User), 250_000.0);
    }

    #[test]
    fn test_reset_returns_to_start_screen() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path());

        let text = play(&mut app, "\n0 0 0 0 0 100\n\nreset\n400000\nquit\n");

        assert_eq!(text.matches("Starting capital [").count(), 2);
        assert_eq!(app.session().current_round(), 1);
        for kind in StrategyKind::ALL {
            assert_eq!(app.session().state().value(kind), 400_000.0);
        }

        // The capital just played is offered as the next default
        app.session.reset();
        let text = play(&mut app, "quit\n");
        assert!(text.contains("Starting capital [₹400,000]> "));
    }

    #[test]
    fn test_full_game_exports_dataset() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path());

        let script = "\n".to_string() + &"20 20 20 20 10 10\n\n".repeat(10) + "quit\n";
        let text = play(&mut app, &script);

        assert!(text.contains("ROUND 1 of 10"));
        assert!(text.contains("ROUND 10 of 10"));
        assert!(text.contains("FINAL DASHBOARD"));
        assert!(text.contains("Dataset saved to"));
        assert!(app.session().is_finished());

        let exports: Vec<_> = fs::read_dir(dir.path().join("exports"))
            .unwrap()
            .flatten()
            .collect();
        assert_eq!(exports.len(), 2);
    }

    #[test]
    fn test_bad_allocation_is_retried() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path());

        let text = play(&mut app, "\n50 40 0 0 0 0\nten 0 0 0 0 0\n100 0 0 0 0 0\nquit\n");

        assert!(text.contains("allocation must total 100%, got 90%"));
        assert!(text.contains("'ten' is not a percentage"));
        assert_eq!(app.session().state().allocation_history().len(), 1);
    }

    #[test]
    fn test_reset_restarts_from_round_one() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path());

        let text = play(&mut app, "\n0 0 0 0 0 100\n\n0 0 0 0 0 100\nreset\n\nquit\n");

        assert!(text.contains("Game reset."));
        assert_eq!(text.matches("ROUND 1 of 10").count(), 2);
        assert_eq!(app.session().current_round(), 1);
        assert!(app.session().state().allocation_history().is_empty());
    }

    #[test]
    fn test_end_of_input_stops_cleanly() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path());

        play(&mut app, "\n0 0 0 100 0 0 gold\n");
        assert_eq!(app.session().state().predictions().len(), 1);
        assert!(!dir.path().join("exports").exists());
    }

    #[test]
    fn test_explicit_export_path() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("results.csv");
        let mut app = app_in(&dir.path().join("data")).with_export_path(Some(dest.clone()));

        let script = "\n".to_string() + &"0 0 100 0 0 0\n\n".repeat(10);
        play(&mut app, &script);

        assert!(dest.exists());
        assert!(dir.path().join("results.json").exists());
    }
}
