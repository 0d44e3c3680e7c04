use std::io;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use warroom::data::storage::{load_catalog, load_config_from};
use warroom::{App, DataDirectory, init_logging};
use warroom_core::config::SessionBuilder;

#[derive(Parser, Debug)]
#[command(name = "warroom")]
#[command(about = "A terminal portfolio-allocation game across market regimes")]
struct Args {
    /// Path to the data directory (default: ~/.warroom/)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Starting capital for every strategy
    #[arg(long, default_value_t = 1_000_000.0)]
    capital: f64,

    /// Seed for the randomized rounds (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Session config YAML (default: <data-dir>/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scenario catalog YAML replacing the built-in scenarios
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Write the finished game's CSV here instead of <data-dir>/exports/
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let storage = DataDirectory::new(args.data_dir.unwrap_or_else(DataDirectory::default_path));

    init_logging(storage.root(), &args.log_level)?;

    let mut config = match &args.config {
        Some(path) => load_config_from(path),
        None => storage.load_config(),
    }
    .wrap_err("Failed to load session config")?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    let mut builder = SessionBuilder::from_config(config);
    if let Some(path) = &args.catalog {
        let catalog = load_catalog(path).wrap_err("Failed to load scenario catalog")?;
        builder = builder.catalog(catalog);
    }
    let session = builder.build().wrap_err("Invalid session config")?;

    tracing::info!(
        data_dir = %storage.root().display(),
        capital = args.capital,
        seed = ?session.config().seed,
        "Starting war room"
    );

    let mut app = App::new(session, storage, args.capital).with_export_path(args.export);
    app.run(io::stdin().lock(), io::stdout().lock())?;

    tracing::info!("Application shutting down");
    Ok(())
}
