use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use pairing_app::config::EventConfig;
use pairing_app::logging::init_logging;
use pairing_app::session::Session;
use pairing_app::store::FlatFileStore;

/// Round pairing and bye rotation for card-room events.
#[derive(Debug, Parser)]
#[command(
    name = "pairing",
    author,
    version,
    about = "Pairs players round by round, rotating byes fairly"
)]
struct Cli {
    /// Path to an optional YAML configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding players.txt, rounds.txt and byes.txt.
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Chips handed out on registration and buy-back.
    #[arg(short = 'c', long = "chip-count", value_name = "CHIPS")]
    chip_count: Option<u32>,

    /// Money value of one chip.
    #[arg(short = 'v', long = "chip-value", value_name = "VALUE")]
    chip_value: Option<u32>,

    /// Flat room fee taken from the pot before payouts.
    #[arg(short = 'f', long, value_name = "AMOUNT")]
    fees: Option<u32>,

    /// Seed for bye and pairing draws.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration and loading the event files.
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match cli.config.as_ref() {
        Some(path) => EventConfig::from_path(path)?,
        None => EventConfig::default(),
    };

    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    if let Some(chips) = cli.chip_count {
        config.economy.buy_in_chip_count = chips;
    }

    if let Some(value) = cli.chip_value {
        config.economy.chip_value = value;
    }

    if let Some(fees) = cli.fees {
        config.economy.fees = fees;
    }

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    config.validate()?;

    let paths = config.resolved_paths();
    let _logging_guard = init_logging(&config.logging, &paths)?;

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let store = FlatFileStore::new(paths);
    let mut session = Session::open(store, config.economy, rng).with_context(|| {
        format!(
            "loading event files from {}",
            config.data_dir.display()
        )
    })?;

    if cli.validate_only {
        let state = session.state();
        println!(
            "Loaded {} player{}, {} round{} from {}",
            state.roster().len(),
            if state.roster().len() == 1 { "" } else { "s" },
            state.rounds().len(),
            if state.rounds().len() == 1 { "" } else { "s" },
            config.data_dir.display()
        );
        return Ok(());
    }

    let stdin = io::stdin();
    session.run(stdin.lock(), io::stdout().lock())?;
    Ok(())
}
