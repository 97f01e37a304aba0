use std::io;
use std::path::PathBuf;

use broadside::{cli, init_logging, FileStore, MatchSession, StrategyKind, TurnPolicy};
use clap::{Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(author, version, about = "Naval combat against the machine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// File the match is autosaved to.
    #[arg(long, global = true, default_value = "broadside.save")]
    save: PathBuf,
    #[arg(long, global = true, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
    /// The machine fires once per turn instead of continuing after hits.
    #[arg(long, global = true)]
    single_shot: bool,
    /// New matches get a machine that fires at random instead of hunting.
    #[arg(long, global = true)]
    random_ai: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new match, replacing any saved one.
    New {
        #[arg(long, default_value = "Captain")]
        name: String,
    },
    /// Resume the saved match, or start a new one if there is none.
    Continue {
        /// Nickname used if a new match has to be started.
        #[arg(long, default_value = "Captain")]
        name: String,
    },
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(s) => {
            println!("Using fixed seed: {} (game will be reproducible)", s);
            SmallRng::seed_from_u64(s)
        }
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    };
    let policy = if cli.single_shot {
        TurnPolicy::SingleShot
    } else {
        TurnPolicy::KeepShootingOnHit
    };
    let strategy = if cli.random_ai {
        StrategyKind::Random
    } else {
        StrategyKind::HuntTarget
    };
    let store = Box::new(FileStore::new(&cli.save));

    let mut session = match cli.command {
        Commands::New { name } => {
            let mut session = MatchSession::new(name)
                .with_turn_policy(policy)
                .with_strategy(strategy)
                .with_store(store);
            session.start_placement(&mut rng);
            session
        }
        Commands::Continue { name } => MatchSession::resume_or_start(store, name, &mut rng),
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    cli::play(&mut session, &mut rng, stdin.lock(), &mut stdout)
}
