//! Headless match: a scripted hunter plays the human side against the
//! machine and a JSON summary is printed.

use broadside::{
    HuntTargetStrategy, MatchSession, Phase, StrategyKind, TargetingStrategy, TurnPolicy, Winner,
};
use clap::Parser;
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

#[derive(Parser)]
#[command(about = "Play one unattended match and report the result as JSON")]
struct Args {
    seed: u64,
    #[arg(long)]
    single_shot: bool,
    /// The machine fires at random instead of hunting.
    #[arg(long)]
    random_ai: bool,
}

fn main() -> anyhow::Result<()> {
    broadside::init_logging();
    let args = Args::parse();
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let policy = if args.single_shot {
        TurnPolicy::SingleShot
    } else {
        TurnPolicy::KeepShootingOnHit
    };

    let strategy = if args.random_ai {
        StrategyKind::Random
    } else {
        StrategyKind::HuntTarget
    };

    let mut session = MatchSession::start_new_game("sim", &mut rng)
        .with_turn_policy(policy)
        .with_strategy(strategy);
    session.randomize_player_fleet(&mut rng)?;
    session.begin_battle()?;

    let mut hunter = HuntTargetStrategy::new();
    let mut player_shots = 0usize;
    let mut machine_shots = 0usize;
    while session.phase() == Phase::Battle {
        let Some((r, c)) = hunter.next_target(&mut rng, session.opponent_board()) else {
            break;
        };
        let report = session.player_shot(&mut rng, r, c)?;
        player_shots += 1;
        machine_shots += report.machine_shots.len();
    }

    let winner = match session.phase() {
        Phase::Finished(Winner::Player) => Some("player"),
        Phase::Finished(Winner::Machine) => Some("machine"),
        _ => None,
    };
    let result = json!({
        "seed": args.seed,
        "winner": winner,
        "player": {"shots": player_shots, "ships_sunk": session.sunk_ships()},
        "machine": {"shots": machine_shots, "ships_sunk": session.ships_lost()},
    });
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
