//! Play robot games to completion from the command line.
//!
//! ```text
//! autoplay [SEED] [GAMES]
//! ```
//!
//! The local seat follows the row-major hint; the robot answers with its
//! own random-order search. Set `RUST_LOG=debug` for every move.

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tile_paths::{Buddy, ColorPair, GameConfig, NullChannel, TurnCoordinator, ROBOT_SEAT};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_arg(args: &[String], index: usize, default: u64) -> Result<u64, String> {
    match args.get(index) {
        Some(raw) => raw
            .parse()
            .map_err(|_| format!("expected a number, got {raw:?}")),
        None => Ok(default),
    }
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (seed, games) = match (parse_arg(&args, 0, 0), parse_arg(&args, 1, 1)) {
        (Ok(seed), Ok(games)) => (seed, games),
        (Err(err), _) | (_, Err(err)) => {
            error!(%err, "usage: autoplay [SEED] [GAMES]");
            return ExitCode::FAILURE;
        }
    };

    let mut total = 0u64;
    for game_index in 0..games {
        let game_seed = seed.wrapping_add(game_index);
        let local = Buddy::new("autoplay", ColorPair::new("#000000", "#FFFFFF"));
        let game = TurnCoordinator::initiator(
            GameConfig::classic(),
            local,
            game_seed,
            NullChannel,
        )
        .and_then(TurnCoordinator::with_robot);
        let mut game = match game {
            Ok(game) => game,
            Err(err) => {
                error!(%err, "cannot set up game");
                return ExitCode::FAILURE;
            }
        };

        game.new_game();
        while let Some(hint) = game.hint() {
            let turn = game.place(hint).and_then(|_| game.end_turn());
            if let Err(err) = turn {
                error!(%err, %hint, "hinted move was refused");
                return ExitCode::FAILURE;
            }
        }

        let outcome = game
            .outcome()
            .map_or_else(|| "unfinished".to_string(), |o| o.to_string());
        info!(
            game = game_index,
            seed = game_seed,
            score = game.score(),
            robot = game.state().score(ROBOT_SEAT),
            placed = game.state().grid().occupied_count(),
            %outcome,
            "finished"
        );
        total += u64::from(game.score());
    }

    info!(games, total, "done");
    ExitCode::SUCCESS
}
