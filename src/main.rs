use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use coup_duel::{Coup, GameConfig, GameRecorder};

// random play ends long before this, it only guards against a stuck game
const MAX_ACTIONS_PER_GAME: usize = 10_000;

const HELP: &str = "\
Plays two player Coup games with random legal moves

USAGE:
  coup-duel [OPTIONS]

OPTIONS:
  --games NUMBER        number of games to play [default: 1]
  --seed NUMBER         seed for a reproducible run
  --first-player 0|1    player taking the first turn [default: 0]
  --record PATH         write every action to a csv file
  -h, --help            print this help
";

struct Args {
    games: usize,
    config: GameConfig,
    record: Option<PathBuf>,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = pico_args::Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        games: pargs.opt_value_from_str("--games")?.unwrap_or(1),
        config: GameConfig {
            first_player: pargs.opt_value_from_str("--first-player")?.unwrap_or(0),
            seed: pargs.opt_value_from_str("--seed")?,
        },
        record: pargs.opt_value_from_str("--record")?,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        warn!("ignoring unknown arguments {remaining:?}");
    }

    Ok(args)
}

fn play<R: Rng>(
    config: &GameConfig,
    rng: &mut R,
    mut recorder: Option<&mut GameRecorder<File>>,
) -> Result<Option<usize>, Box<dyn Error>> {
    let mut coup = Coup::from_config(config, rng)?;
    if let Some(recorder) = recorder.as_deref_mut() {
        recorder.start_game();
    }

    for _ in 0..MAX_ACTIONS_PER_GAME {
        let actions = coup.actions()?;
        let action = *actions.choose(rng).ok_or("no legal actions in an unfinished game")?;

        let (turn, actor) = (coup.turn(), coup.whose_action());
        coup.step(action, rng)?;

        if let Some(recorder) = recorder.as_deref_mut() {
            recorder.record(turn, actor, action, &coup)?;
        }

        if coup.is_game_over() {
            coup.render();
            return Ok(coup.winner());
        }
    }

    warn!("game still running after {MAX_ACTIONS_PER_GAME} actions");
    coup.render();
    Ok(None)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let mut rng = args.config.rng();
    let mut recorder = match &args.record {
        Some(path) => Some(GameRecorder::create(path)?),
        None => None,
    };

    let mut wins = [0usize; 2];
    for game in 0..args.games {
        match play(&args.config, &mut rng, recorder.as_mut())? {
            Some(winner) => {
                info!("game {game}: player {} wins", winner + 1);
                wins[winner] += 1;
            }
            None => info!("game {game}: no winner"),
        }
    }

    if let Some(recorder) = recorder.as_mut() {
        recorder.flush()?;
    }

    info!("P1 won {} and P2 won {} of {} games", wins[0], wins[1], args.games);
    Ok(())
}
