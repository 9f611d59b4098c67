//! Headless bingo host.
//!
//! Runs a session actor on a real clock, logs every frame through a
//! console presenter and lets a scripted player take the seat.

mod player;
mod presenter;

use anyhow::Error;
use chewata_bingo::{MarkPolicy, Session, SessionActor, SessionConfig, session::Stake};
use ctrlc::set_handler;
use log::info;
use pico_args::Arguments;
use rand::{SeedableRng, rngs::StdRng};
use tokio::time::Duration;

use player::ScriptedPlayer;
use presenter::LogPresenter;

const HELP: &str = "\
Play chewata bingo headlessly with a scripted player

USAGE:
  cb_cli [OPTIONS]

OPTIONS:
  --stake      AMOUNT      Stake to play for               [default: first of CHEWATA_STAKES]
  --rounds     N           Rounds to play, 0 plays on      [default: 1]
  --seed       N           Seed the session RNG            [default: OS entropy]
  --tick-ms    MS          Milliseconds per session second [default: 1000]

FLAGS:
  -h, --help               Print help information
  --auto-mark              Mark called numbers automatically
  --json                   Print every settled view as JSON on stdout

ENVIRONMENT:
  CHEWATA_STAKES               Offered stakes, comma separated (e.g., 10,20,50,100)
  CHEWATA_MARK_POLICY          manual or auto
  CHEWATA_SELECTION_SECS       Seat selection countdown
  CHEWATA_GAME_SECS            Game countdown
  CHEWATA_CALL_INTERVAL_SECS   Seconds between calls
  CHEWATA_POST_ROUND_SECS      Delay before the next selection
  CHEWATA_TAKEN_PROBABILITY    Chance a seat shows as taken
  CHEWATA_HISTORY_LEN          Recent calls to show
  (A .env file is read if present)
";

struct Args {
    stake: Option<Stake>,
    rounds: u32,
    seed: Option<u64>,
    tick_ms: u64,
    auto_mark: bool,
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        stake: pargs.opt_value_from_str("--stake")?,
        rounds: pargs.opt_value_from_str("--rounds")?.unwrap_or(1),
        seed: pargs.opt_value_from_str("--seed")?,
        tick_ms: pargs.opt_value_from_str("--tick-ms")?.unwrap_or(1000),
        auto_mark: pargs.contains("--auto-mark"),
        json: pargs.contains("--json"),
    };

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    env_logger::builder().format_target(false).init();

    let mut config = SessionConfig::from_env()?;
    if args.auto_mark {
        config.mark_policy = MarkPolicy::Auto;
    }
    info!(
        "Starting bingo session: stakes {:?}, {} marking, {}s selection, {}s game",
        config.stakes, config.mark_policy, config.selection_secs, config.game_secs
    );

    let session = match args.seed {
        Some(seed) => Session::with_rng(config, StdRng::seed_from_u64(seed))?,
        None => Session::new(config)?,
    };
    let player_rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_os_rng(),
    };

    let (actor, handle) = SessionActor::new(session, LogPresenter::new());
    let actor = actor.with_tick_period(Duration::from_millis(args.tick_ms.max(1)));
    let task = tokio::spawn(actor.run());

    let updates = handle.subscribe(256).await?;
    let player = ScriptedPlayer::new(
        handle.clone(),
        args.stake,
        args.rounds,
        player_rng,
        args.json,
    );
    let rounds = player.run(updates).await?;

    handle.close().await?;
    let session = task.await?;
    info!(
        "Played {rounds} round(s) at stake {}; session saw {} round(s) end",
        session.stake(),
        session.rounds_played()
    );

    Ok(())
}
