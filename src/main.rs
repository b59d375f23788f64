//! Crystal Cart entry point
//!
//! Runs a headless session in real time with the autopilot at the controls,
//! then prints the best recorded runs.
//!
//! ```text
//! crystal-cart [--config FILE] [--seed N] [--seconds S] [--ledger FILE]
//! ```

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crystal_cart::sim::SystemClock;
use crystal_cart::{GameEvent, GameSession, JsonFileLedger, ScoreLedger, Tuning, autopilot, runtime};

struct Args {
    config: Option<PathBuf>,
    seed: Option<u64>,
    seconds: u64,
    ledger: PathBuf,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            config: None,
            seed: None,
            seconds: 30,
            ledger: PathBuf::from("crystal_cart_scores.json"),
        }
    }
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let value = iter.next();
        match (flag.as_str(), value) {
            ("--config", Some(v)) => args.config = Some(PathBuf::from(v)),
            ("--seed", Some(v)) => match v.parse() {
                Ok(seed) => args.seed = Some(seed),
                Err(_) => log::warn!("Ignoring bad seed {v:?}"),
            },
            ("--seconds", Some(v)) => match v.parse() {
                Ok(secs) => args.seconds = secs,
                Err(_) => log::warn!("Ignoring bad duration {v:?}"),
            },
            ("--ledger", Some(v)) => args.ledger = PathBuf::from(v),
            (other, _) => log::warn!("Ignoring unknown argument {other:?}"),
        }
    }
    args
}

fn main() {
    env_logger::init();
    log::info!("Crystal Cart (headless) starting...");

    let args = parse_args();
    let tuning = match &args.config {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };
    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    });
    let frame = Duration::from_millis(tuning.tick_interval_ms);

    let session = GameSession::new(
        tuning.clone(),
        seed,
        SystemClock::new(),
        JsonFileLedger::new(args.ledger.clone()),
    );
    let handle = runtime::spawn(session);
    handle.start();
    log::info!("Game started with seed: {seed}");

    let deadline = Instant::now() + Duration::from_secs(args.seconds);
    let mut finished = false;
    while !finished && Instant::now() < deadline {
        if let Some(intent) = handle
            .snapshot()
            .and_then(|snapshot| autopilot::decide(&snapshot, &tuning))
        {
            handle.apply(intent);
        }

        for event in handle.events().try_iter() {
            match event {
                GameEvent::LevelComplete { completed_level, .. } => {
                    log::info!("Level {completed_level} cleared")
                }
                GameEvent::GameOver { score, level, cause } => {
                    log::info!("Run over: score {score}, level {level}, cause {cause:?}");
                    finished = true;
                }
                other => log::debug!("{other:?}"),
            }
        }
        thread::sleep(frame);
    }

    if !finished {
        log::info!("Time is up");
        handle.end_game();
    }

    let Some(session) = handle.shutdown() else {
        log::error!("Session thread did not shut down cleanly");
        return;
    };

    println!("Best runs:");
    for (rank, record) in session.ledger().top(5).iter().enumerate() {
        println!(
            "{:>2}. {:>7}  level {:>2}  at {}",
            rank + 1,
            record.score,
            record.level,
            record.timestamp
        );
    }
}
