//! Headless artillery duel
//!
//! Plays one autopilot match and prints a JSON summary:
//!
//! ```text
//! artillery-duel [SEED] [TUNING.json]
//! ```
//!
//! Set `RUST_LOG=debug` to follow every shot.

#[cfg(not(target_arch = "wasm32"))]
use artillery_duel::sim::{GameMode, MatchEvent, MatchState, Phase, Side};
#[cfg(not(target_arch = "wasm32"))]
use artillery_duel::{Runner, Tuning, consts::SIM_DT};

/// Give up on matches that stall (e.g. both tanks buried)
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u32 = 100_000;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, serde::Serialize)]
struct Summary {
    seed: u64,
    winner: Option<Side>,
    ticks: u64,
    shots: u32,
    explosions: u32,
    lost: u32,
    bombs: u32,
    hp: [i32; 2],
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(s) => s.parse::<u64>()?,
        None => rand::random(),
    };
    let tuning = match args.next() {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    log::info!("Artillery Duel (headless) starting with seed {}", seed);

    let mut state = MatchState::new(seed, tuning);
    state.mode = GameMode::Double;
    let mut runner = Runner::new(state);
    runner.input.autopilot = true;

    let mut summary = Summary {
        seed,
        winner: None,
        ticks: 0,
        shots: 0,
        explosions: 0,
        lost: 0,
        bombs: 0,
        hp: [0; 2],
    };

    for _ in 0..MAX_FRAMES {
        runner.advance(SIM_DT);
        for event in runner.state.drain_events() {
            match event {
                MatchEvent::Fired { .. } => summary.shots += 1,
                MatchEvent::Exploded { small: false, .. } => summary.explosions += 1,
                MatchEvent::ProjectileLost { .. } => summary.lost += 1,
                MatchEvent::BombDropped { .. } => summary.bombs += 1,
                MatchEvent::Damaged {
                    side,
                    before,
                    after,
                } => log::info!("{:?}: {} -> {} hp", side, before, after),
                _ => {}
            }
        }
        if runner.state.phase == Phase::GameOver {
            break;
        }
    }

    if runner.state.phase != Phase::GameOver {
        log::warn!("No winner after {} frames", MAX_FRAMES);
    }

    summary.winner = runner.state.winner;
    summary.ticks = runner.state.time_ticks;
    summary.hp = [runner.state.tanks[0].hp, runner.state.tanks[1].hp];
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web; hosts drive `Runner` directly
}
