//! Rockfall entry point
//!
//! Headless demo run. No terminal renderer is wired in here; the binary
//! drives a fixed-seed session with a scripted dodge pattern and prints each
//! frame descriptor as a JSON line, standing in for a display sink. A real
//! front end would poll the keyboard and draw the frames instead.

use std::time::Instant;

use rockfall::consts::TICK_INTERVAL;
use rockfall::observer::LogObserver;
use rockfall::sim::{Intent, Session, SessionPhase, tick};

/// Demo runs at most this many ticks (~60 seconds) before quitting cleanly
const MAX_DEMO_TICKS: u64 = 1200;

fn main() {
    env_logger::init();
    log::info!("rockfall demo starting");

    let seed = 0x0c_0ffee;
    let mut session = match Session::new(60, 24, seed) {
        Ok(session) => session,
        Err(err) => {
            log::error!("cannot start session: {err}");
            return;
        }
    };
    log::info!("session created with seed {seed}");

    let mut observer = LogObserver;
    let clock = Instant::now();
    let script = [
        Intent::None,
        Intent::MoveLeft,
        Intent::None,
        Intent::MoveRight,
    ];

    let mut ticks = 0u64;
    while session.phase != SessionPhase::Ended {
        let intent = if ticks >= MAX_DEMO_TICKS {
            Intent::Quit
        } else {
            script[(ticks as usize) % script.len()]
        };
        let frame = tick(&mut session, intent, clock.elapsed(), &mut observer);
        if let Ok(json) = serde_json::to_string(&frame) {
            println!("{json}");
        }
        ticks += 1;
        std::thread::sleep(TICK_INTERVAL);
    }

    if let Some(score) = session.final_score() {
        log::info!("final score: {score} (aborted: {})", session.aborted());
    }
}
