//! Headless demo driver
//!
//! Plays a short scripted session against the engine and logs the event
//! stream, then dumps a JSON snapshot of the final state. Useful for eyeing
//! the event flow without a UI host: `RUST_LOG=debug cargo run -- <seed>`.

use petri_panic::sim::state::{GameEvent, GameState};
use petri_panic::sim::tick::{frame, initialize_game, place_figure, timer_tick};
use petri_panic::consts::FRAME_DT;

fn report(label: &str, events: &[GameEvent]) {
    for event in events {
        log::info!("{label}: {event:?}");
    }
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42u64);
    log::info!("Petri Panic demo, seed {seed}");

    let mut state = GameState::new(seed);
    report("start", &initialize_game(&mut state, 1));

    // A spread of legal placements; queued bombs detonate in the far corner
    let spots = [
        (120.0, 120.0),
        (400.0, 150.0),
        (650.0, 120.0),
        (150.0, 420.0),
        (400.0, 450.0),
        (650.0, 420.0),
    ];
    for &(x, y) in &spots {
        if !state.in_play() {
            break;
        }
        let target = if state.active_template() == Some(petri_panic::consts::BOMB_ID) {
            (750.0, 560.0)
        } else {
            (x, y)
        };
        let result = place_figure(&mut state, target.0, target.1);
        report("place", &result.events);

        // A second of vibration between placements
        for _ in 0..60 {
            report("frame", &frame(&mut state, FRAME_DT));
        }
        report("tick", &timer_tick(&mut state));
    }

    println!(
        "phase {:?}, score {}, coins {}, {} placed, {:.0}s left",
        state.phase,
        state.score,
        state.coins,
        state.figures_placed,
        state.time_remaining
    );
    match serde_json::to_string_pretty(&state) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("snapshot failed: {err}"),
    }
}
