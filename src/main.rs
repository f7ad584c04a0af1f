//! Bomber Sim headless runner
//!
//! Plays one match with no renderer attached and reports the outcome.
//! Usage: `bomber-sim [settings.json]` (defaults to four Normal AIs).

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bomber_sim::consts::MAX_MATCH_TICKS;
    use bomber_sim::MatchSettings;
    use bomber_sim::sim::{Difficulty, GameState, TickInput, tick};

    env_logger::init();

    let settings = match std::env::args().nth(1) {
        Some(path) => match MatchSettings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => {
            let seed = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default();
            MatchSettings::ai_only(4, Difficulty::Normal, seed)
        }
    };

    let mut state = match GameState::new(&settings) {
        Ok(state) => state,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    // Nobody pushes intents here; human slots just stand still
    let input = TickInput::default();
    while state.outcome().is_none() && state.time_ticks < MAX_MATCH_TICKS {
        tick(&mut state, &input);
    }

    match state.outcome() {
        Some(outcome) => println!("{outcome} ({} ticks, seed {})", state.time_ticks, state.seed),
        None => {
            log::warn!("Tick cap reached with no winner");
            let alive: Vec<String> = state
                .players()
                .iter()
                .filter(|p| p.is_alive())
                .map(|p| format!("{} ({} lives)", p.id(), p.lives()))
                .collect();
            println!(
                "No result after {} ticks; still standing: {}",
                state.time_ticks,
                alive.join(", ")
            );
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a host page; nothing to run here
}
