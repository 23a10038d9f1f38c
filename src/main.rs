//! Cheese Fall entry point
//!
//! The browser build is driven from the page through `startGame`/`stopGame`.
//! Natively this runs a headless autoplay game and logs the result.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use cheese_fall::persistence::{BestScoreStore, MemoryBestScore};
    use cheese_fall::{GameSession, Tuning};

    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(42);
    log::info!("Cheese Fall (native) autoplay, seed {}", seed);

    let mut session = GameSession::headless(Tuning::default(), Box::new(MemoryBestScore::new()));
    session.start(seed);

    // Ten simulated minutes at 60 Hz
    const DT: f32 = 1.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 60 * 10;
    let mut frames = 0;
    while frames < MAX_FRAMES {
        let input = autopilot::steer(session.state());
        if !session.frame(&input, DT) {
            break;
        }
        frames += 1;
    }
    session.stop();

    let state = session.state();
    log::info!(
        "Finished after {:.1}s: score {}, lives {}, phase {:?}",
        state.clock,
        state.score,
        state.lives,
        state.phase
    );
    match session.store().read_best() {
        Ok(best) => println!("seed {} -> score {} (best {})", seed, state.score, best),
        Err(err) => println!("seed {} -> score {} (best unavailable: {})", seed, state.score, err),
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use cheese_fall::sim::{Category, GameState, MoveIntent, TickInput};

    /// Follow the lowest item worth catching
    pub fn steer(state: &GameState) -> TickInput {
        let player = &state.player;
        let center = player.pos.x + player.size.x / 2.0;
        let target = state
            .entities
            .iter()
            .filter(|e| !matches!(e.category, Category::Hazard | Category::Penalty))
            .filter(|e| e.pos.y <= player.pos.y + player.size.y)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        let mut intent = MoveIntent::default();
        if let Some(item) = target {
            let item_center = item.pos.x + item.size.x / 2.0;
            if item_center < center - 1.0 {
                intent.left = true;
            } else if item_center > center + 1.0 {
                intent.right = true;
            }
        }
        TickInput { intent }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the library's start function; this only satisfies the compiler
}
