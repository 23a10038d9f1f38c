//! Per-frame simulation step
//!
//! Frame order: player movement, effect expiry, falling/collisions, then the
//! spawn timer. Items are processed in creation order and every catch mutates
//! score/lives/effects immediately, so later items in the same frame see it.

use super::effects::EffectKind;
use super::spawner::run_spawner;
use super::state::{Category, Entity, GameEvent, GamePhase, GameState, MoveIntent};
use crate::clamp_to_field;

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held directions
    pub intent: MoveIntent,
}

impl TickInput {
    pub fn left() -> Self {
        Self {
            intent: MoveIntent {
                left: true,
                right: false,
            },
        }
    }

    pub fn right() -> Self {
        Self {
            intent: MoveIntent {
                left: false,
                right: true,
            },
        }
    }
}

/// Advance the game by one frame of `dt` seconds
///
/// Negative `dt` is treated as zero. No-op unless the game is running.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase != GamePhase::Running {
        return;
    }
    let dt = dt.max(0.0);

    state.player.intent = input.intent;
    move_player(state, dt);

    state.clock += dt;
    for kind in state.effects.expire(state.clock) {
        log::debug!("Effect expired: {:?}", kind);
        state.events.push(GameEvent::EffectExpired(kind));
    }

    step(state, dt);

    if state.phase == GamePhase::Running {
        run_spawner(state, dt);
    }
}

/// Integrate held-direction movement, clamped to the field
pub fn move_player(state: &mut GameState, dt: f32) {
    let intent = state.player.intent;
    if intent.left == intent.right {
        // Nothing held, or both cancel out
        return;
    }
    let dx = state.tuning.lateral_speed * state.effects.speed_multiplier() * dt;
    let mut x = state.player.pos.x;
    if intent.left {
        x -= dx;
    }
    if intent.right {
        x += dx;
    }
    let max_x = 100.0 - state.player.size.x;
    state.player.pos.x = clamp_to_field(x, 0.0, max_x);
}

/// Fall, collide and cull every active item
pub fn step(state: &mut GameState, dt: f32) {
    if state.phase != GamePhase::Running {
        return;
    }

    let dy = state.difficulty.fall_speed() * state.effects.fall_multiplier() * dt;
    let hitbox = state.player.hitbox(state.tuning.hitbox_shrink);
    let escape_y = state.tuning.escape_y;

    let entities = std::mem::take(&mut state.entities);
    let mut still_active = Vec::with_capacity(entities.len());
    let mut remaining = entities.into_iter();

    for mut entity in remaining.by_ref() {
        entity.pos.y += dy;

        if super::geometry::intersects(&hitbox, &entity.rect()) {
            state.events.push(GameEvent::Caught {
                id: entity.id,
                category: entity.category,
            });
            resolve_catch(state, &entity);
            if state.phase == GamePhase::GameOver {
                break;
            }
        } else if entity.pos.y > escape_y {
            state.events.push(GameEvent::Escaped { id: entity.id });
        } else {
            still_active.push(entity);
        }
    }

    // Anything left unprocessed after game over stays where it was
    still_active.extend(remaining);
    state.entities = still_active;
}

/// Apply the effect of catching `entity`
fn resolve_catch(state: &mut GameState, entity: &Entity) {
    let now = state.clock;
    let duration = state.tuning.effect_duration;

    match entity.category {
        Category::Common => add_points(state, crate::consts::COMMON_POINTS),
        Category::Bonus => add_points(state, crate::consts::BONUS_POINTS),
        Category::Shield => {
            state.effects.activate_shield(now, duration);
            state.events.push(GameEvent::EffectActivated(EffectKind::Shield));
        }
        Category::SlowTime => {
            let multiplier = state.tuning.slow_fall_multiplier;
            state.effects.activate_slow(now, duration, multiplier);
            state
                .events
                .push(GameEvent::EffectActivated(EffectKind::SlowFall));
        }
        Category::SpeedBoost => {
            let multiplier = state.tuning.speed_boost_multiplier;
            state.effects.activate_speed(now, duration, multiplier);
            state
                .events
                .push(GameEvent::EffectActivated(EffectKind::SpeedBoost));
        }
        Category::Penalty => apply_penalty(state),
        Category::Hazard => take_hit(state),
    }
}

fn add_points(state: &mut GameState, points: u32) {
    state.score = state.score.saturating_add(points);
    state.events.push(GameEvent::Scored { score: state.score });
    state.refresh_difficulty();
}

/// Instant score penalty, clamped at zero
pub fn apply_penalty(state: &mut GameState) {
    state.score = state.score.saturating_sub(state.tuning.penalty_points);
    state.events.push(GameEvent::Penalized { score: state.score });
    state.refresh_difficulty();
}

/// A hazard reached the player: the shield absorbs it, otherwise lose a life
fn take_hit(state: &mut GameState) {
    if state.effects.consume_shield() {
        log::debug!("Shield absorbed a hit");
        state.events.push(GameEvent::ShieldConsumed);
        return;
    }

    state.lives = state.lives.saturating_sub(1);
    state.events.push(GameEvent::LivesChanged { lives: state.lives });
    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { score: state.score });
        log::info!("Game over with score {}", state.score);
    }
}
