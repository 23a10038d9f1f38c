//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through the `dt` handed to `tick`
//! - Seeded RNG only
//! - Stable iteration order (creation order)
//! - No rendering or platform dependencies

pub mod difficulty;
pub mod effects;
pub mod geometry;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod weighted;

pub use difficulty::{DifficultyTier, tier_for_score};
pub use effects::{ActiveEffects, EffectKind};
pub use geometry::{Bounds, PercentRect, intersects, rect_percent};
pub use spawner::{SPAWN_TABLE, Spawner, try_spawn};
pub use state::{Category, Entity, GameEvent, GamePhase, GameState, MoveIntent, Player};
pub use tick::{TickInput, apply_penalty, step, tick};
pub use weighted::pick_weighted;
