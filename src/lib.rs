//! Cheese Fall - catch the falling cheese, dodge everything else
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, effects, difficulty)
//! - `session`: Start/stop lifecycle and the collaborator seams around the sim
//! - `persistence`: Best score storage
//! - `objectives`: Score-driven achievement markers
//! - `presentation`: Category -> visual hints table
//! - `platform`: Browser glue (DOM surfaces, input, frame loop)

pub mod config;
pub mod error;
pub mod objectives;
pub mod persistence;
pub mod platform;
pub mod presentation;
pub mod session;
pub mod sim;

pub use config::{GameConfig, Tuning};
pub use error::{GameError, StoreError};
pub use session::GameSession;

/// Game configuration constants
///
/// All positions and sizes are percentages of the play-field.
pub mod consts {
    /// Lives at the start of a run
    pub const INITIAL_LIVES: u32 = 3;

    /// Falling item footprint
    pub const ENTITY_WIDTH: f32 = 6.0;
    pub const ENTITY_HEIGHT: f32 = 8.0;

    /// Horizontal spawn range (100 - ENTITY_WIDTH)
    pub const SPAWN_MIN_X: f32 = 0.0;
    pub const SPAWN_MAX_X: f32 = 94.0;
    /// Items appear above the visible field...
    pub const SPAWN_Y: f32 = -10.0;
    /// ...and are culled once they fall past this line
    pub const ESCAPE_Y: f32 = 110.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 45.0;
    pub const PLAYER_Y: f32 = 80.0;
    pub const PLAYER_WIDTH: f32 = 10.0;
    pub const PLAYER_HEIGHT: f32 = 12.0;
    /// Lateral speed (%/s)
    pub const PLAYER_LATERAL_SPEED: f32 = 60.0;
    /// Forgiving collision: player hitbox shrinks by this much per side
    pub const HITBOX_SHRINK: f32 = 2.0;

    /// Timed power-up duration (seconds)
    pub const EFFECT_DURATION: f32 = 5.0;
    /// Fall-rate multiplier while slow-time is active
    pub const SLOW_FALL_MULTIPLIER: f32 = 0.5;
    /// Lateral speed multiplier while the speed boost is active
    pub const SPEED_BOOST_MULTIPLIER: f32 = 1.5;

    /// Points
    pub const COMMON_POINTS: u32 = 1;
    pub const BONUS_POINTS: u32 = 10;
    pub const PENALTY_POINTS: u32 = 5;

    /// Largest frame delta the browser loop feeds the sim (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Clamp a value into `[min, max]` without panicking when `min > max`
#[inline]
pub fn clamp_to_field(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}
