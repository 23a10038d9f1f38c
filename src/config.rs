//! Start configuration and simulation tuning
//!
//! `GameConfig` only names the UI surfaces the game binds to. Everything that
//! shapes the simulation lives in `Tuning`, which is never read from the page.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;

/// Surface identifiers passed to `start`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Play-field container (required)
    pub play_field_id: String,
    /// Player element (required)
    pub player_id: String,
    /// Score readout (optional)
    pub score_id: String,
    /// Lives readout (optional)
    pub lives_id: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            play_field_id: "gameView".to_string(),
            player_id: "rata".to_string(),
            score_id: "score".to_string(),
            lives_id: "lives".to_string(),
        }
    }
}

impl GameConfig {
    /// Parse overrides from JSON; missing or blank fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let trimmed = json.trim();
        if trimmed.is_empty() || trimmed == "null" || trimmed == "undefined" {
            return Ok(Self::default());
        }
        let mut config: GameConfig = serde_json::from_str(trimmed)?;
        config.fill_blanks();
        Ok(config)
    }

    fn fill_blanks(&mut self) {
        let defaults = Self::default();
        if self.play_field_id.is_empty() {
            self.play_field_id = defaults.play_field_id;
        }
        if self.player_id.is_empty() {
            self.player_id = defaults.player_id;
        }
        if self.score_id.is_empty() {
            self.score_id = defaults.score_id;
        }
        if self.lives_id.is_empty() {
            self.lives_id = defaults.lives_id;
        }
    }
}

/// Simulation balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub initial_lives: u32,
    /// Seconds a shield/slow/speed effect lasts after (re)activation
    pub effect_duration: f32,
    pub penalty_points: u32,
    pub slow_fall_multiplier: f32,
    pub speed_boost_multiplier: f32,
    /// Base lateral speed (%/s)
    pub lateral_speed: f32,
    pub hitbox_shrink: f32,
    pub entity_size: (f32, f32),
    pub spawn_x_range: (f32, f32),
    pub spawn_y: f32,
    pub escape_y: f32,
    pub player_start_x: f32,
    pub player_y: f32,
    pub player_size: (f32, f32),
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_lives: INITIAL_LIVES,
            effect_duration: EFFECT_DURATION,
            penalty_points: PENALTY_POINTS,
            slow_fall_multiplier: SLOW_FALL_MULTIPLIER,
            speed_boost_multiplier: SPEED_BOOST_MULTIPLIER,
            lateral_speed: PLAYER_LATERAL_SPEED,
            hitbox_shrink: HITBOX_SHRINK,
            entity_size: (ENTITY_WIDTH, ENTITY_HEIGHT),
            spawn_x_range: (SPAWN_MIN_X, SPAWN_MAX_X),
            spawn_y: SPAWN_Y,
            escape_y: ESCAPE_Y,
            player_start_x: PLAYER_START_X,
            player_y: PLAYER_Y,
            player_size: (PLAYER_WIDTH, PLAYER_HEIGHT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(GameConfig::from_json("").unwrap(), GameConfig::default());
        assert_eq!(GameConfig::from_json("{}").unwrap(), GameConfig::default());
        assert_eq!(GameConfig::from_json("null").unwrap(), GameConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = GameConfig::from_json(r#"{"playerId":"hero","scoreId":""}"#).unwrap();
        assert_eq!(config.player_id, "hero");
        assert_eq!(config.play_field_id, "gameView");
        assert_eq!(config.score_id, "score");
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(matches!(
            GameConfig::from_json("{not json"),
            Err(GameError::Config(_))
        ));
    }
}
