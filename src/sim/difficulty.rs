//! Score-driven difficulty bands

use serde::{Deserialize, Serialize};

/// Derived difficulty for a given score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyTier {
    /// Fall speed (% of field height per second)
    pub fall_speed: u32,
    /// Spawn timer period (ms)
    pub spawn_interval_ms: u32,
    /// Maximum concurrent falling items
    pub max_concurrent: usize,
}

impl DifficultyTier {
    #[inline]
    pub fn fall_speed(&self) -> f32 {
        self.fall_speed as f32
    }

    #[inline]
    pub fn spawn_interval_secs(&self) -> f32 {
        self.spawn_interval_ms as f32 / 1000.0
    }
}

/// Bands ordered from highest threshold to lowest; first match wins
const BANDS: [(u32, DifficultyTier); 4] = [
    (
        50,
        DifficultyTier {
            fall_speed: 55,
            spawn_interval_ms: 500,
            max_concurrent: 9,
        },
    ),
    (
        20,
        DifficultyTier {
            fall_speed: 40,
            spawn_interval_ms: 700,
            max_concurrent: 7,
        },
    ),
    (
        10,
        DifficultyTier {
            fall_speed: 30,
            spawn_interval_ms: 900,
            max_concurrent: 5,
        },
    ),
    (
        0,
        DifficultyTier {
            fall_speed: 20,
            spawn_interval_ms: 1200,
            max_concurrent: 4,
        },
    ),
];

/// Difficulty for a cumulative score
pub fn tier_for_score(score: u32) -> DifficultyTier {
    BANDS
        .iter()
        .find(|(threshold, _)| score >= *threshold)
        .map(|&(_, tier)| tier)
        .unwrap_or(BANDS[BANDS.len() - 1].1)
}
