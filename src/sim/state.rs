//! Game state and core simulation types
//!
//! `GameState` is the single owned aggregate for a run: the loop, the step
//! and the lifecycle all receive it explicitly.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{DifficultyTier, tier_for_score};
use super::effects::{ActiveEffects, EffectKind};
use super::geometry::PercentRect;
use super::spawner::Spawner;
use crate::config::Tuning;

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Not started, or stopped externally
    Stopped,
    /// Frames and spawns are being processed
    Running,
    /// Lives exhausted; nothing mutates any more
    GameOver,
}

/// What a falling item is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// +1 point
    Common,
    /// Costs a life unless shielded
    Hazard,
    /// +10 points
    Bonus,
    /// Shield power-up
    Shield,
    /// Slow-time power-up
    SlowTime,
    /// Lateral speed power-up
    SpeedBoost,
    /// Instant score penalty
    Penalty,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Common,
        Category::Hazard,
        Category::Bonus,
        Category::Shield,
        Category::SlowTime,
        Category::SpeedBoost,
        Category::Penalty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Common => "common",
            Category::Hazard => "hazard",
            Category::Bonus => "bonus",
            Category::Shield => "shield",
            Category::SlowTime => "slow-time",
            Category::SpeedBoost => "speed-boost",
            Category::Penalty => "penalty",
        }
    }
}

/// A falling item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique for the lifetime of the run; never reused
    pub id: u32,
    pub category: Category,
    /// Top-left corner (percent)
    pub pos: Vec2,
    /// Footprint (percent)
    pub size: Vec2,
}

impl Entity {
    pub fn rect(&self) -> PercentRect {
        PercentRect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }
}

/// Held movement direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
}

/// The catcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner (percent); y never changes during a run
    pub pos: Vec2,
    pub size: Vec2,
    pub intent: MoveIntent,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.player_start_x, tuning.player_y),
            size: Vec2::new(tuning.player_size.0, tuning.player_size.1),
            intent: MoveIntent::default(),
        }
    }

    pub fn rect(&self) -> PercentRect {
        PercentRect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Collision box, contracted by `shrink` on each side
    pub fn hitbox(&self, shrink: f32) -> PercentRect {
        self.rect().shrink(shrink)
    }
}

/// Things that happened during a frame, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: u32, category: Category },
    Caught { id: u32, category: Category },
    Escaped { id: u32 },
    /// Score went up from a catch
    Scored { score: u32 },
    /// Score went down from a penalty (already clamped)
    Penalized { score: u32 },
    LivesChanged { lives: u32 },
    ShieldConsumed,
    EffectActivated(EffectKind),
    EffectExpired(EffectKind),
    DifficultyChanged(DifficultyTier),
    GameOver { score: u32 },
}

/// Complete state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u32,
    /// Simulation clock (seconds since start)
    pub clock: f32,
    pub difficulty: DifficultyTier,
    pub player: Player,
    /// Active items in creation order
    pub entities: Vec<Entity>,
    pub effects: ActiveEffects,
    pub spawner: Spawner,
    /// Events recorded since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Fresh run state (still `Stopped`)
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let difficulty = tier_for_score(0);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(&tuning),
            lives: tuning.initial_lives,
            tuning,
            phase: GamePhase::Stopped,
            score: 0,
            clock: 0.0,
            difficulty,
            entities: Vec::new(),
            effects: ActiveEffects::new(),
            spawner: Spawner::new(difficulty.spawn_interval_secs()),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Take the recorded events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Re-derive difficulty from the current score
    ///
    /// A changed spawn interval restarts the spawn timer right away.
    pub fn refresh_difficulty(&mut self) {
        let tier = tier_for_score(self.score);
        if tier == self.difficulty {
            return;
        }
        if tier.spawn_interval_ms != self.difficulty.spawn_interval_ms {
            self.spawner.restart(tier.spawn_interval_secs());
        }
        log::debug!(
            "Difficulty -> fall {} %/s, spawn every {} ms, max {}",
            tier.fall_speed,
            tier.spawn_interval_ms,
            tier.max_concurrent
        );
        self.difficulty = tier;
        self.events.push(GameEvent::DifficultyChanged(tier));
    }
}
