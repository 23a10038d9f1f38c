//! Recurring spawn timer
//!
//! Elapsed frame time accumulates; each full interval is one spawn attempt.
//! Attempts made while the field is at its concurrency cap are dropped.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Category, Entity, GameEvent, GameState};
use super::weighted::pick_weighted;

/// Relative spawn odds per category
pub const SPAWN_TABLE: [(Category, f32); 7] = [
    (Category::Common, 0.55),
    (Category::Hazard, 0.15),
    (Category::Penalty, 0.10),
    (Category::Bonus, 0.07),
    (Category::SpeedBoost, 0.05),
    (Category::Shield, 0.04),
    (Category::SlowTime, 0.04),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    /// Period (seconds)
    interval: f32,
    accumulator: f32,
}

impl Spawner {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            accumulator: 0.0,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Time accumulated toward the next attempt
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    /// Start a new period from zero
    pub fn restart(&mut self, interval: f32) {
        self.interval = interval;
        self.accumulator = 0.0;
    }

    /// Advance the timer, returning how many periods completed
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.interval <= 0.0 || dt <= 0.0 {
            return 0;
        }
        self.accumulator += dt;
        let mut attempts = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            attempts += 1;
        }
        attempts
    }
}

/// Run the spawn timer for `dt` seconds, creating items as periods elapse
pub fn run_spawner(state: &mut GameState, dt: f32) {
    let attempts = state.spawner.advance(dt);
    for _ in 0..attempts {
        try_spawn(state);
    }
}

/// One spawn attempt; returns the new item's id, or `None` when capped
pub fn try_spawn(state: &mut GameState) -> Option<u32> {
    if state.entities.len() >= state.difficulty.max_concurrent {
        log::trace!("Spawn skipped: {} items on field", state.entities.len());
        return None;
    }
    let category = pick_weighted(&SPAWN_TABLE, &mut state.rng)?;
    Some(spawn_entity(state, category))
}

/// Place a new item of `category` above the field at a random column
pub fn spawn_entity(state: &mut GameState, category: Category) -> u32 {
    let (min_x, max_x) = state.tuning.spawn_x_range;
    let x = if max_x > min_x {
        state.rng.random_range(min_x..=max_x)
    } else {
        min_x
    };
    let id = state.next_entity_id();
    let (w, h) = state.tuning.entity_size;
    state.entities.push(Entity {
        id,
        category,
        pos: Vec2::new(x, state.tuning.spawn_y),
        size: Vec2::new(w, h),
    });
    state.events.push(GameEvent::Spawned { id, category });
    log::trace!("Spawned {} #{} at x={:.1}", category.as_str(), id, x);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;

    #[test]
    fn test_table_weights_sum_to_one() {
        let total: f32 = SPAWN_TABLE.iter().map(|&(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_advance_counts_whole_periods() {
        let mut spawner = Spawner::new(1.2);
        assert_eq!(spawner.advance(1.0), 0);
        assert_eq!(spawner.advance(0.3), 1);
        assert!((spawner.pending() - 0.1).abs() < 1e-4);
        assert_eq!(spawner.advance(2.5), 2);
    }

    #[test]
    fn test_restart_discards_partial_period() {
        let mut spawner = Spawner::new(1.2);
        spawner.advance(1.1);
        spawner.restart(0.9);
        assert_eq!(spawner.pending(), 0.0);
        assert_eq!(spawner.advance(0.5), 0);
        assert_eq!(spawner.advance(0.5), 1);
    }

    #[test]
    fn test_spawn_respects_cap() {
        let mut state = GameState::new(3, Tuning::default());
        let cap = state.difficulty.max_concurrent;
        for _ in 0..cap {
            assert!(try_spawn(&mut state).is_some());
        }
        assert_eq!(try_spawn(&mut state), None);
        assert_eq!(state.entities.len(), cap);
    }

    #[test]
    fn test_spawned_entity_placement() {
        let tuning = Tuning::default();
        let mut state = GameState::new(11, tuning.clone());
        for _ in 0..50 {
            let id = spawn_entity(&mut state, Category::Common);
            let entity = state.entities.iter().find(|e| e.id == id).unwrap();
            let (min_x, max_x) = tuning.spawn_x_range;
            assert!(entity.pos.x >= min_x && entity.pos.x <= max_x);
            assert_eq!(entity.pos.y, tuning.spawn_y);
            state.entities.clear();
        }
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut state = GameState::new(5, Tuning::default());
        let a = spawn_entity(&mut state, Category::Common);
        state.entities.clear();
        let b = spawn_entity(&mut state, Category::Common);
        assert_ne!(a, b);
    }

    #[test]
    fn test_run_spawner_emits_events() {
        let mut state = GameState::new(9, Tuning::default());
        run_spawner(&mut state, 1.2 * 3.0 + 0.01);
        assert_eq!(state.entities.len(), 3);
        let spawned = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Spawned { .. }))
            .count();
        assert_eq!(spawned, 3);
    }
}
