//! Run lifecycle: start, per-frame driving, stop, game over
//!
//! `GameSession` owns the `GameState` plus the collaborators around it. The
//! platform layer schedules frames and feeds input; everything that decides
//! what happens lives here or in `sim`.

use glam::Vec2;

use crate::config::Tuning;
use crate::persistence::{BestScoreStore, record_best};
use crate::sim::{Entity, GameEvent, GamePhase, GameState, Player, TickInput, tick};

/// Notified whenever a catch raises the score
pub trait ScoreObserver {
    fn on_score_milestone(&mut self, score: u32);
}

/// Observer that ignores everything
#[derive(Debug, Default)]
pub struct NoObserver;

impl ScoreObserver for NoObserver {
    fn on_score_milestone(&mut self, _score: u32) {}
}

/// Presentation layer
///
/// Positions are percentages of the play-field (top-left corner).
pub trait RenderSink {
    /// A new item needs a visual handle
    fn entity_spawned(&mut self, entity: &Entity);
    /// An item was caught or escaped; release its handle
    fn entity_removed(&mut self, id: u32);
    /// Called every frame with every live item and the player
    fn draw(&mut self, player: Vec2, entities: &[Entity]);
    fn score_changed(&mut self, score: u32);
    fn lives_changed(&mut self, lives: u32);
    /// Visual cue that the run is over
    fn game_ended(&mut self, score: u32);
    /// Drop every visual handle (reset)
    fn clear(&mut self);
}

/// Sink that draws nothing
#[derive(Debug, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn entity_spawned(&mut self, _entity: &Entity) {}
    fn entity_removed(&mut self, _id: u32) {}
    fn draw(&mut self, _player: Vec2, _entities: &[Entity]) {}
    fn score_changed(&mut self, _score: u32) {}
    fn lives_changed(&mut self, _lives: u32) {}
    fn game_ended(&mut self, _score: u32) {}
    fn clear(&mut self) {}
}

/// One game, from start to game over (and again)
pub struct GameSession {
    state: GameState,
    tuning: Tuning,
    store: Box<dyn BestScoreStore>,
    observer: Box<dyn ScoreObserver>,
    sink: Box<dyn RenderSink>,
}

impl GameSession {
    pub fn new(
        tuning: Tuning,
        store: Box<dyn BestScoreStore>,
        observer: Box<dyn ScoreObserver>,
        sink: Box<dyn RenderSink>,
    ) -> Self {
        Self {
            state: GameState::new(0, tuning.clone()),
            tuning,
            store,
            observer,
            sink,
        }
    }

    /// Session with no persistence, observer or rendering
    pub fn headless(tuning: Tuning, store: Box<dyn BestScoreStore>) -> Self {
        Self::new(tuning, store, Box::new(NoObserver), Box::new(NullSink))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for hosts that need to place the player (layout)
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn store(&self) -> &dyn BestScoreStore {
        self.store.as_ref()
    }

    /// Begin a fresh run
    ///
    /// Everything is reset: score, lives, items, difficulty, effects, timers.
    pub fn start(&mut self, seed: u64) {
        let player = Player::new(&self.tuning);
        self.start_with_player(seed, player.pos, player.size);
    }

    /// Begin a fresh run with the player where the host laid it out
    ///
    /// `pos` and `size` are play-field percentages.
    pub fn start_with_player(&mut self, seed: u64, pos: Vec2, size: Vec2) {
        self.sink.clear();
        self.state = GameState::new(seed, self.tuning.clone());
        self.state.player.pos = pos;
        self.state.player.size = size;
        self.state.phase = GamePhase::Running;
        self.sink.score_changed(self.state.score);
        self.sink.lives_changed(self.state.lives);
        self.sink.draw(self.state.player.pos, &self.state.entities);
        log::info!("Run started (seed {})", seed);
    }

    /// Halt the run; safe to call any number of times
    ///
    /// A finished run stays `GameOver`.
    pub fn stop(&mut self) {
        if self.state.phase == GamePhase::Running {
            self.state.phase = GamePhase::Stopped;
            log::info!("Run stopped at score {}", self.state.score);
        }
    }

    /// Drop every visual handle without touching the game state
    pub fn clear_view(&mut self) {
        self.sink.clear();
    }

    /// Advance one frame. Returns whether the run is still going.
    pub fn frame(&mut self, input: &TickInput, dt: f32) -> bool {
        if self.state.phase != GamePhase::Running {
            return false;
        }

        tick(&mut self.state, input, dt);
        let events = self.state.drain_events();
        self.dispatch(&events);
        self.sink.draw(self.state.player.pos, &self.state.entities);

        if self.state.phase == GamePhase::GameOver {
            self.finish();
            return false;
        }
        true
    }

    fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::Spawned { id, .. } => {
                    if let Some(entity) = self.state.entities.iter().find(|e| e.id == *id) {
                        self.sink.entity_spawned(entity);
                    }
                }
                GameEvent::Caught { id, .. } | GameEvent::Escaped { id } => {
                    self.sink.entity_removed(*id);
                }
                GameEvent::Scored { score } => {
                    self.sink.score_changed(*score);
                    self.observer.on_score_milestone(*score);
                }
                GameEvent::Penalized { score } => self.sink.score_changed(*score),
                GameEvent::LivesChanged { lives } => self.sink.lives_changed(*lives),
                GameEvent::ShieldConsumed
                | GameEvent::EffectActivated(_)
                | GameEvent::EffectExpired(_)
                | GameEvent::DifficultyChanged(_)
                | GameEvent::GameOver { .. } => {}
            }
        }
    }

    /// Terminal bookkeeping: best score and the "ended" cue
    fn finish(&mut self) {
        let score = self.state.score;
        if let Err(err) = record_best(self.store.as_mut(), score) {
            log::warn!("Could not save best score {}: {}", score, err);
        }
        self.sink.game_ended(score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::persistence::MemoryBestScore;
    use crate::sim::Category;
    use crate::sim::spawner::spawn_entity;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Log {
        spawned: Vec<u32>,
        removed: Vec<u32>,
        scores: Vec<u32>,
        lives: Vec<u32>,
        milestones: Vec<u32>,
        ended: Option<u32>,
        draws: usize,
        clears: usize,
        /// Player position and (id, position) of every item from the latest draw
        last_draw: Option<(Vec2, Vec<(u32, Vec2)>)>,
    }

    struct RecordingSink(Rc<RefCell<Log>>);

    impl RenderSink for RecordingSink {
        fn entity_spawned(&mut self, entity: &Entity) {
            self.0.borrow_mut().spawned.push(entity.id);
        }
        fn entity_removed(&mut self, id: u32) {
            self.0.borrow_mut().removed.push(id);
        }
        fn draw(&mut self, player: Vec2, entities: &[Entity]) {
            let mut log = self.0.borrow_mut();
            log.draws += 1;
            log.last_draw = Some((player, entities.iter().map(|e| (e.id, e.pos)).collect()));
        }
        fn score_changed(&mut self, score: u32) {
            self.0.borrow_mut().scores.push(score);
        }
        fn lives_changed(&mut self, lives: u32) {
            self.0.borrow_mut().lives.push(lives);
        }
        fn game_ended(&mut self, score: u32) {
            self.0.borrow_mut().ended = Some(score);
        }
        fn clear(&mut self) {
            self.0.borrow_mut().clears += 1;
        }
    }

    struct RecordingObserver(Rc<RefCell<Log>>);

    impl ScoreObserver for RecordingObserver {
        fn on_score_milestone(&mut self, score: u32) {
            self.0.borrow_mut().milestones.push(score);
        }
    }

    struct SharedStore(Rc<RefCell<MemoryBestScore>>);

    impl BestScoreStore for SharedStore {
        fn read_best(&self) -> Result<u32, StoreError> {
            self.0.borrow().read_best()
        }
        fn write_best(&mut self, score: u32) -> Result<(), StoreError> {
            self.0.borrow_mut().write_best(score)
        }
    }

    struct BrokenStore;

    impl BestScoreStore for BrokenStore {
        fn read_best(&self) -> Result<u32, StoreError> {
            Err(StoreError::new("CORS failure"))
        }
        fn write_best(&mut self, _score: u32) -> Result<(), StoreError> {
            Err(StoreError::new("CORS failure"))
        }
    }

    type Harness = (GameSession, Rc<RefCell<Log>>, Rc<RefCell<MemoryBestScore>>);

    fn session_with_log(best: u32) -> Harness {
        let log = Rc::new(RefCell::new(Log::default()));
        let store = Rc::new(RefCell::new(MemoryBestScore::with_best(best)));
        let session = GameSession::new(
            Tuning::default(),
            Box::new(SharedStore(store.clone())),
            Box::new(RecordingObserver(log.clone())),
            Box::new(RecordingSink(log.clone())),
        );
        (session, log, store)
    }

    fn drop_on_player(session: &mut GameSession, category: Category) -> u32 {
        let state = session.state_mut();
        let id = spawn_entity(state, category);
        let target = state.player.pos + Vec2::new(2.0, 2.0);
        if let Some(e) = state.entities.iter_mut().find(|e| e.id == id) {
            e.pos = target;
        }
        id
    }

    #[test]
    fn test_frame_before_start_is_noop() {
        let (mut session, log, _) = session_with_log(0);
        assert!(!session.frame(&TickInput::default(), 1.0));
        assert_eq!(log.borrow().draws, 0);
        assert_eq!(session.phase(), GamePhase::Stopped);
    }

    #[test]
    fn test_start_resets_everything() {
        let (mut session, log, _) = session_with_log(0);
        session.start(1);
        drop_on_player(&mut session, Category::Bonus);
        session.frame(&TickInput::default(), 0.0);
        assert_eq!(session.state().score, 10);

        session.start(2);
        let state = session.state();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert!(state.entities.is_empty());
        assert_eq!(state.difficulty, crate::sim::tier_for_score(0));
        assert!(!state.effects.shield_on());
        assert_eq!(state.spawner.pending(), 0.0);
        assert_eq!(log.borrow().clears, 2);
    }

    #[test]
    fn test_start_keeps_host_player_layout() {
        let (mut session, log, _) = session_with_log(0);
        let pos = Vec2::new(12.5, 70.0);
        let size = Vec2::new(8.0, 15.0);
        session.start_with_player(1, pos, size);

        assert_eq!(session.state().player.pos, pos);
        assert_eq!(session.state().player.size, size);
        let (drawn, _) = log.borrow().last_draw.clone().unwrap();
        assert_eq!(drawn, pos);

        // Without input the player stays where the page put it
        session.frame(&TickInput::default(), 0.05);
        let (drawn, _) = log.borrow().last_draw.clone().unwrap();
        assert_eq!(drawn.x, 12.5);
    }

    #[test]
    fn test_draw_receives_live_positions() {
        let (mut session, log, _) = session_with_log(0);
        session.start(1);
        let first = spawn_entity(session.state_mut(), Category::Common);
        let second = spawn_entity(session.state_mut(), Category::Hazard);
        session.frame(&TickInput::right(), 0.1);

        let expected: Vec<(u32, Vec2)> = session
            .state()
            .entities
            .iter()
            .map(|e| (e.id, e.pos))
            .collect();
        assert_eq!(expected.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![first, second]);

        let (player, items) = log.borrow().last_draw.clone().unwrap();
        assert_eq!(player, session.state().player.pos);
        assert_eq!(items, expected);
        // Items fell by 20 %/s * 0.1 s from the spawn line
        assert!((items[0].1.y - (session.state().tuning.spawn_y + 2.0)).abs() < 1e-5);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (mut session, _, _) = session_with_log(0);
        session.start(1);
        session.stop();
        let once = (session.phase(), session.state().score, session.state().lives);
        session.stop();
        let twice = (session.phase(), session.state().score, session.state().lives);
        assert_eq!(once, twice);
        assert_eq!(session.phase(), GamePhase::Stopped);
    }

    #[test]
    fn test_pending_frame_after_stop_does_nothing() {
        let (mut session, _, _) = session_with_log(0);
        session.start(1);
        drop_on_player(&mut session, Category::Common);
        session.stop();
        assert!(!session.frame(&TickInput::default(), 0.1));
        assert_eq!(session.state().score, 0);
        assert_eq!(session.state().entities.len(), 1);
    }

    #[test]
    fn test_events_reach_sink_and_observer() {
        let (mut session, log, _) = session_with_log(0);
        session.start(1);
        let common = drop_on_player(&mut session, Category::Common);
        let penalty = drop_on_player(&mut session, Category::Penalty);
        session.frame(&TickInput::default(), 0.0);

        let log = log.borrow();
        assert_eq!(log.removed, vec![common, penalty]);
        // Start writes 0, catch writes 1, penalty writes 0
        assert_eq!(log.scores, vec![0, 1, 0]);
        // Penalties are not milestones
        assert_eq!(log.milestones, vec![1]);
    }

    #[test]
    fn test_spawns_reach_sink() {
        let (mut session, log, _) = session_with_log(0);
        session.start(1);
        session.frame(&TickInput::default(), 1.25);
        let log = log.borrow();
        assert_eq!(log.spawned.len(), 1);
        assert_eq!(session.state().entities[0].id, log.spawned[0]);
    }

    #[test]
    fn test_game_over_records_best_and_stops() {
        let (mut session, log, store) = session_with_log(0);
        session.start(1);
        session.state_mut().score = 42;
        session.state_mut().lives = 1;
        drop_on_player(&mut session, Category::Hazard);

        assert!(!session.frame(&TickInput::default(), 0.0));
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(store.borrow().best(), 42);
        assert_eq!(log.borrow().ended, Some(42));

        // Stop after game over keeps the terminal phase
        session.stop();
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert!(!session.frame(&TickInput::default(), 1.0));
    }

    #[test]
    fn test_lower_score_keeps_previous_best() {
        let (mut session, _, store) = session_with_log(100);
        session.start(1);
        session.state_mut().lives = 1;
        drop_on_player(&mut session, Category::Hazard);
        session.frame(&TickInput::default(), 0.0);
        assert_eq!(store.borrow().best(), 100);
    }

    #[test]
    fn test_store_failure_does_not_block_game_over() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut session = GameSession::new(
            Tuning::default(),
            Box::new(BrokenStore),
            Box::new(NoObserver),
            Box::new(RecordingSink(log.clone())),
        );
        session.start(1);
        session.state_mut().lives = 1;
        drop_on_player(&mut session, Category::Hazard);
        session.frame(&TickInput::default(), 0.0);
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(log.borrow().ended, Some(0));
    }
}
