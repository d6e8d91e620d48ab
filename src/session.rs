//! Game session controller
//!
//! Owns the simulation state together with the high-score records and the
//! store they persist to. Presentation issues commands here and reads the
//! state back through `state()`.

use crate::config::GameConfig;
use crate::error::CommandError;
use crate::highscores::HighScores;
use crate::platform::KeyValueStore;
use crate::sim::{self, GameEvent, GameState, OverrideTable, Resource};

pub struct Session<S: KeyValueStore> {
    state: GameState,
    high_scores: HighScores,
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    /// Generate a world and load high scores from `store`
    pub fn new(config: GameConfig, overrides: &OverrideTable, store: S) -> Self {
        let state = GameState::new(config, overrides);
        log::info!(
            "World ready: {} islands (seed {})",
            state.islands().len(),
            state.config().world.seed
        );
        Self::with_state(state, store)
    }

    /// Wrap an existing state (e.g. a restored snapshot)
    pub fn with_state(state: GameState, store: S) -> Self {
        let high_scores = HighScores::load(&store);
        Self {
            state,
            high_scores,
            store,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn high_scores(&self) -> HighScores {
        self.high_scores
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the store, e.g. to reuse it for the next session
    pub fn into_store(self) -> S {
        self.store
    }

    // === Commands ===

    pub fn start_session(&mut self) -> Result<(), CommandError> {
        logged("start_session", self.state.start())
    }

    pub fn select_destination(&mut self, island: usize) -> Result<(), CommandError> {
        logged("select_destination", self.state.select_destination(island))
    }

    pub fn buy(&mut self, resource: Resource) -> Result<(), CommandError> {
        logged("buy", self.state.buy(resource))
    }

    pub fn sell(&mut self, resource: Resource) -> Result<(), CommandError> {
        logged("sell", self.state.sell(resource))
    }

    pub fn resolve_encounter(&mut self, option: usize) -> Result<(), CommandError> {
        logged("resolve_encounter", self.state.resolve_encounter(option))
    }

    pub fn set_time_scale(&mut self, multiplier: f32) -> Result<(), CommandError> {
        logged("set_time_scale", self.state.set_time_scale(multiplier))
    }

    pub fn toggle_time_scale(&mut self) -> f32 {
        self.state.toggle_time_scale()
    }

    pub fn adjust_inventory(&mut self, resource: Resource, delta: i64) -> u32 {
        self.state.adjust_inventory(resource, delta)
    }

    pub fn adjust_money(&mut self, delta: i64) -> u32 {
        self.state.adjust_money(delta)
    }

    /// Advance the simulation and return everything that happened
    ///
    /// Command events queued since the previous tick are returned too.
    pub fn tick(&mut self, dt: f32) -> Vec<GameEvent> {
        sim::tick(&mut self.state, dt);
        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::Arrived { move_count, .. } = event {
                self.high_scores
                    .record(*move_count, self.state.money(), &mut self.store);
            }
        }
        events
    }
}

fn logged(command: &str, result: Result<(), CommandError>) -> Result<(), CommandError> {
    if let Err(err) = &result {
        log::debug!("{} rejected: {}", command, err);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::highscores::{BEST_MONEY_KEY, BEST_MOVES_KEY};
    use crate::platform::MemoryStore;
    use crate::sim::fixtures::{line_config, line_islands};

    fn session(store: MemoryStore) -> Session<MemoryStore> {
        let state = GameState::with_islands(line_config(), line_islands(3, 300.0));
        Session::with_state(state, store)
    }

    fn sail(session: &mut Session<MemoryStore>) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..2000 {
            events.extend(session.tick(SIM_DT));
            if session.state().is_docked() {
                break;
            }
        }
        events
    }

    #[test]
    fn test_commands_before_start_are_rejected() {
        let mut session = session(MemoryStore::new());
        assert_eq!(session.select_destination(1), Err(CommandError::NotStarted));
        assert_eq!(session.buy(Resource::Fuel), Err(CommandError::NotStarted));
        assert!(session.tick(SIM_DT).is_empty());
    }

    #[test]
    fn test_start_emits_event() {
        let mut session = session(MemoryStore::new());
        session.start_session().expect("starts");
        assert_eq!(session.tick(SIM_DT), vec![GameEvent::SessionStarted]);
        assert_eq!(session.start_session(), Err(CommandError::AlreadyStarted));
    }

    #[test]
    fn test_arrival_records_high_scores() {
        let mut session = session(MemoryStore::new());
        session.start_session().expect("starts");
        session.select_destination(1).expect("neighbour");
        let events = sail(&mut session);

        assert!(events.contains(&GameEvent::Departed { from: 0, to: 1 }));
        assert!(events.contains(&GameEvent::Arrived {
            island: 1,
            move_count: 1
        }));
        assert_eq!(session.high_scores().best_moves, 1);
        assert_eq!(session.high_scores().best_money, STARTING_MONEY);
        assert_eq!(session.store().get(BEST_MOVES_KEY).as_deref(), Some("1"));
        assert_eq!(
            session.store().get(BEST_MONEY_KEY),
            Some(STARTING_MONEY.to_string())
        );
    }

    #[test]
    fn test_existing_records_survive_worse_run() {
        let mut store = MemoryStore::new();
        store.set(BEST_MOVES_KEY, "10");
        store.set(BEST_MONEY_KEY, "20");

        let mut session = session(store);
        session.start_session().expect("starts");
        session.select_destination(1).expect("neighbour");
        sail(&mut session);

        let scores = session.high_scores();
        assert_eq!(scores.best_moves, 10);
        assert_eq!(scores.best_money, STARTING_MONEY);
        assert_eq!(session.into_store().get(BEST_MOVES_KEY).as_deref(), Some("10"));
    }

    #[test]
    fn test_generated_session() {
        let session = Session::new(GameConfig::default(), &OverrideTable::new(), MemoryStore::new());
        assert!(!session.state().is_started());
        assert_eq!(session.high_scores(), HighScores::new());
        assert!(!session.state().islands().is_empty());
    }

    #[test]
    fn test_passthrough_adjustments() {
        let mut session = session(MemoryStore::new());
        assert_eq!(session.adjust_money(-1000), 0);
        assert_eq!(session.adjust_inventory(Resource::Spices, 3), 3);
        assert_eq!(session.toggle_time_scale(), FAST_TIME_SCALE);
        assert!(session.set_time_scale(-1.0).is_err());
        assert_eq!(session.state().time_scale(), FAST_TIME_SCALE);
    }
}
