//! Best-run tracking
//!
//! Two independent records, each stored as a plain decimal string in a
//! key-value store and written as soon as it is beaten.

use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;

/// Storage key for the most voyages completed in one session
pub const BEST_MOVES_KEY: &str = "sea_trader.best_moves";
/// Storage key for the most money held after a voyage
pub const BEST_MONEY_KEY: &str = "sea_trader.best_money";

/// Which records a finished voyage beat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Improvement {
    pub moves: bool,
    pub money: bool,
}

impl Improvement {
    pub fn any(&self) -> bool {
        self.moves || self.money
    }
}

/// Persisted personal bests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    pub best_moves: u32,
    pub best_money: u32,
}

impl HighScores {
    /// Create empty records
    pub fn new() -> Self {
        Self::default()
    }

    /// Read both records; missing or malformed values count as zero
    pub fn load(store: &impl KeyValueStore) -> Self {
        let scores = Self {
            best_moves: read_value(store, BEST_MOVES_KEY),
            best_money: read_value(store, BEST_MONEY_KEY),
        };
        log::info!(
            "Loaded high scores: {} voyages, {} coins",
            scores.best_moves,
            scores.best_money
        );
        scores
    }

    /// Compare a voyage result against the records, saving each one it beats
    pub fn record(&mut self, moves: u32, money: u32, store: &mut impl KeyValueStore) -> Improvement {
        let mut improved = Improvement::default();
        if moves > self.best_moves {
            self.best_moves = moves;
            store.set(BEST_MOVES_KEY, &moves.to_string());
            improved.moves = true;
        }
        if money > self.best_money {
            self.best_money = money;
            store.set(BEST_MONEY_KEY, &money.to_string());
            improved.money = true;
        }
        if improved.any() {
            log::info!(
                "New high score: {} voyages, {} coins",
                self.best_moves,
                self.best_money
            );
        }
        improved
    }
}

fn read_value(store: &impl KeyValueStore, key: &str) -> u32 {
    match store.get(key) {
        None => 0,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring malformed {} value {:?}", key, raw);
            0
        }),
    }
}
