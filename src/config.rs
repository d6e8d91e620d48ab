//! Game balance and world generation settings
//!
//! Every field has a default, so a JSON document only needs to name the
//! values it changes.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Island layout parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Islands requested (fewer may be placed)
    pub count: usize,
    /// Layout seed
    pub seed: u64,
    /// Side length of the square islands are scattered in
    pub spread: f32,
    /// Minimum distance between island centers
    pub buffer: f32,
    /// Placement attempts per island before giving up on it
    pub max_tries: u32,
    /// Islands closer than this are neighbours
    pub neighbour_distance: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            count: 50,
            seed: 12345,
            spread: 2000.0,
            buffer: 240.0,
            max_tries: 1000,
            neighbour_distance: NEIGHBOUR_DISTANCE,
        }
    }
}

/// Full game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,

    // === Session start ===
    pub starting_island: usize,
    pub starting_money: u32,
    pub starting_fuel: u32,

    // === Voyage ===
    /// Progress per second along a curve
    pub boat_speed: f32,
    /// Radians per second
    pub rotate_speed: f32,
    /// Distance per unit of fuel
    pub fuel_unit_distance: f32,
    /// Probability a voyage schedules an encounter (0.0 - 1.0)
    pub encounter_chance: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),

            starting_island: STARTING_ISLAND,
            starting_money: STARTING_MONEY,
            starting_fuel: STARTING_FUEL,

            boat_speed: BOAT_SPEED,
            rotate_speed: BOAT_ROTATE_SPEED,
            fuel_unit_distance: FUEL_UNIT_DISTANCE,
            encounter_chance: 0.5,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Same configuration with a different layout seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.world.seed = seed;
        self
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("world.spread", self.world.spread),
            ("boat_speed", self.boat_speed),
            ("rotate_speed", self.rotate_speed),
            ("fuel_unit_distance", self.fuel_unit_distance),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(field, format!("{value} is not positive")));
            }
        }
        for (field, value) in [
            ("world.buffer", self.world.buffer),
            ("world.neighbour_distance", self.world.neighbour_distance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(field, format!("{value} is negative")));
            }
        }
        if !(0.0..=1.0).contains(&self.encounter_chance) {
            return Err(ConfigError::invalid(
                "encounter_chance",
                format!("{} is outside 0..=1", self.encounter_chance),
            ));
        }
        if self.world.count == 0 {
            return Err(ConfigError::invalid("world.count", "at least one island is required"));
        }
        if self.world.max_tries == 0 {
            return Err(ConfigError::invalid("world.max_tries", "must allow at least one attempt"));
        }
        if self.starting_island >= self.world.count {
            return Err(ConfigError::invalid(
                "starting_island",
                format!("{} >= requested count {}", self.starting_island, self.world.count),
            ));
        }
        Ok(())
    }
}
