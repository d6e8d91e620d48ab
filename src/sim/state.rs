//! Game state and command surface
//!
//! `GameState` is the single owner of everything the simulation mutates.
//! Presentation reads it through the accessors and changes it only through
//! the command methods, each of which either applies completely or returns a
//! `CommandError` with the state untouched.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::economy::{Inventory, Resource, fuel_price};
use super::encounter::{Effect, Encounter};
use super::overrides::OverrideTable;
use super::rng::{STREAM_SESSION, SimRng};
use super::voyage::{Voyage, VoyageState};
use super::world::{Island, generate_islands};
use crate::config::GameConfig;
use crate::consts::*;
use crate::error::CommandError;

/// Encounter marks are drawn from this progress window
pub const ENCOUNTER_WINDOW: (f32, f32) = (0.2, 0.8);

/// The boat's pose in the world plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boat {
    pub pos: Vec2,
    /// Heading in radians
    pub angle: f32,
}

/// Things presentation may want to react to, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted,
    Departed { from: usize, to: usize },
    EncounterStarted { text: String },
    EncounterResolved { option: usize },
    FuelConsumed { remaining: u32 },
    /// Voyage complete; presentation should offer the next destination
    Arrived { island: usize, move_count: u32 },
    /// Fuel ran out at sea; the state has been reset
    GameOver { move_count: u32, money: u32 },
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) config: GameConfig,
    /// Islands as generated, restored on game over
    initial_islands: Vec<Island>,
    pub(crate) islands: Vec<Island>,
    pub(crate) boat: Boat,
    pub(crate) voyage: VoyageState,
    pub(crate) current_dock: usize,
    pub(crate) inventory: Inventory,
    pub(crate) money: u32,
    /// Completed voyages
    pub(crate) move_count: u32,
    /// Distance sailed since the last unit of fuel was burnt
    pub(crate) fuel_distance: f32,
    pub(crate) time_scale: f32,
    pub(crate) started: bool,
    pub(crate) game_over: bool,
    /// Simulation tick counter
    pub(crate) time_ticks: u64,
    pub(crate) rng: SimRng,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Generate the world from `config` and place the boat at the starting dock
    pub fn new(config: GameConfig, overrides: &OverrideTable) -> Self {
        let islands = generate_islands(&config.world, overrides);
        Self::with_islands(config, islands)
    }

    /// Build a state around an already generated world
    pub fn with_islands(config: GameConfig, islands: Vec<Island>) -> Self {
        let mut start = config.starting_island;
        if start >= islands.len() {
            log::warn!(
                "Starting island {} was not generated ({} islands); starting at 0",
                start,
                islands.len()
            );
            start = 0;
        }
        let boat = Boat {
            pos: islands
                .get(start)
                .map(Island::dock_position)
                .unwrap_or(Vec2::ZERO),
            angle: DOCKED_HEADING,
        };

        let mut state = Self {
            rng: SimRng::new(config.world.seed, STREAM_SESSION),
            inventory: Inventory::with_fuel(config.starting_fuel),
            money: config.starting_money,
            config,
            initial_islands: islands.clone(),
            islands,
            boat,
            voyage: VoyageState::Docked,
            current_dock: start,
            move_count: 0,
            fuel_distance: 0.0,
            time_scale: 1.0,
            started: false,
            game_over: false,
            time_ticks: 0,
            events: Vec::new(),
        };
        state.reroll_deals();
        state
    }

    // === Read surface ===

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    pub fn island(&self, index: usize) -> Option<&Island> {
        self.islands.get(index)
    }

    pub fn boat(&self) -> Boat {
        self.boat
    }

    pub fn voyage_state(&self) -> &VoyageState {
        &self.voyage
    }

    /// The edge being sailed, if not docked
    pub fn voyage(&self) -> Option<&Voyage> {
        self.voyage.voyage()
    }

    pub fn voyage_progress(&self) -> Option<f32> {
        self.voyage().map(|v| v.t)
    }

    pub fn active_encounter(&self) -> Option<&Encounter> {
        self.voyage.encounter()
    }

    pub fn is_docked(&self) -> bool {
        self.voyage.is_docked()
    }

    /// Index of the island the boat is moored at (or last left)
    pub fn current_dock(&self) -> usize {
        self.current_dock
    }

    pub fn current_island(&self) -> Option<&Island> {
        self.islands.get(self.current_dock)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn fuel(&self) -> u32 {
        self.inventory.get(Resource::Fuel)
    }

    pub fn money(&self) -> u32 {
        self.money
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn fuel_distance(&self) -> f32 {
        self.fuel_distance
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// True after fuel ran out, until the next start
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Trading price at the current dock (None while at sea)
    pub fn dock_price(&self, resource: Resource) -> Option<u32> {
        if !self.is_docked() {
            return None;
        }
        self.current_island()?.prices.price(resource)
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    // === Commands ===

    pub fn start(&mut self) -> Result<(), CommandError> {
        if self.started {
            return Err(CommandError::AlreadyStarted);
        }
        self.started = true;
        self.game_over = false;
        log::info!(
            "Session started at {} with {} coins, {} fuel",
            self.current_island().map(|i| i.name.as_str()).unwrap_or("open sea"),
            self.money,
            self.fuel()
        );
        self.push_event(GameEvent::SessionStarted);
        Ok(())
    }

    /// Begin a voyage to a neighbour of the current dock
    pub fn select_destination(&mut self, to: usize) -> Result<(), CommandError> {
        self.require_docked()?;
        let from = self.current_dock;
        let island = self
            .islands
            .get(from)
            .ok_or(CommandError::UnknownIsland(from))?;
        if to >= self.islands.len() {
            return Err(CommandError::UnknownIsland(to));
        }
        if !island.is_neighbour(to) {
            return Err(CommandError::NotNeighbour { from, to });
        }
        let curve = *island
            .curve_to(to)
            .ok_or(CommandError::MissingCurve { from, to })?;

        let encounter_at = if self.rng.chance(self.config.encounter_chance) {
            let (lo, hi) = ENCOUNTER_WINDOW;
            Some(self.rng.range_f32(lo, hi))
        } else {
            None
        };
        let voyage = Voyage::new(from, to, curve, encounter_at);
        let target = voyage.initial_heading(self.boat.angle);
        log::debug!(
            "Departing {} -> {} (encounter at {:?})",
            from,
            to,
            encounter_at
        );
        self.voyage = VoyageState::Rotating { voyage, target };
        self.push_event(GameEvent::Departed { from, to });
        Ok(())
    }

    pub fn buy(&mut self, resource: Resource) -> Result<(), CommandError> {
        let price = self.trade_price(resource)?;
        if self.money < price {
            return Err(CommandError::InsufficientFunds {
                resource,
                price,
                money: self.money,
            });
        }
        self.money -= price;
        self.inventory.adjust(resource, 1);
        Ok(())
    }

    pub fn sell(&mut self, resource: Resource) -> Result<(), CommandError> {
        let price = self.trade_price(resource)?;
        if !self.inventory.take_one(resource) {
            return Err(CommandError::OutOfStock(resource));
        }
        self.money = self.money.saturating_add(price);
        Ok(())
    }

    /// Apply the chosen option and resume the voyage
    pub fn resolve_encounter(&mut self, option: usize) -> Result<(), CommandError> {
        let effects = match &self.voyage {
            VoyageState::Encounter { encounter, .. } => encounter
                .options
                .get(option)
                .map(|o| o.effects.clone())
                .ok_or(CommandError::InvalidOption(option))?,
            _ => return Err(CommandError::NoActiveEncounter),
        };
        for effect in effects {
            self.apply_effect(effect);
        }
        if let VoyageState::Encounter { mut voyage, .. } = std::mem::take(&mut self.voyage) {
            voyage.encounter_at = None;
            self.voyage = VoyageState::Travelling { voyage };
        }
        self.push_event(GameEvent::EncounterResolved { option });
        Ok(())
    }

    pub fn set_time_scale(&mut self, multiplier: f32) -> Result<(), CommandError> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(CommandError::InvalidTimeScale(multiplier));
        }
        self.time_scale = multiplier;
        Ok(())
    }

    /// Switch between normal speed and fast-forward; returns the new multiplier
    pub fn toggle_time_scale(&mut self) -> f32 {
        self.time_scale = if self.time_scale > 1.0 {
            1.0
        } else {
            FAST_TIME_SCALE
        };
        self.time_scale
    }

    /// Add or remove units, clamped at zero; returns the new quantity
    pub fn adjust_inventory(&mut self, resource: Resource, delta: i64) -> u32 {
        self.inventory.adjust(resource, delta)
    }

    /// Add or remove coins, saturating at zero; returns the new balance
    pub fn adjust_money(&mut self, delta: i64) -> u32 {
        let next = (self.money as i64).saturating_add(delta).clamp(0, u32::MAX as i64);
        self.money = next as u32;
        self.money
    }

    /// Move the boat and burn fuel for the distance covered
    ///
    /// Returns `false` if fuel ran out, in which case the state has been
    /// reset and the caller must stop advancing it.
    pub fn move_boat(&mut self, pos: Vec2, angle: f32) -> bool {
        let moved = self.boat.pos.distance(pos);
        self.boat = Boat { pos, angle };
        if moved <= 0.0 || !moved.is_finite() {
            return true;
        }
        self.fuel_distance += moved;
        let unit = self.config.fuel_unit_distance;
        while self.fuel_distance >= unit {
            self.fuel_distance -= unit;
            if !self.inventory.take_one(Resource::Fuel) {
                self.fail_out_of_fuel();
                return false;
            }
            let remaining = self.fuel();
            self.push_event(GameEvent::FuelConsumed { remaining });
        }
        true
    }

    // === Internal transitions ===

    fn require_docked(&self) -> Result<(), CommandError> {
        if !self.started {
            return Err(CommandError::NotStarted);
        }
        if !self.is_docked() {
            return Err(CommandError::NotDocked);
        }
        Ok(())
    }

    fn trade_price(&self, resource: Resource) -> Result<u32, CommandError> {
        self.require_docked()?;
        let island = self
            .current_island()
            .ok_or(CommandError::UnknownIsland(self.current_dock))?;
        island
            .prices
            .price(resource)
            .ok_or(CommandError::NotTraded(resource))
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Inventory { resource, delta } => {
                self.inventory.adjust(resource, delta as i64);
            }
            Effect::Money(delta) => {
                self.adjust_money(delta as i64);
            }
        }
    }

    fn reroll_deals(&mut self) {
        for island in &mut self.islands {
            island.prices.reroll_deals(&mut self.rng);
        }
    }

    /// Finish the current voyage at `island`
    pub(crate) fn arrive(&mut self, island: usize) {
        self.voyage = VoyageState::Docked;
        self.current_dock = island;
        self.boat.angle = DOCKED_HEADING;
        self.move_count += 1;

        let price = fuel_price(self.move_count);
        for isl in &mut self.islands {
            isl.prices.set_fuel_price(price);
        }
        self.reroll_deals();

        log::info!(
            "Arrived at {} (voyage {}, fuel now {} coins)",
            self.current_island().map(|i| i.name.as_str()).unwrap_or("?"),
            self.move_count,
            price
        );
        self.push_event(GameEvent::Arrived {
            island,
            move_count: self.move_count,
        });
    }

    /// Fuel owed with an empty tank: back to the initial configuration
    fn fail_out_of_fuel(&mut self) {
        let (move_count, money) = (self.move_count, self.money);
        log::info!(
            "Out of fuel after {} voyages with {} coins - game over",
            move_count,
            money
        );
        let mut fresh = Self::with_islands(self.config.clone(), self.initial_islands.clone());
        // Continue the session stream so the next run gets new deals and encounters
        fresh.rng = self.rng.clone();
        fresh.reroll_deals();
        fresh.game_over = true;
        fresh.events = std::mem::take(&mut self.events);
        fresh.events.push(GameEvent::GameOver { move_count, money });
        *self = fresh;
    }
}
