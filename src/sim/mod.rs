//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (one stream per concern)
//! - Stable iteration order (by island index)
//! - No rendering or platform dependencies

pub mod bezier;
pub mod economy;
pub mod encounter;
pub mod overrides;
pub mod rng;
pub mod state;
pub mod tick;
pub mod voyage;
pub mod world;

#[cfg(test)]
pub(crate) mod fixtures;

pub use bezier::{CubicBezier, smoothstep};
pub use economy::{Inventory, InventorySlot, PriceTable, Resource, fuel_price};
pub use encounter::{Effect, Encounter, EncounterOption};
pub use overrides::{ControlPoints, IslandOverride, LighthouseOverride, OverrideTable};
pub use rng::SimRng;
pub use state::{Boat, GameEvent, GameState};
pub use tick::tick;
pub use voyage::{Voyage, VoyageState};
pub use world::{Island, Lighthouse, Terrain, generate_islands};
