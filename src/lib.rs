//! Sea Trader - island-hopping voyage and trading simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (island layout, voyages, economy, encounters)
//! - `session`: Command controller that owns the state and persists high scores
//! - `platform`: Browser/native platform abstraction (logging, key-value storage)
//! - `config`: Data-driven game balance
//! - `highscores`: Best move count / best money tracking

pub mod config;
pub mod error;
pub mod highscores;
pub mod platform;
pub mod session;
pub mod sim;

pub use config::{GameConfig, WorldConfig};
pub use error::{CommandError, ConfigError};
pub use highscores::HighScores;
pub use session::Session;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Longest step a single tick will integrate
    pub const MAX_TICK_DT: f32 = 0.1;

    /// Session defaults
    pub const STARTING_ISLAND: usize = 0;
    pub const STARTING_MONEY: u32 = 50;
    pub const STARTING_FUEL: u32 = 25;

    /// Voyage progress per second (t runs 0..1 along the curve)
    pub const BOAT_SPEED: f32 = 0.5;
    /// Boat turn rate in radians per second
    pub const BOAT_ROTATE_SPEED: f32 = 6.0;
    /// Distance sailed per unit of fuel
    pub const FUEL_UNIT_DISTANCE: f32 = 150.0;
    /// Islands closer than this are connected by an edge
    pub const NEIGHBOUR_DISTANCE: f32 = 600.0;

    /// Heading the boat takes while moored
    pub const DOCKED_HEADING: f32 = std::f32::consts::FRAC_PI_2;
    /// Remaining angle below which rotation is considered done
    pub const ROTATION_EPSILON: f32 = 0.01;
    /// Forward-difference step used to sample curve tangents
    pub const TANGENT_EPSILON: f32 = 1e-3;
    /// Past this progress the heading snaps to `DOCKED_HEADING`
    pub const HEADING_SNAP_PROGRESS: f32 = 0.95;

    /// Multiplier used by the fast-forward toggle
    pub const FAST_TIME_SCALE: f32 = 5.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Shortest signed angular difference from `from` to `to`, in [-π, π)
#[inline]
pub fn angle_delta(from: f32, to: f32) -> f32 {
    normalize_angle(normalize_angle(to) - normalize_angle(from))
}

/// wasm entry: route `log` to the browser console
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_start() {
    platform::init_logging();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(-2.5 * PI) + 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
        for a in [PI, 3.0 * PI, -3.0 * PI, 7.25] {
            let n = normalize_angle(a);
            assert!((-PI..PI).contains(&n), "{a} -> {n}");
            // Same direction as the input
            assert!((n.sin() - a.sin()).abs() < 1e-4 && (n.cos() - a.cos()).abs() < 1e-4);
        }
    }

    #[test]
    fn test_angle_delta_takes_short_way() {
        // 170° -> -170° is +20°, not -340°
        let d = angle_delta(170.0_f32.to_radians(), -170.0_f32.to_radians());
        assert!((d - 20.0_f32.to_radians()).abs() < 1e-4);

        let d = angle_delta(0.0, -PI / 2.0);
        assert!((d + PI / 2.0).abs() < 1e-6);
    }
}
