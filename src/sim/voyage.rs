//! Voyage phases
//!
//! The boat is always in exactly one of these phases. Every phase except
//! `Docked` carries the voyage it belongs to, and only `Encounter` carries an
//! encounter, so "encounter while docked" cannot be represented.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bezier::{CubicBezier, smoothstep};
use super::encounter::Encounter;
use crate::angle_delta;
use crate::consts::*;

/// An edge being traversed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voyage {
    pub from: usize,
    pub to: usize,
    pub curve: CubicBezier,
    /// Progress along the curve in [0, 1]
    pub t: f32,
    /// Progress at which an encounter interrupts the voyage
    pub encounter_at: Option<f32>,
}

impl Voyage {
    pub fn new(from: usize, to: usize, curve: CubicBezier, encounter_at: Option<f32>) -> Self {
        Self {
            from,
            to,
            curve,
            t: 0.0,
            encounter_at,
        }
    }

    /// Boat position at progress `t` (eased)
    pub fn position_at(&self, t: f32) -> Vec2 {
        self.curve.point(smoothstep(t))
    }

    /// Heading at progress `t`
    ///
    /// Close to arrival the heading snaps to the docked orientation so the
    /// boat does not spin on the shrinking end tangent. A curve that does not
    /// move keeps `current`.
    pub fn heading_at(&self, t: f32, current: f32) -> f32 {
        if t >= HEADING_SNAP_PROGRESS {
            return DOCKED_HEADING;
        }
        self.curve.heading(smoothstep(t)).unwrap_or(current)
    }

    /// Heading to turn to before setting off
    pub fn initial_heading(&self, current: f32) -> f32 {
        self.curve.heading(0.0).unwrap_or(current)
    }

    /// Progress after one step of `step`, and whether it crosses the encounter mark
    pub fn advance(&self, step: f32) -> Advance {
        let next = (self.t + step).min(1.0);
        match self.encounter_at {
            Some(mark) if self.t < mark && next >= mark => Advance::Encounter(mark),
            _ if next >= 1.0 => Advance::Arrived,
            _ => Advance::Moved(next),
        }
    }
}

/// Outcome of advancing progress by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    Moved(f32),
    /// Stopped at the encounter mark
    Encounter(f32),
    Arrived,
}

/// The boat's current phase
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum VoyageState {
    /// Moored at the current dock
    #[default]
    Docked,
    /// Turning in place toward the first tangent of the curve
    Rotating { voyage: Voyage, target: f32 },
    /// Moving along the curve
    Travelling { voyage: Voyage },
    /// Frozen mid-voyage until the encounter is resolved
    Encounter {
        voyage: Voyage,
        encounter: Encounter,
    },
}

impl VoyageState {
    pub fn is_docked(&self) -> bool {
        matches!(self, VoyageState::Docked)
    }

    pub fn voyage(&self) -> Option<&Voyage> {
        match self {
            VoyageState::Docked => None,
            VoyageState::Rotating { voyage, .. }
            | VoyageState::Travelling { voyage }
            | VoyageState::Encounter { voyage, .. } => Some(voyage),
        }
    }

    pub fn encounter(&self) -> Option<&Encounter> {
        match self {
            VoyageState::Encounter { encounter, .. } => Some(encounter),
            _ => None,
        }
    }
}

/// Turn `current` toward `target` by at most `max_step` along the short arc
///
/// Returns the new angle and whether the target has been reached.
pub fn rotate_toward(current: f32, target: f32, max_step: f32) -> (f32, bool) {
    let delta = angle_delta(current, target);
    if delta.abs() < ROTATION_EPSILON || delta.abs() <= max_step {
        return (target, true);
    }
    let next = current + delta.clamp(-max_step, max_step);
    let done = angle_delta(next, target).abs() < ROTATION_EPSILON;
    (if done { target } else { next }, done)
}
