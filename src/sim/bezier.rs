//! Cubic Bézier travel curves
//!
//! Each neighbour edge carries one curve from the origin's docking point to
//! the destination's docking point. The boat samples it every tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TANGENT_EPSILON;

/// Fraction of the chord at which the default control points sit
const CONTROL_ALONG: (f32, f32) = (0.1, 0.9);
/// Perpendicular bend as a fraction of chord length
const CONTROL_BEND: f32 = 0.25 * 0.5;
/// Squared sample distance below which a curve is treated as not moving
const MIN_TANGENT_SQ: f32 = 1e-10;

/// A cubic Bézier curve in world-plane coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub start: Vec2,
    pub control1: Vec2,
    pub control2: Vec2,
    pub end: Vec2,
}

impl CubicBezier {
    pub fn new(start: Vec2, control1: Vec2, control2: Vec2, end: Vec2) -> Self {
        Self {
            start,
            control1,
            control2,
            end,
        }
    }

    /// Default gentle bend between two docking points
    ///
    /// Control points sit at 10% and 90% of the chord, pushed to the left of
    /// the direction of travel. A zero-length chord yields a degenerate curve
    /// with every point at `start`.
    pub fn between(start: Vec2, end: Vec2) -> Self {
        let chord = end - start;
        let len = chord.length();
        let perp = Vec2::new(-chord.y, chord.x).normalize_or_zero();
        let bend = perp * len * CONTROL_BEND;
        Self {
            start,
            control1: start + chord * CONTROL_ALONG.0 + bend,
            control2: start + chord * CONTROL_ALONG.1 + bend,
            end,
        }
    }

    /// Straight curve with controls on the chord (used for tests and overrides)
    pub fn straight(start: Vec2, end: Vec2) -> Self {
        let chord = end - start;
        Self {
            start,
            control1: start + chord / 3.0,
            control2: start + chord * (2.0 / 3.0),
            end,
        }
    }

    /// Position at parameter `t` (clamped to [0, 1])
    pub fn point(&self, t: f32) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        let mt = 1.0 - t;
        self.start * (mt * mt * mt)
            + self.control1 * (3.0 * mt * mt * t)
            + self.control2 * (3.0 * mt * t * t)
            + self.end * (t * t * t)
    }

    /// Direction of travel at `t` by forward difference
    ///
    /// Near `t = 1` the difference is taken backwards so the sample stays on
    /// the curve. Returns `Vec2::ZERO` for a degenerate curve.
    pub fn tangent(&self, t: f32) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        let (a, b) = if t + TANGENT_EPSILON <= 1.0 {
            (t, t + TANGENT_EPSILON)
        } else {
            (t - TANGENT_EPSILON, t)
        };
        let diff = self.point(b) - self.point(a);
        if diff.length_squared() < MIN_TANGENT_SQ {
            // Rounding noise on a curve that does not move
            return Vec2::ZERO;
        }
        diff.normalize()
    }

    /// Heading angle of the tangent at `t`, if the curve moves there
    pub fn heading(&self, t: f32) -> Option<f32> {
        let dir = self.tangent(t);
        if dir == Vec2::ZERO {
            None
        } else {
            Some(dir.y.atan2(dir.x))
        }
    }

}

/// Ease-in-out remap `t² (3 - 2t)` so the boat starts and ends slowly
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
