//! Angular geometry on the rim
//!
//! Everything here works on angles taken mod 2π:
//! - `AngularWindow`: symmetric window around a center angle (contact regions)
//! - `ArcSpan`: arc running counter-clockwise from a start angle (territories)
//! - `LensGeometry`: where an agent's disc and the arena wall cut each other

use serde::{Deserialize, Serialize};

use crate::{normalize_angle, wrap_angle};

/// Symmetric window `center ± half_width`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngularWindow {
    pub center: f32,
    pub half_width: f32,
}

impl AngularWindow {
    pub fn new(center: f32, half_width: f32) -> Self {
        Self { center, half_width }
    }

    /// Signed offset of `theta` from the window center, in [-π, π)
    #[inline]
    pub fn offset(&self, theta: f32) -> f32 {
        normalize_angle(theta - self.center)
    }

    /// Counter-clockwise distance from the center to `theta`, in [0, 2π)
    #[inline]
    pub fn ccw_offset(&self, theta: f32) -> f32 {
        wrap_angle(theta - self.center)
    }

    pub fn contains(&self, theta: f32) -> bool {
        self.offset(theta).abs() <= self.half_width
    }
}

/// Arc from `start` sweeping counter-clockwise by `span`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSpan {
    pub start: f32,
    pub span: f32,
}

impl ArcSpan {
    pub fn new(start: f32, span: f32) -> Self {
        Self { start, span }
    }

    /// Position of `theta` along the arc's sweep, in [0, 2π)
    #[inline]
    pub fn relative(&self, theta: f32) -> f32 {
        wrap_angle(theta - self.start)
    }

    /// Closed at both ends: a point exactly on the far boundary is inside
    pub fn contains(&self, theta: f32) -> bool {
        self.relative(theta) <= self.span
    }
}

/// Intersection angles of an agent disc centered on the arena wall.
///
/// The two circles cross at two points. Seen from the arena center (the
/// "cylinder") the crossing points are `cylinder_intersect_ang` apart. Seen
/// from the agent center they are `player_intersect_ang` apart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LensGeometry {
    pub cylinder_intersect_ang: f32,
    pub player_intersect_ang: f32,
}

impl LensGeometry {
    pub fn new(agent_radius: f32, arena_radius: f32) -> Self {
        // Law of cosines on the isosceles triangle (center, agent, crossing)
        let ratio = agent_radius / arena_radius;
        let cos_half = (1.0 - 0.5 * ratio * ratio).clamp(-1.0, 1.0);
        let cylinder_intersect_ang = 2.0 * cos_half.acos();

        // Law of sines for the angle at the agent center
        let sin_agent =
            (arena_radius / agent_radius * (cylinder_intersect_ang / 2.0).sin()).clamp(-1.0, 1.0);
        let player_intersect_ang = 2.0 * sin_agent.asin();

        Self {
            cylinder_intersect_ang,
            player_intersect_ang,
        }
    }

    /// Half-width of the wall arc window, seen from the cylinder center
    #[inline]
    pub fn half_wall(&self) -> f32 {
        self.cylinder_intersect_ang / 2.0
    }

    /// Half-width of the body arc window, seen from the agent center
    #[inline]
    pub fn half_body(&self) -> f32 {
        self.player_intersect_ang / 2.0
    }
}
