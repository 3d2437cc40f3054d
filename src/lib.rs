//! Centrifuge Volleyball - two players on the inner wall of a spinning arena
//!
//! Core modules:
//! - `sim`: Headless simulation (arena, agents, ball, contacts, scoring)
//! - `settings`: Data-driven match tuning loaded from JSON

pub mod settings;
pub mod sim;

pub use settings::{MatchSettings, SettingsError};

use std::time::Duration;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Host tick cadence target (milliseconds)
    pub const TICK_INTERVAL_MS: u64 = 33;
    /// Shortest delay the host waits between ticks
    pub const MIN_TICK_INTERVAL_MS: u64 = 17;

    /// Arena dimensions
    pub const ARENA_RADIUS: f32 = 280.0;
    /// Arena spin (radians per tick)
    pub const ROTATION_VELOCITY: f32 = 0.02;

    /// Camera sweep: a 2300-tick cycle with a ramp up and a ramp down window
    pub const CAMERA_CYCLE_TICKS: u64 = 2300;
    pub const CAMERA_RAMP_UP_START: u64 = 1000;
    pub const CAMERA_RAMP_DOWN_START: u64 = 2150;
    pub const CAMERA_RAMP_TICKS: u64 = 150;
    /// Camera velocity changes by `rotation_velocity / CAMERA_RAMP_DIVISOR` per ramp tick
    pub const CAMERA_RAMP_DIVISOR: f32 = 150.0;

    /// Agent body and rim motion
    pub const AGENT_RADIUS: f32 = 40.0;
    pub const MAX_ANGULAR_VELOCITY: f32 = 0.05;
    pub const ANGULAR_ACCELERATION: f32 = 0.01;
    /// Multiplicative damping for anything sliding along the rim
    pub const RIM_FRICTION: f32 = 0.9;
    /// Inward speed added on jump (pixels per tick)
    pub const JUMP_POP: f32 = 6.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 25.0;
    pub const BALL_SERVE_SPEED: f32 = 5.0;

    /// Ticks between a point and the ball reset
    pub const FREEZE_TICKS: u32 = 25;
    /// Radius lost by the ball on each freeze tick
    pub const FREEZE_SHRINK_PER_TICK: f32 = 1.0;
    pub const WIN_SCORE: u32 = 25;
    /// Displayed territory closes 1/N of the gap to its target each tick
    pub const FRACTION_SMOOTHING: f32 = 10.0;

    /// Corner push-out: at most this many steps of `CORNER_CORRECTION_STEP` pixels
    pub const CORNER_CORRECTION_STEPS: u32 = 10;
    pub const CORNER_CORRECTION_STEP: f32 = 1.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Wrap an angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Delay before the next tick, given how long the last one took to compute.
///
/// Aims for a steady `TICK_INTERVAL_MS` cadence but never waits less than
/// `MIN_TICK_INTERVAL_MS`.
pub fn next_tick_delay(compute_time: Duration) -> Duration {
    let target = Duration::from_millis(consts::TICK_INTERVAL_MS);
    let floor = Duration::from_millis(consts::MIN_TICK_INTERVAL_MS);
    target.saturating_sub(compute_time).max(floor)
}
