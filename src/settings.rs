//! Match tuning
//!
//! Every gameplay constant the simulation reads, loadable from JSON. Missing
//! keys fall back to the defaults in [`crate::consts`].

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Everything that can go wrong while loading settings
#[derive(Debug)]
pub enum SettingsError {
    /// Settings file could not be read
    Io(std::io::Error),
    /// Settings text is not valid JSON for [`MatchSettings`]
    Parse(serde_json::Error),
    /// A value is outside the range the physics can handle
    Invalid {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(err) => write!(f, "could not read settings: {err}"),
            SettingsError::Parse(err) => write!(f, "could not parse settings: {err}"),
            SettingsError::Invalid {
                field,
                value,
                reason,
            } => write!(f, "invalid setting `{field}` = {value}: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(err) => Some(err),
            SettingsError::Parse(err) => Some(err),
            SettingsError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err)
    }
}

/// Tunables for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    // === Arena ===
    pub arena_radius: f32,
    /// Radians per tick
    pub rotation_velocity: f32,

    // === Bodies ===
    pub agent_radius: f32,
    pub ball_radius: f32,

    // === Agent motion ===
    pub max_angular_velocity: f32,
    pub angular_acceleration: f32,
    /// Per-tick multiplier applied to rim sliding speed (agents and ball)
    pub rim_friction: f32,
    pub jump_pop: f32,

    // === Ball & match flow ===
    pub ball_serve_speed: f32,
    pub freeze_ticks: u32,
    pub win_score: u32,
    /// Seed for the serve direction RNG
    pub seed: u64,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            arena_radius: ARENA_RADIUS,
            rotation_velocity: ROTATION_VELOCITY,

            agent_radius: AGENT_RADIUS,
            ball_radius: BALL_RADIUS,

            max_angular_velocity: MAX_ANGULAR_VELOCITY,
            angular_acceleration: ANGULAR_ACCELERATION,
            rim_friction: RIM_FRICTION,
            jump_pop: JUMP_POP,

            ball_serve_speed: BALL_SERVE_SPEED,
            freeze_ticks: FREEZE_TICKS,
            win_score: WIN_SCORE,
            seed: 0,
        }
    }
}

impl MatchSettings {
    /// Default settings with a specific serve seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read, parse and validate a JSON settings file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&text)?;
        log::info!("Loaded match settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the physics cannot work with
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn invalid(field: &'static str, value: impl Into<f64>, reason: &'static str) -> SettingsError {
            SettingsError::Invalid {
                field,
                value: value.into(),
                reason,
            }
        }

        let positive = [
            ("arena_radius", self.arena_radius),
            ("agent_radius", self.agent_radius),
            ("ball_radius", self.ball_radius),
            ("max_angular_velocity", self.max_angular_velocity),
            ("angular_acceleration", self.angular_acceleration),
            ("ball_serve_speed", self.ball_serve_speed),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, value, "must be a positive number"));
            }
        }

        if !self.rotation_velocity.is_finite() {
            return Err(invalid("rotation_velocity", self.rotation_velocity, "must be finite"));
        }
        if !self.jump_pop.is_finite() || self.jump_pop < 0.0 {
            return Err(invalid("jump_pop", self.jump_pop, "must be zero or positive"));
        }
        if !(0.0..=1.0).contains(&self.rim_friction) {
            return Err(invalid("rim_friction", self.rim_friction, "must be within [0, 1]"));
        }
        // acos(1 - 0.5 * (agent/arena)^2) needs agent <= 2 * arena
        if self.agent_radius >= 2.0 * self.arena_radius {
            return Err(invalid(
                "agent_radius",
                self.agent_radius,
                "must be smaller than the arena diameter",
            ));
        }
        if self.ball_radius >= self.arena_radius {
            return Err(invalid(
                "ball_radius",
                self.ball_radius,
                "must be smaller than the arena radius",
            ));
        }
        if self.freeze_ticks == 0 {
            return Err(invalid("freeze_ticks", self.freeze_ticks, "must be at least 1"));
        }
        if self.win_score == 0 {
            return Err(invalid("win_score", self.win_score, "must be at least 1"));
        }
        Ok(())
    }
}
