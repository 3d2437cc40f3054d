//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable update order (arena, agent one, agent two, ball)
//! - No rendering or platform dependencies

pub mod arc;
pub mod collision;
pub mod scoring;
pub mod state;
pub mod tick;

pub use arc::{AngularWindow, ArcSpan, LensGeometry};
pub use collision::{AgentFrame, Contact, ContactHit, classify_contact, handle_collisions};
pub use scoring::{catch_up_fractions, handle_points, player_one_territory, territory_owner};
pub use state::{Action, Agent, AgentId, Arena, Ball, Color, GameEvent, GameState, MatchPhase};
pub use tick::tick;
