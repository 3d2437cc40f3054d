//! Fixed timestep simulation tick
//!
//! One call advances the whole match in a fixed order: arena, agent one,
//! agent two, ball motion, ball contacts, territory and scoring.

use super::collision::handle_collisions;
use super::scoring::handle_points;
use super::state::{GameEvent, GameState};

/// Advance the match by one tick. Returns what happened, for sound and HUD.
///
/// Once a winner is decided the match is frozen and this does nothing.
pub fn tick(state: &mut GameState) -> Vec<GameEvent> {
    if state.winner.is_some() {
        return Vec::new();
    }

    state.time_ticks += 1;
    state.arena.update(state.time_ticks);

    for agent in state.agents.iter_mut() {
        agent.update(&state.arena, &state.settings);
    }

    state.ball.update(&state.arena, state.settings.rim_friction);

    let mut events = handle_collisions(&mut state.ball, &mut state.agents, &state.arena);
    events.extend(handle_points(
        &mut state.ball,
        &mut state.agents,
        &state.arena,
        &state.settings,
        &mut state.rng,
        &mut state.winner,
    ));
    events
}

impl GameState {
    /// Method form of [`tick`]
    pub fn tick(&mut self) -> Vec<GameEvent> {
        tick(self)
    }
}
