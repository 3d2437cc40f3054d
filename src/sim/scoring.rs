//! Territory allocation and scoring
//!
//! The rim is split between the two agents. A ball that settles on the rim
//! scores for whoever owns that stretch. Territory shares are rebalanced by
//! inverse score after every point, so the trailing agent gets more rim.

use std::f32::consts::{PI, TAU};

use rand::Rng;

use super::arc::ArcSpan;
use super::state::{Agent, AgentId, Arena, Ball, GameEvent};
use crate::consts::{FRACTION_SMOOTHING, FREEZE_SHRINK_PER_TICK};
use crate::settings::MatchSettings;

/// Agent one's stretch of rim (world angles). Agent two owns the rest.
///
/// Agent one's territory is centered on the rotating-frame angle π.
pub fn player_one_territory(arena: &Arena, player_one_fraction: f32) -> ArcSpan {
    ArcSpan::new(
        arena.rotation_angle + PI - player_one_fraction * PI,
        player_one_fraction * TAU,
    )
}

/// Who owns the rim at `world_angle`. A point exactly on either boundary
/// belongs to agent one.
pub fn territory_owner(arena: &Arena, player_one_fraction: f32, world_angle: f32) -> AgentId {
    if player_one_territory(arena, player_one_fraction).contains(world_angle) {
        AgentId::One
    } else {
        AgentId::Two
    }
}

/// Ease every displayed fraction toward its target
pub fn smooth_fractions(agents: &mut [Agent; 2]) {
    for agent in agents.iter_mut() {
        agent.fraction += (agent.target_fraction - agent.fraction) / FRACTION_SMOOTHING;
    }
}

/// Inverse-score territory shares: `weight = 1 / max(score, 1)`, normalized
pub fn catch_up_fractions(scores: [u32; 2]) -> [f32; 2] {
    let weights = scores.map(|s| 1.0 / s.max(1) as f32);
    let total: f32 = weights.iter().sum();
    weights.map(|w| w / total)
}

/// Per-tick territory and scoring step
pub fn handle_points(
    ball: &mut Ball,
    agents: &mut [Agent; 2],
    arena: &Arena,
    settings: &MatchSettings,
    rng: &mut impl Rng,
    winner: &mut Option<AgentId>,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    smooth_fractions(agents);

    if winner.is_some() {
        return events;
    }
    if !ball.is_active() {
        advance_freeze(ball, agents, settings, rng);
        return events;
    }
    if !ball.grounded || ball.hit_this_tick {
        return events;
    }

    let world_angle = ball.position.y.atan2(ball.position.x);
    let owner = territory_owner(arena, agents[0].fraction, world_angle);
    award_point(owner, ball, agents, settings, winner, &mut events);
    events
}

fn award_point(
    owner: AgentId,
    ball: &mut Ball,
    agents: &mut [Agent; 2],
    settings: &MatchSettings,
    winner: &mut Option<AgentId>,
    events: &mut Vec<GameEvent>,
) {
    let agent = &mut agents[owner.index()];
    agent.score += 1;
    let score = agent.score;
    ball.color = agent.color;
    ball.pause_counter = 0;
    events.push(GameEvent::PointScored {
        agent: owner,
        score,
    });

    log::info!(
        "Point to {:?} ({} - {})",
        owner,
        agents[0].score,
        agents[1].score
    );

    if score >= settings.win_score {
        *winner = Some(owner);
        events.push(GameEvent::MatchWon { agent: owner });
        log::info!("{:?} wins {} - {}", owner, agents[0].score, agents[1].score);
    }

    let targets = catch_up_fractions([agents[0].score, agents[1].score]);
    for (agent, target) in agents.iter_mut().zip(targets) {
        agent.target_target_fraction = target;
    }
}

/// One freeze tick: shrink the ball, then serve again once the freeze is over
fn advance_freeze(
    ball: &mut Ball,
    agents: &mut [Agent; 2],
    settings: &MatchSettings,
    rng: &mut impl Rng,
) {
    ball.pause_counter += 1;
    ball.radius = (ball.radius - FREEZE_SHRINK_PER_TICK).max(0.0);

    if ball.pause_counter >= settings.freeze_ticks as i32 {
        for agent in agents.iter_mut() {
            agent.target_fraction = agent.target_target_fraction;
        }
        ball.serve_random(rng, settings.ball_serve_speed);
        log::debug!(
            "Serve: territories {:.3} / {:.3}",
            agents[0].target_fraction,
            agents[1].target_fraction
        );
    }
}
