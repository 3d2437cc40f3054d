//! Ball vs agent contact
//!
//! An agent sits centered on the arena wall, so the part of its disc that
//! pokes into the arena is a lens with two curved faces:
//! - the body arc: the agent's own circle, facing the arena center
//! - the wall arc: a piece of the arena circle carried along with the agent
//!   (only reachable once the agent leaves the wall)
//!
//! The faces meet at two corners. A contact is classified into one of those
//! regions, then velocities are exchanged along the collision vector.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arc::{AngularWindow, LensGeometry};
use super::state::{Agent, Arena, Ball, GameEvent};
use crate::consts::{CORNER_CORRECTION_STEP, CORNER_CORRECTION_STEPS};
use crate::polar_to_cartesian;

/// Which part of the lens the ball touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contact {
    BodyArc,
    WallArc,
    /// Corner on the clockwise side of the body arc (seen from the agent)
    CornerLeft,
    /// Corner on the counter-clockwise side
    CornerRight,
}

impl Contact {
    pub fn is_corner(self) -> bool {
        matches!(self, Contact::CornerLeft | Contact::CornerRight)
    }
}

/// A classified contact: push the ball away from `center`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactHit {
    pub contact: Contact,
    /// Arc center, or the corner itself for corner hits
    pub center: Vec2,
    /// Zero for corner pivots
    pub center_radius: f32,
}

impl ContactHit {
    /// Displacement from the contact center to the ball
    #[inline]
    pub fn collision_vector(&self, ball_pos: Vec2) -> Vec2 {
        ball_pos - self.center
    }
}

/// One agent's lens, placed in the world for the current tick
#[derive(Debug, Clone, Copy)]
pub struct AgentFrame {
    pub center: Vec2,
    /// Center of the circle the wall arc belongs to (the arena origin while grounded)
    pub cylinder_center: Vec2,
    /// World direction from the arena center out through the agent
    pub facing: f32,
    pub agent_radius: f32,
    pub arena_radius: f32,
    pub lens: LensGeometry,
}

impl AgentFrame {
    pub fn new(agent: &Agent, arena: &Arena) -> Self {
        let facing = agent.facing(arena);
        Self {
            center: agent.position,
            cylinder_center: agent.position - polar_to_cartesian(arena.radius, facing),
            facing,
            agent_radius: agent.radius,
            arena_radius: arena.radius,
            lens: LensGeometry::new(agent.radius, arena.radius),
        }
    }

    /// Body arc directions, seen from the agent center
    pub fn body_window(&self) -> AngularWindow {
        AngularWindow::new(self.facing + PI, self.lens.half_body())
    }

    /// Wall arc directions, seen from the cylinder center
    pub fn wall_window(&self) -> AngularWindow {
        AngularWindow::new(self.facing, self.lens.half_wall())
    }

    /// Corner point where the body arc meets the wall arc
    pub fn corner(&self, side: Contact) -> Vec2 {
        let half_body = self.lens.half_body();
        let offset = match side {
            Contact::CornerLeft => -half_body,
            _ => half_body,
        };
        self.center + polar_to_cartesian(self.agent_radius, self.facing + PI + offset)
    }

    pub fn overlaps_body(&self, pos: Vec2, radius: f32) -> bool {
        (pos - self.center).length() < self.agent_radius + radius
    }

    /// Ball pokes past the wall arc's circle
    pub fn overlaps_wall(&self, pos: Vec2, radius: f32) -> bool {
        (pos - self.cylinder_center).length() > self.arena_radius - radius
    }
}

/// Classify a ball against one agent's lens.
///
/// Regions are tried in order: body arc, wall arc, then the nearer corner.
pub fn classify_contact(frame: &AgentFrame, ball_pos: Vec2, ball_radius: f32) -> Option<ContactHit> {
    let to_ball = ball_pos - frame.center;
    let body_angle = to_ball.y.atan2(to_ball.x);
    let body = frame.body_window();
    let in_body_window = body.contains(body_angle);

    if in_body_window && to_ball.length() < frame.agent_radius + ball_radius {
        return Some(ContactHit {
            contact: Contact::BodyArc,
            center: frame.center,
            center_radius: frame.agent_radius,
        });
    }

    let from_cylinder = ball_pos - frame.cylinder_center;
    let cylinder_dist = from_cylinder.length();
    if frame
        .wall_window()
        .contains(from_cylinder.y.atan2(from_cylinder.x))
        && cylinder_dist >= frame.arena_radius
        && cylinder_dist < frame.arena_radius + ball_radius
    {
        return Some(ContactHit {
            contact: Contact::WallArc,
            center: frame.cylinder_center,
            center_radius: frame.arena_radius,
        });
    }

    if in_body_window {
        return None;
    }

    // Split the angular span outside the body arc in half: the first half
    // (counter-clockwise of the bound) belongs to the right corner
    let half_body = frame.lens.half_body();
    let past_bound = body.ccw_offset(body_angle) - half_body;
    let remaining = TAU - 2.0 * half_body;
    let side = if past_bound < remaining / 2.0 {
        Contact::CornerRight
    } else {
        Contact::CornerLeft
    };

    let pivot = frame.corner(side);
    if (ball_pos - pivot).length() < ball_radius {
        return Some(ContactHit {
            contact: side,
            center: pivot,
            center_radius: 0.0,
        });
    }
    None
}

/// Split `v` into (parallel to `n`, remainder). A zero `n` has no parallel part.
pub fn split_along(v: Vec2, n: Vec2) -> (Vec2, Vec2) {
    let nn = n.length_squared();
    if nn == 0.0 {
        return (Vec2::ZERO, v);
    }
    let parallel = n * (v.dot(n) / nn);
    (parallel, v - parallel)
}

/// Exchange velocity components along the collision vector and move the ball
/// onto the contact boundary.
pub fn resolve_contact(agent: &mut Agent, ball: &mut Ball, arena: &Arena, hit: &ContactHit) {
    if agent.grounded {
        // Overwrite, not accumulate: the incoming ball speed sets the swing
        let theta = arena.absolute_angle(agent.angle);
        agent.velocity = arena.rim_velocity(arena.radius, agent.angle, agent.angular_velocity)
            - polar_to_cartesian(ball.velocity.length(), theta);
    }

    let n = hit.collision_vector(ball.position);
    let (agent_parallel, agent_perp) = split_along(agent.velocity, n);
    let (ball_parallel, ball_perp) = split_along(ball.velocity, n);
    agent.velocity = agent_perp + ball_parallel;
    ball.velocity = ball_perp + agent_parallel;

    let length = n.length();
    let direction = if length > 0.0 { n / length } else { n };
    ball.position = hit.center + direction * (hit.center_radius + ball.radius);
    ball.angle = arena.relative_angle_of(ball.position);
    ball.grounded = false;
    ball.hit_this_tick = true;
}

/// Tunneling guard for corner hits.
///
/// Nudges the ball along `direction` in fixed steps while it still overlaps
/// both the agent body and the wall arc. This is a bounded heuristic, not a
/// solve: it stops after `CORNER_CORRECTION_STEPS` whether or not the overlap
/// is gone. Returns the number of steps taken.
pub fn correct_corner(frame: &AgentFrame, ball: &mut Ball, direction: Vec2) -> u32 {
    let mut steps = 0;
    while steps < CORNER_CORRECTION_STEPS
        && frame.overlaps_body(ball.position, ball.radius)
        && frame.overlaps_wall(ball.position, ball.radius)
    {
        ball.position += direction * CORNER_CORRECTION_STEP;
        steps += 1;
    }
    steps
}

/// Resolve ball contacts against both agents for this tick
pub fn handle_collisions(ball: &mut Ball, agents: &mut [Agent; 2], arena: &Arena) -> Vec<GameEvent> {
    ball.hit_this_tick = false;
    let mut events = Vec::new();
    if !ball.is_active() {
        return events;
    }

    for agent in agents.iter_mut() {
        let frame = AgentFrame::new(agent, arena);
        let Some(hit) = classify_contact(&frame, ball.position, ball.radius) else {
            continue;
        };

        resolve_contact(agent, ball, arena, &hit);
        if hit.contact.is_corner() {
            let direction = hit.collision_vector(ball.position).normalize_or_zero();
            let steps = correct_corner(&frame, ball, direction);
            if steps == CORNER_CORRECTION_STEPS {
                log::debug!("Corner correction for {:?} hit its step limit", agent.id);
            }
        }

        log::debug!(
            "{:?} contact with {:?}, ball velocity now ({:.2}, {:.2})",
            hit.contact,
            agent.id,
            ball.velocity.x,
            ball.velocity.y
        );
        events.push(GameEvent::Contact {
            agent: agent.id,
            contact: hit.contact,
        });
    }

    events
}
