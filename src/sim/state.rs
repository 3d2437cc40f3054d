//! Simulation state: arena, agents, ball
//!
//! Each body owns its own motion model. Cross-body coupling (the arena spin)
//! is always passed in as `&Arena`, never stored.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Contact;
use crate::consts::*;
use crate::settings::MatchSettings;
use crate::{normalize_angle, polar_to_cartesian};

/// Which of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentId {
    One,
    Two,
}

impl AgentId {
    pub const ALL: [AgentId; 2] = [AgentId::One, AgentId::Two];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            AgentId::One => 0,
            AgentId::Two => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            AgentId::One => AgentId::Two,
            AgentId::Two => AgentId::One,
        }
    }
}

/// Control inputs a host can hold or release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Accelerate clockwise along the rim
    Left,
    /// Accelerate counter-clockwise along the rim
    Right,
    Jump,
}

/// RGB color for renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const NEUTRAL: Color = Color::rgb(255, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Things hosts may want to react to (sound, HUD). Physics never reads these back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball touched an agent this tick
    Contact { agent: AgentId, contact: Contact },
    /// Ball settled in `agent`'s territory
    PointScored { agent: AgentId, score: u32 },
    /// `agent` reached the win score; the match is frozen
    MatchWon { agent: AgentId },
}

/// Coarse match state for hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Ball in play
    Rally,
    /// Point just scored, ball shrinking before the next serve
    Freeze,
    /// Someone won; ticking does nothing
    Won(AgentId),
}

/// The spinning arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub radius: f32,
    /// Accumulated spin (radians, never wrapped)
    pub rotation_angle: f32,
    /// Radians per tick, constant for the match
    pub rotation_velocity: f32,
    /// Cosmetic camera sweep, not read by physics
    pub camera_angle: f32,
    pub camera_velocity: f32,
}

impl Arena {
    pub fn new(radius: f32, rotation_velocity: f32) -> Self {
        Self {
            radius,
            rotation_angle: 0.0,
            rotation_velocity,
            camera_angle: 0.0,
            camera_velocity: rotation_velocity,
        }
    }

    /// Advance one tick. `time_ticks` drives the camera cycle.
    pub fn update(&mut self, time_ticks: u64) {
        self.rotation_angle += self.rotation_velocity;

        let cycle = time_ticks % CAMERA_CYCLE_TICKS;
        let ramp = self.rotation_velocity / CAMERA_RAMP_DIVISOR;
        if (CAMERA_RAMP_UP_START..CAMERA_RAMP_UP_START + CAMERA_RAMP_TICKS).contains(&cycle) {
            self.camera_velocity += ramp;
        } else if (CAMERA_RAMP_DOWN_START..CAMERA_RAMP_DOWN_START + CAMERA_RAMP_TICKS)
            .contains(&cycle)
        {
            self.camera_velocity -= ramp;
        }
        self.camera_angle += self.camera_velocity;
    }

    /// World angle of a rim angle expressed in the rotating frame
    #[inline]
    pub fn absolute_angle(&self, relative: f32) -> f32 {
        relative + self.rotation_angle
    }

    /// Rim angle (rotating frame) of a world position
    #[inline]
    pub fn relative_angle_of(&self, pos: Vec2) -> f32 {
        normalize_angle(pos.y.atan2(pos.x) - self.rotation_angle)
    }

    /// World position at distance `r` from the center along a rotating-frame angle
    #[inline]
    pub fn point_at(&self, r: f32, relative: f32) -> Vec2 {
        polar_to_cartesian(r, self.absolute_angle(relative))
    }

    /// World velocity of something riding the rim at distance `r` with `angular_velocity`
    /// relative to the rotating frame
    pub fn rim_velocity(&self, r: f32, relative: f32, angular_velocity: f32) -> Vec2 {
        let speed = r * (self.rotation_velocity + angular_velocity);
        polar_to_cartesian(speed, self.absolute_angle(relative) + FRAC_PI_2)
    }
}

/// A player body, centered on the arena wall while grounded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    /// Rim position in the rotating frame
    pub angle: f32,
    pub position: Vec2,
    /// Only meaningful while airborne
    pub velocity: Vec2,
    /// Only meaningful while grounded
    pub angular_velocity: f32,
    pub grounded: bool,
    pub radius: f32,
    pub score: u32,
    /// Displayed territory share, eases toward `target_fraction`
    pub fraction: f32,
    pub target_fraction: f32,
    /// Applied to `target_fraction` when the current freeze ends
    pub target_target_fraction: f32,
    pub left_pressed: bool,
    pub right_pressed: bool,
    /// Jump requested since the last tick
    pub jump_queued: bool,
    pub color: Color,
}

impl Agent {
    pub fn new(id: AgentId, angle: f32, radius: f32, arena: &Arena) -> Self {
        let angle = normalize_angle(angle);
        Self {
            id,
            angle,
            position: arena.point_at(arena.radius, angle),
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            grounded: true,
            radius,
            score: 0,
            fraction: 0.5,
            target_fraction: 0.5,
            target_target_fraction: 0.5,
            left_pressed: false,
            right_pressed: false,
            jump_queued: false,
            color: match id {
                AgentId::One => Color::YELLOW,
                AgentId::Two => Color::CYAN,
            },
        }
    }

    /// Match-start placement: agent one at π, agent two opposite at 0
    pub fn spawn(id: AgentId, radius: f32, arena: &Arena) -> Self {
        let angle = match id {
            AgentId::One => PI,
            AgentId::Two => 0.0,
        };
        Self::new(id, angle, radius, arena)
    }

    /// Record a control change. Jump is edge-triggered: only presses count.
    pub fn press(&mut self, action: Action, pressed: bool) {
        match action {
            Action::Left => self.left_pressed = pressed,
            Action::Right => self.right_pressed = pressed,
            Action::Jump => {
                if pressed {
                    self.jump_queued = true;
                }
            }
        }
    }

    /// World direction from the arena center through the agent
    pub fn facing(&self, arena: &Arena) -> f32 {
        if self.grounded {
            arena.absolute_angle(self.angle)
        } else {
            self.position.y.atan2(self.position.x)
        }
    }

    /// Leave the rim. Returns false (and changes nothing) when already airborne.
    pub fn jump(&mut self, arena: &Arena, pop: f32) -> bool {
        if !self.grounded {
            return false;
        }
        let theta = arena.absolute_angle(self.angle);
        self.velocity = arena.rim_velocity(arena.radius, self.angle, self.angular_velocity)
            - polar_to_cartesian(pop, theta);
        self.grounded = false;
        true
    }

    /// Advance one tick
    pub fn update(&mut self, arena: &Arena, settings: &MatchSettings) {
        if self.jump_queued {
            self.jump_queued = false;
            self.jump(arena, settings.jump_pop);
        }

        if self.grounded {
            self.update_grounded(arena, settings);
        } else {
            self.update_airborne(arena);
        }
    }

    fn update_grounded(&mut self, arena: &Arena, settings: &MatchSettings) {
        let max = settings.max_angular_velocity;
        let accel = settings.angular_acceleration;
        if self.left_pressed && self.angular_velocity > -max {
            self.angular_velocity = (self.angular_velocity - accel).max(-max);
        }
        if self.right_pressed && self.angular_velocity < max {
            self.angular_velocity = (self.angular_velocity + accel).min(max);
        }
        self.angular_velocity *= settings.rim_friction;

        self.angle = normalize_angle(self.angle + self.angular_velocity);
        self.position = arena.point_at(arena.radius, self.angle);
    }

    fn update_airborne(&mut self, arena: &Arena) {
        self.position += self.velocity;
        if self.position.length() >= arena.radius {
            self.land(arena);
        }
    }

    fn land(&mut self, arena: &Arena) {
        self.angle = arena.relative_angle_of(self.position);
        self.position = arena.point_at(arena.radius, self.angle);
        self.velocity = Vec2::ZERO;
        self.grounded = true;
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Resting on / sliding along the rim
    pub grounded: bool,
    /// Rim angle in the rotating frame
    pub angle: f32,
    pub angular_velocity: f32,
    pub radius: f32,
    /// Radius restored on every serve
    pub full_radius: f32,
    pub color: Color,
    /// -1 while in play, otherwise ticks since the last point
    pub pause_counter: i32,
    /// Touched an agent during the current tick
    pub hit_this_tick: bool,
}

impl Ball {
    pub fn new(radius: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            grounded: false,
            angle: 0.0,
            angular_velocity: 0.0,
            radius,
            full_radius: radius,
            color: Color::NEUTRAL,
            pause_counter: -1,
            hit_this_tick: false,
        }
    }

    /// In play (not in a post-point freeze)
    #[inline]
    pub fn is_active(&self) -> bool {
        self.pause_counter == -1
    }

    /// Put the ball back at the center, flying along `direction`
    pub fn serve(&mut self, direction: f32, speed: f32) {
        self.position = Vec2::ZERO;
        self.velocity = polar_to_cartesian(speed, direction);
        self.grounded = false;
        self.angle = 0.0;
        self.angular_velocity = 0.0;
        self.radius = self.full_radius;
        self.color = Color::NEUTRAL;
        self.pause_counter = -1;
        self.hit_this_tick = false;
    }

    /// Serve in a random direction
    pub fn serve_random(&mut self, rng: &mut impl Rng, speed: f32) {
        let direction = rng.random_range(0.0..std::f32::consts::TAU);
        self.serve(direction, speed);
    }

    /// Distance from the center at which the ball rests on the rim
    #[inline]
    pub fn rim_clearance(&self, arena: &Arena) -> f32 {
        arena.radius - self.radius
    }

    /// Advance one tick
    pub fn update(&mut self, arena: &Arena, rim_friction: f32) {
        if self.grounded {
            self.angle = normalize_angle(self.angle + self.angular_velocity);
            self.angular_velocity *= rim_friction;
            self.pin_to_rim(arena);
        } else {
            self.position += self.velocity;
            self.angle = arena.relative_angle_of(self.position);
            if self.position.length() >= self.rim_clearance(arena) {
                self.land(arena);
            }
        }
    }

    fn land(&mut self, arena: &Arena) {
        let clearance = self.rim_clearance(arena);
        let tangent = polar_to_cartesian(1.0, arena.absolute_angle(self.angle) + FRAC_PI_2);
        // Keep the along-rim part of the flight as sliding speed in the rotating frame
        self.angular_velocity = self.velocity.dot(tangent) / clearance - arena.rotation_velocity;
        self.grounded = true;
        self.pin_to_rim(arena);
    }

    /// Snap onto the rim and carry the rim's world velocity
    fn pin_to_rim(&mut self, arena: &Arena) {
        let clearance = self.rim_clearance(arena);
        self.position = arena.point_at(clearance, self.angle);
        self.velocity = arena.rim_velocity(clearance, self.angle, self.angular_velocity);
    }
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: MatchSettings,
    pub arena: Arena,
    pub agents: [Agent; 2],
    pub ball: Ball,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub winner: Option<AgentId>,
    /// Serve direction source
    pub rng: Pcg32,
}

impl GameState {
    /// Fresh match: scores zeroed, territories even, ball served from the center
    pub fn new(settings: MatchSettings) -> Self {
        let arena = Arena::new(settings.arena_radius, settings.rotation_velocity);
        let agents = AgentId::ALL.map(|id| Agent::spawn(id, settings.agent_radius, &arena));
        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let mut ball = Ball::new(settings.ball_radius);
        ball.serve_random(&mut rng, settings.ball_serve_speed);

        log::info!(
            "New match: seed={}, win score={}, arena radius={}",
            settings.seed,
            settings.win_score,
            settings.arena_radius
        );

        Self {
            settings,
            arena,
            agents,
            ball,
            time_ticks: 0,
            winner: None,
            rng,
        }
    }

    /// Host input, read at the start of the next tick
    pub fn apply_input(&mut self, agent: AgentId, action: Action, pressed: bool) {
        self.agents[agent.index()].press(action, pressed);
    }

    pub fn agent(&self, id: AgentId) -> &Agent {
        &self.agents[id.index()]
    }

    pub fn phase(&self) -> MatchPhase {
        match self.winner {
            Some(id) => MatchPhase::Won(id),
            None if self.ball.is_active() => MatchPhase::Rally,
            None => MatchPhase::Freeze,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Arena {
        Arena::new(ARENA_RADIUS, ROTATION_VELOCITY)
    }

    #[test]
    fn test_agent_ids() {
        assert_eq!(AgentId::ALL.map(AgentId::index), [0, 1]);
        assert_eq!(AgentId::One.other(), AgentId::Two);
        assert_eq!(AgentId::Two.other(), AgentId::One);
    }

    #[test]
    fn test_arena_camera_cycle() {
        let mut arena = arena();
        for t in 1..=CAMERA_CYCLE_TICKS {
            arena.update(t);
            if t == CAMERA_RAMP_UP_START + CAMERA_RAMP_TICKS {
                // Ramped up by exactly one rotation velocity
                assert!((arena.camera_velocity - 2.0 * ROTATION_VELOCITY).abs() < 1e-5);
            }
        }
        assert!((arena.camera_velocity - ROTATION_VELOCITY).abs() < 1e-5);
        assert!(
            (arena.rotation_angle - ROTATION_VELOCITY * CAMERA_CYCLE_TICKS as f32).abs() < 1e-2
        );
    }

    #[test]
    fn test_grounded_agent_follows_rotating_rim() {
        let mut arena = arena();
        let settings = MatchSettings::default();
        let mut agent = Agent::spawn(AgentId::Two, AGENT_RADIUS, &arena);

        for t in 1..=10 {
            arena.update(t);
            agent.update(&arena, &settings);
        }
        assert!(agent.grounded);
        assert!(agent.angle.abs() < 1e-6);
        assert!((agent.position.length() - ARENA_RADIUS).abs() < 1e-3);
        let world = agent.position.y.atan2(agent.position.x);
        assert!((world - arena.rotation_angle).abs() < 1e-4);
    }

    #[test]
    fn test_angular_velocity_clamped_then_damped() {
        let arena = arena();
        let settings = MatchSettings::default();
        let mut agent = Agent::spawn(AgentId::One, AGENT_RADIUS, &arena);
        agent.press(Action::Right, true);

        for _ in 0..50 {
            agent.update(&arena, &settings);
            assert!(agent.angular_velocity <= settings.max_angular_velocity);
        }
        // Steady state: capped, then one friction step
        let expected = settings.max_angular_velocity * settings.rim_friction;
        assert!((agent.angular_velocity - expected).abs() < 1e-6);

        agent.press(Action::Right, false);
        agent.update(&arena, &settings);
        assert!((agent.angular_velocity - expected * settings.rim_friction).abs() < 1e-6);
    }

    #[test]
    fn test_left_moves_clockwise() {
        let arena = arena();
        let settings = MatchSettings::default();
        let mut agent = Agent::spawn(AgentId::Two, AGENT_RADIUS, &arena);
        agent.press(Action::Left, true);
        agent.update(&arena, &settings);
        assert!(agent.angular_velocity < 0.0);
        assert!(agent.angle < 0.0);
    }

    #[test]
    fn test_jump_velocity_couples_spin_and_pop() {
        let arena = arena();
        let mut agent = Agent::spawn(AgentId::Two, AGENT_RADIUS, &arena);
        agent.angular_velocity = 0.01;

        assert!(agent.jump(&arena, JUMP_POP));
        assert!(!agent.grounded);
        // Agent two sits at world angle 0: tangential is +y, pop is -x
        let tangential = ARENA_RADIUS * (ROTATION_VELOCITY + 0.01);
        assert!((agent.velocity.x + JUMP_POP).abs() < 1e-4);
        assert!((agent.velocity.y - tangential).abs() < 1e-4);
    }

    #[test]
    fn test_jump_while_airborne_is_noop() {
        let arena = arena();
        let mut agent = Agent::spawn(AgentId::One, AGENT_RADIUS, &arena);
        assert!(agent.jump(&arena, JUMP_POP));
        let velocity = agent.velocity;
        assert!(!agent.jump(&arena, JUMP_POP));
        assert_eq!(agent.velocity, velocity);
    }

    #[test]
    fn test_airborne_agent_crosses_and_lands() {
        let mut arena = arena();
        let settings = MatchSettings::default();
        let mut agent = Agent::spawn(AgentId::Two, AGENT_RADIUS, &arena);
        agent.press(Action::Jump, true);

        let mut landed_at = None;
        for t in 1..2000 {
            arena.update(t);
            agent.update(&arena, &settings);
            if t > 1 && agent.grounded {
                landed_at = Some(t);
                break;
            }
        }
        assert!(landed_at.is_some());
        assert!((agent.position.length() - ARENA_RADIUS).abs() < 1e-2);
        let expected = arena.point_at(ARENA_RADIUS, agent.angle);
        assert!((agent.position - expected).length() < 1e-2);
    }

    #[test]
    fn test_controls_ignored_while_airborne() {
        let arena = arena();
        let settings = MatchSettings::default();
        let mut agent = Agent::spawn(AgentId::One, AGENT_RADIUS, &arena);
        agent.jump(&arena, JUMP_POP);
        agent.press(Action::Left, true);
        let before = agent.velocity;
        agent.update(&arena, &settings);
        assert_eq!(agent.velocity, before);
        assert_eq!(agent.angular_velocity, 0.0);
    }

    #[test]
    fn test_ball_lands_at_clearance_and_slides_with_friction() {
        let arena = arena();
        let mut ball = Ball::new(BALL_RADIUS);
        ball.serve(0.0, 10.0);

        let mut ticks = 0;
        while !ball.grounded && ticks < 100 {
            ball.update(&arena, RIM_FRICTION);
            ticks += 1;
        }
        let clearance = ARENA_RADIUS - BALL_RADIUS;
        assert!(ball.grounded);
        assert!((ball.position.length() - clearance).abs() < 1e-3);

        // Radial flight carries no tangential speed: it slides backwards against the spin
        assert!((ball.angular_velocity + ROTATION_VELOCITY).abs() < 1e-4);

        let before = ball.angular_velocity;
        ball.update(&arena, RIM_FRICTION);
        assert!((ball.angular_velocity - before * RIM_FRICTION).abs() < 1e-6);
        assert!((ball.position.length() - clearance).abs() < 1e-3);
    }

    #[test]
    fn test_serve_resets_everything() {
        let mut ball = Ball::new(BALL_RADIUS);
        ball.radius = 3.0;
        ball.pause_counter = 24;
        ball.color = Color::CYAN;
        ball.grounded = true;
        ball.position = Vec2::new(100.0, 0.0);

        ball.serve(1.0, BALL_SERVE_SPEED);
        assert_eq!(ball.position, Vec2::ZERO);
        assert_eq!(ball.radius, BALL_RADIUS);
        assert_eq!(ball.color, Color::NEUTRAL);
        assert_eq!(ball.pause_counter, -1);
        assert!(!ball.grounded);
        assert!((ball.velocity.length() - BALL_SERVE_SPEED).abs() < 1e-5);
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(MatchSettings::with_seed(3));
        assert_eq!(state.phase(), MatchPhase::Rally);
        assert_eq!(state.agent(AgentId::One).score, 0);
        let p1 = state.agent(AgentId::One).position;
        let p2 = state.agent(AgentId::Two).position;
        // 180 degrees apart
        assert!((p1 + p2).length() < 1e-3);
        assert_eq!(state.ball.position, Vec2::ZERO);
        assert!((state.ball.velocity.length() - BALL_SERVE_SPEED).abs() < 1e-5);
    }
}
