//! Centrifuge Volleyball headless runner
//!
//! Plays a bot-vs-bot match on the simulation core and logs what happens.
//!
//! ```text
//! centrifuge-volleyball [--config settings.json] [--seed N] [--realtime]
//! ```

use std::path::PathBuf;

use clap::Parser;

use centrifuge_volleyball::MatchSettings;
use centrifuge_volleyball::normalize_angle;
use centrifuge_volleyball::sim::{Action, AgentId, GameEvent, GameState, tick};

/// Give up on a match that runs this long
const MAX_TICKS: u64 = 500_000;

/// Bot steering dead zone (radians)
const STEER_DEADBAND: f32 = 0.05;

/// Bots jump when the ball comes within this many agent radii
const JUMP_REACH: f32 = 3.0;

/// Bot-vs-bot match on the simulation core
#[derive(Debug, Parser)]
#[command(name = "centrifuge-volleyball")]
#[command(about = "Headless Centrifuge Volleyball match between two bots")]
#[command(version)]
struct RunnerArgs {
    /// Match settings JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serve seed, overrides the one in the settings file
    #[arg(long)]
    seed: Option<u64>,

    /// Pace ticks at wall-clock speed
    #[arg(long)]
    realtime: bool,
}

fn load_settings(args: &RunnerArgs) -> MatchSettings {
    let mut settings = match &args.config {
        Some(path) => MatchSettings::load_from_path(path).unwrap_or_else(|e| {
            log::warn!("Falling back to default settings: {e}");
            MatchSettings::default()
        }),
        None => MatchSettings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    settings
}

/// Chase the ball along the rim and jump when it gets close
fn drive_bot(state: &mut GameState, id: AgentId) {
    let agent = state.agent(id);
    let ball = &state.ball;

    let target = state.arena.relative_angle_of(ball.position);
    let diff = normalize_angle(target - agent.angle);
    let (left, right) = if !ball.is_active() {
        (false, false)
    } else {
        (diff < -STEER_DEADBAND, diff > STEER_DEADBAND)
    };

    let near = ball.position.distance(agent.position) < agent.radius * JUMP_REACH;
    let jump = agent.grounded && ball.is_active() && !ball.grounded && near;

    state.apply_input(id, Action::Left, left);
    state.apply_input(id, Action::Right, right);
    if jump {
        state.apply_input(id, Action::Jump, true);
    }
}

fn log_event(event: &GameEvent, time_ticks: u64) {
    match event {
        GameEvent::Contact { agent, contact } => {
            log::debug!("[{time_ticks}] {agent:?} touched the ball ({contact:?})");
        }
        GameEvent::PointScored { agent, score } => {
            log::info!("[{time_ticks}] Point to {agent:?}, now at {score}");
        }
        GameEvent::MatchWon { agent } => {
            log::info!("[{time_ticks}] {agent:?} wins the match");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::Instant;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Centrifuge Volleyball (headless) starting...");

    let args = RunnerArgs::parse();

    let settings = load_settings(&args);
    let mut state = GameState::new(settings);

    while state.winner.is_none() && state.time_ticks < MAX_TICKS {
        let started = Instant::now();

        for id in AgentId::ALL {
            drive_bot(&mut state, id);
        }
        for event in tick(&mut state) {
            log_event(&event, state.time_ticks);
        }

        if args.realtime {
            std::thread::sleep(centrifuge_volleyball::next_tick_delay(started.elapsed()));
        }
    }

    let [one, two] = &state.agents;
    match state.winner {
        Some(winner) => log::info!(
            "Final score {} - {} after {} ticks, {winner:?} beats {:?}",
            one.score,
            two.score,
            state.time_ticks,
            winner.other()
        ),
        None => log::warn!(
            "No winner after {} ticks ({} - {})",
            state.time_ticks,
            one.score,
            two.score
        ),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation core is a library; there is no browser host
}
