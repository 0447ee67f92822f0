use std::env;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use crate::content::{load_rooms, ContentError};
use crate::{resolve_app_paths, StartupError};

use super::input::InputSnapshot;
use super::metrics::{LoopMetricsSnapshot, MetricsAccumulator};
use super::room::{RoomId, RoomRegistry};
use super::simulation::{SimConfig, SimError, Simulation};

pub const START_ROOM_ENV_VAR: &str = "TILEWALK_START_ROOM";
pub const FRAME_LIMIT_ENV_VAR: &str = "TILEWALK_FRAMES";

/// Supplies the input for each frame. `None` ends the run.
pub trait InputSource {
    fn next_frame(&mut self) -> Option<InputSnapshot>;
}

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub target_fps: u32,
    pub max_frame_delta: Duration,
    pub metrics_log_interval: Duration,
    pub max_frames: Option<u64>,
    /// Pace frames on the wall clock. When off, every frame advances exactly
    /// `1 / target_fps` seconds and metrics use that simulated clock.
    pub realtime: bool,
    pub start_room: Option<RoomId>,
    pub sim: SimConfig,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            max_frame_delta: Duration::from_millis(250),
            metrics_log_interval: Duration::from_secs(1),
            max_frames: None,
            realtime: false,
            start_room: None,
            sim: SimConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to load rooms: {0}")]
    Content(#[from] ContentError),
    #[error("failed to start simulation: {0}")]
    Simulation(#[from] SimError),
    #[error("no rooms available to start in")]
    NoRooms,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub simulation_ticks: u64,
    pub transitions: u32,
    pub paths_found: u32,
    pub final_room: RoomId,
    pub quit_requested: bool,
    /// Most recent interval snapshot; `None` when the run was shorter than
    /// one metrics interval.
    pub last_metrics: Option<LoopMetricsSnapshot>,
}

pub fn run_app(config: LoopConfig, input: &mut dyn InputSource) -> Result<RunSummary, AppError> {
    let app_paths = resolve_app_paths()?;
    info!(
        root = %app_paths.root.display(),
        maps_dir = %app_paths.maps_dir.display(),
        scripts_dir = %app_paths.scripts_dir.display(),
        "startup"
    );

    let rooms = load_rooms(&app_paths.maps_dir)?;
    let start = resolve_start_room(config.start_room.clone(), &rooms)?;
    let mut simulation = Simulation::new(rooms, start, config.sim.clone())?;
    Ok(run_frames(&mut simulation, input, &config))
}

/// Drives `simulation` one tick per frame until the input runs out, a quit is
/// requested, or the frame limit is reached.
pub fn run_frames(
    simulation: &mut Simulation,
    input: &mut dyn InputSource,
    config: &LoopConfig,
) -> RunSummary {
    let target_fps = config.target_fps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let fixed_dt = Duration::from_secs_f64(1.0 / target_fps as f64);
    let max_frames = resolve_frame_limit(config.max_frames);

    info!(
        target_fps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        realtime = config.realtime,
        max_frames = %format_frame_limit(max_frames),
        room = %simulation.room().id(),
        "loop_config"
    );

    let started = Instant::now();
    let mut clock = started;
    let mut last_frame_instant = started;
    let mut metrics = MetricsAccumulator::new(started, metrics_log_interval);
    let mut summary = RunSummary {
        frames: 0,
        simulation_ticks: 0,
        transitions: 0,
        paths_found: 0,
        final_room: simulation.room().id().clone(),
        quit_requested: false,
        last_metrics: None,
    };

    while max_frames.map_or(true, |limit| summary.frames < limit) {
        let Some(snapshot) = input.next_frame() else {
            info!(reason = "input_exhausted", "shutdown_requested");
            break;
        };

        let frame_start = Instant::now();
        let raw_frame_dt = if config.realtime {
            frame_start.saturating_duration_since(last_frame_instant)
        } else {
            fixed_dt
        };
        last_frame_instant = frame_start;
        let frame_dt = clamp_frame_delta(raw_frame_dt, max_frame_delta);
        clock = if config.realtime {
            frame_start
        } else {
            clock + frame_dt
        };

        let outcome = simulation.tick(frame_dt.as_secs_f32(), &snapshot);
        summary.frames += 1;
        if !outcome.transitioning {
            summary.simulation_ticks += 1;
            metrics.record_tick();
        }
        if outcome.transition_started.is_some() {
            summary.transitions += 1;
            metrics.record_transition();
        }
        if matches!(outcome.path, Some(Ok(_))) {
            summary.paths_found += 1;
        }

        metrics.record_frame(raw_frame_dt);
        if let Some(metrics_snapshot) = metrics.maybe_snapshot(clock) {
            info!(
                fps = metrics_snapshot.fps,
                tps = metrics_snapshot.tps,
                frame_time_ms = metrics_snapshot.frame_time_ms,
                transitions = metrics_snapshot.transitions,
                room = %simulation.room().id(),
                "loop_metrics"
            );
            summary.last_metrics = Some(metrics_snapshot);
        }

        if outcome.quit_requested {
            summary.quit_requested = true;
            info!(reason = "quit_action", "shutdown_requested");
            break;
        }

        if config.realtime {
            let pause = compute_cap_sleep(frame_start.elapsed(), fixed_dt);
            if !pause.is_zero() {
                thread::sleep(pause);
            }
        }
    }

    summary.final_room = simulation.room().id().clone();
    info!(
        frames = summary.frames,
        simulation_ticks = summary.simulation_ticks,
        transitions = summary.transitions,
        paths_found = summary.paths_found,
        room = %summary.final_room,
        "shutdown"
    );
    summary
}

/// `TILEWALK_START_ROOM` wins over the configured room; with neither, the
/// first room by id is used.
pub fn resolve_start_room(
    configured: Option<RoomId>,
    rooms: &RoomRegistry,
) -> Result<RoomId, AppError> {
    match env::var(START_ROOM_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => return Ok(RoomId::new(value.trim())),
        Ok(_) | Err(env::VarError::NotPresent) => {}
        Err(err) => warn!(
            env_var = START_ROOM_ENV_VAR,
            error = %err,
            "unable to read start-room env var; falling back to config"
        ),
    }
    configured
        .or_else(|| rooms.ids().next().cloned())
        .ok_or(AppError::NoRooms)
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn compute_cap_sleep(elapsed: Duration, frame_target: Duration) -> Duration {
    frame_target.saturating_sub(elapsed)
}

fn format_frame_limit(limit: Option<u64>) -> String {
    match limit {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}

fn resolve_frame_limit(config_limit: Option<u64>) -> Option<u64> {
    match env::var(FRAME_LIMIT_ENV_VAR) {
        Ok(value) => match value.parse::<u64>() {
            Ok(frames) => Some(frames),
            Err(_) => {
                warn!(
                    env_var = FRAME_LIMIT_ENV_VAR,
                    value = value.as_str(),
                    "invalid frame-limit env var value; falling back to config"
                );
                config_limit
            }
        },
        Err(env::VarError::NotPresent) => config_limit,
        Err(err) => {
            warn!(
                env_var = FRAME_LIMIT_ENV_VAR,
                error = %err,
                "unable to read frame-limit env var; falling back to config"
            );
            config_limit
        }
    }
}
