use thiserror::Error;
use tracing::{debug, info};

use super::geometry::Vec2;
use super::room::{RoomEntry, RoomId, RoomRegistry};

pub const DEFAULT_TRANSITION_SECONDS: f32 = 1.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("unknown destination room '{0}'")]
    InvalidDestination(RoomId),
    #[error("already transitioning to room '{0}'")]
    AlreadyTransitioning(RoomId),
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveTransition {
    entry: RoomEntry,
    remaining: f32,
    teleported: bool,
}

/// What a single controller tick asks the caller to do.
///
/// Both fields can be set on the same tick when `dt` covers more than half
/// the duration; the midpoint must be applied first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionTick {
    pub midpoint: Option<RoomEntry>,
    pub finished: Option<RoomId>,
}

/// Timed fade between rooms.
///
/// `Idle` until [`change_room`](Self::change_room) succeeds, then
/// `Transitioning` for `duration` seconds. The swap to the destination room
/// happens once, the first tick the remaining time drops below half.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomTransitionController {
    duration: f32,
    active: Option<ActiveTransition>,
}

impl Default for RoomTransitionController {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSITION_SECONDS)
    }
}

impl RoomTransitionController {
    pub fn new(duration: f32) -> Self {
        let duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            DEFAULT_TRANSITION_SECONDS
        };
        Self {
            duration,
            active: None,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_transitioning(&self) -> bool {
        self.active.is_some()
    }

    pub fn remaining(&self) -> Option<f32> {
        self.active.as_ref().map(|active| active.remaining)
    }

    pub fn destination(&self) -> Option<&RoomEntry> {
        self.active.as_ref().map(|active| &active.entry)
    }

    pub fn change_room(
        &mut self,
        rooms: &RoomRegistry,
        destination: RoomId,
        spawn: Vec2,
    ) -> Result<(), TransitionError> {
        if let Some(active) = &self.active {
            return Err(TransitionError::AlreadyTransitioning(
                active.entry.destination.clone(),
            ));
        }
        if !rooms.contains(&destination) {
            return Err(TransitionError::InvalidDestination(destination));
        }

        info!(
            destination = %destination,
            spawn_x = spawn.x,
            spawn_y = spawn.y,
            duration = self.duration,
            "transition_started"
        );
        self.active = Some(ActiveTransition {
            entry: RoomEntry { destination, spawn },
            remaining: self.duration,
            teleported: false,
        });
        Ok(())
    }

    pub fn tick(&mut self, dt: f32) -> TransitionTick {
        let mut outcome = TransitionTick::default();
        let half = self.duration / 2.0;
        let Some(active) = self.active.as_mut() else {
            return outcome;
        };

        active.remaining -= dt;
        if !active.teleported && active.remaining < half {
            active.teleported = true;
            debug!(destination = %active.entry.destination, "transition_midpoint");
            outcome.midpoint = Some(active.entry.clone());
        }
        if active.remaining < 0.0 {
            let finished = active.entry.destination.clone();
            info!(destination = %finished, "transition_finished");
            outcome.finished = Some(finished);
            self.active = None;
        }
        outcome
    }

    /// Overlay opacity for the renderer: 0 → 1 over the first half, 1 → 0
    /// over the second. `None` when idle or once the timer has run out.
    pub fn overlay_alpha(&self) -> Option<f32> {
        let active = self.active.as_ref()?;
        if active.remaining <= 0.0 {
            return None;
        }
        let half = self.duration / 2.0;
        let alpha = if active.remaining >= half {
            (self.duration - active.remaining) / half
        } else {
            active.remaining / half
        };
        Some(alpha.clamp(0.0, 1.0))
    }
}
