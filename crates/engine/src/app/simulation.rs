use thiserror::Error;
use tracing::{debug, info, warn};

use super::actor::{
    Actor, ActorHandle, ActorSet, ActorView, Enemy, EnemyId, EnemyStep, Kinematics, Player,
    ENEMY_SPEED, ENEMY_WAYPOINT_THRESHOLD_SQ,
};
use super::collision::CollisionReport;
use super::geometry::Vec2;
use super::input::{InputAction, InputSnapshot};
use super::nav::{PathError, PathFinder, TileId};
use super::room::{Door, Room, RoomEntry, RoomId, RoomRegistry, Wall, Zone};
use super::transition::{RoomTransitionController, TransitionError, DEFAULT_TRANSITION_SECONDS};

pub const DEFAULT_WORLD_TIMER_SECONDS: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub player_spawn: Vec2,
    pub player_kinematics: Kinematics,
    pub enemy_spawns: Vec<Vec2>,
    pub enemy_speed: f32,
    pub enemy_waypoint_threshold_sq: f32,
    pub transition_seconds: f32,
    pub world_timer_seconds: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            player_spawn: Vec2 { x: 100.0, y: 100.0 },
            player_kinematics: Kinematics::default(),
            enemy_spawns: vec![Vec2 {
                x: 1100.0,
                y: 700.0,
            }],
            enemy_speed: ENEMY_SPEED,
            enemy_waypoint_threshold_sq: ENEMY_WAYPOINT_THRESHOLD_SQ,
            transition_seconds: DEFAULT_TRANSITION_SECONDS,
            world_timer_seconds: DEFAULT_WORLD_TIMER_SECONDS,
        }
    }
}

/// Recurring counter that fires every `interval` seconds of simulated time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTimer {
    interval: f32,
    elapsed: f32,
    fired: u64,
}

impl WorldTimer {
    pub fn new(interval: f32) -> Self {
        let interval = if interval.is_finite() && interval > 0.0 {
            interval
        } else {
            DEFAULT_WORLD_TIMER_SECONDS
        };
        Self {
            interval,
            elapsed: 0.0,
            fired: 0,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Returns how many times the timer fired during this step.
    pub fn tick(&mut self, dt: f32) -> u32 {
        self.elapsed += dt.max(0.0);
        let mut fired_now = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            self.fired += 1;
            fired_now += 1;
            debug!(fired = self.fired, "world_timer_fired");
        }
        fired_now
    }
}

/// Renderer-facing debug overlays. Both flip together on `ToggleDebug`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugFlags {
    pub show_collision_boxes: bool,
    pub show_paths: bool,
}

impl DebugFlags {
    pub fn any(&self) -> bool {
        self.show_collision_boxes || self.show_paths
    }

    pub fn toggle(&mut self) {
        let enabled = !self.any();
        self.show_collision_boxes = enabled;
        self.show_paths = enabled;
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("{0:?} does not follow routes")]
    NotRouteDriven(ActorHandle),
    #[error("{handle:?} at ({x}, {y}) is outside the pathing grid of room '{room}'")]
    OffGrid {
        handle: ActorHandle,
        room: RoomId,
        x: f32,
        y: f32,
    },
    #[error("no actor registered for {0:?}")]
    UnknownActor(ActorHandle),
    #[error("unknown room '{0}'")]
    UnknownRoom(RoomId),
}

/// What happened during one [`Simulation::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// The tick only advanced the room transition.
    pub transitioning: bool,
    pub room_entered: Option<RoomId>,
    pub transition_started: Option<RoomId>,
    pub transition_finished: bool,
    pub debug_toggled: bool,
    /// Route length on success.
    pub path: Option<Result<usize, SimError>>,
    pub timers_fired: u32,
    pub collisions: CollisionReport,
    pub enemy_steps: Vec<EnemyStep>,
    pub zone_entered: Option<u32>,
    pub quit_requested: bool,
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot<'a> {
    pub room_id: &'a RoomId,
    pub room_name: &'a str,
    pub image_name: &'a str,
    pub actors: Vec<ActorView>,
    pub walls: &'a [Wall],
    pub doors: &'a [Door],
    pub zones: &'a [Zone],
    pub overlay_alpha: Option<f32>,
    pub active_message: Option<&'a str>,
    pub debug: DebugFlags,
    /// Tiles of the last successful path query, start excluded.
    pub path_tiles: &'a [TileId],
    /// World positions of `path_tiles`.
    pub path_points: Vec<Vec2>,
}

/// Frame-driven game state: the loaded rooms, the active room, the actors and
/// the transition between rooms.
///
/// Each [`tick`](Self::tick) either advances an in-flight transition and
/// nothing else, or runs commands, world timers, the player, every enemy in
/// registration order, and finally the door and zone checks.
#[derive(Debug, Clone)]
pub struct Simulation {
    rooms: RoomRegistry,
    room: Room,
    actors: ActorSet,
    transitions: RoomTransitionController,
    path_finder: PathFinder,
    world_timer: WorldTimer,
    debug: DebugFlags,
    active_zone: Option<usize>,
    last_path: Vec<TileId>,
    ticks: u64,
}

impl Simulation {
    pub fn new(rooms: RoomRegistry, start: RoomId, config: SimConfig) -> Result<Self, SimError> {
        let room = rooms
            .get(&start)
            .cloned()
            .ok_or_else(|| SimError::UnknownRoom(start.clone()))?;

        let mut actors = ActorSet::new(Player::new(config.player_spawn, config.player_kinematics));
        for spawn in &config.enemy_spawns {
            actors.add_enemy(Enemy::new(
                *spawn,
                config.enemy_speed,
                config.enemy_waypoint_threshold_sq,
            ));
        }

        info!(
            room = %start,
            rooms = rooms.len(),
            enemies = actors.enemies().len(),
            "simulation_started"
        );

        Ok(Self {
            rooms,
            room,
            actors,
            transitions: RoomTransitionController::new(config.transition_seconds),
            path_finder: PathFinder::new(),
            world_timer: WorldTimer::new(config.world_timer_seconds),
            debug: DebugFlags::default(),
            active_zone: None,
            last_path: Vec::new(),
            ticks: 0,
        })
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn actors(&self) -> &ActorSet {
        &self.actors
    }

    pub fn debug_flags(&self) -> DebugFlags {
        self.debug
    }

    pub fn world_timer(&self) -> &WorldTimer {
        &self.world_timer
    }

    pub fn transitions(&self) -> &RoomTransitionController {
        &self.transitions
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitions.is_transitioning()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick(&mut self, dt: f32, input: &InputSnapshot) -> TickOutcome {
        self.ticks += 1;
        let mut outcome = TickOutcome {
            quit_requested: input.quit_requested(),
            ..TickOutcome::default()
        };

        if self.transitions.is_transitioning() {
            outcome.transitioning = true;
            let step = self.transitions.tick(dt);
            if let Some(entry) = step.midpoint {
                outcome.room_entered = self.enter_room(entry);
            }
            outcome.transition_finished = step.finished.is_some();
            return outcome;
        }

        self.run_commands(input, &mut outcome);
        outcome.timers_fired = self.world_timer.tick(dt);

        outcome.collisions = self.actors.player_mut().tick(input, self.room.wall_rects());
        let room = &self.room;
        outcome.enemy_steps = self
            .actors
            .enemies_mut()
            .iter_mut()
            .map(|enemy| enemy.tick(room))
            .collect();

        self.check_doors(&mut outcome);
        self.check_zones(&mut outcome);
        outcome
    }

    /// Starts a transition to `destination`; the player lands on `spawn` at
    /// the midpoint.
    pub fn change_room(&mut self, destination: RoomId, spawn: Vec2) -> Result<(), SimError> {
        self.transitions
            .change_room(&self.rooms, destination, spawn)
            .map_err(SimError::from)
    }

    /// Routes the route-following actor `from` through the current room to
    /// the tile nearest `to`. Returns the number of waypoints.
    pub fn request_path(&mut self, from: ActorHandle, to: ActorHandle) -> Result<usize, SimError> {
        let result = self.route_between(from, to);
        match &result {
            Ok(waypoints) => info!(
                room = %self.room.id(),
                from = ?from,
                to = ?to,
                waypoints,
                "path_found"
            ),
            Err(error) => warn!(
                room = %self.room.id(),
                from = ?from,
                to = ?to,
                error = %error,
                "path_failed"
            ),
        }
        result
    }

    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        FrameSnapshot {
            room_id: self.room.id(),
            room_name: self.room.name(),
            image_name: self.room.image_name(),
            actors: self.actors.views(),
            walls: self.room.walls(),
            doors: self.room.doors(),
            zones: self.room.zones(),
            overlay_alpha: self.transitions.overlay_alpha(),
            active_message: self
                .active_zone
                .and_then(|index| self.room.zones().get(index))
                .and_then(|zone| zone.message.as_deref()),
            debug: self.debug,
            path_tiles: &self.last_path,
            path_points: self
                .last_path
                .iter()
                .filter_map(|tile| self.room.tile_position(*tile))
                .collect(),
        }
    }

    fn run_commands(&mut self, input: &InputSnapshot, outcome: &mut TickOutcome) {
        if input.is_down(InputAction::ToggleDebug) {
            self.debug.toggle();
            outcome.debug_toggled = true;
            info!(enabled = self.debug.any(), "debug_toggled");
        }
        if input.is_down(InputAction::RequestPath) && !self.actors.enemies().is_empty() {
            let chaser = ActorHandle::Enemy(EnemyId(0));
            outcome.path = Some(self.request_path(chaser, ActorHandle::Player));
        }
    }

    fn route_between(&mut self, from: ActorHandle, to: ActorHandle) -> Result<usize, SimError> {
        let ActorHandle::Enemy(enemy_id) = from else {
            return Err(SimError::NotRouteDriven(from));
        };
        let start = self.actor_tile(from)?;
        let end = self.actor_tile(to)?;
        let found = self.path_finder.find_path(self.room.graph(), start, end)?;

        self.last_path = found.route.iter().collect();
        let waypoints = found.route.len();
        debug!(
            total_weight = found.total_weight,
            settled = found.settled,
            "path_search_finished"
        );
        self.actors
            .enemy_mut(enemy_id)
            .ok_or(SimError::UnknownActor(from))?
            .set_route(found.route);
        Ok(waypoints)
    }

    fn actor_tile(&self, handle: ActorHandle) -> Result<TileId, SimError> {
        let position = self
            .actors
            .body(handle)
            .ok_or(SimError::UnknownActor(handle))?
            .position;
        self.room
            .closest_tile(position)
            .ok_or_else(|| SimError::OffGrid {
                handle,
                room: self.room.id().clone(),
                x: position.x,
                y: position.y,
            })
    }

    fn check_doors(&mut self, outcome: &mut TickOutcome) {
        let player_box = self.actors.player().body().bounding_box();
        let Some(entry) = self.room.triggered_door(&player_box).cloned() else {
            return;
        };
        let destination = entry.destination.clone();
        match self
            .transitions
            .change_room(&self.rooms, entry.destination, entry.spawn)
        {
            Ok(()) => outcome.transition_started = Some(destination),
            Err(error) => warn!(
                room = %self.room.id(),
                destination = %destination,
                error = %error,
                "door_rejected"
            ),
        }
    }

    fn check_zones(&mut self, outcome: &mut TickOutcome) {
        let player_box = self.actors.player().body().bounding_box();
        let entered = self
            .room
            .zone_at(&player_box)
            .map(|(index, zone)| (index, zone.id));
        let zone_index = entered.map(|(index, _)| index);
        if zone_index != self.active_zone {
            if let Some((_, zone_id)) = entered {
                debug!(room = %self.room.id(), zone = zone_id, "zone_entered");
                outcome.zone_entered = Some(zone_id);
            }
            self.active_zone = zone_index;
        }
    }

    fn enter_room(&mut self, entry: RoomEntry) -> Option<RoomId> {
        let Some(room) = self.rooms.get(&entry.destination).cloned() else {
            warn!(destination = %entry.destination, "transition_destination_missing");
            return None;
        };
        self.room = room;
        self.actors.player_mut().body_mut().teleport(entry.spawn);
        for enemy in self.actors.enemies_mut() {
            enemy.clear_route();
        }
        self.active_zone = None;
        self.last_path.clear();
        info!(
            room = %entry.destination,
            spawn_x = entry.spawn.x,
            spawn_y = entry.spawn.y,
            "room_entered"
        );
        Some(entry.destination)
    }
}
