mod actor;
mod collision;
mod geometry;
mod input;
mod loop_runner;
mod metrics;
mod nav;
mod room;
mod simulation;
mod transition;

pub use actor::{
    clamp_velocity, Actor, ActorHandle, ActorKind, ActorSet, ActorView, Body, Enemy, EnemyId,
    EnemyStep, Kinematics, Player, ENEMY_SIZE, ENEMY_SPEED, ENEMY_WAYPOINT_THRESHOLD_SQ,
    PLAYER_ACCELERATION, PLAYER_DECELERATION, PLAYER_MAX_SPEED, PLAYER_SIZE,
};
pub use collision::{collision_directions, resolve, CollisionDirections, CollisionReport};
pub use geometry::{Rect, Vec2};
pub use input::{InputAction, InputSnapshot};
pub use loop_runner::{
    resolve_start_room, run_app, run_frames, AppError, InputSource, LoopConfig, RunSummary,
    FRAME_LIMIT_ENV_VAR, START_ROOM_ENV_VAR,
};
pub use metrics::LoopMetricsSnapshot;
pub use nav::{
    FoundPath, GraphError, PathError, PathFinder, Route, Tile, TileGraph, TileId, TileLink,
    DIAGONAL_WEIGHT, ORTHOGONAL_WEIGHT, WALKABLE_TILE_CODE,
};
pub use room::{Door, PathingGrid, Room, RoomEntry, RoomId, RoomRegistry, Wall, Zone};
pub use simulation::{
    DebugFlags, FrameSnapshot, SimConfig, SimError, Simulation, TickOutcome, WorldTimer,
    DEFAULT_WORLD_TIMER_SECONDS,
};
pub use transition::{
    RoomTransitionController, TransitionError, TransitionTick, DEFAULT_TRANSITION_SECONDS,
};
