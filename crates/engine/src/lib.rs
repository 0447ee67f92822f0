use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod content;

pub use app::{
    clamp_velocity, collision_directions, resolve_start_room, run_app, run_frames, Actor,
    ActorHandle, ActorKind, ActorSet, ActorView, AppError, Body, CollisionDirections,
    CollisionReport, DebugFlags, Door, Enemy, EnemyId, EnemyStep, FoundPath, FrameSnapshot,
    GraphError, InputAction, InputSnapshot, InputSource, Kinematics, LoopConfig,
    LoopMetricsSnapshot, PathError, PathFinder, PathingGrid, Player, Rect, Room, RoomEntry, RoomId,
    RoomRegistry, RoomTransitionController, Route, RunSummary, SimConfig, SimError, Simulation,
    TickOutcome, Tile, TileGraph, TileId, TileLink, TransitionError, TransitionTick, Vec2, Wall,
    WorldTimer, Zone, FRAME_LIMIT_ENV_VAR, START_ROOM_ENV_VAR,
};
pub use content::{load_room_file, load_rooms, ContentError, DoorPropertyError, MapManifest};

pub const ROOT_ENV_VAR: &str = "TILEWALK_ROOT";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
    pub maps_dir: PathBuf,
    pub scripts_dir: PathBuf,
}

impl AppPaths {
    pub fn from_root(root: PathBuf) -> Self {
        let assets_dir = root.join("assets");
        Self {
            maps_dir: assets_dir.join("maps"),
            scripts_dir: assets_dir.join("scripts"),
            assets_dir,
            root,
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "TILEWALK_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain an assets/maps/ directory."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing assets/maps/.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/tilewalk\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    resolve_root().map(AppPaths::from_root)
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let normalized = normalize_path(&PathBuf::from(value));
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            exe_dir
                .ancestors()
                .find(|candidate| is_repo_marker(candidate))
                .map(normalize_path)
                .ok_or_else(|| StartupError::RootNotFound {
                    start_dir: normalize_path(&exe_dir),
                    env_var: ROOT_ENV_VAR,
                })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn is_repo_marker(path: &Path) -> bool {
    path.join("assets").join("maps").is_dir()
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_marker_requires_maps_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(!is_repo_marker(dir.path()));

        fs::create_dir_all(dir.path().join("assets").join("maps")).expect("maps dir");
        assert!(is_repo_marker(dir.path()));
    }

    #[test]
    fn app_paths_hang_off_the_root() {
        let paths = AppPaths::from_root(PathBuf::from("/srv/tilewalk"));
        assert_eq!(paths.maps_dir, PathBuf::from("/srv/tilewalk/assets/maps"));
        assert_eq!(
            paths.scripts_dir,
            PathBuf::from("/srv/tilewalk/assets/scripts")
        );
    }
}
