use std::path::PathBuf;

use thiserror::Error;

use crate::app::{GraphError, RoomId};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path} at {json_path}: {source}")]
    ParseJson {
        path: PathBuf,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("map manifest entry '{room}' is a nested object; nested maps are not supported")]
    NestedManifestEntry { room: String },
    #[error("map manifest entry '{room}' must be a path string")]
    InvalidManifestEntry { room: String },
    #[error("map manifest {path} lists no rooms")]
    EmptyManifest { path: PathBuf },
    #[error("room '{room}' is missing required layer '{layer}'")]
    MissingLayer { room: RoomId, layer: &'static str },
    #[error("room '{room}' is missing required map property '{property}'")]
    MissingProperty {
        room: RoomId,
        property: &'static str,
    },
    #[error("room '{room}' property '{property}' must be {expected}")]
    InvalidProperty {
        room: RoomId,
        property: &'static str,
        expected: &'static str,
    },
    #[error("room '{room}' pathing layer declares {expected} tiles but holds {actual}")]
    GridSizeMismatch {
        room: RoomId,
        expected: usize,
        actual: usize,
    },
    #[error("room '{room}' has an invalid pathing grid: {source}")]
    InvalidGrid {
        room: RoomId,
        #[source]
        source: GraphError,
    },
}

/// A door that fails this check stays in the room as inert geometry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DoorPropertyError {
    #[error("door is missing required property '{0}'")]
    MissingDoorProperty(&'static str),
    #[error("door leads to room '{0}', which is not in the manifest")]
    UnknownDestination(RoomId),
}
