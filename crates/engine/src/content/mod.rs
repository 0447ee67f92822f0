mod loader;
mod manifest;
mod tiled;
mod types;

use std::path::Path;

use serde::de::DeserializeOwned;

pub use loader::{
    build_room, load_room_file, load_rooms, parse_door_target, DOORS_LAYER, KEYS_LAYER,
    PATHING_LAYER, WALLS_LAYER,
};
pub use manifest::{MapManifest, MAP_MANIFEST_FILE};
pub use tiled::{
    find_property, TiledLayer, TiledMap, TiledObject, TiledObjectLayer, TiledProperty,
    TiledTileLayer,
};
pub use types::{ContentError, DoorPropertyError};

/// Deserializes `raw`, reporting the JSON path of the first bad field.
pub(crate) fn parse_json<T: DeserializeOwned>(raw: &str, path: &Path) -> Result<T, ContentError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, T>(&mut deserializer).map_err(|error| {
        let json_path = error.path().to_string();
        ContentError::ParseJson {
            path: path.to_path_buf(),
            json_path,
            source: error.into_inner(),
        }
    })
}
