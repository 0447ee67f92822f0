use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::app::{
    Door, PathingGrid, Rect, Room, RoomEntry, RoomId, RoomRegistry, TileGraph, Vec2, Wall, Zone,
};

use super::manifest::{MapManifest, MAP_MANIFEST_FILE};
use super::parse_json;
use super::tiled::{TiledMap, TiledObject, TiledProperty};
use super::types::{ContentError, DoorPropertyError};

pub const PATHING_LAYER: &str = "pathing";
pub const WALLS_LAYER: &str = "walls";
pub const DOORS_LAYER: &str = "doors";
pub const KEYS_LAYER: &str = "keys";

const NAME_PROPERTY: &str = "name";
const IMAGE_NAME_PROPERTY: &str = "imageName";
const ORIGIN_X_PROPERTY: &str = "pathingOriginX";
const ORIGIN_Y_PROPERTY: &str = "pathingOriginY";
const TILE_SIZE_PROPERTY: &str = "tileSize";
const MESSAGE_PROPERTY: &str = "message";

/// Loads every room listed in `<maps_dir>/mapManifest.json`.
///
/// Any room that fails to load fails the whole call; a registry never holds a
/// room with partial geometry.
pub fn load_rooms(maps_dir: &Path) -> Result<RoomRegistry, ContentError> {
    let manifest_path = maps_dir.join(MAP_MANIFEST_FILE);
    let raw = read_file(&manifest_path)?;
    let manifest = MapManifest::parse(&raw, &manifest_path)?;
    if manifest.is_empty() {
        return Err(ContentError::EmptyManifest {
            path: manifest_path,
        });
    }

    let mut rooms = RoomRegistry::new();
    for (id, relative_path) in manifest.entries() {
        let path = maps_dir.join(relative_path);
        info!(room = %id, path = %path.display(), "room_loading");
        rooms.insert(load_room_file(id.clone(), &path)?);
    }
    disable_dangling_doors(&mut rooms);
    Ok(rooms)
}

/// Makes inert every door whose destination is not a loaded room, so a bad
/// link is reported once here instead of on every tick the player overlaps it.
fn disable_dangling_doors(rooms: &mut RoomRegistry) {
    let known: BTreeSet<RoomId> = rooms.ids().cloned().collect();
    for room in rooms.rooms_mut() {
        let room_id = room.id().clone();
        for (index, door) in room.doors_mut().iter_mut().enumerate() {
            let Some(entry) = &door.target else {
                continue;
            };
            if known.contains(&entry.destination) {
                continue;
            }
            let error = DoorPropertyError::UnknownDestination(entry.destination.clone());
            warn!(room = %room_id, door = index, error = %error, "door_inert");
            door.target = None;
        }
    }
}

pub fn load_room_file(id: RoomId, path: &Path) -> Result<Room, ContentError> {
    let raw = read_file(path)?;
    let map: TiledMap = parse_json(&raw, path)?;
    build_room(id, &map)
}

pub fn build_room(id: RoomId, map: &TiledMap) -> Result<Room, ContentError> {
    let pathing = map
        .tile_layer(PATHING_LAYER)
        .ok_or_else(|| missing_layer(&id, PATHING_LAYER))?;
    let walls_layer = map
        .object_layer(WALLS_LAYER)
        .ok_or_else(|| missing_layer(&id, WALLS_LAYER))?;
    let doors_layer = map
        .object_layer(DOORS_LAYER)
        .ok_or_else(|| missing_layer(&id, DOORS_LAYER))?;

    let name = required_string(map, &id, NAME_PROPERTY)?;
    let image_name = required_string(map, &id, IMAGE_NAME_PROPERTY)?;
    let grid = pathing_grid(map, &id)?;

    let expected = pathing.width as usize * pathing.height as usize;
    if pathing.data.len() != expected {
        return Err(ContentError::GridSizeMismatch {
            room: id,
            expected,
            actual: pathing.data.len(),
        });
    }
    let graph = TileGraph::from_codes(&pathing.data, pathing.width).map_err(|source| {
        ContentError::InvalidGrid {
            room: id.clone(),
            source,
        }
    })?;

    let walls: Vec<Wall> = walls_layer
        .objects
        .iter()
        .map(|object| Wall {
            rect: object_rect(object),
        })
        .collect();

    let doors: Vec<Door> = doors_layer
        .objects
        .iter()
        .enumerate()
        .map(|(index, object)| {
            let target = match parse_door_target(object) {
                Ok(target) => Some(target),
                Err(error) => {
                    warn!(room = %id, door = index, object_id = object.id, error = %error, "door_inert");
                    None
                }
            };
            Door {
                rect: object_rect(object),
                target,
            }
        })
        .collect();

    let zones: Vec<Zone> = map
        .object_layer(KEYS_LAYER)
        .map(|layer| {
            layer
                .objects
                .iter()
                .map(|object| Zone {
                    id: object.id,
                    rect: object_rect(object),
                    message: object
                        .property(MESSAGE_PROPERTY)
                        .and_then(TiledProperty::as_str)
                        .map(ToString::to_string),
                })
                .collect()
        })
        .unwrap_or_default();

    info!(
        room = %id,
        name = %name,
        tiles = graph.len(),
        walls = walls.len(),
        doors = doors.len(),
        inert_doors = doors.iter().filter(|door| door.is_inert()).count(),
        zones = zones.len(),
        "room_loaded"
    );

    Ok(Room::new(id, name, image_name, graph, grid)
        .with_walls(walls)
        .with_doors(doors)
        .with_zones(zones))
}

pub fn parse_door_target(object: &TiledObject) -> Result<RoomEntry, DoorPropertyError> {
    let destination = object
        .property("destination")
        .and_then(TiledProperty::as_str)
        .ok_or(DoorPropertyError::MissingDoorProperty("destination"))?;
    let x = object
        .property("x")
        .and_then(TiledProperty::as_f32)
        .ok_or(DoorPropertyError::MissingDoorProperty("x"))?;
    let y = object
        .property("y")
        .and_then(TiledProperty::as_f32)
        .ok_or(DoorPropertyError::MissingDoorProperty("y"))?;
    Ok(RoomEntry {
        destination: RoomId::new(destination),
        spawn: Vec2 { x, y },
    })
}

fn read_file(path: &Path) -> Result<String, ContentError> {
    fs::read_to_string(path).map_err(|source| ContentError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

fn object_rect(object: &TiledObject) -> Rect {
    Rect::new(object.x, object.y, object.width, object.height)
}

fn missing_layer(room: &RoomId, layer: &'static str) -> ContentError {
    ContentError::MissingLayer {
        room: room.clone(),
        layer,
    }
}

fn required_string(
    map: &TiledMap,
    room: &RoomId,
    property: &'static str,
) -> Result<String, ContentError> {
    let value = map.property(property).ok_or_else(|| ContentError::MissingProperty {
        room: room.clone(),
        property,
    })?;
    value
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| ContentError::InvalidProperty {
            room: room.clone(),
            property,
            expected: "a string",
        })
}

fn optional_number(
    map: &TiledMap,
    room: &RoomId,
    property: &'static str,
) -> Result<Option<f32>, ContentError> {
    match map.property(property) {
        None => Ok(None),
        Some(value) => value
            .as_f32()
            .filter(|number| number.is_finite())
            .map(Some)
            .ok_or_else(|| ContentError::InvalidProperty {
                room: room.clone(),
                property,
                expected: "a finite number",
            }),
    }
}

fn pathing_grid(map: &TiledMap, room: &RoomId) -> Result<PathingGrid, ContentError> {
    let defaults = PathingGrid::default();
    let origin_x = optional_number(map, room, ORIGIN_X_PROPERTY)?.unwrap_or(defaults.origin.x);
    let origin_y = optional_number(map, room, ORIGIN_Y_PROPERTY)?.unwrap_or(defaults.origin.y);
    let tile_size = optional_number(map, room, TILE_SIZE_PROPERTY)?.unwrap_or(defaults.tile_size);
    if tile_size <= 0.0 {
        return Err(ContentError::InvalidProperty {
            room: room.clone(),
            property: TILE_SIZE_PROPERTY,
            expected: "a positive number",
        });
    }
    Ok(PathingGrid {
        origin: Vec2 {
            x: origin_x,
            y: origin_y,
        },
        tile_size,
    })
}
