use std::collections::BTreeMap;
use std::fmt;

use super::geometry::{Rect, Vec2};
use super::nav::{TileGraph, TileId};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomEntry {
    pub destination: RoomId,
    pub spawn: Vec2,
}

/// Doorway zone. A door without a target failed validation at load and never
/// triggers a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Door {
    pub rect: Rect,
    pub target: Option<RoomEntry>,
}

impl Door {
    pub fn is_inert(&self) -> bool {
        self.target.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub id: u32,
    pub rect: Rect,
    pub message: Option<String>,
}

/// World placement of the pathing grid: tile (x, y) sits at
/// `origin + (x, y) * tile_size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathingGrid {
    pub origin: Vec2,
    pub tile_size: f32,
}

impl Default for PathingGrid {
    fn default() -> Self {
        Self {
            origin: Vec2 { x: 660.0, y: 480.0 },
            tile_size: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    id: RoomId,
    name: String,
    image_name: String,
    graph: TileGraph,
    grid: PathingGrid,
    walls: Vec<Wall>,
    doors: Vec<Door>,
    zones: Vec<Zone>,
}

impl Room {
    pub fn new(
        id: RoomId,
        name: impl Into<String>,
        image_name: impl Into<String>,
        graph: TileGraph,
        grid: PathingGrid,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            image_name: image_name.into(),
            graph,
            grid,
            walls: Vec::new(),
            doors: Vec::new(),
            zones: Vec::new(),
        }
    }

    pub fn with_walls(mut self, walls: Vec<Wall>) -> Self {
        self.walls = walls;
        self
    }

    pub fn with_doors(mut self, doors: Vec<Door>) -> Self {
        self.doors = doors;
        self
    }

    pub fn with_zones(mut self, zones: Vec<Zone>) -> Self {
        self.zones = zones;
        self
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    pub fn graph(&self) -> &TileGraph {
        &self.graph
    }

    pub fn grid(&self) -> PathingGrid {
        self.grid
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn wall_rects(&self) -> impl Iterator<Item = &Rect> + '_ {
        self.walls.iter().map(|wall| &wall.rect)
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub(crate) fn doors_mut(&mut self) -> &mut [Door] {
        &mut self.doors
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Grid tile nearest to a world position, by rounding.
    pub fn closest_tile(&self, position: Vec2) -> Option<TileId> {
        let tile_x = ((position.x - self.grid.origin.x) / self.grid.tile_size).round();
        let tile_y = ((position.y - self.grid.origin.y) / self.grid.tile_size).round();
        if !tile_x.is_finite() || !tile_y.is_finite() || tile_x < 0.0 || tile_y < 0.0 {
            return None;
        }
        self.graph.index_of(tile_x as u32, tile_y as u32)
    }

    pub fn tile_position(&self, tile: TileId) -> Option<Vec2> {
        let tile = self.graph.tile(tile)?;
        Some(Vec2 {
            x: self.grid.origin.x + tile.grid_x() as f32 * self.grid.tile_size,
            y: self.grid.origin.y + tile.grid_y() as f32 * self.grid.tile_size,
        })
    }

    /// First door in load order whose zone overlaps `bounding_box` and that
    /// has a usable target.
    pub fn triggered_door(&self, bounding_box: &Rect) -> Option<&RoomEntry> {
        self.doors
            .iter()
            .filter(|door| bounding_box.collides(&door.rect))
            .find_map(|door| door.target.as_ref())
    }

    /// First zone in load order overlapping `bounding_box`, with its index.
    pub fn zone_at(&self, bounding_box: &Rect) -> Option<(usize, &Zone)> {
        self.zones
            .iter()
            .enumerate()
            .find(|(_, zone)| bounding_box.collides(&zone.rect))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoomRegistry {
    rooms: BTreeMap<RoomId, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the room previously registered under the same id, if any.
    pub fn insert(&mut self, room: Room) -> Option<Room> {
        self.rooms.insert(room.id.clone(), room)
    }

    pub fn get(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn contains(&self, id: &RoomId) -> bool {
        self.rooms.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &RoomId> + '_ {
        self.rooms.keys()
    }

    pub(crate) fn rooms_mut(&mut self) -> impl Iterator<Item = &mut Room> + '_ {
        self.rooms.values_mut()
    }
}

impl FromIterator<Room> for RoomRegistry {
    fn from_iter<I: IntoIterator<Item = Room>>(iter: I) -> Self {
        let mut registry = Self::new();
        for room in iter {
            registry.insert(room);
        }
        registry
    }
}
