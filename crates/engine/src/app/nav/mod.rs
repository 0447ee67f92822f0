mod graph;
mod path;

pub use graph::{
    GraphError, Tile, TileGraph, TileId, TileLink, DIAGONAL_WEIGHT, ORTHOGONAL_WEIGHT,
    WALKABLE_TILE_CODE,
};
pub use path::{FoundPath, PathError, PathFinder, Route};
