use std::f32::consts::SQRT_2;

use thiserror::Error;

/// Tile code that marks a cell as walkable. Every other code blocks movement.
pub const WALKABLE_TILE_CODE: u32 = 1;

pub const ORTHOGONAL_WEIGHT: f32 = 1.0;
pub const DIAGONAL_WEIGHT: f32 = SQRT_2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileLink {
    pub from: TileId,
    pub to: TileId,
    pub weight: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    id: TileId,
    code: u32,
    grid_x: u32,
    grid_y: u32,
    links: Vec<TileLink>,
}

impl Tile {
    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn grid_x(&self) -> u32 {
        self.grid_x
    }

    pub fn grid_y(&self) -> u32 {
        self.grid_y
    }

    pub fn is_walkable(&self) -> bool {
        self.code == WALKABLE_TILE_CODE
    }

    pub fn links(&self) -> &[TileLink] {
        &self.links
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("tile grid width must be non-zero")]
    ZeroWidth,
    #[error("tile count {count} is not a multiple of row width {width}")]
    RaggedGrid { count: usize, width: u32 },
}

// N, S, E, W first, then the diagonals. Link order decides which of several
// equal-cost routes the path finder settles on.
const NEIGHBOR_OFFSETS: [(i64, i64, f32); 8] = [
    (0, -1, ORTHOGONAL_WEIGHT),
    (0, 1, ORTHOGONAL_WEIGHT),
    (1, 0, ORTHOGONAL_WEIGHT),
    (-1, 0, ORTHOGONAL_WEIGHT),
    (1, -1, DIAGONAL_WEIGHT),
    (-1, -1, DIAGONAL_WEIGHT),
    (1, 1, DIAGONAL_WEIGHT),
    (-1, 1, DIAGONAL_WEIGHT),
];

/// Walkability graph over a row-major tile grid.
///
/// Built once per room; tiles and links never change afterwards. Search state
/// lives in the path finder's scratch, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGraph {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileGraph {
    pub fn from_codes(codes: &[u32], width: u32) -> Result<Self, GraphError> {
        if width == 0 {
            return Err(GraphError::ZeroWidth);
        }
        if codes.len() % width as usize != 0 {
            return Err(GraphError::RaggedGrid {
                count: codes.len(),
                width,
            });
        }
        let height = (codes.len() / width as usize) as u32;

        let mut tiles: Vec<Tile> = codes
            .iter()
            .enumerate()
            .map(|(index, code)| Tile {
                id: TileId(index),
                code: *code,
                grid_x: index as u32 % width,
                grid_y: index as u32 / width,
                links: Vec::new(),
            })
            .collect();

        for index in 0..tiles.len() {
            if !tiles[index].is_walkable() {
                continue;
            }
            let (x, y) = (tiles[index].grid_x, tiles[index].grid_y);
            let mut links = Vec::with_capacity(NEIGHBOR_OFFSETS.len());
            for (dx, dy, weight) in NEIGHBOR_OFFSETS {
                let Some(neighbor) = neighbor_index(width, height, x, y, dx, dy) else {
                    continue;
                };
                if !tiles[neighbor].is_walkable() {
                    continue;
                }
                links.push(TileLink {
                    from: TileId(index),
                    to: TileId(neighbor),
                    weight,
                });
            }
            tiles[index].links = links;
        }

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.0)
    }

    pub fn index_of(&self, x: u32, y: u32) -> Option<TileId> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(TileId(y as usize * self.width as usize + x as usize))
    }

    pub fn tile_at(&self, x: u32, y: u32) -> Option<&Tile> {
        self.index_of(x, y).and_then(|id| self.tile(id))
    }

    pub fn link_between(&self, from: TileId, to: TileId) -> Option<&TileLink> {
        self.tile(from)?.links.iter().find(|link| link.to == to)
    }
}

fn neighbor_index(width: u32, height: u32, x: u32, y: u32, dx: i64, dy: i64) -> Option<usize> {
    let nx = i64::from(x) + dx;
    let ny = i64::from(y) + dy;
    if nx < 0 || ny < 0 || nx >= i64::from(width) || ny >= i64::from(height) {
        return None;
    }
    Some(ny as usize * width as usize + nx as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(width: u32, height: u32) -> TileGraph {
        let codes = vec![WALKABLE_TILE_CODE; (width * height) as usize];
        TileGraph::from_codes(&codes, width).expect("graph")
    }

    #[test]
    fn rejects_zero_width_and_ragged_grids() {
        assert_eq!(TileGraph::from_codes(&[1, 1], 0), Err(GraphError::ZeroWidth));
        assert_eq!(
            TileGraph::from_codes(&[1, 1, 1], 2),
            Err(GraphError::RaggedGrid { count: 3, width: 2 })
        );
    }

    #[test]
    fn tiles_keep_grid_coordinates_and_codes() {
        let graph = TileGraph::from_codes(&[1, 0, 2, 1, 1, 1], 3).expect("graph");
        assert_eq!(graph.width(), 3);
        assert_eq!(graph.height(), 2);
        let tile = graph.tile_at(2, 0).expect("tile");
        assert_eq!(tile.code(), 2);
        assert_eq!(tile.id(), TileId(2));
        assert!(!tile.is_walkable());
        let tile = graph.tile_at(1, 1).expect("tile");
        assert_eq!((tile.grid_x(), tile.grid_y()), (1, 1));
        assert!(graph.tile_at(3, 0).is_none());
    }

    #[test]
    fn interior_open_tile_has_eight_links_with_expected_weights() {
        let graph = open_grid(3, 3);
        let center = graph.tile_at(1, 1).expect("center");
        assert_eq!(center.links().len(), 8);
        let orthogonal = center
            .links()
            .iter()
            .filter(|link| link.weight == ORTHOGONAL_WEIGHT)
            .count();
        let diagonal = center
            .links()
            .iter()
            .filter(|link| link.weight == DIAGONAL_WEIGHT)
            .count();
        assert_eq!((orthogonal, diagonal), (4, 4));
    }

    #[test]
    fn corner_tile_links_are_bounds_checked() {
        let graph = open_grid(3, 3);
        assert_eq!(graph.tile_at(0, 0).expect("corner").links().len(), 3);
        assert_eq!(graph.tile_at(1, 0).expect("edge").links().len(), 5);
    }

    #[test]
    fn no_link_touches_a_blocked_tile() {
        let graph = TileGraph::from_codes(&[1, 1, 1, 1, 0, 1, 1, 1, 1], 3).expect("graph");
        let blocked = graph.index_of(1, 1).expect("blocked");
        assert!(graph.tile(blocked).expect("tile").links().is_empty());
        for tile in graph.tiles() {
            for link in tile.links() {
                assert_ne!(link.to, blocked);
                assert_eq!(link.from, tile.id());
            }
        }
    }

    #[test]
    fn links_are_symmetric_with_equal_weight() {
        let codes = [
            1, 1, 0, 1, 1, //
            1, 0, 1, 1, 0, //
            1, 1, 1, 0, 1, //
            0, 1, 1, 1, 1, //
        ];
        let graph = TileGraph::from_codes(&codes, 5).expect("graph");
        for tile in graph.tiles() {
            for link in tile.links() {
                let back = graph
                    .link_between(link.to, link.from)
                    .expect("reverse link should exist");
                assert_eq!(back.weight, link.weight);
            }
        }
        for a in graph.tiles().iter().filter(|tile| tile.is_walkable()) {
            for b in graph.tiles().iter().filter(|tile| tile.is_walkable()) {
                let dx = a.grid_x().abs_diff(b.grid_x());
                let dy = a.grid_y().abs_diff(b.grid_y());
                let adjacent = a.id() != b.id() && dx <= 1 && dy <= 1;
                assert_eq!(graph.link_between(a.id(), b.id()).is_some(), adjacent);
            }
        }
    }
}
