use std::collections::VecDeque;

use thiserror::Error;

use super::graph::{TileGraph, TileId};

/// Ordered waypoints from the tile after the start up to and including the
/// goal. Consumers take the front to get the next step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    waypoints: VecDeque<TileId>,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> Option<TileId> {
        self.waypoints.front().copied()
    }

    pub fn pop_next(&mut self) -> Option<TileId> {
        self.waypoints.pop_front()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TileId> + '_ {
        self.waypoints.iter().copied()
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }
}

impl FromIterator<TileId> for Route {
    fn from_iter<I: IntoIterator<Item = TileId>>(iter: I) -> Self {
        Self {
            waypoints: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("tile {tile:?} is outside a graph of {len} tiles")]
    TileOutOfRange { tile: TileId, len: usize },
    #[error("no path from {start:?} to {end:?}")]
    NoPathFound { start: TileId, end: TileId },
    #[error("search stopped after {iterations} iterations without reaching {end:?}")]
    IterationLimit { iterations: usize, end: TileId },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoundPath {
    pub route: Route,
    pub total_weight: f32,
    pub settled: usize,
}

#[derive(Debug, Clone, Copy)]
struct SearchNode {
    visited: bool,
    queued: bool,
    distance: f32,
    predecessor: Option<TileId>,
}

impl Default for SearchNode {
    fn default() -> Self {
        Self {
            visited: false,
            queued: false,
            distance: f32::INFINITY,
            predecessor: None,
        }
    }
}

/// Per-query search state, indexed by tile id.
#[derive(Debug)]
struct SearchScratch {
    nodes: Vec<SearchNode>,
    candidates: Vec<TileId>,
}

impl SearchScratch {
    fn new(node_count: usize) -> Self {
        Self {
            nodes: vec![SearchNode::default(); node_count],
            candidates: Vec::new(),
        }
    }

    fn enqueue(&mut self, tile: TileId) {
        let node = &mut self.nodes[tile.0];
        if !node.queued {
            node.queued = true;
            self.candidates.push(tile);
        }
    }

    /// Removes and returns the unvisited candidate with the smallest finite
    /// distance. Ties go to the earliest enqueued.
    fn take_closest_candidate(&mut self) -> Option<TileId> {
        let mut best: Option<(usize, f32)> = None;
        for (position, tile) in self.candidates.iter().enumerate() {
            let node = self.nodes[tile.0];
            if node.visited || !node.distance.is_finite() {
                continue;
            }
            match best {
                Some((_, best_distance)) if best_distance <= node.distance => {}
                _ => best = Some((position, node.distance)),
            }
        }
        let (position, _) = best?;
        Some(self.candidates.remove(position))
    }
}

/// Single-source shortest-path queries over a [`TileGraph`].
///
/// Each call allocates its own scratch, so the graph is only ever borrowed
/// immutably and back-to-back queries cannot see each other's state.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathFinder {
    iteration_cap: Option<usize>,
}

impl PathFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of settled nodes. Defaults to the graph's node count,
    /// which a terminating search can never exceed.
    pub fn with_iteration_cap(mut self, cap: usize) -> Self {
        self.iteration_cap = Some(cap);
        self
    }

    pub fn find_path(
        &self,
        graph: &TileGraph,
        start: TileId,
        end: TileId,
    ) -> Result<FoundPath, PathError> {
        let len = graph.len();
        for tile in [start, end] {
            if tile.0 >= len {
                return Err(PathError::TileOutOfRange { tile, len });
            }
        }

        let mut scratch = SearchScratch::new(len);
        scratch.nodes[start.0].distance = 0.0;
        scratch.nodes[start.0].visited = true;

        let cap = self.iteration_cap.unwrap_or(len);
        let mut iterations = 0usize;
        let mut current = start;

        while current != end {
            if iterations >= cap {
                return Err(PathError::IterationLimit { iterations, end });
            }
            iterations += 1;

            let current_distance = scratch.nodes[current.0].distance;
            if let Some(tile) = graph.tile(current) {
                for link in tile.links() {
                    let neighbor = &mut scratch.nodes[link.to.0];
                    if neighbor.visited {
                        continue;
                    }
                    let relaxed = current_distance + link.weight;
                    if relaxed < neighbor.distance {
                        neighbor.distance = relaxed;
                        neighbor.predecessor = Some(current);
                    }
                    scratch.enqueue(link.to);
                }
            }
            scratch.nodes[current.0].visited = true;

            current = scratch
                .take_closest_candidate()
                .ok_or(PathError::NoPathFound { start, end })?;
        }

        let mut reversed = Vec::new();
        let mut cursor = end;
        while cursor != start {
            reversed.push(cursor);
            cursor = scratch.nodes[cursor.0]
                .predecessor
                .ok_or(PathError::NoPathFound { start, end })?;
        }

        Ok(FoundPath {
            route: reversed.into_iter().rev().collect(),
            total_weight: scratch.nodes[end.0].distance,
            settled: iterations,
        })
    }
}
