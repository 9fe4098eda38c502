//! Weighted best-first route search for enemies moving through a room.
//! Occupancy is read live through [`SpatialQuery`] while the search runs, and
//! no node state survives from one search to the next.

use std::collections::HashMap;

use crate::types::{Direction, Group, Tile};

pub const DEFAULT_SEARCH_CAP: u32 = 1000;

const STEP_COST: u32 = 1;
const ADJACENT_PENALTY: u32 = 5;
const CHAINED_PENALTY: u32 = 100;

/// Spatial view the search runs against.
pub trait SpatialQuery {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    /// Walkable and unoccupied right now.
    fn is_open(&self, tile: Tile) -> bool;
    /// Squad of the enemy standing on `tile`, if any.
    fn group_at(&self, tile: Tile) -> Option<&Group>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// Excludes the start, includes the destination. Empty when unreachable.
    pub tiles: Vec<Tile>,
    /// Accumulated weight recorded on the final tile.
    pub cost: f32,
    pub expansions: u32,
}

impl Route {
    fn unreachable(expansions: u32) -> Self {
        Self { tiles: Vec::new(), cost: 0.0, expansions }
    }
}

struct Node {
    tile: Tile,
    h: f32,
    g: Option<f32>,
    previous: Option<usize>,
    open: bool,
    closed: bool,
}

impl Node {
    fn f(&self) -> f32 {
        self.g.unwrap_or(0.0) + self.h
    }
}

struct Search {
    destination: Tile,
    nodes: Vec<Node>,
    index: HashMap<Tile, usize>,
}

impl Search {
    fn new(destination: Tile) -> Self {
        Self { destination, nodes: Vec::new(), index: HashMap::new() }
    }

    fn node(&mut self, tile: Tile) -> usize {
        if let Some(&idx) = self.index.get(&tile) {
            return idx;
        }
        self.nodes.push(Node {
            tile,
            h: euclidean(tile, self.destination),
            g: None,
            previous: None,
            open: false,
            closed: false,
        });
        let idx = self.nodes.len() - 1;
        self.index.insert(tile, idx);
        idx
    }

    /// Lowest f wins; among equals the earliest opened node is kept.
    fn cheapest(&self, open: &[usize]) -> usize {
        let mut best = 0;
        for (slot, &idx) in open.iter().enumerate().skip(1) {
            if self.nodes[idx].f() < self.nodes[open[best]].f() {
                best = slot;
            }
        }
        best
    }

    fn reconstruct(&self, end: usize, start: usize) -> Vec<Tile> {
        let mut tiles = Vec::new();
        let mut cursor = Some(end);
        while let Some(idx) = cursor
            && idx != start
        {
            tiles.push(self.nodes[idx].tile);
            cursor = self.nodes[idx].previous;
        }
        tiles.reverse();
        tiles
    }
}

pub struct Pathfinder<'a, Q: SpatialQuery + ?Sized> {
    space: &'a Q,
    search_cap: u32,
}

impl<'a, Q: SpatialQuery + ?Sized> Pathfinder<'a, Q> {
    pub fn new(space: &'a Q) -> Self {
        Self { space, search_cap: DEFAULT_SEARCH_CAP }
    }

    pub fn with_search_cap(mut self, search_cap: u32) -> Self {
        self.search_cap = search_cap;
        self
    }

    pub fn find_path(&self, start: Tile, destination: Tile, avoid: Option<&Group>) -> Vec<Tile> {
        self.find_route(start, destination, avoid).tiles
    }

    pub fn direction_sequence(
        &self,
        start: Tile,
        destination: Tile,
        avoid: Option<&Group>,
    ) -> Vec<Direction> {
        let mut current = start;
        self.find_path(start, destination, avoid)
            .into_iter()
            .map(|next| {
                let direction = Direction::between(current, next);
                current = next;
                direction
            })
            .collect()
    }

    /// Searches stop as soon as the destination shows up next to an expanded
    /// node, so the destination itself may be occupied (the usual case when
    /// chasing the player).
    pub fn find_route(&self, start: Tile, destination: Tile, avoid: Option<&Group>) -> Route {
        let mut search = Search::new(destination);
        let start_idx = search.node(start);
        search.nodes[start_idx].g = Some(0.0);
        search.nodes[start_idx].open = true;
        let mut open = vec![start_idx];
        let mut expansions = 0;

        while !open.is_empty() && expansions < self.search_cap {
            let slot = search.cheapest(&open);
            let current = open[slot];
            if search.nodes[current].tile == destination {
                return self.finish(&search, current, start_idx, expansions);
            }

            open.remove(slot);
            search.nodes[current].open = false;
            search.nodes[current].closed = true;
            let current_g = search.nodes[current].g.unwrap_or(0.0);

            let mut reached = None;
            for tile in self.neighbours(search.nodes[current].tile) {
                let next = search.node(tile);
                if search.nodes[next].closed {
                    continue;
                }
                if tile == destination {
                    reached = Some(next);
                }
                if !self.space.is_open(tile) {
                    continue;
                }
                if !search.nodes[next].open {
                    search.nodes[next].open = true;
                    open.push(next);
                }
                let new_g = current_g + self.step_weight(tile, avoid) as f32;
                if search.nodes[next].g.is_none_or(|g| new_g < g) {
                    search.nodes[next].g = Some(new_g);
                    search.nodes[next].previous = Some(current);
                }
            }

            if let Some(end) = reached {
                if search.nodes[end].previous.is_none() {
                    let weight = self.step_weight(destination, avoid) as f32;
                    search.nodes[end].g = Some(current_g + weight);
                    search.nodes[end].previous = Some(current);
                }
                return self.finish(&search, end, start_idx, expansions);
            }

            expansions += 1;
        }

        Route::unreachable(expansions)
    }

    fn finish(&self, search: &Search, end: usize, start: usize, expansions: u32) -> Route {
        Route {
            tiles: search.reconstruct(end, start),
            cost: search.nodes[end].g.unwrap_or(0.0),
            expansions,
        }
    }

    /// Cost of stepping onto `tile`. Standing beside one member of the avoided
    /// squad is tolerated; a second adjacent member, or a member with a squad
    /// mate lined up behind it, is priced as a near-certain match.
    pub fn step_weight(&self, tile: Tile, avoid: Option<&Group>) -> u32 {
        let Some(avoid) = avoid else {
            return STEP_COST;
        };

        let mut consecutive = 0;
        let mut chained = 0;
        for neighbour in self.neighbours(tile) {
            if self.space.group_at(neighbour) != Some(avoid) {
                continue;
            }
            consecutive += 1;
            let beyond = Direction::between(tile, neighbour).offset(neighbour, 1);
            if self.space.group_at(beyond) == Some(avoid) {
                chained += 1;
            }
        }

        if consecutive > 1 {
            chained += consecutive - 1;
            consecutive = 1;
        }

        STEP_COST + ADJACENT_PENALTY * consecutive + CHAINED_PENALTY * chained
    }

    /// In-bounds 4-neighbours in west, south, east, north order.
    fn neighbours(&self, tile: Tile) -> Vec<Tile> {
        let mut neighbours = Vec::with_capacity(4);
        if tile.x > 0 {
            neighbours.push(Direction::West.offset(tile, 1));
        }
        if tile.y > 0 {
            neighbours.push(Direction::South.offset(tile, 1));
        }
        if tile.x < self.space.width() - 1 {
            neighbours.push(Direction::East.offset(tile, 1));
        }
        if tile.y < self.space.height() - 1 {
            neighbours.push(Direction::North.offset(tile, 1));
        }
        neighbours
    }
}

fn euclidean(a: Tile, b: Tile) -> f32 {
    let dx = (b.x - a.x) as f32;
    let dy = (b.y - a.y) as f32;
    f64::from(dx * dx + dy * dy).sqrt() as f32
}
