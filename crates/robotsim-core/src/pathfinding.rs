//! Navigation graphs and shortest-path search.
//!
//! A [`NavGraph`] has one vertex per integer point of the floor rectangle and
//! is built for one agent footprint. Graphs are immutable once built and are
//! shared between robots through `Rc`.
//!
//! # Edge admission
//!
//! A cell is *free* when it lies in the half-open floor rectangle and a
//! footprint centered on it is not an obstacle. Each free cell is evaluated
//! once. The undirected edge `{c, n}` between 8-neighbours exists when either
//! endpoint is free, so an agent may step onto the first blocked cell next to
//! free space but can never cross a blocked band.
//!
//! # Search
//!
//! A* with integer weights 100 (orthogonal) and 141 (diagonal). The heuristic
//! is the Euclidean distance scaled by `141 / sqrt(2)`, which never exceeds
//! the true cost under these weights.

use crate::component::VisitTarget;
use crate::geometry::{Footprint, Position, Probe, Rect};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::rc::Rc;

/// Weight of a horizontal or vertical step.
pub const ORTHOGONAL_COST: u32 = 100;
/// Weight of a diagonal step.
pub const DIAGONAL_COST: u32 = 141;

const NEIGHBORS: [(i32, i32, u32); 8] = [
    (1, 0, ORTHOGONAL_COST),
    (-1, 0, ORTHOGONAL_COST),
    (0, 1, ORTHOGONAL_COST),
    (0, -1, ORTHOGONAL_COST),
    (1, 1, DIAGONAL_COST),
    (1, -1, DIAGONAL_COST),
    (-1, 1, DIAGONAL_COST),
    (-1, -1, DIAGONAL_COST),
];

// One direction per undirected pair, for counting.
const FORWARD: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (-1, 1)];

/// Source of obstacle answers used while building a graph.
pub trait ObstacleMap {
    fn is_obstacle(&self, probe: &Probe) -> bool;
}

// ---------------------------------------------------------------------------
// NavGraph
// ---------------------------------------------------------------------------

/// Grid graph over a floor rectangle for one footprint.
pub struct NavGraph {
    area: Rect,
    cols: usize,
    rows: usize,
    footprint: Footprint,
    free: Vec<bool>,
    edge_count: usize,
}

impl fmt::Debug for NavGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavGraph")
            .field("area", &self.area)
            .field("footprint", &self.footprint)
            .field("vertices", &self.vertex_count())
            .field("edges", &self.edge_count)
            .finish()
    }
}

impl NavGraph {
    /// Build the graph for `footprint` over `area`, querying `map` once per
    /// cell of the half-open rectangle.
    pub fn build<M: ObstacleMap + ?Sized>(map: &M, area: Rect, footprint: Footprint) -> Self {
        let cols = (area.width.max(0) + 1) as usize;
        let rows = (area.height.max(0) + 1) as usize;
        let mut free = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let p = Position::new(area.x + col as i32, area.y + row as i32);
                let inside = p.x < area.right() && p.y < area.bottom();
                free.push(inside && !map.is_obstacle(&Probe::area(p, footprint)));
            }
        }

        let mut graph = Self {
            area,
            cols,
            rows,
            footprint,
            free,
            edge_count: 0,
        };
        graph.edge_count = graph.count_edges();
        graph
    }

    fn count_edges(&self) -> usize {
        let mut count = 0;
        for idx in 0..self.free.len() {
            let p = self.position(idx);
            for (dx, dy) in FORWARD {
                if let Some(j) = self.index(p.offset(dx, dy))
                    && self.linked(idx, j)
                {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn footprint(&self) -> Footprint {
        self.footprint
    }

    pub fn vertex_count(&self) -> usize {
        self.free.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether `p` is a vertex.
    pub fn contains(&self, p: Position) -> bool {
        self.index(p).is_some()
    }

    /// Whether a footprint centered on `p` is clear.
    pub fn is_free(&self, p: Position) -> bool {
        self.index(p).is_some_and(|i| self.free[i])
    }

    /// Whether an edge joins `a` and `b`.
    pub fn has_edge(&self, a: Position, b: Position) -> bool {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        if dx.abs() > 1 || dy.abs() > 1 || (dx == 0 && dy == 0) {
            return false;
        }
        match (self.index(a), self.index(b)) {
            (Some(i), Some(j)) => self.linked(i, j),
            _ => false,
        }
    }

    /// Neighbours of `p` with the weight of the joining edge.
    pub fn neighbors(&self, p: Position) -> impl Iterator<Item = (Position, u32)> + '_ {
        let from = self.index(p);
        NEIGHBORS.iter().filter_map(move |&(dx, dy, w)| {
            let i = from?;
            let q = p.offset(dx, dy);
            let j = self.index(q)?;
            self.linked(i, j).then_some((q, w))
        })
    }

    fn linked(&self, i: usize, j: usize) -> bool {
        self.free[i] || self.free[j]
    }

    fn index(&self, p: Position) -> Option<usize> {
        let col = p.x.checked_sub(self.area.x)?;
        let row = p.y.checked_sub(self.area.y)?;
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        (col < self.cols && row < self.rows).then_some(row * self.cols + col)
    }

    fn position(&self, idx: usize) -> Position {
        Position::new(
            self.area.x + (idx % self.cols) as i32,
            self.area.y + (idx / self.cols) as i32,
        )
    }

    /// A* from `start` to `goal`. Returns the vertex sequence including both
    /// endpoints, or `None` when either endpoint is off the grid or no route
    /// connects them.
    pub fn shortest_path(&self, start: Position, goal: Position) -> Option<Vec<Position>> {
        let s = self.index(start)?;
        let g = self.index(goal)?;

        let n = self.free.len();
        let mut cost = vec![u32::MAX; n];
        let mut parent = vec![usize::MAX; n];
        let mut closed = vec![false; n];
        let mut open = BinaryHeap::new();

        cost[s] = 0;
        let h0 = heuristic(start, goal);
        open.push(Reverse((h0, h0, s)));

        while let Some(Reverse((_, _, idx))) = open.pop() {
            if closed[idx] {
                continue;
            }
            if idx == g {
                return Some(self.unwind(&parent, s, g));
            }
            closed[idx] = true;

            let p = self.position(idx);
            for (dx, dy, w) in NEIGHBORS {
                let q = p.offset(dx, dy);
                let Some(j) = self.index(q) else { continue };
                if closed[j] || !self.linked(idx, j) {
                    continue;
                }
                let tentative = cost[idx] + w;
                if tentative < cost[j] {
                    cost[j] = tentative;
                    parent[j] = idx;
                    let h = heuristic(q, goal);
                    open.push(Reverse((tentative + h, h, j)));
                }
            }
        }
        None
    }

    fn unwind(&self, parent: &[usize], start: usize, goal: usize) -> Vec<Position> {
        let mut route = vec![self.position(goal)];
        let mut idx = goal;
        while idx != start {
            idx = parent[idx];
            route.push(self.position(idx));
        }
        route.reverse();
        route
    }
}

fn heuristic(a: Position, b: Position) -> u32 {
    let euclid = (a.squared_distance(&b) as f64).sqrt();
    (euclid * DIAGONAL_COST as f64 / std::f64::consts::SQRT_2).floor() as u32
}

// ---------------------------------------------------------------------------
// Path
// ---------------------------------------------------------------------------

/// Result of a path query: a vertex sequence toward a target, with a
/// traversal cursor. An unreachable target yields a path without a route,
/// which is distinct from a route that has been fully walked.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    route: Option<Vec<Position>>,
    target: VisitTarget,
    cursor: usize,
}

impl Path {
    pub fn new(route: Vec<Position>, target: VisitTarget) -> Self {
        Self {
            route: Some(route),
            target,
            cursor: 0,
        }
    }

    pub fn unreachable(target: VisitTarget) -> Self {
        Self {
            route: None,
            target,
            cursor: 0,
        }
    }

    pub fn target(&self) -> VisitTarget {
        self.target
    }

    /// True when the search found no route.
    pub fn is_unreachable(&self) -> bool {
        self.route.is_none()
    }

    pub fn vertices(&self) -> Option<&[Position]> {
        self.route.as_deref()
    }

    /// Whether a vertex remains to be walked.
    pub fn has_next(&self) -> bool {
        self.route.as_ref().is_some_and(|r| self.cursor < r.len())
    }

    /// The next vertex to walk to.
    pub fn next_position(&self) -> Option<Position> {
        self.route.as_ref()?.get(self.cursor).copied()
    }

    /// The last vertex walked, if any.
    pub fn current_position(&self) -> Option<Position> {
        let i = self.cursor.checked_sub(1)?;
        self.route.as_ref()?.get(i).copied()
    }

    pub fn advance(&mut self) {
        if self.has_next() {
            self.cursor += 1;
        }
    }

    pub fn step_back(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// PathFinder
// ---------------------------------------------------------------------------

/// Query object holding a shared graph.
#[derive(Debug, Clone)]
pub struct PathFinder {
    graph: Rc<NavGraph>,
}

impl PathFinder {
    pub fn new(graph: Rc<NavGraph>) -> Self {
        Self { graph }
    }

    /// Build a fresh graph over `area` for `footprint`.
    pub fn build<M: ObstacleMap + ?Sized>(map: &M, area: Rect, footprint: Footprint) -> Self {
        let graph = NavGraph::build(map, area, footprint);
        tracing::info!(
            width = footprint.width,
            height = footprint.height,
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "navigation graph built"
        );
        Self::new(Rc::new(graph))
    }

    pub fn graph(&self) -> &Rc<NavGraph> {
        &self.graph
    }

    pub fn footprint(&self) -> Footprint {
        self.graph.footprint()
    }

    /// Shortest path from `start` to `goal`, tagged with `target`.
    pub fn find_path(&self, start: Position, goal: Position, target: VisitTarget) -> Path {
        match self.graph.shortest_path(start, goal) {
            Some(route) => Path::new(route, target),
            None => Path::unreachable(target),
        }
    }
}
