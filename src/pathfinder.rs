//! Step-wise A* search over a bounded grid.
//!
//! A [Pathfinder] performs at most one node expansion per [step](Pathfinder::step), which lets a
//! host interleave the search with rendering. Open nodes live in an indexed binary heap, closed
//! and obstacle cells in hash sets keyed by the packed cell index `row * width + col`, and every
//! discovered node in an arena whose indices double as parent links.
use core::fmt;

use fxhash::{FxBuildHasher, FxHashSet};
use grid_util::point::Point;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::{debug, info, trace, warn};

use crate::error::{PathfinderError, Result};
use crate::heap::{HeapOrder, PriorityQueue};
use crate::layout::{cell_index, GridLayout};
use crate::node::{Priority, SearchNode};
use crate::{heuristic, manhattan, D, D2};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Neighbour offsets, clockwise starting north. Odd entries are diagonal.
const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// How the cost-so-far `g` of a newly discovered node is computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GCost {
    /// `g` is the heuristic distance from the start, fixed when the node is created. This is an
    /// estimate rather than the true cost of the route taken, so found paths are always connected
    /// but not guaranteed to be shortest. The goal is accepted as soon as it is probed as a
    /// neighbour.
    #[default]
    Estimated,
    /// Canonical A*: `g` accumulates [D] per straight and [D2] per diagonal edge, open nodes are
    /// re-parented when a cheaper route is found and the goal is accepted when it leaves the open
    /// set. Paths are shortest with respect to those edge costs.
    Accumulated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathfinderConfig {
    /// Recompute [Pathfinder::path] after every expansion, not only once the goal is found.
    pub update_path: bool,
    /// Use the 8-neighbourhood; otherwise only straight moves are generated and the heuristic
    /// becomes the Manhattan distance.
    pub allow_diagonal: bool,
    pub g_cost: GCost,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        PathfinderConfig {
            update_path: false,
            allow_diagonal: true,
            g_cost: GCost::Estimated,
        }
    }
}

impl PathfinderConfig {
    pub fn with_update_path(mut self, update_path: bool) -> Self {
        self.update_path = update_path;
        self
    }
    pub fn with_diagonal(mut self, allow_diagonal: bool) -> Self {
        self.allow_diagonal = allow_diagonal;
        self
    }
    pub fn with_g_cost(mut self, g_cost: GCost) -> Self {
        self.g_cost = g_cost;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    Searching,
    Found,
    Exhausted,
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            SearchStatus::Searching => "searching",
            SearchStatus::Found => "found",
            SearchStatus::Exhausted => "exhausted",
        };
        f.write_str(s)
    }
}

/// Snapshot returned by [Pathfinder::step].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub status: SearchStatus,
    pub lookups: usize,
    /// Start to goal once [SearchStatus::Found]. Otherwise the last live path if
    /// [update_path](PathfinderConfig::update_path) is set, else empty.
    pub path: Vec<Point>,
}

#[derive(Clone, Debug)]
pub struct Pathfinder {
    config: PathfinderConfig,
    width: usize,
    height: usize,
    start: Point,
    end: Point,
    /// Every node created so far. Index 0 is the start, `end_ix` the goal.
    nodes: FxIndexMap<Point, SearchNode>,
    end_ix: usize,
    open: PriorityQueue<usize, Priority>,
    closed: FxHashSet<usize>,
    obstacles: FxHashSet<usize>,
    path: Vec<Point>,
    lookups: usize,
    hit_obstacles: usize,
    current: Option<usize>,
    status: SearchStatus,
    started: bool,
}

impl Pathfinder {
    pub fn new(width: usize, height: usize, start: Point, end: Point) -> Result<Pathfinder> {
        Pathfinder::with_config(width, height, start, end, PathfinderConfig::default())
    }

    /// Sizes the search to the cells of a [GridLayout].
    pub fn for_layout(
        layout: &GridLayout,
        start: Point,
        end: Point,
        config: PathfinderConfig,
    ) -> Result<Pathfinder> {
        Pathfinder::with_config(layout.cols(), layout.rows(), start, end, config)
    }

    pub fn with_config(
        width: usize,
        height: usize,
        start: Point,
        end: Point,
        config: PathfinderConfig,
    ) -> Result<Pathfinder> {
        for point in [start, end] {
            if cell_index(&point, width, height).is_none() {
                return Err(PathfinderError::InvalidCoordinate {
                    point,
                    width,
                    height,
                });
            }
        }
        let mut pathfinder = Pathfinder {
            config,
            width,
            height,
            start,
            end,
            nodes: FxIndexMap::default(),
            end_ix: 0,
            open: PriorityQueue::new(HeapOrder::Min),
            closed: FxHashSet::default(),
            obstacles: FxHashSet::default(),
            path: Vec::new(),
            lookups: 0,
            hit_obstacles: 0,
            current: None,
            status: SearchStatus::Searching,
            started: false,
        };
        // Start and goal are seeded symmetrically: the start has everything still ahead of it,
        // the goal everything behind it.
        let span = pathfinder.distance(&start, &end);
        let start_node = SearchNode::new(start, None, 0, span, 0);
        pathfinder.nodes.insert(start, start_node);
        pathfinder.open.push(0, start_node.priority());
        if start == end {
            pathfinder.current = Some(0);
        } else {
            let (end_ix, _) = pathfinder
                .nodes
                .insert_full(end, SearchNode::new(end, None, span, 0, 0));
            pathfinder.end_ix = end_ix;
        }
        info!(
            "Searching {} -> {} on a {}x{} grid ({:?} g-cost)",
            start, end, width, height, pathfinder.config.g_cost
        );
        Ok(pathfinder)
    }

    /// Marks cells as impassable. Every cell is validated before any is inserted. Must be called
    /// before the first [step](Self::step) or [reveal](Self::reveal).
    pub fn add_obstacles<I>(&mut self, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = Point>,
    {
        if self.started {
            return Err(PathfinderError::ObstacleAfterStart);
        }
        let keys = cells
            .into_iter()
            .map(|point| self.key(&point).ok_or_else(|| self.invalid(point)))
            .collect::<Result<Vec<usize>>>()?;
        for key in keys {
            let point = self.point(key);
            if point == self.start || point == self.end {
                warn!("Obstacle placed on endpoint {}, it will be ignored", point);
            }
            self.obstacles.insert(key);
        }
        debug!("{} obstacles registered", self.obstacles.len());
        Ok(())
    }

    /// Advances the search by at most one node expansion. Once the search has terminated this is
    /// a no-op that reports the same result again.
    pub fn step(&mut self) -> SearchResult {
        if self.status != SearchStatus::Searching {
            return self.result();
        }
        self.started = true;
        if self.current == Some(self.end_ix) {
            self.path = self.trace_path(self.end_ix);
            return self.finish(SearchStatus::Found);
        }
        let ix = match self.open.pop() {
            Ok((ix, _)) => ix,
            Err(_) => return self.finish(SearchStatus::Exhausted),
        };
        if ix == self.end_ix {
            // Only reachable with accumulated costs, where the goal queues like any other node.
            self.current = Some(ix);
            self.path = self.trace_path(ix);
            return self.finish(SearchStatus::Found);
        }
        self.expand(ix);
        self.result()
    }

    /// Expands a specific open node chosen by the host instead of the best one. Returns `false`
    /// without doing anything if the cell is not currently open or the search is over.
    pub fn reveal(&mut self, cell: Point) -> Result<bool> {
        if self.key(&cell).is_none() {
            return Err(self.invalid(cell));
        }
        if self.status != SearchStatus::Searching || self.current == Some(self.end_ix) {
            return Ok(false);
        }
        let Some(ix) = self.nodes.get_index_of(&cell) else {
            return Ok(false);
        };
        if ix == self.end_ix || self.open.remove(&ix).is_none() {
            return Ok(false);
        }
        self.started = true;
        debug!("Revealing {}", cell);
        self.expand(ix);
        Ok(true)
    }

    /// Steps until the search terminates or `max_steps` steps have been taken.
    pub fn run(&mut self, max_steps: Option<usize>) -> SearchResult {
        let mut steps = 0;
        while self.status == SearchStatus::Searching && max_steps.map_or(true, |max| steps < max)
        {
            self.step();
            steps += 1;
        }
        self.result()
    }

    fn expand(&mut self, ix: usize) {
        let node = self.nodes[ix];
        let node_key = self.pack(&node.position);
        debug_assert!(
            !self.closed.contains(&node_key),
            "{} is both open and closed",
            node.position
        );
        debug!(
            "Expanding {} (f = {}, g = {}, h = {})",
            node.position,
            node.f(),
            node.g,
            node.h
        );
        for (dx, dy) in NEIGHBOUR_OFFSETS {
            if !self.config.allow_diagonal && dx != 0 && dy != 0 {
                continue;
            }
            let neighbour = Point::new(node.position.x + dx, node.position.y + dy);
            let Some(key) = self.key(&neighbour) else {
                continue;
            };
            if neighbour == self.end && self.config.g_cost == GCost::Estimated {
                trace!("Reached goal {} from {}", neighbour, node.position);
                let end = &mut self.nodes[self.end_ix];
                end.parent = Some(ix);
                end.depth = node.depth + 1;
                self.current = Some(self.end_ix);
                break;
            }
            if neighbour != self.end && self.obstacles.contains(&key) {
                trace!("{} is blocked", neighbour);
                self.hit_obstacles += 1;
                continue;
            }
            if self.closed.contains(&key) {
                continue;
            }
            self.discover(ix, &node, neighbour);
        }
        self.closed.insert(node_key);
        self.lookups += 1;
        debug_assert!(self.open.is_valid(), "open set lost heap order");
        if self.config.update_path {
            self.path = self.trace_path(ix);
        }
    }

    fn discover(&mut self, parent_ix: usize, parent: &SearchNode, point: Point) {
        let g = match self.config.g_cost {
            GCost::Estimated => self.distance(&self.start, &point),
            GCost::Accumulated => parent.g + step_cost(&parent.position, &point),
        };
        let h = self.distance(&point, &self.end);
        let depth = parent.depth + 1;
        match self.nodes.entry(point) {
            Vacant(e) => {
                let ix = e.index();
                let node = e.insert(SearchNode::new(point, Some(parent_ix), g, h, depth));
                trace!("Opened {} (f = {})", point, node.f());
                self.open.push(ix, node.priority());
            }
            Occupied(mut e) => {
                let ix = e.index();
                let queued = self.open.contains(&ix);
                let cheaper = self.config.g_cost == GCost::Accumulated && g < e.get().g;
                // An arena node that is neither open nor closed is the goal, not yet queued.
                if !queued || cheaper {
                    let node = e.get_mut();
                    node.parent = Some(parent_ix);
                    node.g = g;
                    node.h = h;
                    node.depth = depth;
                    let priority = node.priority();
                    trace!("Updated {} (f = {})", point, priority.f);
                    self.open.push(ix, priority);
                }
            }
        }
    }

    fn trace_path(&self, ix: usize) -> Vec<Point> {
        let mut path: Vec<Point> = std::iter::successors(Some(ix), |&i| self.nodes[i].parent)
            .map(|i| self.nodes[i].position)
            .collect();
        path.reverse();
        path
    }

    fn finish(&mut self, status: SearchStatus) -> SearchResult {
        self.status = status;
        info!(
            "Search {} after {} lookups ({} obstacle hits), path length {}",
            status,
            self.lookups,
            self.hit_obstacles,
            self.path.len()
        );
        self.result()
    }

    fn result(&self) -> SearchResult {
        SearchResult {
            status: self.status,
            lookups: self.lookups,
            path: self.path.clone(),
        }
    }

    fn distance(&self, a: &Point, b: &Point) -> i32 {
        if self.config.allow_diagonal {
            heuristic(a, b)
        } else {
            manhattan(a, b)
        }
    }
    fn key(&self, point: &Point) -> Option<usize> {
        cell_index(point, self.width, self.height)
    }
    /// Packs a cell already known to be in bounds.
    fn pack(&self, point: &Point) -> usize {
        point.y as usize * self.width + point.x as usize
    }
    fn point(&self, key: usize) -> Point {
        Point::new((key % self.width) as i32, (key / self.width) as i32)
    }
    fn invalid(&self, point: Point) -> PathfinderError {
        PathfinderError::InvalidCoordinate {
            point,
            width: self.width,
            height: self.height,
        }
    }

    pub fn config(&self) -> &PathfinderConfig {
        &self.config
    }
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn start(&self) -> Point {
        self.start
    }
    pub fn end(&self) -> Point {
        self.end
    }
    pub fn status(&self) -> SearchStatus {
        self.status
    }
    pub fn is_complete(&self) -> bool {
        self.status != SearchStatus::Searching
    }
    /// Number of nodes moved from the open to the closed set.
    pub fn lookups(&self) -> usize {
        self.lookups
    }
    /// Number of neighbour probes that landed on an obstacle. A cell probed from several
    /// neighbours is counted every time.
    pub fn hit_obstacles(&self) -> usize {
        self.hit_obstacles
    }
    pub fn path(&self) -> &[Point] {
        &self.path
    }
    /// The search state of a cell, if it has been discovered.
    pub fn node(&self, cell: &Point) -> Option<&SearchNode> {
        self.nodes.get(cell)
    }
    /// Frontier nodes in no particular order.
    pub fn open(&self) -> impl Iterator<Item = &SearchNode> + '_ {
        self.open.iter().map(move |(&ix, _)| &self.nodes[ix])
    }
    /// Expanded nodes in no particular order.
    pub fn closed(&self) -> impl Iterator<Item = &SearchNode> + '_ {
        self.closed
            .iter()
            .filter_map(move |&key| self.nodes.get(&self.point(key)))
    }
    pub fn obstacles(&self) -> impl Iterator<Item = Point> + '_ {
        self.obstacles.iter().map(move |&key| self.point(key))
    }
    pub fn is_open(&self, cell: &Point) -> bool {
        self.nodes
            .get_index_of(cell)
            .is_some_and(|ix| self.open.contains(&ix))
    }
    pub fn is_closed(&self, cell: &Point) -> bool {
        self.key(cell).is_some_and(|key| self.closed.contains(&key))
    }
    pub fn is_obstacle(&self, cell: &Point) -> bool {
        self.key(cell).is_some_and(|key| self.obstacles.contains(&key))
    }
}

fn step_cost(a: &Point, b: &Point) -> i32 {
    if a.x != b.x && a.y != b.y {
        D2
    } else {
        D
    }
}

impl fmt::Display for Pathfinder {
    /// Draws the grid row by row: `S` start, `E` goal, `#` obstacle, `*` path, `o` open,
    /// `x` closed, `.` untouched.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let on_path = self
            .path
            .iter()
            .map(|p| self.pack(p))
            .collect::<FxHashSet<usize>>();
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let p = Point::new(x, y);
                let key = self.pack(&p);
                let c = if p == self.start {
                    'S'
                } else if p == self.end {
                    'E'
                } else if self.obstacles.contains(&key) {
                    '#'
                } else if on_path.contains(&key) {
                    '*'
                } else if self.is_open(&p) {
                    'o'
                } else if self.closed.contains(&key) {
                    'x'
                } else {
                    '.'
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
