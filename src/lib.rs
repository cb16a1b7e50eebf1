//! # incremental_pathfinding
//!
//! A grid-based [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) pathfinder that is
//! driven one node expansion at a time. A host (typically a render loop) constructs a
//! [Pathfinder], seeds it with obstacles and calls [Pathfinder::step] until the search reports
//! [SearchStatus::Found] or [SearchStatus::Exhausted]. The open, closed and obstacle sets can be
//! inspected between steps for visualization.
//!
//! The open set is an indexed binary [PriorityQueue](heap::PriorityQueue) ordered by `f` with
//! ties broken by `h`; closed and obstacle membership are hash lookups on packed cell indices.
//! [GridLayout] converts between cells and world (pixel) coordinates for drawing and picking.
//!
//! The heuristic used is the [octile distance](https://github.com/riscy/a_star_on_grids) with
//! integer costs [D] for straight and [D2] for diagonal moves.
pub mod error;
pub mod heap;
pub mod layout;
pub mod node;
pub mod pathfinder;

pub use error::{HeapError, PathfinderError, Result};
pub use glam::Vec2;
pub use grid_util::point::Point;
pub use heap::{HeapOrder, PriorityQueue};
pub use layout::{Anchor, GridLayout};
pub use node::{Priority, SearchNode};
pub use pathfinder::{GCost, Pathfinder, PathfinderConfig, SearchResult, SearchStatus};

/// Cost of a straight (orthogonal) move.
pub const D: i32 = 10;
/// Cost of a diagonal move, roughly `D * sqrt(2)`.
pub const D2: i32 = 14;

/// Octile distance between two cells: the cost of taking as many diagonal steps as possible and
/// going straight for the remainder.
pub fn heuristic(a: &Point, b: &Point) -> i32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    D * (dx + dy) + (D2 - 2 * D) * dx.min(dy)
}

/// Straight-line grid distance for 4-neighbourhood movement.
pub fn manhattan(a: &Point, b: &Point) -> i32 {
    D * ((a.x - b.x).abs() + (a.y - b.y).abs())
}

/// Sums the true step costs along a path, charging [D] for straight and [D2] for diagonal edges.
/// Consecutive points are expected to be adjacent.
pub fn path_cost(path: &[Point]) -> i32 {
    path.windows(2)
        .map(|w| {
            debug_assert!((w[0].x - w[1].x).abs() <= 1 && (w[0].y - w[1].y).abs() <= 1);
            heuristic(&w[0], &w[1])
        })
        .sum()
}
