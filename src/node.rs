use grid_util::point::Point;

/// Search state of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchNode {
    pub position: Point,
    /// Index of the node this one was reached from in the owning pathfinder's node arena.
    /// [None] for the start node and for the end node until it is reached.
    pub parent: Option<usize>,
    pub g: i32,
    pub h: i32,
    /// Number of edges between the start and this node along the parent chain.
    pub depth: usize,
}

impl SearchNode {
    pub fn new(position: Point, parent: Option<usize>, g: i32, h: i32, depth: usize) -> Self {
        SearchNode {
            position,
            parent,
            g,
            h,
            depth,
        }
    }
    pub fn f(&self) -> i32 {
        self.g + self.h
    }
    pub fn priority(&self) -> Priority {
        Priority {
            f: self.f(),
            h: self.h,
        }
    }
}

/// Open set key. Orders by `f` first and breaks ties on `h`, favouring nodes believed to be
/// closer to the goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Priority {
    pub f: i32,
    pub h: i32,
}
