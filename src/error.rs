//! Error types for the pathfinder, its layout and its priority queue.

use grid_util::point::Point;
use thiserror::Error;

/// Errors reported eagerly when a search or layout is configured.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathfinderError {
    #[error("cell {point} is outside the {width}x{height} grid")]
    InvalidCoordinate {
        point: Point,
        width: usize,
        height: usize,
    },

    #[error("invalid grid layout: {0}")]
    InvalidLayout(String),

    #[error("obstacles must be added before the first step")]
    ObstacleAfterStart,
}

/// Errors raised by [PriorityQueue](crate::heap::PriorityQueue).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    #[error("cannot extract from an empty queue")]
    Empty,

    #[error("item is not in the queue")]
    Missing,
}

pub type Result<T> = std::result::Result<T, PathfinderError>;
