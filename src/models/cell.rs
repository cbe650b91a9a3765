//! Discrete workspace location.
//!
//! A cell is identified by (x, y, level). Ordering is lexicographic over
//! (x, y, level), which every component uses as the deterministic
//! tie-breaker when costs are equal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A discrete workspace location.
///
/// `level` distinguishes vertical floors in multi-level scenarios;
/// single-level scenarios leave it at 0. Level transitions (elevators)
/// are ordinary workspace edges, not a property of the cell itself.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Cell {
    /// Column coordinate.
    pub x: i32,
    /// Row coordinate.
    pub y: i32,
    /// Vertical level (0 for single-level scenarios).
    pub level: i32,
}

impl Cell {
    /// Creates a cell on level 0.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y, level: 0 }
    }

    /// Creates a cell on an explicit level.
    pub const fn on_level(x: i32, y: i32, level: i32) -> Self {
        Self { x, y, level }
    }

    /// Manhattan distance including the level delta.
    ///
    /// Each level transition costs at least one tick, so adding the level
    /// difference keeps this an admissible lower bound for path search.
    pub fn manhattan(&self, other: &Cell) -> u64 {
        self.x.abs_diff(other.x) as u64
            + self.y.abs_diff(other.y) as u64
            + self.level.abs_diff(other.level) as u64
    }

    /// The four same-level grid neighbors, in lexicographic order.
    pub fn grid_neighbors(&self) -> [Cell; 4] {
        [
            Cell::on_level(self.x - 1, self.y, self.level),
            Cell::on_level(self.x, self.y - 1, self.level),
            Cell::on_level(self.x, self.y + 1, self.level),
            Cell::on_level(self.x + 1, self.y, self.level),
        ]
    }

    /// Whether `other` is one grid step away on the same level.
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self.level == other.level && self.manhattan(other) == 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.level == 0 {
            write!(f, "({}, {})", self.x, self.y)
        } else {
            write!(f, "({}, {}, L{})", self.x, self.y, self.level)
        }
    }
}
