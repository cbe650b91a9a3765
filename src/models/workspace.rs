//! Workspace model.
//!
//! A static grid of traversable cells, optionally stacked into vertical
//! levels joined by explicit transition edges (elevators). Immutable after
//! construction; shared read-only by the planner and scheduler.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use super::Cell;

/// The static workspace: grid bounds, blocked cells, and level transitions.
///
/// Adjacency is 4-connected within a level. A level transition is an
/// ordinary bidirectional edge between two cells with a fixed traversal
/// cost of one tick, so path search needs no elevator special-casing.
///
/// # Example
/// ```
/// use fleet_scheduler::models::{Cell, Workspace};
///
/// let ws = Workspace::new(4, 3)
///     .with_blocked(Cell::new(1, 1))
///     .with_blocked(Cell::new(2, 1));
///
/// assert!(ws.is_open(Cell::new(0, 0)));
/// assert!(!ws.is_open(Cell::new(1, 1)));
/// assert_eq!(ws.neighbors(Cell::new(0, 1)), vec![Cell::new(0, 0), Cell::new(0, 2)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    /// Grid width (valid x: 0..width).
    width: i32,
    /// Grid height (valid y: 0..height).
    height: i32,
    /// Number of vertical levels (valid level: 0..levels).
    levels: i32,
    /// Permanently blocked cells.
    blocked: HashSet<Cell>,
    /// Bidirectional transition edges, stored with both orientations.
    transitions: BTreeSet<(Cell, Cell)>,
}

impl Workspace {
    /// Creates an open single-level grid.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            levels: 1,
            blocked: HashSet::new(),
            transitions: BTreeSet::new(),
        }
    }

    /// Sets the number of vertical levels.
    pub fn with_levels(mut self, levels: i32) -> Self {
        self.levels = levels.max(1);
        self
    }

    /// Marks a cell permanently blocked.
    pub fn with_blocked(mut self, cell: Cell) -> Self {
        self.blocked.insert(cell);
        self
    }

    /// Adds a bidirectional level-transition edge between two cells.
    ///
    /// Traversal costs one tick, the same as a grid step.
    pub fn with_transition(mut self, a: Cell, b: Cell) -> Self {
        self.transitions.insert((a, b));
        self.transitions.insert((b, a));
        self
    }

    /// Grid width.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of vertical levels.
    pub fn levels(&self) -> i32 {
        self.levels
    }

    /// Transition edges, each stored in both orientations.
    pub fn transitions(&self) -> &BTreeSet<(Cell, Cell)> {
        &self.transitions
    }

    /// Total number of cells across all levels, blocked or not.
    pub fn cell_count(&self) -> u64 {
        self.width.max(0) as u64 * self.height.max(0) as u64 * self.levels.max(0) as u64
    }

    /// Whether the cell lies within the grid bounds.
    pub fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.x)
            && (0..self.height).contains(&cell.y)
            && (0..self.levels).contains(&cell.level)
    }

    /// Whether the cell is in bounds and not blocked.
    pub fn is_open(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.blocked.contains(&cell)
    }

    /// Adjacent open cells: 4-connected same-level neighbors plus any
    /// transition edges leaving `cell`, in lexicographic order.
    pub fn neighbors(&self, cell: Cell) -> Vec<Cell> {
        let mut out: Vec<Cell> = cell
            .grid_neighbors()
            .into_iter()
            .filter(|c| self.is_open(*c))
            .collect();

        for (from, to) in self.transitions.range((cell, Cell::on_level(i32::MIN, i32::MIN, i32::MIN))..) {
            if *from != cell {
                break;
            }
            if self.is_open(*to) {
                out.push(*to);
            }
        }

        out.sort();
        out.dedup();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let ws = Workspace::new(3, 2);
        assert!(ws.in_bounds(Cell::new(0, 0)));
        assert!(ws.in_bounds(Cell::new(2, 1)));
        assert!(!ws.in_bounds(Cell::new(3, 0)));
        assert!(!ws.in_bounds(Cell::new(0, 2)));
        assert!(!ws.in_bounds(Cell::new(-1, 0)));
        assert!(!ws.in_bounds(Cell::on_level(0, 0, 1)));
    }

    #[test]
    fn test_blocked_cells() {
        let ws = Workspace::new(3, 3).with_blocked(Cell::new(1, 1));
        assert!(!ws.is_open(Cell::new(1, 1)));
        assert!(ws.is_open(Cell::new(1, 0)));
    }

    #[test]
    fn test_neighbors_center() {
        let ws = Workspace::new(3, 3);
        let n = ws.neighbors(Cell::new(1, 1));
        assert_eq!(
            n,
            vec![
                Cell::new(0, 1),
                Cell::new(1, 0),
                Cell::new(1, 2),
                Cell::new(2, 1)
            ]
        );
    }

    #[test]
    fn test_neighbors_corner_and_blocked() {
        let ws = Workspace::new(3, 3).with_blocked(Cell::new(1, 0));
        let n = ws.neighbors(Cell::new(0, 0));
        assert_eq!(n, vec![Cell::new(0, 1)]);
    }

    #[test]
    fn test_transition_edges() {
        let low = Cell::new(1, 1);
        let high = Cell::on_level(1, 1, 1);
        let ws = Workspace::new(3, 3).with_levels(2).with_transition(low, high);

        assert!(ws.neighbors(low).contains(&high));
        assert!(ws.neighbors(high).contains(&low));
        // Upper level is otherwise connected normally.
        assert!(ws.neighbors(high).contains(&Cell::on_level(0, 1, 1)));
    }

    #[test]
    fn test_transition_to_blocked_cell_excluded() {
        let low = Cell::new(0, 0);
        let high = Cell::on_level(0, 0, 1);
        let ws = Workspace::new(2, 2)
            .with_levels(2)
            .with_blocked(high)
            .with_transition(low, high);
        assert!(!ws.neighbors(low).contains(&high));
    }

    #[test]
    fn test_cell_count() {
        assert_eq!(Workspace::new(4, 3).cell_count(), 12);
        assert_eq!(Workspace::new(4, 3).with_levels(2).cell_count(), 24);
    }
}
