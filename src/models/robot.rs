//! Robot model.

use serde::{Deserialize, Serialize};

use super::Cell;

/// A fleet robot: an id, a declared home base, and a start cell.
///
/// Runtime state (current cell, assigned task, timeline) is owned by the
/// scheduler during planning; this is the scenario input only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    /// Unique robot identifier.
    pub id: u32,
    /// Home base cell. The robot must end the run here.
    pub base: Cell,
    /// Start cell at tick 0. Defaults to the base.
    pub start: Cell,
}

impl Robot {
    /// Creates a robot starting at its base.
    pub fn new(id: u32, base: Cell) -> Self {
        Self {
            id,
            base,
            start: base,
        }
    }

    /// Sets a start cell other than the base.
    pub fn with_start(mut self, start: Cell) -> Self {
        self.start = start;
        self
    }
}

/// Per-robot execution phase.
///
/// Transitions: `Idle → ToPickup → ToDropoff → Idle`, then
/// `Idle → ReturningToBase → Idle` once no pending tasks remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobotState {
    /// Waiting for work (or finished, if standing on its base).
    Idle,
    /// En route to its assigned task's pickup cell.
    ToPickup,
    /// Carrying: en route to its assigned task's dropoff cell.
    ToDropoff,
    /// Homeward bound to its own base.
    ReturningToBase,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robot_defaults_to_base_start() {
        let r = Robot::new(3, Cell::new(2, 2));
        assert_eq!(r.start, r.base);
    }

    #[test]
    fn test_robot_with_start() {
        let r = Robot::new(0, Cell::new(0, 0)).with_start(Cell::new(4, 1));
        assert_eq!(r.base, Cell::new(0, 0));
        assert_eq!(r.start, Cell::new(4, 1));
    }
}
