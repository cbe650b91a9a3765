//! Task (pickup→dropoff job) model.

use serde::{Deserialize, Serialize};

use super::Cell;

/// A transport job: collect at the pickup cell, deliver to the dropoff cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: u32,
    /// Cell where the load is collected.
    pub pickup: Cell,
    /// Cell where the load is delivered.
    pub dropoff: Cell,
}

impl Task {
    /// Creates a task.
    pub fn new(id: u32, pickup: Cell, dropoff: Cell) -> Self {
        Self {
            id,
            pickup,
            dropoff,
        }
    }
}

/// Task lifecycle status.
///
/// Transitions are monotonic: `Pending → Assigned → PickedUp → Delivered`.
/// A delivered task is never reassigned. A task whose endpoints are
/// unreachable stays `Pending` for the whole run, with the reason recorded
/// in its [`TaskOutcome`](super::TaskOutcome).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Not yet assigned to any robot.
    Pending,
    /// Assigned; the robot is en route to the pickup cell.
    Assigned,
    /// Load collected; the robot is en route to the dropoff cell.
    PickedUp,
    /// Load delivered.
    Delivered,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_fields() {
        let t = Task::new(7, Cell::new(1, 0), Cell::new(3, 2));
        assert_eq!(t.id, 7);
        assert_eq!(t.pickup, Cell::new(1, 0));
        assert_eq!(t.dropoff, Cell::new(3, 2));
    }

    #[test]
    fn test_status_order_is_monotonic() {
        assert!(TaskStatus::Pending < TaskStatus::Assigned);
        assert!(TaskStatus::Assigned < TaskStatus::PickedUp);
        assert!(TaskStatus::PickedUp < TaskStatus::Delivered);
    }
}
