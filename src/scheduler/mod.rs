//! Conflict-aware fleet scheduling.
//!
//! Assigns pending tasks to idle robots, plans reservation-aware paths,
//! and commits per-robot timelines round by round until every task is
//! delivered (or proven unreachable) and every robot stands on its own
//! base.
//!
//! # Usage
//!
//! ```
//! use fleet_scheduler::models::{Cell, Robot, Task, Workspace};
//! use fleet_scheduler::scheduler::FleetScheduler;
//!
//! let workspace = Workspace::new(5, 5);
//! let robots = vec![Robot::new(0, Cell::new(0, 0))];
//! let tasks = vec![Task::new(0, Cell::new(2, 2), Cell::new(4, 4))];
//!
//! let schedule = FleetScheduler::new()
//!     .schedule(&workspace, &robots, &tasks)
//!     .unwrap();
//! assert_eq!(schedule.delivered_count(), 1);
//! assert_eq!(schedule.final_cell(0), Some(Cell::new(0, 0)));
//! ```

mod assignment;
mod fleet;
mod kpi;

pub use assignment::{AssignmentPolicy, NearestFirst};
pub use fleet::{FleetScheduler, SchedulerConfig};
pub use kpi::ScheduleKpi;

use crate::models::{Cell, Schedule};
use crate::validation::ValidationError;
use std::fmt;

/// Fatal scheduling failure.
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerError {
    /// Malformed or inconsistent scenario declaration. No schedule produced.
    InvalidScenario(Vec<ValidationError>),
    /// No robot could make progress within the round limit. Carries the
    /// partial schedule accumulated so far plus the stalled robot and the
    /// cell it could not leave.
    Deadlock {
        /// Lowest-id robot that exhausted its stall budget.
        robot_id: u32,
        /// Cell the robot was stuck on.
        cell: Cell,
        /// Tick at which the run was abandoned.
        tick: u64,
        /// Partial schedule, marked incomplete.
        schedule: Box<Schedule>,
    },
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::InvalidScenario(errors) => {
                write!(f, "invalid scenario ({} issue(s)", errors.len())?;
                if let Some(first) = errors.first() {
                    write!(f, ", first: {first}")?;
                }
                write!(f, ")")
            }
            SchedulerError::Deadlock {
                robot_id,
                cell,
                tick,
                ..
            } => write!(
                f,
                "deadlock: robot {robot_id} stuck at {cell} since tick {tick}"
            ),
        }
    }
}

impl std::error::Error for SchedulerError {}
