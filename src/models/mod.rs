//! Fleet scheduling domain models.
//!
//! Core data types for describing a scenario (workspace, robots, tasks)
//! and its computed execution result (schedule). The workspace is immutable
//! after construction and shared read-only by every other component; robots
//! and tasks are plain inputs whose runtime state lives in the scheduler.
//!
//! # Domain Mappings
//!
//! | fleet-scheduler | Warehouse | AGV Plant | Sorting Hub |
//! |-----------------|-----------|-----------|-------------|
//! | Cell | Floor tile | Track node | Chute position |
//! | Robot | Picker bot | AGV | Sorter |
//! | Task | Order line | Pallet move | Parcel |
//! | Schedule | Wave plan | Dispatch log | Route sheet |

mod cell;
mod robot;
mod schedule;
mod task;
mod workspace;

pub use cell::Cell;
pub use robot::{Robot, RobotState};
pub use schedule::{Collision, RobotTimeline, Schedule, TaskOutcome, TimelineEntry};
pub use task::{Task, TaskStatus};
pub use workspace::Workspace;
