//! Path planning over the workspace graph.
//!
//! Two layers:
//!
//! - [`ReservationTable`]: the scheduler-owned record of which robot
//!   occupies which cell at which tick. Committed paths and parked robots
//!   are registered here and act as obstacles for later queries.
//! - [`plan_path`]: space-time shortest-path search that treats reserved
//!   (tick, cell) pairs as temporarily blocked, waiting in place or
//!   re-routing as needed. [`shortest_distance`] is the reservation-free
//!   metric used for assignment matching.
//!
//! # References
//!
//! - Silver (2005), "Cooperative Pathfinding" (windowed reservation search)
//! - Hart, Nilsson, Raphael (1968), "A Formal Basis for the Heuristic
//!   Determination of Minimum Cost Paths"

mod reservation;
mod search;

pub use reservation::ReservationTable;
pub use search::{plan_path, shortest_distance, PlanError};
