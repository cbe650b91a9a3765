//! Multi-robot task allocation and collision-free motion scheduling.
//!
//! Given a discretized grid workspace, a fleet of robots with home bases,
//! and a set of pickup→dropoff tasks, the scheduler computes a per-robot,
//! time-indexed timeline that delivers every task without two robots ever
//! occupying the same cell at the same tick, then returns each robot to
//! its own base.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Cell`, `Workspace`, `Robot`, `Task`,
//!   `Schedule`, `RobotTimeline`, `TaskOutcome`
//! - **`validation`**: Scenario integrity checks (duplicate ids, blocked or
//!   out-of-bounds bases and task endpoints)
//! - **`planner`**: Reservation table and space-time shortest-path search
//! - **`scheduler`**: Assignment policy, round loop, KPIs, error types
//! - **`generator`**: Seeded random scenario generation for tests
//!
//! # Architecture
//!
//! The scheduler is a centralized, deterministic planner over a discrete
//! time axis. Conflict resolution is centralized in a reservation table
//! mapping (tick, cell) to the owning robot; committed paths act as moving
//! obstacles for later plans, giving a soft priority order in which earlier
//! commitments never move for later ones. Identical inputs produce
//! identical schedules.
//!
//! # References
//!
//! - Silver (2005), "Cooperative Pathfinding"
//! - Stern et al. (2019), "Multi-Agent Pathfinding: Definitions, Variants,
//!   and Benchmarks"

pub mod generator;
pub mod models;
pub mod planner;
pub mod scheduler;
pub mod validation;
