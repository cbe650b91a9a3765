//! Schedule (execution result) model.
//!
//! A schedule is the committed outcome of one scheduling run: a
//! time-indexed occupancy timeline per robot and a completion record per
//! task. Produced once, read-only thereafter; consumers handle their own
//! serialization format.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Cell, TaskStatus};

/// One occupancy entry: the robot stands on `cell` during `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Discrete simulation time.
    pub tick: u64,
    /// Occupied cell.
    pub cell: Cell,
}

impl TimelineEntry {
    /// Creates an entry.
    pub fn new(tick: u64, cell: Cell) -> Self {
        Self { tick, cell }
    }
}

/// A robot's committed movement history, one entry per tick from 0.
///
/// Consecutive entries differ by at most one grid/transition step, or
/// repeat the cell (a wait). After its last entry the robot holds its
/// final cell indefinitely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotTimeline {
    /// Owning robot.
    pub robot_id: u32,
    /// Ordered occupancy entries, ticks strictly increasing from 0.
    pub entries: Vec<TimelineEntry>,
}

impl RobotTimeline {
    /// Creates a timeline with a single entry at tick 0.
    pub fn starting_at(robot_id: u32, cell: Cell) -> Self {
        Self {
            robot_id,
            entries: vec![TimelineEntry::new(0, cell)],
        }
    }

    /// Tick of the last entry (0 for a robot that never moved).
    pub fn last_tick(&self) -> u64 {
        self.entries.last().map(|e| e.tick).unwrap_or(0)
    }

    /// Final occupied cell.
    pub fn final_cell(&self) -> Option<Cell> {
        self.entries.last().map(|e| e.cell)
    }

    /// Cell occupied at `tick`.
    ///
    /// Ticks between entries resolve to the preceding entry's cell (the
    /// robot stood still), and ticks past the end to the final cell.
    pub fn cell_at(&self, tick: u64) -> Option<Cell> {
        match self.entries.binary_search_by_key(&tick, |e| e.tick) {
            Ok(i) => Some(self.entries[i].cell),
            Err(0) => None,
            Err(i) => Some(self.entries[i - 1].cell),
        }
    }

    /// Number of entries where the robot changed cell.
    pub fn distance_travelled(&self) -> u64 {
        self.entries
            .windows(2)
            .filter(|w| w[0].cell != w[1].cell)
            .count() as u64
    }

    /// Number of entries where the robot stayed in place.
    pub fn wait_ticks(&self) -> u64 {
        self.entries
            .windows(2)
            .filter(|w| w[0].cell == w[1].cell)
            .count() as u64
    }
}

/// Per-task completion record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutcome {
    /// The task this outcome describes.
    pub task_id: u32,
    /// Final status at the end of the run.
    pub status: TaskStatus,
    /// Robot the task was assigned to, if any.
    pub assigned_robot: Option<u32>,
    /// Tick at which the load was collected.
    pub picked_up_tick: Option<u64>,
    /// Tick at which the load was delivered.
    pub completion_tick: Option<u64>,
    /// Why the task could never be served, if it stayed pending.
    pub unreachable: Option<String>,
}

impl TaskOutcome {
    /// Creates a pending outcome with no assignment.
    pub fn pending(task_id: u32) -> Self {
        Self {
            task_id,
            status: TaskStatus::Pending,
            assigned_robot: None,
            picked_up_tick: None,
            completion_tick: None,
            unreachable: None,
        }
    }
}

/// Two robots sharing a cell at the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    /// Tick of the overlap.
    pub tick: u64,
    /// Lower robot id.
    pub robot_a: u32,
    /// Higher robot id.
    pub robot_b: u32,
    /// Shared cell.
    pub cell: Cell,
}

/// A complete scheduling result.
///
/// `complete` is false for partial schedules (aborted or deadlocked runs);
/// partial results are marked rather than silently truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Per-robot timelines, sorted by robot id.
    pub timelines: Vec<RobotTimeline>,
    /// Per-task outcomes, sorted by task id.
    pub outcomes: Vec<TaskOutcome>,
    /// Whether the run terminated normally.
    pub complete: bool,
}

impl Schedule {
    /// Creates an empty, complete schedule (the "no work to do" result).
    pub fn empty() -> Self {
        Self {
            timelines: Vec::new(),
            outcomes: Vec::new(),
            complete: true,
        }
    }

    /// Makespan: the latest tick any robot is still moving.
    pub fn makespan_ticks(&self) -> u64 {
        self.timelines
            .iter()
            .map(|t| t.last_tick())
            .max()
            .unwrap_or(0)
    }

    /// Timeline for a robot.
    pub fn timeline(&self, robot_id: u32) -> Option<&RobotTimeline> {
        self.timelines.iter().find(|t| t.robot_id == robot_id)
    }

    /// Outcome for a task.
    pub fn outcome(&self, task_id: u32) -> Option<&TaskOutcome> {
        self.outcomes.iter().find(|o| o.task_id == task_id)
    }

    /// Cell a robot occupies at `tick` (its final cell past timeline end).
    pub fn cell_at(&self, robot_id: u32, tick: u64) -> Option<Cell> {
        self.timeline(robot_id).and_then(|t| t.cell_at(tick))
    }

    /// Final cell of a robot.
    pub fn final_cell(&self, robot_id: u32) -> Option<Cell> {
        self.timeline(robot_id).and_then(|t| t.final_cell())
    }

    /// Number of delivered tasks.
    pub fn delivered_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == TaskStatus::Delivered)
            .count()
    }

    /// Audits every tick for two robots sharing a cell.
    ///
    /// The scheduler's reservation table makes this impossible by
    /// construction; the audit exists for tests and for downstream
    /// consumers that want an independent check, like the pairwise
    /// verification pass the surrounding tooling runs on results.
    pub fn collisions(&self) -> Vec<Collision> {
        let mut found = Vec::new();
        let horizon = self.makespan_ticks();

        for tick in 0..=horizon {
            let mut occupied: HashMap<Cell, u32> = HashMap::new();
            for t in &self.timelines {
                let Some(cell) = t.cell_at(tick) else {
                    continue;
                };
                if let Some(&other) = occupied.get(&cell) {
                    found.push(Collision {
                        tick,
                        robot_a: other.min(t.robot_id),
                        robot_b: other.max(t.robot_id),
                        cell,
                    });
                } else {
                    occupied.insert(cell, t.robot_id);
                }
            }
        }
        found
    }
}
