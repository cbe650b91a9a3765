//! Space-time reservation table.
//!
//! Round-scoped record of which robot claims which cell at which tick.
//! Owned solely by the scheduler and passed by reference to the planner
//! per query; never shared process-wide.

use std::collections::HashMap;

use crate::models::{Cell, TimelineEntry};

/// An open-ended cell occupation by a standing robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Hold {
    from: u64,
    until: Option<u64>,
    robot_id: u32,
}

impl Hold {
    fn covers(&self, tick: u64) -> bool {
        tick >= self.from && self.until.map_or(true, |u| tick <= u)
    }
}

/// Record of committed (tick, cell) claims plus standing-robot holds.
///
/// Three kinds of claims:
/// - **cell reservations**: a robot occupies a cell during one tick of a
///   committed path;
/// - **move reservations**: a robot traverses a directed edge during one
///   tick, used to forbid head-on swaps through each other;
/// - **holds**: a robot stands on a cell from some tick onward (idle
///   between legs, or parked at its base), until it departs.
#[derive(Debug, Clone, Default)]
pub struct ReservationTable {
    cells: HashMap<(u64, Cell), u32>,
    moves: HashMap<(u64, Cell, Cell), u32>,
    holds: HashMap<Cell, Vec<Hold>>,
    /// Latest per-tick reservation on each cell, for `free_from` scans.
    latest_claim: HashMap<Cell, u64>,
}

impl ReservationTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The robot occupying `cell` at `tick`, if any.
    pub fn occupant(&self, tick: u64, cell: Cell) -> Option<u32> {
        if let Some(&r) = self.cells.get(&(tick, cell)) {
            return Some(r);
        }
        self.holds
            .get(&cell)
            .and_then(|hs| hs.iter().find(|h| h.covers(tick)))
            .map(|h| h.robot_id)
    }

    /// Whether `robot_id` may stand on `cell` during `tick`.
    pub fn is_free(&self, tick: u64, cell: Cell, robot_id: u32) -> bool {
        self.occupant(tick, cell).map_or(true, |r| r == robot_id)
    }

    /// Whether `robot_id` may move `from → to` over the tick boundary
    /// ending at `arrive_tick`.
    ///
    /// Forbidden when another robot traverses the reverse edge during the
    /// same boundary (a head-on swap: both cells look free at their
    /// respective ticks, yet the robots would pass through each other).
    pub fn move_allowed(&self, arrive_tick: u64, from: Cell, to: Cell, robot_id: u32) -> bool {
        self.moves
            .get(&(arrive_tick, to, from))
            .map_or(true, |&r| r == robot_id)
    }

    /// Whether `robot_id` may stand on `cell` from `tick` onward forever.
    ///
    /// Used before parking a robot at a leg's end: a cell another robot's
    /// committed path crosses at a later tick is not parkable yet.
    pub fn free_from(&self, tick: u64, cell: Cell, robot_id: u32) -> bool {
        if let Some(holds) = self.holds.get(&cell) {
            let blocked = holds.iter().any(|h| {
                h.robot_id != robot_id && h.until.map_or(true, |u| u >= tick)
            });
            if blocked {
                return false;
            }
        }
        let latest = self.latest_claim.get(&cell).copied().unwrap_or(0);
        (tick..=latest).all(|t| self.is_free(t, cell, robot_id))
    }

    /// Claims `cell` at `tick` for `robot_id`.
    pub fn reserve(&mut self, tick: u64, cell: Cell, robot_id: u32) {
        self.cells.insert((tick, cell), robot_id);
        let latest = self.latest_claim.entry(cell).or_insert(tick);
        *latest = (*latest).max(tick);
    }

    /// Commits a planned path: every entry's cell, and every traversed edge.
    pub fn reserve_path(&mut self, entries: &[TimelineEntry], robot_id: u32) {
        for entry in entries {
            self.reserve(entry.tick, entry.cell, robot_id);
        }
        for pair in entries.windows(2) {
            if pair[0].cell != pair[1].cell {
                self.moves
                    .insert((pair[1].tick, pair[0].cell, pair[1].cell), robot_id);
            }
        }
    }

    /// Registers a standing robot on `cell` from `from_tick` onward.
    pub fn hold(&mut self, cell: Cell, from_tick: u64, robot_id: u32) {
        self.holds.entry(cell).or_default().push(Hold {
            from: from_tick,
            until: None,
            robot_id,
        });
    }

    /// Closes `robot_id`'s open hold on `cell`: it remains occupied through
    /// `depart_tick` (the departing robot's path reserves that tick too).
    pub fn release(&mut self, cell: Cell, depart_tick: u64, robot_id: u32) {
        if let Some(holds) = self.holds.get_mut(&cell) {
            for h in holds.iter_mut() {
                if h.robot_id == robot_id && h.until.is_none() {
                    h.until = Some(depart_tick);
                }
            }
        }
    }
}
