//! Shortest-path search over the workspace graph.
//!
//! Two queries:
//! - [`shortest_distance`]: plain breadth-first distance ignoring other
//!   robots, used by assignment matching and static reachability checks.
//! - [`plan_path`]: space-time search over (cell, tick) states against a
//!   [`ReservationTable`], where waiting in place is a legal unit-cost
//!   move. Every step costs one tick, so the tick itself is the g-value
//!   and the search reduces to A* on the time-expanded graph.
//!
//! Tie-breaking is deterministic: frontier nodes are ordered by
//! (f, tick, cell) with lexicographic cell order last.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::fmt;

use super::ReservationTable;
use crate::models::{Cell, TimelineEntry, Workspace};

/// Path planning failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// No route from `from` to `to` within `horizon` ticks of departure.
    Unreachable {
        /// Start cell of the failed query.
        from: Cell,
        /// Goal cell of the failed query.
        to: Cell,
        /// Earliest-departure tick of the failed query.
        depart_tick: u64,
    },
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::Unreachable {
                from,
                to,
                depart_tick,
            } => write!(
                f,
                "no route from {from} to {to} departing at tick {depart_tick}"
            ),
        }
    }
}

impl std::error::Error for PlanError {}

/// Breadth-first shortest distance in ticks, ignoring reservations.
///
/// Returns `None` when the goal is unreachable in the static workspace.
pub fn shortest_distance(workspace: &Workspace, from: Cell, to: Cell) -> Option<u64> {
    if !workspace.is_open(from) || !workspace.is_open(to) {
        return None;
    }
    if from == to {
        return Some(0);
    }

    let mut visited = HashSet::from([from]);
    let mut queue = VecDeque::from([(from, 0u64)]);

    while let Some((cell, dist)) = queue.pop_front() {
        for next in workspace.neighbors(cell) {
            if next == to {
                return Some(dist + 1);
            }
            if visited.insert(next) {
                queue.push_back((next, dist + 1));
            }
        }
    }
    None
}

/// Frontier node, ordered by (f, tick, cell) for deterministic expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Node {
    f: u64,
    tick: u64,
    cell: Cell,
}

/// Plans a minimum-length (tick, cell) sequence from `start` to `goal`.
///
/// The robot departs no earlier than `depart_tick` and must be able to
/// stand on the goal cell indefinitely on arrival (so a goal another
/// robot's committed path crosses later forces a longer route or a wait).
/// Reserved (tick, cell) pairs and head-on swaps are treated as blocked.
///
/// The returned entries run from `depart_tick` (at `start`) through the
/// arrival tick (at `goal`), one entry per tick; repeated cells are waits.
///
/// # Errors
/// [`PlanError::Unreachable`] when no such route exists within `horizon`
/// ticks past `depart_tick`.
pub fn plan_path(
    workspace: &Workspace,
    start: Cell,
    goal: Cell,
    depart_tick: u64,
    reservations: &ReservationTable,
    robot_id: u32,
    horizon: u64,
) -> Result<Vec<TimelineEntry>, PlanError> {
    let unreachable = || PlanError::Unreachable {
        from: start,
        to: goal,
        depart_tick,
    };

    if !workspace.is_open(start) || !workspace.is_open(goal) {
        return Err(unreachable());
    }
    if start == goal && reservations.free_from(depart_tick, goal, robot_id) {
        return Ok(vec![TimelineEntry::new(depart_tick, start)]);
    }

    let mut open = BinaryHeap::new();
    let mut visited: HashSet<(u64, Cell)> = HashSet::new();
    let mut came_from: HashMap<(u64, Cell), (u64, Cell)> = HashMap::new();

    open.push(Reverse(Node {
        f: depart_tick + start.manhattan(&goal),
        tick: depart_tick,
        cell: start,
    }));
    visited.insert((depart_tick, start));

    while let Some(Reverse(node)) = open.pop() {
        if node.cell == goal && reservations.free_from(node.tick, goal, robot_id) {
            return Ok(reconstruct(&came_from, node.tick, node.cell, depart_tick));
        }

        let next_tick = node.tick + 1;
        if next_tick > depart_tick + horizon {
            continue;
        }

        // Wait in place, then the sorted open neighbors.
        let mut candidates = vec![node.cell];
        candidates.extend(workspace.neighbors(node.cell));

        for next in candidates {
            if visited.contains(&(next_tick, next)) {
                continue;
            }
            if !reservations.is_free(next_tick, next, robot_id) {
                continue;
            }
            if next != node.cell
                && !reservations.move_allowed(next_tick, node.cell, next, robot_id)
            {
                continue;
            }
            visited.insert((next_tick, next));
            came_from.insert((next_tick, next), (node.tick, node.cell));
            open.push(Reverse(Node {
                f: next_tick + next.manhattan(&goal),
                tick: next_tick,
                cell: next,
            }));
        }
    }

    Err(unreachable())
}

fn reconstruct(
    came_from: &HashMap<(u64, Cell), (u64, Cell)>,
    arrival_tick: u64,
    goal: Cell,
    depart_tick: u64,
) -> Vec<TimelineEntry> {
    let mut entries = vec![TimelineEntry::new(arrival_tick, goal)];
    let mut key = (arrival_tick, goal);
    while key.0 > depart_tick {
        let prev = came_from[&key];
        entries.push(TimelineEntry::new(prev.0, prev.1));
        key = prev;
    }
    entries.reverse();
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_5x5() -> Workspace {
        Workspace::new(5, 5)
    }

    #[test]
    fn test_bfs_distance() {
        let ws = open_5x5();
        assert_eq!(shortest_distance(&ws, Cell::new(0, 0), Cell::new(4, 4)), Some(8));
        assert_eq!(shortest_distance(&ws, Cell::new(2, 2), Cell::new(2, 2)), Some(0));
    }

    #[test]
    fn test_bfs_routes_around_wall() {
        // Wall across x=2 except y=4.
        let ws = Workspace::new(5, 5)
            .with_blocked(Cell::new(2, 0))
            .with_blocked(Cell::new(2, 1))
            .with_blocked(Cell::new(2, 2))
            .with_blocked(Cell::new(2, 3));
        assert_eq!(shortest_distance(&ws, Cell::new(0, 0), Cell::new(4, 0)), Some(12));
    }

    #[test]
    fn test_bfs_unreachable() {
        let ws = Workspace::new(5, 1)
            .with_blocked(Cell::new(2, 0));
        assert_eq!(shortest_distance(&ws, Cell::new(0, 0), Cell::new(4, 0)), None);
    }

    #[test]
    fn test_bfs_through_transition() {
        let ws = Workspace::new(3, 1)
            .with_levels(2)
            .with_transition(Cell::new(2, 0), Cell::on_level(2, 0, 1));
        assert_eq!(
            shortest_distance(&ws, Cell::new(0, 0), Cell::on_level(0, 0, 1)),
            Some(5)
        );
    }

    #[test]
    fn test_plan_straight_line() {
        let ws = open_5x5();
        let table = ReservationTable::new();
        let path =
            plan_path(&ws, Cell::new(0, 0), Cell::new(3, 0), 0, &table, 0, 64).unwrap();

        assert_eq!(path.len(), 4);
        assert_eq!(path[0], TimelineEntry::new(0, Cell::new(0, 0)));
        assert_eq!(path[3], TimelineEntry::new(3, Cell::new(3, 0)));
        for pair in path.windows(2) {
            assert_eq!(pair[1].tick, pair[0].tick + 1);
            assert!(pair[0].cell.is_adjacent(&pair[1].cell));
        }
    }

    #[test]
    fn test_plan_departs_later() {
        let ws = open_5x5();
        let table = ReservationTable::new();
        let path =
            plan_path(&ws, Cell::new(0, 0), Cell::new(1, 0), 10, &table, 0, 64).unwrap();
        assert_eq!(path[0].tick, 10);
        assert_eq!(path.last().unwrap().tick, 11);
    }

    #[test]
    fn test_plan_waits_for_crossing_robot() {
        let ws = Workspace::new(4, 1);
        let mut table = ReservationTable::new();
        // Robot 1 occupies (1, 0) at tick 1.
        table.reserve(1, Cell::new(1, 0), 1);

        let path =
            plan_path(&ws, Cell::new(0, 0), Cell::new(3, 0), 0, &table, 0, 64).unwrap();
        // One wait tick, then straight through: arrival at tick 4.
        assert_eq!(path.last().unwrap().tick, 4);
        assert_eq!(path[1].cell, Cell::new(0, 0));
        // The plan never stands on a reserved pair.
        for e in &path {
            assert!(table.is_free(e.tick, e.cell, 0));
        }
    }

    #[test]
    fn test_plan_avoids_head_on_swap() {
        let ws = Workspace::new(2, 2);
        let a = Cell::new(0, 0);
        let b = Cell::new(1, 0);
        let mut table = ReservationTable::new();
        // Robot 1 committed b → a over the first tick boundary.
        table.reserve_path(&[TimelineEntry::new(0, b), TimelineEntry::new(1, a)], 1);

        let path = plan_path(&ws, a, b, 0, &table, 0, 64).unwrap();
        // Swapping through robot 1 is forbidden, so the route detours or waits.
        assert!(path.last().unwrap().tick >= 2);
        for pair in path.windows(2) {
            assert!(
                !(pair[0].cell == a && pair[1].cell == b && pair[1].tick == 1),
                "planned straight through the oncoming robot"
            );
        }
    }

    #[test]
    fn test_plan_wont_park_on_crossed_goal() {
        let ws = Workspace::new(3, 1);
        let goal = Cell::new(2, 0);
        let mut table = ReservationTable::new();
        // Robot 1 crosses the goal cell at tick 5.
        table.reserve(5, goal, 1);

        let path = plan_path(&ws, Cell::new(0, 0), goal, 0, &table, 0, 64).unwrap();
        // Arrival must be deferred past the crossing.
        assert!(path.last().unwrap().tick >= 6);
    }

    #[test]
    fn test_plan_unreachable_within_horizon() {
        let ws = Workspace::new(3, 1);
        let mut table = ReservationTable::new();
        table.hold(Cell::new(1, 0), 0, 1);

        let err =
            plan_path(&ws, Cell::new(0, 0), Cell::new(2, 0), 0, &table, 0, 16).unwrap_err();
        assert!(matches!(err, PlanError::Unreachable { .. }));
    }

    #[test]
    fn test_plan_trivial_when_already_at_goal() {
        let ws = open_5x5();
        let table = ReservationTable::new();
        let path =
            plan_path(&ws, Cell::new(2, 2), Cell::new(2, 2), 7, &table, 0, 64).unwrap();
        assert_eq!(path, vec![TimelineEntry::new(7, Cell::new(2, 2))]);
    }

    #[test]
    fn test_plan_deterministic() {
        let ws = Workspace::new(6, 6).with_blocked(Cell::new(3, 3));
        let table = ReservationTable::new();
        let a = plan_path(&ws, Cell::new(0, 0), Cell::new(5, 5), 0, &table, 0, 64).unwrap();
        let b = plan_path(&ws, Cell::new(0, 0), Cell::new(5, 5), 0, &table, 0, 64).unwrap();
        assert_eq!(a, b);
    }
}
