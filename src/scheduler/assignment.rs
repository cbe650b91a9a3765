//! Robot-to-task assignment policies.
//!
//! A policy pairs idle robots with pending tasks at the start of each
//! scheduling round, given the free-space distance from every robot to
//! every pickup. Each robot receives at most one task per round, each
//! task goes to at most one robot.

use std::fmt::Debug;

/// A candidate pairing considered by a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Idle robot id.
    pub robot_id: u32,
    /// Pending task id.
    pub task_id: u32,
    /// Free-space distance in ticks from the robot to the task's pickup.
    pub distance: u64,
}

/// A robot-to-task assignment policy.
///
/// Implementations must be deterministic: the same candidate list always
/// yields the same pairs, in the same order. The returned order is the
/// planning priority order for the round.
pub trait AssignmentPolicy: Debug {
    /// Policy name (e.g., "nearest-first").
    fn name(&self) -> &'static str;

    /// Selects (robot, task) pairs from the candidate list.
    ///
    /// `candidates` holds one entry per reachable (robot, pickup) pair.
    fn pair(&self, candidates: &[Candidate]) -> Vec<(u32, u32)>;
}

/// Greedy nearest-available matching.
///
/// Sorts candidates by increasing (distance, task id, robot id) and takes
/// pairs greedily, skipping robots and tasks already matched. The triple
/// sort key makes ties deterministic: closer wins, then the lower task id,
/// then the lower robot id.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestFirst;

impl AssignmentPolicy for NearestFirst {
    fn name(&self) -> &'static str {
        "nearest-first"
    }

    fn pair(&self, candidates: &[Candidate]) -> Vec<(u32, u32)> {
        let mut sorted: Vec<Candidate> = candidates.to_vec();
        sorted.sort_by_key(|c| (c.distance, c.task_id, c.robot_id));

        let mut used_robots = Vec::new();
        let mut used_tasks = Vec::new();
        let mut pairs = Vec::new();

        for c in sorted {
            if used_robots.contains(&c.robot_id) || used_tasks.contains(&c.task_id) {
                continue;
            }
            used_robots.push(c.robot_id);
            used_tasks.push(c.task_id);
            pairs.push((c.robot_id, c.task_id));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(robot_id: u32, task_id: u32, distance: u64) -> Candidate {
        Candidate {
            robot_id,
            task_id,
            distance,
        }
    }

    #[test]
    fn test_nearest_wins() {
        let pairs = NearestFirst.pair(&[cand(0, 0, 5), cand(1, 0, 2)]);
        assert_eq!(pairs, vec![(1, 0)]);
    }

    #[test]
    fn test_one_task_per_robot() {
        let pairs = NearestFirst.pair(&[cand(0, 0, 1), cand(0, 1, 2), cand(1, 1, 3)]);
        assert_eq!(pairs, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_tie_broken_by_task_then_robot() {
        // All distances equal: task 0 first, and robot 0 beats robot 1.
        let pairs = NearestFirst.pair(&[
            cand(1, 0, 4),
            cand(0, 0, 4),
            cand(1, 1, 4),
            cand(0, 1, 4),
        ]);
        assert_eq!(pairs, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_more_robots_than_tasks() {
        let pairs = NearestFirst.pair(&[cand(0, 0, 3), cand(1, 0, 3), cand(2, 0, 1)]);
        assert_eq!(pairs, vec![(2, 0)]);
    }

    #[test]
    fn test_empty_candidates() {
        assert!(NearestFirst.pair(&[]).is_empty());
    }

    #[test]
    fn test_priority_order_matches_sort_key() {
        // The returned order is the planning priority for the round.
        let pairs = NearestFirst.pair(&[cand(0, 3, 9), cand(1, 7, 1)]);
        assert_eq!(pairs, vec![(1, 7), (0, 3)]);
    }
}
