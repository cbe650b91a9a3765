//! Schedule quality metrics (KPIs).
//!
//! Computes standard fleet-performance indicators from a completed
//! schedule.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest tick any robot is still moving |
//! | Delivery Rate | Fraction of tasks delivered |
//! | Total Distance | Cell-to-cell moves summed over robots |
//! | Total Wait | In-place ticks summed over robots |
//! | Avg Completion | Mean delivery tick across delivered tasks |
//! | Avg Utilization | Mean fraction of the makespan each robot spends moving |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::HashMap;

use crate::models::{Schedule, TaskStatus};

/// Fleet performance indicators.
///
/// All time values are in ticks.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Makespan: latest tick any robot is still moving.
    pub makespan_ticks: u64,
    /// Number of delivered tasks.
    pub delivered_count: usize,
    /// Fraction of tasks delivered (0.0..1.0).
    pub delivery_rate: f64,
    /// Sum of cell-to-cell moves over all robots.
    pub total_distance: u64,
    /// Sum of in-place wait ticks over all robots.
    pub total_wait_ticks: u64,
    /// Mean delivery tick across delivered tasks.
    pub avg_completion_tick: f64,
    /// Per-robot moving fraction of the makespan.
    pub utilization_by_robot: HashMap<u32, f64>,
    /// Average robot utilization (0.0..1.0).
    pub avg_utilization: f64,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule.
    pub fn calculate(schedule: &Schedule) -> Self {
        let makespan = schedule.makespan_ticks();

        let mut total_distance: u64 = 0;
        let mut total_wait: u64 = 0;
        let mut utilization_by_robot = HashMap::new();

        for timeline in &schedule.timelines {
            let distance = timeline.distance_travelled();
            total_distance += distance;
            total_wait += timeline.wait_ticks();

            let utilization = if makespan == 0 {
                0.0
            } else {
                distance as f64 / makespan as f64
            };
            utilization_by_robot.insert(timeline.robot_id, utilization);
        }

        let avg_utilization = if utilization_by_robot.is_empty() {
            0.0
        } else {
            let sum: f64 = utilization_by_robot.values().sum();
            sum / utilization_by_robot.len() as f64
        };

        let mut delivered: usize = 0;
        let mut completion_sum: u64 = 0;
        for outcome in &schedule.outcomes {
            if outcome.status == TaskStatus::Delivered {
                delivered += 1;
                completion_sum += outcome.completion_tick.unwrap_or(0);
            }
        }

        let delivery_rate = if schedule.outcomes.is_empty() {
            1.0
        } else {
            delivered as f64 / schedule.outcomes.len() as f64
        };

        let avg_completion_tick = if delivered == 0 {
            0.0
        } else {
            completion_sum as f64 / delivered as f64
        };

        Self {
            makespan_ticks: makespan,
            delivered_count: delivered,
            delivery_rate,
            total_distance,
            total_wait_ticks: total_wait,
            avg_completion_tick,
            utilization_by_robot,
            avg_utilization,
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_delivery_rate: f64, max_makespan: u64) -> bool {
        self.delivery_rate >= min_delivery_rate && self.makespan_ticks <= max_makespan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, RobotTimeline, TaskOutcome, TimelineEntry};

    fn walk(robot_id: u32, cells: &[Cell]) -> RobotTimeline {
        RobotTimeline {
            robot_id,
            entries: cells
                .iter()
                .enumerate()
                .map(|(i, c)| TimelineEntry::new(i as u64, *c))
                .collect(),
        }
    }

    fn delivered(task_id: u32, robot_id: u32, completion_tick: u64) -> TaskOutcome {
        TaskOutcome {
            task_id,
            status: TaskStatus::Delivered,
            assigned_robot: Some(robot_id),
            picked_up_tick: Some(completion_tick.saturating_sub(1)),
            completion_tick: Some(completion_tick),
            unreachable: None,
        }
    }

    #[test]
    fn test_kpi_basic() {
        let schedule = Schedule {
            timelines: vec![
                // Four entries: three moves, no waits.
                walk(
                    0,
                    &[Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0), Cell::new(3, 0)],
                ),
                // Two moves, one wait.
                walk(
                    1,
                    &[Cell::new(4, 4), Cell::new(4, 3), Cell::new(4, 3), Cell::new(4, 2)],
                ),
            ],
            outcomes: vec![delivered(0, 0, 2), delivered(1, 1, 4)],
            complete: true,
        };

        let kpi = ScheduleKpi::calculate(&schedule);
        assert_eq!(kpi.makespan_ticks, 3);
        assert_eq!(kpi.delivered_count, 2);
        assert!((kpi.delivery_rate - 1.0).abs() < 1e-10);
        assert_eq!(kpi.total_distance, 5);
        assert_eq!(kpi.total_wait_ticks, 1);
        assert!((kpi.avg_completion_tick - 3.0).abs() < 1e-10); // (2+4)/2
    }

    #[test]
    fn test_kpi_utilization() {
        let schedule = Schedule {
            timelines: vec![
                // Moves on every one of 4 ticks.
                walk(
                    0,
                    &[
                        Cell::new(0, 0),
                        Cell::new(1, 0),
                        Cell::new(2, 0),
                        Cell::new(3, 0),
                        Cell::new(4, 0),
                    ],
                ),
                // Moves on 2 of 4 ticks.
                walk(
                    1,
                    &[Cell::new(0, 4), Cell::new(1, 4), Cell::new(2, 4)],
                ),
            ],
            outcomes: Vec::new(),
            complete: true,
        };

        let kpi = ScheduleKpi::calculate(&schedule);
        assert!((kpi.utilization_by_robot[&0] - 1.0).abs() < 1e-10);
        assert!((kpi.utilization_by_robot[&1] - 0.5).abs() < 1e-10);
        assert!((kpi.avg_utilization - 0.75).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_partial_delivery() {
        let schedule = Schedule {
            timelines: vec![walk(0, &[Cell::new(0, 0), Cell::new(1, 0)])],
            outcomes: vec![delivered(0, 0, 1), TaskOutcome::pending(1)],
            complete: true,
        };

        let kpi = ScheduleKpi::calculate(&schedule);
        assert_eq!(kpi.delivered_count, 1);
        assert!((kpi.delivery_rate - 0.5).abs() < 1e-10);
        assert!((kpi.avg_completion_tick - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = ScheduleKpi::calculate(&Schedule::empty());
        assert_eq!(kpi.makespan_ticks, 0);
        assert_eq!(kpi.delivered_count, 0);
        assert!((kpi.delivery_rate - 1.0).abs() < 1e-10);
        assert!((kpi.avg_utilization - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_meets_thresholds() {
        let schedule = Schedule {
            timelines: vec![walk(0, &[Cell::new(0, 0), Cell::new(1, 0)])],
            outcomes: vec![delivered(0, 0, 1), TaskOutcome::pending(1)],
            complete: true,
        };

        let kpi = ScheduleKpi::calculate(&schedule);
        assert!(kpi.meets_thresholds(0.5, 1));
        assert!(!kpi.meets_thresholds(0.6, 1));
        assert!(!kpi.meets_thresholds(0.5, 0));
    }
}
