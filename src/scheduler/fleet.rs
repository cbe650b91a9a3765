//! Cooperative, priority-based fleet scheduler.
//!
//! # Algorithm
//!
//! 1. Validate the scenario; settle statically unreachable tasks up front.
//! 2. Each round, at the earliest tick any robot is free: pair idle robots
//!    with pending tasks (nearest-first), then plan each journey
//!    start→pickup→dropoff against the shared reservation table.
//! 3. Commit successful plans tick-by-tick into the timeline and the
//!    table; a robot whose plan conflicts with earlier commitments waits
//!    one tick in place and retries next round. Earlier commitments never
//!    move for later ones.
//! 4. Once no unassigned tasks remain, idle robots are planned home to
//!    their own bases. The run ends when every robot stands on its base.
//! 5. A robot failing more than the configured round limit aborts the run
//!    as a deadlock, returning the partial schedule for diagnostics.
//!
//! # Complexity
//! O(rounds × robots × A*) where each A* search is bounded by
//! cells × horizon states.
//!
//! # Reference
//! Silver (2005), "Cooperative Pathfinding"

use crate::models::{
    Cell, Robot, RobotState, RobotTimeline, Schedule, Task, TaskOutcome, TaskStatus,
    TimelineEntry, Workspace,
};
use crate::planner::{plan_path, shortest_distance, PlanError, ReservationTable};
use crate::validation::validate_scenario;

use super::assignment::{AssignmentPolicy, Candidate, NearestFirst};
use super::SchedulerError;

/// Tunable scheduling limits.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Maximum path length in ticks past the departure tick.
    pub horizon: u64,
    /// Consecutive failed rounds a robot may accumulate before the run
    /// is declared deadlocked.
    pub max_stall_rounds: u32,
    /// Ticks a robot dwells on the pickup cell to collect the load.
    pub pickup_dwell: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            horizon: 512,
            max_stall_rounds: 64,
            pickup_dwell: 1,
        }
    }
}

/// Per-robot planning state.
#[derive(Debug)]
struct RobotPlan {
    robot: Robot,
    state: RobotState,
    timeline: Vec<TimelineEntry>,
    /// Tick of the last committed timeline entry.
    busy_until: u64,
    /// Index into the task-state vector of the sticky assignment, if any.
    task: Option<usize>,
    stall_rounds: u32,
    /// Parked on its own base with no further work.
    done: bool,
}

impl RobotPlan {
    fn current_cell(&self) -> Cell {
        // Timelines always start with the tick-0 entry.
        self.timeline.last().map(|e| e.cell).unwrap_or(self.robot.start)
    }
}

/// Per-task planning state.
#[derive(Debug)]
struct TaskState {
    task: Task,
    status: TaskStatus,
    assigned_robot: Option<u32>,
    picked_up_tick: Option<u64>,
    completion_tick: Option<u64>,
    unreachable: Option<String>,
}

impl TaskState {
    fn new(task: Task) -> Self {
        Self {
            task,
            status: TaskStatus::Pending,
            assigned_robot: None,
            picked_up_tick: None,
            completion_tick: None,
            unreachable: None,
        }
    }

    fn settled(&self) -> bool {
        self.status == TaskStatus::Delivered || self.unreachable.is_some()
    }

    fn outcome(&self) -> TaskOutcome {
        TaskOutcome {
            task_id: self.task.id,
            status: self.status,
            assigned_robot: self.assigned_robot,
            picked_up_tick: self.picked_up_tick,
            completion_tick: self.completion_tick,
            unreachable: self.unreachable.clone(),
        }
    }
}

/// Conflict-aware fleet scheduler.
///
/// Deterministic: robots and tasks are processed in ascending id order,
/// all tie-breaks are fixed, and identical inputs produce identical
/// schedules.
#[derive(Debug)]
pub struct FleetScheduler {
    config: SchedulerConfig,
    policy: Box<dyn AssignmentPolicy>,
}

impl FleetScheduler {
    /// Creates a scheduler with default limits and nearest-first matching.
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
            policy: Box::new(NearestFirst),
        }
    }

    /// Sets scheduling limits.
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the assignment policy.
    pub fn with_policy<P: AssignmentPolicy + 'static>(mut self, policy: P) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Computes a complete schedule for the scenario.
    ///
    /// Zero robots or zero tasks is a valid "no work to do" scenario and
    /// yields an empty, complete schedule rather than an error.
    ///
    /// # Errors
    /// - [`SchedulerError::InvalidScenario`] for malformed declarations;
    ///   no schedule is produced.
    /// - [`SchedulerError::Deadlock`] when a robot exhausts its stall
    ///   budget; the partial schedule is attached.
    pub fn schedule(
        &self,
        workspace: &Workspace,
        robots: &[Robot],
        tasks: &[Task],
    ) -> Result<Schedule, SchedulerError> {
        validate_scenario(workspace, robots, tasks).map_err(SchedulerError::InvalidScenario)?;

        let mut robots: Vec<Robot> = robots.to_vec();
        robots.sort_by_key(|r| r.id);
        let mut tasks: Vec<Task> = tasks.to_vec();
        tasks.sort_by_key(|t| t.id);

        if robots.is_empty() || tasks.is_empty() {
            return Ok(Schedule {
                timelines: robots
                    .iter()
                    .map(|r| RobotTimeline::starting_at(r.id, r.start))
                    .collect(),
                outcomes: tasks.iter().map(|t| TaskOutcome::pending(t.id)).collect(),
                complete: true,
            });
        }

        let mut table = ReservationTable::new();
        let mut plans: Vec<RobotPlan> = robots
            .iter()
            .map(|&robot| {
                table.hold(robot.start, 0, robot.id);
                RobotPlan {
                    robot,
                    state: RobotState::Idle,
                    timeline: vec![TimelineEntry::new(0, robot.start)],
                    busy_until: 0,
                    task: None,
                    stall_rounds: 0,
                    done: false,
                }
            })
            .collect();

        let mut states: Vec<TaskState> = tasks.into_iter().map(TaskState::new).collect();
        self.settle_static_unreachable(workspace, &robots, &mut states);

        loop {
            if states.iter().all(TaskState::settled) && plans.iter().all(|p| p.done) {
                break;
            }

            // Earliest tick at which any unfinished robot is free.
            let now = match plans
                .iter()
                .filter(|p| !p.done)
                .map(|p| p.busy_until)
                .min()
            {
                Some(t) => t,
                None => break, // all robots done, only unreachable tasks left
            };

            // Arrivals: journeys and homeward legs complete at their last tick.
            for plan in plans.iter_mut().filter(|p| !p.done && p.busy_until <= now) {
                match plan.state {
                    RobotState::ToDropoff => {
                        plan.state = RobotState::Idle;
                        plan.task = None;
                    }
                    RobotState::ReturningToBase => {
                        plan.state = RobotState::Idle;
                        plan.done = true;
                    }
                    _ => {}
                }
            }

            let idle: Vec<usize> = (0..plans.len())
                .filter(|&i| {
                    let p = &plans[i];
                    !p.done
                        && p.busy_until <= now
                        && matches!(p.state, RobotState::Idle | RobotState::ToPickup)
                })
                .collect();

            // Journeys for this round: sticky retries first (earlier
            // assignments outrank this round's new ones), then new pairs.
            let mut journeys: Vec<(usize, usize)> = Vec::new();
            for &i in &idle {
                if plans[i].state == RobotState::ToPickup {
                    if let Some(ti) = plans[i].task {
                        journeys.push((i, ti));
                    }
                }
            }

            let candidates = self.collect_candidates(workspace, &plans, &states, &idle);
            for (robot_id, task_id) in self.policy.pair(&candidates) {
                // Pairs the policy invented out of thin air are ignored.
                let Some(pi) = plans.iter().position(|p| p.robot.id == robot_id) else {
                    continue;
                };
                let Some(ti) = states.iter().position(|t| t.task.id == task_id) else {
                    continue;
                };
                states[ti].status = TaskStatus::Assigned;
                states[ti].assigned_robot = Some(robot_id);
                plans[pi].task = Some(ti);
                plans[pi].state = RobotState::ToPickup;
                journeys.push((pi, ti));
            }

            let mut acted = vec![false; plans.len()];
            for (pi, ti) in journeys {
                acted[pi] = true;
                match self.commit_journey(workspace, &mut plans[pi], &mut states[ti], &mut table)
                {
                    Ok(()) => plans[pi].stall_rounds = 0,
                    Err(PlanError::Unreachable { .. }) => {
                        self.wait_in_place(&mut plans[pi], now);
                        plans[pi].stall_rounds += 1;
                        self.check_deadlock(&plans, &states, pi, now)?;
                    }
                }
            }

            // Homing: once no unassigned task remains, free robots head to
            // their own base. While unassigned tasks remain, unpaired idle
            // robots wait in place so simulated time can advance.
            let unassigned_pending = states
                .iter()
                .any(|t| t.status == TaskStatus::Pending && t.unreachable.is_none());

            for &pi in &idle {
                if acted[pi] || plans[pi].done {
                    continue;
                }
                if unassigned_pending {
                    self.wait_in_place(&mut plans[pi], now);
                } else if plans[pi].current_cell() == plans[pi].robot.base {
                    plans[pi].state = RobotState::Idle;
                    plans[pi].done = true;
                } else {
                    match self.commit_homing(workspace, &mut plans[pi], &mut table) {
                        Ok(()) => plans[pi].stall_rounds = 0,
                        Err(PlanError::Unreachable { .. }) => {
                            self.wait_in_place(&mut plans[pi], now);
                            plans[pi].stall_rounds += 1;
                            self.check_deadlock(&plans, &states, pi, now)?;
                        }
                    }
                }
            }
        }

        Ok(build_schedule(&plans, &states, true))
    }

    /// Marks tasks that can never be served regardless of other robots:
    /// dropoff cut off from pickup, route longer than the horizon, or
    /// pickup cut off from every robot's start. The run continues planning
    /// everything else.
    fn settle_static_unreachable(
        &self,
        workspace: &Workspace,
        robots: &[Robot],
        states: &mut [TaskState],
    ) {
        for ts in states.iter_mut() {
            let Task { pickup, dropoff, .. } = ts.task;
            match shortest_distance(workspace, pickup, dropoff) {
                None => {
                    ts.unreachable =
                        Some(format!("dropoff {dropoff} is unreachable from pickup {pickup}"));
                }
                Some(d) if d > self.config.horizon => {
                    ts.unreachable = Some(format!(
                        "route from {pickup} to {dropoff} needs {d} ticks, beyond the {}-tick horizon",
                        self.config.horizon
                    ));
                }
                Some(_) => {
                    let reachable = robots
                        .iter()
                        .any(|r| shortest_distance(workspace, r.start, pickup).is_some());
                    if !reachable {
                        ts.unreachable =
                            Some(format!("pickup {pickup} is unreachable from every robot"));
                    }
                }
            }
        }
    }

    /// Free-space distances from every unassigned idle robot to every
    /// pending pickup.
    fn collect_candidates(
        &self,
        workspace: &Workspace,
        plans: &[RobotPlan],
        states: &[TaskState],
        idle: &[usize],
    ) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        for &pi in idle {
            if plans[pi].task.is_some() {
                continue;
            }
            for ts in states.iter() {
                if ts.status != TaskStatus::Pending || ts.unreachable.is_some() {
                    continue;
                }
                if let Some(distance) =
                    shortest_distance(workspace, plans[pi].current_cell(), ts.task.pickup)
                {
                    candidates.push(Candidate {
                        robot_id: plans[pi].robot.id,
                        task_id: ts.task.id,
                        distance,
                    });
                }
            }
        }
        candidates
    }

    /// Plans and commits a full journey: current cell → pickup, a pickup
    /// dwell, then pickup → dropoff. All-or-nothing: the table and the
    /// timeline are only touched once both legs and the dwell are known
    /// to be conflict-free.
    fn commit_journey(
        &self,
        workspace: &Workspace,
        plan: &mut RobotPlan,
        ts: &mut TaskState,
        table: &mut ReservationTable,
    ) -> Result<(), PlanError> {
        let robot_id = plan.robot.id;
        let depart = plan.busy_until;
        let from = plan.current_cell();
        let Task { pickup, dropoff, .. } = ts.task;

        let leg_in = plan_path(
            workspace,
            from,
            pickup,
            depart,
            table,
            robot_id,
            self.config.horizon,
        )?;
        let picked_up = leg_in.last().map(|e| e.tick).unwrap_or(depart);
        let depart_loaded = picked_up + self.config.pickup_dwell;

        for t in picked_up + 1..=depart_loaded {
            if !table.is_free(t, pickup, robot_id) {
                return Err(PlanError::Unreachable {
                    from: pickup,
                    to: dropoff,
                    depart_tick: depart_loaded,
                });
            }
        }

        let leg_out = plan_path(
            workspace,
            pickup,
            dropoff,
            depart_loaded,
            table,
            robot_id,
            self.config.horizon,
        )?;
        let delivered = leg_out.last().map(|e| e.tick).unwrap_or(depart_loaded);

        // Commit.
        table.release(from, depart, robot_id);
        table.reserve_path(&leg_in, robot_id);
        for t in picked_up + 1..=depart_loaded {
            table.reserve(t, pickup, robot_id);
        }
        table.reserve_path(&leg_out, robot_id);
        table.hold(dropoff, delivered, robot_id);

        plan.timeline.extend(leg_in.into_iter().skip(1));
        for t in picked_up + 1..=depart_loaded {
            plan.timeline.push(TimelineEntry::new(t, pickup));
        }
        plan.timeline.extend(leg_out.into_iter().skip(1));
        plan.busy_until = delivered;
        plan.state = RobotState::ToDropoff;

        ts.status = TaskStatus::PickedUp;
        ts.picked_up_tick = Some(picked_up);
        ts.status = TaskStatus::Delivered;
        ts.completion_tick = Some(delivered);
        Ok(())
    }

    /// Plans and commits the homeward leg to the robot's own base.
    fn commit_homing(
        &self,
        workspace: &Workspace,
        plan: &mut RobotPlan,
        table: &mut ReservationTable,
    ) -> Result<(), PlanError> {
        let robot_id = plan.robot.id;
        let depart = plan.busy_until;
        let from = plan.current_cell();
        let base = plan.robot.base;

        let leg = plan_path(
            workspace,
            from,
            base,
            depart,
            table,
            robot_id,
            self.config.horizon,
        )?;
        let arrival = leg.last().map(|e| e.tick).unwrap_or(depart);

        table.release(from, depart, robot_id);
        table.reserve_path(&leg, robot_id);
        table.hold(base, arrival, robot_id);

        plan.timeline.extend(leg.into_iter().skip(1));
        plan.busy_until = arrival;
        plan.state = RobotState::ReturningToBase;
        Ok(())
    }

    /// Commits a single in-place wait tick. The robot's open hold already
    /// covers the cell, so only the timeline advances.
    fn wait_in_place(&self, plan: &mut RobotPlan, now: u64) {
        let cell = plan.current_cell();
        plan.timeline.push(TimelineEntry::new(now + 1, cell));
        plan.busy_until = now + 1;
    }

    fn check_deadlock(
        &self,
        plans: &[RobotPlan],
        states: &[TaskState],
        pi: usize,
        now: u64,
    ) -> Result<(), SchedulerError> {
        let plan = &plans[pi];
        if plan.stall_rounds > self.config.max_stall_rounds {
            return Err(SchedulerError::Deadlock {
                robot_id: plan.robot.id,
                cell: plan.current_cell(),
                tick: now,
                schedule: Box::new(build_schedule(plans, states, false)),
            });
        }
        Ok(())
    }
}

impl Default for FleetScheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn build_schedule(plans: &[RobotPlan], states: &[TaskState], complete: bool) -> Schedule {
    Schedule {
        timelines: plans
            .iter()
            .map(|p| RobotTimeline {
                robot_id: p.robot.id,
                entries: p.timeline.clone(),
            })
            .collect(),
        outcomes: states.iter().map(TaskState::outcome).collect(),
        complete,
    }
}
