//! Seeded random scenario generation.
//!
//! Builds reproducible benchmark scenarios: a grid workspace with random
//! obstacles, a robot fleet on distinct bases, and a batch of transport
//! tasks. The same seed always yields the same scenario.
//!
//! Bases, pickups and dropoffs are drawn as pairwise distinct cells and
//! are excluded from the obstacle pool, so a generated scenario always
//! passes validation. Connectivity is not guaranteed at high obstacle
//! densities; unreachable tasks are reported by the scheduler, not
//! prevented here.

use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::fmt;

use crate::models::{Cell, Robot, Task, Workspace};

/// Parameters for one generated scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    /// Grid width in cells.
    pub width: i32,
    /// Grid height in cells.
    pub height: i32,
    /// Number of vertical levels.
    pub levels: i32,
    /// Fleet size.
    pub robot_count: usize,
    /// Number of transport tasks.
    pub task_count: usize,
    /// Fraction of non-endpoint cells to block (clamped to 0.0..=1.0).
    pub obstacle_density: f64,
    /// RNG seed; equal seeds yield equal scenarios.
    pub seed: u64,
}

impl ScenarioConfig {
    /// Creates a single-level config with no robots, tasks or obstacles.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            levels: 1,
            robot_count: 0,
            task_count: 0,
            obstacle_density: 0.0,
            seed: 0,
        }
    }

    /// Sets the number of vertical levels.
    pub fn with_levels(mut self, levels: i32) -> Self {
        self.levels = levels;
        self
    }

    /// Sets the fleet size.
    pub fn with_robots(mut self, robot_count: usize) -> Self {
        self.robot_count = robot_count;
        self
    }

    /// Sets the task count.
    pub fn with_tasks(mut self, task_count: usize) -> Self {
        self.task_count = task_count;
        self
    }

    /// Sets the obstacle density.
    pub fn with_obstacle_density(mut self, obstacle_density: f64) -> Self {
        self.obstacle_density = obstacle_density;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// A generated scenario, ready to hand to the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// The workspace with generated obstacles and level transitions.
    pub workspace: Workspace,
    /// Fleet with distinct bases.
    pub robots: Vec<Robot>,
    /// Tasks with distinct pickup and dropoff cells.
    pub tasks: Vec<Task>,
}

/// Generation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// The grid has too few cells for the requested endpoints.
    Infeasible {
        /// Distinct cells needed for bases, pickups and dropoffs.
        needed: usize,
        /// Cells available in the grid.
        available: usize,
    },
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorError::Infeasible { needed, available } => write!(
                f,
                "grid too small: {needed} distinct endpoint cells needed, {available} available"
            ),
        }
    }
}

impl std::error::Error for GeneratorError {}

/// Generates a scenario from `config`.
///
/// Endpoint cells (bases, pickups, dropoffs) are drawn first by a
/// partial Fisher-Yates pass over the full cell list, then one level
/// transition per level boundary, then obstacles from whatever remains.
///
/// # Errors
/// [`GeneratorError::Infeasible`] when the grid cannot hold the
/// requested number of distinct endpoint cells.
pub fn generate(config: &ScenarioConfig) -> Result<Scenario, GeneratorError> {
    let mut rng = SmallRng::seed_from_u64(config.seed);

    let mut cells: Vec<Cell> = Vec::new();
    for level in 0..config.levels.max(1) {
        for x in 0..config.width.max(0) {
            for y in 0..config.height.max(0) {
                cells.push(Cell::on_level(x, y, level));
            }
        }
    }

    let needed = config.robot_count + 2 * config.task_count;
    if needed > cells.len() {
        return Err(GeneratorError::Infeasible {
            needed,
            available: cells.len(),
        });
    }

    // Draw the endpoint cells: swap a random remaining cell into each of
    // the first `needed` slots.
    for i in 0..needed {
        let j = rng.random_range(i..cells.len());
        cells.swap(i, j);
    }

    let robots: Vec<Robot> = (0..config.robot_count)
        .map(|i| Robot::new(i as u32, cells[i]))
        .collect();
    let tasks: Vec<Task> = (0..config.task_count)
        .map(|i| {
            let pickup = cells[config.robot_count + 2 * i];
            let dropoff = cells[config.robot_count + 2 * i + 1];
            Task::new(i as u32, pickup, dropoff)
        })
        .collect();

    // One transition per level boundary, kept out of the obstacle pool.
    let mut transitions: Vec<(Cell, Cell)> = Vec::new();
    if config.width > 0 && config.height > 0 {
        for level in 0..config.levels.max(1) - 1 {
            let x = rng.random_range(0..config.width);
            let y = rng.random_range(0..config.height);
            transitions.push((Cell::on_level(x, y, level), Cell::on_level(x, y, level + 1)));
        }
    }

    let density = config.obstacle_density.clamp(0.0, 1.0);
    let reserved: Vec<Cell> = transitions
        .iter()
        .flat_map(|(a, b)| [*a, *b])
        .collect();
    let mut workspace =
        Workspace::new(config.width, config.height).with_levels(config.levels.max(1));
    for &cell in cells.iter().skip(needed) {
        if reserved.contains(&cell) {
            continue;
        }
        if rng.random_bool(density) {
            workspace = workspace.with_blocked(cell);
        }
    }
    for (low, high) in transitions {
        workspace = workspace.with_transition(low, high);
    }

    Ok(Scenario {
        workspace,
        robots,
        tasks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_scenario;

    #[test]
    fn test_generated_scenario_is_valid() {
        let config = ScenarioConfig::new(8, 8)
            .with_robots(4)
            .with_tasks(6)
            .with_obstacle_density(0.3)
            .with_seed(11);
        let scenario = generate(&config).unwrap();

        assert_eq!(scenario.robots.len(), 4);
        assert_eq!(scenario.tasks.len(), 6);
        assert!(
            validate_scenario(&scenario.workspace, &scenario.robots, &scenario.tasks).is_ok()
        );
    }

    #[test]
    fn test_same_seed_same_scenario() {
        let config = ScenarioConfig::new(10, 10)
            .with_robots(3)
            .with_tasks(8)
            .with_obstacle_density(0.25)
            .with_seed(42);
        assert_eq!(generate(&config).unwrap(), generate(&config).unwrap());
    }

    #[test]
    fn test_different_seeds_differ() {
        let base = ScenarioConfig::new(10, 10)
            .with_robots(3)
            .with_tasks(8)
            .with_obstacle_density(0.25);
        let a = generate(&base.clone().with_seed(1)).unwrap();
        let b = generate(&base.with_seed(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_endpoints_pairwise_distinct() {
        let config = ScenarioConfig::new(6, 6)
            .with_robots(5)
            .with_tasks(5)
            .with_seed(7);
        let scenario = generate(&config).unwrap();

        let mut endpoints: Vec<Cell> = scenario.robots.iter().map(|r| r.base).collect();
        for task in &scenario.tasks {
            endpoints.push(task.pickup);
            endpoints.push(task.dropoff);
        }
        let mut deduped = endpoints.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), endpoints.len());
    }

    #[test]
    fn test_multi_level_has_transitions() {
        let config = ScenarioConfig::new(5, 5)
            .with_levels(3)
            .with_robots(2)
            .with_tasks(2)
            .with_seed(3);
        let scenario = generate(&config).unwrap();

        // Each level boundary got a transition, so every level is open
        // from the one below it.
        for level in 0..2 {
            let crossing = scenario.workspace.transitions().iter().any(|(a, b)| {
                a.level.min(b.level) == level && a.level.max(b.level) == level + 1
            });
            assert!(crossing, "no transition between levels {level} and {}", level + 1);
        }
    }

    #[test]
    fn test_too_small_grid_rejected() {
        let config = ScenarioConfig::new(2, 2).with_robots(3).with_tasks(1);
        let err = generate(&config).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::Infeasible {
                needed: 5,
                available: 4
            }
        ));
    }
}
