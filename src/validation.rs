//! Scenario validation.
//!
//! Checks structural integrity of a workspace/robot/task declaration
//! before scheduling. Detects:
//! - Duplicate robot or task IDs
//! - Duplicate base or start cells (two robots on one cell)
//! - Out-of-bounds bases, starts, pickups, or dropoffs
//! - Blocked bases, starts, pickups, or dropoffs
//!
//! All detected issues are collected and returned together.

use crate::models::{Cell, Robot, Task, Workspace};
use std::collections::HashMap;
use std::fmt;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two robots or two tasks share the same ID.
    DuplicateId,
    /// Two robots declare the same base cell.
    DuplicateBase,
    /// Two robots declare the same start cell.
    DuplicateStart,
    /// A declared cell lies outside the workspace bounds.
    OutOfBounds,
    /// A declared cell is permanently blocked.
    BlockedCell,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Validates a scenario declaration.
///
/// Checks:
/// 1. No duplicate robot IDs, no duplicate task IDs
/// 2. No two robots sharing a base cell or a start cell
/// 3. Every base, start, pickup, and dropoff in bounds
/// 4. Every base, start, pickup, and dropoff on an open cell
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_scenario(
    workspace: &Workspace,
    robots: &[Robot],
    tasks: &[Task],
) -> ValidationResult {
    let mut errors = Vec::new();

    let check_cell = |errors: &mut Vec<ValidationError>, cell: Cell, what: String| {
        if !workspace.in_bounds(cell) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfBounds,
                format!("{what} at {cell} is out of bounds"),
            ));
        } else if !workspace.is_open(cell) {
            errors.push(ValidationError::new(
                ValidationErrorKind::BlockedCell,
                format!("{what} at {cell} is blocked"),
            ));
        }
    };

    let mut robot_ids: HashMap<u32, ()> = HashMap::new();
    let mut bases: HashMap<Cell, u32> = HashMap::new();
    let mut starts: HashMap<Cell, u32> = HashMap::new();

    for robot in robots {
        if robot_ids.insert(robot.id, ()).is_some() {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate robot ID: {}", robot.id),
            ));
        }
        if let Some(&other) = bases.get(&robot.base) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateBase,
                format!(
                    "Robots {other} and {} both declare base {}",
                    robot.id, robot.base
                ),
            ));
        } else {
            bases.insert(robot.base, robot.id);
        }
        if let Some(&other) = starts.get(&robot.start) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateStart,
                format!(
                    "Robots {other} and {} both start at {}",
                    robot.id, robot.start
                ),
            ));
        } else {
            starts.insert(robot.start, robot.id);
        }

        check_cell(&mut errors, robot.base, format!("Base of robot {}", robot.id));
        if robot.start != robot.base {
            check_cell(
                &mut errors,
                robot.start,
                format!("Start of robot {}", robot.id),
            );
        }
    }

    let mut task_ids: HashMap<u32, ()> = HashMap::new();
    for task in tasks {
        if task_ids.insert(task.id, ()).is_some() {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }
        check_cell(
            &mut errors,
            task.pickup,
            format!("Pickup of task {}", task.id),
        );
        check_cell(
            &mut errors,
            task.dropoff,
            format!("Dropoff of task {}", task.id),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
