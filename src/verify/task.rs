use serde::{Deserialize, Serialize};

use super::requirement::RequirementSet;

/// An instruction and the requirements that decide it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    pub requirement: RequirementSet,
}

impl Task {
    pub fn new(text: impl Into<String>, requirement: impl Into<RequirementSet>) -> Self {
        Self {
            text: text.into(),
            requirement: requirement.into(),
        }
    }
}

/// A task with the outcome of the latest verification pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifiedTask {
    #[serde(flatten)]
    pub task: Task,
    pub completed: bool,
}

impl VerifiedTask {
    /// A task no pass has checked yet.
    pub fn pending(task: Task) -> Self {
        Self {
            task,
            completed: false,
        }
    }
}

/// Completed share of `tasks` as a rounded percentage; 0 for no tasks.
pub fn percent_completed(tasks: &[VerifiedTask]) -> u32 {
    if tasks.is_empty() {
        return 0;
    }
    let completed = tasks.iter().filter(|t| t.completed).count();
    (100.0 * completed as f64 / tasks.len() as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::Requirement;

    fn task(completed: bool) -> VerifiedTask {
        VerifiedTask {
            task: Task::new("t", Requirement::literal("a", "display", "block")),
            completed,
        }
    }

    #[test]
    fn test_percent_completed() {
        assert_eq!(percent_completed(&[]), 0);
        assert_eq!(percent_completed(&[task(true), task(true), task(false)]), 67);
        assert_eq!(percent_completed(&[task(true), task(false), task(false)]), 33);
        assert_eq!(percent_completed(&[task(true), task(false)]), 50);
        assert_eq!(percent_completed(&[task(true)]), 100);
    }

    #[test]
    fn test_verified_task_serializes_flat() {
        let json = serde_json::to_value(task(true)).unwrap();
        assert_eq!(json["text"], "t");
        assert_eq!(json["completed"], true);
        assert_eq!(json["requirement"]["type"], "literal");
    }
}
