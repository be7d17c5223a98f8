// Domain records shared across the planning and replanning engine

mod goal;
mod task;
mod telemetry;
mod time;

pub use goal::{Goal, GoalCategory, GoalDraft, GoalPriority};
pub use task::{
    CalendarEvent, EventKind, EventSource, FitnessSample, Task, TaskDifficulty, TaskStatus,
};
pub use telemetry::{
    AdjustmentKind, AgentAction, AgentActionKind, CoachKind, CoachMessage, Impact,
    MicroAdjustment, PlanSnapshot, ReasoningPhase, ReasoningStep, SnapshotLabel,
};
pub use time::{TimeParseError, WallTime, MINUTES_PER_DAY};

use uuid::Uuid;

/// Prefixed unique identifier (e.g. "task-550e8400-…"). Retried calls never
/// collide; determinism of everything except ids is guaranteed by the
/// injected clock.
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_is_prefixed_and_unique() {
        let a = new_id("task");
        let b = new_id("task");
        assert!(a.starts_with("task-"));
        assert_ne!(a, b);
    }
}
