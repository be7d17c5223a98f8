// Plan store
//
// Explicit in-memory repository for everything the planner and replanner
// produce. Owned by the caller and passed where needed, so the scheduling
// core stays pure and testable.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::adjust;
use crate::model::{
    AgentAction, CoachMessage, FitnessSample, Goal, GoalCategory, MicroAdjustment, PlanSnapshot,
    ReasoningStep, Task, TaskStatus,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no task with id '{0}'")]
    UnknownTask(String),
    #[error("no adjustment with id '{0}'")]
    UnknownAdjustment(String),
    #[error("adjustment '{0}' was already applied")]
    AlreadyApplied(String),
}

/// In-memory plan state.
#[derive(Debug, Default)]
pub struct PlanStore {
    goals: Vec<Goal>,
    tasks: Vec<Task>,
    snapshots: Vec<PlanSnapshot>,
    reasoning: Vec<ReasoningStep>,
    actions: Vec<AgentAction>,
    adjustments: Vec<MicroAdjustment>,
    coach_messages: Vec<CoachMessage>,
    fitness_history: Vec<FitnessSample>,
}

impl PlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Accessors

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn snapshots(&self) -> &[PlanSnapshot] {
        &self.snapshots
    }

    pub fn reasoning(&self) -> &[ReasoningStep] {
        &self.reasoning
    }

    pub fn actions(&self) -> &[AgentAction] {
        &self.actions
    }

    pub fn adjustments(&self) -> &[MicroAdjustment] {
        &self.adjustments
    }

    pub fn coach_messages(&self) -> &[CoachMessage] {
        &self.coach_messages
    }

    pub fn fitness_history(&self) -> &[FitnessSample] {
        &self.fitness_history
    }

    pub fn latest_fitness(&self) -> Option<&FitnessSample> {
        self.fitness_history.last()
    }

    // Mutators

    pub fn set_goals(&mut self, goals: Vec<Goal>) {
        self.goals = goals;
    }

    pub fn add_goal(&mut self, goal: Goal) {
        self.goals.push(goal);
    }

    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn push_snapshot(&mut self, snapshot: PlanSnapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn extend_reasoning(&mut self, steps: impl IntoIterator<Item = ReasoningStep>) {
        self.reasoning.extend(steps);
    }

    pub fn push_action(&mut self, action: AgentAction) {
        self.actions.push(action);
    }

    pub fn extend_adjustments(&mut self, adjustments: impl IntoIterator<Item = MicroAdjustment>) {
        self.adjustments.extend(adjustments);
    }

    pub fn push_coach_message(&mut self, message: CoachMessage) {
        self.coach_messages.push(message);
    }

    pub fn push_fitness_sample(&mut self, sample: FitnessSample) {
        self.fitness_history.push(sample);
    }

    /// Drop all state. Used when a new plan replaces the current week.
    pub fn reset(&mut self) {
        *self = Self::default();
        debug!("plan store reset");
    }

    /// Transition a task's status. Completing stamps `completed_at`; moving
    /// back to pending clears it.
    pub fn update_task_status(
        &mut self,
        task_id: &str,
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| StoreError::UnknownTask(task_id.to_string()))?;

        task.status = status;
        match status {
            TaskStatus::Done => task.completed_at = Some(now),
            TaskStatus::Pending => task.completed_at = None,
            _ => {}
        }
        Ok(())
    }

    /// Refresh every goal's `current_value`: fitness goals track today's
    /// steps, everything else counts done tasks.
    pub fn sync_goal_progress(&mut self) {
        let steps_today = self.fitness_history.last().map(|s| s.steps);
        for goal in &mut self.goals {
            let value = if goal.category == GoalCategory::Fitness {
                steps_today.map(|s| s as f64)
            } else {
                let done = self
                    .tasks
                    .iter()
                    .filter(|t| t.goal_id == goal.id && t.is_done())
                    .count();
                Some(done as f64)
            };
            if let Some(value) = value {
                goal.current_value = Some(value);
            }
        }
    }

    /// Apply a previously suggested adjustment to the live tasks and mark
    /// it as applied. Applying twice is an error.
    pub fn apply_adjustment(
        &mut self,
        adjustment_id: &str,
        now: DateTime<Utc>,
    ) -> Result<&MicroAdjustment, StoreError> {
        let index = self
            .adjustments
            .iter()
            .position(|a| a.id == adjustment_id)
            .ok_or_else(|| StoreError::UnknownAdjustment(adjustment_id.to_string()))?;

        if self.adjustments[index].applied {
            return Err(StoreError::AlreadyApplied(adjustment_id.to_string()));
        }

        let kind = self.adjustments[index].kind;
        adjust::apply_adjustment(kind, &mut self.tasks);

        let adjustment = &mut self.adjustments[index];
        adjustment.applied = true;
        adjustment.applied_at = Some(now);
        debug!(id = adjustment_id, ?kind, "adjustment applied");
        Ok(&self.adjustments[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::PlanClock;
    use crate::model::{
        new_id, AdjustmentKind, GoalDraft, Impact, TaskDifficulty, WallTime,
    };

    fn clock() -> PlanClock {
        PlanClock::fixed_from_ymd(2026, 8, 26)
    }

    fn task(day: u8, goal_id: &str) -> Task {
        let c = clock();
        Task {
            id: new_id("task"),
            goal_id: goal_id.to_string(),
            title: "session".to_string(),
            description: String::new(),
            day_index: day,
            scheduled_date: c.date_for_day(day as i64),
            estimated_minutes: 40,
            actual_minutes: None,
            start_time: WallTime::new(18, 0),
            end_time: None,
            status: TaskStatus::Pending,
            difficulty: TaskDifficulty::Medium,
            completed_at: None,
            notes: None,
        }
    }

    #[test]
    fn test_done_sets_and_pending_clears_completed_at() {
        let mut store = PlanStore::new();
        let t = task(0, "goal-1");
        let id = t.id.clone();
        store.set_tasks(vec![t]);

        store
            .update_task_status(&id, TaskStatus::Done, clock().now())
            .unwrap();
        assert!(store.tasks()[0].completed_at.is_some());

        store
            .update_task_status(&id, TaskStatus::Pending, clock().now())
            .unwrap();
        assert!(store.tasks()[0].completed_at.is_none());
    }

    #[test]
    fn test_unknown_task_is_an_error() {
        let mut store = PlanStore::new();
        let err = store
            .update_task_status("task-missing", TaskStatus::Done, clock().now())
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownTask(_)));
    }

    #[test]
    fn test_goal_progress_counts_done_tasks() {
        let c = clock();
        let mut store = PlanStore::new();
        let goal = Goal::create(
            GoalDraft {
                title: "Learn Rust".to_string(),
                ..Default::default()
            },
            &c,
        );
        let goal_id = goal.id.clone();
        store.set_goals(vec![goal]);

        let tasks = vec![task(0, &goal_id), task(0, &goal_id), task(1, "other")];
        let first = tasks[0].id.clone();
        store.set_tasks(tasks);
        store
            .update_task_status(&first, TaskStatus::Done, c.now())
            .unwrap();

        store.sync_goal_progress();
        assert_eq!(store.goals()[0].current_value, Some(1.0));
    }

    #[test]
    fn test_fitness_goal_tracks_todays_steps() {
        let c = clock();
        let mut store = PlanStore::new();
        let goal = Goal::create(
            GoalDraft {
                title: "Daily Movement".to_string(),
                category: GoalCategory::Fitness,
                target_value: Some(5000.0),
                ..Default::default()
            },
            &c,
        );
        store.set_goals(vec![goal]);
        store.push_fitness_sample(FitnessSample {
            date: c.today(),
            steps: 3200,
            steps_goal: 5000,
            active_minutes: 25,
        });

        store.sync_goal_progress();
        assert_eq!(store.goals()[0].current_value, Some(3200.0));
    }

    #[test]
    fn test_apply_adjustment_mutates_tasks_once() {
        let c = clock();
        let mut store = PlanStore::new();
        store.set_tasks(vec![task(1, "goal-1")]);
        store.extend_adjustments([MicroAdjustment::suggest(
            AdjustmentKind::ShortenSession,
            "Shorter Focus Sessions",
            "Cut future sessions by 25%",
            "low completion",
            Impact::High,
            c.now(),
        )]);
        let id = store.adjustments()[0].id.clone();

        let applied = store.apply_adjustment(&id, c.now()).unwrap();
        assert!(applied.applied);
        assert!(applied.applied_at.is_some());
        assert_eq!(store.tasks()[0].estimated_minutes, 30);

        let err = store.apply_adjustment(&id, c.now()).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyApplied(_)));
        // No double mutation.
        assert_eq!(store.tasks()[0].estimated_minutes, 30);
    }

    #[test]
    fn test_actions_accumulate_in_order() {
        use crate::model::AgentActionKind;

        let c = clock();
        let mut store = PlanStore::new();
        store.push_action(AgentAction::completed(
            AgentActionKind::GeneratePlan,
            "goal setup",
            "Generated 20 tasks for 7-day plan",
            c.now(),
        ));
        store.push_action(AgentAction::completed(
            AgentActionKind::Replan,
            "Day completion: 50%",
            "Moved 1 tasks to upcoming days.",
            c.now(),
        ));

        let kinds: Vec<AgentActionKind> = store.actions().iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AgentActionKind::GeneratePlan, AgentActionKind::Replan]);
        assert!(store.actions().iter().all(|a| a.output.is_some()));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut store = PlanStore::new();
        store.set_tasks(vec![task(0, "goal-1")]);
        store.push_fitness_sample(FitnessSample {
            date: clock().today(),
            steps: 100,
            steps_goal: 5000,
            active_minutes: 5,
        });
        store.reset();
        assert!(store.tasks().is_empty());
        assert!(store.fitness_history().is_empty());
    }
}
