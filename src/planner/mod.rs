// Multi-goal planner: fans the per-goal synthesizers out across every goal
// and merges the results into one coherent 7-day view.

pub mod fitness;
pub mod slots;
pub mod study;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::clock::PlanClock;
use crate::config::UserProfile;
use crate::model::{
    AgentAction, AgentActionKind, CalendarEvent, Goal, GoalCategory, ReasoningPhase,
    ReasoningStep, Task,
};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("no goals to plan; set up at least one goal first")]
    EmptyGoals,
}

/// Tasks plus the five-phase reasoning trail and the recorded engine
/// invocations. Trail and actions are informational telemetry; scheduling
/// behavior does not depend on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub tasks: Vec<Task>,
    pub reasoning: Vec<ReasoningStep>,
    pub actions: Vec<AgentAction>,
}

/// Turn one goal into an ordered 7-day task sequence. Policy is selected by
/// category: Fitness/Health get the daily-steps plan, everything else the
/// study plan.
pub fn generate_plan(
    goal: &Goal,
    profile: &UserProfile,
    events: &[CalendarEvent],
    clock: &PlanClock,
) -> PlanOutcome {
    let now = clock.now();
    let mut reasoning = Vec::with_capacity(5);

    reasoning.push(ReasoningStep::new(
        ReasoningPhase::Understand,
        "Analyzing User State",
        format!(
            "Processing goal: \"{}\" ({:?}). User available: {} mins/day. Focus time: {}-{}.",
            goal.title,
            goal.category,
            profile.daily_available_minutes,
            profile.preferences.focus_time_start,
            profile.preferences.focus_time_end,
        ),
        now,
    ));

    reasoning.push(ReasoningStep::new(
        ReasoningPhase::Propose,
        "Designing Schedule Strategy",
        format!(
            "Planning {} week schedule. Will distribute tasks across 7 days, respecting {} calendar events.",
            goal.target_weeks,
            events.len(),
        ),
        now,
    ));

    let tasks = match goal.category {
        GoalCategory::Fitness | GoalCategory::Health => fitness::generate_fitness_plan(goal, clock),
        _ => study::generate_study_plan(goal, profile, events, clock),
    };
    debug!(goal = %goal.title, count = tasks.len(), "synthesized tasks");

    reasoning.push(ReasoningStep::new(
        ReasoningPhase::Execute,
        "Generating Task Schedule",
        format!(
            "Created {} tasks spanning 7 days. Each session: {} mins with {} min breaks.",
            tasks.len(),
            profile.preferences.preferred_session_length,
            profile.preferences.break_duration,
        ),
        now,
    ));

    let total_minutes: u32 = tasks.iter().map(|t| t.estimated_minutes).sum();
    reasoning.push(ReasoningStep::new(
        ReasoningPhase::Observe,
        "Validating Schedule",
        format!(
            "Total scheduled: {} mins across {} tasks. Average daily load: {} mins.",
            total_minutes,
            tasks.len(),
            (total_minutes as f64 / 7.0).round() as u32,
        ),
        now,
    ));

    reasoning.push(ReasoningStep::new(
        ReasoningPhase::Update,
        "Plan Ready",
        "Schedule optimized for your focus time. Calendar conflicts avoided. Ready to begin!",
        now,
    ));

    let action = AgentAction::completed(
        AgentActionKind::GeneratePlan,
        serde_json::json!({ "goal": goal.title, "category": goal.category }).to_string(),
        format!("Generated {} tasks for 7-day plan", tasks.len()),
        now,
    );

    PlanOutcome {
        tasks,
        reasoning,
        actions: vec![action],
    }
}

/// Run the synthesizer once per goal (each goal gets its own independent
/// 7-day allocation), then sort the merged list by (day, start time).
pub fn generate_multi_goal_plan(
    goals: &[Goal],
    profile: &UserProfile,
    events: &[CalendarEvent],
    clock: &PlanClock,
) -> Result<PlanOutcome, PlanError> {
    if goals.is_empty() {
        return Err(PlanError::EmptyGoals);
    }

    let mut all_tasks = Vec::new();
    let mut all_reasoning = Vec::new();
    let mut all_actions = Vec::new();
    for goal in goals {
        let outcome = generate_plan(goal, profile, events, clock);
        all_tasks.extend(outcome.tasks);
        all_reasoning.extend(outcome.reasoning);
        all_actions.extend(outcome.actions);
    }

    all_tasks.sort_by(|a, b| {
        a.day_index
            .cmp(&b.day_index)
            .then(a.start_time.cmp(&b.start_time))
    });

    Ok(PlanOutcome {
        tasks: all_tasks,
        reasoning: all_reasoning,
        actions: all_actions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GoalDraft;

    fn goal(category: GoalCategory, clock: &PlanClock) -> Goal {
        Goal::create(
            GoalDraft {
                title: format!("{category:?} goal"),
                description: String::new(),
                category,
                target_weeks: 4,
                target_value: None,
                unit: None,
            },
            clock,
        )
    }

    #[test]
    fn test_empty_goal_list_is_rejected() {
        let clock = PlanClock::fixed_from_ymd(2026, 8, 26);
        let result = generate_multi_goal_plan(&[], &UserProfile::default(), &[], &clock);
        assert!(matches!(result, Err(PlanError::EmptyGoals)));
    }

    #[test]
    fn test_reasoning_trail_has_five_phases() {
        let clock = PlanClock::fixed_from_ymd(2026, 8, 26);
        let outcome = generate_plan(
            &goal(GoalCategory::Study, &clock),
            &UserProfile::default(),
            &[],
            &clock,
        );
        let phases: Vec<ReasoningPhase> = outcome.reasoning.iter().map(|s| s.phase).collect();
        assert_eq!(
            phases,
            vec![
                ReasoningPhase::Understand,
                ReasoningPhase::Propose,
                ReasoningPhase::Execute,
                ReasoningPhase::Observe,
                ReasoningPhase::Update,
            ]
        );
    }

    #[test]
    fn test_plan_records_a_generate_action() {
        let clock = PlanClock::fixed_from_ymd(2026, 8, 26);
        let outcome = generate_plan(
            &goal(GoalCategory::Study, &clock),
            &UserProfile::default(),
            &[],
            &clock,
        );
        assert_eq!(outcome.actions.len(), 1);
        let action = &outcome.actions[0];
        assert_eq!(action.kind, crate::model::AgentActionKind::GeneratePlan);
        assert!(action.input.as_deref().unwrap().contains("Study goal"));
        assert_eq!(
            action.output.as_deref(),
            Some("Generated 20 tasks for 7-day plan")
        );
    }

    #[test]
    fn test_multi_goal_plan_records_one_action_per_goal() {
        let clock = PlanClock::fixed_from_ymd(2026, 8, 26);
        let goals = vec![goal(GoalCategory::Study, &clock), goal(GoalCategory::Fitness, &clock)];
        let outcome =
            generate_multi_goal_plan(&goals, &UserProfile::default(), &[], &clock).unwrap();
        assert_eq!(outcome.actions.len(), 2);
    }

    #[test]
    fn test_merged_tasks_sorted_by_day_then_time() {
        let clock = PlanClock::fixed_from_ymd(2026, 8, 26);
        let goals = vec![goal(GoalCategory::Study, &clock), goal(GoalCategory::Fitness, &clock)];
        let outcome =
            generate_multi_goal_plan(&goals, &UserProfile::default(), &[], &clock).unwrap();

        let mut prev: Option<(u8, crate::model::WallTime)> = None;
        for task in &outcome.tasks {
            if let Some((day, time)) = prev {
                assert!(
                    (task.day_index, task.start_time) >= (day, time),
                    "tasks out of order at day {} {}",
                    task.day_index,
                    task.start_time
                );
            }
            prev = Some((task.day_index, task.start_time));
        }
        // Fitness steps (07:00) sort before study sessions (18:00) each day.
        assert!(outcome.tasks[0].title.starts_with("Daily Steps"));
    }

    #[test]
    fn test_every_task_has_consistent_date_and_bounds() {
        let clock = PlanClock::fixed_from_ymd(2026, 8, 26);
        let goals = vec![goal(GoalCategory::Study, &clock), goal(GoalCategory::Health, &clock)];
        let outcome =
            generate_multi_goal_plan(&goals, &UserProfile::default(), &[], &clock).unwrap();
        for task in &outcome.tasks {
            assert!(task.day_index <= 6);
            assert_eq!(task.scheduled_date, clock.date_for_day(task.day_index as i64));
        }
    }
}
