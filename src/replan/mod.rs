// Replanning cycle
//
// Once per cycle, anchored at day 0: measure today's completion, analyze
// behavior, move unfinished day-0 tasks round-robin across days 1–6,
// reduce the remaining load when the day went badly, collect policy
// suggestions, and synthesize a coaching message.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::adjust::suggest_adjustments;
use crate::behavior::{BehaviorSnapshot, TimeSlot};
use crate::clock::PlanClock;
use crate::model::{
    new_id, AgentAction, AgentActionKind, CoachKind, CoachMessage, Goal, MicroAdjustment,
    PlanSnapshot, ReasoningPhase, ReasoningStep, SnapshotLabel, Task, TaskStatus, WallTime,
};

/// Completion rate below which future pending sessions get shortened.
const REDUCE_LOAD_PERCENT: u32 = 40;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplanOutcome {
    pub updated_tasks: Vec<Task>,
    pub completion_percent: u32,
    pub coach_message: CoachMessage,
    pub diff_summary: String,
    pub snapshot: PlanSnapshot,
    pub micro_adjustments: Vec<MicroAdjustment>,
    pub reasoning: Vec<ReasoningStep>,
    pub action: AgentAction,
}

/// Revise the week based on how day 0 went. Pure given the injected clock:
/// done tasks are never touched, and mutations are applied in list order so
/// identical input yields identical output modulo generated ids.
pub fn replan_week(current_tasks: &[Task], goals: &[Goal], clock: &PlanClock) -> ReplanOutcome {
    let now = clock.now();
    let mut reasoning = Vec::with_capacity(5);

    let day0: Vec<&Task> = current_tasks.iter().filter(|t| t.day_index == 0).collect();
    let done_count = day0.iter().filter(|t| t.is_done()).count();
    let completion_percent = if day0.is_empty() {
        0
    } else {
        ((done_count as f64 / day0.len() as f64) * 100.0).round() as u32
    };

    let behavior = BehaviorSnapshot::from_tasks(current_tasks, clock);

    reasoning.push(ReasoningStep::new(
        ReasoningPhase::Understand,
        "Analyzing Today's Progress",
        format!(
            "Completed {done_count}/{} tasks ({completion_percent}%). Preferred time: {}. \
             Skip pattern: {:?}. Current streak: {} days.",
            day0.len(),
            behavior.preferred_slot,
            behavior.skip_pattern,
            behavior.streak_days,
        ),
        now,
    ));

    let move_ids: Vec<String> = day0
        .iter()
        .filter(|t| !t.is_done())
        .map(|t| t.id.clone())
        .collect();

    reasoning.push(ReasoningStep::new(
        ReasoningPhase::Propose,
        "Calculating Adjustments",
        format!(
            "{} tasks need rescheduling. Generating micro-adjustments based on your patterns.",
            move_ids.len(),
        ),
        now,
    ));

    let mut updated_tasks = current_tasks.to_vec();
    let moved_start = start_for_slot(behavior.preferred_slot);

    // Round-robin over days 1-6, never back onto day 0. The start time is a
    // full overwrite from the preferred slot, not an incremental shift.
    for (index, id) in move_ids.iter().enumerate() {
        if let Some(task) = updated_tasks.iter_mut().find(|t| &t.id == id) {
            let new_day = (1 + index % 6) as u8;
            task.day_index = new_day;
            task.scheduled_date = clock.date_for_day(new_day as i64);
            task.status = TaskStatus::Rescheduled;
            task.start_time = moved_start;
            task.refresh_end_time();
        }
    }

    let mut diff_summary = if move_ids.is_empty() {
        "All tasks completed! Schedule maintained.".to_string()
    } else {
        format!("Moved {} tasks to upcoming days.", move_ids.len())
    };

    if completion_percent < REDUCE_LOAD_PERCENT {
        for task in &mut updated_tasks {
            if task.day_index > 0 && task.status == TaskStatus::Pending {
                task.estimated_minutes = task.estimated_minutes * 3 / 4;
                task.refresh_end_time();
            }
        }
        diff_summary.push_str(" Reduced future session lengths by 25%.");
    }

    reasoning.push(ReasoningStep::new(
        ReasoningPhase::Execute,
        "Applying Schedule Changes",
        diff_summary.clone(),
        now,
    ));

    // Suggestions are derived from the pre-replan list.
    let micro_adjustments =
        suggest_adjustments(current_tasks, completion_percent, &behavior, clock);

    reasoning.push(ReasoningStep::new(
        ReasoningPhase::Observe,
        "Generated Recommendations",
        format!(
            "Created {} micro-adjustments for optimal performance.",
            micro_adjustments.len(),
        ),
        now,
    ));

    let coach_message = coach_message(
        completion_percent,
        move_ids.len(),
        &behavior,
        goals.first(),
        clock,
    );

    reasoning.push(ReasoningStep::new(
        ReasoningPhase::Update,
        "Plan Updated Successfully",
        "New schedule is ready. Tomorrow's plan has been optimized based on today's performance.",
        now,
    ));

    let snapshot = PlanSnapshot::capture(
        SnapshotLabel::Replan,
        &updated_tasks,
        goals,
        diff_summary.clone(),
        now,
    );

    let action = AgentAction::completed(
        AgentActionKind::Replan,
        format!("Day completion: {completion_percent}%"),
        diff_summary.clone(),
        now,
    );

    info!(
        completion_percent,
        moved = move_ids.len(),
        adjustments = micro_adjustments.len(),
        "replanned week"
    );

    ReplanOutcome {
        updated_tasks,
        completion_percent,
        coach_message,
        diff_summary,
        snapshot,
        micro_adjustments,
        reasoning,
        action,
    }
}

fn start_for_slot(slot: TimeSlot) -> WallTime {
    match slot {
        TimeSlot::Morning => WallTime::new(8, 0),
        TimeSlot::Afternoon => WallTime::new(14, 0),
        TimeSlot::Evening => WallTime::new(18, 0),
    }
}

/// Templated coaching message. The threshold ordering and the tone
/// escalation from celebration down to load-reduction are the contract.
fn coach_message(
    completion_percent: u32,
    moved_count: usize,
    behavior: &BehaviorSnapshot,
    goal: Option<&Goal>,
    clock: &PlanClock,
) -> CoachMessage {
    let (message, kind) = if completion_percent >= 90 {
        (
            format!(
                "Outstanding work! You completed {completion_percent}% of today's tasks. \
                 Your {}-day streak is incredible! Keep this momentum going.",
                behavior.streak_days,
            ),
            CoachKind::Celebration,
        )
    } else if completion_percent >= 70 {
        (
            format!(
                "Great progress today! You completed {completion_percent}% of your tasks. \
                 I notice you're most productive in the {}, so I'll prioritize that time \
                 slot tomorrow.",
                behavior.preferred_slot,
            ),
            CoachKind::Encouragement,
        )
    } else if completion_percent >= 50 {
        (
            format!(
                "You're making steady progress with {completion_percent}% done. I've moved \
                 {moved_count} tasks to tomorrow and adjusted the schedule to reduce pressure.",
            ),
            CoachKind::Feedback,
        )
    } else if completion_percent >= 30 {
        (
            format!(
                "Today was challenging, but that's okay! I've redistributed {moved_count} \
                 tasks across the week and shortened session lengths. Tomorrow's load will \
                 be lighter.",
            ),
            CoachKind::Suggestion,
        )
    } else {
        (
            "Tough day, it happens to everyone. I've significantly reduced tomorrow's \
             workload and added extra breaks. Let's start fresh with smaller, achievable wins."
                .to_string(),
            CoachKind::Suggestion,
        )
    };

    CoachMessage {
        id: new_id("coach"),
        message,
        kind,
        timestamp: clock.now(),
        related_goal_id: goal.map(|g| g.id.clone()),
    }
}
