// Adjustment policy engine
//
// Suggestion is pure and additive: rules read the completion rate and the
// behavior snapshot and emit typed micro-adjustments without touching any
// task. The corresponding task mutation happens only in `apply_adjustment`,
// against the live list at apply time.

use crate::behavior::{BehaviorSnapshot, SkipPattern, TimeSlot};
use crate::clock::PlanClock;
use crate::model::{AdjustmentKind, Impact, MicroAdjustment, Task, WallTime};

/// Completion rate below which session-shortening suggestions fire.
const LOW_COMPLETION_PERCENT: u32 = 50;
/// Completion rate at which the motivational nudge fires.
const HIGH_COMPLETION_PERCENT: u32 = 80;
/// Start hour at or after which a task counts as late for rescheduling.
const LATE_HOUR: u8 = 21;
/// Anchor for reordered or retimed evening sessions.
const EVENING_ANCHOR: WallTime = WallTime::new(18, 0);
/// Gap inserted between reordered sessions, in minutes.
const REORDER_GAP_MINUTES: u32 = 10;

/// Derive micro-adjustments from today's completion rate and the behavior
/// snapshot. Never mutates `tasks`; they are read only for the counts that
/// go into suggestion text.
pub fn suggest_adjustments(
    tasks: &[Task],
    completion_percent: u32,
    behavior: &BehaviorSnapshot,
    clock: &PlanClock,
) -> Vec<MicroAdjustment> {
    let now = clock.now();
    let mut adjustments = Vec::new();

    if completion_percent < LOW_COMPLETION_PERCENT {
        adjustments.push(MicroAdjustment::suggest(
            AdjustmentKind::ShortenSession,
            "Shorter Focus Sessions",
            "Reducing future session lengths by 25% for easier completion",
            format!(
                "Only {completion_percent}% of today's tasks were completed. \
                 Shorter sessions may help build momentum."
            ),
            Impact::High,
            now,
        ));
        adjustments.push(MicroAdjustment::suggest(
            AdjustmentKind::AddBreak,
            "Extra Recovery Break",
            "Adding a 15-minute break after each task",
            "Preventing burnout by adding more recovery time between tasks.",
            Impact::Medium,
            now,
        ));
    }

    if behavior.skip_pattern == SkipPattern::Difficulty {
        adjustments.push(MicroAdjustment::suggest(
            AdjustmentKind::ReduceDifficulty,
            "Easier Tasks First",
            "Reordering tomorrow's tasks to start with easier ones",
            "You tend to skip harder tasks. Starting easy builds momentum.",
            Impact::Medium,
            now,
        ));
    }

    if behavior.skip_pattern == SkipPattern::LateNight {
        let late_count = tasks
            .iter()
            .filter(|t| t.day_index > 0 && t.start_time.hour() >= LATE_HOUR)
            .count();
        adjustments.push(MicroAdjustment::suggest(
            AdjustmentKind::Reschedule,
            "Earlier Schedule",
            format!("Moving {late_count} late tasks to earlier time slots"),
            format!(
                "Tasks after 9 PM get skipped often. Shifting to your productive {} hours.",
                preferred_hours_label(behavior.preferred_slot)
            ),
            Impact::High,
            now,
        ));
    }

    if completion_percent >= HIGH_COMPLETION_PERCENT {
        adjustments.push(MicroAdjustment::suggest(
            AdjustmentKind::Motivational,
            "Challenge Mode Unlocked",
            "You're crushing it! Want to add a bonus task for extra progress?",
            format!("{completion_percent}% completion! Your consistency is paying off."),
            Impact::Low,
            now,
        ));
    }

    adjustments
}

fn preferred_hours_label(slot: TimeSlot) -> &'static str {
    match slot {
        TimeSlot::Morning => "morning",
        TimeSlot::Afternoon => "afternoon",
        TimeSlot::Evening => "evening",
    }
}

/// Perform the task mutation an adjustment of the given kind stands for,
/// against the current live task list.
pub fn apply_adjustment(kind: AdjustmentKind, tasks: &mut Vec<Task>) {
    match kind {
        AdjustmentKind::ShortenSession => {
            for task in tasks.iter_mut() {
                if task.day_index > 0 {
                    task.estimated_minutes = task.estimated_minutes * 3 / 4;
                    task.refresh_end_time();
                }
            }
        }
        AdjustmentKind::ReduceDifficulty => reorder_tomorrow(tasks),
        AdjustmentKind::Reschedule => {
            for task in tasks.iter_mut() {
                if task.day_index > 0 && task.start_time.hour() >= LATE_HOUR {
                    task.start_time = EVENING_ANCHOR;
                    task.refresh_end_time();
                }
            }
        }
        // Break insertion is a display concern; motivational and swap
        // suggestions carry no task mutation.
        AdjustmentKind::AddBreak | AdjustmentKind::Motivational | AdjustmentKind::SwapTask => {}
    }
}

/// Stable-sort tomorrow's tasks ascending by difficulty and reassign
/// sequential start times from the evening anchor.
fn reorder_tomorrow(tasks: &mut Vec<Task>) {
    let (mut tomorrow, others): (Vec<Task>, Vec<Task>) =
        tasks.drain(..).partition(|t| t.day_index == 1);
    tomorrow.sort_by_key(|t| t.difficulty.rank());

    let mut cursor = EVENING_ANCHOR;
    for task in &mut tomorrow {
        task.start_time = cursor;
        task.refresh_end_time();
        cursor = cursor.add_minutes((task.estimated_minutes + REORDER_GAP_MINUTES) as i32);
    }

    *tasks = others;
    tasks.extend(tomorrow);
}
