// Behavior analysis: completion statistics, skip-pattern classification,
// streak counting, and the insight report built from them.
//
// Everything here is derived fresh on each invocation; no snapshot state
// survives between calls.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::clock::PlanClock;
use crate::model::{new_id, FitnessSample, Task, TaskDifficulty, TaskStatus};

/// Hour below which a completion counts as "morning".
const MORNING_END_HOUR: u8 = 12;
/// Hour below which a completion counts as "afternoon".
const AFTERNOON_END_HOUR: u8 = 17;
/// Start hour at or after which a skipped task counts as late-night.
const LATE_NIGHT_HOUR: u8 = 21;
/// Assumed session length when no completions exist yet.
const DEFAULT_AVG_MINUTES: u32 = 40;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSlot::Morning => write!(f, "morning"),
            TimeSlot::Afternoon => write!(f, "afternoon"),
            TimeSlot::Evening => write!(f, "evening"),
        }
    }
}

/// Why the user tends to abandon tasks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipPattern {
    None,
    Difficulty,
    LateNight,
    Random,
}

/// Aggregate statistics over the current cycle plus carried history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorSnapshot {
    pub avg_completion_minutes: u32,
    pub preferred_slot: TimeSlot,
    pub skip_pattern: SkipPattern,
    pub streak_days: u32,
}

impl BehaviorSnapshot {
    pub fn from_tasks(tasks: &[Task], clock: &PlanClock) -> Self {
        let done: Vec<&Task> = tasks.iter().filter(|t| t.is_done()).collect();

        let avg_completion_minutes = if done.is_empty() {
            DEFAULT_AVG_MINUTES
        } else {
            let total: u32 = done.iter().map(|t| t.spent_minutes()).sum();
            (total as f64 / done.len() as f64).round() as u32
        };

        BehaviorSnapshot {
            avg_completion_minutes,
            preferred_slot: preferred_slot(&done),
            skip_pattern: classify_skips(tasks),
            streak_days: streak_days(tasks, clock.today()),
        }
    }
}

fn slot_for_hour(hour: u8) -> TimeSlot {
    if hour < MORNING_END_HOUR {
        TimeSlot::Morning
    } else if hour < AFTERNOON_END_HOUR {
        TimeSlot::Afternoon
    } else {
        TimeSlot::Evening
    }
}

/// Bucket with the strictly highest completion count; evening on ties or
/// when nothing is done yet.
fn preferred_slot(done: &[&Task]) -> TimeSlot {
    let mut morning = 0usize;
    let mut afternoon = 0usize;
    let mut evening = 0usize;
    for task in done {
        match slot_for_hour(task.start_time.hour()) {
            TimeSlot::Morning => morning += 1,
            TimeSlot::Afternoon => afternoon += 1,
            TimeSlot::Evening => evening += 1,
        }
    }
    let max = morning.max(afternoon).max(evening);
    if max == 0 {
        TimeSlot::Evening
    } else if morning == max && afternoon < max && evening < max {
        TimeSlot::Morning
    } else if afternoon == max && morning < max && evening < max {
        TimeSlot::Afternoon
    } else {
        TimeSlot::Evening
    }
}

/// Priority-ordered classifier: difficulty-skew is checked before
/// lateness-skew, which makes check order the de facto tie-break.
fn classify_skips(tasks: &[Task]) -> SkipPattern {
    let skipped: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Skipped)
        .collect();
    if skipped.is_empty() {
        return SkipPattern::None;
    }
    let hard = skipped
        .iter()
        .filter(|t| t.difficulty == TaskDifficulty::Hard)
        .count();
    let late = skipped
        .iter()
        .filter(|t| t.start_time.hour() >= LATE_NIGHT_HOUR)
        .count();
    if hard * 2 > skipped.len() {
        SkipPattern::Difficulty
    } else if late * 2 > skipped.len() {
        SkipPattern::LateNight
    } else {
        SkipPattern::Random
    }
}

/// Consecutive days with at least one completed task, walked back from
/// today. A day still in progress doesn't break the streak: when today has
/// no completions yet, the walk starts at yesterday.
fn streak_days(tasks: &[Task], today: NaiveDate) -> u32 {
    let completion_dates: HashSet<NaiveDate> = tasks
        .iter()
        .filter_map(|t| t.completed_at.map(|at| at.date_naive()))
        .collect();

    let mut day = today;
    if !completion_dates.contains(&day) {
        day -= Duration::days(1);
    }
    let mut streak = 0u32;
    while completion_dates.contains(&day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

// ---------------------------------------------------------------------------
// Insight report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    ProductivityPeak,
    CompletionRate,
    SkipPattern,
    Streak,
}

/// A detected behavior pattern with a derived confidence share.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorPattern {
    pub id: String,
    pub kind: PatternKind,
    pub title: String,
    pub description: String,
    /// 0.0–1.0, always a derived share of observations, never a guess.
    pub confidence: f64,
    pub data_points: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Low,
    Tired,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    High,
    Medium,
    Low,
}

/// One day's rollup for the insights panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyInsight {
    pub date: NaiveDate,
    pub tasks_completed: usize,
    pub tasks_total: usize,
    pub completion_rate: u32,
    pub focus_minutes: u32,
    pub streak_days: u32,
    pub mood: Mood,
    pub energy_level: EnergyLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorReport {
    pub snapshot: BehaviorSnapshot,
    pub patterns: Vec<BehaviorPattern>,
    pub insight: DailyInsight,
    pub recommendations: Vec<String>,
}

/// Full behavior analysis over the task list and (optionally) today's
/// fitness sample.
pub fn analyze_behavior(
    tasks: &[Task],
    fitness: Option<&FitnessSample>,
    clock: &PlanClock,
) -> BehaviorReport {
    let snapshot = BehaviorSnapshot::from_tasks(tasks, clock);
    let done: Vec<&Task> = tasks.iter().filter(|t| t.is_done()).collect();

    let day0: Vec<&Task> = tasks.iter().filter(|t| t.day_index == 0).collect();
    let completed_today = day0.iter().filter(|t| t.is_done()).count();
    let completion_rate = if day0.is_empty() {
        0
    } else {
        ((completed_today as f64 / day0.len() as f64) * 100.0).round() as u32
    };
    let focus_minutes: u32 = day0
        .iter()
        .filter(|t| t.is_done())
        .map(|t| t.spent_minutes())
        .sum();

    let mut patterns = Vec::new();

    if !done.is_empty() {
        let in_slot = done
            .iter()
            .filter(|t| slot_for_hour(t.start_time.hour()) == snapshot.preferred_slot)
            .count();
        patterns.push(BehaviorPattern {
            id: new_id("pattern"),
            kind: PatternKind::ProductivityPeak,
            title: "Productivity Peak".to_string(),
            description: format!(
                "Most sessions get finished in the {}.",
                snapshot.preferred_slot
            ),
            confidence: in_slot as f64 / done.len() as f64,
            data_points: done.len(),
        });
    }

    if !day0.is_empty() {
        patterns.push(BehaviorPattern {
            id: new_id("pattern"),
            kind: PatternKind::CompletionRate,
            title: "Completion Rate".to_string(),
            description: format!(
                "{completed_today} of {} tasks completed today ({completion_rate}%).",
                day0.len()
            ),
            confidence: (day0.len() as f64 / 10.0).min(1.0),
            data_points: day0.len(),
        });
    }

    let skipped = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Skipped)
        .count();
    if snapshot.skip_pattern != SkipPattern::None {
        let (description, confidence) = match snapshot.skip_pattern {
            SkipPattern::Difficulty => {
                let hard = tasks
                    .iter()
                    .filter(|t| {
                        t.status == TaskStatus::Skipped && t.difficulty == TaskDifficulty::Hard
                    })
                    .count();
                (
                    "Hard tasks get skipped more often than others.".to_string(),
                    hard as f64 / skipped as f64,
                )
            }
            SkipPattern::LateNight => {
                let late = tasks
                    .iter()
                    .filter(|t| {
                        t.status == TaskStatus::Skipped
                            && t.start_time.hour() >= LATE_NIGHT_HOUR
                    })
                    .count();
                (
                    "Tasks starting after 21:00 tend to get skipped.".to_string(),
                    late as f64 / skipped as f64,
                )
            }
            _ => ("Skips don't follow a clear pattern yet.".to_string(), 0.5),
        };
        patterns.push(BehaviorPattern {
            id: new_id("pattern"),
            kind: PatternKind::SkipPattern,
            title: "Skip Pattern".to_string(),
            description,
            confidence,
            data_points: skipped,
        });
    }

    if snapshot.streak_days >= 2 {
        patterns.push(BehaviorPattern {
            id: new_id("pattern"),
            kind: PatternKind::Streak,
            title: "Active Streak".to_string(),
            description: format!(
                "{} consecutive days with at least one completed task.",
                snapshot.streak_days
            ),
            confidence: (snapshot.streak_days as f64 / 7.0).min(1.0),
            data_points: snapshot.streak_days as usize,
        });
    }

    let insight = DailyInsight {
        date: clock.today(),
        tasks_completed: completed_today,
        tasks_total: day0.len(),
        completion_rate,
        focus_minutes,
        streak_days: snapshot.streak_days,
        mood: mood_for_rate(completion_rate),
        energy_level: energy_level(completion_rate, fitness),
    };

    let recommendations = recommendations(&snapshot, completion_rate, fitness);

    BehaviorReport {
        snapshot,
        patterns,
        insight,
        recommendations,
    }
}

fn mood_for_rate(completion_rate: u32) -> Mood {
    match completion_rate {
        80.. => Mood::Great,
        60..=79 => Mood::Good,
        40..=59 => Mood::Okay,
        20..=39 => Mood::Low,
        _ => Mood::Tired,
    }
}

fn energy_level(completion_rate: u32, fitness: Option<&FitnessSample>) -> EnergyLevel {
    if let Some(sample) = fitness {
        if sample.steps >= sample.steps_goal {
            EnergyLevel::High
        } else if sample.steps * 2 >= sample.steps_goal {
            EnergyLevel::Medium
        } else {
            EnergyLevel::Low
        }
    } else if completion_rate >= 70 {
        EnergyLevel::High
    } else if completion_rate >= 40 {
        EnergyLevel::Medium
    } else {
        EnergyLevel::Low
    }
}

fn recommendations(
    snapshot: &BehaviorSnapshot,
    completion_rate: u32,
    fitness: Option<&FitnessSample>,
) -> Vec<String> {
    let mut recs = Vec::new();
    match snapshot.skip_pattern {
        SkipPattern::Difficulty => recs.push(
            "Start tomorrow with the easiest session to build momentum before harder material."
                .to_string(),
        ),
        SkipPattern::LateNight => recs.push(
            "Move sessions that start after 21:00 into your focus window.".to_string(),
        ),
        _ => {}
    }
    if completion_rate < 50 {
        recs.push(format!(
            "Try shorter sessions: around {} minutes matches what you actually finish.",
            snapshot.avg_completion_minutes
        ));
    }
    if let Some(sample) = fitness {
        if sample.steps < sample.steps_goal {
            recs.push(format!(
                "You're {} steps short of today's goal. A short walk would close the gap.",
                sample.steps_goal - sample.steps
            ));
        }
    }
    if snapshot.streak_days >= 3 {
        recs.push(format!(
            "Your {}-day streak is worth protecting. Keep at least one easy win per day.",
            snapshot.streak_days
        ));
    }
    if recs.is_empty() {
        recs.push("Complete a few more tasks and patterns will show up here.".to_string());
    }
    recs
}
