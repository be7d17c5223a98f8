// Scheduled tasks, busy calendar intervals, and fitness samples

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::WallTime;

/// Task lifecycle. `Rescheduled` is non-terminal: the task re-enters the
/// pool at a new day/time, distinct from `Pending` to signal it was moved
/// by the replanner rather than the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
    Skipped,
    Rescheduled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskDifficulty {
    Easy,
    Medium,
    Hard,
}

impl TaskDifficulty {
    /// Sort rank: easy < medium < hard.
    pub fn rank(&self) -> u8 {
        match self {
            TaskDifficulty::Easy => 0,
            TaskDifficulty::Medium => 1,
            TaskDifficulty::Hard => 2,
        }
    }
}

/// One schedulable unit of work derived from a goal.
///
/// Rescheduling mutates `day_index`/`scheduled_date` in place; identity is
/// preserved across replans.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub goal_id: String,
    pub title: String,
    pub description: String,
    /// 0–6 offset from "today".
    pub day_index: u8,
    /// Consistent with `day_index` at all times.
    pub scheduled_date: NaiveDate,
    pub estimated_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_minutes: Option<u32>,
    pub start_time: WallTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<WallTime>,
    pub status: TaskStatus,
    pub difficulty: TaskDifficulty,
    /// Set iff `status == Done`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Minutes actually spent, falling back to the estimate.
    pub fn spent_minutes(&self) -> u32 {
        self.actual_minutes.unwrap_or(self.estimated_minutes)
    }

    /// Recompute the scheduled end from the current start and estimate.
    /// Must be called after any retiming or duration change.
    pub fn refresh_end_time(&mut self) {
        self.end_time = Some(self.start_time.add_minutes(self.estimated_minutes as i32));
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Deadline,
    Meeting,
    Reminder,
    Blocked,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    Google,
    Outlook,
    Manual,
}

/// An externally-sourced busy interval the scheduler must avoid.
/// Read-only input; never mutated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Events whose source carried no time component block the whole day.
    #[serde(default)]
    pub all_day: bool,
    pub kind: EventKind,
    pub source: EventSource,
}

impl CalendarEvent {
    /// Busy window on the event's own date. All-day events span 00:00–23:59.
    pub fn busy_window(&self) -> (WallTime, WallTime) {
        if self.all_day {
            (WallTime::new(0, 0), WallTime::new(23, 59))
        } else {
            (WallTime::from(self.start.time()), WallTime::from(self.end.time()))
        }
    }
}

/// Daily sample from an external fitness provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessSample {
    pub date: NaiveDate,
    pub steps: u32,
    pub steps_goal: u32,
    pub active_minutes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let back: TaskStatus = serde_json::from_str("\"rescheduled\"").unwrap();
        assert_eq!(back, TaskStatus::Rescheduled);
    }

    #[test]
    fn test_difficulty_rank_ordering() {
        assert!(TaskDifficulty::Easy.rank() < TaskDifficulty::Medium.rank());
        assert!(TaskDifficulty::Medium.rank() < TaskDifficulty::Hard.rank());
    }

    #[test]
    fn test_busy_window_timed_event() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        let event = CalendarEvent {
            id: "cal-1".to_string(),
            title: "Study Group Meeting".to_string(),
            start: date.and_hms_opt(18, 0, 0).unwrap(),
            end: date.and_hms_opt(19, 0, 0).unwrap(),
            all_day: false,
            kind: EventKind::Meeting,
            source: EventSource::Google,
        };
        let (start, end) = event.busy_window();
        assert_eq!(start.to_string(), "18:00");
        assert_eq!(end.to_string(), "19:00");
    }

    #[test]
    fn test_busy_window_all_day_event() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        let event = CalendarEvent {
            id: "cal-2".to_string(),
            title: "ML Assignment Due".to_string(),
            start: date.and_hms_opt(0, 0, 0).unwrap(),
            end: date.and_hms_opt(0, 0, 0).unwrap(),
            all_day: true,
            kind: EventKind::Deadline,
            source: EventSource::Google,
        };
        let (start, end) = event.busy_window();
        assert_eq!(start.to_string(), "00:00");
        assert_eq!(end.to_string(), "23:59");
    }

    #[test]
    fn test_spent_minutes_falls_back_to_estimate() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        let mut task = Task {
            id: "task-1".to_string(),
            goal_id: "goal-1".to_string(),
            title: "Unit 1: Introduction to ML".to_string(),
            description: String::new(),
            day_index: 0,
            scheduled_date: date,
            estimated_minutes: 45,
            actual_minutes: None,
            start_time: WallTime::new(18, 0),
            end_time: None,
            status: TaskStatus::Pending,
            difficulty: TaskDifficulty::Easy,
            completed_at: None,
            notes: None,
        };
        assert_eq!(task.spent_minutes(), 45);
        task.actual_minutes = Some(50);
        assert_eq!(task.spent_minutes(), 50);
    }
}
