// Busy-interval conflict detection for candidate task slots

use crate::clock::PlanClock;
use crate::model::{CalendarEvent, WallTime};

/// How far a candidate start advances on each conflict retry.
pub const RETRY_STEP_MINUTES: i32 = 30;

/// Latest acceptable start time. Candidates pushed past this are abandoned
/// rather than scheduled into the night.
pub const LATEST_START: WallTime = WallTime::new(22, 0);

/// Half-open overlap test against the busy intervals on the target day.
///
/// A candidate `[start, start + duration)` conflicts with an event iff the
/// event falls on `clock.date_for_day(day_offset)` and
/// `start < event_end && end > event_start`. Touching endpoints do not
/// conflict. All-day events block 00:00-23:59.
pub fn has_conflict(
    start: WallTime,
    duration_minutes: u32,
    day_offset: i64,
    events: &[CalendarEvent],
    clock: &PlanClock,
) -> bool {
    let target_date = clock.date_for_day(day_offset);
    let end = start.add_minutes(duration_minutes as i32);

    events.iter().any(|event| {
        if event.start.date() != target_date {
            return false;
        }
        let (event_start, event_end) = event.busy_window();
        start < event_end && end > event_start
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventKind, EventSource};
    use chrono::NaiveDate;

    fn event_on(day_offset: i64, start: (u32, u32), end: (u32, u32)) -> CalendarEvent {
        let date = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap() + chrono::Duration::days(day_offset);
        CalendarEvent {
            id: "cal-1".to_string(),
            title: "Study Group Meeting".to_string(),
            start: date.and_hms_opt(start.0, start.1, 0).unwrap(),
            end: date.and_hms_opt(end.0, end.1, 0).unwrap(),
            all_day: false,
            kind: EventKind::Meeting,
            source: EventSource::Google,
        }
    }

    fn clock() -> PlanClock {
        PlanClock::fixed_from_ymd(2026, 8, 26)
    }

    #[test]
    fn test_overlapping_interval_conflicts() {
        let events = vec![event_on(0, (18, 0), (19, 0))];
        assert!(has_conflict(WallTime::new(18, 0), 45, 0, &events, &clock()));
        assert!(has_conflict(WallTime::new(18, 30), 45, 0, &events, &clock()));
    }

    #[test]
    fn test_touching_endpoints_do_not_conflict() {
        let events = vec![event_on(0, (18, 0), (19, 0))];
        // Ends exactly when the event starts.
        assert!(!has_conflict(WallTime::new(17, 15), 45, 0, &events, &clock()));
        // Starts exactly when the event ends.
        assert!(!has_conflict(WallTime::new(19, 0), 45, 0, &events, &clock()));
    }

    #[test]
    fn test_other_day_does_not_conflict() {
        let events = vec![event_on(1, (18, 0), (19, 0))];
        assert!(!has_conflict(WallTime::new(18, 0), 45, 0, &events, &clock()));
        assert!(has_conflict(WallTime::new(18, 0), 45, 1, &events, &clock()));
    }

    #[test]
    fn test_all_day_event_blocks_everything() {
        let mut event = event_on(0, (0, 0), (0, 0));
        event.all_day = true;
        let events = vec![event];
        assert!(has_conflict(WallTime::new(7, 0), 30, 0, &events, &clock()));
        assert!(has_conflict(WallTime::new(21, 0), 60, 0, &events, &clock()));
    }

    #[test]
    fn test_no_events_never_conflicts() {
        assert!(!has_conflict(WallTime::new(18, 0), 45, 0, &[], &clock()));
    }
}
