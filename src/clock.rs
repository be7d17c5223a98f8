// Injected time source
//
// The engine never reads the system clock directly; every planning and
// replanning call receives a PlanClock so repeated runs against identical
// input are deterministic under test.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};

#[derive(Debug, Clone, Copy)]
pub struct PlanClock {
    today: NaiveDate,
    now: DateTime<Utc>,
}

impl PlanClock {
    /// Real clock: "today" is the local calendar date.
    pub fn system() -> Self {
        PlanClock {
            today: Local::now().date_naive(),
            now: Utc::now(),
        }
    }

    pub fn fixed(today: NaiveDate, now: DateTime<Utc>) -> Self {
        PlanClock { today, now }
    }

    /// Fixed calendar date with the real wall clock. Backs the `--today`
    /// flag so a past cycle can be replayed.
    pub fn anchored(today: NaiveDate) -> Self {
        PlanClock {
            today,
            now: Utc::now(),
        }
    }

    /// Fixed clock anchored at midnight UTC of the given date. Test helper,
    /// but also useful for replaying a past cycle.
    pub fn fixed_from_ymd(year: i32, month: u32, day: u32) -> Self {
        let today = NaiveDate::from_ymd_opt(year, month, day)
            .unwrap_or_else(|| panic!("invalid date {year}-{month:02}-{day:02}"));
        let now = Utc
            .from_utc_datetime(&today.and_hms_opt(0, 0, 0).expect("midnight is valid"));
        PlanClock { today, now }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Calendar date `offset` days from today. Stamps `scheduled_date`.
    pub fn date_for_day(&self, offset: i64) -> NaiveDate {
        self.today + Duration::days(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_for_day_offsets() {
        let clock = PlanClock::fixed_from_ymd(2026, 8, 26);
        assert_eq!(clock.date_for_day(0).to_string(), "2026-08-26");
        assert_eq!(clock.date_for_day(6).to_string(), "2026-09-01");
        assert_eq!(clock.date_for_day(-1).to_string(), "2026-08-25");
    }

    #[test]
    fn test_fixed_clock_is_stable() {
        let clock = PlanClock::fixed_from_ymd(2026, 1, 1);
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.today(), clock.date_for_day(0));
    }
}
