// Wall-clock time values ("HH:MM", 24-hour)

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// Errors from parsing an "HH:MM" string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("expected HH:MM, got {0:?}")]
    Malformed(String),
    #[error("hour out of range in {0:?}")]
    HourOutOfRange(String),
    #[error("minute out of range in {0:?}")]
    MinuteOutOfRange(String),
}

/// A time of day stored as minutes since midnight, always in `0..1440`.
///
/// Ordering by minute value is equivalent to lexicographic ordering of the
/// well-formed "HH:MM" strings it renders to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WallTime(u16);

impl WallTime {
    /// Build from hour/minute literals. Panics on out-of-range components,
    /// so only use with constants; parse runtime input via `FromStr`.
    pub const fn new(hour: u8, minute: u8) -> Self {
        assert!(hour < 24 && minute < 60);
        WallTime(hour as u16 * 60 + minute as u16)
    }

    pub fn hour(&self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(&self) -> u8 {
        (self.0 % 60) as u8
    }

    pub fn minutes_from_midnight(&self) -> u16 {
        self.0
    }

    /// Add (or subtract) minutes with 24-hour wrap-around. Time-of-day only:
    /// no day-rollover tracking.
    pub fn add_minutes(self, delta: i32) -> Self {
        let total = (self.0 as i32 + delta).rem_euclid(MINUTES_PER_DAY);
        WallTime(total as u16)
    }
}

impl From<chrono::NaiveTime> for WallTime {
    fn from(t: chrono::NaiveTime) -> Self {
        use chrono::Timelike;
        WallTime((t.hour() * 60 + t.minute()) as u16)
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for WallTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| TimeParseError::Malformed(s.to_string()))?;
        let hour: u8 = h
            .parse()
            .map_err(|_| TimeParseError::Malformed(s.to_string()))?;
        let minute: u8 = m
            .parse()
            .map_err(|_| TimeParseError::Malformed(s.to_string()))?;
        if hour >= 24 {
            return Err(TimeParseError::HourOutOfRange(s.to_string()));
        }
        if minute >= 60 {
            return Err(TimeParseError::MinuteOutOfRange(s.to_string()));
        }
        Ok(WallTime::new(hour, minute))
    }
}

impl Serialize for WallTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WallTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_roundtrip() {
        let t: WallTime = "18:05".parse().unwrap();
        assert_eq!(t.hour(), 18);
        assert_eq!(t.minute(), 5);
        assert_eq!(t.to_string(), "18:05");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            "1805".parse::<WallTime>(),
            Err(TimeParseError::Malformed(_))
        ));
        assert!(matches!(
            "ab:cd".parse::<WallTime>(),
            Err(TimeParseError::Malformed(_))
        ));
        assert!(matches!(
            "24:00".parse::<WallTime>(),
            Err(TimeParseError::HourOutOfRange(_))
        ));
        assert!(matches!(
            "10:60".parse::<WallTime>(),
            Err(TimeParseError::MinuteOutOfRange(_))
        ));
    }

    #[test]
    fn test_add_minutes_wraps_hour_boundary() {
        let t = WallTime::new(18, 45);
        assert_eq!(t.add_minutes(30).to_string(), "19:15");
    }

    #[test]
    fn test_add_minutes_wraps_midnight() {
        let t = WallTime::new(23, 30);
        assert_eq!(t.add_minutes(45).to_string(), "00:15");
    }

    #[test]
    fn test_add_minutes_negative_and_zero() {
        let t = WallTime::new(0, 10);
        assert_eq!(t.add_minutes(-30).to_string(), "23:40");
        assert_eq!(t.add_minutes(0), t);
    }

    #[test]
    fn test_ordering_matches_lexicographic() {
        let a = WallTime::new(9, 30);
        let b = WallTime::new(22, 0);
        let c = WallTime::new(22, 15);
        assert!(a < b);
        assert!(b < c);
        assert!(c > WallTime::new(22, 0)); // "22:15" > "22:00"
    }

    #[test]
    fn test_serde_as_string() {
        let t = WallTime::new(7, 0);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"07:00\"");
        let back: WallTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
