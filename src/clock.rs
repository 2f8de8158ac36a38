//! Wall-clock times on the plan day.

use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Minutes since midnight of the plan day.
///
/// Arithmetic does not wrap, so an itinerary running past midnight keeps
/// increasing; only the "HH:MM" rendering folds back into 00:00-23:59.
/// Addition saturates at the largest representable minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ClockTime(u32);

impl ClockTime {
    pub const fn hm(hour: u32, minute: u32) -> Self {
        Self(hour * 60 + minute)
    }

    pub const fn minutes(self) -> u32 {
        self.0
    }
}

impl Add<u32> for ClockTime {
    type Output = ClockTime;

    fn add(self, minutes: u32) -> ClockTime {
        ClockTime(self.0.saturating_add(minutes))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let of_day = self.0 % MINUTES_PER_DAY;
        write!(f, "{:02}:{:02}", of_day / 60, of_day % 60)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseClockTimeError(String);

impl fmt::Display for ParseClockTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid clock time '{}', expected HH:MM", self.0)
    }
}

impl std::error::Error for ParseClockTimeError {}

impl FromStr for ClockTime {
    type Err = ParseClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let time = NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map_err(|_| ParseClockTimeError(s.to_string()))?;
        Ok(ClockTime::hm(time.hour(), time.minute()))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
