//! Time-of-day values used throughout the schedule.
//!
//! Times are whole minutes from midnight. A day that overruns midnight keeps
//! counting past 24:00 rather than wrapping, so event ordering within a day is
//! always a plain integer comparison.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TimeParseError;

const MINUTES_PER_HOUR: i32 = 60;

/// Minutes since midnight, displayed as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeOfDay(i32);

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self(0);

    pub const fn from_hm(hour: i32, minute: i32) -> Self {
        Self(hour * MINUTES_PER_HOUR + minute)
    }

    pub const fn from_minutes(minutes: i32) -> Self {
        Self(minutes)
    }

    /// Minutes since midnight.
    pub const fn minutes(self) -> i32 {
        self.0
    }

    pub const fn hour(self) -> i32 {
        self.0.div_euclid(MINUTES_PER_HOUR)
    }

    pub const fn minute(self) -> i32 {
        self.0.rem_euclid(MINUTES_PER_HOUR)
    }

    /// Saturates instead of overflowing on absurd durations.
    pub const fn add_minutes(self, minutes: i32) -> Self {
        Self(self.0.saturating_add(minutes))
    }

    /// Signed number of minutes from `self` until `later`.
    pub const fn minutes_until(self, later: Self) -> i32 {
        later.0.saturating_sub(self.0)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl TimeOfDay {
    /// Parses a schedule time, where hours past 23 mean the day ran over
    /// midnight.
    ///
    /// This is the inverse of `Display`. Catalog times go through the strict
    /// `FromStr` instead.
    pub fn parse_elapsed(raw: &str) -> Result<Self, TimeParseError> {
        let (hour, minute) = split_hm(raw)?;
        if hour < 0 || !(0..60).contains(&minute) {
            return Err(TimeParseError::OutOfRange { hour, minute });
        }
        Ok(Self::from_hm(hour, minute))
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    /// Parses a clock time `HH:MM` with hours 0-23, also accepting a trailing
    /// `:SS` which is ignored.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = split_hm(raw)?;
        if !(0..24).contains(&hour) || !(0..60).contains(&minute) {
            return Err(TimeParseError::OutOfRange { hour, minute });
        }
        Ok(Self::from_hm(hour, minute))
    }
}

fn split_hm(raw: &str) -> Result<(i32, i32), TimeParseError> {
    let invalid = || TimeParseError::Malformed(raw.to_string());

    let mut parts = raw.trim().split(':');
    let hour = parts.next().ok_or_else(invalid)?;
    let minute = parts.next().ok_or_else(invalid)?;
    if let Some(seconds) = parts.next() {
        seconds.parse::<u8>().map_err(|_| invalid())?;
    }
    if parts.next().is_some() {
        return Err(invalid());
    }

    let hour = hour.parse().map_err(|_| invalid())?;
    let minute = minute.parse().map_err(|_| invalid())?;
    Ok((hour, minute))
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_elapsed(&raw).map_err(serde::de::Error::custom)
    }
}

/// An inclusive time-of-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeWindow {
    pub const fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.start <= time && time <= self.end
    }

    pub const fn duration_minutes(&self) -> i32 {
        self.start.minutes_until(self.end)
    }

    /// Minutes of `[from, to)` that fall inside this window.
    pub fn overlap_minutes(&self, from: TimeOfDay, to: TimeOfDay) -> i32 {
        let start = from.max(self.start);
        let end = to.min(self.end);
        start.minutes_until(end).max(0)
    }
}
