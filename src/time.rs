use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};

/// Instant in integer time units (seconds since the start of the scenario).
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, Hash, Serialize, Deserialize, PartialOrd)]
#[serde(transparent)]
pub struct Time(pub i64);

impl Time {
    pub const SECONDS_PER_DAY: i64 = 86_400;

    pub fn day(&self) -> i64 {
        self.0.div_euclid(Self::SECONDS_PER_DAY)
    }

    pub fn hour_of_day(&self) -> i64 {
        self.0.rem_euclid(Self::SECONDS_PER_DAY) / 3600
    }

    /// Index of the slot of length `duration` containing this instant.
    pub fn slot(&self, duration: i64) -> SlotId {
        SlotId(self.0.div_euclid(duration))
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let remaining = self.0.rem_euclid(Self::SECONDS_PER_DAY);
        let hours = remaining / 3600;
        let mins = (remaining % 3600) / 60;
        let secs = remaining % 60;
        write!(f, "DAY{} {:02}:{:02}:{:02}", self.day() + 1, hours, mins, secs)
    }
}

impl Add<i64> for Time {
    type Output = Self;

    fn add(self, rhs: i64) -> Self::Output {
        Time(self.0 + rhs)
    }
}

impl Sub<Time> for Time {
    type Output = i64;

    fn sub(self, rhs: Time) -> Self::Output {
        self.0 - rhs.0
    }
}

impl AddAssign<i64> for Time {
    fn add_assign(&mut self, rhs: i64) {
        self.0 += rhs;
    }
}

/// Identifier of a discrete time slot.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, Hash, Serialize, Deserialize, PartialOrd)]
#[serde(transparent)]
pub struct SlotId(pub i64);

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl Add<i64> for SlotId {
    type Output = Self;

    fn add(self, rhs: i64) -> Self::Output {
        SlotId(self.0 + rhs)
    }
}

impl Sub<SlotId> for SlotId {
    type Output = i64;

    fn sub(self, rhs: SlotId) -> Self::Output {
        self.0 - rhs.0
    }
}

impl AddAssign<i64> for SlotId {
    fn add_assign(&mut self, rhs: i64) {
        self.0 += rhs;
    }
}
