use crate::time::TimeOfDay;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest id a stored slot may carry. Matches SQLite's signed 64-bit keys
/// and leaves the id counter room to keep counting.
pub const MAX_SLOT_ID: u64 = i64::MAX as u64;

/// Opaque slot identifier, unique across the whole week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(u64);

impl SlotId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SlotId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(SlotId)
    }
}

/// A closed-open interval `[start, end)` inside one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: SlotId,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeSlot {
    pub(crate) fn new(id: SlotId, start: TimeOfDay, end: TimeOfDay) -> Self {
        debug_assert!(start < end, "slot start must precede end");
        Self { id, start, end }
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }

    /// True when `[start, end)` intersects this slot. Touching endpoints do not overlap.
    pub fn overlaps(&self, start: TimeOfDay, end: TimeOfDay) -> bool {
        start < self.end && self.start < end
    }

    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.start <= time && time < self.end
    }
}
