use crate::config::AvailabilityConfig;
use crate::day::DaySchedule;
use crate::slot::{SlotId, TimeSlot};
use crate::time::TimeOfDay;
use crate::week::WeekSchedule;
use crate::weekday::Weekday;
use std::fmt;
use tracing::debug;

/// User-correctable rejection of an `add_slot` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    MissingTime,
    InvalidRange {
        start: TimeOfDay,
        end: TimeOfDay,
    },
    Overlap {
        start: TimeOfDay,
        end: TimeOfDay,
        existing: TimeSlot,
    },
}

impl SchedulingError {
    /// Short heading for a user notification.
    pub fn title(&self) -> &'static str {
        match self {
            SchedulingError::MissingTime => "Missing time",
            SchedulingError::InvalidRange { .. } => "Invalid time range",
            SchedulingError::Overlap { .. } => "Time slot overlap",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            SchedulingError::MissingTime => "missing_time",
            SchedulingError::InvalidRange { .. } => "invalid_range",
            SchedulingError::Overlap { .. } => "overlap",
        }
    }
}

impl fmt::Display for SchedulingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulingError::MissingTime => write!(f, "Please select both start and end time"),
            SchedulingError::InvalidRange { start, end } => write!(
                f,
                "End time must be after start time (got {start} - {end})"
            ),
            SchedulingError::Overlap {
                start,
                end,
                existing,
            } => write!(
                f,
                "This time slot overlaps with an existing one ({start} - {end} intersects {} - {})",
                existing.start, existing.end
            ),
        }
    }
}

impl std::error::Error for SchedulingError {}

/// Editing session over one doctor's weekly availability.
#[derive(Debug, Clone)]
pub struct WeeklyAvailabilityScheduler {
    week: WeekSchedule,
    next_slot_id: u64,
}

impl Default for WeeklyAvailabilityScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl WeeklyAvailabilityScheduler {
    pub fn new() -> Self {
        Self::from_snapshot(WeekSchedule::default())
    }

    pub fn with_config(config: &AvailabilityConfig) -> Self {
        Self::from_snapshot(WeekSchedule::with_available_days(
            config.available_days.iter().copied(),
        ))
    }

    /// Resumes a session; new ids continue after the largest stored one.
    pub fn from_snapshot(week: WeekSchedule) -> Self {
        let next_slot_id = week.max_slot_id().map_or(1, |id| id.value() + 1);
        Self { week, next_slot_id }
    }

    pub fn week(&self) -> &WeekSchedule {
        &self.week
    }

    /// Owned copy of the current week for handing to a store.
    pub fn snapshot(&self) -> WeekSchedule {
        self.week.clone()
    }

    pub fn day(&self, day: Weekday) -> &DaySchedule {
        self.week.day(day)
    }

    pub fn is_available(&self, day: Weekday) -> bool {
        self.week.day(day).is_available()
    }

    pub fn slots(&self, day: Weekday) -> &[TimeSlot] {
        self.week.day(day).slots()
    }

    /// Turning a day off discards its slots; turning it back on starts empty.
    pub fn set_day_availability(&mut self, day: Weekday, available: bool) {
        let dropped = self.week.day_mut(day).set_available(available);
        debug!(%day, available, dropped, "day availability set");
    }

    /// Adds a slot to an available day.
    ///
    /// Checks run in order: both times present, `start < end`, the day is
    /// available, no overlap with an existing slot. Calling this for an
    /// unavailable day is a caller bug and panics.
    pub fn add_slot(
        &mut self,
        day: Weekday,
        start: impl Into<Option<TimeOfDay>>,
        end: impl Into<Option<TimeOfDay>>,
    ) -> Result<TimeSlot, SchedulingError> {
        let (Some(start), Some(end)) = (start.into(), end.into()) else {
            return Err(SchedulingError::MissingTime);
        };
        if start >= end {
            return Err(SchedulingError::InvalidRange { start, end });
        }

        let schedule = self.week.day_mut(day);
        assert!(
            schedule.is_available(),
            "add_slot called for {day}, which is unavailable"
        );
        if let Some(existing) = schedule.find_overlap(start, end) {
            return Err(SchedulingError::Overlap {
                start,
                end,
                existing: existing.clone(),
            });
        }

        let slot = TimeSlot::new(SlotId::new(self.next_slot_id), start, end);
        self.next_slot_id += 1;
        schedule.insert_checked(slot.clone());
        debug!(%day, id = %slot.id, %start, %end, "slot added");
        Ok(slot)
    }

    /// Removes a slot by id. Unknown ids are ignored.
    pub fn remove_slot(&mut self, day: Weekday, slot_id: SlotId) -> Option<TimeSlot> {
        let removed = self.week.day_mut(day).remove(slot_id);
        if removed.is_some() {
            debug!(%day, id = %slot_id, "slot removed");
        }
        removed
    }
}
