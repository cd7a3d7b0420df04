use crate::day::DaySchedule;
use crate::slot::MAX_SLOT_ID;
use crate::weekday::Weekday;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekValidationError {
    message: String,
}

impl WeekValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for WeekValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for WeekValidationError {}

pub fn validate_day(day: Weekday, schedule: &DaySchedule) -> Result<(), WeekValidationError> {
    if !schedule.is_available() && schedule.slot_count() > 0 {
        return Err(WeekValidationError::new(format!(
            "{day} is unavailable but has {} slot(s)",
            schedule.slot_count()
        )));
    }

    for slot in schedule.slots() {
        if slot.start >= slot.end {
            return Err(WeekValidationError::new(format!(
                "{day} slot {} has start {} not before end {}",
                slot.id, slot.start, slot.end
            )));
        }
    }

    for pair in schedule.slots().windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if prev.start > next.start {
            return Err(WeekValidationError::new(format!(
                "{day} slots are not sorted: {} ({}) precedes {} ({})",
                prev.id, prev.start, next.id, next.start
            )));
        }
        if next.overlaps(prev.start, prev.end) {
            return Err(WeekValidationError::new(format!(
                "{day} slots {} ({}-{}) and {} ({}-{}) overlap",
                prev.id, prev.start, prev.end, next.id, next.start, next.end
            )));
        }
    }

    Ok(())
}

pub fn validate_week(days: &[DaySchedule; 7]) -> Result<(), WeekValidationError> {
    let total: usize = days.iter().map(DaySchedule::slot_count).sum();
    let mut seen_ids = HashSet::with_capacity(total);
    for (day, schedule) in Weekday::ALL.into_iter().zip(days.iter()) {
        validate_day(day, schedule)?;
        for slot in schedule.slots() {
            if slot.id.value() > MAX_SLOT_ID {
                return Err(WeekValidationError::new(format!(
                    "{day} slot id {} exceeds the maximum {MAX_SLOT_ID}",
                    slot.id
                )));
            }
            if !seen_ids.insert(slot.id) {
                return Err(WeekValidationError::new(format!(
                    "duplicate slot id {} (seen again on {day})",
                    slot.id
                )));
            }
        }
    }
    Ok(())
}
