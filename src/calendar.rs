use crate::config::AvailabilityConfig;
use crate::slot::TimeSlot;
use crate::week::WeekSchedule;
use crate::weekday::Weekday;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashSet;

/// How far ahead `next_bookable` looks before giving up.
const SEARCH_HORIZON_DAYS: i64 = 366;

/// Projects a weekly schedule onto calendar dates for booking.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityCalendar {
    week: WeekSchedule,
    blocked_dates: HashSet<NaiveDate>,
}

impl AvailabilityCalendar {
    pub fn new(week: WeekSchedule) -> Self {
        Self {
            week,
            blocked_dates: HashSet::new(),
        }
    }

    pub fn from_config(week: WeekSchedule, config: &AvailabilityConfig) -> Self {
        let mut calendar = Self::new(week);
        calendar.add_blocked_dates(&config.blocked_dates);
        calendar
    }

    pub fn week(&self) -> &WeekSchedule {
        &self.week
    }

    /// Block a single date (holiday, leave)
    pub fn add_blocked_date(&mut self, date: NaiveDate) {
        self.blocked_dates.insert(date);
    }

    pub fn add_blocked_dates(&mut self, dates: &[NaiveDate]) {
        self.blocked_dates.extend(dates);
    }

    pub fn is_blocked(&self, date: NaiveDate) -> bool {
        self.blocked_dates.contains(&date)
    }

    /// Sorted list of blocked dates
    pub fn blocked_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.blocked_dates.iter().copied().collect();
        dates.sort();
        dates
    }

    /// Check if a patient could book anything on a date
    pub fn is_bookable(&self, date: NaiveDate) -> bool {
        !self.slots_on(date).is_empty()
    }

    pub fn slots_on(&self, date: NaiveDate) -> &[TimeSlot] {
        if self.is_blocked(date) {
            return &[];
        }
        let schedule = self.week.day(Weekday::from(date.weekday()));
        if schedule.is_available() {
            schedule.slots()
        } else {
            &[]
        }
    }

    /// Appointment start times on a date, each leaving room for a full appointment.
    pub fn appointment_starts(
        &self,
        date: NaiveDate,
        appointment_minutes: u16,
    ) -> Vec<NaiveDateTime> {
        assert!(appointment_minutes > 0, "appointment length must be positive");
        let length = u32::from(appointment_minutes);
        let mut starts = Vec::new();
        for slot in self.slots_on(date) {
            let mut minute = u32::from(slot.start.minutes());
            while minute + length <= u32::from(slot.end.minutes()) {
                let time = NaiveTime::from_num_seconds_from_midnight_opt(minute * 60, 0)
                    .unwrap_or(NaiveTime::MIN);
                starts.push(date.and_time(time));
                minute += length;
            }
        }
        starts
    }

    /// Find the next bookable date after a given date
    pub fn next_bookable(&self, from: NaiveDate) -> Option<NaiveDate> {
        (1..=SEARCH_HORIZON_DAYS)
            .map_while(|offset| from.checked_add_signed(Duration::days(offset)))
            .find(|date| self.is_bookable(*date))
    }

    /// Get all bookable days in a date range (inclusive)
    pub fn bookable_days_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut current = start;

        while current <= end {
            if self.is_bookable(current) {
                days.push(current);
            }
            // NaiveDate::MAX has no successor
            let Some(next) = current.succ_opt() else {
                break;
            };
            current = next;
        }
        days
    }

    pub fn count_bookable_days(&self, start: NaiveDate, end: NaiveDate) -> usize {
        self.bookable_days_in_range(start, end).len()
    }
}
