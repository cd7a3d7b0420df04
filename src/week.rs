use crate::day::DaySchedule;
use crate::slot::{SlotId, TimeSlot};
use crate::validation::{self, WeekValidationError};
use crate::weekday::Weekday;
use serde::{Deserialize, Serialize};

/// The seven days of one doctor's weekly availability.
///
/// Every weekday is always present. Serializes as an object keyed by the day
/// name, Monday first, and refuses to deserialize a snapshot that breaks any
/// slot invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WeekScheduleRepr", into = "WeekScheduleRepr")]
pub struct WeekSchedule {
    days: [DaySchedule; 7],
}

impl Default for WeekSchedule {
    /// Monday through Saturday available, Sunday off, no slots.
    fn default() -> Self {
        Self::with_available_days(Weekday::ALL.into_iter().filter(|d| *d != Weekday::Sunday))
    }
}

impl WeekSchedule {
    pub fn with_available_days<I>(available_days: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        let mut days: [DaySchedule; 7] = Default::default();
        for day in available_days {
            days[day.index()] = DaySchedule::available();
        }
        Self { days }
    }

    pub fn from_days(days: [DaySchedule; 7]) -> Result<Self, WeekValidationError> {
        validation::validate_week(&days)?;
        Ok(Self { days })
    }

    pub fn validate(&self) -> Result<(), WeekValidationError> {
        validation::validate_week(&self.days)
    }

    pub fn day(&self, day: Weekday) -> &DaySchedule {
        &self.days[day.index()]
    }

    pub(crate) fn day_mut(&mut self, day: Weekday) -> &mut DaySchedule {
        &mut self.days[day.index()]
    }

    /// Days in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DaySchedule)> + '_ {
        Weekday::ALL.into_iter().zip(self.days.iter())
    }

    pub fn available_days(&self) -> Vec<Weekday> {
        self.iter()
            .filter(|(_, schedule)| schedule.is_available())
            .map(|(day, _)| day)
            .collect()
    }

    pub fn total_slots(&self) -> usize {
        self.days.iter().map(DaySchedule::slot_count).sum()
    }

    pub fn find_slot(&self, id: SlotId) -> Option<(Weekday, &TimeSlot)> {
        self.iter()
            .find_map(|(day, schedule)| schedule.find_slot(id).map(|slot| (day, slot)))
    }

    pub fn max_slot_id(&self) -> Option<SlotId> {
        self.days
            .iter()
            .flat_map(|schedule| schedule.slots().iter().map(|slot| slot.id))
            .max()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WeekScheduleRepr {
    #[serde(rename = "Monday")]
    monday: DaySchedule,
    #[serde(rename = "Tuesday")]
    tuesday: DaySchedule,
    #[serde(rename = "Wednesday")]
    wednesday: DaySchedule,
    #[serde(rename = "Thursday")]
    thursday: DaySchedule,
    #[serde(rename = "Friday")]
    friday: DaySchedule,
    #[serde(rename = "Saturday")]
    saturday: DaySchedule,
    #[serde(rename = "Sunday")]
    sunday: DaySchedule,
}

impl From<WeekSchedule> for WeekScheduleRepr {
    fn from(value: WeekSchedule) -> Self {
        let [monday, tuesday, wednesday, thursday, friday, saturday, sunday] = value.days;
        Self {
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
            sunday,
        }
    }
}

impl TryFrom<WeekScheduleRepr> for WeekSchedule {
    type Error = WeekValidationError;

    fn try_from(value: WeekScheduleRepr) -> Result<Self, Self::Error> {
        WeekSchedule::from_days([
            value.monday,
            value.tuesday,
            value.wednesday,
            value.thursday,
            value.friday,
            value.saturday,
            value.sunday,
        ])
    }
}
