use crate::slot::{SlotId, TimeSlot};
use crate::time::TimeOfDay;
use serde::{Deserialize, Serialize};

/// Availability flag plus the ordered, non-overlapping slots of one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DaySchedule {
    is_available: bool,
    #[serde(default)]
    slots: Vec<TimeSlot>,
}

impl DaySchedule {
    pub fn available() -> Self {
        Self {
            is_available: true,
            slots: Vec::new(),
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(is_available: bool, slots: Vec<TimeSlot>) -> Self {
        Self {
            is_available,
            slots,
        }
    }

    pub fn is_available(&self) -> bool {
        self.is_available
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn find_slot(&self, id: SlotId) -> Option<&TimeSlot> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    /// Total minutes covered by the day's slots.
    pub fn available_minutes(&self) -> u32 {
        self.slots
            .iter()
            .map(|slot| u32::from(slot.duration_minutes()))
            .sum()
    }

    /// Returns the number of slots discarded.
    pub(crate) fn set_available(&mut self, available: bool) -> usize {
        self.is_available = available;
        if available {
            0
        } else {
            let dropped = self.slots.len();
            self.slots.clear();
            dropped
        }
    }

    /// Index at which a slot starting at `start` keeps the day sorted.
    fn insertion_point(&self, start: TimeOfDay) -> usize {
        self.slots.partition_point(|slot| slot.start < start)
    }

    /// Finds an existing slot intersecting `[start, end)`.
    ///
    /// Only the neighbours around the insertion point can intersect, since the
    /// slots are sorted and pairwise disjoint.
    pub fn find_overlap(&self, start: TimeOfDay, end: TimeOfDay) -> Option<&TimeSlot> {
        let idx = self.insertion_point(start);
        let left = idx.checked_sub(1).and_then(|i| self.slots.get(i));
        let right = self.slots.get(idx);
        left.into_iter()
            .chain(right)
            .find(|slot| slot.overlaps(start, end))
    }

    /// Inserts a slot already checked against [`DaySchedule::find_overlap`].
    pub(crate) fn insert_checked(&mut self, slot: TimeSlot) {
        let idx = self.insertion_point(slot.start);
        self.slots.insert(idx, slot);
        debug_assert!(self.is_well_ordered(), "day slots lost their ordering");
    }

    pub(crate) fn remove(&mut self, id: SlotId) -> Option<TimeSlot> {
        let idx = self.slots.iter().position(|slot| slot.id == id)?;
        Some(self.slots.remove(idx))
    }

    /// Sorted by start and pairwise disjoint.
    pub fn is_well_ordered(&self) -> bool {
        self.slots.windows(2).all(|pair| pair[0].end <= pair[1].start)
            && self.slots.iter().all(|slot| slot.start < slot.end)
    }
}
