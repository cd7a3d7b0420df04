use super::{AvailabilityStore, PersistenceError, PersistenceResult};
use crate::day::DaySchedule;
use crate::slot::{SlotId, TimeSlot};
use crate::time::TimeOfDay;
use crate::week::WeekSchedule;
use crate::weekday::Weekday;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

const SNAPSHOT_FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct ScheduleSnapshot {
    format_version: u32,
    week: WeekSchedule,
}

/// Writes into a temporary sibling of `path`, then renames it into place.
fn write_atomically<P, F>(path: P, write: F) -> PersistenceResult<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut File) -> PersistenceResult<()>,
{
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| PersistenceError::Io(err.error))?;
    Ok(())
}

pub fn save_schedule_to_json<P: AsRef<Path>>(
    week: &WeekSchedule,
    path: P,
) -> PersistenceResult<()> {
    super::validate_schedule(week)?;
    let snapshot = ScheduleSnapshot {
        format_version: SNAPSHOT_FORMAT_VERSION,
        week: week.clone(),
    };
    write_atomically(&path, |file| {
        serde_json::to_writer_pretty(file, &snapshot)?;
        Ok(())
    })?;
    info!(path = %path.as_ref().display(), slots = week.total_slots(), "schedule saved as json");
    Ok(())
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<WeekSchedule> {
    let file = File::open(&path)?;
    let snapshot: ScheduleSnapshot = serde_json::from_reader(file)?;
    if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
        return Err(PersistenceError::InvalidData(format!(
            "unsupported snapshot format_version {} (expected {SNAPSHOT_FORMAT_VERSION})",
            snapshot.format_version
        )));
    }
    info!(path = %path.as_ref().display(), "schedule loaded from json");
    Ok(snapshot.week)
}

/// One CSV row per slot; a day without slots gets a single row with empty slot columns.
#[derive(Debug, Serialize, Deserialize)]
struct SlotCsvRecord {
    day: Weekday,
    is_available: bool,
    slot_id: Option<u64>,
    start: Option<TimeOfDay>,
    end: Option<TimeOfDay>,
}

impl SlotCsvRecord {
    fn day_only(day: Weekday, schedule: &DaySchedule) -> Self {
        Self {
            day,
            is_available: schedule.is_available(),
            slot_id: None,
            start: None,
            end: None,
        }
    }

    fn for_slot(day: Weekday, schedule: &DaySchedule, slot: &TimeSlot) -> Self {
        Self {
            day,
            is_available: schedule.is_available(),
            slot_id: Some(slot.id.value()),
            start: Some(slot.start),
            end: Some(slot.end),
        }
    }

    fn into_slot(self) -> PersistenceResult<Option<TimeSlot>> {
        match (self.slot_id, self.start, self.end) {
            (None, None, None) => Ok(None),
            (Some(id), Some(start), Some(end)) => Ok(Some(TimeSlot {
                id: SlotId::new(id),
                start,
                end,
            })),
            _ => Err(PersistenceError::InvalidData(format!(
                "{} row has an incomplete slot (slot_id, start and end must all be set or all be empty)",
                self.day
            ))),
        }
    }
}

pub fn save_schedule_to_csv<P: AsRef<Path>>(week: &WeekSchedule, path: P) -> PersistenceResult<()> {
    super::validate_schedule(week)?;
    write_atomically(&path, |file| {
        let mut writer = csv::Writer::from_writer(file);
        for (day, schedule) in week.iter() {
            if schedule.slots().is_empty() {
                writer.serialize(SlotCsvRecord::day_only(day, schedule))?;
            }
            for slot in schedule.slots() {
                writer.serialize(SlotCsvRecord::for_slot(day, schedule, slot))?;
            }
        }
        writer.flush()?;
        Ok(())
    })?;
    info!(path = %path.as_ref().display(), slots = week.total_slots(), "schedule saved as csv");
    Ok(())
}

pub fn load_schedule_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<WeekSchedule> {
    let file = File::open(&path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut availability: [Option<bool>; 7] = [None; 7];
    let mut slots: [Vec<TimeSlot>; 7] = Default::default();

    for record in reader.deserialize::<SlotCsvRecord>() {
        let record: SlotCsvRecord = record?;
        let idx = record.day.index();
        match availability[idx] {
            Some(previous) if previous != record.is_available => {
                return Err(PersistenceError::InvalidData(format!(
                    "{} has conflicting is_available values",
                    record.day
                )));
            }
            _ => availability[idx] = Some(record.is_available),
        }
        if let Some(slot) = record.into_slot()? {
            slots[idx].push(slot);
        }
    }

    let mut days: [DaySchedule; 7] = Default::default();
    for day in Weekday::ALL {
        let idx = day.index();
        let Some(is_available) = availability[idx] else {
            return Err(PersistenceError::InvalidData(format!(
                "CSV file has no row for {day}"
            )));
        };
        let mut day_slots = std::mem::take(&mut slots[idx]);
        day_slots.sort_by_key(|slot| slot.start);
        days[idx] = DaySchedule::from_parts(is_available, day_slots);
    }

    let week = WeekSchedule::from_days(days)?;
    info!(path = %path.as_ref().display(), slots = week.total_slots(), "schedule loaded from csv");
    Ok(week)
}

/// [`AvailabilityStore`] backed by a single JSON snapshot file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AvailabilityStore for JsonFileStore {
    fn save_schedule(&self, week: &WeekSchedule) -> PersistenceResult<()> {
        save_schedule_to_json(week, &self.path)
    }

    fn load_schedule(&self) -> PersistenceResult<Option<WeekSchedule>> {
        if !self.path.exists() {
            return Ok(None);
        }
        load_schedule_from_json(&self.path).map(Some)
    }
}
