use super::{AvailabilityStore, PersistenceError, PersistenceResult};
use crate::day::DaySchedule;
use crate::slot::{SlotId, TimeSlot};
use crate::time::TimeOfDay;
use crate::week::WeekSchedule;
use crate::weekday::Weekday;
use rusqlite::{Connection, params};
use std::sync::{Mutex, MutexGuard};
use tracing::info;

pub struct SqliteAvailabilityStore {
    connection: Mutex<Connection>,
}

impl SqliteAvailabilityStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS week_days (
                day TEXT PRIMARY KEY,
                position INTEGER NOT NULL,
                is_available INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS time_slots (
                id INTEGER PRIMARY KEY,
                day TEXT NOT NULL REFERENCES week_days(day) ON DELETE CASCADE,
                start_minute INTEGER NOT NULL,
                end_minute INTEGER NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> PersistenceResult<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| PersistenceError::InvalidData("sqlite connection lock poisoned".into()))
    }

    fn save_days(&self, tx: &rusqlite::Transaction, week: &WeekSchedule) -> PersistenceResult<()> {
        tx.execute("DELETE FROM time_slots", [])?;
        tx.execute("DELETE FROM week_days", [])?;
        let mut day_stmt =
            tx.prepare("INSERT INTO week_days (day, position, is_available) VALUES (?1, ?2, ?3)")?;
        let mut slot_stmt = tx.prepare(
            "INSERT INTO time_slots (id, day, start_minute, end_minute) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (day, schedule) in week.iter() {
            day_stmt.execute(params![day.as_str(), day.index() as i64, schedule.is_available()])?;
            for slot in schedule.slots() {
                let id = i64::try_from(slot.id.value()).map_err(|_| {
                    PersistenceError::InvalidData(format!(
                        "slot id {} exceeds sqlite range",
                        slot.id
                    ))
                })?;
                slot_stmt.execute(params![
                    id,
                    day.as_str(),
                    i64::from(slot.start.minutes()),
                    i64::from(slot.end.minutes())
                ])?;
            }
        }
        Ok(())
    }
}

fn time_from_column(value: i64, column: &str) -> PersistenceResult<TimeOfDay> {
    u16::try_from(value)
        .ok()
        .and_then(|minutes| TimeOfDay::from_minutes(minutes).ok())
        .ok_or_else(|| PersistenceError::InvalidData(format!("invalid {column} value {value}")))
}

impl AvailabilityStore for SqliteAvailabilityStore {
    fn save_schedule(&self, week: &WeekSchedule) -> PersistenceResult<()> {
        super::validate_schedule(week)?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        self.save_days(&tx, week)?;
        tx.commit()?;
        info!(slots = week.total_slots(), "schedule saved to sqlite");
        Ok(())
    }

    fn load_schedule(&self) -> PersistenceResult<Option<WeekSchedule>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare("SELECT day, is_available FROM week_days ORDER BY position")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?))
        })?;

        let mut availability: [Option<bool>; 7] = [None; 7];
        let mut found_any = false;
        for row in rows {
            let (name, is_available) = row?;
            let day: Weekday = name.parse()?;
            availability[day.index()] = Some(is_available);
            found_any = true;
        }
        if !found_any {
            return Ok(None);
        }

        let mut stmt = conn.prepare(
            "SELECT id, day, start_minute, end_minute FROM time_slots ORDER BY start_minute ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;

        let mut slots: [Vec<TimeSlot>; 7] = Default::default();
        for row in rows {
            let (id, name, start, end) = row?;
            let day: Weekday = name.parse()?;
            let id = u64::try_from(id)
                .map_err(|_| PersistenceError::InvalidData(format!("negative slot id {id}")))?;
            slots[day.index()].push(TimeSlot {
                id: SlotId::new(id),
                start: time_from_column(start, "start_minute")?,
                end: time_from_column(end, "end_minute")?,
            });
        }

        let mut days: [DaySchedule; 7] = Default::default();
        for day in Weekday::ALL {
            let idx = day.index();
            let Some(is_available) = availability[idx] else {
                return Err(PersistenceError::InvalidData(format!(
                    "stored schedule has no row for {day}"
                )));
            };
            days[idx] = DaySchedule::from_parts(is_available, std::mem::take(&mut slots[idx]));
        }

        let week = WeekSchedule::from_days(days)?;
        info!(slots = week.total_slots(), "schedule loaded from sqlite");
        Ok(Some(week))
    }
}
