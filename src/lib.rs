pub mod calendar;
pub mod config;
pub mod day;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod persistence;
pub mod render;
pub mod scheduler;
pub mod slot;
pub mod time;
pub mod validation;
pub mod week;
pub mod weekday;

pub use calendar::AvailabilityCalendar;
pub use config::{AvailabilityConfig, ConfigError};
pub use day::DaySchedule;
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteAvailabilityStore;
pub use persistence::{
    AvailabilityStore, JsonFileStore, PersistenceError, load_schedule_from_csv,
    load_schedule_from_json, save_schedule_to_csv, save_schedule_to_json, validate_schedule,
};
pub use render::{DaySummary, describe_slot, render_week_table, summarize_week};
pub use scheduler::{SchedulingError, WeeklyAvailabilityScheduler};
pub use slot::{MAX_SLOT_ID, SlotId, TimeSlot};
pub use time::{
    TimeOfDay, TimeParseError, end_time_options, format_for_display, generate_time_options,
};
pub use validation::WeekValidationError;
pub use week::WeekSchedule;
pub use weekday::{Weekday, WeekdayParseError};
