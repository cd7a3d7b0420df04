use crate::day::DaySchedule;
use crate::slot::TimeSlot;
use crate::week::WeekSchedule;
use crate::weekday::Weekday;
use serde::Serialize;

/// Per-day overview shown next to the day toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub day: Weekday,
    pub is_available: bool,
    pub slot_count: usize,
}

impl DaySummary {
    pub fn new(day: Weekday, schedule: &DaySchedule) -> Self {
        Self {
            day,
            is_available: schedule.is_available(),
            slot_count: schedule.slot_count(),
        }
    }

    pub fn badge(&self) -> String {
        if self.is_available {
            format!("{} Slots", self.slot_count)
        } else {
            "Unavailable".to_string()
        }
    }
}

pub fn summarize_week(week: &WeekSchedule) -> Vec<DaySummary> {
    week.iter()
        .map(|(day, schedule)| DaySummary::new(day, schedule))
        .collect()
}

/// `9:00 AM - 10:00 AM`
pub fn describe_slot(slot: &TimeSlot) -> String {
    format!(
        "{} - {}",
        slot.start.to_display_string(),
        slot.end.to_display_string()
    )
}

/// Bordered text table of the week: one row per day, Monday first.
pub fn render_week_table(week: &WeekSchedule) -> String {
    let header = ["day", "status", "slots"];
    let rows: Vec<[String; 3]> = week
        .iter()
        .map(|(day, schedule)| {
            let slots = schedule
                .slots()
                .iter()
                .map(|slot| format!("#{} {}", slot.id, describe_slot(slot)))
                .collect::<Vec<_>>()
                .join(", ");
            [
                day.to_string(),
                DaySummary::new(day, schedule).badge(),
                slots,
            ]
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, header.iter().map(|h| h.to_string()), &widths);
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        push_row(&mut out, row.into_iter(), &widths);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn push_row(out: &mut String, cells: impl Iterator<Item = String>, widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.zip(widths) {
        out.push(' ');
        out.push_str(&cell);
        out.push_str(&" ".repeat(width.saturating_sub(cell.len())));
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
}
