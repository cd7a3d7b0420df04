use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MINUTES_PER_DAY: u16 = 24 * 60;
pub const DEFAULT_GRANULARITY_MINUTES: u16 = 30;

/// Wall-clock time with minute granularity, stored as minutes since midnight.
///
/// The canonical text form is zero-padded 24-hour `HH:MM`; serde uses it too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    /// Text is not exactly two digits, a colon, two digits.
    Format(String),
    /// Hour or minute outside the clock range.
    OutOfRange(String),
    /// Minute count of 1440 or more.
    MinutesOutOfRange(u32),
    /// chrono time carrying seconds or sub-seconds.
    SubMinutePrecision(NaiveTime),
}

impl fmt::Display for TimeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeParseError::Format(input) => {
                write!(f, "invalid time '{input}' (expected HH:MM, 24-hour)")
            }
            TimeParseError::OutOfRange(input) => {
                write!(f, "time '{input}' is outside 00:00-23:59")
            }
            TimeParseError::MinutesOutOfRange(minutes) => {
                write!(f, "{minutes} minutes is past the end of the day")
            }
            TimeParseError::SubMinutePrecision(time) => {
                write!(f, "time {time} has seconds; only whole minutes are supported")
            }
        }
    }
}

impl std::error::Error for TimeParseError {}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    pub const NOON: TimeOfDay = TimeOfDay(12 * 60);
    pub const LAST_MINUTE: TimeOfDay = TimeOfDay(MINUTES_PER_DAY - 1);

    pub fn from_minutes(minutes: u16) -> Result<Self, TimeParseError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(TimeParseError::MinutesOutOfRange(u32::from(minutes)));
        }
        Ok(Self(minutes))
    }

    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Adds minutes, returning `None` when the result would reach midnight.
    pub fn checked_add_minutes(self, minutes: u16) -> Option<Self> {
        let total = self.0.checked_add(minutes)?;
        (total < MINUTES_PER_DAY).then_some(Self(total))
    }

    /// 12-hour display form, `h:mm AM|PM`.
    pub fn to_display_string(self) -> String {
        let period = if self.hour() >= 12 { "PM" } else { "AM" };
        let display_hour = match self.hour() % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", display_hour, self.minute(), period)
    }
}

/// 12-hour display form of a time of day; `0` renders as `12:00 AM`.
pub fn format_for_display(time: TimeOfDay) -> String {
    time.to_display_string()
}

/// All times from `00:00` up to the last step before midnight.
///
/// Panics if `granularity_minutes` is zero.
pub fn generate_time_options(granularity_minutes: u16) -> Vec<TimeOfDay> {
    assert!(granularity_minutes > 0, "time option granularity must be positive");
    (0..MINUTES_PER_DAY)
        .step_by(usize::from(granularity_minutes))
        .map(TimeOfDay)
        .collect()
}

/// Options a caller may offer as end times once `start` is chosen.
pub fn end_time_options(options: &[TimeOfDay], start: TimeOfDay) -> Vec<TimeOfDay> {
    options.iter().copied().filter(|t| *t > start).collect()
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());
        if !well_formed {
            return Err(TimeParseError::Format(s.to_string()));
        }
        let digit = |i: usize| u16::from(bytes[i] - b'0');
        let hour = digit(0) * 10 + digit(1);
        let minute = digit(3) * 10 + digit(4);
        TimeOfDay::from_hm(hour, minute).ok_or_else(|| TimeParseError::OutOfRange(s.to_string()))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl From<TimeOfDay> for NaiveTime {
    fn from(value: TimeOfDay) -> Self {
        NaiveTime::from_hms_opt(u32::from(value.hour()), u32::from(value.minute()), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl TryFrom<NaiveTime> for TimeOfDay {
    type Error = TimeParseError;

    fn try_from(value: NaiveTime) -> Result<Self, Self::Error> {
        if value.second() != 0 || value.nanosecond() != 0 {
            return Err(TimeParseError::SubMinutePrecision(value));
        }
        // hour < 24 and minute < 60 always hold for NaiveTime
        Ok(TimeOfDay((value.hour() * 60 + value.minute()) as u16))
    }
}
