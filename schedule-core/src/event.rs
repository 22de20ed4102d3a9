//! Event types.
//!
//! An `Event` is a single dated item with a name, a tag and a start/end clock
//! time, owned by exactly one user. Clock times are kept as minutes since
//! midnight and always written back as zero-padded `HH:MM`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::identity::UserId;

/// A scheduled item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(alias = "userId")]
    pub owner_id: UserId,
    pub date: NaiveDate,
    pub name: String,
    pub tag: String,
    pub start_time: ClockTime,
    /// Stored as given, even when earlier than `start_time`.
    pub end_time: ClockTime,
}

impl Event {
    /// Signed length in minutes. Negative when the end is before the start.
    pub fn duration_minutes(&self) -> i32 {
        self.end_time.minutes() as i32 - self.start_time.minutes() as i32
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_minutes() as f64 / 60.0
    }

    /// Replace the editable fields, keeping id, owner and date.
    pub fn apply(&mut self, fields: EventFields) {
        self.name = fields.name;
        self.tag = fields.tag;
        self.start_time = fields.start_time;
        self.end_time = fields.end_time;
    }

    pub fn export_row(&self) -> ExportRow {
        ExportRow {
            date: self.date,
            name: self.name.clone(),
            tag: self.tag.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The user-editable part of an event, as submitted by the add or edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct EventFields {
    pub name: String,
    pub tag: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
}

impl EventFields {
    /// Parse raw form input.
    pub fn parse(name: &str, tag: &str, start: &str, end: &str) -> ScheduleResult<Self> {
        Ok(EventFields {
            name: name.trim().to_string(),
            tag: tag.to_string(),
            start_time: start.parse()?,
            end_time: end.parse()?,
        })
    }

    /// Checks that don't need the tag registry.
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.name.trim().is_empty() {
            return Err(ScheduleError::Validation(
                "Event name cannot be empty".into(),
            ));
        }
        if self.tag.is_empty() {
            return Err(ScheduleError::Validation("Event tag cannot be empty".into()));
        }
        Ok(())
    }
}

/// A 24-hour wall clock time (`HH:MM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    pub fn new(hour: u16, minute: u16) -> ScheduleResult<Self> {
        if hour > 23 || minute > 59 {
            return Err(ScheduleError::Validation(format!(
                "Invalid time {}:{:02}",
                hour, minute
            )));
        }
        Ok(ClockTime(hour * 60 + minute))
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl FromStr for ClockTime {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::Validation(format!("Invalid time '{}'. Expected HH:MM", s));

        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;

        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(hour) || hour.len() > 2 || !all_digits(minute) || minute.len() != 2 {
            return Err(invalid());
        }

        let hour: u16 = hour.parse().map_err(|_| invalid())?;
        let minute: u16 = minute.parse().map_err(|_| invalid())?;

        ClockTime::new(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// One labeled row handed to the spreadsheet exporter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Tag")]
    pub tag: String,
    #[serde(rename = "Start")]
    pub start_time: ClockTime,
    #[serde(rename = "End")]
    pub end_time: ClockTime,
}
