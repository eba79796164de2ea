//! Logged work sessions.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::accounting::{AccountingError, LoggedHours, compute_hours_worked};

/// Location recorded when the caller does not supply one.
pub const DEFAULT_LOCATION: &str = "on-site";

/// Raw session details as submitted by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLogInput {
    pub date: NaiveDate,
    pub time_in: NaiveTime,
    pub time_out: NaiveTime,
    #[serde(default)]
    pub include_lunch_break: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// A single work session with its derived hours.
///
/// `hours_worked` is computed once when the entry is built and stored
/// alongside the raw times. It is never re-derived on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeLogEntry {
    pub date: NaiveDate,
    pub time_in: NaiveTime,
    pub time_out: NaiveTime,
    pub include_lunch_break: bool,
    pub hours_worked: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub location: String,
}

impl TimeLogEntry {
    /// Builds an entry from submitted input, computing `hours_worked`.
    ///
    /// Fails without producing an entry if the times are out of order or the
    /// lunch deduction exceeds the session length.
    pub fn from_input(input: TimeLogInput) -> Result<Self, AccountingError> {
        let hours_worked = compute_hours_worked(
            input.date,
            input.time_in,
            input.time_out,
            input.include_lunch_break,
        )?;

        Ok(Self {
            date: input.date,
            time_in: input.time_in,
            time_out: input.time_out,
            include_lunch_break: input.include_lunch_break,
            hours_worked,
            notes: normalize_notes(input.notes),
            location: normalize_location(input.location),
        })
    }
}

impl LoggedHours for TimeLogEntry {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn hours_worked(&self) -> f64 {
        self.hours_worked
    }
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

fn normalize_location(location: Option<String>) -> String {
    location
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| DEFAULT_LOCATION.to_string())
}
