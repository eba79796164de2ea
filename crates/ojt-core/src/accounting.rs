//! Time accounting.
//!
//! Derives worked hours for a single session and aggregates stored sessions
//! into progress statistics.
//!
//! # Rules
//!
//! 1. Worked hours are the true elapsed time between clock-in and clock-out on
//!    the session date, in fractional hours (15 minutes is 0.25).
//! 2. With the lunch flag set, a session overlapping `[12:00, 13:00]` at all
//!    loses exactly one hour, however little of the window it covers.
//! 3. Progress is total hours over the required hours, capped at 100%.
//!
//! Everything here is a pure function of its arguments. Callers load entries
//! and settings beforehand and persist results afterwards.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use thiserror::Error;

use crate::types::ValidationError;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Start of the fixed lunch window.
pub const LUNCH_START: NaiveTime = on_the_hour(12);

/// End of the fixed lunch window.
pub const LUNCH_END: NaiveTime = on_the_hour(13);

/// Hours deducted when a session overlaps the lunch window.
pub const LUNCH_DEDUCTION_HOURS: f64 = 1.0;

/// Required hours used when no setting is stored.
pub const DEFAULT_REQUIRED_HOURS: f64 = 500.0;

/// Number of ISO weeks kept in [`ProgressSummary::weekly_hours`] by default.
pub const DEFAULT_MAX_WEEKS: usize = 12;

/// Number of days kept in [`ProgressSummary::daily_hours`].
pub const RECENT_DAYS: usize = 7;

const fn on_the_hour(hour: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, 0, 0) {
        Some(time) => time,
        None => panic!("hour out of range"),
    }
}

/// Errors from time accounting.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccountingError {
    /// The input was malformed or logically inconsistent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The lunch deduction is longer than the session itself.
    #[error("lunch deduction exceeds session length ({elapsed_hours:.2}h elapsed)")]
    Computation { elapsed_hours: f64 },

    /// The required-hours target makes progress undefined.
    #[error("required hours must be a positive number, got {required_hours}")]
    Configuration { required_hours: f64 },
}

/// A logged session that can be aggregated.
///
/// This trait allows aggregation to work with different entry representations
/// (e.g., stored rows from ojt-db, or test fixtures).
pub trait LoggedHours {
    /// Returns the calendar date of the session.
    fn date(&self) -> NaiveDate;

    /// Returns the stored worked hours for the session.
    fn hours_worked(&self) -> f64;
}

/// Computes worked hours for one session.
///
/// `time_in` and `time_out` are both anchored to `date`; sessions spanning
/// midnight are not supported.
pub fn compute_hours_worked(
    date: NaiveDate,
    time_in: NaiveTime,
    time_out: NaiveTime,
    include_lunch_break: bool,
) -> Result<f64, AccountingError> {
    let start = date.and_time(time_in);
    let end = date.and_time(time_out);
    if end <= start {
        return Err(ValidationError::TimeOutNotAfterTimeIn { time_in, time_out }.into());
    }

    #[allow(clippy::cast_precision_loss)]
    let elapsed_hours = (end - start).num_seconds() as f64 / SECONDS_PER_HOUR;

    if !include_lunch_break || !overlaps_lunch(date, start, end) {
        return Ok(elapsed_hours);
    }

    let hours = elapsed_hours - LUNCH_DEDUCTION_HOURS;
    if hours < 0.0 {
        return Err(AccountingError::Computation { elapsed_hours });
    }
    Ok(hours)
}

/// Any overlap with the lunch window counts, including partial overlap.
fn overlaps_lunch(date: NaiveDate, start: NaiveDateTime, end: NaiveDateTime) -> bool {
    let lunch_start = date.and_time(LUNCH_START);
    let lunch_end = date.and_time(LUNCH_END);
    start < lunch_end && end > lunch_start
}

/// Inputs to [`aggregate_statistics`] besides the entries themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsConfig {
    /// Hours needed to complete the training.
    pub required_hours: f64,

    /// Reported as `start_date` while no entries exist yet.
    pub fallback_start_date: Option<NaiveDate>,

    /// Maximum number of ISO weeks returned, most recent first.
    /// Default: 12.
    pub max_weeks: usize,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            required_hours: DEFAULT_REQUIRED_HOURS,
            fallback_start_date: None,
            max_weeks: DEFAULT_MAX_WEEKS,
        }
    }
}

/// Hours logged in one ISO week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyHours {
    pub iso_year: i32,
    pub week: u32,
    /// The Monday the week starts on.
    pub week_start: NaiveDate,
    pub hours: f64,
    /// Distinct dates with at least one session.
    pub days: usize,
}

/// Hours logged in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyHours {
    pub year: i32,
    pub month: u32,
    pub hours: f64,
    pub days: usize,
}

/// Hours logged on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyHours {
    pub date: NaiveDate,
    pub hours: f64,
    pub sessions: usize,
}

/// Progress toward the required hours. Derived on every read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub total_hours: f64,
    pub total_days: usize,
    pub required_hours: f64,
    pub remaining_hours: f64,
    /// Percentage of required hours completed, capped at 100.
    pub progress_percentage: f64,
    pub daily_average: f64,
    pub last_log_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    /// Most recent week first, at most `max_weeks` entries.
    pub weekly_hours: Vec<WeeklyHours>,
    /// Most recent month first, uncapped.
    pub monthly_hours: Vec<MonthlyHours>,
    /// Most recent date first, at most [`RECENT_DAYS`] entries.
    pub daily_hours: Vec<DailyHours>,
}

#[derive(Debug)]
struct DayTotals {
    hours: f64,
    sessions: usize,
}

/// Aggregates a user's sessions into a [`ProgressSummary`].
///
/// Entry order does not matter; grouping and ordering come from the dates.
pub fn aggregate_statistics<E: LoggedHours>(
    entries: &[E],
    config: &StatisticsConfig,
) -> Result<ProgressSummary, AccountingError> {
    let required_hours = config.required_hours;
    if !required_hours.is_finite() || required_hours <= 0.0 {
        return Err(AccountingError::Configuration { required_hours });
    }

    let mut sessions_by_day: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for entry in entries {
        sessions_by_day
            .entry(entry.date())
            .or_default()
            .push(entry.hours_worked());
    }

    // Sessions are summed in sorted order and days in date order, so every
    // total is the same for any permutation of `entries`.
    let by_day: BTreeMap<NaiveDate, DayTotals> = sessions_by_day
        .into_iter()
        .map(|(date, mut sessions)| {
            sessions.sort_by(f64::total_cmp);
            let totals = DayTotals {
                hours: sessions.iter().sum(),
                sessions: sessions.len(),
            };
            (date, totals)
        })
        .collect();
    let total_hours: f64 = by_day.values().map(|day| day.hours).sum();

    let total_days = by_day.len();
    #[allow(clippy::cast_precision_loss)]
    let daily_average = if total_days > 0 {
        total_hours / total_days as f64
    } else {
        0.0
    };
    let progress_percentage = (total_hours / required_hours * 100.0).min(100.0);
    let remaining_hours = (required_hours - total_hours).max(0.0);

    let last_log_date = by_day.keys().next_back().copied();
    let start_date = by_day
        .keys()
        .next()
        .copied()
        .or(config.fallback_start_date);

    Ok(ProgressSummary {
        total_hours,
        total_days,
        required_hours,
        remaining_hours,
        progress_percentage,
        daily_average,
        last_log_date,
        start_date,
        weekly_hours: group_weeks(&by_day, config.max_weeks),
        monthly_hours: group_months(&by_day),
        daily_hours: by_day
            .iter()
            .rev()
            .take(RECENT_DAYS)
            .map(|(date, day)| DailyHours {
                date: *date,
                hours: day.hours,
                sessions: day.sessions,
            })
            .collect(),
    })
}

fn group_weeks(by_day: &BTreeMap<NaiveDate, DayTotals>, max_weeks: usize) -> Vec<WeeklyHours> {
    let mut weeks: BTreeMap<(i32, u32), WeeklyHours> = BTreeMap::new();
    for (date, day) in by_day {
        let iso = date.iso_week();
        let week_start =
            *date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
        let week = weeks
            .entry((iso.year(), iso.week()))
            .or_insert_with(|| WeeklyHours {
                iso_year: iso.year(),
                week: iso.week(),
                week_start,
                hours: 0.0,
                days: 0,
            });
        week.hours += day.hours;
        week.days += 1;
    }
    weeks.into_values().rev().take(max_weeks).collect()
}

fn group_months(by_day: &BTreeMap<NaiveDate, DayTotals>) -> Vec<MonthlyHours> {
    let mut months: BTreeMap<(i32, u32), MonthlyHours> = BTreeMap::new();
    for (date, day) in by_day {
        let month = months
            .entry((date.year(), date.month()))
            .or_insert_with(|| MonthlyHours {
                year: date.year(),
                month: date.month(),
                hours: 0.0,
                days: 0,
            });
        month.hours += day.hours;
        month.days += 1;
    }
    months.into_values().rev().collect()
}
