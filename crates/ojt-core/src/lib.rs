//! Core domain logic for the OJT hour tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Time accounting: worked hours per session, with the lunch deduction
//! - Progress aggregation: totals, averages, weekly/monthly/daily breakdowns
//! - Validated identifiers for users and entries

pub mod accounting;
pub mod entry;
pub mod types;

pub use accounting::{
    AccountingError, DailyHours, LoggedHours, MonthlyHours, ProgressSummary, StatisticsConfig,
    WeeklyHours, aggregate_statistics, compute_hours_worked,
};
pub use entry::{DEFAULT_LOCATION, TimeLogEntry, TimeLogInput};
pub use types::{EntryId, UserId, ValidationError};
