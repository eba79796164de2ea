//! Shared utilities for CLI commands.

use std::fs;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use ojt_core::{StatisticsConfig, UserId};
use ojt_db::{Database, REQUIRED_HOURS_KEY, START_DATE_KEY};

use crate::Config;

/// Opens the configured database, creating its parent directory if needed.
pub fn open_database(config: &Config) -> Result<Database> {
    if let Some(parent) = config.database_path.parent() {
        fs::create_dir_all(parent).context("failed to create database directory")?;
    }
    Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))
}

/// Resolves the acting user from `--user` or the configured default.
pub fn resolve_user(user: Option<&str>, config: &Config) -> Result<UserId> {
    let user = user.unwrap_or(&config.user);
    UserId::new(user).context("invalid user")
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date: {s}. Use YYYY-MM-DD (e.g., 2024-02-12)"))
}

/// Parses a time of day as `HH:MM` or `HH:MM:SS`.
pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| format!("Invalid time: {s}. Use HH:MM (e.g., 08:30)"))
}

/// Parses a required-hours value; it must be a positive finite number.
pub fn parse_required_hours(s: &str) -> Result<f64, String> {
    match s.trim().parse::<f64>() {
        Ok(hours) if hours.is_finite() && hours > 0.0 => Ok(hours),
        _ => Err(format!("Invalid required hours: {s}. Use a positive number")),
    }
}

/// Builds the aggregation inputs from stored settings, falling back to config.
pub fn statistics_config(db: &Database, config: &Config) -> Result<StatisticsConfig> {
    let required_hours = match db.get_setting(REQUIRED_HOURS_KEY)? {
        Some(value) => parse_required_hours(&value)
            .map_err(anyhow::Error::msg)
            .context("stored required_hours setting is invalid")?,
        None => config.required_hours,
    };
    let fallback_start_date = match db.get_setting(START_DATE_KEY)? {
        Some(value) => Some(
            parse_date(&value)
                .map_err(anyhow::Error::msg)
                .context("stored start_date setting is invalid")?,
        ),
        None => config.start_date,
    };

    tracing::debug!(required_hours, ?fallback_start_date, "resolved statistics config");
    Ok(StatisticsConfig {
        required_hours,
        fallback_start_date,
        max_weeks: config.max_weeks,
    })
}

/// Formats fractional hours as a duration string.
/// Returns "Xh Ym" if >= 1 hour, "Xm" if < 1 hour.
/// Negative values are treated as 0m.
#[allow(clippy::cast_possible_truncation)]
pub fn format_hours(hours: f64) -> String {
    if !hours.is_finite() || hours <= 0.0 {
        return "0m".to_string();
    }
    let total_minutes = (hours * 60.0).round() as i64;
    let whole_hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if whole_hours >= 1 {
        format!("{whole_hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Generates a 10-character progress bar for a percentage.
/// Values below 5% but above zero get a single block for visibility.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_bar(percentage: f64) -> String {
    let percentage = if percentage.is_finite() {
        percentage.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let filled = if percentage > 0.0 && percentage < 5.0 {
        1
    } else {
        (percentage / 10.0).round() as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}
