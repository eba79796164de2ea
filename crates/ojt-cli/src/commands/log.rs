//! Log command for recording a work session.

use std::io::Write;

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveTime};
use clap::Args;

use ojt_core::{TimeLogEntry, TimeLogInput, UserId};

use super::util::{format_hours, open_database, parse_date, parse_time};
use crate::Config;

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Clock-in time (HH:MM).
    #[arg(long = "time-in", value_parser = parse_time)]
    pub time_in: NaiveTime,

    /// Clock-out time (HH:MM), on the same date.
    #[arg(long = "time-out", value_parser = parse_time)]
    pub time_out: NaiveTime,

    /// Session date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Deduct one hour if the session overlaps 12:00-13:00.
    #[arg(long)]
    pub lunch: bool,

    /// Free-text notes about the session.
    #[arg(long)]
    pub notes: Option<String>,

    /// Where the work happened (default: on-site).
    #[arg(long)]
    pub location: Option<String>,
}

pub fn run<W: Write>(writer: &mut W, args: &LogArgs, user: &UserId, config: &Config) -> Result<()> {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());

    // Hours are computed before the database is touched; invalid sessions save nothing.
    let entry = TimeLogEntry::from_input(TimeLogInput {
        date,
        time_in: args.time_in,
        time_out: args.time_out,
        include_lunch_break: args.lunch,
        notes: args.notes.clone(),
        location: args.location.clone(),
    })?;

    let mut db = open_database(config)?;
    let id = db.insert_time_log(user, &entry)?;
    tracing::info!(%id, user = %user, hours = entry.hours_worked, "session logged");

    let lunch = if entry.include_lunch_break {
        ", lunch break"
    } else {
        ""
    };
    writeln!(
        writer,
        "Logged {} on {} ({}-{}{lunch})",
        format_hours(entry.hours_worked),
        entry.date.format("%Y-%m-%d"),
        entry.time_in.format("%H:%M"),
        entry.time_out.format("%H:%M"),
    )?;
    writeln!(writer, "Entry: {id}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use ojt_db::{Database, TimeLogQuery};

    fn args(time_in: &str, time_out: &str, lunch: bool) -> LogArgs {
        LogArgs {
            time_in: parse_time(time_in).unwrap(),
            time_out: parse_time(time_out).unwrap(),
            date: Some(parse_date("2024-02-12").unwrap()),
            lunch,
            notes: Some("patched switch firmware".to_string()),
            location: None,
        }
    }

    fn config_in(temp: &tempfile::TempDir) -> Config {
        Config {
            database_path: temp.path().join("ojt.db"),
            ..Config::default()
        }
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "whole-hour values are exact")]
    fn log_stores_computed_hours() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(&temp);
        let user = UserId::new("me").unwrap();
        let mut output = Vec::new();

        run(&mut output, &args("08:00", "17:00", true), &user, &config).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Logged 8h 0m on 2024-02-12 (08:00-17:00, lunch break)\n"));
        assert!(output.contains("Entry: "));

        let db = Database::open(&config.database_path).unwrap();
        let logs = db.list_time_logs(&user, &TimeLogQuery::default()).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].entry.hours_worked, 8.0);
        assert_eq!(logs[0].entry.notes.as_deref(), Some("patched switch firmware"));
        assert!(output.contains(logs[0].id.as_str()));
    }

    #[test]
    fn log_rejects_reversed_times_without_saving() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(&temp);
        let user = UserId::new("me").unwrap();
        let mut output = Vec::new();

        let err = run(&mut output, &args("17:00", "08:00", false), &user, &config).unwrap_err();
        assert!(err.to_string().contains("time out must be after time in"));
        assert!(output.is_empty());
        assert!(!config.database_path.exists());
    }

    #[test]
    fn log_rejects_session_shorter_than_lunch() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(&temp);
        let user = UserId::new("me").unwrap();
        let mut output = Vec::new();

        let err = run(&mut output, &args("12:15", "12:45", true), &user, &config).unwrap_err();
        assert!(err.to_string().contains("lunch deduction exceeds session length"));
    }
}
