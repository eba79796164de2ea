//! List command for showing logged sessions.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use ojt_core::UserId;
use ojt_db::{StoredTimeLog, TimeLogQuery};

use super::util::{format_hours, open_database, parse_date};
use crate::Config;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Earliest date to include (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Latest date to include (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,

    /// Maximum number of entries to show.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// JSON representation of a stored session.
#[derive(Debug, Serialize)]
pub struct JsonTimeLog {
    pub id: String,
    pub date: String,
    pub time_in: String,
    pub time_out: String,
    pub include_lunch_break: bool,
    pub hours_worked: f64,
    pub notes: Option<String>,
    pub location: String,
    pub created_at: String,
}

impl From<&StoredTimeLog> for JsonTimeLog {
    fn from(log: &StoredTimeLog) -> Self {
        Self {
            id: log.id.to_string(),
            date: log.entry.date.format("%Y-%m-%d").to_string(),
            time_in: log.entry.time_in.format("%H:%M").to_string(),
            time_out: log.entry.time_out.format("%H:%M").to_string(),
            include_lunch_break: log.entry.include_lunch_break,
            hours_worked: log.entry.hours_worked,
            notes: log.entry.notes.clone(),
            location: log.entry.location.clone(),
            created_at: log.created_at.clone(),
        }
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    args: &ListArgs,
    user: &UserId,
    config: &Config,
) -> Result<()> {
    let db = open_database(config)?;
    let query = TimeLogQuery {
        from: args.from,
        to: args.to,
        limit: args.limit,
    };
    let logs = db.list_time_logs(user, &query)?;
    tracing::debug!(count = logs.len(), ?query, "listed time logs");

    if args.json {
        let json: Vec<JsonTimeLog> = logs.iter().map(JsonTimeLog::from).collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&json)?)?;
        return Ok(());
    }

    write!(writer, "{}", format_logs(&logs))?;
    Ok(())
}

/// Formats sessions as a human-readable table.
pub fn format_logs(logs: &[StoredTimeLog]) -> String {
    if logs.is_empty() {
        return "No time logs recorded.\n".to_string();
    }

    let mut output = String::new();
    output.push_str("DATE        IN     OUT    LUNCH  HOURS    LOCATION    ID\n");
    for log in logs {
        let lunch = if log.entry.include_lunch_break {
            "yes"
        } else {
            "no"
        };
        output.push_str(&format!(
            "{}  {}  {}  {lunch:<5}  {:<7}  {:<10}  {}\n",
            log.entry.date.format("%Y-%m-%d"),
            log.entry.time_in.format("%H:%M"),
            log.entry.time_out.format("%H:%M"),
            format_hours(log.entry.hours_worked),
            log.entry.location,
            log.id,
        ));
        if let Some(notes) = &log.entry.notes {
            output.push_str(&format!("            {notes}\n"));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveTime;
    use ojt_core::{EntryId, TimeLogEntry};

    use insta::assert_snapshot;

    fn stored(id: &str, day: u32, lunch: bool, hours: f64, notes: Option<&str>) -> StoredTimeLog {
        StoredTimeLog {
            id: EntryId::new(id).unwrap(),
            user_id: UserId::new("me").unwrap(),
            entry: TimeLogEntry {
                date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
                time_in: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                time_out: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                include_lunch_break: lunch,
                hours_worked: hours,
                notes: notes.map(str::to_string),
                location: "on-site".to_string(),
            },
            created_at: "2024-02-12T17:05:00Z".to_string(),
        }
    }

    #[test]
    fn format_logs_renders_table() {
        let logs = vec![
            stored("log-b", 13, false, 9.0, None),
            stored("log-a", 12, true, 8.0, Some("rack cabling")),
        ];
        assert_snapshot!(format_logs(&logs), @r"
        DATE        IN     OUT    LUNCH  HOURS    LOCATION    ID
        2024-02-13  08:00  17:00  no     9h 0m    on-site     log-b
        2024-02-12  08:00  17:00  yes    8h 0m    on-site     log-a
                    rack cabling
        ");
    }

    #[test]
    fn format_logs_handles_empty() {
        assert_eq!(format_logs(&[]), "No time logs recorded.\n");
    }

    #[test]
    fn list_json_outputs_entries() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config {
            database_path: temp.path().join("ojt.db"),
            ..Config::default()
        };
        let user = UserId::new("me").unwrap();
        let mut db = open_database(&config).unwrap();
        let entry = stored("unused", 12, true, 8.0, None).entry;
        let id = db.insert_time_log(&user, &entry).unwrap();

        let args = ListArgs {
            from: None,
            to: None,
            limit: None,
            json: true,
        };
        let mut output = Vec::new();
        run(&mut output, &args, &user, &config).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        let items = parsed.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], id.as_str());
        assert_eq!(items[0]["date"], "2024-02-12");
        assert_eq!(items[0]["time_in"], "08:00");
        assert_eq!(items[0]["include_lunch_break"], true);
        assert_eq!(items[0]["hours_worked"], 8.0);
    }
}
