//! Stats command for showing progress toward the required hours.
//!
//! Statistics are recomputed from every stored entry on each run.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use clap::Args;

use ojt_core::{ProgressSummary, UserId, aggregate_statistics};
use ojt_db::TimeLogQuery;

use super::util::{format_hours, open_database, progress_bar, statistics_config};
use crate::Config;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(
    writer: &mut W,
    args: &StatsArgs,
    user: &UserId,
    config: &Config,
) -> Result<()> {
    let db = open_database(config)?;
    let logs = db.list_time_logs(user, &TimeLogQuery::default())?;
    let stats_config = statistics_config(&db, config)?;
    let summary = aggregate_statistics(&logs, &stats_config)?;
    tracing::debug!(
        entries = logs.len(),
        total_hours = summary.total_hours,
        "computed progress summary"
    );

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        write!(writer, "{}", format_stats(&summary)?)?;
    }
    Ok(())
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Formats the human-readable progress report.
pub fn format_stats(summary: &ProgressSummary) -> Result<String, std::fmt::Error> {
    let mut output = String::new();
    let date_or_dash = |date: Option<chrono::NaiveDate>| {
        date.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
    };

    writeln!(output, "OJT PROGRESS")?;
    writeln!(output, "────────────")?;
    writeln!(
        output,
        "Completed: {} of {} ({:.1}%)",
        format_hours(summary.total_hours),
        format_hours(summary.required_hours),
        summary.progress_percentage
    )?;
    writeln!(output, "Progress:  {}", progress_bar(summary.progress_percentage))?;
    writeln!(output, "Remaining: {}", format_hours(summary.remaining_hours))?;
    writeln!(
        output,
        "Days:      {} (avg {}/day)",
        summary.total_days,
        format_hours(summary.daily_average)
    )?;
    writeln!(output, "Started:   {}", date_or_dash(summary.start_date))?;
    writeln!(output, "Last log:  {}", date_or_dash(summary.last_log_date))?;

    if summary.total_days == 0 {
        writeln!(output)?;
        writeln!(output, "No time logs recorded yet.")?;
        return Ok(output);
    }

    writeln!(output)?;
    writeln!(output, "WEEKLY")?;
    writeln!(output, "──────")?;
    for week in &summary.weekly_hours {
        writeln!(
            output,
            "{}-W{:02}  week of {}  {:>8}  ({})",
            week.iso_year,
            week.week,
            week.week_start.format("%Y-%m-%d"),
            format_hours(week.hours),
            plural(week.days, "day")
        )?;
    }

    writeln!(output)?;
    writeln!(output, "MONTHLY")?;
    writeln!(output, "───────")?;
    for month in &summary.monthly_hours {
        writeln!(
            output,
            "{}-{:02}  {:>8}  ({})",
            month.year,
            month.month,
            format_hours(month.hours),
            plural(month.days, "day")
        )?;
    }

    writeln!(output)?;
    writeln!(output, "RECENT DAYS")?;
    writeln!(output, "───────────")?;
    for day in &summary.daily_hours {
        writeln!(
            output,
            "{}  {:>8}  ({})",
            day.date.format("%Y-%m-%d"),
            format_hours(day.hours),
            plural(day.sessions, "session")
        )?;
    }

    Ok(output)
}
