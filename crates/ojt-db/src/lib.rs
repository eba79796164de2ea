//! Storage layer for the OJT hour tracker.
//!
//! Provides persistence for time log entries and settings using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization.
//!
//! # Schema
//!
//! ## Value Formats
//!
//! - Dates are TEXT `YYYY-MM-DD`, so lexicographic order matches date order.
//! - Times of day are TEXT `HH:MM:SS`.
//! - `hours_worked` is REAL and written once at insert. It is never recomputed.
//! - `created_at` is TEXT in RFC 3339 UTC (e.g., `2024-02-12T09:00:00Z`).
//!
//! Every time log row belongs to one user; all entry queries are scoped by
//! `user_id`. Settings are global key/value pairs.

use std::path::Path;

use chrono::{NaiveDate, NaiveTime, SecondsFormat, Utc};
use ojt_core::{EntryId, LoggedHours, TimeLogEntry, UserId, ValidationError};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use thiserror::Error;
use uuid::Uuid;

/// Setting key for the required-hours target.
pub const REQUIRED_HOURS_KEY: &str = "required_hours";

/// Setting key for the start date reported before any entry exists.
pub const START_DATE_KEY: &str = "start_date";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored row could not be decoded.
    #[error("invalid time log {id}: {message}")]
    InvalidRow { id: String, message: String },
    /// A stored identifier failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A time log entry as stored for a user.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTimeLog {
    pub id: EntryId,
    pub user_id: UserId,
    pub entry: TimeLogEntry,
    pub created_at: String,
}

impl LoggedHours for StoredTimeLog {
    fn date(&self) -> NaiveDate {
        self.entry.date
    }

    fn hours_worked(&self) -> f64 {
        self.entry.hours_worked
    }
}

/// Filters for [`Database::list_time_logs`].
///
/// `from` and `to` are both inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeLogQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<usize>,
}

/// Raw column values read from a `time_logs` row.
struct TimeLogRow {
    id: String,
    user_id: String,
    date: String,
    time_in: String,
    time_out: String,
    include_lunch_break: bool,
    hours_worked: f64,
    notes: Option<String>,
    location: String,
    created_at: String,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- Time logs: one row per work session
            -- hours_worked: derived at insert, never recomputed
            CREATE TABLE IF NOT EXISTS time_logs (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                time_in TEXT NOT NULL,
                time_out TEXT NOT NULL,
                include_lunch_break INTEGER NOT NULL DEFAULT 0,
                hours_worked REAL NOT NULL,
                notes TEXT,
                location TEXT NOT NULL DEFAULT 'on-site',
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_time_logs_user_date ON time_logs(user_id, date);

            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Stores a time log entry for a user and returns its new ID.
    pub fn insert_time_log(
        &mut self,
        user_id: &UserId,
        entry: &TimeLogEntry,
    ) -> Result<EntryId, DbError> {
        let id = EntryId::new(Uuid::new_v4().to_string())?;
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        self.conn.execute(
            "
            INSERT INTO time_logs
            (id, user_id, date, time_in, time_out, include_lunch_break, hours_worked, notes, location, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                id.as_str(),
                user_id.as_str(),
                entry.date.format(DATE_FORMAT).to_string(),
                entry.time_in.format(TIME_FORMAT).to_string(),
                entry.time_out.format(TIME_FORMAT).to_string(),
                entry.include_lunch_break,
                entry.hours_worked,
                entry.notes,
                entry.location,
                created_at,
            ],
        )?;
        tracing::debug!(
            %id,
            user = %user_id,
            date = %entry.date,
            hours = entry.hours_worked,
            "time log inserted"
        );
        Ok(id)
    }

    /// Lists a user's time logs, newest first.
    pub fn list_time_logs(
        &self,
        user_id: &UserId,
        query: &TimeLogQuery,
    ) -> Result<Vec<StoredTimeLog>, DbError> {
        let mut sql = String::from(
            "
            SELECT id, user_id, date, time_in, time_out, include_lunch_break, hours_worked, notes, location, created_at
            FROM time_logs
            WHERE user_id = ?
            ",
        );
        let mut values = vec![Value::Text(user_id.as_str().to_string())];
        if let Some(from) = query.from {
            sql.push_str(" AND date >= ?");
            values.push(Value::Text(from.format(DATE_FORMAT).to_string()));
        }
        if let Some(to) = query.to {
            sql.push_str(" AND date <= ?");
            values.push(Value::Text(to.format(DATE_FORMAT).to_string()));
        }
        sql.push_str(" ORDER BY date DESC, time_in DESC, id ASC");
        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            values.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values), |row| {
            Ok(TimeLogRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                date: row.get(2)?,
                time_in: row.get(3)?,
                time_out: row.get(4)?,
                include_lunch_break: row.get(5)?,
                hours_worked: row.get(6)?,
                notes: row.get(7)?,
                location: row.get(8)?,
                created_at: row.get(9)?,
            })
        })?;
        let mut logs = Vec::new();
        for row in rows {
            logs.push(decode_time_log(row?)?);
        }
        Ok(logs)
    }

    /// Deletes one of a user's time logs.
    ///
    /// Returns `false` if no entry with that ID belongs to the user.
    pub fn delete_time_log(&mut self, user_id: &UserId, id: &EntryId) -> Result<bool, DbError> {
        let deleted = self.conn.execute(
            "DELETE FROM time_logs WHERE id = ? AND user_id = ?",
            params![id.as_str(), user_id.as_str()],
        )?;
        tracing::debug!(%id, user = %user_id, deleted, "time log delete");
        Ok(deleted > 0)
    }

    /// Reads a setting value.
    pub fn get_setting(&self, key: &str) -> Result<Option<String>, DbError> {
        let value = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Writes a setting value, replacing any previous one.
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<(), DbError> {
        let updated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        self.conn.execute(
            "
            INSERT INTO settings (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
            params![key, value, updated_at],
        )?;
        tracing::debug!(key, value, "setting stored");
        Ok(())
    }

    /// Lists all settings ordered by key.
    pub fn list_settings(&self) -> Result<Vec<(String, String)>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM settings ORDER BY key ASC")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut settings = Vec::new();
        for row in rows {
            settings.push(row?);
        }
        Ok(settings)
    }
}

fn decode_time_log(row: TimeLogRow) -> Result<StoredTimeLog, DbError> {
    let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT)
        .map_err(|e| invalid_row(&row.id, format!("date {}: {e}", row.date)))?;
    let time_in = parse_time(&row.id, &row.time_in)?;
    let time_out = parse_time(&row.id, &row.time_out)?;

    Ok(StoredTimeLog {
        id: EntryId::new(row.id)?,
        user_id: UserId::new(row.user_id)?,
        entry: TimeLogEntry {
            date,
            time_in,
            time_out,
            include_lunch_break: row.include_lunch_break,
            hours_worked: row.hours_worked,
            notes: row.notes,
            location: row.location,
        },
        created_at: row.created_at,
    })
}

fn parse_time(id: &str, value: &str) -> Result<NaiveTime, DbError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|e| invalid_row(id, format!("time {value}: {e}")))
}

fn invalid_row(id: &str, message: String) -> DbError {
    DbError::InvalidRow {
        id: id.to_string(),
        message,
    }
}
