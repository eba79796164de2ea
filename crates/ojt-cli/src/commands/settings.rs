//! Settings command for reading and writing stored settings.

use std::io::Write;

use anyhow::Result;
use clap::{Subcommand, ValueEnum};

use ojt_core::ValidationError;
use ojt_db::{REQUIRED_HOURS_KEY, START_DATE_KEY};

use super::util::{open_database, parse_date, parse_required_hours};
use crate::Config;

/// Settings that can be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum SettingKey {
    /// Hours needed to complete the training.
    RequiredHours,
    /// Start date reported before the first entry (YYYY-MM-DD).
    StartDate,
}

impl SettingKey {
    /// Key used in the settings table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequiredHours => REQUIRED_HOURS_KEY,
            Self::StartDate => START_DATE_KEY,
        }
    }

    /// Validates a raw value and returns its canonical stored form.
    pub fn normalize(self, value: &str) -> Result<String, ValidationError> {
        let invalid = || ValidationError::InvalidSettingValue {
            key: self.as_str().to_string(),
            value: value.to_string(),
        };
        match self {
            Self::RequiredHours => parse_required_hours(value)
                .map(|hours| hours.to_string())
                .map_err(|_| invalid()),
            Self::StartDate => parse_date(value)
                .map(|date| date.format("%Y-%m-%d").to_string())
                .map_err(|_| invalid()),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Show a stored setting.
    Get { key: SettingKey },
    /// Store a setting.
    Set { key: SettingKey, value: String },
    /// Show all stored settings.
    List,
}

pub fn run<W: Write>(writer: &mut W, action: &SettingsAction, config: &Config) -> Result<()> {
    let mut db = open_database(config)?;
    match action {
        SettingsAction::Get { key } => match db.get_setting(key.as_str())? {
            Some(value) => writeln!(writer, "{} = {value}", key.as_str())?,
            None => writeln!(writer, "{} is not set", key.as_str())?,
        },
        SettingsAction::Set { key, value } => {
            let value = key.normalize(value)?;
            db.set_setting(key.as_str(), &value)?;
            tracing::info!(key = key.as_str(), %value, "setting updated");
            writeln!(writer, "{} = {value}", key.as_str())?;
        }
        SettingsAction::List => {
            let settings = db.list_settings()?;
            if settings.is_empty() {
                writeln!(writer, "No settings stored.")?;
            }
            for (key, value) in settings {
                writeln!(writer, "{key} = {value}")?;
            }
        }
    }
    Ok(())
}
