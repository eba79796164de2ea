//! Configuration loading and management.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use ojt_core::accounting::{DEFAULT_MAX_WEEKS, DEFAULT_REQUIRED_HOURS};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// User whose entries are read and written when `--user` is not given.
    pub user: String,

    /// Required hours used when no `required_hours` setting is stored.
    pub required_hours: f64,

    /// Start date reported before any entry exists, unless a `start_date`
    /// setting is stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    /// Number of ISO weeks shown in the weekly breakdown.
    pub max_weeks: usize,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("ojt.db"),
            user: "default".to_string(),
            required_hours: DEFAULT_REQUIRED_HOURS,
            start_date: None,
            max_weeks: DEFAULT_MAX_WEEKS,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (OJT_*)
        figment = figment.merge(Env::prefixed("OJT_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for ojt.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ojt"))
}

/// Returns the platform-specific data directory for ojt.
///
/// On Linux: `~/.local/share/ojt`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("ojt"))
}
