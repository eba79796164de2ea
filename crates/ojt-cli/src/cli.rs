//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::delete::DeleteArgs;
use crate::commands::list::ListArgs;
use crate::commands::log::LogArgs;
use crate::commands::settings::SettingsAction;
use crate::commands::stats::StatsArgs;

/// On-the-job training hour tracker.
///
/// Logs work sessions and tracks progress toward the required training hours.
#[derive(Debug, Parser)]
#[command(name = "ojt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// User whose entries to use (defaults to the configured user).
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a work session.
    Log(LogArgs),

    /// List recorded sessions, newest first.
    List(ListArgs),

    /// Delete a recorded session.
    Delete(DeleteArgs),

    /// Show progress toward the required hours.
    Stats(StatsArgs),

    /// Read or change stored settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_log_with_lunch() {
        let cli = Cli::try_parse_from([
            "ojt",
            "--user",
            "intern",
            "log",
            "--date",
            "2024-02-12",
            "--time-in",
            "08:00",
            "--time-out",
            "17:00",
            "--lunch",
        ])
        .unwrap();

        assert_eq!(cli.user.as_deref(), Some("intern"));
        let Some(Commands::Log(args)) = cli.command else {
            panic!("expected log command");
        };
        assert!(args.lunch);
        assert_eq!(args.time_in.format("%H:%M").to_string(), "08:00");
    }

    #[test]
    fn rejects_malformed_time() {
        let result = Cli::try_parse_from(["ojt", "log", "--time-in", "8am", "--time-out", "17:00"]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_settings_key() {
        let cli = Cli::try_parse_from(["ojt", "settings", "set", "required_hours", "600"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Settings {
                action: SettingsAction::Set { .. }
            })
        ));
    }
}
