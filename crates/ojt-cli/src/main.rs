use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ojt_cli::commands::{delete, list, log, settings, stats, util};
use ojt_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so JSON output on stdout stays parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut stdout = io::stdout().lock();
    match command {
        Commands::Log(args) => {
            let user = util::resolve_user(cli.user.as_deref(), &config)?;
            log::run(&mut stdout, args, &user, &config)?;
        }
        Commands::List(args) => {
            let user = util::resolve_user(cli.user.as_deref(), &config)?;
            list::run(&mut stdout, args, &user, &config)?;
        }
        Commands::Delete(args) => {
            let user = util::resolve_user(cli.user.as_deref(), &config)?;
            delete::run(&mut stdout, args, &user, &config)?;
        }
        Commands::Stats(args) => {
            let user = util::resolve_user(cli.user.as_deref(), &config)?;
            stats::run(&mut stdout, args, &user, &config)?;
        }
        Commands::Settings { action } => {
            settings::run(&mut stdout, action, &config)?;
        }
    }

    Ok(())
}
