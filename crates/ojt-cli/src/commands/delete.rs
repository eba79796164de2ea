//! Delete command for removing a logged session.

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Args;

use ojt_core::{EntryId, UserId};

use super::util::open_database;
use crate::Config;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Entry ID to delete (as shown by `ojt list`).
    pub id: String,
}

pub fn run<W: Write>(
    writer: &mut W,
    args: &DeleteArgs,
    user: &UserId,
    config: &Config,
) -> Result<()> {
    let id = EntryId::new(&args.id).context("invalid entry ID")?;

    let mut db = open_database(config)?;
    if !db.delete_time_log(user, &id)? {
        bail!("time log not found: {id}");
    }

    tracing::info!(%id, user = %user, "session deleted");
    writeln!(writer, "Deleted time log {id}")?;
    Ok(())
}
