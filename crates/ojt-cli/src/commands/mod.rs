//! CLI subcommand implementations.

pub mod delete;
pub mod list;
pub mod log;
pub mod settings;
pub mod stats;
pub mod util;
