use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::cmd::Commands;

/// File-backed agency task board.
/// Storage defaults to ~/.flowdesk/workspace.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "flow", version, about = "Agency task board, leaderboard and dashboard")]
pub struct Cli {
    /// Path to the JSON workspace file.
    #[arg(long, global = true, env = "FLOWDESK_DB")]
    pub db: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today.
    #[arg(long, global = true, env = "FLOWDESK_TODAY")]
    pub today: Option<NaiveDate>,

    /// Name of the acting user; new tasks are assigned to them.
    #[arg(long, global = true, env = "FLOWDESK_USER", default_value = "Me")]
    pub user: String,

    #[command(subcommand)]
    pub command: Commands,
}
