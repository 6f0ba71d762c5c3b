//! # flowdesk
//!
//! Task board, team leaderboard and status dashboards for a small creative agency,
//! driven from the terminal.
//!
//! The computational core is pure and takes its inputs as slices plus an explicit
//! "today", so every view can be recomputed from a snapshot of the workspace:
//!
//! - [`filter::filter_tasks`] narrows the board with a multi-field [`filter::TaskFilter`].
//! - [`leaderboard::compute_leaderboard`] ranks team members by delivery score.
//! - [`stats::aggregate_by_status`] counts tasks per workflow column.
//!
//! Everything else ([`db`], [`cmd`], [`tui`]) is the shell around it: a JSON workspace
//! file, a `clap` command line and a `ratatui` dashboard.

pub mod cli;
pub mod client;
pub mod clock;
pub mod cmd;
pub mod db;
pub mod error;
pub mod fields;
pub mod filter;
pub mod leaderboard;
pub mod stats;
pub mod task;
pub mod team;
pub mod tui {
    pub mod colors;
    pub mod dashboard;
    pub mod run;
}
