//! # flow - agency task board CLI
//!
//! Command-line front end for a small agency's operations desk: client tasks on a
//! four-column board, a team leaderboard and status dashboards.
//!
//! ## Quick Start
//!
//! ```bash
//! # Create a workspace with sample clients, members and tasks
//! flow init --sample
//!
//! # Add a task for a client
//! flow add "Monthly SEO report" --client "TechFlow Solutions" --priority high --due friday
//!
//! # Filter the board
//! flow list --status in-progress --due overdue
//!
//! # Rank the team
//! flow leaderboard
//!
//! # Launch the dashboard
//! flow ui
//! ```
//!
//! Data is stored in `~/.flowdesk/workspace.json` unless `--db` or `FLOWDESK_DB` points
//! elsewhere. Set `RUST_LOG=debug` to see what each command does on stderr.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use flowdesk::cli::Cli;
use flowdesk::clock::{Clock, FixedClock, SystemClock};
use flowdesk::cmd::*;
use flowdesk::db::Database;
use flowdesk::error::FlowResult;
use flowdesk::tui::run::run_dashboard;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn default_db_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".flowdesk").join("workspace.json")
}

fn run(cli: Cli) -> FlowResult<()> {
    let db_path = cli.db.unwrap_or_else(default_db_path);
    let clock: Box<dyn Clock> = match cli.today {
        Some(date) => Box::new(FixedClock(date)),
        None => Box::new(SystemClock),
    };
    let today = clock.today();

    // Commands that do not read the workspace
    match &cli.command {
        Commands::Completions { shell } => {
            cmd_completions(*shell);
            return Ok(());
        }
        Commands::Init { sample, force } => return cmd_init(&db_path, *sample, *force),
        Commands::Ui => return run_dashboard(&db_path, today),
        _ => {}
    }

    let mut db = Database::load(&db_path)?;

    match cli.command {
        Commands::Ui | Commands::Init { .. } | Commands::Completions { .. } => {
            unreachable!("handled before loading the workspace")
        }

        Commands::Add { title, desc, client, assignee, priority, status, due, tags, kind } => {
            cmd_add(&mut db, &db_path, today, &cli.user, title, desc, client, assignee, priority,
                    status, due, tags, kind)?;
        }

        Commands::List { filter, limit } => cmd_list(&db, today, &filter, limit),

        Commands::View { id } => cmd_view(&db, today, &id)?,

        Commands::Update { id, title, desc, client, assignee, priority, status, due, kind,
                           add_tags, rm_tags, clear_client, clear_type } =>
            cmd_update(&mut db, &db_path, today, &id, title, desc, client, assignee, priority,
                       status, due, kind, add_tags, rm_tags, clear_client, clear_type)?,

        Commands::Move { id, status } => cmd_move(&mut db, &db_path, &id, status)?,

        Commands::Delete { id } => cmd_delete(&mut db, &db_path, &id)?,

        Commands::Board { filter } => cmd_board(&db, today, &filter),

        Commands::Leaderboard => cmd_leaderboard(&db, today),

        Commands::Stats { filter } => cmd_stats(&db, today, &filter),

        Commands::Tags => cmd_tags(&db),

        Commands::Client { action } => cmd_client(&mut db, &db_path, action)?,

        Commands::Member { action } => cmd_member(&mut db, &db_path, today, action)?,
    }
    Ok(())
}
