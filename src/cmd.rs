//! Command implementations for the CLI interface.
//!
//! This module contains the subcommand definitions and their handlers, from task
//! CRUD through filtered listing to the leaderboard and dashboard views.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use tracing::{info, warn};

use crate::cli::Cli;
use crate::client::{client_name, parse_link_arg, Client};
use crate::db::*;
use crate::error::{FlowError, FlowResult};
use crate::fields::*;
use crate::filter::{filter_tasks, TaskFilter};
use crate::leaderboard::{compute_leaderboard, orphaned_assignees};
use crate::stats::{aggregate_by_status, dashboard_summary, group_by_status, tag_counts, upcoming_deadlines};
use crate::task::Task;
use crate::team::{birthdays_today, is_birthday, Member};

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the dashboard UI.
    Ui,

    /// Create the workspace file.
    Init {
        /// Seed it with sample clients, members and tasks.
        #[arg(long)]
        sample: bool,
        /// Overwrite an existing workspace.
        #[arg(long)]
        force: bool,
    },

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Client ID or name.
        #[arg(long)]
        client: Option<String>,
        /// Assignee name (defaults to --user).
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        #[arg(long, value_enum, default_value_t = Status::ToDo)]
        status: Status,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "friday" or "in Nd". Defaults to today.
        #[arg(long)]
        due: Option<String>,
        /// Comma-separated tags. May be repeated.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Free-text task type, e.g. "Social" or "Report".
        #[arg(long = "type")]
        kind: Option<String>,
    },

    /// List tasks with optional filters.
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task by ID or title.
    View {
        /// Task ID or title to view
        id: String,
    },

    /// Update fields on a task.
    Update {
        /// Task ID or title to update
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        /// Client ID or name.
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long, value_enum)]
        status: Option<Status>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long = "type")]
        kind: Option<String>,
        /// Add tags. May be repeated and comma-separated.
        #[arg(long = "add-tag")]
        add_tags: Vec<String>,
        /// Remove tags. May be repeated and comma-separated.
        #[arg(long = "rm-tag")]
        rm_tags: Vec<String>,
        /// Detach the task from its client.
        #[arg(long)]
        clear_client: bool,
        /// Clear the task type.
        #[arg(long)]
        clear_type: bool,
    },

    /// Move a task to another board column.
    Move {
        /// Task ID or title
        id: String,
        #[arg(value_enum)]
        status: Status,
    },

    /// Delete a task by ID or title.
    Delete {
        /// Task ID or title to delete
        id: String,
    },

    /// Show the kanban board as columns of tasks.
    Board {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Rank team members by delivery score.
    Leaderboard,

    /// Task counts per status and dashboard figures.
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List distinct tags and counts.
    Tags,

    /// Manage clients.
    Client {
        #[command(subcommand)]
        action: ClientAction,
    },

    /// Manage team members.
    Member {
        #[command(subcommand)]
        action: MemberAction,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Filter flags shared by the list, board and stats views.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive text in title or description.
    #[arg(long, short)]
    pub search: Option<String>,
    /// Client ID or name.
    #[arg(long)]
    pub client: Option<String>,
    #[arg(long, value_enum)]
    pub status: Option<Status>,
    #[arg(long, value_enum)]
    pub priority: Option<Priority>,
    #[arg(long = "type")]
    pub kind: Option<String>,
    #[arg(long)]
    pub assignee: Option<String>,
    #[arg(long)]
    pub tag: Option<String>,
    /// Due filter: today | overdue | this-week | all.
    #[arg(long, value_enum, default_value_t = DateRange::All)]
    pub due: DateRange,
}

impl FilterArgs {
    /// Build a `TaskFilter`, resolving a client name to its id.
    pub fn to_filter(&self, db: &Database) -> TaskFilter {
        let client_id = self.client.as_ref().map(|c| match db.resolve_client(c) {
            Ok(client) => client.id.clone(),
            Err(_) => {
                warn!(client = %c, "no such client, filtering on the raw id");
                c.clone()
            }
        });
        TaskFilter {
            search: self.search.clone(),
            client_id,
            status: self.status,
            priority: self.priority,
            kind: self.kind.clone(),
            assignee: self.assignee.clone(),
            tag: self.tag.clone(),
            date_range: self.due,
        }
    }
}

#[derive(Subcommand)]
pub enum ClientAction {
    /// Register a new client.
    Add {
        name: String,
        #[arg(long)]
        desc: Option<String>,
        /// Comma-separated tags.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List clients with their open task counts.
    List,
    /// Show a client's description, tags, links and wiki.
    View {
        /// Client ID or name
        id: String,
    },
    /// Edit a client's profile, wiki and links.
    Update {
        /// Client ID or name
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        /// Replace the wiki page (markdown).
        #[arg(long, conflicts_with = "wiki_file")]
        wiki: Option<String>,
        /// Replace the wiki page with the contents of a file.
        #[arg(long)]
        wiki_file: Option<PathBuf>,
        #[arg(long)]
        logo: Option<String>,
        #[arg(long)]
        cover: Option<String>,
        /// Add a link as label=url. May be repeated.
        #[arg(long = "add-link")]
        add_links: Vec<String>,
        /// Remove a link by id or label. May be repeated.
        #[arg(long = "rm-link")]
        rm_links: Vec<String>,
        /// Add tags. May be repeated and comma-separated.
        #[arg(long = "add-tag")]
        add_tags: Vec<String>,
        /// Remove tags. May be repeated and comma-separated.
        #[arg(long = "rm-tag")]
        rm_tags: Vec<String>,
    },
    /// Delete a client. Its tasks are kept.
    Delete {
        /// Client ID or name
        id: String,
    },
}

#[derive(Subcommand)]
pub enum MemberAction {
    /// Invite a team member.
    Add {
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "Member")]
        role: String,
        /// Birth date, YYYY-MM-DD.
        #[arg(long)]
        birth_date: Option<NaiveDate>,
    },
    /// List team members.
    List,
    /// Remove a team member.
    Delete {
        /// Member ID or name
        id: String,
    },
}

/// Create the workspace file.
pub fn cmd_init(db_path: &Path, sample: bool, force: bool) -> FlowResult<()> {
    if db_path.exists() && !force {
        println!("Workspace already exists at {} (use --force to overwrite)", db_path.display());
        return Ok(());
    }
    let db = if sample { Database::sample() } else { Database::default() };
    db.save(db_path)?;
    println!("Created workspace at {}", db_path.display());
    Ok(())
}

fn resolve_client_id(db: &Database, client: Option<String>) -> FlowResult<Option<String>> {
    match client {
        Some(c) => Ok(Some(db.resolve_client(&c)?.id.clone())),
        None => Ok(None),
    }
}

/// Add a new task to the workspace.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    db: &mut Database,
    db_path: &Path,
    today: NaiveDate,
    user: &str,
    title: String,
    desc: Option<String>,
    client: Option<String>,
    assignee: Option<String>,
    priority: Priority,
    status: Status,
    due: Option<String>,
    tags: Vec<String>,
    kind: Option<String>,
) -> FlowResult<String> {
    if title.trim().is_empty() {
        return Err(FlowError::MissingField("title"));
    }
    let client_id = resolve_client_id(db, client)?;
    let assignee = assignee.unwrap_or_else(|| user.to_string());
    if !db.members.iter().any(|m| m.name == assignee) {
        warn!(assignee = %assignee, "assignee is not a team member; task will not count on the leaderboard");
    }

    let mut task = Task::new(db.new_id(), status, &assignee, today);
    task.title = title;
    if let Some(d) = desc {
        task.description = d;
    }
    task.priority = priority;
    if let Some(d) = due {
        task.due_date = parse_due_input(&d, today)?;
    }
    task.client_id = client_id;
    task.tags = split_tags(&tags);
    task.kind = kind.filter(|k| !k.trim().is_empty());

    let id = task.id.clone();
    db.tasks.push(task);
    db.save(db_path)?;
    println!("Added task {}", id);
    Ok(id)
}

/// List tasks matching the filter flags, in board order.
pub fn cmd_list(db: &Database, today: NaiveDate, filter: &FilterArgs, limit: Option<usize>) {
    let filter = filter.to_filter(db);
    let mut filtered = filter_tasks(&db.tasks, &filter, today);
    if let Some(n) = limit {
        filtered.truncate(n);
    }
    print_table(&filtered, &db.clients, today);
}

/// View detailed information about a specific task.
pub fn cmd_view(db: &Database, today: NaiveDate, id: &str) -> FlowResult<()> {
    let task_id = db.resolve_task_identifier(id)?;
    let task = db.get(&task_id).ok_or_else(|| FlowError::TaskNotFound(task_id.clone()))?;
    let client = match task.client_id.as_deref() {
        Some(c) => client_name(&db.clients, c).unwrap_or(c).to_string(),
        None => "-".into(),
    };
    println!("ID:           {}", task.id);
    println!("Title:        {}", task.title);
    println!("Status:       {}", task.status);
    println!("Priority:     {}", task.priority);
    println!("Assignee:     {}", if task.assignee.is_empty() { "-" } else { task.assignee.as_str() });
    println!("Client:       {}", client);
    println!("Type:         {}", task.kind.as_deref().unwrap_or("-"));
    println!("Due:          {} ({})", task.due_date, format_due_relative(task.due_date, today));
    println!("Tags:         {}", if task.tags.is_empty() { "-".into() } else { task.tags.join(",") });
    println!("Description:\n{}\n", if task.description.is_empty() { "-" } else { task.description.as_str() });
    Ok(())
}

/// Update an existing task's fields.
#[allow(clippy::too_many_arguments)]
pub fn cmd_update(
    db: &mut Database,
    db_path: &Path,
    today: NaiveDate,
    id: &str,
    title: Option<String>,
    desc: Option<String>,
    client: Option<String>,
    assignee: Option<String>,
    priority: Option<Priority>,
    status: Option<Status>,
    due: Option<String>,
    kind: Option<String>,
    add_tags: Vec<String>,
    rm_tags: Vec<String>,
    clear_client: bool,
    clear_type: bool,
) -> FlowResult<()> {
    let task_id = db.resolve_task_identifier(id)?;
    let client_id = resolve_client_id(db, client)?;
    let due = due.map(|d| parse_due_input(&d, today)).transpose()?;

    let mut task = db.get(&task_id).cloned().ok_or_else(|| FlowError::TaskNotFound(task_id.clone()))?;
    if let Some(t) = title {
        task.title = t;
    }
    if let Some(d) = desc {
        task.description = d;
    }
    if let Some(a) = assignee {
        task.assignee = a;
    }
    if let Some(p) = priority {
        task.priority = p;
    }
    if let Some(s) = status {
        task.status = s;
    }
    if let Some(d) = due {
        task.due_date = d;
    }
    if clear_client {
        task.client_id = None;
    } else if client_id.is_some() {
        task.client_id = client_id;
    }
    if clear_type {
        task.kind = None;
    } else if let Some(k) = kind.filter(|k| !k.trim().is_empty()) {
        task.kind = Some(k);
    }
    for tag in split_tags(&add_tags) {
        if !task.has_tag(&tag) {
            task.tags.push(tag);
        }
    }
    let rm = split_tags(&rm_tags);
    task.tags.retain(|t| !rm.contains(t));

    db.replace(task);
    db.save(db_path)?;
    println!("Updated task {}", task_id);
    Ok(())
}

/// Move a task to another status column.
pub fn cmd_move(db: &mut Database, db_path: &Path, id: &str, status: Status) -> FlowResult<()> {
    let task_id = db.resolve_task_identifier(id)?;
    let task = db.get_mut(&task_id).ok_or_else(|| FlowError::TaskNotFound(task_id.clone()))?;
    let from = task.status;
    task.status = status;
    db.save(db_path)?;
    info!(task = %task_id, %from, to = %status, "moved task");
    println!("Moved task {} from {} to {}", task_id, from, status);
    Ok(())
}

/// Delete a task.
pub fn cmd_delete(db: &mut Database, db_path: &Path, id: &str) -> FlowResult<()> {
    let task_id = db.resolve_task_identifier(id)?;
    let removed = db.remove(&task_id).ok_or_else(|| FlowError::TaskNotFound(task_id.clone()))?;
    db.save(db_path)?;
    println!("Deleted task {} ({})", removed.id, removed.title);
    Ok(())
}

/// Print the board one column at a time.
pub fn cmd_board(db: &Database, today: NaiveDate, filter: &FilterArgs) {
    let filter = filter.to_filter(db);
    let visible: Vec<Task> = filter_tasks(&db.tasks, &filter, today).into_iter().cloned().collect();
    for (status, tasks) in group_by_status(&visible) {
        println!("== {} ({})", status, tasks.len());
        for t in tasks {
            println!(
                "  [{:<6}] {} ({}, {}) #{}",
                t.priority,
                t.title,
                if t.assignee.is_empty() { "-" } else { t.assignee.as_str() },
                format_due_relative(t.due_date, today),
                t.id
            );
        }
    }
}

/// Print the team leaderboard.
pub fn cmd_leaderboard(db: &Database, today: NaiveDate) {
    let board = compute_leaderboard(&db.tasks, &db.members, today);
    println!(
        "{:<4} {:<20} {:>6} {:>9} {:>5} {:>7} {:>5}",
        "#", "Member", "Score", "Delivered", "Open", "Delayed", "Win%"
    );
    for (rank, p) in board.iter().enumerate() {
        println!(
            "{:<4} {:<20} {:>6} {:>9} {:>5} {:>7} {:>4}%",
            rank + 1,
            truncate(&p.name, 20),
            p.score,
            p.delivered,
            p.open,
            p.delayed,
            p.win_rate
        );
    }
    let orphans = orphaned_assignees(&db.tasks, &db.members);
    if !orphans.is_empty() {
        warn!(assignees = ?orphans, "tasks assigned to names outside the team are not ranked");
    }
}

/// Print per-status counts and dashboard figures for the filtered tasks.
pub fn cmd_stats(db: &Database, today: NaiveDate, filter: &FilterArgs) {
    let filter = filter.to_filter(db);
    let visible: Vec<Task> = filter_tasks(&db.tasks, &filter, today).into_iter().cloned().collect();

    let counts = aggregate_by_status(&visible);
    let total = counts.total().max(1);
    for (status, n) in counts.iter() {
        let bar = "#".repeat(n * 40 / total);
        println!("{:<12} {:>4} {}", status, n, bar);
    }

    let summary = dashboard_summary(&visible, today);
    println!();
    println!("Tasks:        {}", summary.total);
    println!("In progress:  {}", summary.wip);
    println!("Delivered:    {}", summary.delivered);
    println!("Overdue:      {} ({}%)", summary.overdue, summary.delay_rate);

    let upcoming = upcoming_deadlines(&visible, today, 5);
    if !upcoming.is_empty() {
        println!("\nUpcoming deadlines:");
        for t in upcoming {
            let client = t.client_id.as_deref().and_then(|c| client_name(&db.clients, c)).unwrap_or("-");
            println!("  {:<10} {:<7} {} [{}]", format_due_relative(t.due_date, today), t.priority, t.title, client);
        }
    }

    for m in birthdays_today(&db.members, today) {
        println!("\nHappy birthday, {}!", m.name);
    }
}

/// List distinct tags with counts.
pub fn cmd_tags(db: &Database) {
    for (tag, n) in tag_counts(&db.tasks) {
        println!("{:<20} {}", tag, n);
    }
}

/// Handle `client` subcommands.
pub fn cmd_client(db: &mut Database, db_path: &Path, action: ClientAction) -> FlowResult<()> {
    match action {
        ClientAction::Add { name, desc, tags } => {
            if name.trim().is_empty() {
                return Err(FlowError::MissingField("client name"));
            }
            let mut client = Client::new(db.new_id(), &name);
            if let Some(d) = desc {
                client.description = d;
            }
            if !tags.is_empty() {
                client.tags = split_tags(&tags);
            }
            let id = client.id.clone();
            db.clients.push(client);
            db.save(db_path)?;
            println!("Added client {} ({})", name.trim(), id);
        }
        ClientAction::List => {
            for c in &db.clients {
                let open = db
                    .tasks
                    .iter()
                    .filter(|t| t.client_id.as_deref() == Some(c.id.as_str()) && !t.status.is_done())
                    .count();
                let tags = if c.tags.is_empty() { String::new() } else { format!(" [{}]", c.tags.join(",")) };
                println!("{:<9} {:<28} {:>3} open{}", c.id, truncate(&c.name, 28), open, tags);
            }
        }
        ClientAction::View { id } => {
            let c = db.resolve_client(&id)?;
            let open = db
                .tasks
                .iter()
                .filter(|t| t.client_id.as_deref() == Some(c.id.as_str()) && !t.status.is_done())
                .count();
            println!("Client: {} ({})", c.name, c.id);
            println!("Description: {}", c.description);
            if !c.tags.is_empty() {
                println!("Tags: {}", c.tags.join(", "));
            }
            if let Some(logo) = &c.logo {
                println!("Logo: {}", logo);
            }
            if let Some(cover) = &c.cover_url {
                println!("Cover: {}", cover);
            }
            println!("Open tasks: {}", open);
            if !c.links.is_empty() {
                println!("\nLinks:");
                for l in &c.links {
                    println!("  [{}] {} - {}", l.id, l.label, l.url);
                }
            }
            if !c.wiki.trim().is_empty() {
                println!("\n{}", c.wiki);
            }
        }
        ClientAction::Update {
            id, name, desc, wiki, wiki_file, logo, cover, add_links, rm_links, add_tags, rm_tags,
        } => {
            let client_id = db.resolve_client(&id)?.id.clone();
            let wiki = match wiki_file {
                Some(path) => Some(fs::read_to_string(&path).map_err(|source| FlowError::IoPath { path, source })?),
                None => wiki,
            };
            let mut new_links = Vec::new();
            for arg in &add_links {
                let (label, url) = parse_link_arg(arg)?;
                new_links.push((db.new_id(), label, url));
            }
            let client = db
                .clients
                .iter_mut()
                .find(|c| c.id == client_id)
                .ok_or_else(|| FlowError::ClientNotFound(client_id.clone()))?;

            if let Some(n) = name {
                if n.trim().is_empty() {
                    return Err(FlowError::MissingField("client name"));
                }
                client.name = n.trim().to_string();
            }
            if let Some(d) = desc {
                client.description = d;
            }
            if let Some(w) = wiki {
                client.wiki = w;
            }
            if let Some(l) = logo {
                client.logo = Some(l).filter(|s| !s.trim().is_empty());
            }
            if let Some(c) = cover {
                client.cover_url = Some(c).filter(|s| !s.trim().is_empty());
            }
            for key in &rm_links {
                client.remove_link(key)?;
            }
            for (link_id, label, url) in new_links {
                client.add_link(link_id, &label, &url);
            }
            for tag in split_tags(&add_tags) {
                if !client.tags.contains(&tag) {
                    client.tags.push(tag);
                }
            }
            let rm = split_tags(&rm_tags);
            client.tags.retain(|t| !rm.contains(t));

            db.save(db_path)?;
            info!(client = %client_id, "updated client");
            println!("Updated client {}", client_id);
        }
        ClientAction::Delete { id } => {
            let client_id = db.resolve_client(&id)?.id.clone();
            if let Some(c) = db.remove_client(&client_id) {
                db.save(db_path)?;
                println!("Deleted client {} ({})", c.name, c.id);
            }
        }
    }
    Ok(())
}

/// Handle `member` subcommands.
pub fn cmd_member(db: &mut Database, db_path: &Path, today: NaiveDate, action: MemberAction) -> FlowResult<()> {
    match action {
        MemberAction::Add { name, email, role, birth_date } => {
            let name = name.trim().to_string();
            let email = email.trim().to_string();
            if name.is_empty() {
                return Err(FlowError::MissingField("member name"));
            }
            if email.is_empty() {
                return Err(FlowError::MissingField("email"));
            }
            if db.members.iter().any(|m| m.email.eq_ignore_ascii_case(&email)) {
                return Err(FlowError::DuplicateMember(email));
            }
            let member = Member {
                id: db.new_id(),
                name: name.clone(),
                email,
                role,
                joined_at: today.to_string(),
                photo: None,
                birth_date,
            };
            let id = member.id.clone();
            db.members.push(member);
            db.save(db_path)?;
            println!("Added member {} ({})", name, id);
        }
        MemberAction::List => {
            for m in &db.members {
                let birthday = match m.birth_date {
                    Some(b) if is_birthday(Some(b), today) => format!("{} (today!)", b.format("%d %b")),
                    Some(b) => b.format("%d %b").to_string(),
                    None => "--".into(),
                };
                println!("{:<9} {:<20} {:<28} {:<8} {}", m.id, truncate(&m.name, 20), truncate(&m.email, 28), m.role, birthday);
            }
        }
        MemberAction::Delete { id } => {
            let member_id = db.resolve_member(&id)?.id.clone();
            if let Some(m) = db.remove_member(&member_id) {
                db.save(db_path)?;
                println!("Removed member {} ({})", m.name, m.id);
            }
        }
    }
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "flow", &mut io::stdout());
}
