//! Workspace storage and utility functions for the task board.
//!
//! This module provides the `Database` struct holding tasks, clients and team members,
//! along with helpers for date parsing, formatting and resolving task identifiers.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::client::{client_name, Client, ClientLink};
use crate::error::{FlowError, FlowResult};
use crate::fields::*;
use crate::task::Task;
use crate::team::Member;

/// In-memory workspace, persisted as one JSON file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl Database {
    /// Load the workspace from a JSON file. A missing file is an empty workspace.
    pub fn load(path: &Path) -> FlowResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no workspace file, starting empty");
            return Ok(Database::default());
        }
        let buf = fs::read_to_string(path).map_err(|source| FlowError::IoPath {
            path: path.to_path_buf(),
            source,
        })?;
        let db: Database = serde_json::from_str(&buf).map_err(|source| FlowError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            path = %path.display(),
            tasks = db.tasks.len(),
            clients = db.clients.len(),
            members = db.members.len(),
            "loaded workspace"
        );
        Ok(db)
    }

    /// Save to JSON using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> FlowResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| FlowError::IoPath {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(self)?;
        let write = |p: &Path| -> std::io::Result<()> {
            let mut f = File::create(p)?;
            f.write_all(data.as_bytes())?;
            f.flush()
        };
        write(&tmp).map_err(|source| FlowError::IoPath { path: tmp.clone(), source })?;
        fs::rename(&tmp, path).map_err(|source| FlowError::IoPath {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), tasks = self.tasks.len(), "saved workspace");
        Ok(())
    }

    /// A fresh short id not used by any task, client or member currently in the workspace.
    pub fn new_id(&self) -> String {
        loop {
            let id: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
            let taken = self.tasks.iter().any(|t| t.id == id)
                || self.clients.iter().any(|c| c.id == id)
                || self.members.iter().any(|m| m.id == id);
            if !taken {
                return id;
            }
        }
    }

    /// Get a task by ID.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a task by ID.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Replace the task with the same id. Returns false when no such task exists.
    pub fn replace(&mut self, task: Task) -> bool {
        match self.get_mut(&task.id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    /// Remove a task by ID, returning it.
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(idx))
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Remove a client. Tasks pointing at it keep their (now dangling) client id.
    pub fn remove_client(&mut self, id: &str) -> Option<Client> {
        let idx = self.clients.iter().position(|c| c.id == id)?;
        Some(self.clients.remove(idx))
    }

    /// Find a client by id or by case-insensitive name.
    pub fn resolve_client(&self, identifier: &str) -> FlowResult<&Client> {
        self.client(identifier)
            .or_else(|| {
                self.clients
                    .iter()
                    .find(|c| c.name.to_lowercase() == identifier.to_lowercase())
            })
            .ok_or_else(|| FlowError::ClientNotFound(identifier.to_string()))
    }

    /// Find a member by id or exact name.
    pub fn resolve_member(&self, identifier: &str) -> FlowResult<&Member> {
        self.members
            .iter()
            .find(|m| m.id == identifier)
            .or_else(|| self.members.iter().find(|m| m.name == identifier))
            .ok_or_else(|| FlowError::MemberNotFound(identifier.to_string()))
    }

    pub fn remove_member(&mut self, id: &str) -> Option<Member> {
        let idx = self.members.iter().position(|m| m.id == id)?;
        Some(self.members.remove(idx))
    }

    /// Resolve a task identifier (either ID or title) to a task ID.
    /// Fails if the title has multiple matches and suggests using the ID instead.
    pub fn resolve_task_identifier(&self, identifier: &str) -> FlowResult<String> {
        if let Some(t) = self.get(identifier) {
            return Ok(t.id.clone());
        }

        let wanted = identifier.to_lowercase();
        let matches: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| task.title.to_lowercase() == wanted)
            .collect();

        match matches.len() {
            0 => Err(FlowError::TaskNotFound(identifier.to_string())),
            1 => Ok(matches[0].id.clone()),
            _ => {
                let mut candidates = String::new();
                for task in matches {
                    candidates.push_str(&format!("  ID {}: {} ({})", task.id, task.title, task.status));
                    if let Some(name) = task.client_id.as_deref().and_then(|c| client_name(&self.clients, c)) {
                        candidates.push_str(&format!(" [client: {}]", name));
                    }
                    candidates.push('\n');
                }
                Err(FlowError::AmbiguousTask {
                    title: identifier.to_string(),
                    candidates,
                })
            }
        }
    }

    /// Starter workspace: two clients, two members and four tasks.
    pub fn sample() -> Self {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
        let mut db = Database::default();

        let mut techflow = Client::new("1".into(), "TechFlow Solutions");
        techflow.description = "Software company based in Sao Paulo.".into();
        techflow.wiki = "# Client Wiki: TechFlow\n\nB2B SaaS focus.\n\n### Key points\n- Main contact: Roberto Silva\n- Current focus: SEO and performance campaigns.".into();
        techflow.links = vec![ClientLink {
            id: "l1".into(),
            label: "Main website".into(),
            url: "https://techflow.example.com".into(),
        }];
        techflow.tags = vec!["Tech".into(), "SaaS".into(), "B2B".into()];

        let mut garden = Client::new("2".into(), "Green Garden Co.");
        garden.description = "Plants and gardening e-commerce.".into();
        garden.wiki = "# Green Garden Wiki\n\nSustainability and design.\n\n### Strategy\n- Instagram is the main channel.".into();
        garden.tags = vec!["E-commerce".into(), "Green".into()];
        db.clients = vec![techflow, garden];

        db.members = vec![
            Member {
                id: "u1".into(),
                name: "Alice".into(),
                email: "alice@agency.example".into(),
                role: "Admin".into(),
                joined_at: "2023-11-10".into(),
                photo: None,
                birth_date: d("1995-12-15"),
            },
            Member {
                id: "u2".into(),
                name: "Bob".into(),
                email: "bob@agency.example".into(),
                role: "Member".into(),
                joined_at: "2023-11-12".into(),
                photo: None,
                birth_date: d("1992-05-20"),
            },
        ];

        let seed = [
            ("t1", "Monthly SEO report", "Compile Search Console and Semrush data.", Status::InProgress, Priority::High, "Alice", "2023-12-15", "1"),
            ("t2", "Christmas campaign creatives", "Create 3 banner variations for Instagram.", Status::ToDo, Priority::Medium, "Bob", "2023-12-20", "2"),
            ("t3", "Ads budget adjustment", "Optimise bids for top-of-funnel campaigns.", Status::Review, Priority::High, "Alice", "2023-12-18", "1"),
            ("t4", "Newsletter copy", "Write 3 subject line variations.", Status::Done, Priority::Low, "Bob", "2023-12-10", "2"),
        ];
        for (id, title, desc, status, priority, assignee, due, client) in seed {
            if let Some(due_date) = d(due) {
                db.tasks.push(Task {
                    id: id.into(),
                    title: title.into(),
                    description: desc.into(),
                    status,
                    priority,
                    assignee: assignee.into(),
                    due_date,
                    client_id: Some(client.into()),
                    tags: Vec::new(),
                    kind: None,
                });
            }
        }
        db
    }
}

/// Split comma-separated tag inputs, trimming each and dropping empties.
/// Tags keep their case since matching is exact.
pub fn split_tags(inputs: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for raw in inputs {
        for part in raw.split(',') {
            let tag = part.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
    }
    tags
}

/// Parse human-readable due date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "monday".."sunday" (this week's occurrence) and "next monday" etc.
/// - "end of week", "end of month"
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD" format
pub fn parse_due_input(s: &str, today: NaiveDate) -> FlowResult<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Ok(today),
        "tomorrow" => return Ok(today + Duration::days(1)),
        "yesterday" => return Ok(today - Duration::days(1)),
        "end of week" | "eow" => {
            let weekday = today.weekday().num_days_from_monday() as i64;
            return Ok(today + Duration::days(6 - weekday));
        }
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            if let Some(first_of_next) = NaiveDate::from_ymd_opt(year, month, 1) {
                return Ok(first_of_next - Duration::days(1));
            }
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return Duration::try_days(days)
                    .and_then(|d| today.checked_add_signed(d))
                    .ok_or_else(|| FlowError::InvalidDate(s.to_string()));
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return Duration::try_weeks(weeks)
                    .and_then(|d| today.checked_add_signed(d))
                    .ok_or_else(|| FlowError::InvalidDate(s.to_string()));
            }
        }
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];
    let current_day = today.weekday().num_days_from_monday() as i64;
    for (day_name, target_day) in weekdays {
        let days_ahead = (target_day + 7 - current_day) % 7;
        if s == day_name {
            return Ok(today + Duration::days(days_ahead));
        }
        if s == format!("next {}", day_name) {
            let days_to_add = if days_ahead == 0 { 7 } else { days_ahead + 7 };
            return Ok(today + Duration::days(days_to_add));
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| FlowError::InvalidDate(s.to_string()))
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: NaiveDate, today: NaiveDate) -> String {
    let delta = (due - today).num_days();
    if delta == 0 {
        "today".into()
    } else if delta == 1 {
        "tomorrow".into()
    } else if delta > 1 {
        format!("in {}d", delta)
    } else {
        format!("{}d late", -delta)
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task], clients: &[Client], today: NaiveDate) {
    println!(
        "{:<9} {:<12} {:<7} {:<10} {:<10} {:<16} {}",
        "ID", "Status", "Pri", "Due", "Assignee", "Client", "Title [tags]"
    );
    for t in tasks {
        let tags = if t.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", t.tags.join(","))
        };
        let client = t
            .client_id
            .as_deref()
            .map(|c| client_name(clients, c).unwrap_or(c))
            .unwrap_or("-");
        println!(
            "{:<9} {:<12} {:<7} {:<10} {:<10} {:<16} {}{}",
            t.id,
            t.status,
            t.priority,
            format_due_relative(t.due_date, today),
            truncate(&t.assignee, 10),
            truncate(client, 16),
            t.title,
            tags
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let db = Database::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(db, Database::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("workspace.json");
        let db = Database::sample();
        db.save(&path).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(Database::load(&path).unwrap(), db);
    }

    #[test]
    fn test_load_rejects_unknown_status() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("workspace.json");
        fs::write(
            &path,
            r#"{"tasks":[{"id":"x","title":"T","status":"Blocked","priority":"Low","dueDate":"2024-01-01"}]}"#,
        )
        .unwrap();
        assert!(matches!(Database::load(&path), Err(FlowError::Corrupt { .. })));
    }

    #[test]
    fn test_new_id_is_unique() {
        let mut db = Database::default();
        for _ in 0..50 {
            let id = db.new_id();
            assert_eq!(id.len(), 8);
            assert!(db.get(&id).is_none());
            db.tasks.push(Task::new(id, Status::ToDo, "Me", date("2024-01-01")));
        }
    }

    #[test]
    fn test_replace_and_remove() {
        let mut db = Database::sample();
        let mut t = db.get("t2").cloned().unwrap();
        t.status = Status::Done;
        assert!(db.replace(t));
        assert_eq!(db.get("t2").unwrap().status, Status::Done);
        assert_eq!(db.remove("t2").map(|t| t.id), Some("t2".to_string()));
        assert!(db.remove("t2").is_none());
        assert!(!db.replace(Task::new("zz".into(), Status::ToDo, "Me", date("2024-01-01"))));
    }

    #[test]
    fn test_remove_client_keeps_tasks() {
        let mut db = Database::sample();
        assert!(db.remove_client("1").is_some());
        assert_eq!(db.get("t1").unwrap().client_id.as_deref(), Some("1"));
        assert!(db.resolve_client("1").is_err());
    }

    #[test]
    fn test_resolve_task_identifier() {
        let mut db = Database::sample();
        assert_eq!(db.resolve_task_identifier("t3").unwrap(), "t3");
        assert_eq!(db.resolve_task_identifier("newsletter COPY").unwrap(), "t4");
        assert!(matches!(db.resolve_task_identifier("missing"), Err(FlowError::TaskNotFound(_))));

        let mut dup = db.get("t4").cloned().unwrap();
        dup.id = "t5".into();
        db.tasks.push(dup);
        assert!(matches!(
            db.resolve_task_identifier("Newsletter copy"),
            Err(FlowError::AmbiguousTask { .. })
        ));
    }

    #[test]
    fn test_resolve_client_and_member() {
        let db = Database::sample();
        assert_eq!(db.resolve_client("green garden co.").unwrap().id, "2");
        assert_eq!(db.resolve_member("Bob").unwrap().id, "u2");
        assert_eq!(db.resolve_member("u1").unwrap().name, "Alice");
        assert!(db.resolve_member("bob").is_err());
    }

    #[test]
    fn test_split_tags() {
        let tags = split_tags(&["seo, Report".to_string(), "seo,,ads".to_string()]);
        assert_eq!(tags, vec!["seo", "Report", "ads"]);
    }

    #[test]
    fn test_parse_due_input() {
        let today = date("2024-06-12"); // Wednesday
        assert_eq!(parse_due_input("today", today).unwrap(), today);
        assert_eq!(parse_due_input("Tomorrow", today).unwrap(), date("2024-06-13"));
        assert_eq!(parse_due_input("in 3d", today).unwrap(), date("2024-06-15"));
        assert_eq!(parse_due_input("in 2w", today).unwrap(), date("2024-06-26"));
        assert_eq!(parse_due_input("friday", today).unwrap(), date("2024-06-14"));
        assert_eq!(parse_due_input("wed", today).unwrap(), today);
        assert_eq!(parse_due_input("next wednesday", today).unwrap(), date("2024-06-19"));
        assert_eq!(parse_due_input("eow", today).unwrap(), date("2024-06-16"));
        assert_eq!(parse_due_input("end of month", today).unwrap(), date("2024-06-30"));
        assert_eq!(parse_due_input("end of month", date("2024-12-05")).unwrap(), date("2024-12-31"));
        assert_eq!(parse_due_input("2024-07-01", today).unwrap(), date("2024-07-01"));
        assert!(matches!(parse_due_input("someday", today), Err(FlowError::InvalidDate(_))));
    }

    #[test]
    fn test_parse_due_input_out_of_range_offsets() {
        let today = date("2024-06-10");
        for input in ["in 99999999d", "in 100000000w", "in 999999999999d", "in -99999999d"] {
            assert!(
                matches!(parse_due_input(input, today), Err(FlowError::InvalidDate(_))),
                "{input} should be rejected"
            );
        }
        assert_eq!(parse_due_input("in -2d", today).unwrap(), date("2024-06-08"));
    }

    #[test]
    fn test_format_due_relative() {
        let today = date("2024-06-10");
        assert_eq!(format_due_relative(today, today), "today");
        assert_eq!(format_due_relative(date("2024-06-11"), today), "tomorrow");
        assert_eq!(format_due_relative(date("2024-06-14"), today), "in 4d");
        assert_eq!(format_due_relative(date("2024-06-08"), today), "2d late");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title", 6), "a lon…");
    }
}
