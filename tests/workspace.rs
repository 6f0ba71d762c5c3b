//! End-to-end checks over a workspace file written in the stored JSON layout.

use std::fs;

use chrono::NaiveDate;
use tempfile::tempdir;

use flowdesk::db::Database;
use flowdesk::fields::{DateRange, Status};
use flowdesk::filter::{filter_tasks, TaskFilter};
use flowdesk::leaderboard::compute_leaderboard;
use flowdesk::stats::aggregate_by_status;

const WORKSPACE: &str = r##"{
  "tasks": [
    {"id": "a1", "title": "Launch post", "description": "", "status": "Done",
     "priority": "High", "assignee": "Alice", "dueDate": "2024-01-01", "clientId": "c1",
     "tags": ["Social"], "type": "Social"},
    {"id": "a2", "title": "Quarterly report", "status": "To Do", "priority": "Medium",
     "assignee": "Alice", "dueDate": "2020-01-01", "clientId": ""},
    {"id": "b1", "title": "Banner set", "status": "In Progress", "priority": "Low",
     "assignee": "bob", "dueDate": "2024-06-05"}
  ],
  "clients": [
    {"id": "c1", "name": "TechFlow Solutions", "logo": "", "cover_url": "",
     "description": "", "wiki": "", "links": [], "tags": []}
  ],
  "members": [
    {"id": "u1", "name": "Alice", "email": "alice@agency.example", "role": "Admin",
     "joinedAt": "2023-11-10", "birthDate": ""},
    {"id": "u2", "name": "Bob", "email": "bob@agency.example", "role": "Member",
     "joinedAt": "2023-11-12", "birthDate": "1992-06-01"}
  ]
}"##;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn load_fixture() -> (tempfile::TempDir, Database) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("workspace.json");
    fs::write(&path, WORKSPACE).unwrap();
    let db = Database::load(&path).unwrap();
    (dir, db)
}

#[test]
fn test_leaderboard_from_stored_workspace() {
    let (_dir, db) = load_fixture();
    let board = compute_leaderboard(&db.tasks, &db.members, date("2024-06-01"));

    assert_eq!(board.len(), 2);
    let alice = &board[0];
    assert_eq!(alice.name, "Alice");
    assert_eq!((alice.delivered, alice.open, alice.delayed), (1, 1, 1));
    assert_eq!(alice.score, 0);
    assert_eq!(alice.win_rate, 50);

    // "bob" does not match "Bob", so Bob has nothing assigned.
    let bob = &board[1];
    assert_eq!(bob.name, "Bob");
    assert_eq!((bob.delivered, bob.open, bob.delayed, bob.score, bob.win_rate), (0, 0, 0, 0, 0));
}

#[test]
fn test_filters_and_counts_agree() {
    let (_dir, db) = load_fixture();
    let today = date("2024-06-01");

    let all = filter_tasks(&db.tasks, &TaskFilter::default(), today);
    assert_eq!(all.len(), db.tasks.len());
    assert_eq!(aggregate_by_status(&db.tasks).total(), db.tasks.len());

    let week = filter_tasks(&db.tasks, &TaskFilter::new().with_date_range(DateRange::ThisWeek), today);
    let ids: Vec<&str> = week.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["b1"]);

    let overdue = filter_tasks(&db.tasks, &TaskFilter::new().with_date_range(DateRange::Overdue), today);
    let ids: Vec<&str> = overdue.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["a2"]);

    let client = filter_tasks(&db.tasks, &TaskFilter::new().with_client("c1"), today);
    assert_eq!(client.len(), 1);
    assert_eq!(client[0].status, Status::Done);
}

#[test]
fn test_save_keeps_stored_field_names() {
    let (dir, db) = load_fixture();
    assert_eq!(db.tasks[1].client_id, None);
    assert_eq!(db.members[0].birth_date, None);

    let path = dir.path().join("copy.json");
    db.save(&path).unwrap();
    let raw = fs::read_to_string(&path).unwrap();
    for key in ["\"dueDate\"", "\"clientId\"", "\"joinedAt\"", "\"birthDate\"", "\"type\""] {
        assert!(raw.contains(key), "missing {key}");
    }
    assert!(raw.contains("\"In Progress\""));

    let reloaded = Database::load(&path).unwrap();
    assert_eq!(reloaded.tasks, db.tasks);
    assert_eq!(reloaded.members, db.members);
}

#[test]
fn test_unknown_status_fails_to_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("workspace.json");
    fs::write(&path, WORKSPACE.replace("\"In Progress\"", "\"Blocked\"")).unwrap();
    assert!(Database::load(&path).is_err());
}
