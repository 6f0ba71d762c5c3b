//! Task data structure and related functionality.
//!
//! This module defines the `Task` record held on the board. Field names on disk follow
//! the camelCase layout of the workspace file (`dueDate`, `clientId`).

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::fields::*;

/// A unit of work ("demand") tracked through the status pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    #[serde(default)]
    pub assignee: String,
    pub due_date: NaiveDate,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "type", default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Task {
    /// A fresh card with the board's defaults: medium priority, due today, no client.
    pub fn new(id: String, status: Status, assignee: &str, today: NaiveDate) -> Self {
        Task {
            id,
            title: "New Task".to_string(),
            description: "Click to edit...".to_string(),
            status,
            priority: Priority::Medium,
            assignee: assignee.to_string(),
            due_date: today,
            client_id: None,
            tags: Vec::new(),
            kind: None,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Not done and due strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status.is_done() && self.due_date < today
    }
}

/// Read `""` (and whitespace-only strings) as an absent value.
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

/// Optional ISO date where a blank string means "not set".
pub(crate) fn blank_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_deserialize_stored_task() {
        let json = r#"{
            "id": "t1",
            "title": "Monthly SEO report",
            "description": "Pull Search Console data.",
            "status": "In Progress",
            "priority": "High",
            "assignee": "Alice",
            "dueDate": "2023-12-15",
            "clientId": "1"
        }"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.status, Status::InProgress);
        assert_eq!(t.priority, Priority::High);
        assert_eq!(t.due_date, date("2023-12-15"));
        assert_eq!(t.client_id.as_deref(), Some("1"));
        assert!(t.tags.is_empty());
        assert_eq!(t.kind, None);
    }

    #[test]
    fn test_missing_optionals_default_to_empty() {
        let json = r#"{"id":"x","title":"T","status":"Done","priority":"Low","dueDate":"2024-01-01","clientId":"","type":""}"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.description, "");
        assert_eq!(t.client_id, None);
        assert_eq!(t.kind, None);
        assert!(!t.has_tag("anything"));
    }

    #[test]
    fn test_invalid_status_or_date_is_rejected() {
        let bad_status = r#"{"id":"x","title":"T","status":"Blocked","priority":"Low","dueDate":"2024-01-01"}"#;
        assert!(serde_json::from_str::<Task>(bad_status).is_err());
        let bad_date = r#"{"id":"x","title":"T","status":"Done","priority":"Low","dueDate":"2024-1-1x"}"#;
        assert!(serde_json::from_str::<Task>(bad_date).is_err());
    }

    #[test]
    fn test_serialize_uses_stored_field_names() {
        let mut t = Task::new("a1".into(), Status::Review, "Bob", date("2024-03-05"));
        t.kind = Some("Social".into());
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["dueDate"], "2024-03-05");
        assert_eq!(v["status"], "Review");
        assert_eq!(v["type"], "Social");
        assert!(v.get("clientId").is_none());
    }

    #[test]
    fn test_new_task_defaults() {
        let today = date("2024-06-10");
        let t = Task::new("n1".into(), Status::ToDo, "Me", today);
        assert_eq!(t.title, "New Task");
        assert_eq!(t.priority, Priority::Medium);
        assert_eq!(t.due_date, today);
        assert!(!t.is_overdue(today));
        assert!(t.is_overdue(date("2024-06-11")));
    }
}
