//! Multi-field task filtering for the board and list views.
//!
//! Every set field must match (logical AND). Unset fields match everything, so
//! `TaskFilter::default()` is the identity filter.

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::fields::*;
use crate::task::Task;

/// Filter criteria for listing tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Case-insensitive substring of title or description. Not trimmed.
    pub search: Option<String>,
    pub client_id: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub kind: Option<String>,
    pub assignee: Option<String>,
    pub tag: Option<String>,
    pub date_range: DateRange,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    /// Whether `task` passes every active criterion. `needle` is the lowercased search.
    fn matches(&self, task: &Task, needle: Option<&str>, today: NaiveDate) -> bool {
        if let Some(needle) = needle {
            if !needle.is_empty()
                && !task.title.to_lowercase().contains(needle)
                && !task.description.to_lowercase().contains(needle)
            {
                return false;
            }
        }
        if let Some(ref c) = self.client_id {
            if task.client_id.as_deref() != Some(c.as_str()) {
                return false;
            }
        }
        if let Some(s) = self.status {
            if task.status != s {
                return false;
            }
        }
        if let Some(p) = self.priority {
            if task.priority != p {
                return false;
            }
        }
        if let Some(ref k) = self.kind {
            if task.kind.as_deref() != Some(k.as_str()) {
                return false;
            }
        }
        if let Some(ref a) = self.assignee {
            if task.assignee != *a {
                return false;
            }
        }
        if let Some(ref tg) = self.tag {
            if !task.has_tag(tg) {
                return false;
            }
        }
        in_date_range(task, self.date_range, today)
    }
}

/// Due-date window check for a single task.
pub fn in_date_range(task: &Task, range: DateRange, today: NaiveDate) -> bool {
    match range {
        DateRange::Today => task.due_date == today,
        DateRange::Overdue => task.is_overdue(today),
        DateRange::ThisWeek => task.due_date >= today && task.due_date <= today + Duration::days(7),
        DateRange::All => true,
    }
}

/// Tasks matching `filter`, in input order.
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter, today: NaiveDate) -> Vec<&'a Task> {
    let needle = filter.search.as_ref().map(|s| s.to_lowercase());
    let out: Vec<&Task> = tasks
        .iter()
        .filter(|t| filter.matches(t, needle.as_deref(), today))
        .collect();
    debug!(total = tasks.len(), matched = out.len(), "filtered tasks");
    out
}
