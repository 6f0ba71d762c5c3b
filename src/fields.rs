//! Enumerations and field types for the task board.
//!
//! Status, priority and the due-date range filter are closed sets. Raw strings from
//! the command line or the workspace file are validated here and nowhere else.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// Workflow status of a task, ordered left to right along the board.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Review")]
    Review,
    #[serde(rename = "Done")]
    Done,
}

impl Status {
    /// Board column order.
    pub const ALL: [Status; 4] = [Status::ToDo, Status::InProgress, Status::Review, Status::Done];

    pub fn label(self) -> &'static str {
        match self {
            Status::ToDo => "To Do",
            Status::InProgress => "In Progress",
            Status::Review => "Review",
            Status::Done => "Done",
        }
    }

    /// Position of this status in [`Status::ALL`].
    pub fn column(self) -> usize {
        match self {
            Status::ToDo => 0,
            Status::InProgress => 1,
            Status::Review => 2,
            Status::Done => 3,
        }
    }

    pub fn is_done(self) -> bool {
        self == Status::Done
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Status {
    type Err = FlowError;

    /// Accepts the stored labels ("In Progress") as well as CLI forms ("in-progress").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise_key(s).as_str() {
            "todo" => Ok(Status::ToDo),
            "inprogress" => Ok(Status::InProgress),
            "review" => Ok(Status::Review),
            "done" => Ok(Status::Done),
            _ => Err(FlowError::UnknownStatus(s.to_string())),
        }
    }
}

/// Priority classification for task importance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Priority {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise_key(s).as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(FlowError::UnknownPriority(s.to_string())),
        }
    }
}

/// Filtering options for tasks based on due dates.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum DateRange {
    Today,
    Overdue,
    ThisWeek,
    #[default]
    All,
}

impl FromStr for DateRange {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise_key(s).as_str() {
            "today" => Ok(DateRange::Today),
            "overdue" => Ok(DateRange::Overdue),
            "thisweek" => Ok(DateRange::ThisWeek),
            "all" => Ok(DateRange::All),
            _ => Err(FlowError::UnknownDateRange(s.to_string())),
        }
    }
}

/// Lowercase and drop separators so "In Progress", "in-progress" and "in_progress" compare equal.
fn normalise_key(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}
