//! Error type shared by the workspace store and command handlers.
//!
//! The scoring and filtering core is infallible; everything here comes from
//! parsing user input at the boundary or from reading and writing the workspace file.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("unknown status '{0}' (expected: to-do, in-progress, review, done)")]
    UnknownStatus(String),

    #[error("unknown priority '{0}' (expected: low, medium, high)")]
    UnknownPriority(String),

    #[error("unknown date range '{0}' (expected: today, overdue, this-week, all)")]
    UnknownDateRange(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD or a relative form like 'tomorrow' or 'in 3d'")]
    InvalidDate(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("multiple tasks match '{title}':\n{candidates}Please use the task ID instead.")]
    AmbiguousTask { title: String, candidates: String },

    #[error("client not found: {0}")]
    ClientNotFound(String),

    #[error("invalid link '{0}', expected label=url")]
    InvalidLink(String),

    #[error("link not found: {0}")]
    LinkNotFound(String),

    #[error("member not found: {0}")]
    MemberNotFound(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("a member with email '{0}' already exists")]
    DuplicateMember(String),

    #[error("io error at {path}: {source}")]
    IoPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("workspace file {path} is not valid: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type FlowResult<T> = Result<T, FlowError>;
