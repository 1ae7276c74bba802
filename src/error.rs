//! Error type shared by storage, snapshots and the CLI.
//!
//! The planning engines themselves (rollover, estimate, plan, summary) never
//! fail; they degrade to defaults instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No usable data directory")]
    DataDir,

    #[error("Name must not be empty")]
    EmptyName,

    #[error("Task text must not be empty")]
    EmptyText,

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("No task with id {0}")]
    TaskNotFound(String),

    #[error("Id prefix '{0}' matches more than one task")]
    AmbiguousTask(String),

    #[error("No saved plan with id {0}")]
    SnapshotNotFound(String),

    #[error("'{0}' matches more than one saved plan")]
    AmbiguousSnapshot(String),

    #[error("Invalid day '{0}': expected today|yesterday|tomorrow|YYYY-MM-DD|DDMMYYYY")]
    InvalidDay(String),

    #[error("Invalid weekday '{0}'")]
    InvalidWeekday(String),
}

impl PlannerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PlannerError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code used by the CLI: 1 for lookups that found nothing,
    /// 2 for bad input and I/O failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            PlannerError::TaskNotFound(_) | PlannerError::SnapshotNotFound(_) => 1,
            _ => 2,
        }
    }
}

pub type Result<T, E = PlannerError> = std::result::Result<T, E>;
