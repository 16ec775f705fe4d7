use thiserror::Error;

use crate::model::task::TaskId;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage quota exceeded writing `{key}` ({size} bytes, quota {quota})")]
    QuotaExceeded { key: String, size: usize, quota: usize },

    #[error("storage is unavailable")]
    Unavailable,

    #[error("invalid storage key: `{0}`")]
    InvalidKey(String),
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("persisted tasks under `{key}` are malformed: {source}")]
    MalformedStorage {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unrecognized filter `{0}` (expected all, active or completed)")]
    InvalidFilter(String),

    /// The in-memory change stands. `applied` names the task an `add`
    /// created before the save failed.
    #[error("failed to persist tasks under `{key}`: {source}")]
    Persist {
        key: String,
        #[source]
        source: StorageError,
        applied: Option<TaskId>,
    },

    #[error("failed to read tasks under `{key}`: {source}")]
    Storage {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("failed to encode tasks: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("no task matches id `{0}`")]
    UnknownId(String),

    #[error("id `{prefix}` is ambiguous: matches {candidates:?}")]
    AmbiguousId {
        prefix: String,
        candidates: Vec<String>,
    },
}

/// Reasons a mutation was skipped without touching state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ignored {
    #[error("task text is empty")]
    EmptyText,

    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
}

pub type Result<T, E = TaskError> = std::result::Result<T, E>;
