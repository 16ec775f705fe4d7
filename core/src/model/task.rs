use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque task identifier.
///
/// Stored as a plain string so ids written by older writers (millisecond
/// timestamps, for instance) survive a load unchanged. Fresh ids are UUID v4.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn generate() -> Self {
        TaskId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, enough to address a task from the command line.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        TaskId(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        TaskId(value)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    // Unknown for records written without a timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Builds a pending task from already-trimmed, non-empty text.
    pub(crate) fn new(id: TaskId, text: String) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at: Some(Utc::now()),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

/// Trims `raw`, returning `None` when nothing but whitespace is left.
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Buy milk \n"), Some("Buy milk".to_string()));
        assert_eq!(normalize_text(" \t\n "), None);
        assert_eq!(normalize_text(""), None);
    }

    #[test]
    fn test_missing_fields_default() {
        let task: Task = serde_json::from_str(r#"{"id":"1700000000000","text":"legacy"}"#).unwrap();
        assert_eq!(task.id.as_str(), "1700000000000");
        assert!(!task.completed);
        assert!(task.created_at.is_none());
    }

    #[test]
    fn test_serializes_camel_case() {
        let task = Task::new(TaskId::from("abc"), "Write report".to_string());
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["completed"], false);
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn test_short_id() {
        let id = TaskId::from("0123456789abcdef");
        assert_eq!(id.short(), "01234567");
        assert_eq!(TaskId::from("42").short(), "42");
    }
}
