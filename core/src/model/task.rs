use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Opaque task identifier. Fresh ids are UUID v4 strings, but anything that
/// was persisted (e.g. the seeded `sample1`) is accepted as-is.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new() -> Self {
        TaskId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for table display.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
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

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Normal, Priority::Low];

    /// Sort rank: high sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Normal => 1,
            Priority::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Normal => "Normal",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown priority '{0}' (expected low, normal or high)")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "h" | "high" => Ok(Priority::High),
            "n" | "normal" | "m" | "medium" | "med" => Ok(Priority::Normal),
            "l" | "low" => Ok(Priority::Low),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Builds an active task stamped with the current time. Callers are
    /// responsible for rejecting blank text; the store does.
    pub fn new(text: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: TaskId::new(),
            text: text.into(),
            completed: false,
            priority,
            created_at: Utc::now(),
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.completed {
            "Complete"
        } else {
            "Active"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parsing_accepts_short_forms() {
        assert_eq!("h".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("Normal".parse::<Priority>().unwrap(), Priority::Normal);
        assert_eq!(" low ".parse::<Priority>().unwrap(), Priority::Low);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_priority_rank_orders_high_first() {
        let mut all = vec![Priority::Low, Priority::High, Priority::Normal];
        all.sort_by_key(|p| p.rank());
        assert_eq!(all, vec![Priority::High, Priority::Normal, Priority::Low]);
    }

    #[test]
    fn test_task_serializes_with_stored_field_names() {
        let task = Task::new("Write report", Priority::High);
        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["text"], "Write report");
        assert_eq!(value["completed"], false);
        assert_eq!(value["priority"], "high");
        assert!(value["createdAt"].is_string());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_task_reads_records_with_string_ids() {
        let raw = r#"{"id":"1700000000000","text":"Legacy","completed":true,"priority":"low","createdAt":"2024-01-02T03:04:05.000Z"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();

        assert_eq!(task.id.as_str(), "1700000000000");
        assert!(task.completed);
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.status_label(), "Complete");
    }

    #[test]
    fn test_short_id_truncates_long_ids_only() {
        assert_eq!(TaskId::from("sample1").short(), "sample1");
        assert_eq!(TaskId::from("0123456789abcdef").short(), "01234567");
    }
}
