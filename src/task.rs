use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical task identifier. Ids coming back from the view are always
/// compared as `TaskId`, never as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: String, // a column id, e.g. "todo", "in-progress", "done"
}

/// A status bucket on the board. Tasks whose `status` equals `id` are shown
/// in this column.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Column {
    pub id: String,
    pub title: String,
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

pub fn default_columns() -> Vec<Column> {
    vec![
        Column::new("todo", "To Do"),
        Column::new("in-progress", "In Progress"),
        Column::new("done", "Done"),
    ]
}

/// Fields to merge into an existing task. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl TaskPatch {
    pub fn text(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            status: None,
        }
    }

    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_id_as_plain_number() {
        let task = Task {
            id: TaskId(1_700_000_000_000),
            title: "Buy milk".to_string(),
            description: String::new(),
            status: "todo".to_string(),
        };
        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(
            json,
            r#"{"id":1700000000000,"title":"Buy milk","description":"","status":"todo"}"#
        );
    }

    #[test]
    fn missing_description_defaults_to_empty() {
        let task: Task =
            serde_json::from_str(r#"{"id":7,"title":"Call mom","status":"done"}"#).unwrap();
        assert_eq!(task.id, TaskId(7));
        assert_eq!(task.description, "");
    }
}
