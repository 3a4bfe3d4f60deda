use crate::error::StorageError;
use crate::storage::{Storage, TASKS_KEY};
use crate::task::{Task, TaskId, TaskPatch};
use chrono::Utc;
use std::{collections::HashSet, fmt, rc::Rc};
use tracing::{debug, info, warn};

/// Result of a status change, used by the drop handler to decide whether
/// the move deserves a confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    Moved { from: String, to: String },
    Unchanged,
    Missing,
}

/// The task store. Owns the ordered task list and mirrors it to storage
/// after every mutation; nothing else reads or writes the list.
pub struct KanbanBoard {
    tasks: Vec<Task>,
    storage: Rc<dyn Storage>,
}

impl fmt::Debug for KanbanBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KanbanBoard")
            .field("tasks", &self.tasks)
            .finish_non_exhaustive()
    }
}

impl KanbanBoard {
    /// Loads the persisted list. Absent or malformed data yields an empty
    /// board; nothing here fails.
    pub fn load(storage: Rc<dyn Storage>) -> Self {
        let tasks = match storage.get_item(TASKS_KEY) {
            Ok(Some(data)) => parse_tasks(&data),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to read tasks; starting empty");
                Vec::new()
            }
        };
        info!(count = tasks.len(), "loaded tasks");
        Self { tasks, storage }
    }

    pub fn persist(&self) -> Result<(), StorageError> {
        let data = serde_json::to_string(&self.tasks)?;
        self.storage.set_item(TASKS_KEY, &data)
    }

    fn persist_or_warn(&self) {
        if let Err(err) = self.persist() {
            warn!(error = %err, "failed to save tasks");
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn tasks_by_status(&self, status: &str) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    pub fn add(&mut self, title: &str, description: &str, status: &str) -> Option<TaskId> {
        let title = title.trim();
        if title.is_empty() {
            debug!("ignoring task with empty title");
            return None;
        }

        let id = self.next_id();
        self.tasks.push(Task {
            id,
            title: title.to_string(),
            description: description.trim().to_string(),
            status: status.to_string(),
        });
        debug!(%id, status, "added task");
        self.persist_or_warn();
        Some(id)
    }

    /// Merges `patch` into the task with `id`. Returns `false` when no such
    /// task exists.
    pub fn update(&mut self, id: TaskId, patch: TaskPatch) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!(%id, "update of unknown task ignored");
            return false;
        };

        if let Some(title) = patch.title {
            let title = title.trim();
            if !title.is_empty() {
                task.title = title.to_string();
            }
        }
        if let Some(description) = patch.description {
            task.description = description.trim().to_string();
        }
        if let Some(status) = patch.status {
            task.status = status;
        }

        debug!(%id, "updated task");
        self.persist_or_warn();
        true
    }

    pub fn remove(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            debug!(%id, "remove of unknown task ignored");
            return false;
        }

        debug!(%id, "removed task");
        self.persist_or_warn();
        true
    }

    pub fn set_status(&mut self, id: TaskId, status: &str) -> StatusChange {
        let Some(from) = self.get(id).map(|t| t.status.clone()) else {
            return StatusChange::Missing;
        };

        self.update(id, TaskPatch::status(status));
        if from == status {
            StatusChange::Unchanged
        } else {
            StatusChange::Moved {
                from,
                to: status.to_string(),
            }
        }
    }

    fn next_id(&self) -> TaskId {
        let now = Utc::now().timestamp_millis();
        let max = self.tasks.iter().map(|t| t.id.0).max();
        match max.map_or(Some(now), |max| max.checked_add(1)) {
            Some(next) => TaskId(now.max(next)),
            None => {
                // The top of the range is taken, so take the first free id from now on.
                let used: HashSet<i64> = self.tasks.iter().map(|t| t.id.0).collect();
                let free = (now..=i64::MAX)
                    .find(|id| !used.contains(id))
                    .unwrap_or(now);
                TaskId(free)
            }
        }
    }
}

fn parse_tasks(data: &str) -> Vec<Task> {
    let parsed: Vec<Task> = match serde_json::from_str::<Option<Vec<Task>>>(data) {
        Ok(tasks) => tasks.unwrap_or_default(),
        Err(err) => {
            warn!(error = %err, "stored tasks are malformed; starting empty");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    parsed
        .into_iter()
        .filter(|task| {
            let fresh = seen.insert(task.id);
            if !fresh {
                warn!(id = %task.id, "dropping task with duplicate id");
            }
            fresh
        })
        .collect()
}
