use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::model::filter::ViewFilter;
use crate::model::stats::TaskStats;
use crate::model::task::{Priority, Task, TaskId};
use crate::repository::{keys, KeyValueStore};
use crate::service::projection::{self, Projection};

const FIRST_VISIT_MARKER: &str = "true";

/// Owns the task collection and mirrors every accepted mutation to the
/// `tasks` slot of its storage.
///
/// Mutators report rejected input or unknown ids through their return value
/// (`None`, `false`, `0`). An `Err` always means the write failed, in which
/// case the in-memory collection is left as it was before the call.
pub struct TaskStore<S: KeyValueStore> {
    storage: S,
    tasks: Vec<Task>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// An unloaded store. Call [`TaskStore::load`] before use, or use
    /// [`TaskStore::open`].
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            tasks: Vec::new(),
        }
    }

    pub fn open(storage: S) -> Result<Self> {
        let mut store = Self::new(storage);
        store.load()?;
        Ok(store)
    }

    /// Re-reads the collection from storage.
    ///
    /// A missing or unparsable `tasks` slot reads as an empty list. The first
    /// load that finds no `firstVisit` marker sets it, and seeds the sample
    /// tasks if the list it read was empty. After that an empty list stays
    /// empty.
    pub fn load(&mut self) -> Result<&[Task]> {
        let mut tasks = self.read_tasks()?;

        if self.storage.get(keys::FIRST_VISIT)?.is_none() {
            if tasks.is_empty() {
                tasks = sample_tasks(Utc::now());
                self.write_tasks(&tasks)?;
                info!(count = tasks.len(), "seeded sample tasks on first visit");
            }
            self.storage.set(keys::FIRST_VISIT, FIRST_VISIT_MARKER)?;
        }

        self.tasks = tasks;
        Ok(&self.tasks)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Finds a task by full id, or by an id prefix that matches exactly one
    /// task.
    pub fn resolve(&self, id_or_prefix: &str) -> Option<TaskId> {
        let needle = id_or_prefix.trim();
        if needle.is_empty() {
            return None;
        }
        if let Some(task) = self.tasks.iter().find(|t| t.id.as_str() == needle) {
            return Some(task.id.clone());
        }

        let mut matches = self.tasks.iter().filter(|t| t.id.as_str().starts_with(needle));
        match (matches.next(), matches.next()) {
            (Some(task), None) => Some(task.id.clone()),
            _ => None,
        }
    }

    pub fn add(&mut self, text: &str, priority: Priority) -> Result<Option<Task>> {
        let text = text.trim();
        if text.is_empty() {
            debug!("ignoring add with blank text");
            return Ok(None);
        }

        let mut task = Task::new(text, priority);
        while self.get(&task.id).is_some() {
            task.id = TaskId::new();
        }

        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit(next)?;

        debug!(id = %task.id, priority = %task.priority, "task added");
        Ok(Some(task))
    }

    /// Replaces text and priority. Returns `false` and changes nothing when
    /// the text is blank or the id is unknown.
    pub fn edit(&mut self, id: &TaskId, new_text: &str, new_priority: Priority) -> Result<bool> {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            debug!(%id, "ignoring edit with blank text");
            return Ok(false);
        }
        let Some(pos) = self.position(id) else {
            debug!(%id, "ignoring edit of unknown task");
            return Ok(false);
        };

        let mut next = self.tasks.clone();
        next[pos].text = new_text.to_string();
        next[pos].priority = new_priority;
        self.commit(next)?;

        debug!(%id, "task edited");
        Ok(true)
    }

    /// Flips `completed` and returns the new value.
    pub fn toggle_completed(&mut self, id: &TaskId) -> Result<Option<bool>> {
        let Some(pos) = self.position(id) else {
            return Ok(None);
        };

        let mut next = self.tasks.clone();
        next[pos].completed = !next[pos].completed;
        let completed = next[pos].completed;
        self.commit(next)?;

        debug!(%id, completed, "task toggled");
        Ok(Some(completed))
    }

    pub fn remove(&mut self, id: &TaskId) -> Result<Option<Task>> {
        let Some(pos) = self.position(id) else {
            return Ok(None);
        };

        let mut next = self.tasks.clone();
        let removed = next.remove(pos);
        self.commit(next)?;

        debug!(%id, "task removed");
        Ok(Some(removed))
    }

    /// Returns how many tasks were removed.
    pub fn clear_completed(&mut self) -> Result<usize> {
        let next: Vec<Task> = self.tasks.iter().filter(|t| !t.completed).cloned().collect();
        let removed = self.tasks.len() - next.len();
        self.commit(next)?;

        debug!(removed, "cleared completed tasks");
        Ok(removed)
    }

    /// Returns how many tasks actually changed state.
    pub fn set_all_completed(&mut self, value: bool) -> Result<usize> {
        let changed = self.tasks.iter().filter(|t| t.completed != value).count();
        let next: Vec<Task> = self
            .tasks
            .iter()
            .cloned()
            .map(|mut t| {
                t.completed = value;
                t
            })
            .collect();
        self.commit(next)?;

        debug!(value, changed, "set completion on all tasks");
        Ok(changed)
    }

    /// Returns how many tasks were removed.
    pub fn clear_all(&mut self) -> Result<usize> {
        let removed = self.tasks.len();
        self.commit(Vec::new())?;

        debug!(removed, "cleared all tasks");
        Ok(removed)
    }

    pub fn stats(&self) -> TaskStats {
        projection::stats(&self.tasks)
    }

    pub fn project(&self, filter: &ViewFilter) -> Projection {
        projection::project(&self.tasks, filter)
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    fn commit(&mut self, next: Vec<Task>) -> Result<()> {
        self.write_tasks(&next)?;
        self.tasks = next;
        Ok(())
    }

    fn read_tasks(&self) -> Result<Vec<Task>> {
        let Some(raw) = self.storage.get(keys::TASKS)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => Ok(dedup_by_id(tasks)),
            Err(e) => {
                warn!(error = %e, "stored tasks are unreadable, starting with an empty list");
                Ok(Vec::new())
            }
        }
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        let payload = serde_json::to_string(tasks)?;
        self.storage.set(keys::TASKS, &payload)
    }
}

fn dedup_by_id(tasks: Vec<Task>) -> Vec<Task> {
    let before = tasks.len();
    let mut seen = std::collections::HashSet::new();
    let unique: Vec<Task> = tasks
        .into_iter()
        .filter(|t| seen.insert(t.id.clone()))
        .collect();
    if unique.len() != before {
        warn!(dropped = before - unique.len(), "dropped stored tasks with duplicate ids");
    }
    unique
}

/// The three tasks shown on a first visit.
pub fn sample_tasks(now: DateTime<Utc>) -> Vec<Task> {
    let sample = |id: &str, text: &str, completed: bool, priority: Priority| Task {
        id: TaskId::from(id),
        text: text.to_string(),
        completed,
        priority,
        created_at: now,
    };

    vec![
        sample(
            "sample1",
            "Welcome to TaskMaster! This is a sample task",
            false,
            Priority::Normal,
        ),
        sample(
            "sample2",
            "Try adding a new task with `taskmaster add`",
            false,
            Priority::High,
        ),
        sample(
            "sample3",
            "Press space in the TUI to complete a task",
            true,
            Priority::Low,
        ),
    ]
}
