use serde::{Deserialize, Serialize};

use crate::model::task::Task;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut stats, task| {
            stats.total += 1;
            if task.completed {
                stats.completed += 1;
            } else {
                stats.active += 1;
            }
            stats
        })
    }

    /// Share of completed tasks as a whole percent, rounded half up.
    /// An empty list is 0%.
    pub fn completion_percentage(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed * 200 + self.total) / (self.total * 2)) as u8
    }
}
