use std::cmp::Ordering;

use crate::model::filter::{ActiveFilters, PriorityFilter, StatusFilter, ViewFilter};
use crate::model::stats::TaskStats;
use crate::model::task::Task;

/// The filtered and ordered tasks for one view, plus what the view was asked
/// for so callers can describe an empty result.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub tasks: Vec<Task>,
    pub filter: ViewFilter,
}

impl Projection {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn active_filters(&self) -> ActiveFilters {
        self.filter.active_filters()
    }

    /// e.g. `No active tasks with high priority matching 'milk'`
    pub fn empty_state_message(&self) -> String {
        let mut message = String::from("No ");
        if self.filter.status != StatusFilter::All {
            message.push_str(self.filter.status.as_str());
            message.push(' ');
        }
        message.push_str("tasks");
        if let PriorityFilter::Only(priority) = self.filter.priority {
            message.push_str(&format!(" with {} priority", priority));
        }
        let term = self.filter.search_term();
        if !term.is_empty() {
            message.push_str(&format!(" matching '{}'", term));
        }
        message
    }
}

/// Filters, then orders: active before completed, then high → normal → low,
/// then newest first. The input is left untouched.
pub fn project(tasks: &[Task], filter: &ViewFilter) -> Projection {
    let mut visible: Vec<Task> = tasks.iter().filter(|t| filter.matches(t)).cloned().collect();
    sort_tasks(&mut visible);
    Projection {
        tasks: visible,
        filter: filter.clone(),
    }
}

pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(compare_tasks);
}

pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| a.priority.rank().cmp(&b.priority.rank()))
        .then_with(|| b.created_at.cmp(&a.created_at))
}

pub fn stats(tasks: &[Task]) -> TaskStats {
    TaskStats::from_tasks(tasks)
}

pub fn completion_percentage(tasks: &[Task]) -> u8 {
    stats(tasks).completion_percentage()
}
