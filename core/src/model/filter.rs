use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::task::{Priority, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
        }
    }

    /// Cycles all → active → completed → all.
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(priority) => task.priority == priority,
        }
    }

    /// Cycles all → high → normal → low → all.
    pub fn next(self) -> Self {
        match self {
            PriorityFilter::All => PriorityFilter::Only(Priority::High),
            PriorityFilter::Only(Priority::High) => PriorityFilter::Only(Priority::Normal),
            PriorityFilter::Only(Priority::Normal) => PriorityFilter::Only(Priority::Low),
            PriorityFilter::Only(Priority::Low) => PriorityFilter::All,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityFilter::All => f.write_str("all"),
            PriorityFilter::Only(priority) => write!(f, "{}", priority),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter '{0}'")]
pub struct ParseFilterError(pub String);

impl FromStr for StatusFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" | "done" => Ok(StatusFilter::Completed),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(PriorityFilter::All);
        }
        s.parse::<Priority>()
            .map(PriorityFilter::Only)
            .map_err(|_| ParseFilterError(s.to_string()))
    }
}

/// The three user-controlled knobs of the task list view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewFilter {
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub search: String,
}

impl ViewFilter {
    pub fn new(status: StatusFilter, priority: PriorityFilter, search: impl Into<String>) -> Self {
        Self {
            status,
            priority,
            search: search.into(),
        }
    }

    /// Search term as applied: surrounding whitespace is ignored.
    pub fn search_term(&self) -> &str {
        self.search.trim()
    }

    pub fn matches(&self, task: &Task) -> bool {
        let term = self.search_term();
        self.status.matches(task)
            && self.priority.matches(task)
            && (term.is_empty() || task.text.to_lowercase().contains(&term.to_lowercase()))
    }

    pub fn active_filters(&self) -> ActiveFilters {
        ActiveFilters {
            status: self.status != StatusFilter::All,
            priority: self.priority != PriorityFilter::All,
            search: !self.search_term().is_empty(),
        }
    }
}

/// Which filters differ from their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActiveFilters {
    pub status: bool,
    pub priority: bool,
    pub search: bool,
}

impl ActiveFilters {
    pub fn any(&self) -> bool {
        self.status || self.priority || self.search
    }
}
