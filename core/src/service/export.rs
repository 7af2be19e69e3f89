//! Export of the task list to an external document format.
//!
//! The core only assembles an [`ExportDocument`]; turning it into a file is
//! the job of whatever [`TaskExporter`] the caller injects.

use chrono::{DateTime, Local, NaiveDate};
use thiserror::Error;
use tracing::{error, info};

use crate::model::stats::TaskStats;
use crate::model::task::Task;

pub const EXPORT_TITLE: &str = "TaskMaster - Task List";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No tasks to export")]
    NoTasks,

    #[error("Export is not available: {0}")]
    Unavailable(String),

    #[error("Export failed: {0}")]
    Failed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub status: String,
    pub text: String,
    pub priority: String,
    pub created: String,
    /// Exporters draw completed rows struck through.
    pub completed: bool,
}

impl ExportRow {
    pub fn cells(&self) -> [&str; 4] {
        [
            self.status.as_str(),
            self.text.as_str(),
            self.priority.as_str(),
            self.created.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub title: String,
    pub generated_on: NaiveDate,
    pub rows: Vec<ExportRow>,
    pub stats: TaskStats,
}

impl ExportDocument {
    /// Rows run active first, newest first within each group. Priority does
    /// not take part in the export order.
    pub fn from_tasks(tasks: &[Task], generated_at: DateTime<Local>) -> Self {
        let mut ordered: Vec<&Task> = tasks.iter().collect();
        ordered.sort_by(|a, b| {
            a.completed
                .cmp(&b.completed)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        let rows = ordered
            .into_iter()
            .map(|task| ExportRow {
                status: task.status_label().to_string(),
                text: task.text.clone(),
                priority: task.priority.label().to_string(),
                created: task
                    .created_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d")
                    .to_string(),
                completed: task.completed,
            })
            .collect();

        Self {
            title: EXPORT_TITLE.to_string(),
            generated_on: generated_at.date_naive(),
            rows,
            stats: TaskStats::from_tasks(tasks),
        }
    }

    pub fn generated_line(&self) -> String {
        format!("Generated on {}", self.generated_on.format("%Y-%m-%d"))
    }

    pub fn summary_lines(&self) -> [String; 2] {
        [
            format!("Summary: {} total tasks", self.stats.total),
            format!(
                "{} active tasks, {} completed ({}%)",
                self.stats.active,
                self.stats.completed,
                self.stats.completion_percentage()
            ),
        ]
    }
}

/// Where an export ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub location: String,
    pub rows: usize,
}

/// A document renderer the caller plugs in (a table writer, a PDF backend...).
pub trait TaskExporter {
    fn export(&self, document: &ExportDocument) -> Result<ExportReceipt, ExportError>;
}

/// Builds the document and hands it to `exporter`.
///
/// Fails with [`ExportError::NoTasks`] on an empty list and with
/// [`ExportError::Unavailable`] when no exporter was provided.
pub fn export_tasks(
    exporter: Option<&dyn TaskExporter>,
    tasks: &[Task],
) -> Result<ExportReceipt, ExportError> {
    if tasks.is_empty() {
        return Err(ExportError::NoTasks);
    }
    let exporter = exporter
        .ok_or_else(|| ExportError::Unavailable("no exporter configured".to_string()))?;

    let document = ExportDocument::from_tasks(tasks, Local::now());
    match exporter.export(&document) {
        Ok(receipt) => {
            info!(location = %receipt.location, rows = receipt.rows, "exported tasks");
            Ok(receipt)
        }
        Err(e) => {
            error!(error = %e, "export failed");
            Err(e)
        }
    }
}
