pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;

pub use config::StoreConfig;
pub use error::StoreError;
pub use input::{expand_key, parse_args, parse_task_input, parse_task_line, ParsedInput, TaskInput};
pub use model::filter::{ActiveFilters, PriorityFilter, StatusFilter, ViewFilter};
pub use model::stats::TaskStats;
pub use model::task::{Priority, Task, TaskId};
pub use model::theme::Theme;
pub use repository::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use service::export::{export_tasks, ExportDocument, ExportError, ExportReceipt, TaskExporter};
pub use service::preferences::PreferenceService;
pub use service::projection::{completion_percentage, project, sort_tasks, stats, Projection};
pub use service::task_store::TaskStore;
