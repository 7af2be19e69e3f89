mod export;
mod report;
mod tui;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use taskmaster_core::config::DATA_DIR_ENV;
use taskmaster_core::{
    export_tasks, parse_task_input, FileKeyValueStore, PreferenceService, PriorityFilter,
    StatusFilter, StoreConfig, TaskId, TaskStore, Theme, ViewFilter,
};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::export::TableExporter;

#[derive(Parser)]
#[command(name = "taskmaster")]
#[command(about = "A small task list manager", long_about = None)]
struct Cli {
    /// Directory holding the task data (defaults to ~/.taskmaster)
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a new task (usage: add Buy milk pri:high)
    Add {
        /// Task text, optionally followed by pri:low|normal|high
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// Change the text and/or priority of a task (usage: edit <id> New text pri:low)
    Edit {
        /// Task id or a unique prefix of it
        id: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Mark a task completed, or active again
    Toggle { id: String },
    /// Delete a task
    #[command(alias = "rm")]
    Remove { id: String },
    /// Delete every completed task
    ClearCompleted,
    /// Mark every task completed
    CompleteAll,
    /// Mark every task active
    ReopenAll,
    /// Delete every task
    ClearAll {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// List tasks, active and high priority first
    List {
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        #[arg(long, default_value = "all")]
        priority: PriorityFilter,
        /// Case-insensitive text search
        #[arg(long)]
        search: Option<String>,
    },
    /// Show task counts and completion
    Stats,
    /// Write the task list to a document
    Export {
        #[arg(short, long, default_value = "taskmaster-tasks.txt")]
        output: PathBuf,
    },
    /// Show or change the theme preference
    Theme { action: Option<ThemeAction> },
    /// Open the Terminal User Interface
    Tui,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeAction {
    Light,
    Dark,
    Toggle,
}

fn init_tracing() {
    // Opt-in via RUST_LOG; stdout stays clean for command output.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn resolve_id(store: &TaskStore<FileKeyValueStore>, id: &str) -> Result<TaskId> {
    match store.resolve(id) {
        Some(id) => Ok(id),
        None => bail!("No task matches '{}' (ids must be exact or a unique prefix)", id),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = StoreConfig::resolve(cli.data_dir)?;
    debug!(dir = %config.data_dir.display(), "using data directory");
    let storage = FileKeyValueStore::open(&config)
        .with_context(|| format!("Could not open data directory {}", config.data_dir.display()))?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Add { args } => {
            let mut store = TaskStore::open(storage)?;
            let input = parse_task_input(&args)?;
            match store.add(&input.text, input.priority.unwrap_or_default())? {
                Some(task) => {
                    println!("Task added: {} (ID: {})", task.text, task.id.short());
                    println!("  Priority: {}", task.priority.label());
                }
                None => bail!("Task text is required."),
            }
        }
        Commands::Edit { id, args } => {
            let mut store = TaskStore::open(storage)?;
            let id = resolve_id(&store, &id)?;
            let input = parse_task_input(&args)?;
            let current = store
                .get(&id)
                .cloned()
                .with_context(|| format!("Task {} disappeared", id))?;

            let text = if input.text.is_empty() {
                current.text.clone()
            } else {
                input.text
            };
            let priority = input.priority.unwrap_or(current.priority);

            if store.edit(&id, &text, priority)? {
                println!("Task updated: {} [{}]", text.trim(), priority.label());
            } else {
                bail!("Task text cannot be empty; task left unchanged.");
            }
        }
        Commands::Toggle { id } => {
            let mut store = TaskStore::open(storage)?;
            let id = resolve_id(&store, &id)?;
            if let Some(completed) = store.toggle_completed(&id)? {
                let state = if completed { "completed" } else { "active" };
                println!("Task {} is now {}.", id.short(), state);
            }
        }
        Commands::Remove { id } => {
            let mut store = TaskStore::open(storage)?;
            let id = resolve_id(&store, &id)?;
            if let Some(task) = store.remove(&id)? {
                println!("Task deleted: {}", task.text);
            }
        }
        Commands::ClearCompleted => {
            let mut store = TaskStore::open(storage)?;
            let removed = store.clear_completed()?;
            println!("Removed {} completed task(s).", removed);
        }
        Commands::CompleteAll => {
            let mut store = TaskStore::open(storage)?;
            let changed = store.set_all_completed(true)?;
            println!("Marked {} task(s) completed.", changed);
        }
        Commands::ReopenAll => {
            let mut store = TaskStore::open(storage)?;
            let changed = store.set_all_completed(false)?;
            println!("Marked {} task(s) active.", changed);
        }
        Commands::ClearAll { yes } => {
            if !yes {
                bail!("Refusing to delete all tasks without --yes");
            }
            let mut store = TaskStore::open(storage)?;
            let removed = store.clear_all()?;
            println!("Deleted {} task(s).", removed);
        }
        Commands::List {
            status,
            priority,
            search,
        } => {
            let store = TaskStore::open(storage)?;
            let filter = ViewFilter::new(status, priority, search.unwrap_or_default());
            report::print_projection(&store.project(&filter));
            report::print_stats(&store.stats());
        }
        Commands::Stats => {
            let store = TaskStore::open(storage)?;
            report::print_stats(&store.stats());
        }
        Commands::Export { output } => {
            let store = TaskStore::open(storage)?;
            let exporter = TableExporter::new(output);
            let receipt = export_tasks(Some(&exporter), store.tasks())?;
            println!("Exported {} task(s) to {}", receipt.rows, receipt.location);
        }
        Commands::Theme { action } => {
            let prefs = PreferenceService::new(storage);
            let theme = match action {
                None => prefs.theme()?,
                Some(ThemeAction::Toggle) => prefs.toggle_theme()?,
                Some(ThemeAction::Light) => {
                    prefs.set_theme(Theme::Light)?;
                    Theme::Light
                }
                Some(ThemeAction::Dark) => {
                    prefs.set_theme(Theme::Dark)?;
                    Theme::Dark
                }
            };
            println!("Theme: {}", theme);
        }
        Commands::Tui => {
            tui::run(storage)?;
        }
    }
    Ok(())
}
