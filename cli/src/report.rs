use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use taskmaster_core::{Projection, Task, TaskStats};

const PROGRESS_WIDTH: usize = 20;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "St")]
    status: &'static str,
    #[tabled(rename = "Priority")]
    priority: &'static str,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Task")]
    text: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.short().to_string(),
            status: if task.completed { "✔" } else { "☐" },
            priority: task.priority.label(),
            created: task
                .created_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d")
                .to_string(),
            text: task.text.clone(),
        }
    }
}

pub fn print_projection(projection: &Projection) {
    if projection.is_empty() {
        println!("{}.", projection.empty_state_message());
        return;
    }

    let rows: Vec<TaskRow> = projection.tasks.iter().map(TaskRow::from).collect();
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));

    println!("{}", table);
}

pub fn print_stats(stats: &TaskStats) {
    let percent = stats.completion_percentage();
    println!(
        "{} total, {} active, {} completed",
        stats.total, stats.active, stats.completed
    );
    println!("{} {}%", progress_bar(percent), percent);
}

fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent) * PROGRESS_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(PROGRESS_WIDTH - filled))
}
