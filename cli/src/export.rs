use std::fs;
use std::path::PathBuf;

use tabled::settings::Style;
use tabled::{Table, Tabled};
use taskmaster_core::service::export::{ExportDocument, ExportError, ExportReceipt, ExportRow};
use taskmaster_core::TaskExporter;

#[derive(Tabled)]
struct DocumentRow {
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Task")]
    text: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&ExportRow> for DocumentRow {
    fn from(row: &ExportRow) -> Self {
        // Plain text has no strikethrough, so completed rows get markdown's.
        let text = if row.completed {
            format!("~~{}~~", row.text)
        } else {
            row.text.clone()
        };
        Self {
            status: row.status.clone(),
            text,
            priority: row.priority.clone(),
            created: row.created.clone(),
        }
    }
}

/// Renders the export document as a text file with a boxed table.
pub struct TableExporter {
    path: PathBuf,
}

impl TableExporter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn render(document: &ExportDocument) -> String {
        let rows: Vec<DocumentRow> = document.rows.iter().map(DocumentRow::from).collect();
        let mut table = Table::new(rows);
        table.with(Style::modern());

        let [total, detail] = document.summary_lines();
        format!(
            "{}\n{}\n\n{}\n\n{}\n{}\n",
            document.title,
            document.generated_line(),
            table,
            total,
            detail
        )
    }
}

impl TaskExporter for TableExporter {
    fn export(&self, document: &ExportDocument) -> Result<ExportReceipt, ExportError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, Self::render(document))?;

        Ok(ExportReceipt {
            location: self.path.display().to_string(),
            rows: document.rows.len(),
        })
    }
}
