use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write as _;

use crate::cli::ExportFormat;
use crate::display::{format_hours, task_lines_plain};
use crate::error::Result;
use crate::model::{DEFAULT_CATEGORY, Document, Task};
use crate::storage::export_document;

/// Renders an export. JSON is always the whole document; the other formats
/// cover the single day bucket for `day`.
pub fn render_export(doc: &Document, day: NaiveDate, format: ExportFormat) -> Result<String> {
    let view = doc.bucket(day);
    match format {
        ExportFormat::Json => export_document(doc),
        ExportFormat::Markdown => Ok(render_markdown(day, view)),
        ExportFormat::Text => {
            let mut out = String::new();
            for task in view {
                for line in task_lines_plain(task) {
                    let _ = writeln!(out, "{line}");
                }
            }
            Ok(out)
        }
        ExportFormat::Csv => render_csv(day, view),
    }
}

fn render_markdown(day: NaiveDate, view: &[Task]) -> String {
    let mut out = format!("# {day}\n\n");
    for task in view {
        let status = if task.done { "x" } else { " " };
        let _ = writeln!(out, "- [{status}] {} ({})", task.text, task.id);
        if !task.category.eq_ignore_ascii_case(DEFAULT_CATEGORY) {
            let _ = writeln!(out, "  - category: {}", task.category);
        }
        if let Some(time) = task.scheduled_time.as_deref() {
            let _ = writeln!(out, "  - time: {time}");
        }
        if let Some(hours) = task.hours {
            let _ = writeln!(out, "  - hours: {}", format_hours(hours));
        }
    }
    out
}

#[derive(Serialize)]
struct CsvRow<'a> {
    day: NaiveDate,
    id: &'a str,
    text: &'a str,
    category: &'a str,
    time: Option<&'a str>,
    hours: Option<f64>,
    done: bool,
    created_at: String,
    completed_at: Option<String>,
}

fn render_csv(day: NaiveDate, view: &[Task]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for task in view {
        writer.serialize(CsvRow {
            day,
            id: &task.id,
            text: &task.text,
            category: &task.category,
            time: task.scheduled_time.as_deref(),
            hours: task.hours,
            done: task.done,
            created_at: task.created_at.to_rfc3339(),
            completed_at: task.completed_at.map(|c| c.to_rfc3339()),
        })?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
