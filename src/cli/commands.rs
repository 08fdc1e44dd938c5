use crate::error::{MonitorError, MonitorResult};
use crate::excel::GridLoader;
use crate::ingest::{self, infer_schema, IngestOutcome, IngestSession};
use crate::status::StatusSummary;
use crate::timeline::{
    stop_for_cell, stop_rgb, GroupingOptions, TimelineSpan, TimelineView, Unmatched,
    CELLS_PER_MONTH, GRADIENT_STOPS,
};
use crate::types::{Dataset, Schema};
use colored::Colorize;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

/// Rows shown by `preview` unless `--limit` says otherwise
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Serialization target for `export`, picked from the output extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> MonitorResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(MonitorError::Validation(format!(
                "Unsupported output file '{}': use .json, .yaml or .yml",
                path.display()
            ))),
        }
    }
}

/// Convert column index to Excel column letter (0→A, 1→B, 25→Z, 26→AA, etc.)
fn column_letter(n: usize) -> String {
    let mut result = String::new();
    let mut num = n;

    loop {
        let remainder = num % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if num < 26 {
            break;
        }
        num = num / 26 - 1;
    }

    result
}

fn grouping_options(isolate_unmatched: bool) -> GroupingOptions {
    GroupingOptions {
        unmatched: if isolate_unmatched {
            Unmatched::OwnGroup
        } else {
            Unmatched::FirstGroup
        },
    }
}

/// Execute the inspect command - show the inferred column layout
pub fn inspect(file: PathBuf) -> MonitorResult<()> {
    println!("{}", "🔍 Project Monitor - Schema Inspection".bold().green());
    println!("   File: {}\n", file.display());

    let grid = GridLoader::new(&file).load()?;
    let headers = grid.headers();
    let schema = infer_schema(&headers)?;

    for line in describe_schema(&schema, &headers) {
        println!("{}", line);
    }
    println!();
    println!(
        "   {} data rows in sheet",
        grid.data_rows().len().to_string().bold()
    );

    if schema.month_columns.is_empty() {
        println!(
            "{}",
            "⚠️  No month columns found - the timeline will be empty".yellow()
        );
    }

    Ok(())
}

/// One line per schema element, e.g. `Project: "Project Name" (column A)`
pub fn describe_schema(schema: &Schema, headers: &[String]) -> Vec<String> {
    let header = |col: usize| headers.get(col).map(String::as_str).unwrap_or("");
    let mut lines = vec![
        format!(
            "   Project: \"{}\" (column {})",
            header(schema.project_column),
            column_letter(schema.project_column)
        ),
        format!(
            "   Status:  \"{}\" (column {})",
            header(schema.status_column),
            column_letter(schema.status_column)
        ),
    ];

    lines.push(format!("   Months:  {}", schema.month_columns.len()));
    for mc in &schema.month_columns {
        lines.push(format!(
            "      {:<10} ← \"{}\" (column {})",
            mc.month.name(),
            header(mc.column),
            column_letter(mc.column)
        ));
    }

    lines.push(format!(
        "   Sub-activities: {}",
        schema.sub_activity_columns.len()
    ));
    for &col in &schema.sub_activity_columns {
        lines.push(format!(
            "      \"{}\" (column {})",
            header(col),
            column_letter(col)
        ));
    }
    lines
}

/// Execute the preview command - first rows of the normalized dataset
pub fn preview(file: PathBuf, limit: usize) -> MonitorResult<()> {
    println!("{}", "📋 Project Monitor - Data Preview".bold().green());
    println!("   File: {}\n", file.display());

    let dataset = ingest::ingest_file(&file)?;
    for line in preview_lines(&dataset, limit) {
        println!("{}", line);
    }

    Ok(())
}

/// Tab-separated preview table plus the "Showing N of M rows" footer
pub fn preview_lines(dataset: &Dataset, limit: usize) -> Vec<String> {
    let mut header: Vec<String> = vec!["Project".to_string()];
    header.extend(dataset.sub_activities.iter().cloned());
    header.extend(dataset.months.iter().map(|m| m.name().to_string()));
    header.push("Status".to_string());

    let mut lines = vec![header.join("\t")];

    let shown = dataset.preview(limit);
    for row in shown {
        let mut cells: Vec<String> = vec![row.project.clone()];
        for name in &dataset.sub_activities {
            cells.push(row.activity(name).unwrap_or("-").to_string());
        }
        for &month in &dataset.months {
            cells.push(row.markers(month).join(", "));
        }
        cells.push(row.status.clone());
        lines.push(cells.join("\t"));
    }

    lines.push(String::new());
    lines.push(format!(
        "Showing {} of {} rows",
        shown.len(),
        dataset.row_count()
    ));
    lines
}

/// Execute the status command - projects per status
pub fn status(file: PathBuf) -> MonitorResult<()> {
    println!("{}", "📊 Project Monitor - Total by Status".bold().green());
    println!("   File: {}\n", file.display());

    let dataset = ingest::ingest_file(&file)?;
    let summary = StatusSummary::from_dataset(&dataset);

    for (index, entry) in summary.counts.iter().enumerate() {
        println!(
            "   {}. {:<30} {:>4}  ({}%)",
            index + 1,
            entry.status.bright_blue(),
            entry.count.to_string().bold(),
            entry.percent
        );
    }
    println!();
    println!("   Total projects: {}", summary.total.to_string().bold().green());

    Ok(())
}

/// Execute the timeline command - grouped bars, one row per project
pub fn timeline(file: PathBuf, isolate_unmatched: bool) -> MonitorResult<()> {
    println!("{}", "🗓️  Project Monitor - Timeline".bold().green());
    println!("   File: {}\n", file.display());

    let dataset = ingest::ingest_file(&file)?;
    let view = TimelineView::build(&dataset, grouping_options(isolate_unmatched));

    if view.months.is_empty() {
        println!("{}", "⚠️  No month columns - nothing to draw".yellow());
        return Ok(());
    }

    let label_width = view
        .groups
        .iter()
        .flat_map(|g| g.entries.iter().map(|e| e.project.chars().count()))
        .chain(view.groups.iter().map(|g| g.label.chars().count()))
        .max()
        .unwrap_or(0)
        .max("Project Name".len());

    let month_header: String = view
        .months
        .iter()
        .map(|m| format!("{:<width$}", m.abbreviation(), width = CELLS_PER_MONTH))
        .collect();
    println!(
        "   {:<label_width$} │{}",
        "Project Name".bold(),
        month_header.bold()
    );
    println!(
        "   {:<label_width$} │{}",
        "",
        week_marks(view.months.len()).dimmed()
    );

    for group in &view.groups {
        println!("   {}", group.label.bold().bright_blue());
        for entry in &group.entries {
            let bar = render_bar(bar_cells(entry.span.as_ref(), view.total_cells));
            println!("   {:<label_width$} │{}", entry.project, bar);
        }
    }

    println!();
    let legend: String = GRADIENT_STOPS.iter().map(|hex| paint("██", hex)).collect();
    println!("   Timeline Progress  Start {} End", legend);
    println!("   Week cells start on day {}", week_legend());

    Ok(())
}

/// Week tick row: one mark per week cell, `|` at month boundaries
fn week_marks(months: usize) -> String {
    (0..months).map(|_| "|···").collect()
}

/// Day labels of the week cells, e.g. "2 / 9 / 16 / 23"
pub fn week_legend() -> String {
    crate::timeline::WEEK_LABELS
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Gradient stop for every week cell, `None` outside the bar
pub fn bar_cells(span: Option<&TimelineSpan>, total_cells: usize) -> Vec<Option<&'static str>> {
    let mut cells = vec![None; total_cells];
    if let Some(span) = span {
        let start = span.start_cell().min(total_cells);
        let end = span.end_cell().min(total_cells);
        let len = end - start;
        for (offset, cell) in cells[start..end].iter_mut().enumerate() {
            *cell = Some(stop_for_cell(offset, len));
        }
    }
    cells
}

fn render_bar(cells: Vec<Option<&'static str>>) -> String {
    cells
        .into_iter()
        .map(|cell| match cell {
            Some(hex) => paint("█", hex),
            None => " ".to_string(),
        })
        .collect()
}

fn paint(text: &str, hex: &str) -> String {
    match stop_rgb(hex) {
        Some((r, g, b)) => text.truecolor(r, g, b).to_string(),
        None => text.to_string(),
    }
}

/// Execute the export command - write the normalized dataset as JSON or YAML
pub fn export(input: PathBuf, output: PathBuf, verbose: bool) -> MonitorResult<()> {
    println!("{}", "💾 Project Monitor - Dataset Export".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    let format = OutputFormat::from_path(&output)?;

    if verbose {
        println!("{}", "📖 Reading Excel file...".cyan());
    }
    let dataset = ingest::ingest_file(&input)?;

    if verbose {
        println!("   Found {} projects", dataset.row_count());
        println!("   Found {} months", dataset.months.len());
        println!("   Found {} sub-activities\n", dataset.sub_activities.len());
        println!("{}", "💾 Writing dataset...".cyan());
    }

    let text = serialize_dataset(&dataset, format)?;
    fs::write(&output, text)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Dataset file: {}\n", output.display());

    Ok(())
}

pub fn serialize_dataset(dataset: &Dataset, format: OutputFormat) -> MonitorResult<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(dataset)?,
        OutputFormat::Yaml => serde_yaml::to_string(dataset)?,
    })
}

/// Execute the watch command
pub fn watch(file: PathBuf, verbose: bool) -> MonitorResult<()> {
    println!("{}", "👁️  Project Monitor - Watch Mode".bold().green());
    println!("   Watching: {}", file.display());
    println!("   Press {} to stop\n", "Ctrl+C".bold().yellow());

    if !file.exists() {
        return Err(MonitorError::Validation(format!(
            "File not found: {}",
            file.display()
        )));
    }

    let canonical_path = file.canonicalize()?;
    let parent_dir = canonical_path
        .parent()
        .ok_or_else(|| MonitorError::Validation("Cannot determine parent directory".to_string()))?;

    let (tx, rx) = channel();

    // Debounce so a spreadsheet save produces one reload
    let mut debouncer = new_debouncer(Duration::from_millis(200), tx)
        .map_err(|e| MonitorError::Validation(format!("Failed to create file watcher: {}", e)))?;

    debouncer
        .watcher()
        .watch(parent_dir, RecursiveMode::NonRecursive)
        .map_err(|e| MonitorError::Validation(format!("Failed to watch directory: {}", e)))?;

    if verbose {
        println!(
            "   {} {}",
            "Watching directory:".cyan(),
            parent_dir.display()
        );
    }

    let session = IngestSession::new();

    println!("{}", "🔄 Initial load...".cyan());
    report_outcome(session.ingest_path(&file), verbose);
    println!();

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|event| {
                    event.kind == DebouncedEventKind::Any
                        && (event.path.canonicalize().ok().as_ref() == Some(&canonical_path)
                            || event.path.file_name() == canonical_path.file_name())
                });

                if relevant {
                    println!(
                        "\n{} {}",
                        "🔄 Change detected at".cyan(),
                        chrono::Local::now().format("%H:%M:%S").to_string().cyan()
                    );
                    report_outcome(session.ingest_path(&file), verbose);
                    println!();
                }
            }
            Ok(Err(error)) => {
                eprintln!("{} Watch error: {}", "❌".red(), error);
            }
            Err(e) => {
                eprintln!("{} Channel error: {}", "❌".red(), e);
                break;
            }
        }
    }

    Ok(())
}

fn report_outcome(outcome: IngestOutcome, verbose: bool) {
    match outcome {
        IngestOutcome::Applied(loaded) => {
            let summary = StatusSummary::from_dataset(&loaded.dataset);
            println!(
                "{} {} projects, {} months (load #{})",
                "✅ Loaded:".bold().green(),
                loaded.dataset.row_count(),
                loaded.dataset.months.len(),
                loaded.sequence
            );
            if verbose {
                for entry in &summary.counts {
                    println!("      {:<30} {}", entry.status, entry.count);
                }
            }
        }
        IngestOutcome::Superseded { sequence, latest } => {
            println!(
                "{} load #{} replaced by #{}",
                "⏭️  Skipped:".yellow(),
                sequence,
                latest
            );
        }
        IngestOutcome::Failed { error, retained } => {
            println!("{} {}", "❌ Load failed:".bold().red(), error);
            if let Some(previous) = retained {
                println!(
                    "   {} keeping load #{} ({} projects)",
                    "↩".yellow(),
                    previous.sequence,
                    previous.dataset.row_count()
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
