use clap::{Parser, Subcommand};
use project_monitor::cli;
use project_monitor::error::MonitorResult;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "monitor")]
#[command(about = "Project status monitor: spreadsheet in, status totals and timeline out.")]
#[command(long_about = "Project Monitor - Excel project-status sheets as a timeline

Reads the first worksheet of an .xlsx/.xls file, finds the Project, Status
and month columns from the header row, and turns every data row into a
project record. Everything else between the project column and the first
month column is treated as a sub-activity.

COMMANDS:
  inspect   - Show which columns were detected
  preview   - Print the first rows of the normalized data
  status    - Total projects per status
  timeline  - Grouped timeline bars in the terminal
  export    - Write the normalized data as JSON or YAML
  watch     - Reload and summarize on file changes

EXAMPLES:
  monitor inspect projects.xlsx
  monitor timeline projects.xlsx --isolate-unmatched
  monitor export projects.xlsx dataset.json

LOGGING:
  Set RUST_LOG (e.g. RUST_LOG=project_monitor=debug) for diagnostics.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Show the column layout inferred from the header row.

DETECTION RULES:
  Project   - first header containing \"project\" (any case)
  Status    - first header containing \"status\" (any case)
  Months    - headers containing a month name or 3-letter abbreviation
  Sub-activities - columns between Project and the first month column

A missing Project or Status column is an error.")]
    /// Show the inferred column layout
    Inspect {
        /// Path to Excel file (.xlsx or .xls)
        file: PathBuf,
    },

    /// Print the first rows of the normalized dataset
    Preview {
        /// Path to Excel file (.xlsx or .xls)
        file: PathBuf,

        /// Number of rows to show
        #[arg(short, long, default_value_t = cli::DEFAULT_PREVIEW_ROWS)]
        limit: usize,
    },

    /// Total projects per status
    Status {
        /// Path to Excel file (.xlsx or .xls)
        file: PathBuf,
    },

    #[command(long_about = "Draw the grouped project timeline.

Each month is four week cells (days 2, 9, 16, 23). A project's bar runs
from its first month with markers to its last, gaps included.

GROUPING:
  Names starting with an all-caps word of 4+ letters (\"SYSTEM Login\")
  are grouped by that word. Other names join the first group whose label
  starts with the same letter, otherwise the first group overall.

  --isolate-unmatched gives those names their own group instead.")]
    /// Draw the grouped project timeline
    Timeline {
        /// Path to Excel file (.xlsx or .xls)
        file: PathBuf,

        /// Put names that match no group into their own group
        #[arg(long)]
        isolate_unmatched: bool,
    },

    /// Export the normalized dataset to JSON or YAML
    Export {
        /// Path to Excel file (.xlsx or .xls)
        input: PathBuf,

        /// Output file (.json, .yaml or .yml)
        output: PathBuf,

        /// Show verbose export steps
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Watch a spreadsheet and reload it on every save.

A load that fails keeps the previously loaded data. Press Ctrl+C to stop.")]
    /// Watch a spreadsheet and reload on changes
    Watch {
        /// Path to Excel file (.xlsx or .xls)
        file: PathBuf,

        /// Show per-status totals after each load
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> MonitorResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("project_monitor=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { file } => cli::inspect(file),

        Commands::Preview { file, limit } => cli::preview(file, limit),

        Commands::Status { file } => cli::status(file),

        Commands::Timeline {
            file,
            isolate_unmatched,
        } => cli::timeline(file, isolate_unmatched),

        Commands::Export {
            input,
            output,
            verbose,
        } => cli::export(input, output, verbose),

        Commands::Watch { file, verbose } => cli::watch(file, verbose),
    }
}
