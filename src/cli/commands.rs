use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kanban",
    version,
    about = "Single-user kanban board with WIP hour limits",
    after_help = "\
NOTE:
  The board is stored at <git-root>/.kanban/kanban.db unless --db or KANBAN_DB is set.
  Run `kanban init` before any other command.

COLUMNS:
  backlog, in-progress, blocked, done

RULES:
  In Progress may not hold more estimated hours than the WIP limit.
  Entering Blocked stamps the task; leaving Blocked clears the stamp.
  A task is STALLED once it has been blocked longer than the stall time.
  Entering Done stamps the completion time, which later moves keep.

EXIT CODES:
  0  Success
  1  Error (not found, WIP limit, validation, storage)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the board database
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the board database
    Init,

    /// Show every column with its tasks
    Board,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Workload statistics
    Stats,

    /// Board settings
    #[command(subcommand)]
    Settings(SettingsCommands),
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task (to Backlog unless --column is given)
    Add {
        /// Task title
        title: String,
        #[arg(long)]
        assignee: String,
        /// Estimated hours
        #[arg(long)]
        estimate: f64,
        #[arg(long, default_value = "low")]
        priority: String,
        #[arg(long, default_value = "backlog")]
        column: String,
    },
    /// Move a task to a column (optionally at a position)
    #[command(after_help = "\
NOTE:
  --index is zero-based; omitted or past the end means the bottom of the column.
  Moving within the same column only reorders.")]
    Move {
        /// Task ID or prefix
        id: String,
        /// Destination column
        column: String,
        #[arg(long)]
        index: Option<usize>,
    },
    /// Edit task fields
    Update {
        /// Task ID or prefix
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        estimate: Option<f64>,
        #[arg(long)]
        priority: Option<String>,
    },
    /// Delete a task
    Delete {
        /// Task ID or prefix
        id: String,
    },
    /// Show task details
    Show {
        /// Task ID or prefix
        id: String,
    },
    /// List tasks
    List {
        #[arg(long)]
        column: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show current settings
    Show,
    /// Change settings; omitted values keep their current setting
    Set {
        /// Maximum total estimated hours in In Progress
        #[arg(long)]
        wip_limit: Option<f64>,
        /// Hours in Blocked before a task counts as stalled
        #[arg(long)]
        stall_hours: Option<f64>,
    },
}
