pub mod board;
pub mod commands;
pub mod init;
pub mod settings;
pub mod stats;
pub mod task;

pub use commands::*;

use std::path::PathBuf;

use rusqlite::Connection;

use crate::board::Board;
use crate::config::Config;
use crate::error::KanbanError;
use crate::models::{ColumnId, Priority};
use crate::output;
use crate::store::{connection, snapshot};

/// Open the initialized database.
pub(crate) fn open_conn(db: Option<PathBuf>) -> Result<Connection, KanbanError> {
    let config = Config::resolve(db)?;
    connection::open_db(&config.db_path)
}

/// Open the initialized database and load the stored board for reading.
pub(crate) fn open_board(db: Option<PathBuf>) -> Result<(Connection, Board), KanbanError> {
    let conn = open_conn(db)?;
    let board = snapshot::load_board(&conn)?;
    Ok((conn, board))
}

/// Turn a command result into an exit code, reporting the error if any.
pub(crate) fn finish(result: Result<i32, KanbanError>, json_output: bool) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            if json_output {
                output::json::print(&output::json::error(&e));
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}

pub(crate) fn parse_column(s: &str) -> Result<ColumnId, KanbanError> {
    ColumnId::from_str(s).ok_or_else(|| {
        KanbanError::validation(format!(
            "Unknown column '{s}'. Expected one of: backlog, in-progress, blocked, done"
        ))
    })
}

pub(crate) fn parse_priority(s: &str) -> Result<Priority, KanbanError> {
    Priority::from_str(s).ok_or_else(|| {
        KanbanError::validation(format!(
            "Unknown priority '{s}'. Expected one of: low, medium, high"
        ))
    })
}
