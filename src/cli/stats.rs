use std::path::PathBuf;

use chrono::Utc;

use crate::board::stats;
use crate::cli::{finish, open_board};
use crate::error::KanbanError;
use crate::output;

pub fn run(json_output: bool, db: Option<PathBuf>) -> i32 {
    finish(run_inner(json_output, db), json_output)
}

fn run_inner(json_output: bool, db: Option<PathBuf>) -> Result<i32, KanbanError> {
    let (_conn, board) = open_board(db)?;
    let summary = stats::summarize(&board, Utc::now());

    if json_output {
        output::json::print(&output::json::success(output::json::stats_json(&summary)));
    } else {
        output::text::print_stats(&summary);
    }
    Ok(0)
}
