use std::path::PathBuf;

use serde_json::json;

use crate::cli::commands::SettingsCommands;
use crate::cli::{finish, open_board, open_conn};
use crate::error::KanbanError;
use crate::output;
use crate::store::snapshot;

pub fn run(cmd: SettingsCommands, json_output: bool, db: Option<PathBuf>) -> i32 {
    let result = match cmd {
        SettingsCommands::Show => run_show(json_output, db),
        SettingsCommands::Set {
            wip_limit,
            stall_hours,
        } => run_set(wip_limit, stall_hours, json_output, db),
    };
    finish(result, json_output)
}

fn run_show(json_output: bool, db: Option<PathBuf>) -> Result<i32, KanbanError> {
    let (_conn, board) = open_board(db)?;
    let settings = board.settings();
    if json_output {
        output::json::print(&output::json::success(json!({
            "settings": output::json::settings_json(&settings)
        })));
    } else {
        output::text::print_settings(&settings);
    }
    Ok(0)
}

fn run_set(
    wip_limit: Option<f64>,
    stall_hours: Option<f64>,
    json_output: bool,
    db: Option<PathBuf>,
) -> Result<i32, KanbanError> {
    if wip_limit.is_none() && stall_hours.is_none() {
        return Err(KanbanError::validation(
            "Nothing to change. Pass --wip-limit and/or --stall-hours.",
        ));
    }

    let mut conn = open_conn(db)?;
    let settings = snapshot::update_board(&mut conn, |board| {
        let current = board.settings();
        board.update_settings(
            wip_limit.unwrap_or(current.wip_limit_hours),
            stall_hours.unwrap_or(current.blocked_stall_time_hours),
        )?;
        Ok(board.settings())
    })?;
    if json_output {
        output::json::print(&output::json::success(json!({
            "settings": output::json::settings_json(&settings)
        })));
    } else {
        println!("Settings updated.");
        output::text::print_settings(&settings);
    }
    Ok(0)
}
