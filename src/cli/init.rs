use std::path::PathBuf;

use serde_json::json;
use tracing::info;

use crate::cli::finish;
use crate::config::Config;
use crate::error::KanbanError;
use crate::output;
use crate::store::{connection, snapshot};

pub fn run(json_output: bool, db: Option<PathBuf>) -> i32 {
    finish(run_inner(json_output, db), json_output)
}

fn run_inner(json_output: bool, db: Option<PathBuf>) -> Result<i32, KanbanError> {
    let config = Config::resolve(db)?;
    let conn = connection::init_db(&config.db_path)?;
    let created = snapshot::ensure_board(&conn)?;
    info!(path = %config.db_path.display(), created, "initialized board");

    if json_output {
        output::json::print(&output::json::success(json!({
            "path": config.db_path.to_string_lossy(),
            "created": created
        })));
    } else {
        println!("Initialized kanban board at {}", config.db_path.display());
    }
    Ok(0)
}
