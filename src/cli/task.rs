use std::path::PathBuf;

use chrono::Utc;
use mockable::DefaultClock;
use serde_json::json;

use crate::cli::commands::TaskCommands;
use crate::cli::{finish, open_board, open_conn, parse_column, parse_priority};
use crate::error::{ErrorCode, KanbanError};
use crate::models::{TaskInput, TaskPatch};
use crate::output;
use crate::session::EditSession;
use crate::store::snapshot;

pub fn run(cmd: TaskCommands, json_output: bool, db: Option<PathBuf>) -> i32 {
    let result = match cmd {
        TaskCommands::Add {
            title,
            assignee,
            estimate,
            priority,
            column,
        } => run_add(title, assignee, estimate, &priority, &column, json_output, db),
        TaskCommands::Move { id, column, index } => run_move(&id, &column, index, json_output, db),
        TaskCommands::Update {
            id,
            title,
            assignee,
            estimate,
            priority,
        } => run_update(&id, title, assignee, estimate, priority.as_deref(), json_output, db),
        TaskCommands::Delete { id } => run_delete(&id, json_output, db),
        TaskCommands::Show { id } => run_show(&id, json_output, db),
        TaskCommands::List { column } => run_list(column.as_deref(), json_output, db),
    };
    finish(result, json_output)
}

fn run_add(
    title: String,
    assignee: String,
    estimate: f64,
    priority: &str,
    column: &str,
    json_output: bool,
    db: Option<PathBuf>,
) -> Result<i32, KanbanError> {
    let column = parse_column(column)?;
    let input = TaskInput::new(title, assignee, estimate, parse_priority(priority)?);
    input.validate()?;

    let mut conn = open_conn(db)?;
    let task = snapshot::update_board(&mut conn, |board| {
        Ok(board.add_task(column, input, &DefaultClock)?.clone())
    })?;

    if json_output {
        output::json::print(&output::json::success(json!({
            "task": output::json::task_summary(&task)
        })));
    } else {
        println!("Added task: {} ({}) to {}", task.title, task.id, task.column_id.as_str());
    }
    Ok(0)
}

fn run_move(
    reference: &str,
    column: &str,
    index: Option<usize>,
    json_output: bool,
    db: Option<PathBuf>,
) -> Result<i32, KanbanError> {
    let dest = parse_column(column)?;
    let mut conn = open_conn(db)?;
    let (task, source, position) = snapshot::update_board(&mut conn, |board| {
        let (task_id, source) = {
            let task = board.resolve_task(reference)?;
            (task.id.clone(), task.column_id)
        };
        let index = index.unwrap_or_else(|| board.column(dest).len());
        let task = board
            .move_task(&task_id, source, dest, index, &DefaultClock)?
            .clone();
        let position = board
            .column(dest)
            .iter()
            .position(|t| t.id == task.id)
            .unwrap_or_default();
        Ok((task, source, position))
    })?;
    if json_output {
        output::json::print(&output::json::success(json!({
            "task": output::json::task_summary(&task),
            "from": source.as_str(),
            "to": dest.as_str(),
            "index": position
        })));
    } else {
        println!(
            "Task {} {} → {} (position {})",
            task.id,
            source.as_str(),
            dest.as_str(),
            position
        );
    }
    Ok(0)
}

fn run_update(
    reference: &str,
    title: Option<String>,
    assignee: Option<String>,
    estimate: Option<f64>,
    priority: Option<&str>,
    json_output: bool,
    db: Option<PathBuf>,
) -> Result<i32, KanbanError> {
    let patch = TaskPatch {
        title,
        assignee,
        estimate,
        priority: priority.map(parse_priority).transpose()?,
    };
    if patch.is_empty() {
        return Err(KanbanError::validation(
            "Nothing to update. Pass --title, --assignee, --estimate or --priority.",
        ));
    }
    patch.validate()?;

    let mut conn = open_conn(db)?;
    let task = snapshot::update_board(&mut conn, |board| {
        let (task_id, column) = {
            let task = board.resolve_task(reference)?;
            (task.id.clone(), task.column_id)
        };
        let mut session = EditSession::new();
        session.set_editing_task(task_id.clone(), column);
        let result = board.update_task(&task_id, column, patch).cloned();
        session.clear_editing_task();
        result
    })?;

    if json_output {
        output::json::print(&output::json::success(json!({
            "task": output::json::task_summary(&task)
        })));
    } else {
        println!("Updated task: {} ({})", task.title, task.id);
    }
    Ok(0)
}

fn run_delete(reference: &str, json_output: bool, db: Option<PathBuf>) -> Result<i32, KanbanError> {
    let mut conn = open_conn(db)?;
    let removed = snapshot::update_board(&mut conn, |board| {
        // Deleting something that is not there is a no-op, not an error.
        let target = match board.resolve_task(reference) {
            Ok(task) => Some((task.id.clone(), task.column_id)),
            Err(e) if e.code == ErrorCode::TaskNotFound => None,
            Err(e) => return Err(e),
        };
        Ok(target.and_then(|(task_id, column)| board.delete_task(&task_id, column)))
    })?;

    if json_output {
        output::json::print(&output::json::success(json!({
            "deleted": removed.as_ref().map(output::json::task_summary)
        })));
    } else if let Some(task) = removed {
        println!("Deleted task: {} ({})", task.title, task.id);
    } else {
        println!("No task matching '{reference}'. Nothing deleted.");
    }
    Ok(0)
}

fn run_show(reference: &str, json_output: bool, db: Option<PathBuf>) -> Result<i32, KanbanError> {
    let (_conn, board) = open_board(db)?;
    let task = board.resolve_task(reference)?;
    let settings = board.settings();
    let now = Utc::now();

    if json_output {
        output::json::print(&output::json::success(json!({
            "task": output::json::task_detail(task, &settings, now)
        })));
    } else {
        output::text::print_task(task, &settings, now);
    }
    Ok(0)
}

fn run_list(column: Option<&str>, json_output: bool, db: Option<PathBuf>) -> Result<i32, KanbanError> {
    let column = column.map(parse_column).transpose()?;
    let (_conn, board) = open_board(db)?;
    let tasks: Vec<_> = board
        .tasks()
        .filter(|t| column.map_or(true, |c| t.column_id == c))
        .collect();
    let settings = board.settings();
    let now = Utc::now();

    if json_output {
        let tasks_json: Vec<_> = tasks
            .iter()
            .map(|t| output::json::task_detail(t, &settings, now))
            .collect();
        output::json::print(&output::json::success(json!({ "tasks": tasks_json })));
    } else {
        output::text::print_task_list(&tasks, &settings, now);
    }
    Ok(0)
}
