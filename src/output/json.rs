use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::board::stats::{self, BoardStats};
use crate::board::Board;
use crate::error::KanbanError;
use crate::models::{Settings, Task};

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &KanbanError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn print(value: &Value) {
    println!("{value:#}");
}

fn timestamp(t: Option<DateTime<Utc>>) -> Value {
    t.map_or(Value::Null, |t| json!(t.to_rfc3339()))
}

pub fn task_summary(t: &Task) -> Value {
    json!({
        "id": t.id,
        "title": t.title,
        "column": t.column_id.as_str(),
        "assignee": t.assignee,
        "estimate": t.estimate,
        "priority": t.priority.as_str()
    })
}

pub fn task_detail(t: &Task, settings: &Settings, now: DateTime<Utc>) -> Value {
    json!({
        "id": t.id,
        "title": t.title,
        "column": t.column_id.as_str(),
        "assignee": t.assignee,
        "estimate": t.estimate,
        "priority": t.priority.as_str(),
        "created_at": timestamp(Some(t.created_at)),
        "blocked_at": timestamp(t.blocked_at),
        "completed_at": timestamp(t.completed_at),
        "stalled": stats::is_stalled(t, settings, now)
    })
}

pub fn settings_json(s: &Settings) -> Value {
    json!({
        "wip_limit_hours": s.wip_limit_hours,
        "blocked_stall_time_hours": s.blocked_stall_time_hours
    })
}

pub fn board_json(board: &Board, now: DateTime<Utc>) -> Value {
    let settings = board.settings();
    let totals = stats::column_hours(board);
    let columns: Vec<Value> = board
        .columns()
        .map(|(column, tasks)| {
            json!({
                "id": column.as_str(),
                "hours": totals[&column],
                "tasks": tasks.iter().map(|t| task_detail(t, &settings, now)).collect::<Vec<_>>()
            })
        })
        .collect();
    json!({
        "columns": columns,
        "settings": settings_json(&settings)
    })
}

pub fn stats_json(s: &BoardStats) -> Value {
    let columns: Vec<Value> = s
        .columns
        .iter()
        .map(|c| json!({ "id": c.column.as_str(), "tasks": c.tasks, "hours": c.hours }))
        .collect();
    let by_priority: serde_json::Map<String, Value> = s
        .by_priority
        .iter()
        .map(|(p, hours)| (p.as_str().to_string(), json!(hours)))
        .collect();
    json!({
        "columns": columns,
        "total_tasks": s.total_tasks,
        "total_hours": s.total_hours,
        "wip": {
            "hours": s.wip_hours,
            "limit": s.wip_limit_hours,
            "remaining": s.wip_remaining_hours
        },
        "stalled": s.stalled,
        "by_assignee": s.by_assignee,
        "by_priority": by_priority
    })
}
