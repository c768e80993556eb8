//! Read-only workload views derived from a [`Board`]. Nothing here is stored.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Board;
use crate::models::{ColumnId, Priority, Settings, Task};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Estimate-hours per assignee across all columns.
pub fn hours_by_assignee(board: &Board) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for task in board.tasks() {
        *totals.entry(task.assignee.clone()).or_insert(0.0) += task.estimate;
    }
    totals
}

/// Estimate-hours per priority across all columns. Every priority is present.
pub fn hours_by_priority(board: &Board) -> BTreeMap<Priority, f64> {
    let mut totals: BTreeMap<Priority, f64> = Priority::ALL.iter().map(|p| (*p, 0.0)).collect();
    for task in board.tasks() {
        *totals.entry(task.priority).or_insert(0.0) += task.estimate;
    }
    totals
}

/// Estimate-hours per column, every column present. Board views and
/// [`summarize`] read their per-column totals from here.
pub fn column_hours(board: &Board) -> BTreeMap<ColumnId, f64> {
    board
        .columns()
        .map(|(c, _)| (c, board.column_hours(c)))
        .collect()
}

/// A task is stalled when it has sat in Blocked for longer than the threshold.
pub fn is_stalled(task: &Task, settings: &Settings, now: DateTime<Utc>) -> bool {
    if task.column_id != ColumnId::Blocked {
        return false;
    }
    let Some(blocked_at) = task.blocked_at else {
        return false;
    };
    let elapsed_ms = (now - blocked_at).num_milliseconds() as f64;
    elapsed_ms > settings.blocked_stall_time_hours * MILLIS_PER_HOUR
}

pub fn stalled_tasks(board: &Board, now: DateTime<Utc>) -> Vec<&Task> {
    let settings = board.settings();
    board
        .column(ColumnId::Blocked)
        .iter()
        .filter(|t| is_stalled(t, &settings, now))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnLoad {
    pub column: ColumnId,
    pub tasks: usize,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardStats {
    pub columns: Vec<ColumnLoad>,
    pub total_tasks: usize,
    pub total_hours: f64,
    pub wip_hours: f64,
    pub wip_limit_hours: f64,
    pub wip_remaining_hours: f64,
    pub stalled: usize,
    pub by_assignee: BTreeMap<String, f64>,
    pub by_priority: BTreeMap<Priority, f64>,
}

pub fn summarize(board: &Board, now: DateTime<Utc>) -> BoardStats {
    let hours = column_hours(board);
    let columns: Vec<ColumnLoad> = board
        .columns()
        .map(|(column, tasks)| ColumnLoad {
            column,
            tasks: tasks.len(),
            hours: hours[&column],
        })
        .collect();
    let wip_hours = hours[&ColumnId::InProgress];
    let wip_limit_hours = board.settings().wip_limit_hours;

    BoardStats {
        total_tasks: columns.iter().map(|c| c.tasks).sum(),
        total_hours: columns.iter().map(|c| c.hours).sum(),
        columns,
        wip_hours,
        wip_limit_hours,
        wip_remaining_hours: (wip_limit_hours - wip_hours).max(0.0),
        stalled: stalled_tasks(board, now).len(),
        by_assignee: hours_by_assignee(board),
        by_priority: hours_by_priority(board),
    }
}
