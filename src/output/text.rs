use chrono::{DateTime, Utc};

use crate::board::stats::{self, BoardStats};
use crate::board::Board;
use crate::error::fmt_hours;
use crate::models::{Settings, Task};

/// First eight characters of an id, cut on a char boundary.
fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

fn task_line(t: &Task, settings: &Settings, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "  [{}] {} ({}) {}h @{}",
        t.priority.as_str(),
        t.title,
        short_id(&t.id),
        fmt_hours(t.estimate),
        t.assignee
    );
    if let Some(done) = t.completed_at {
        line.push_str(&format!(" done {}", done.format("%b %-d")));
    }
    if stats::is_stalled(t, settings, now) {
        line.push_str(" STALLED");
    }
    line
}

pub fn print_task(t: &Task, settings: &Settings, now: DateTime<Utc>) {
    println!("Task: {} ({})", t.title, t.id);
    println!("  Column: {}", t.column_id.as_str());
    println!("  Assignee: {}", t.assignee);
    println!("  Estimate: {}h", fmt_hours(t.estimate));
    println!("  Priority: {}", t.priority.as_str());
    println!("  Created: {}", t.created_at.to_rfc3339());
    if let Some(blocked) = t.blocked_at {
        println!("  Blocked since: {}", blocked.to_rfc3339());
    }
    if let Some(completed) = t.completed_at {
        println!("  Completed: {}", completed.to_rfc3339());
    }
    if stats::is_stalled(t, settings, now) {
        println!("  STALLED");
    }
}

pub fn print_task_list(tasks: &[&Task], settings: &Settings, now: DateTime<Utc>) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    for t in tasks {
        println!("{} [{}]", task_line(t, settings, now), t.column_id.as_str());
    }
}

pub fn print_board(board: &Board, now: DateTime<Utc>) {
    let settings = board.settings();
    let totals = stats::column_hours(board);
    for (column, tasks) in board.columns() {
        let hours = fmt_hours(totals[&column]);
        let count = match tasks.len() {
            1 => "1 task".to_string(),
            n => format!("{n} tasks"),
        };
        if column == crate::models::ColumnId::InProgress {
            println!(
                "{} ({count}, {hours}h / {}h WIP)",
                column.as_str(),
                fmt_hours(settings.wip_limit_hours)
            );
        } else {
            println!("{} ({count}, {hours}h)", column.as_str());
        }
        for t in tasks {
            println!("{}", task_line(t, &settings, now));
        }
    }
}

pub fn print_settings(s: &Settings) {
    println!("WIP limit: {}h", fmt_hours(s.wip_limit_hours));
    println!("Blocked stall time: {}h", fmt_hours(s.blocked_stall_time_hours));
}

pub fn print_stats(s: &BoardStats) {
    println!(
        "WIP: {}h / {}h ({}h remaining)",
        fmt_hours(s.wip_hours),
        fmt_hours(s.wip_limit_hours),
        fmt_hours(s.wip_remaining_hours)
    );
    println!("Stalled: {}", s.stalled);
    println!("Total: {} tasks, {}h", s.total_tasks, fmt_hours(s.total_hours));
    println!("\nColumns:");
    for c in &s.columns {
        println!("  {}: {} tasks, {}h", c.column.as_str(), c.tasks, fmt_hours(c.hours));
    }
    println!("\nResource load:");
    if s.by_assignee.is_empty() {
        println!("  (none)");
    }
    for (name, hours) in &s.by_assignee {
        println!("  {name}: {}h", fmt_hours(*hours));
    }
    println!("\nBy priority:");
    for (priority, hours) in &s.by_priority {
        println!("  {}: {}h", priority.as_str(), fmt_hours(*hours));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnId, Priority};
    use crate::testing::FixedClock;

    fn task_with_id(id: &str) -> Task {
        let now = FixedClock::from_millis(0).0;
        Task {
            id: id.to_string(),
            title: "Fix login".to_string(),
            assignee: "Ana".to_string(),
            estimate: 2.0,
            priority: Priority::High,
            created_at: now,
            blocked_at: None,
            completed_at: None,
            column_id: ColumnId::Backlog,
        }
    }

    #[test]
    fn test_short_id_ascii() {
        assert_eq!(short_id("01HZX4K9ABCDEFGH"), "01HZX4K9");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id(""), "");
    }

    #[test]
    fn test_short_id_cuts_on_char_boundary() {
        assert_eq!(short_id("tâche-numéro-1"), "tâche-nu");
        assert_eq!(short_id("日本語のタスクです"), "日本語のタスクで");
        assert_eq!(short_id("ééé"), "ééé");
    }

    #[test]
    fn test_task_line_with_multibyte_id() {
        let task = task_with_id("ééééééééé");
        let now = FixedClock::from_millis(0).0;
        let line = task_line(&task, &Settings::default(), now);
        assert_eq!(line, "  [High] Fix login (éééééééé) 2h @Ana");
    }
}
