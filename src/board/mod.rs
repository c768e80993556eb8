//! The board-state reducer.
//!
//! A [`Board`] owns the column → task mapping and the board settings. All
//! mutations go through its methods, which either apply fully or return an
//! error and leave the board untouched.

pub mod stats;

use std::collections::BTreeMap;

use tracing::{debug, warn};

use mockable::Clock;
use crate::error::KanbanError;
use crate::models::{ColumnId, Settings, Task, TaskInput, TaskPatch};

/// Slack for float sums of hour estimates when comparing against the limit.
const HOURS_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    columns: BTreeMap<ColumnId, Vec<Task>>,
    settings: Settings,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Board {
    pub fn new(settings: Settings) -> Self {
        let columns = ColumnId::ALL.iter().map(|c| (*c, Vec::new())).collect();
        Self { columns, settings }
    }

    /// Rebuilds a board from stored parts. Missing columns come back empty and
    /// each task's `column_id` is realigned with the column holding it.
    pub(crate) fn from_parts(mut columns: BTreeMap<ColumnId, Vec<Task>>, settings: Settings) -> Self {
        for column in ColumnId::ALL {
            let tasks = columns.entry(column).or_default();
            for task in tasks.iter_mut() {
                task.column_id = column;
            }
        }
        Self { columns, settings }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn column(&self, column: ColumnId) -> &[Task] {
        self.columns.get(&column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Columns in board order.
    pub fn columns(&self) -> impl Iterator<Item = (ColumnId, &[Task])> + '_ {
        ColumnId::ALL.into_iter().map(move |c| (c, self.column(c)))
    }

    /// Every task, column by column, in column order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.columns().flat_map(|(_, tasks)| tasks.iter())
    }

    pub fn column_hours(&self, column: ColumnId) -> f64 {
        self.column(column).iter().map(|t| t.estimate).sum()
    }

    pub fn find_task(&self, task_id: &str) -> Option<&Task> {
        self.tasks().find(|t| t.id == task_id)
    }

    /// Resolve a task by exact id or unique id prefix.
    pub fn resolve_task(&self, reference: &str) -> Result<&Task, KanbanError> {
        if let Some(task) = self.find_task(reference) {
            return Ok(task);
        }
        if reference.is_empty() {
            return Err(KanbanError::task_not_found(reference));
        }

        let matches: Vec<&Task> = self
            .tasks()
            .filter(|t| t.id.starts_with(reference))
            .collect();
        match matches.as_slice() {
            [] => Err(KanbanError::task_not_found(reference)),
            [task] => Ok(*task),
            _ => {
                let candidates: Vec<String> = matches
                    .iter()
                    .map(|t| format!("{} ({})", t.title, t.id))
                    .collect();
                Err(KanbanError::ambiguous_ref(reference, &candidates))
            }
        }
    }

    /// Create a task at the end of `column`.
    ///
    /// Adding straight into In Progress is held to the same WIP limit as a move.
    pub fn add_task(
        &mut self,
        column: ColumnId,
        input: TaskInput,
        clock: &impl Clock,
    ) -> Result<&Task, KanbanError> {
        if column == ColumnId::InProgress {
            self.check_wip(self.column_hours(ColumnId::InProgress), input.estimate)?;
        }

        let now = clock.utc();
        let task = Task {
            id: ulid::Ulid::new().to_string(),
            title: input.title,
            assignee: input.assignee,
            estimate: input.estimate,
            priority: input.priority,
            created_at: now,
            blocked_at: (column == ColumnId::Blocked).then_some(now),
            completed_at: (column == ColumnId::Done).then_some(now),
            column_id: column,
        };
        debug!(task_id = %task.id, column = column.as_str(), "add task");

        let tasks = self.column_mut(column);
        tasks.push(task);
        Ok(&tasks[tasks.len() - 1])
    }

    /// Move a task to `index` in `dest` (clamped to the column length).
    ///
    /// A move within one column only reorders; timestamps change only when
    /// the task actually changes column.
    pub fn move_task(
        &mut self,
        task_id: &str,
        source: ColumnId,
        dest: ColumnId,
        index: usize,
        clock: &impl Clock,
    ) -> Result<&Task, KanbanError> {
        let pos = self.position(task_id, source)?;

        // A reorder inside In Progress leaves the load unchanged, so it is
        // allowed even when the limit was lowered below the current load.
        if dest == ColumnId::InProgress && source != dest {
            let estimate = self.column(source)[pos].estimate;
            self.check_wip(self.column_hours(ColumnId::InProgress), estimate)?;
        }

        let mut task = self.column_mut(source).remove(pos);
        if source != dest {
            let now = clock.utc();
            match dest {
                ColumnId::Done => task.completed_at = Some(now),
                ColumnId::Blocked => task.blocked_at = Some(now),
                _ => {}
            }
            if source == ColumnId::Blocked {
                task.blocked_at = None;
            }
            task.column_id = dest;
        }
        debug!(
            task_id,
            from = source.as_str(),
            to = dest.as_str(),
            index,
            "move task"
        );

        let tasks = self.column_mut(dest);
        let index = index.min(tasks.len());
        tasks.insert(index, task);
        Ok(&tasks[index])
    }

    /// Merge `patch` into the task in place.
    pub fn update_task(
        &mut self,
        task_id: &str,
        column: ColumnId,
        patch: TaskPatch,
    ) -> Result<&Task, KanbanError> {
        let pos = self.position(task_id, column)?;

        if column == ColumnId::InProgress {
            let old = self.column(column)[pos].estimate;
            if let Some(new) = patch.estimate.filter(|new| *new != old) {
                let current = self.column_hours(ColumnId::InProgress);
                if current - old + new > self.settings.wip_limit_hours + HOURS_EPSILON {
                    warn!(task_id, current, new, "estimate change rejected by WIP limit");
                    return Err(KanbanError::wip_limit_exceeded_for_estimate(
                        current,
                        self.settings.wip_limit_hours,
                    ));
                }
            }
        }

        debug!(task_id, column = column.as_str(), "update task");
        let task = &mut self.column_mut(column)[pos];
        patch.apply(task);
        Ok(&*task)
    }

    /// Remove a task. Absent tasks are not an error.
    pub fn delete_task(&mut self, task_id: &str, column: ColumnId) -> Option<Task> {
        let tasks = self.column_mut(column);
        let pos = tasks.iter().position(|t| t.id == task_id)?;
        debug!(task_id, column = column.as_str(), "delete task");
        Some(tasks.remove(pos))
    }

    /// Replace both settings. Values must be finite and positive.
    pub fn update_settings(
        &mut self,
        wip_limit_hours: f64,
        blocked_stall_time_hours: f64,
    ) -> Result<(), KanbanError> {
        self.settings = Settings::new(wip_limit_hours, blocked_stall_time_hours)?;
        debug!(wip_limit_hours, blocked_stall_time_hours, "update settings");
        Ok(())
    }

    fn column_mut(&mut self, column: ColumnId) -> &mut Vec<Task> {
        self.columns.entry(column).or_default()
    }

    fn position(&self, task_id: &str, column: ColumnId) -> Result<usize, KanbanError> {
        self.column(column)
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| KanbanError::task_not_found(task_id))
    }

    fn check_wip(&self, current: f64, incoming: f64) -> Result<(), KanbanError> {
        let limit = self.settings.wip_limit_hours;
        if current + incoming > limit + HOURS_EPSILON {
            warn!(current, incoming, limit, "rejected by WIP limit");
            return Err(KanbanError::wip_limit_exceeded(current, limit));
        }
        Ok(())
    }
}
