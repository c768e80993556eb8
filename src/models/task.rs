use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::column::{ColumnId, Priority};
use super::settings::check_positive_hours;
use crate::error::KanbanError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub assignee: String,
    /// Estimated effort in hours.
    pub estimate: f64,
    pub priority: Priority,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Set while the task sits in Blocked, cleared when it leaves.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub blocked_at: Option<DateTime<Utc>>,
    /// Set on entering Done; normal moves never clear it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub completed_at: Option<DateTime<Utc>>,
    pub column_id: ColumnId,
}

/// Caller-supplied fields for a new task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskInput {
    pub title: String,
    pub assignee: String,
    pub estimate: f64,
    pub priority: Priority,
}

impl TaskInput {
    pub fn new(
        title: impl Into<String>,
        assignee: impl Into<String>,
        estimate: f64,
        priority: Priority,
    ) -> Self {
        Self {
            title: title.into(),
            assignee: assignee.into(),
            estimate,
            priority,
        }
    }

    pub fn validate(&self) -> Result<(), KanbanError> {
        check_non_empty("Title", &self.title)?;
        check_non_empty("Assignee", &self.assignee)?;
        check_positive_hours("Estimate", self.estimate)
    }
}

/// Partial update. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub assignee: Option<String>,
    pub estimate: Option<f64>,
    pub priority: Option<Priority>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.assignee.is_none()
            && self.estimate.is_none()
            && self.priority.is_none()
    }

    pub fn validate(&self) -> Result<(), KanbanError> {
        if let Some(ref title) = self.title {
            check_non_empty("Title", title)?;
        }
        if let Some(ref assignee) = self.assignee {
            check_non_empty("Assignee", assignee)?;
        }
        if let Some(estimate) = self.estimate {
            check_positive_hours("Estimate", estimate)?;
        }
        Ok(())
    }

    pub(crate) fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(assignee) = self.assignee {
            task.assignee = assignee;
        }
        if let Some(estimate) = self.estimate {
            task.estimate = estimate;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
    }
}

fn check_non_empty(label: &str, value: &str) -> Result<(), KanbanError> {
    if value.trim().is_empty() {
        return Err(KanbanError::validation(format!("{label} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Task {
        Task {
            id: "01J0000000000000000000000A".into(),
            title: "Write docs".into(),
            assignee: "Ana".into(),
            estimate: 2.5,
            priority: Priority::Medium,
            created_at: Utc.timestamp_millis_opt(1_000).unwrap(),
            blocked_at: None,
            completed_at: None,
            column_id: ColumnId::Backlog,
        }
    }

    #[test]
    fn test_task_wire_format() {
        let v = serde_json::to_value(sample()).unwrap();
        assert_eq!(v["createdAt"], 1000);
        assert_eq!(v["columnId"], "Backlog");
        assert_eq!(v["priority"], "Medium");
        assert!(v.get("blockedAt").is_none());
        assert!(v.get("completedAt").is_none());
    }

    #[test]
    fn test_task_reads_optional_timestamps() {
        let raw = r#"{"id":"x","title":"T","assignee":"A","estimate":1,"priority":"Low",
            "createdAt":5,"blockedAt":7,"columnId":"Blocked"}"#;
        let t: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(t.blocked_at, Some(Utc.timestamp_millis_opt(7).unwrap()));
        assert_eq!(t.completed_at, None);
        assert_eq!(t.column_id, ColumnId::Blocked);
    }

    #[test]
    fn test_input_validation() {
        assert!(TaskInput::new("T", "A", 2.0, Priority::Low).validate().is_ok());
        assert!(TaskInput::new("  ", "A", 2.0, Priority::Low).validate().is_err());
        assert!(TaskInput::new("T", "", 2.0, Priority::Low).validate().is_err());
        assert!(TaskInput::new("T", "A", 0.0, Priority::Low).validate().is_err());
        assert!(TaskInput::new("T", "A", f64::NAN, Priority::Low).validate().is_err());
    }

    #[test]
    fn test_patch_preserves_unspecified_fields() {
        let mut t = sample();
        TaskPatch {
            title: Some("Rewrite docs".into()),
            ..Default::default()
        }
        .apply(&mut t);
        assert_eq!(t.title, "Rewrite docs");
        assert_eq!(t.assignee, "Ana");
        assert_eq!(t.estimate, 2.5);
    }

    #[test]
    fn test_patch_validation() {
        let bad = TaskPatch {
            estimate: Some(-1.0),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        assert!(TaskPatch::default().validate().is_ok());
        assert!(TaskPatch::default().is_empty());
    }
}
