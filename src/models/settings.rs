use serde::{Deserialize, Serialize};

use crate::error::KanbanError;

pub const DEFAULT_WIP_LIMIT_HOURS: f64 = 20.0;
pub const DEFAULT_BLOCKED_STALL_TIME_HOURS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub wip_limit_hours: f64,
    pub blocked_stall_time_hours: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wip_limit_hours: DEFAULT_WIP_LIMIT_HOURS,
            blocked_stall_time_hours: DEFAULT_BLOCKED_STALL_TIME_HOURS,
        }
    }
}

impl Settings {
    pub fn new(wip_limit_hours: f64, blocked_stall_time_hours: f64) -> Result<Self, KanbanError> {
        check_positive_hours("WIP limit", wip_limit_hours)?;
        check_positive_hours("Blocked stall time", blocked_stall_time_hours)?;
        Ok(Self {
            wip_limit_hours,
            blocked_stall_time_hours,
        })
    }
}

pub(crate) fn check_positive_hours(label: &str, hours: f64) -> Result<(), KanbanError> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(KanbanError::validation(format!(
            "{label} must be greater than 0"
        )));
    }
    Ok(())
}
