use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotInitialized,
    TaskNotFound,
    AmbiguousRef,
    WipLimitExceeded,
    ValidationError,
    StorageError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::AmbiguousRef => "AMBIGUOUS_REF",
            Self::WipLimitExceeded => "WIP_LIMIT_EXCEEDED",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::StorageError => "STORAGE_ERROR",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct KanbanError {
    pub code: ErrorCode,
    pub message: String,
}

impl KanbanError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_initialized() -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            "kanban is not initialized. Run `kanban init` first.",
        )
    }

    pub fn task_not_found(reference: &str) -> Self {
        Self::new(ErrorCode::TaskNotFound, format!("Task not found: {reference}"))
    }

    pub fn ambiguous_ref(reference: &str, candidates: &[String]) -> Self {
        Self::new(
            ErrorCode::AmbiguousRef,
            format!(
                "Ambiguous reference '{}'. Candidates: {}",
                reference,
                candidates.join(", ")
            ),
        )
    }

    /// Raised when a move or add would push In Progress above the cap.
    pub fn wip_limit_exceeded(current: f64, limit: f64) -> Self {
        Self::new(
            ErrorCode::WipLimitExceeded,
            format!(
                "WIP Limit Exceeded! Current: {}h. Limit: {}h.",
                fmt_hours(current),
                fmt_hours(limit)
            ),
        )
    }

    /// Raised when an estimate change on an In Progress task would break the cap.
    pub fn wip_limit_exceeded_for_estimate(current: f64, limit: f64) -> Self {
        Self::new(
            ErrorCode::WipLimitExceeded,
            format!(
                "WIP limit exceeded for this estimate. Current: {}h. Limit: {}h.",
                fmt_hours(current),
                fmt_hours(limit)
            ),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }
}

/// Hours rounded to two decimals, without trailing zeros.
pub fn fmt_hours(hours: f64) -> String {
    format!("{}", (hours * 100.0).round() / 100.0)
}

impl From<rusqlite::Error> for KanbanError {
    fn from(e: rusqlite::Error) -> Self {
        Self::storage(e.to_string())
    }
}

impl From<serde_json::Error> for KanbanError {
    fn from(e: serde_json::Error) -> Self {
        Self::storage(format!("Corrupt board snapshot: {e}"))
    }
}

impl From<std::io::Error> for KanbanError {
    fn from(e: std::io::Error) -> Self {
        Self::storage(e.to_string())
    }
}
