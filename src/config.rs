use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{ErrorCode, KanbanError};

/// Environment variable that points at the board database.
pub const DB_ENV: &str = "KANBAN_DB";
/// Environment variable holding the tracing filter directive.
pub const LOG_ENV: &str = "KANBAN_LOG";
/// `json` switches log lines to JSON; anything else is compact text.
pub const LOG_FORMAT_ENV: &str = "KANBAN_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
}

impl Config {
    /// Resolve the database location: explicit flag, then `KANBAN_DB`, then
    /// `<git-root>/.kanban/kanban.db`.
    pub fn resolve(db_flag: Option<PathBuf>) -> Result<Self, KanbanError> {
        Self::resolve_from(db_flag, env::var_os(DB_ENV), &env::current_dir()?)
    }

    /// Same order as [`Config::resolve`], with the environment value and the
    /// working directory passed in.
    pub fn resolve_from(
        db_flag: Option<PathBuf>,
        db_env: Option<OsString>,
        cwd: &Path,
    ) -> Result<Self, KanbanError> {
        if let Some(db_path) = db_flag {
            return Ok(Self { db_path });
        }
        if let Some(value) = db_env.filter(|v| !v.is_empty()) {
            return Ok(Self {
                db_path: PathBuf::from(value),
            });
        }
        let root = find_git_root(cwd)?;
        Ok(Self {
            db_path: root.join(".kanban").join("kanban.db"),
        })
    }
}

/// Find the .git root by walking up from `start`.
pub fn find_git_root(start: &Path) -> Result<PathBuf, KanbanError> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(".git").exists() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(KanbanError::new(
                ErrorCode::NotInitialized,
                format!("Not inside a git repository. Pass --db or set {DB_ENV}."),
            ));
        }
    }
}
