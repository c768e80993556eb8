use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use crate::error::KanbanError;

use super::migrations;

/// Open a connection to the database. Returns error if not initialized.
pub fn open_db(path: &Path) -> Result<Connection, KanbanError> {
    if !path.exists() {
        return Err(KanbanError::not_initialized());
    }
    debug!(path = %path.display(), "open board database");
    let conn = Connection::open(path)?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// Initialize the database: create directories, database, and run migrations.
pub fn init_db(path: &Path) -> Result<Connection, KanbanError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> Result<(), KanbanError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;",
    )?;
    Ok(())
}
