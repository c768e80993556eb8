use rusqlite::Connection;

use crate::error::KanbanError;

pub fn run_migrations(conn: &Connection) -> Result<(), KanbanError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;
    Ok(())
}
