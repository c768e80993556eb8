use rusqlite::{params, Connection, OptionalExtension};

use crate::error::KanbanError;

pub fn get(conn: &Connection, key: &str) -> Result<Option<String>, KanbanError> {
    let value = conn
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

/// Insert or overwrite the value under `key`.
pub fn put(conn: &Connection, key: &str, value: &str) -> Result<(), KanbanError> {
    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
        params![key, value],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::migrations::run_migrations;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_missing_key() {
        let conn = memory_db();
        assert_eq!(get(&conn, "absent").unwrap(), None);
    }

    #[test]
    fn test_put_overwrites() {
        let conn = memory_db();
        put(&conn, "k", "one").unwrap();
        put(&conn, "k", "two").unwrap();
        assert_eq!(get(&conn, "k").unwrap().as_deref(), Some("two"));
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }
}
