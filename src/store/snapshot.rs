//! Board snapshot stored as one JSON blob under a fixed key.
//!
//! Layout: `{"state": {"columns": {...}, "wipLimitHours": .., "blockedStallTimeHours": ..}, "version": 0}`.
//! Unknown state keys (for example a stale editing reference) are ignored on read.

use std::collections::BTreeMap;

use rusqlite::{Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::kv;
use crate::board::Board;
use crate::error::KanbanError;
use crate::models::{
    ColumnId, Settings, Task, DEFAULT_BLOCKED_STALL_TIME_HOURS, DEFAULT_WIP_LIMIT_HOURS,
};

pub const STORAGE_KEY: &str = "kanban-storage";
pub const SNAPSHOT_VERSION: u32 = 0;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    state: BoardState,
    #[serde(default)]
    version: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoardState {
    #[serde(default)]
    columns: BTreeMap<ColumnId, Vec<Task>>,
    #[serde(default = "default_wip_limit")]
    wip_limit_hours: f64,
    #[serde(default = "default_stall_time")]
    blocked_stall_time_hours: f64,
}

fn default_wip_limit() -> f64 {
    DEFAULT_WIP_LIMIT_HOURS
}

fn default_stall_time() -> f64 {
    DEFAULT_BLOCKED_STALL_TIME_HOURS
}

pub fn encode(board: &Board) -> Result<String, KanbanError> {
    let settings = board.settings();
    let envelope = Envelope {
        state: BoardState {
            columns: board.columns().map(|(c, tasks)| (c, tasks.to_vec())).collect(),
            wip_limit_hours: settings.wip_limit_hours,
            blocked_stall_time_hours: settings.blocked_stall_time_hours,
        },
        version: SNAPSHOT_VERSION,
    };
    Ok(serde_json::to_string(&envelope)?)
}

pub fn decode(raw: &str) -> Result<Board, KanbanError> {
    let envelope: Envelope = serde_json::from_str(raw)?;
    if envelope.version != SNAPSHOT_VERSION {
        return Err(KanbanError::storage(format!(
            "Unsupported board snapshot version: {}",
            envelope.version
        )));
    }
    let state = envelope.state;
    // Stored values are taken as written; only new values go through validation.
    let settings = Settings {
        wip_limit_hours: state.wip_limit_hours,
        blocked_stall_time_hours: state.blocked_stall_time_hours,
    };
    Ok(Board::from_parts(state.columns, settings))
}

/// Load the stored board, or a default board if nothing was saved yet.
pub fn load_board(conn: &Connection) -> Result<Board, KanbanError> {
    match kv::get(conn, STORAGE_KEY)? {
        Some(raw) => decode(&raw),
        None => {
            debug!("no stored board, starting empty");
            Ok(Board::default())
        }
    }
}

pub fn save_board(conn: &Connection, board: &Board) -> Result<(), KanbanError> {
    let raw = encode(board)?;
    kv::put(conn, STORAGE_KEY, &raw)?;
    debug!(bytes = raw.len(), "saved board snapshot");
    Ok(())
}

/// Load, change and save the board inside one `IMMEDIATE` transaction.
///
/// The write lock is taken before the snapshot is read, so concurrent writers
/// queue behind each other instead of overwriting each other's changes. When
/// `f` fails the transaction is dropped and nothing is written.
pub fn update_board<T>(
    conn: &mut Connection,
    f: impl FnOnce(&mut Board) -> Result<T, KanbanError>,
) -> Result<T, KanbanError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let mut board = load_board(&tx)?;
    let value = f(&mut board)?;
    save_board(&tx, &board)?;
    tx.commit()?;
    Ok(value)
}

/// Write a default board unless one is already stored. Returns whether it wrote.
pub fn ensure_board(conn: &Connection) -> Result<bool, KanbanError> {
    if kv::get(conn, STORAGE_KEY)?.is_some() {
        return Ok(false);
    }
    save_board(conn, &Board::default())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::models::{Priority, TaskInput};
    use crate::store::connection::{init_db, open_db};
    use crate::store::migrations::run_migrations;
    use crate::testing::FixedClock;
    use std::time::Duration;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_round_trip_through_store() {
        let conn = memory_db();
        let mut board = Board::default();
        board.update_settings(12.0, 48.0).unwrap();
        let clock = FixedClock::from_millis(1_700_000_000_000);
        board
            .add_task(ColumnId::Blocked, TaskInput::new("T", "A", 2.0, Priority::High), &clock)
            .unwrap();
        board
            .add_task(ColumnId::Backlog, TaskInput::new("U", "B", 1.0, Priority::Low), &clock)
            .unwrap();

        save_board(&conn, &board).unwrap();
        assert_eq!(load_board(&conn).unwrap(), board);
    }

    #[test]
    fn test_load_without_snapshot_gives_default() {
        let conn = memory_db();
        assert_eq!(load_board(&conn).unwrap(), Board::default());
    }

    #[test]
    fn test_ensure_board_only_writes_once() {
        let conn = memory_db();
        assert!(ensure_board(&conn).unwrap());
        let mut board = load_board(&conn).unwrap();
        board.update_settings(5.0, 5.0).unwrap();
        save_board(&conn, &board).unwrap();

        assert!(!ensure_board(&conn).unwrap());
        assert_eq!(load_board(&conn).unwrap().settings().wip_limit_hours, 5.0);
    }

    fn titles(board: &Board, column: ColumnId) -> Vec<String> {
        board.column(column).iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn test_update_board_saves_change() {
        let mut conn = memory_db();
        let clock = FixedClock::from_millis(0);
        let id = update_board(&mut conn, |board| {
            let task = board.add_task(ColumnId::Backlog, TaskInput::new("A", "X", 1.0, Priority::Low), &clock)?;
            Ok(task.id.clone())
        })
        .unwrap();

        let board = load_board(&conn).unwrap();
        assert_eq!(board.column(ColumnId::Backlog)[0].id, id);
    }

    #[test]
    fn test_update_board_writes_nothing_on_error() {
        let mut conn = memory_db();
        ensure_board(&conn).unwrap();
        let clock = FixedClock::from_millis(0);
        let err = update_board(&mut conn, |board| {
            board.add_task(ColumnId::Backlog, TaskInput::new("A", "X", 1.0, Priority::Low), &clock)?;
            board.update_settings(-1.0, 1.0)
        })
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(load_board(&conn).unwrap().column(ColumnId::Backlog).is_empty());
    }

    #[test]
    fn test_concurrent_writers_do_not_lose_updates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kanban.db");
        let mut left = init_db(&path).unwrap();
        let mut right = open_db(&path).unwrap();
        right.busy_timeout(Duration::ZERO).unwrap();
        let clock = FixedClock::from_millis(0);

        update_board(&mut left, |board| {
            board.add_task(ColumnId::Backlog, TaskInput::new("A", "X", 1.0, Priority::Low), &clock)?;
            // The other connection cannot read a snapshot while this one holds it.
            let err = update_board(&mut right, |board| {
                board.add_task(ColumnId::Backlog, TaskInput::new("B", "Y", 1.0, Priority::Low), &clock)?;
                Ok(())
            })
            .unwrap_err();
            assert_eq!(err.code, ErrorCode::StorageError);
            Ok(())
        })
        .unwrap();

        update_board(&mut right, |board| {
            board.add_task(ColumnId::Backlog, TaskInput::new("B", "Y", 1.0, Priority::Low), &clock)?;
            Ok(())
        })
        .unwrap();

        assert_eq!(titles(&load_board(&left).unwrap(), ColumnId::Backlog), ["A", "B"]);
        assert_eq!(titles(&load_board(&right).unwrap(), ColumnId::Backlog), ["A", "B"]);
    }

    #[test]
    fn test_snapshot_layout() {
        let raw = encode(&Board::default()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v["version"], 0);
        assert_eq!(v["state"]["wipLimitHours"], 20.0);
        assert_eq!(v["state"]["blockedStallTimeHours"], 1.0);
        assert!(v["state"]["columns"]["In Progress"].as_array().unwrap().is_empty());
        assert!(v["state"].get("editingTask").is_none());
    }

    #[test]
    fn test_decode_partial_snapshot() {
        let raw = r#"{"state":{"columns":{"Done":[{"id":"x","title":"T","assignee":"A",
            "estimate":3,"priority":"Low","createdAt":1,"completedAt":2,"columnId":"Done"}]},
            "editingTask":null},"version":0}"#;
        let board = decode(raw).unwrap();
        assert_eq!(board.column(ColumnId::Done).len(), 1);
        assert!(board.column(ColumnId::Backlog).is_empty());
        assert_eq!(board.settings(), Settings::default());
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let err = decode(r#"{"state":{},"version":3}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageError);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(decode("not json").unwrap_err().code, ErrorCode::StorageError);
    }
}
