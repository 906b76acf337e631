//! `todos` table definition.
//!
//! # Invariants
//! - `id` is `AUTOINCREMENT`, so deleted ids are never reassigned.
//! - Timestamps are stored as fixed-width ISO-8601 UTC text.

use super::DbResult;
use rusqlite::Connection;

/// Name of the single table owned by the store.
pub const TODOS_TABLE: &str = "todos";

/// Columns every store connection must expose.
pub const TODOS_COLUMNS: &[&str] = &["id", "title", "completed", "due_date", "created_at"];

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0,
    due_date TEXT,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_todos_due_created
    ON todos (due_date, created_at);
";

/// Creates the `todos` table and its index when missing.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
