//! Todo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/create/complete/delete over the `todos` table.
//! - Own the canonical list ordering.
//!
//! # Invariants
//! - `list` orders dated rows first by ascending `due_date`, then undated
//!   rows; ties go to the most recently created row.
//! - Every mutation is a single SQL statement, so it applies fully or not at all.
//! - Read paths reject corrupted rows instead of masking them.

use crate::db::schema::{TODOS_COLUMNS, TODOS_TABLE};
use crate::db::DbError;
use crate::model::todo::{
    format_timestamp, parse_timestamp, NewTodo, Todo, TodoId, TodoValidationError,
};
use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TODO_SELECT_SQL: &str = "SELECT
    id,
    title,
    completed,
    due_date,
    created_at
FROM todos";

const TODO_ORDER_SQL: &str =
    "ORDER BY due_date IS NULL, due_date ASC, created_at DESC, id DESC";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for todo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TodoValidationError),
    Db(DbError),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "connection is missing required table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "table `{table}` is missing required column `{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the todo store.
pub trait TodoRepository {
    /// Returns every record in canonical list order.
    fn list(&self) -> RepoResult<Vec<Todo>>;
    /// Gets one record by id.
    fn get(&self, id: TodoId) -> RepoResult<Option<Todo>>;
    /// Inserts a record and returns the row as persisted.
    fn create(&self, input: &NewTodo) -> RepoResult<Todo>;
    /// Marks a record completed. Returns `false` when no row has `id`.
    fn complete(&self, id: TodoId) -> RepoResult<bool>;
    /// Removes a record permanently. Returns `false` when no row has `id`.
    fn delete(&self, id: TodoId) -> RepoResult<bool>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Constructs a repository from a bootstrapped connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the connection
    ///   was not prepared by `open_db`/`ensure_schema`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn list(&self) -> RepoResult<Vec<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} {TODO_ORDER_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut todos = Vec::new();

        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }

    fn get(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn create(&self, input: &NewTodo) -> RepoResult<Todo> {
        let due_date = input.due_date().map(|value| value.trunc_subsecs(3));
        let created_at = Utc::now().trunc_subsecs(3);

        self.conn.execute(
            "INSERT INTO todos (title, completed, due_date, created_at)
             VALUES (?1, 0, ?2, ?3);",
            params![
                input.title(),
                due_date.map(format_timestamp),
                format_timestamp(created_at),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("inserted todo id={id} could not be read back"))
        })
    }

    fn complete(&self, id: TodoId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("UPDATE todos SET completed = 1 WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn delete(&self, id: TodoId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let id: TodoId = row.get("id")?;

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in todos.completed (id={id})"
            )));
        }
    };

    let due_date = match row.get::<_, Option<String>>("due_date")? {
        Some(text) => Some(parse_timestamp_column(&text, "due_date", id)?),
        None => None,
    };
    let created_text: String = row.get("created_at")?;
    let created_at = parse_timestamp_column(&created_text, "created_at", id)?;

    let todo = Todo {
        id,
        title: row.get("title")?,
        completed,
        due_date,
        created_at,
    };
    todo.validate()
        .map_err(|err| RepoError::InvalidData(format!("{err} in todos row (id={id})")))?;
    Ok(todo)
}

fn parse_timestamp_column(text: &str, column: &str, id: TodoId) -> RepoResult<DateTime<Utc>> {
    parse_timestamp(text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid timestamp `{text}` in todos.{column} (id={id})"
        ))
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, TODOS_TABLE)? {
        return Err(RepoError::MissingRequiredTable(TODOS_TABLE));
    }

    for &column in TODOS_COLUMNS {
        if !table_has_column(conn, TODOS_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: TODOS_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM pragma_table_info(?1) WHERE name = ?2;",
            [table, column],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}
