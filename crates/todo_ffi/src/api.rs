//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the list screen's commands to Dart via FRB.
//! - Convert core records into plain, string-friendly DTOs.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call reopens the configured database; no records are cached here.
//! - Failed commands have no durable effect and report `ok = false`.

use log::warn;
use std::sync::OnceLock;
use todo_core::db::open_db;
use todo_core::model::todo::format_timestamp;
use todo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, parse_due_date,
    ping as ping_inner, CoreConfig, SqliteTodoRepository, Todo, TodoFilter, TodoService,
};

static FFI_CONFIG: OnceLock<CoreConfig> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One row of the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    /// ISO-8601 UTC text, `None` when no deadline was chosen.
    pub due_date: Option<String>,
    /// ISO-8601 UTC text.
    pub created_at: String,
}

/// Response envelope for list reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListResponse {
    pub ok: bool,
    /// Records for the requested view, in display order.
    pub items: Vec<TodoItem>,
    pub pending_count: u32,
    pub completed_count: u32,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

/// Response envelope for mutating commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoActionResponse {
    pub ok: bool,
    /// Created record, only set by `todo_create`.
    pub item: Option<TodoItem>,
    pub message: String,
}

impl TodoActionResponse {
    fn success(message: impl Into<String>, item: Option<TodoItem>) -> Self {
        Self {
            ok: true,
            item,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item: None,
            message: message.into(),
        }
    }
}

/// Loads the pending (`show_completed = false`) or completed view.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; on failure returns `ok = false` with no items.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_list(show_completed: bool) -> TodoListResponse {
    let filter = TodoFilter::from_show_completed(show_completed);
    match with_todo_service(|service| service.snapshot(filter)) {
        Ok(snapshot) => {
            let message = if snapshot.items.is_empty() {
                "No todos found.".to_string()
            } else {
                format!("Found {} todo(s).", snapshot.items.len())
            };
            TodoListResponse {
                ok: true,
                items: snapshot.items.iter().map(to_todo_item).collect(),
                pending_count: saturating_u32(snapshot.counts.pending),
                completed_count: saturating_u32(snapshot.counts.completed),
                message,
            }
        }
        Err(err) => TodoListResponse {
            ok: false,
            items: Vec::new(),
            pending_count: 0,
            completed_count: 0,
            message: format!("todo_list failed: {err}"),
        },
    }
}

/// Creates a todo from the composer + date picker flow.
///
/// Input semantics:
/// - `title`: trimmed; blank titles are rejected.
/// - `due_date`: `YYYY-MM-DD` or RFC 3339 text; `None` or blank for no deadline.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_create(title: String, due_date: Option<String>) -> TodoActionResponse {
    let due_date = match due_date.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(raw) => match parse_due_date(raw) {
            Ok(value) => Some(value),
            Err(err) => return TodoActionResponse::failure(format!("todo_create failed: {err}")),
        },
    };

    match with_todo_service(|service| service.create(&title, due_date)) {
        Ok(todo) => TodoActionResponse::success("Todo created.", Some(to_todo_item(&todo))),
        Err(err) => TodoActionResponse::failure(format!("todo_create failed: {err}")),
    }
}

/// Marks a todo completed. Unknown ids succeed without effect.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_complete(id: i64) -> TodoActionResponse {
    run_command("todo_complete", "Todo completed.", |service| {
        service.complete(id)
    })
}

/// Deletes a todo permanently. Unknown ids succeed without effect.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_delete(id: i64) -> TodoActionResponse {
    run_command("todo_delete", "Todo deleted.", |service| service.delete(id))
}

fn run_command(
    name: &str,
    success_message: &str,
    f: impl FnOnce(&TodoService<SqliteTodoRepository<'_>>) -> todo_core::RepoResult<()>,
) -> TodoActionResponse {
    match with_todo_service(f) {
        Ok(()) => TodoActionResponse::success(success_message, None),
        Err(err) => TodoActionResponse::failure(format!("{name} failed: {err}")),
    }
}

fn resolve_config() -> &'static CoreConfig {
    FFI_CONFIG.get_or_init(CoreConfig::from_env)
}

fn with_todo_service<T>(
    f: impl FnOnce(&TodoService<SqliteTodoRepository<'_>>) -> todo_core::RepoResult<T>,
) -> Result<T, String> {
    let config = resolve_config();
    let conn = open_db(&config.db_path).map_err(|err| {
        warn!("event=ffi_db_open module=ffi status=error error={err}");
        format!("todo DB open failed: {err}")
    })?;
    let repo = SqliteTodoRepository::try_new(&conn)
        .map_err(|err| format!("todo repo init failed: {err}"))?;
    let service = TodoService::new(repo);
    f(&service).map_err(|err| err.to_string())
}

fn to_todo_item(todo: &Todo) -> TodoItem {
    TodoItem {
        id: todo.id,
        title: todo.title.clone(),
        completed: todo.completed,
        due_date: todo.due_date.map(format_timestamp),
        created_at: format_timestamp(todo.created_at),
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, ping, todo_complete, todo_create, todo_delete, todo_list,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn todo_create_trims_title_and_appears_in_pending_view() {
        let title = unique_token("ffi-create");
        let created = todo_create(format!("  {title}  "), Some("2030-06-01".to_string()));
        assert!(created.ok, "{}", created.message);
        let item = created.item.expect("create should return the item");
        assert_eq!(item.title, title);
        assert_eq!(item.due_date.as_deref(), Some("2030-06-01T00:00:00.000Z"));
        assert!(!item.completed);

        let pending = todo_list(false);
        assert!(pending.ok, "{}", pending.message);
        assert!(pending.items.iter().any(|row| row.id == item.id));
    }

    #[test]
    fn todo_create_rejects_blank_title_and_bad_date() {
        let blank = todo_create("   ".to_string(), None);
        assert!(!blank.ok);
        assert!(blank.message.contains("title"));

        let bad_date = todo_create(unique_token("ffi-bad-date"), Some("tomorrow".to_string()));
        assert!(!bad_date.ok);
        assert!(bad_date.message.contains("due date"));
    }

    #[test]
    fn todo_create_rejects_far_future_date_and_list_keeps_working() {
        let response = todo_create(unique_token("ffi-far"), Some("+12345-01-01".to_string()));
        assert!(!response.ok);
        assert!(response.message.contains("due date"));

        let pending = todo_list(false);
        assert!(pending.ok, "{}", pending.message);
    }

    #[test]
    fn todo_complete_moves_item_to_completed_view() {
        let created = todo_create(unique_token("ffi-complete"), None);
        let id = created.item.expect("created item").id;

        let response = todo_complete(id);
        assert!(response.ok, "{}", response.message);

        assert!(todo_list(true).items.iter().any(|row| row.id == id));
        assert!(!todo_list(false).items.iter().any(|row| row.id == id));
    }

    #[test]
    fn todo_delete_is_idempotent() {
        let created = todo_create(unique_token("ffi-delete"), None);
        let id = created.item.expect("created item").id;

        assert!(todo_delete(id).ok);
        assert!(todo_delete(id).ok);
        assert!(todo_complete(id).ok);
        assert!(!todo_list(false).items.iter().any(|row| row.id == id));
        assert!(!todo_list(true).items.iter().any(|row| row.id == id));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
