//! Core domain logic for the todo list app.
//! This crate is the single source of truth for todo records and their
//! display projections.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod projection;
pub mod repo;
pub mod service;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::todo::{parse_due_date, NewTodo, Todo, TodoId, TodoValidationError};
pub use projection::filter::{count_todos, filter_todos, TodoCounts, TodoFilter};
pub use repo::todo_repo::{RepoError, RepoResult, SqliteTodoRepository, TodoRepository};
pub use service::todo_service::{TodoService, TodoSnapshot};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
