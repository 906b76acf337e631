//! Todo use-case service.
//!
//! # Responsibility
//! - Provide the list/create/complete/delete entry points for UI callers.
//! - Validate user input before any durable mutation.
//! - Build display snapshots by re-reading the store after each change.
//!
//! # Invariants
//! - The service holds no cached records; the repository is the single
//!   source of truth.
//! - `complete`/`delete` on a missing id is a silent no-op.
//! - Log events carry ids and timings only, never titles.

use crate::model::todo::{NewTodo, Todo, TodoId};
use crate::projection::filter::{count_todos, TodoCounts, TodoFilter};
use crate::repo::todo_repo::{RepoResult, TodoRepository};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::time::Instant;

/// Visible list plus per-view totals for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoSnapshot {
    pub filter: TodoFilter,
    /// Records matching `filter`, in store order.
    pub items: Vec<Todo>,
    pub counts: TodoCounts,
}

/// Use-case service wrapper for todo operations.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns every record in store order.
    pub fn list(&self) -> RepoResult<Vec<Todo>> {
        let started_at = Instant::now();
        let todos = self.repo.list()?;
        debug!(
            "event=todo_list module=service status=ok count={} duration_ms={}",
            todos.len(),
            started_at.elapsed().as_millis()
        );
        Ok(todos)
    }

    /// Gets one record by id.
    pub fn get(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        self.repo.get(id)
    }

    /// Creates a record from raw user input.
    ///
    /// # Contract
    /// - `title` is trimmed; empty titles fail with a validation error and
    ///   nothing is written.
    /// - New records start with `completed = false`.
    pub fn create(
        &self,
        title: impl AsRef<str>,
        due_date: Option<DateTime<Utc>>,
    ) -> RepoResult<Todo> {
        let started_at = Instant::now();
        let input = match NewTodo::new(title, due_date) {
            Ok(input) => input,
            Err(err) => {
                warn!("event=todo_create module=service status=rejected error_code=validation error={err}");
                return Err(err.into());
            }
        };

        let todo = self.repo.create(&input)?;
        info!(
            "event=todo_create module=service status=ok id={} has_due_date={} duration_ms={}",
            todo.id,
            todo.due_date.is_some(),
            started_at.elapsed().as_millis()
        );
        Ok(todo)
    }

    /// Marks a record completed. Idempotent; missing ids are ignored.
    pub fn complete(&self, id: TodoId) -> RepoResult<()> {
        let started_at = Instant::now();
        let found = self.repo.complete(id)?;
        info!(
            "event=todo_complete module=service status=ok id={id} found={found} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Permanently removes a record. Idempotent; missing ids are ignored.
    pub fn delete(&self, id: TodoId) -> RepoResult<()> {
        let started_at = Instant::now();
        let found = self.repo.delete(id)?;
        info!(
            "event=todo_delete module=service status=ok id={id} found={found} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Re-reads the store and projects it for `filter`.
    pub fn snapshot(&self, filter: TodoFilter) -> RepoResult<TodoSnapshot> {
        let todos = self.list()?;
        Ok(TodoSnapshot {
            filter,
            items: filter.apply(&todos),
            counts: count_todos(&todos),
        })
    }
}
