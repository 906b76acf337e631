//! Pending/completed filter over an ordered todo list.

use crate::model::todo::Todo;
use serde::{Deserialize, Serialize};

/// Which half of the list the screen is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoFilter {
    /// Records with `completed == false`. Initial view.
    #[default]
    Pending,
    /// Records with `completed == true`.
    Completed,
}

impl TodoFilter {
    pub fn from_show_completed(show_completed: bool) -> Self {
        if show_completed {
            Self::Completed
        } else {
            Self::Pending
        }
    }

    pub fn show_completed(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns the other view.
    pub fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }

    pub fn matches(self, todo: &Todo) -> bool {
        todo.completed == self.show_completed()
    }

    pub fn apply(self, records: &[Todo]) -> Vec<Todo> {
        filter_todos(records, self.show_completed())
    }
}

/// Per-view totals for a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoCounts {
    pub pending: usize,
    pub completed: usize,
}

/// Returns the records whose `completed` flag equals `show_completed`,
/// in input order.
pub fn filter_todos(records: &[Todo], show_completed: bool) -> Vec<Todo> {
    records
        .iter()
        .filter(|todo| todo.completed == show_completed)
        .cloned()
        .collect()
}

pub fn count_todos(records: &[Todo]) -> TodoCounts {
    let completed = records.iter().filter(|todo| todo.completed).count();
    TodoCounts {
        pending: records.len() - completed,
        completed,
    }
}
