//! Todo record model.
//!
//! # Responsibility
//! - Define the `Todo` record shared by the store and the projection.
//! - Validate creation input before it reaches persistence.
//! - Encode/decode timestamps in the persisted ISO-8601 text form.
//!
//! # Invariants
//! - `title` is trimmed and never empty.
//! - `completed` only ever moves from `false` to `true`.
//! - `created_at` is always present; `due_date` is optional.

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier. Backed by a SQLite `AUTOINCREMENT` rowid, so a
/// value is never handed out twice, even after deletes.
pub type TodoId = i64;

/// Years whose timestamps encode as four-digit, fixed-width RFC 3339 text.
const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// One to-do entry as persisted in the `todos` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TodoFields")]
pub struct Todo {
    pub id: TodoId,
    /// Trimmed, non-empty description.
    pub title: String,
    pub completed: bool,
    /// Optional deadline chosen by the user. Primary sort key.
    pub due_date: Option<DateTime<Utc>>,
    /// Creation stamp assigned by the store. Fallback sort key.
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Returns whether this record belongs to the pending view.
    pub fn is_pending(&self) -> bool {
        !self.completed
    }

    /// Checks record-level invariants.
    ///
    /// Used on read paths so corrupted rows are reported instead of rendered.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.title.trim().is_empty() {
            return Err(TodoValidationError::EmptyTitle);
        }
        if let Some(due_date) = self.due_date {
            ensure_storable_due_date(due_date)?;
        }
        Ok(())
    }
}

/// Unchecked wire shape; deserialized records pass through `Todo::validate`.
#[derive(Deserialize)]
struct TodoFields {
    id: TodoId,
    title: String,
    completed: bool,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TodoFields> for Todo {
    type Error = TodoValidationError;

    fn try_from(fields: TodoFields) -> Result<Self, Self::Error> {
        let todo = Self {
            id: fields.id,
            title: fields.title,
            completed: fields.completed,
            due_date: fields.due_date,
            created_at: fields.created_at,
        };
        todo.validate()?;
        Ok(todo)
    }
}

/// Validated input for creating a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    title: String,
    due_date: Option<DateTime<Utc>>,
}

impl NewTodo {
    /// Builds creation input, trimming `title`.
    ///
    /// # Errors
    /// - `TodoValidationError::EmptyTitle` when `title` is empty after trimming.
    /// - `TodoValidationError::InvalidDueDate` when `due_date` falls outside
    ///   years 0001..=9999.
    pub fn new(
        title: impl AsRef<str>,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Self, TodoValidationError> {
        let title = normalize_title(title.as_ref())?;
        if let Some(value) = due_date {
            ensure_storable_due_date(value)?;
        }
        Ok(Self { title, due_date })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }
}

/// Validation failures for user-provided todo input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Due date text is not a date or RFC 3339 date-time.
    InvalidDueDate(String),
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::InvalidDueDate(value) => write!(
                f,
                "invalid due date `{value}`; expected YYYY-MM-DD or an RFC 3339 date-time in years 0001-9999"
            ),
        }
    }
}

impl Error for TodoValidationError {}

/// Trims surrounding whitespace and rejects empty titles.
pub fn normalize_title(raw: &str) -> Result<String, TodoValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TodoValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// Parses user-facing due date input.
///
/// Accepts RFC 3339 date-times with any offset (normalized to UTC) and bare
/// `YYYY-MM-DD` dates, which map to midnight UTC. The UTC result must fall in
/// years 0001..=9999.
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, TodoValidationError> {
    let trimmed = raw.trim();
    let invalid = || TodoValidationError::InvalidDueDate(trimmed.to_string());

    let value = match DateTime::parse_from_rfc3339(trimmed) {
        Ok(value) => value.with_timezone(&Utc),
        Err(_) => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .ok_or_else(invalid)?,
    };

    if !STORABLE_YEARS.contains(&value.year()) {
        return Err(invalid());
    }
    Ok(value)
}

fn ensure_storable_due_date(value: DateTime<Utc>) -> Result<(), TodoValidationError> {
    if STORABLE_YEARS.contains(&value.year()) {
        Ok(())
    } else {
        Err(TodoValidationError::InvalidDueDate(value.to_rfc3339()))
    }
}

/// Formats a timestamp in the persisted text form.
///
/// Output is always `YYYY-MM-DDTHH:MM:SS.mmmZ`. The fixed width keeps SQL text
/// ordering identical to chronological ordering.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses persisted timestamp text. Returns `None` for malformed values.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|value| value.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, normalize_title, parse_due_date, parse_timestamp};
    use super::{NewTodo, TodoValidationError};
    use chrono::{TimeZone, Utc};

    #[test]
    fn normalize_title_trims_and_rejects_blank() {
        assert_eq!(normalize_title("  buy milk \n").unwrap(), "buy milk");
        assert_eq!(normalize_title(""), Err(TodoValidationError::EmptyTitle));
        assert_eq!(normalize_title(" \t "), Err(TodoValidationError::EmptyTitle));
    }

    #[test]
    fn new_todo_keeps_trimmed_title_and_due_date() {
        let due = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let input = NewTodo::new("  report ", Some(due)).unwrap();
        assert_eq!(input.title(), "report");
        assert_eq!(input.due_date(), Some(due));
    }

    #[test]
    fn parse_due_date_accepts_date_only_and_offsets() {
        assert_eq!(
            parse_due_date("2024-01-05").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_due_date("2024-01-05T12:00:00-03:00").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 5, 15, 0, 0).unwrap()
        );
        assert!(matches!(
            parse_due_date("next tuesday"),
            Err(TodoValidationError::InvalidDueDate(_))
        ));
    }

    #[test]
    fn parse_due_date_rejects_years_outside_four_digits() {
        for raw in ["+12345-01-01", "-0001-01-01", "0000-01-01", "0001-01-01T00:00:00+01:00"] {
            assert!(
                matches!(parse_due_date(raw), Err(TodoValidationError::InvalidDueDate(_))),
                "{raw} should be rejected"
            );
        }
        assert!(parse_due_date("0001-01-01").is_ok());
        assert!(parse_due_date("9999-12-31T23:59:59Z").is_ok());
    }

    #[test]
    fn new_todo_rejects_unstorable_due_date() {
        let far = Utc.with_ymd_and_hms(12_345, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            NewTodo::new("far", Some(far)),
            Err(TodoValidationError::InvalidDueDate(_))
        ));
    }

    #[test]
    fn timestamp_text_is_fixed_width_utc() {
        let value = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 0).unwrap();
        let text = format_timestamp(value);
        assert_eq!(text, "2024-03-01T09:05:00.000Z");
        assert_eq!(parse_timestamp(&text), Some(value));
        assert_eq!(parse_timestamp("not a date"), None);
    }
}
