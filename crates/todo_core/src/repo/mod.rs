//! Repository layer contracts and SQLite persistence.
//!
//! # Responsibility
//! - Define the data access contract for the todo store.
//! - Isolate SQLite query details from the service layer.
//!
//! # Invariants
//! - Write paths validate input before issuing SQL.
//! - Missing ids on `complete`/`delete` are reported as "no row affected",
//!   never as an error.

pub mod todo_repo;
