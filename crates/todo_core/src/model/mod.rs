//! Domain model for the to-do list.
//!
//! # Responsibility
//! - Define the single persisted record and its validated creation input.
//! - Own the canonical text encoding of timestamps.
//!
//! # Invariants
//! - Every record is identified by a store-assigned `TodoId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod todo;
