//! Read-side projections over a loaded todo snapshot.
//!
//! # Responsibility
//! - Derive the visible subset for the pending/completed toggle.
//!
//! # Invariants
//! - Projections are pure: no I/O, no mutation of the input snapshot.
//! - Input order is preserved.

pub mod filter;
