//! Domain model for the squirrel resource.
//!
//! # Responsibility
//! - Define the record shape shared by repository, service and HTTP layers.
//!
//! # Invariants
//! - Every persisted squirrel is identified by a positive, never reused `SquirrelId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod squirrel;
