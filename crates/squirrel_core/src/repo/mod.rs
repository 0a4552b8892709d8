//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define record-level data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod squirrel_repo;
