//! Document store abstractions and persistence implementation.
//!
//! # Responsibility
//! - Define typed document values and collection queries.
//! - Isolate SQLite/JSON details from notice-level orchestration.
//!
//! # Invariants
//! - Document ids are assigned by the repository only.
//! - Repository APIs return semantic errors (`InvalidName`, `InvalidQuery`)
//!   in addition to DB transport errors.

pub mod document;
pub mod document_repo;
pub mod query;
