//! Notice search entry points.
//!
//! # Responsibility
//! - Translate search inputs (title prefix, calendar day) into collection
//!   queries the document store can execute.

pub mod notice_query;
