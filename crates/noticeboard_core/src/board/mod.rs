//! Presentation-layer state for the notice table.
//!
//! # Responsibility
//! - Own filters, load status, pagination and dialog state explicitly,
//!   without process-wide singletons.
//! - Resolve overlapping fetches with a request-generation counter.

pub mod controller;
pub mod pagination;
pub mod state;
pub mod table;
