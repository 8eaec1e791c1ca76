//! Domain model for the notice board.
//!
//! # Invariants
//! - Every notice is identified by a store-assigned `NoticeId`.
//! - Notices are independent; there are no relationships between them.

pub mod notice;
