//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate document repository calls into notice use-cases.
//! - Keep presentation layers decoupled from storage details.

pub mod notice_service;
