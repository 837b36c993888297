//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and mutation-observer dispatch.
//! - Keep the CLI layer decoupled from storage and side-effect details.

pub mod vault_service;
