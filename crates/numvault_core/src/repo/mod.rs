//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record-store contract used by the vault service.
//! - Isolate SQLite query details from orchestration and side effects.
//!
//! # Invariants
//! - Repository writes must enforce `RecordDraft::validate()` before SQL
//!   mutations.
//! - Missing ids are a normal outcome (`Option::None`), not an error.

pub mod record_repo;
