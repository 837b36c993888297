//! Domain model for vault records.
//!
//! # Responsibility
//! - Define the canonical record shape shared by storage, backup and reports.
//! - Own the input validation contract for all write paths.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId`.
//! - `created_at <= updated_at` holds for every persisted record.

pub mod record;
