//! Read-only reporters over the full record set.
//!
//! # Responsibility
//! - Produce the flat-text export artifact.
//! - Compute summary statistics.
//!
//! # Invariants
//! - Reporters never mutate the store and never dispatch events.

pub mod export;
pub mod stats;
