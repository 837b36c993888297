//! Mutation event contracts.
//!
//! # Responsibility
//! - Define the three mutation event kinds and their payload.
//! - Define the observer seam the vault service notifies on every
//!   successful mutation.
//!
//! # Invariants
//! - Observers run synchronously, in registration order, before the
//!   mutating call returns.
//! - Observer failures never unwind the mutation; they are reported
//!   through [`SideEffectError`] values on the mutation result.

use crate::model::record::Record;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// The three mutation kinds the vault emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Added,
    Updated,
    Deleted,
}

impl Display for MutationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Added => "recordAdded",
            Self::Updated => "recordUpdated",
            Self::Deleted => "recordDeleted",
        };
        write!(f, "{name}")
    }
}

/// Notification payload carrying the affected record.
///
/// Observers needing the full store state must re-read it from the
/// repository at handling time; the payload reflects the single record
/// the mutation touched.
#[derive(Debug, Clone)]
pub struct MutationEvent {
    pub kind: MutationKind,
    pub record: Record,
}

/// Failure of one observer while handling a mutation event.
///
/// The mutation itself has already been durably applied when an observer
/// runs, so these errors travel alongside the successful result instead
/// of replacing it.
#[derive(Debug)]
pub struct SideEffectError {
    /// Stable observer name for logs and messages.
    pub observer: &'static str,
    pub source: Box<dyn Error + Send + Sync>,
}

impl Display for SideEffectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "observer `{}` failed: {}", self.observer, self.source)
    }
}

impl Error for SideEffectError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Observer seam for mutation side effects.
///
/// Supplied to the vault service at construction; there is no process-wide
/// registration.
pub trait MutationObserver {
    /// Stable name used when reporting failures.
    fn name(&self) -> &'static str;

    /// Handles one mutation event.
    fn on_mutation(&self, event: &MutationEvent) -> Result<(), SideEffectError>;
}
