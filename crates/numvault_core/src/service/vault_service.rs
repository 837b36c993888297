//! Vault use-case service.
//!
//! # Responsibility
//! - Provide stable add/update/delete/read entry points for callers.
//! - Notify mutation observers after every successful write.
//!
//! # Invariants
//! - Exactly one event is dispatched per successful mutation; validation
//!   failures and not-found outcomes dispatch none.
//! - Observer failures are collected into the result, never raised as
//!   mutation errors.

use crate::events::{MutationEvent, MutationKind, MutationObserver, SideEffectError};
use crate::model::record::{Record, RecordDraft, RecordId};
use crate::repo::record_repo::{RecordRepository, RepoResult, SortField, SortOrder};
use log::warn;

/// Result of a successful mutation.
#[derive(Debug)]
pub struct Mutated {
    /// The record as persisted by the mutation.
    pub record: Record,
    /// Observer failures, empty when every side effect succeeded.
    pub side_effects: Vec<SideEffectError>,
}

/// Use-case service wrapper around a record repository and its
/// mutation observers.
pub struct VaultService<'obs, R: RecordRepository> {
    repo: R,
    observers: Vec<Box<dyn MutationObserver + 'obs>>,
}

impl<'obs, R: RecordRepository> VaultService<'obs, R> {
    /// Creates a service with no observers attached.
    pub fn new(repo: R) -> Self {
        Self::with_observers(repo, Vec::new())
    }

    /// Creates a service with the given observers, notified in order on
    /// every successful mutation.
    pub fn with_observers(repo: R, observers: Vec<Box<dyn MutationObserver + 'obs>>) -> Self {
        Self { repo, observers }
    }

    /// Validates and persists a new record, then notifies observers.
    pub fn add(&self, name: impl Into<String>, value: f64) -> RepoResult<Mutated> {
        let draft = RecordDraft::new(name, value);
        let record = self.repo.create(&draft)?;
        let side_effects = self.notify(MutationKind::Added, &record);
        Ok(Mutated {
            record,
            side_effects,
        })
    }

    /// Replaces name/value of an existing record.
    ///
    /// Validation failures abort before storage is touched. A missing id
    /// is a normal outcome (`Ok(None)`) and dispatches no event.
    pub fn update(
        &self,
        id: RecordId,
        name: impl Into<String>,
        value: f64,
    ) -> RepoResult<Option<Mutated>> {
        let draft = RecordDraft::new(name, value);
        let Some(record) = self.repo.update(id, &draft)? else {
            return Ok(None);
        };
        let side_effects = self.notify(MutationKind::Updated, &record);
        Ok(Some(Mutated {
            record,
            side_effects,
        }))
    }

    /// Removes a record, returning it. `Ok(None)` for a missing id.
    pub fn delete(&self, id: RecordId) -> RepoResult<Option<Mutated>> {
        let Some(record) = self.repo.delete(id)? else {
            return Ok(None);
        };
        let side_effects = self.notify(MutationKind::Deleted, &record);
        Ok(Some(Mutated {
            record,
            side_effects,
        }))
    }

    /// Lists all records. Never dispatches events.
    pub fn list(&self) -> RepoResult<Vec<Record>> {
        self.repo.list()
    }

    /// Searches by name substring or exact numeric value.
    pub fn search(&self, term: &str) -> RepoResult<Vec<Record>> {
        self.repo.search(term)
    }

    /// Returns all records in the requested order.
    pub fn sorted(&self, field: SortField, order: SortOrder) -> RepoResult<Vec<Record>> {
        self.repo.sorted(field, order)
    }

    /// Borrows the underlying repository for read-only collaborators.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    fn notify(&self, kind: MutationKind, record: &Record) -> Vec<SideEffectError> {
        let event = MutationEvent {
            kind,
            record: record.clone(),
        };

        let mut failures = Vec::new();
        for observer in &self.observers {
            if let Err(err) = observer.on_mutation(&event) {
                warn!(
                    "event=observer_failed module=service status=error kind={} observer={} error={}",
                    event.kind,
                    observer.name(),
                    err
                );
                failures.push(err);
            }
        }
        failures
    }
}
