//! Core domain logic for NumVault.
//! This crate is the single source of truth for vault invariants.

pub mod backup;
pub mod db;
pub mod events;
pub mod logging;
pub mod model;
pub mod repo;
pub mod report;
pub mod search;
pub mod service;

pub use backup::{BackupError, BackupObserver, BackupResult, BackupWriter};
pub use events::{MutationEvent, MutationKind, MutationObserver, SideEffectError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{Record, RecordDraft, RecordId, RecordValidationError};
pub use repo::record_repo::{
    RecordRepository, RepoError, RepoResult, SortField, SortOrder, SqliteRecordRepository,
};
pub use report::export::{render_export, write_export};
pub use report::stats::{collect_stats, VaultStats};
pub use search::term::SearchTerm;
pub use service::vault_service::{Mutated, VaultService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
