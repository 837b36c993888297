//! Snapshot backups of the full record set.
//!
//! # Responsibility
//! - Serialize the current record set to timestamped JSON files.
//! - Bridge mutation events to snapshot writes via [`BackupObserver`].
//!
//! # Invariants
//! - One snapshot file per invocation; filenames never collide through a
//!   given writer (microsecond timestamp plus monotonic sequence).
//! - The observer re-reads the store at handling time, so a snapshot
//!   reflects store state after the triggering mutation, not the event
//!   payload.

use crate::events::{MutationEvent, MutationObserver, SideEffectError};
use crate::model::record::Record;
use crate::repo::record_repo::{RecordRepository, RepoError};
use chrono::Utc;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

pub type BackupResult<T> = Result<T, BackupError>;

/// Failure while producing a snapshot artifact.
#[derive(Debug)]
pub enum BackupError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Repo(RepoError),
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "backup write failed: {err}"),
            Self::Json(err) => write!(f, "backup serialization failed: {err}"),
            Self::Repo(err) => write!(f, "backup store read failed: {err}"),
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for BackupError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<RepoError> for BackupError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Writes full-store JSON snapshots into a dedicated backups directory.
pub struct BackupWriter {
    dir: PathBuf,
    seq: AtomicU64,
}

impl BackupWriter {
    /// Creates a writer targeting `dir`. The directory itself is created
    /// on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            seq: AtomicU64::new(0),
        }
    }

    /// Returns the backups directory this writer targets.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Serializes the given record set to a fresh snapshot file and
    /// returns its path.
    ///
    /// # Contract
    /// - Callers pass the full current record set, freshly read from the
    ///   store.
    /// - Each call produces exactly one new file.
    pub fn write_snapshot(&self, records: &[Record]) -> BackupResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;

        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.6fZ");
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let path = self.dir.join(format!("backup_{stamp}_{seq:06}.json"));

        let payload = serde_json::to_string_pretty(records)?;
        std::fs::write(&path, payload)?;

        info!(
            "event=backup_written module=backup status=ok records={} path={}",
            records.len(),
            path.display()
        );

        Ok(path)
    }
}

/// Mutation observer that snapshots the full store on every event.
///
/// Holds its own repository handle so it reads store state at handling
/// time; the shared writer keeps manual and event-driven backups on one
/// filename sequence.
pub struct BackupObserver<R: RecordRepository> {
    writer: Rc<BackupWriter>,
    repo: R,
}

impl<R: RecordRepository> BackupObserver<R> {
    pub fn new(writer: Rc<BackupWriter>, repo: R) -> Self {
        Self { writer, repo }
    }
}

impl<R: RecordRepository> MutationObserver for BackupObserver<R> {
    fn name(&self) -> &'static str {
        "backup"
    }

    fn on_mutation(&self, _event: &MutationEvent) -> Result<(), SideEffectError> {
        let snapshot = self
            .repo
            .list()
            .map_err(BackupError::from)
            .and_then(|records| self.writer.write_snapshot(&records));

        match snapshot {
            Ok(_) => Ok(()),
            Err(err) => Err(SideEffectError {
                observer: self.name(),
                source: Box::new(err),
            }),
        }
    }
}
