//! Summary statistics over the record set.
//!
//! # Responsibility
//! - Aggregate totals, modification times and name/date extremes.
//!
//! # Invariants
//! - An empty store yields `None`; no aggregate is ever computed over
//!   zero records.
//! - Longest-name ties resolve to the first record in iteration order.

use crate::model::record::Record;
use chrono::{DateTime, Utc};

/// Aggregates over a non-empty record set.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultStats {
    pub total: usize,
    /// Max `updated_at` across all records.
    pub last_modified: DateTime<Utc>,
    /// Name of the record with the longest name; first reaching the
    /// maximum wins on ties.
    pub longest_name: String,
    pub earliest_created: DateTime<Utc>,
    pub latest_created: DateTime<Utc>,
}

/// Computes statistics, or `None` for an empty store.
pub fn collect_stats(records: &[Record]) -> Option<VaultStats> {
    let first = records.first()?;

    let mut last_modified = first.updated_at;
    let mut longest = first;
    let mut earliest_created = first.created_at;
    let mut latest_created = first.created_at;

    for record in &records[1..] {
        if record.updated_at > last_modified {
            last_modified = record.updated_at;
        }
        // Strict comparison keeps the first record on ties.
        if record.name.len() > longest.name.len() {
            longest = record;
        }
        if record.created_at < earliest_created {
            earliest_created = record.created_at;
        }
        if record.created_at > latest_created {
            latest_created = record.created_at;
        }
    }

    Some(VaultStats {
        total: records.len(),
        last_modified,
        longest_name: longest.name.clone(),
        earliest_created,
        latest_created,
    })
}
