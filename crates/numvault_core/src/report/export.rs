//! Flat-text export of the record set.
//!
//! # Responsibility
//! - Write a human-readable listing to a fixed-name artifact.
//!
//! # Invariants
//! - Each call overwrites any prior export at the same path.

use crate::model::record::Record;
use chrono::{SecondsFormat, Utc};
use log::info;
use std::fmt::Write as _;
use std::path::Path;

/// Renders the export document: header block, blank line, one line per
/// record.
pub fn render_export(records: &[Record]) -> String {
    let mut out = String::new();
    let exported_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    // Infallible: writing into a String cannot fail.
    let _ = writeln!(out, "Exported At: {exported_at}");
    let _ = writeln!(out, "Total Records: {}", records.len());
    let _ = writeln!(out);

    for record in records {
        let _ = writeln!(
            out,
            "ID: {} | Name: {} | Value: {} | Created: {}",
            record.id,
            record.name,
            record.value,
            record
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true)
        );
    }

    out
}

/// Writes the export artifact, overwriting any previous one.
pub fn write_export(path: impl AsRef<Path>, records: &[Record]) -> std::io::Result<()> {
    let path = path.as_ref();
    std::fs::write(path, render_export(records))?;
    info!(
        "event=export_written module=report status=ok records={} path={}",
        records.len(),
        path.display()
    );
    Ok(())
}
