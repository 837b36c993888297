//! Record domain model.
//!
//! # Responsibility
//! - Define the canonical named-numeric record persisted by the vault.
//! - Validate caller input before it reaches storage.
//!
//! # Invariants
//! - `id` is stable and never reused for another record.
//! - `name` is stored trimmed and is never empty.
//! - `value` is always a finite number.
//! - `created_at <= updated_at` at all times.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every vault record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type RecordId = Uuid;

/// Canonical persisted record: a named numeric value with timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stable global ID assigned on creation.
    pub id: RecordId,
    /// Display name, trimmed, never empty.
    pub name: String,
    /// Finite numeric payload.
    pub value: f64,
    /// Set once at creation, immutable afterwards.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful update; `>= created_at`.
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Validated input for add/update operations.
///
/// Drafts carry raw caller input; `validate()` must pass before any
/// storage mutation, and `normalized_name()` is the value to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    pub name: String,
    pub value: f64,
}

impl RecordDraft {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Checks the name/value contract without touching storage.
    ///
    /// # Errors
    /// - `EmptyName` when the name is empty after trimming.
    /// - `NonFiniteValue` when the value is NaN or infinite.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.name.trim().is_empty() {
            return Err(RecordValidationError::EmptyName);
        }
        if !self.value.is_finite() {
            return Err(RecordValidationError::NonFiniteValue { value: self.value });
        }
        Ok(())
    }

    /// Returns the name as it will be persisted.
    pub fn normalized_name(&self) -> &str {
        self.name.trim()
    }
}

/// Input contract violation raised before any storage mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValidationError {
    /// Name missing or whitespace-only.
    EmptyName,
    /// Value is NaN or infinite.
    NonFiniteValue { value: f64 },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name is required and must be a non-empty string"),
            Self::NonFiniteValue { value } => {
                write!(f, "value must be a finite number, got `{value}`")
            }
        }
    }
}

impl Error for RecordValidationError {}
