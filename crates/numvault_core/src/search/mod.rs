//! Record search entry points.
//!
//! # Responsibility
//! - Expose the term-matching predicate used by repository search.
//! - Keep matching semantics auditable and independent of SQL.

pub mod term;
