//! Search term parsing and record matching.
//!
//! # Responsibility
//! - Normalize raw user queries into a typed search term.
//! - Match records with an explicit two-branch predicate.
//!
//! # Invariants
//! - Blank input parses to no term; callers return an empty result set.
//! - A record matching both branches is still reported once.

use crate::model::record::Record;

/// Parsed search term with a precomputed numeric branch.
///
/// The numeric branch is active only when the trimmed input is composed
/// entirely of ASCII digits, mirroring the vault's equality-search contract.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTerm {
    lowered: String,
    numeric: Option<f64>,
}

impl SearchTerm {
    /// Parses raw user input. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let numeric = if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            trimmed.parse::<f64>().ok()
        } else {
            None
        };

        Some(Self {
            lowered: trimmed.to_lowercase(),
            numeric,
        })
    }

    /// Union predicate over both search branches.
    ///
    /// # Contract
    /// - Branch 1: case-insensitive substring containment on `name`.
    /// - Branch 2: exact numeric equality on `value`, gated by the
    ///   all-digits check performed in [`SearchTerm::parse`].
    pub fn matches(&self, record: &Record) -> bool {
        if record.name.to_lowercase().contains(&self.lowered) {
            return true;
        }
        matches!(self.numeric, Some(n) if record.value == n)
    }
}

#[cfg(test)]
mod tests {
    use super::SearchTerm;
    use crate::model::record::Record;
    use chrono::Utc;
    use uuid::Uuid;

    fn record(name: &str, value: f64) -> Record {
        let now = Utc::now();
        Record {
            id: Uuid::new_v4(),
            name: name.to_string(),
            value,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn blank_input_parses_to_none() {
        assert_eq!(SearchTerm::parse(""), None);
        assert_eq!(SearchTerm::parse("   \t "), None);
    }

    #[test]
    fn substring_match_is_case_insensitive() {
        let term = SearchTerm::parse("ELEVEN").unwrap();
        assert!(term.matches(&record("7-Eleven", 3.5)));
        assert!(!term.matches(&record("corner shop", 3.5)));
    }

    #[test]
    fn digit_term_matches_name_or_exact_value() {
        let term = SearchTerm::parse("7").unwrap();
        assert!(term.matches(&record("7-Eleven", 3.5)));
        assert!(term.matches(&record("lucky number", 7.0)));
        assert!(!term.matches(&record("lucky number", 7.5)));
    }

    #[test]
    fn non_digit_term_has_no_numeric_branch() {
        let term = SearchTerm::parse("7.0").unwrap();
        assert!(!term.matches(&record("seven", 7.0)));
    }

    #[test]
    fn term_is_trimmed_before_matching() {
        let term = SearchTerm::parse("  42 ").unwrap();
        assert!(term.matches(&record("x", 42.0)));
        assert!(term.matches(&record("level 42", 0.0)));
    }
}
