//! Persisted schema validation.
//!
//! Checks the invariants every persisted schema must satisfy: non-empty
//! paths, underscore-only placeholders, value tokens on `set` entries only,
//! unique dedup keys, and stable sort order.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::*;
//!
//! let good = vec![
//!     SchemaEntry::set(["system", "host-name"], "<name>", "Host name"),
//!     SchemaEntry::show(["system"], "Show system"),
//! ];
//! assert!(validate_schema(&good).is_empty());
//!
//! let bad = vec![SchemaEntry::set(["policy", "<list-name>"], "<value>", "x")];
//! assert_eq!(
//!     validate_schema(&bad),
//!     vec![ValidationError::HyphenatedPlaceholder { index: 0, token: "<list-name>".into() }]
//! );
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{EntryKind, SchemaEntry, is_placeholder};

/// Schema validation errors.
///
/// `index` is the zero-based position of the offending entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Entry has no path tokens.
    #[error("entry {index}: tokens cannot be empty")]
    EmptyTokens { index: usize },
    /// A path token is empty or whitespace-only.
    #[error("entry {index}: token {position} is empty")]
    EmptyToken { index: usize, position: usize },
    /// A placeholder contains a hyphen.
    #[error("entry {index}: placeholder {token} must use underscores")]
    HyphenatedPlaceholder { index: usize, token: String },
    /// A `set` entry without a usable value token.
    #[error("entry {index}: set entry requires a non-empty value_token")]
    MissingValueToken { index: usize },
    /// A `show` entry carrying a value token.
    #[error("entry {index}: show entry cannot carry a value_token")]
    UnexpectedValueToken { index: usize },
    /// Two entries share (`kind`, `tokens`, `value_token`).
    #[error("entry {index}: duplicate of an earlier entry: {key}")]
    DuplicateEntry { index: usize, key: String },
    /// Entry sorts before its predecessor.
    #[error("entry {index}: out of order after '{previous}'")]
    OutOfOrder { index: usize, previous: String },
}

/// Validates a persisted schema, returning every violation found.
pub fn validate_schema(entries: &[SchemaEntry]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        if entry.tokens.is_empty() {
            errors.push(ValidationError::EmptyTokens { index });
        }

        for (position, token) in entry.tokens.iter().enumerate() {
            if token.trim().is_empty() {
                errors.push(ValidationError::EmptyToken { index, position });
            } else if is_placeholder(token) && token.contains('-') {
                errors.push(ValidationError::HyphenatedPlaceholder {
                    index,
                    token: token.clone(),
                });
            }
        }

        match entry.kind {
            EntryKind::Set => {
                if entry.value_token_str().trim().is_empty() {
                    errors.push(ValidationError::MissingValueToken { index });
                }
            }
            EntryKind::Show => {
                if entry.value_token.is_some() {
                    errors.push(ValidationError::UnexpectedValueToken { index });
                }
            }
        }

        if !seen.insert(entry.key()) {
            errors.push(ValidationError::DuplicateEntry {
                index,
                key: describe(entry),
            });
        }

        if index > 0 {
            let previous = &entries[index - 1];
            if previous.sort_key() > entry.sort_key() {
                errors.push(ValidationError::OutOfOrder {
                    index,
                    previous: describe(previous),
                });
            }
        }
    }

    errors
}

fn describe(entry: &SchemaEntry) -> String {
    format!("{} {}", entry.kind, entry.pattern())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_entries_are_reported() {
        let entries = vec![
            SchemaEntry::set(["system", "host-name"], "<name>", "a"),
            SchemaEntry::set(["system", "host-name"], "<name>", "b"),
        ];
        assert_eq!(
            validate_schema(&entries),
            vec![ValidationError::DuplicateEntry {
                index: 1,
                key: "set system host-name <name>".to_string()
            }]
        );
    }

    #[test]
    fn test_out_of_order_entries_are_reported() {
        let entries = vec![
            SchemaEntry::show(["system"], "s"),
            SchemaEntry::set(["system", "host-name"], "<name>", "h"),
        ];
        let errors = validate_schema(&entries);
        assert!(matches!(errors.as_slice(), [ValidationError::OutOfOrder { index: 1, .. }]));
    }

    #[test]
    fn test_set_without_value_and_show_with_value() {
        let mut set = SchemaEntry::set(["nat"], "", "n");
        set.value_token = None;
        let mut show = SchemaEntry::show(["nat"], "n");
        show.value_token = Some("<value>".to_string());

        let errors = validate_schema(&[set, show]);
        assert!(errors.contains(&ValidationError::MissingValueToken { index: 0 }));
        assert!(errors.contains(&ValidationError::UnexpectedValueToken { index: 1 }));
    }

    #[test]
    fn test_empty_tokens_are_reported() {
        let entries = vec![
            SchemaEntry::set(Vec::<String>::new(), "<value>", "root"),
            SchemaEntry::set(["system", " "], "<value>", "blank"),
        ];
        let errors = validate_schema(&entries);
        assert!(errors.contains(&ValidationError::EmptyTokens { index: 0 }));
        assert!(errors.contains(&ValidationError::EmptyToken {
            index: 1,
            position: 1
        }));
    }
}
