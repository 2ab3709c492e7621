//! Schema normalization and merging.
//!
//! A fresh extraction pass is merged into the curated schema with
//! [`merge_entries`]. Curated entries come first, so when the same
//! (`kind`, `tokens`, `value_token`) key appears on both sides the curated
//! entry survives untouched and the generated one is dropped.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::*;
//!
//! let curated = vec![SchemaEntry::set(["nat", "source", "rule", "<id>", "translation", "address"], "<cidr>", "SNAT address")];
//! let generated = vec![SchemaEntry::set(["nat", "source", "rule", "<id>", "translation", "address"], "<cidr>", "Set address")];
//!
//! let merged = merge_entries(curated, generated);
//! assert_eq!(merged.entries.len(), 1);
//! assert_eq!(merged.entries[0].description, "SNAT address");
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_VALUE_TOKEN, EntryKind, SchemaEntry, normalize_placeholder};

/// Entry counts reported after a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaStats {
    pub set: usize,
    pub show: usize,
    pub total: usize,
}

impl SchemaStats {
    /// Counts `set` and `show` entries.
    pub fn from_entries(entries: &[SchemaEntry]) -> Self {
        let set = entries.iter().filter(|e| e.kind == EntryKind::Set).count();
        let show = entries.iter().filter(|e| e.kind == EntryKind::Show).count();
        Self {
            set,
            show,
            total: entries.len(),
        }
    }
}

/// Result of [`merge_entries`].
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Normalized, deduplicated, sorted entries.
    pub entries: Vec<SchemaEntry>,
    /// Counts over `entries`.
    pub stats: SchemaStats,
    /// Number of entries dropped as duplicates.
    pub duplicates_dropped: usize,
}

/// Normalizes one entry to the persisted form.
///
/// Placeholder tokens get hyphens rewritten to underscores, `set` entries
/// without a value token get [`DEFAULT_VALUE_TOKEN`], and `show` entries lose
/// any value token.
///
/// # Examples
///
/// ```
/// use cmdtree_core::*;
///
/// let mut raw = SchemaEntry::set(["interfaces", "pseudo-ethernet", "<if-name>", "mtu"], "<value>", "MTU");
/// raw.value_token = None;
///
/// let entry = normalize_entry(raw);
/// assert_eq!(entry.tokens, ["interfaces", "pseudo-ethernet", "<if_name>", "mtu"]);
/// assert_eq!(entry.value_token.as_deref(), Some("<value>"));
/// ```
pub fn normalize_entry(mut entry: SchemaEntry) -> SchemaEntry {
    entry.tokens = entry
        .tokens
        .iter()
        .map(|token| normalize_placeholder(token))
        .collect();

    match entry.kind {
        EntryKind::Set => {
            if entry.value_token.is_none() {
                entry.value_token = Some(DEFAULT_VALUE_TOKEN.to_string());
            }
        }
        EntryKind::Show => {
            entry.value_token = None;
        }
    }

    entry
}

/// Removes duplicate keys (first occurrence wins) and sorts by
/// (`kind`, joined tokens, `value_token`).
///
/// The sort is stable, so entries with equal sort keys keep their relative
/// order.
pub fn dedupe_sort(entries: Vec<SchemaEntry>) -> Vec<SchemaEntry> {
    let mut seen: HashSet<(EntryKind, Vec<String>, String)> = HashSet::new();
    let mut out = Vec::with_capacity(entries.len());

    for entry in entries {
        let key = (
            entry.kind,
            entry.tokens.clone(),
            entry.value_token_str().to_string(),
        );
        if seen.insert(key) {
            out.push(entry);
        }
    }

    out.sort_by_cached_key(|entry| {
        (
            entry.kind,
            entry.joined_tokens(),
            entry.value_token_str().to_string(),
        )
    });
    out
}

/// Merges the curated schema with freshly generated entries.
///
/// Both sides are normalized, concatenated curated-first, deduplicated, and
/// sorted.
pub fn merge_entries(curated: Vec<SchemaEntry>, generated: Vec<SchemaEntry>) -> MergeOutcome {
    let combined: Vec<SchemaEntry> = curated
        .into_iter()
        .chain(generated)
        .map(normalize_entry)
        .collect();
    let before = combined.len();

    let entries = dedupe_sort(combined);
    let stats = SchemaStats::from_entries(&entries);

    MergeOutcome {
        duplicates_dropped: before - entries.len(),
        entries,
        stats,
    }
}
