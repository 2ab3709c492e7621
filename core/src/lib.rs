//! Core schema types and shared primitives for set/show command trees.
//!
//! This crate defines the data contract shared by schema extraction and
//! conformance testing:
//!
//! - [`SchemaEntry`]: one command path (`kind`, `tokens`, optional
//!   `value_token`, `description`, `multi`).
//! - [`EntryKind`]: `set` or `show`.
//! - Placeholder helpers ([`is_placeholder`], [`normalize_placeholder`],
//!   [`alternatives`]) for `<category>` and `<a|b|c>` tokens.
//!
//! Merging ([`merge_entries`]) normalizes, deduplicates, and sorts a curated
//! schema together with freshly generated entries. Validation
//! ([`validate_schema`]) checks the persisted schema invariants. The
//! [`catalog`] and [`matcher`] modules build a command catalog and match
//! concrete `set` commands against the schema.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::*;
//!
//! let curated = vec![SchemaEntry::set(
//!     ["interfaces", "ethernet", "<ifname>", "address"],
//!     "<cidr>",
//!     "Interface address",
//! )];
//! let generated = vec![
//!     SchemaEntry::set(["interfaces", "ethernet", "<ifname>", "address"], "<cidr>", "Set address"),
//!     SchemaEntry::set(["system", "host-name"], "<name>", "System host name"),
//! ];
//!
//! let merged = merge_entries(curated, generated);
//! assert_eq!(merged.entries.len(), 2);
//! assert_eq!(merged.entries[0].description, "Interface address");
//! assert_eq!(merged.stats.set, 2);
//! assert!(validate_schema(&merged.entries).is_empty());
//! ```

mod artifact;
pub mod catalog;
mod error;
pub mod matcher;
mod merge;
pub mod sample;
mod token;
mod types;
mod validate;

pub use artifact::{load_schema, parse_schema, schema_to_json, write_schema};
pub use error::{Result, SchemaError};
pub use merge::{MergeOutcome, SchemaStats, dedupe_sort, merge_entries, normalize_entry};
pub use token::{alternatives, is_placeholder, normalize_placeholder, placeholder_inner};
pub use types::*;
pub use validate::{ValidationError, validate_schema};
