//! Matching concrete `set` commands against a schema.
//!
//! [`SchemaIndex`] answers whether a user-supplied path (dotted, e.g.
//! `interfaces.ethernet.eth0.address`) or token list is covered by some
//! `set` entry, and whether the supplied value fits the entry's value token.
//! Hyphens are normalized to underscores on both sides before comparison.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::SchemaEntry;
//! use cmdtree_core::matcher::SchemaIndex;
//!
//! let index = SchemaIndex::new(vec![
//!     SchemaEntry::set(["interfaces", "ethernet", "<ifname>", "address"], "<cidr>", "Address"),
//! ]);
//!
//! let validated = index
//!     .validate_set_tokens(&["interfaces", "ethernet", "eth0", "address"], "10.0.0.1/24")
//!     .unwrap();
//! assert_eq!(validated.path, "interfaces.ethernet.eth0.address");
//! assert!(index.match_set("interfaces.ethernet.eth1.address"));
//! assert!(index.validate_set_tokens(&["interfaces", "ethernet", "eth0", "address"], "bogus").is_err());
//! ```

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::{EntryKind, SchemaEntry, SchemaStats, alternatives, placeholder_inner};

// SAFETY: These regexes are compile-time constants and are validated by tests.
static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("static regex must compile"));
static CIDR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F:.]+/[0-9]{1,3}$").expect("static regex must compile"));
static IP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F:.]+$").expect("static regex must compile"));

/// Failure to match a concrete command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// No `set` entry covers the path with an acceptable value.
    #[error("unknown or invalid command path/value: {path} {value}")]
    NoMatch { path: String, value: String },
}

/// A concrete `set` command accepted by the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPath {
    /// Normalized tokens joined by `.`.
    pub path: String,
    /// Whether the matched entry accepts repeated values.
    pub multi: bool,
}

/// Lookup structure over a schema's entries.
#[derive(Debug, Clone)]
pub struct SchemaIndex {
    entries: Vec<SchemaEntry>,
    set_patterns: Vec<(Vec<String>, usize)>,
}

impl SchemaIndex {
    /// Builds an index, pre-normalizing the tokens of every `set` entry.
    pub fn new(entries: Vec<SchemaEntry>) -> Self {
        let set_patterns = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.kind == EntryKind::Set)
            .map(|(idx, entry)| (normalize_tokens(&entry.tokens), idx))
            .collect();
        Self {
            entries,
            set_patterns,
        }
    }

    /// Returns the indexed entries.
    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    /// Returns `set`/`show` counts.
    pub fn stats(&self) -> SchemaStats {
        SchemaStats::from_entries(&self.entries)
    }

    fn set_matches<'a>(&'a self, tokens: &'a [String]) -> impl Iterator<Item = &'a SchemaEntry> + 'a {
        self.set_patterns
            .iter()
            .filter(move |(pattern, _)| match_pattern_tokens(pattern, tokens))
            .map(move |(_, idx)| &self.entries[*idx])
    }

    /// Returns `true` if some `set` entry covers the dotted path.
    pub fn match_set(&self, path: &str) -> bool {
        match split_dotted(path) {
            Some(tokens) => self.set_matches(&tokens).next().is_some(),
            None => false,
        }
    }

    /// Returns `true` if a matching `set` entry accepts repeated values.
    pub fn is_multi_path(&self, path: &str) -> bool {
        match split_dotted(path) {
            Some(tokens) => self.set_matches(&tokens).any(|entry| entry.multi),
            None => false,
        }
    }

    /// Validates a concrete `set` command.
    ///
    /// The first entry whose tokens match and whose value token accepts
    /// `value` wins.
    pub fn validate_set_tokens<S: AsRef<str>>(
        &self,
        tokens: &[S],
        value: &str,
    ) -> Result<ValidatedPath, MatchError> {
        let normalized = normalize_tokens(tokens);
        self.set_matches(&normalized)
            .find(|entry| validate_value_token(entry.value_token_str(), value))
            .map(|entry| ValidatedPath {
                path: normalized.join("."),
                multi: entry.multi,
            })
            .ok_or_else(|| MatchError::NoMatch {
                path: normalized.join("."),
                value: value.to_string(),
            })
    }
}

fn split_dotted(path: &str) -> Option<Vec<String>> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    Some(normalize_tokens(&path.split('.').collect::<Vec<_>>()))
}

fn normalize_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    tokens
        .iter()
        .map(|token| token.as_ref().trim().replace('-', "_"))
        .collect()
}

fn match_pattern_tokens(pattern: &[String], value: &[String]) -> bool {
    if pattern.len() != value.len() {
        return false;
    }
    pattern.iter().zip(value).all(|(pt, vt)| {
        if let Some(alts) = alternatives(pt) {
            return alts.contains(&vt.as_str());
        }
        if placeholder_inner(pt).is_some() {
            return !vt.is_empty();
        }
        pt == vt
    })
}

/// Returns `true` if `value` is acceptable for `token`.
///
/// # Examples
///
/// ```
/// use cmdtree_core::matcher::validate_value_token;
///
/// assert!(validate_value_token("<port>", "443"));
/// assert!(!validate_value_token("<port>", "https"));
/// assert!(validate_value_token("<allow|deny>", "deny"));
/// assert!(!validate_value_token("<allow|deny>", "reject"));
/// assert!(validate_value_token("enable", "enable"));
/// assert!(!validate_value_token("<value>", "   "));
/// ```
pub fn validate_value_token(token: &str, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }
    if token.is_empty() {
        return true;
    }
    if let Some(alts) = alternatives(token) {
        return alts.contains(&value);
    }
    match placeholder_inner(token) {
        Some("id" | "port") => NUMERIC_RE.is_match(value),
        Some("cidr") => CIDR_RE.is_match(value),
        Some("ip" | "ipv4" | "ipv6") => IP_RE.is_match(value),
        Some(_) => true,
        None => value == token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{sample_token, sample_value};

    fn index() -> SchemaIndex {
        SchemaIndex::new(vec![
            SchemaEntry::set(["interfaces", "ethernet", "<ifname>", "address"], "<cidr>", "Address")
                .with_multi(true),
            SchemaEntry::set(["interfaces", "ethernet", "<ifname>", "address"], "dhcp", "DHCP")
                .with_multi(true),
            SchemaEntry::set(["firewall", "name", "<name>", "rule", "<id>", "action"], "<accept|drop>", "Action"),
            SchemaEntry::set(["system", "host-name"], "<name>", "Host name"),
            SchemaEntry::set(["service", "ssh", "port"], "<port>", "Port"),
            SchemaEntry::show(["interfaces"], "Show interfaces"),
        ])
    }

    #[test]
    fn test_every_set_entry_validates_with_its_samples() {
        let index = index();
        for entry in index.entries().iter().filter(|e| e.kind == EntryKind::Set) {
            let tokens: Vec<String> = entry.tokens.iter().map(|t| sample_token(t)).collect();
            let value = sample_value(entry.value_token_str());
            let validated = index
                .validate_set_tokens(&tokens, &value)
                .unwrap_or_else(|err| panic!("{:?} {value}: {err}", entry.tokens));
            assert!(index.match_set(&validated.path), "path: {}", validated.path);
        }
    }

    #[test]
    fn test_unknown_set_rejected() {
        let err = index().validate_set_tokens(&["foo", "bar"], "baz").unwrap_err();
        assert_eq!(
            err,
            MatchError::NoMatch {
                path: "foo.bar".to_string(),
                value: "baz".to_string()
            }
        );
    }

    #[test]
    fn test_hyphens_normalize_on_both_sides() {
        let index = index();
        let validated = index.validate_set_tokens(&["system", "host_name"], "edge").unwrap();
        assert_eq!(validated.path, "system.host_name");
        assert!(index.match_set("system.host-name"));
    }

    #[test]
    fn test_literal_value_alternative_matches_second_entry() {
        let validated = index()
            .validate_set_tokens(&["interfaces", "ethernet", "eth0", "address"], "dhcp")
            .unwrap();
        assert!(validated.multi);
    }

    #[test]
    fn test_multi_path_and_empty_path() {
        let index = index();
        assert!(index.is_multi_path("interfaces.ethernet.eth0.address"));
        assert!(!index.is_multi_path("system.host-name"));
        assert!(!index.match_set("   "));
    }

    #[test]
    fn test_show_entries_are_not_set_matches() {
        assert!(!index().match_set("interfaces"));
    }

    #[test]
    fn test_static_regexes_compile() {
        assert!(CIDR_RE.is_match("2001:db8::/32"));
        assert!(IP_RE.is_match("10.0.0.1"));
        assert!(!NUMERIC_RE.is_match("12a"));
    }

    #[test]
    fn test_stats_counts_both_kinds() {
        let stats = index().stats();
        assert_eq!((stats.set, stats.show, stats.total), (5, 1, 6));
    }
}
