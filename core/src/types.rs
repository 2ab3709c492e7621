//! Schema entry definitions.
//!
//! A persisted schema is an ordered list of [`SchemaEntry`] values
//! serialized as a JSON array. The types here round-trip through that
//! artifact and carry the dedup and sort keys used by the merger.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value token used for `set` entries whose value shape is unknown.
pub const DEFAULT_VALUE_TOKEN: &str = "<value>";

/// Description used for curated entries that do not carry one.
pub const DEFAULT_DESCRIPTION: &str = "Set value";

/// Command category of a schema entry.
///
/// Variant order matches the lexical order of the serialized names, so the
/// derived [`Ord`] sorts `set` before `show`.
///
/// # Examples
///
/// ```
/// use cmdtree_core::EntryKind;
///
/// assert_eq!(EntryKind::Set.as_str(), "set");
/// assert!(EntryKind::Set < EntryKind::Show);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Configuration command: path tokens followed by a value.
    Set,
    /// Operational query: path tokens only.
    Show,
}

impl EntryKind {
    /// Returns the serialized name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Show => "show",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One command path in the schema.
///
/// `tokens` is the path below the command verb; each token is a literal
/// keyword or a `<category>` placeholder. `value_token` is only meaningful
/// for [`EntryKind::Set`].
///
/// # Examples
///
/// ```
/// use cmdtree_core::{EntryKind, SchemaEntry};
///
/// let entry = SchemaEntry::set(["firewall", "name", "<name>", "rule", "<id>", "action"], "<accept|drop>", "Rule action");
/// assert_eq!(entry.kind, EntryKind::Set);
/// assert_eq!(entry.pattern(), "firewall name <name> rule <id> action <accept|drop>");
///
/// let json = serde_json::to_string(&entry).unwrap();
/// assert!(!json.contains("multi"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaEntry {
    /// Command category.
    pub kind: EntryKind,
    /// Path segments (literal keywords and placeholders).
    pub tokens: Vec<String>,
    /// Human-readable help text.
    #[serde(default = "default_description")]
    pub description: String,
    /// What follows the path for `set` entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_token: Option<String>,
    /// Whether the underlying leaf accepts repeated values.
    #[serde(default, skip_serializing_if = "is_false")]
    pub multi: bool,
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Borrowed dedup key: (`kind`, `tokens`, `value_token`).
///
/// A missing value token compares equal to an empty one.
pub type EntryKey<'a> = (EntryKind, &'a [String], &'a str);

impl SchemaEntry {
    /// Creates a `set` entry.
    pub fn set<I, S>(tokens: I, value_token: impl Into<String>, description: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: EntryKind::Set,
            tokens: tokens.into_iter().map(Into::into).collect(),
            description: description.into(),
            value_token: Some(value_token.into()),
            multi: false,
        }
    }

    /// Creates a `show` entry.
    pub fn show<I, S>(tokens: I, description: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: EntryKind::Show,
            tokens: tokens.into_iter().map(Into::into).collect(),
            description: description.into(),
            value_token: None,
            multi: false,
        }
    }

    /// Marks the entry as accepting repeated values.
    pub fn with_multi(mut self, multi: bool) -> Self {
        self.multi = multi;
        self
    }

    /// Returns the value token, or `""` when absent.
    pub fn value_token_str(&self) -> &str {
        self.value_token.as_deref().unwrap_or("")
    }

    /// Returns the dedup key.
    pub fn key(&self) -> EntryKey<'_> {
        (self.kind, &self.tokens, self.value_token_str())
    }

    /// Returns the tokens joined by single spaces.
    pub fn joined_tokens(&self) -> String {
        self.tokens.join(" ")
    }

    /// Returns the owned sort key: (`kind`, joined tokens, `value_token`).
    pub fn sort_key(&self) -> (EntryKind, String, &str) {
        (self.kind, self.joined_tokens(), self.value_token_str())
    }

    /// Returns tokens plus value token joined by spaces.
    pub fn pattern(&self) -> String {
        let mut parts: Vec<&str> = self.tokens.iter().map(String::as_str).collect();
        if let Some(value) = self.value_token.as_deref() {
            if !value.is_empty() {
                parts.push(value);
            }
        }
        parts.join(" ")
    }
}
