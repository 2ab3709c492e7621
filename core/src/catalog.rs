//! Human-facing command catalog derived from a schema.
//!
//! Each entry becomes a [`CatalogCommand`] with a printable pattern, the
//! backend service that applies it, and a ready-to-paste example command.

use serde::{Deserialize, Serialize};

use crate::sample::GENERIC_SAMPLE;
use crate::{EntryKind, SchemaEntry, alternatives, placeholder_inner};

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCommand {
    pub kind: EntryKind,
    pub pattern: String,
    pub description: String,
    pub backend: String,
    pub example: String,
}

/// Catalog grouped by command kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub set: Vec<CatalogCommand>,
    pub show: Vec<CatalogCommand>,
}

impl Catalog {
    /// Builds a catalog, preserving schema order within each group.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdtree_core::SchemaEntry;
    /// use cmdtree_core::catalog::Catalog;
    ///
    /// let catalog = Catalog::build(&[
    ///     SchemaEntry::set(["system", "ntp", "server", "<name>"], "<value>", "NTP server"),
    ///     SchemaEntry::show(["interfaces"], "Show interfaces"),
    /// ]);
    /// assert_eq!(catalog.set[0].backend, "chrony");
    /// assert_eq!(catalog.set[0].example, "set system ntp server edge value");
    /// assert_eq!(catalog.show[0].example, "show interfaces");
    /// ```
    pub fn build(entries: &[SchemaEntry]) -> Self {
        let mut catalog = Self::default();
        for entry in entries {
            let command = CatalogCommand {
                kind: entry.kind,
                pattern: entry.pattern(),
                description: entry.description.clone(),
                backend: backend_for(entry).to_string(),
                example: example_for(entry),
            };
            match entry.kind {
                EntryKind::Set => catalog.set.push(command),
                EntryKind::Show => catalog.show.push(command),
            }
        }
        catalog
    }

    /// Iterates `set` rows followed by `show` rows.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogCommand> {
        self.set.iter().chain(self.show.iter())
    }
}

/// Resolves the backend service that applies an entry.
pub fn backend_for(entry: &SchemaEntry) -> &'static str {
    if entry.tokens.is_empty() {
        return "config";
    }

    let joined = entry.tokens.join(".");
    if joined.starts_with("firewall.nftables") || joined.starts_with("nat.") {
        "nftables"
    } else if joined.starts_with("service.dns") {
        "bind9"
    } else if joined.starts_with("service.haproxy") {
        "haproxy"
    } else if joined.starts_with("system.ntp") {
        "chrony"
    } else if joined.starts_with("interfaces.") {
        if is_dhcp_address(entry) {
            "dhclient+systemd"
        } else {
            "systemd-networkd"
        }
    } else {
        "control-plane"
    }
}

fn is_dhcp_address(entry: &SchemaEntry) -> bool {
    entry.kind == EntryKind::Set
        && entry.tokens.last().is_some_and(|leaf| leaf == "address")
        && entry.value_token.as_deref() == Some("dhcp")
}

/// Builds an example command line for an entry.
pub fn example_for(entry: &SchemaEntry) -> String {
    let mut parts = vec![entry.kind.as_str().to_string()];
    parts.extend(entry.tokens.iter().map(|token| example_token(token)));
    if let Some(value) = entry.value_token.as_deref() {
        if !value.is_empty() {
            parts.push(example_value(value));
        }
    }
    parts.join(" ")
}

fn example_token(token: &str) -> String {
    let Some(inner) = placeholder_inner(token) else {
        return token.to_string();
    };
    if let Some(first) = alternatives(token).and_then(|alts| alts.first().copied()) {
        return first.to_string();
    }
    let sample = match inner {
        "ifname" => "eth0",
        "id" => "100",
        "name" => "edge",
        _ => GENERIC_SAMPLE,
    };
    sample.to_string()
}

fn example_value(token: &str) -> String {
    let Some(inner) = placeholder_inner(token) else {
        return token.to_string();
    };
    if let Some(first) = alternatives(token).and_then(|alts| alts.first().copied()) {
        return first.to_string();
    }
    let sample = match inner {
        "port" | "id" => "100",
        "cidr" => "10.0.0.0/24",
        "ip" | "ipv4" => "10.0.0.1",
        "ipv6" => "2001:db8::1",
        "fqdn" => "api.example.com",
        "ifname" => "eth0",
        _ => GENERIC_SAMPLE,
    };
    sample.to_string()
}
