//! Sample values for placeholder tokens.
//!
//! The conformance runner turns every schema entry into a concrete command
//! line. Path placeholders and value placeholders use separate lookup
//! tables; literals always pass through verbatim and unknown placeholders
//! fall back to [`GENERIC_SAMPLE`].

use crate::is_placeholder;

/// Sample used for placeholders with no table entry.
pub const GENERIC_SAMPLE: &str = "value";

const TOKEN_SAMPLES: &[(&str, &str)] = &[("<ifname>", "eth0"), ("<id>", "100"), ("<name>", "edge")];

const VALUE_SAMPLES: &[(&str, &str)] = &[
    ("", "value"),
    ("<name>", "edge"),
    ("<server>", "0.pool.ntp.org"),
    ("<ifname>", "eth0"),
    ("<id>", "100"),
    ("<port>", "443"),
    ("<cidr>", "10.0.0.0/24"),
    ("<ip>", "10.0.0.1"),
    ("<ipv4>", "10.0.0.1"),
    ("<ipv6>", "2001:db8::1"),
    ("<fqdn>", "api.example.com"),
    ("<value>", "example"),
    ("<allow|deny>", "deny"),
    ("<accept|drop>", "drop"),
    ("<tcp|udp|all>", "tcp"),
    ("<tcp|udp|icmp|all>", "tcp"),
    ("<tcp|http>", "http"),
    ("<lan|wan>", "wan"),
];

fn lookup(table: &[(&str, &'static str)], token: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(key, _)| *key == token)
        .map(|(_, sample)| *sample)
}

/// Returns a concrete value for one path token.
///
/// # Examples
///
/// ```
/// use cmdtree_core::sample::sample_token;
///
/// assert_eq!(sample_token("<ifname>"), "eth0");
/// assert_eq!(sample_token("<vrf>"), "value");
/// assert_eq!(sample_token("ethernet"), "ethernet");
/// ```
pub fn sample_token(token: &str) -> String {
    if let Some(sample) = lookup(TOKEN_SAMPLES, token) {
        return sample.to_string();
    }
    if is_placeholder(token) {
        return GENERIC_SAMPLE.to_string();
    }
    token.to_string()
}

/// Returns a concrete value for a `value_token`.
///
/// Alternations only resolve when listed in the table; any other
/// placeholder becomes [`GENERIC_SAMPLE`].
///
/// # Examples
///
/// ```
/// use cmdtree_core::sample::sample_value;
///
/// assert_eq!(sample_value("<cidr>"), "10.0.0.0/24");
/// assert_eq!(sample_value("<allow|deny>"), "deny");
/// assert_eq!(sample_value("<enable|disable>"), "value");
/// assert_eq!(sample_value("dhcp"), "dhcp");
/// ```
pub fn sample_value(token: &str) -> String {
    if let Some(sample) = lookup(VALUE_SAMPLES, token) {
        return sample.to_string();
    }
    if is_placeholder(token) {
        return GENERIC_SAMPLE.to_string();
    }
    token.to_string()
}
