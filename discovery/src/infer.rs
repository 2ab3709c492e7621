//! Token inference for definition nodes.
//!
//! Both inferences are ordered rule tables: the first matching rule wins.
//! Tag nodes map to a path placeholder ([`TAG_RULES`]); leaf nodes map to a
//! value token ([`LEAF_RULES`]). Name comparisons are case-insensitive.

use cmdtree_core::DEFAULT_VALUE_TOKEN;

use crate::definition::{DefinitionNode, NodeProperties};

const INTERFACE_TAGS: &[&str] = &[
    "ethernet",
    "bridge",
    "bonding",
    "dummy",
    "geneve",
    "input",
    "loopback",
    "macsec",
    "openvpn",
    "pppoe",
    "pseudo-ethernet",
    "tunnel",
    "virtual-ethernet",
    "vti",
    "vxlan",
    "wireguard",
];

const NUMERIC_TAGS: &[&str] = &["asn", "table", "mark", "priority"];

const NUMERIC_LEAVES: &[&str] = &["asn", "id", "table", "mark", "priority"];

/// Single-hint formats that become a literal value token.
const LITERAL_HINTS: &[&str] = &["dhcp", "disable", "enable", "auto"];

const MAX_HINT_CHARS: usize = 32;
const MAX_ALTERNATIVES: usize = 8;

/// One tag-name classification rule.
#[derive(Debug, Clone, Copy)]
pub struct TagRule {
    pub name: &'static str,
    matches: fn(&str) -> bool,
    pub placeholder: &'static str,
}

impl TagRule {
    /// Tests the rule against a lowercased tag name.
    pub fn matches(&self, lowered: &str) -> bool {
        (self.matches)(lowered)
    }
}

/// Tag-name rules in evaluation order.
pub const TAG_RULES: &[TagRule] = &[
    TagRule {
        name: "rule",
        matches: |name| name == "rule" || name.ends_with("_rule") || name.ends_with("-rule"),
        placeholder: "<id>",
    },
    TagRule {
        name: "interface",
        matches: |name| INTERFACE_TAGS.contains(&name),
        placeholder: "<ifname>",
    },
    TagRule {
        name: "numeric",
        matches: |name| NUMERIC_TAGS.contains(&name),
        placeholder: "<id>",
    },
];

const FALLBACK_TAG_PLACEHOLDER: &str = "<name>";

/// Returns the placeholder inserted after a tag node's keyword.
///
/// # Examples
///
/// ```
/// use cmdtree_discovery::infer::tag_placeholder;
///
/// assert_eq!(tag_placeholder("ethernet"), "<ifname>");
/// assert_eq!(tag_placeholder("Forward-Rule"), "<id>");
/// assert_eq!(tag_placeholder("table"), "<id>");
/// assert_eq!(tag_placeholder("group"), "<name>");
/// ```
pub fn tag_placeholder(name: &str) -> &'static str {
    let lowered = name.to_lowercase();
    TAG_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.placeholder)
        .unwrap_or(FALLBACK_TAG_PLACEHOLDER)
}

/// Facts about a leaf node that leaf rules inspect.
#[derive(Debug, Clone, Copy)]
pub struct LeafFacts<'a> {
    /// Lowercased leaf name.
    pub name: &'a str,
    pub properties: Option<&'a NodeProperties>,
}

/// One leaf value classification rule.
#[derive(Debug, Clone, Copy)]
pub struct LeafRule {
    pub name: &'static str,
    apply: fn(&LeafFacts<'_>) -> Option<String>,
}

impl LeafRule {
    /// Returns the value token when the rule matches.
    pub fn apply(&self, facts: &LeafFacts<'_>) -> Option<String> {
        (self.apply)(facts)
    }
}

fn fixed(token: &str) -> Option<String> {
    Some(token.to_string())
}

/// Leaf rules in evaluation order. Every rule after `no_properties` may
/// assume a properties block is present.
pub const LEAF_RULES: &[LeafRule] = &[
    LeafRule {
        name: "no_properties",
        apply: |facts| facts.properties.is_none().then(|| DEFAULT_VALUE_TOKEN.to_string()),
    },
    LeafRule {
        name: "valueless",
        apply: |facts| {
            facts
                .properties
                .is_some_and(|props| props.valueless)
                .then(|| "enable".to_string())
        },
    },
    LeafRule {
        name: "address",
        apply: |facts| {
            let name = facts.name;
            if name.contains("address") || name == "network" || name == "prefix" {
                return fixed("<cidr>");
            }
            None
        },
    },
    LeafRule {
        name: "port",
        apply: |facts| facts.name.contains("port").then(|| "<port>".to_string()),
    },
    LeafRule {
        name: "numeric",
        apply: |facts| NUMERIC_LEAVES.contains(&facts.name).then(|| "<id>".to_string()),
    },
    LeafRule {
        name: "host",
        apply: |facts| {
            let name = facts.name;
            if name.contains("domain") || name.contains("host") {
                return fixed("<name>");
            }
            None
        },
    },
    LeafRule {
        name: "interface",
        apply: |facts| facts.name.contains("interface").then(|| "<ifname>".to_string()),
    },
    LeafRule {
        name: "value_help",
        apply: |facts| facts.properties.and_then(value_help_token),
    },
];

/// Result of leaf value inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafInference {
    pub value_token: String,
    /// Name of the rule that fired; `default` when none did.
    pub rule: &'static str,
}

/// Infers a leaf's value token, reporting which rule produced it.
pub fn infer_leaf(node: &DefinitionNode) -> LeafInference {
    let lowered = node.name.to_lowercase();
    let facts = LeafFacts {
        name: &lowered,
        properties: node.properties.as_ref(),
    };

    for rule in LEAF_RULES {
        if let Some(value_token) = rule.apply(&facts) {
            return LeafInference {
                value_token,
                rule: rule.name,
            };
        }
    }

    LeafInference {
        value_token: DEFAULT_VALUE_TOKEN.to_string(),
        rule: "default",
    }
}

/// Infers a leaf's value token.
///
/// # Examples
///
/// ```
/// use cmdtree_discovery::definition::{DefinitionNode, NodeKind, NodeProperties};
/// use cmdtree_discovery::infer::leaf_value_token;
///
/// let leaf = DefinitionNode::new(NodeKind::LeafNode, "listen-address")
///     .with_properties(NodeProperties::default());
/// assert_eq!(leaf_value_token(&leaf), "<cidr>");
///
/// let bare = DefinitionNode::new(NodeKind::LeafNode, "listen-address");
/// assert_eq!(leaf_value_token(&bare), "<value>");
/// ```
pub fn leaf_value_token(node: &DefinitionNode) -> String {
    infer_leaf(node).value_token
}

/// Returns the description for a leaf: its help text, or `Set <name>` with
/// hyphens turned into spaces.
pub fn leaf_description(node: &DefinitionNode) -> String {
    node.properties
        .as_ref()
        .and_then(|props| props.help.as_deref())
        .map(str::trim)
        .filter(|help| !help.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Set {}", node.name.replace('-', " ")))
}

fn is_hint(format: &str) -> bool {
    !format.is_empty()
        && format.chars().count() < MAX_HINT_CHARS
        && format
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

fn value_help_token(props: &NodeProperties) -> Option<String> {
    let hints: Vec<&str> = props
        .formats()
        .map(str::trim)
        .filter(|format| is_hint(format))
        .collect();

    match hints.as_slice() {
        [] => None,
        [single] => {
            let lowered = single.to_lowercase();
            LITERAL_HINTS.contains(&lowered.as_str()).then_some(lowered)
        }
        many if many.len() <= MAX_ALTERNATIVES => Some(format!("<{}>", many.join("|"))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{NodeKind, ValueHelp};

    fn leaf(name: &str, props: Option<NodeProperties>) -> DefinitionNode {
        let node = DefinitionNode::new(NodeKind::LeafNode, name);
        match props {
            Some(props) => node.with_properties(props),
            None => node,
        }
    }

    fn hinted(formats: &[&str]) -> NodeProperties {
        NodeProperties {
            value_help: formats
                .iter()
                .map(|format| ValueHelp {
                    format: format.to_string(),
                    description: None,
                })
                .collect(),
            ..NodeProperties::default()
        }
    }

    #[test]
    fn test_tag_rules_in_order() {
        assert_eq!(tag_placeholder("rule"), "<id>");
        assert_eq!(tag_placeholder("name_rule"), "<id>");
        assert_eq!(tag_placeholder("RULE"), "<id>");
        assert_eq!(tag_placeholder("rules"), "<name>");
        assert_eq!(tag_placeholder("pseudo-ethernet"), "<ifname>");
        assert_eq!(tag_placeholder("wireguard"), "<ifname>");
        assert_eq!(tag_placeholder("priority"), "<id>");
        assert_eq!(tag_placeholder("server"), "<name>");
    }

    #[test]
    fn test_tag_rule_table_is_individually_testable() {
        let rule = TAG_RULES.iter().find(|rule| rule.name == "interface").unwrap();
        assert!(rule.matches("vxlan"));
        assert!(!rule.matches("rule"));
    }

    #[test]
    fn test_missing_properties_wins_over_name() {
        let inference = infer_leaf(&leaf("address", None));
        assert_eq!(inference.value_token, "<value>");
        assert_eq!(inference.rule, "no_properties");
    }

    #[test]
    fn test_valueless_wins_over_name() {
        let props = NodeProperties {
            valueless: true,
            ..NodeProperties::default()
        };
        assert_eq!(leaf_value_token(&leaf("disable-address", Some(props))), "enable");
    }

    #[test]
    fn test_name_rules() {
        let cases = [
            ("address", "<cidr>"),
            ("network", "<cidr>"),
            ("Prefix", "<cidr>"),
            ("listen-port", "<port>"),
            ("id", "<id>"),
            ("mark", "<id>"),
            ("domain-name", "<name>"),
            ("host-name", "<name>"),
            ("inbound-interface", "<ifname>"),
            ("description", "<value>"),
        ];
        for (name, expected) in cases {
            let token = leaf_value_token(&leaf(name, Some(NodeProperties::default())));
            assert_eq!(token, expected, "leaf {name}");
        }
    }

    #[test]
    fn test_address_rule_precedes_port_rule() {
        let inference = infer_leaf(&leaf("port-address", Some(NodeProperties::default())));
        assert_eq!(inference.rule, "address");
    }

    #[test]
    fn test_value_help_alternation_keeps_order() {
        let token = leaf_value_token(&leaf("action", Some(hinted(&["allow", "deny", "reject"]))));
        assert_eq!(token, "<allow|deny|reject>");
    }

    #[test]
    fn test_value_help_filters_invalid_hints() {
        let props = hinted(&["u32:1-65535", "  ", "txt", "  auto ", "a-very-long-format-name-over-thirty-two"]);
        assert_eq!(leaf_value_token(&leaf("mode", Some(props))), "<txt|auto>");
    }

    #[test]
    fn test_single_literal_hint() {
        let token = leaf_value_token(&leaf("mode", Some(hinted(&["DHCP"]))));
        assert_eq!(token, "dhcp");

        let other = infer_leaf(&leaf("mode", Some(hinted(&["txt"]))));
        assert_eq!(other.value_token, "<value>");
        assert_eq!(other.rule, "default");
    }

    #[test]
    fn test_too_many_hints_fall_through() {
        let formats: Vec<String> = (0..9).map(|i| format!("opt{i}")).collect();
        let refs: Vec<&str> = formats.iter().map(String::as_str).collect();
        assert_eq!(leaf_value_token(&leaf("mode", Some(hinted(&refs)))), "<value>");

        let eight: Vec<&str> = refs[..8].to_vec();
        let token = leaf_value_token(&leaf("mode", Some(hinted(&eight))));
        assert_eq!(token.matches('|').count(), 7);
    }

    #[test]
    fn test_leaf_description() {
        let props = NodeProperties {
            help: Some("DHCP vendor class".to_string()),
            ..NodeProperties::default()
        };
        assert_eq!(leaf_description(&leaf("vendor-class-id", Some(props))), "DHCP vendor class");
        assert_eq!(
            leaf_description(&leaf("dhcp-options-vendor-class-id", None)),
            "Set dhcp options vendor class id"
        );

        let blank = NodeProperties {
            help: Some("   ".to_string()),
            ..NodeProperties::default()
        };
        assert_eq!(leaf_description(&leaf("mtu", Some(blank))), "Set mtu");
    }
}
