//! Definition tree walker.
//!
//! Turns a [`DefinitionTree`] into `set` [`SchemaEntry`] records: fixed
//! nodes contribute their keyword, tag nodes contribute their keyword plus
//! an inferred placeholder, and every leaf emits one entry.

use std::collections::BTreeSet;

use cmdtree_core::SchemaEntry;
use tracing::trace;

use crate::definition::{DefinitionNode, DefinitionTree, NodeKind};
use crate::infer::{infer_leaf, leaf_description, tag_placeholder};

/// Root keywords walked when no allow-list is configured.
pub const DEFAULT_ALLOWED_ROOTS: &[&str] = &["system", "interfaces", "firewall", "nat", "service", "policy"];

/// Walks definition trees under an allow-list of root keywords.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    allowed_roots: BTreeSet<String>,
}

impl Default for TreeWalker {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_ROOTS.iter().copied())
    }
}

impl TreeWalker {
    pub fn new<I, S>(allowed_roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_roots: allowed_roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if a root `node` with this name is walked.
    pub fn is_allowed_root(&self, name: &str) -> bool {
        self.allowed_roots.contains(name)
    }

    /// Walks every allowed root of a parsed document.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdtree_discovery::definition::DefinitionTree;
    /// use cmdtree_discovery::walker::TreeWalker;
    ///
    /// let tree = DefinitionTree::parse(
    ///     r#"<root>
    ///          <node name="interfaces"><children>
    ///            <tagNode name="ethernet"><children>
    ///              <leafNode name="mtu"><properties><help>MTU</help></properties></leafNode>
    ///            </children></tagNode>
    ///          </children></node>
    ///          <node name="container"><children><leafNode name="name"/></children></node>
    ///        </root>"#,
    /// )
    /// .unwrap();
    /// let entries = TreeWalker::default().walk_tree(&tree);
    /// assert_eq!(entries.len(), 1);
    /// assert_eq!(entries[0].tokens, ["interfaces", "ethernet", "<ifname>", "mtu"]);
    /// ```
    pub fn walk_tree(&self, tree: &DefinitionTree) -> Vec<SchemaEntry> {
        let mut entries = Vec::new();
        for root in &tree.roots {
            if root.kind != NodeKind::Node || !self.is_allowed_root(&root.name) {
                trace!(root = %root.name, "Skipping root outside allow-list");
                continue;
            }
            let mut path = Vec::new();
            walk_node(root, &mut path, &mut entries);
        }
        entries
    }
}

/// Walks one node below `path`, appending emitted entries to `out`.
///
/// `path` is restored to its original contents on return.
pub fn walk_node(node: &DefinitionNode, path: &mut Vec<String>, out: &mut Vec<SchemaEntry>) {
    let pushed = match node.kind {
        NodeKind::LeafNode => {
            let inference = infer_leaf(node);
            trace!(leaf = %node.name, rule = inference.rule, token = %inference.value_token, "Inferred leaf value");

            let mut tokens = path.clone();
            tokens.push(node.name.clone());
            let multi = node.properties.as_ref().is_some_and(|props| props.multi);
            out.push(SchemaEntry::set(tokens, inference.value_token, leaf_description(node)).with_multi(multi));
            return;
        }
        NodeKind::Node => {
            path.push(node.name.clone());
            1
        }
        NodeKind::TagNode => {
            path.push(node.name.clone());
            path.push(tag_placeholder(&node.name).to_string());
            2
        }
    };

    for child in node.child_nodes() {
        walk_node(child, path, out);
    }

    path.truncate(path.len() - pushed);
}
