//! Schema extraction from rendered interface definitions.
//!
//! An upstream checkout describes its configuration tree as XML templates.
//! This crate renders each template with an external renderer, parses the
//! result into a [`definition::DefinitionTree`], and walks the tree into
//! `set` [`SchemaEntry`] records with inferred placeholder and value tokens.
//!
//! # Main entry points
//!
//! - [`extract_rendered`]: walk already-rendered XML, no process spawned.
//! - [`discover::extract_definitions`]: render and walk a list of files,
//!   skipping and recording failures.
//! - [`discover::import_schema`]: load the curated schema,
//!   extract, merge, and rewrite the artifact.
//!
//! # Example
//!
//! ```
//! use cmdtree_discovery::extract_rendered;
//! use cmdtree_discovery::walker::TreeWalker;
//!
//! let xml = r#"
//! <interfaceDefinition>
//!   <node name="interfaces">
//!     <children>
//!       <tagNode name="ethernet">
//!         <children>
//!           <leafNode name="address">
//!             <properties><help>IP address</help><multi/></properties>
//!           </leafNode>
//!         </children>
//!       </tagNode>
//!     </children>
//!   </node>
//! </interfaceDefinition>"#;
//!
//! let entries = extract_rendered(xml, &TreeWalker::default()).unwrap();
//! assert_eq!(entries[0].tokens, ["interfaces", "ethernet", "<ifname>", "address"]);
//! assert_eq!(entries[0].value_token.as_deref(), Some("<cidr>"));
//! assert!(entries[0].multi);
//! ```
//!
//! [`SchemaEntry`]: cmdtree_core::SchemaEntry

pub mod config;
pub mod definition;
pub mod discover;
pub mod infer;
pub mod output;
pub mod render;
pub mod report;
pub mod walker;

use cmdtree_core::SchemaEntry;
use definition::{DefinitionError, DefinitionTree};
use walker::TreeWalker;

/// Parses rendered definition XML and walks it into `set` entries.
///
/// Entries are returned in walk order, without normalization or dedup.
pub fn extract_rendered(xml: &str, walker: &TreeWalker) -> Result<Vec<SchemaEntry>, DefinitionError> {
    let tree = DefinitionTree::parse(xml)?;
    Ok(walker.walk_tree(&tree))
}
