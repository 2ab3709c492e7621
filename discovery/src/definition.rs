//! Typed model of a rendered interface definition document.
//!
//! A rendered document is an XML tree whose document element holds one or
//! more `node` roots. Each node is a `node`, `tagNode` or `leafNode`
//! element with a `name` attribute, an optional `<properties>` block and an
//! optional `<children>` block:
//!
//! ```xml
//! <interfaceDefinition>
//!   <node name="interfaces">
//!     <children>
//!       <tagNode name="ethernet">
//!         <properties><help>Ethernet interface</help></properties>
//!         <children>
//!           <leafNode name="address">
//!             <properties>
//!               <valueHelp><format>ipv4net</format></valueHelp>
//!               <multi/>
//!             </properties>
//!           </leafNode>
//!         </children>
//!       </tagNode>
//!     </children>
//!   </node>
//! </interfaceDefinition>
//! ```
//!
//! Parsing happens in two passes: quick-xml events build a generic element
//! tree, which is then converted into [`DefinitionNode`]s. Elements with an
//! unknown tag or without a non-empty `name` are dropped during conversion.

use quick_xml::Reader;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

/// Failure to parse a rendered definition document.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attribute(#[from] AttrError),

    #[error("malformed definition document: {0}")]
    Malformed(String),
}

/// Kind of a definition node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Fixed keyword with children.
    Node,
    /// Keyword followed by a user-chosen instance name.
    TagNode,
    /// Terminal setting.
    LeafNode,
}

impl NodeKind {
    /// Maps an XML element name to a node kind.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "node" => Some(Self::Node),
            "tagNode" => Some(Self::TagNode),
            "leafNode" => Some(Self::LeafNode),
            _ => None,
        }
    }
}

/// One `<valueHelp>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueHelp {
    /// Trimmed `<format>` text; empty when absent.
    pub format: String,
    pub description: Option<String>,
}

/// Contents of a `<properties>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeProperties {
    /// Trimmed text of the first `<help>` element.
    pub help: Option<String>,
    pub value_help: Vec<ValueHelp>,
    /// `<valueless/>` present.
    pub valueless: bool,
    /// `<multi/>` present.
    pub multi: bool,
}

impl NodeProperties {
    /// Iterates `valueHelp` formats in document order.
    pub fn formats(&self) -> impl Iterator<Item = &str> + '_ {
        self.value_help
            .iter()
            .map(|value_help| value_help.format.as_str())
    }
}

/// A node of the configuration tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionNode {
    pub kind: NodeKind,
    /// Non-empty keyword.
    pub name: String,
    /// `None` when the node has no `<properties>` element.
    pub properties: Option<NodeProperties>,
    /// `None` when the node has no `<children>` element.
    pub children: Option<Vec<DefinitionNode>>,
}

impl DefinitionNode {
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            properties: None,
            children: None,
        }
    }

    pub fn with_properties(mut self, properties: NodeProperties) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn with_children(mut self, children: Vec<DefinitionNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Returns the child nodes, empty when the node has no children block.
    pub fn child_nodes(&self) -> &[DefinitionNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// A parsed rendered document: the document element's direct `node`
/// children, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionTree {
    pub roots: Vec<DefinitionNode>,
}

impl DefinitionTree {
    /// Parses rendered XML text.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdtree_discovery::definition::{DefinitionTree, NodeKind};
    ///
    /// let tree = DefinitionTree::parse(
    ///     r#"<interfaceDefinition><node name="system"><children>
    ///          <leafNode name="host-name"><properties><help>Host name</help></properties></leafNode>
    ///        </children></node></interfaceDefinition>"#,
    /// )
    /// .unwrap();
    /// assert_eq!(tree.roots.len(), 1);
    /// let leaf = &tree.roots[0].child_nodes()[0];
    /// assert_eq!(leaf.kind, NodeKind::LeafNode);
    /// assert_eq!(leaf.properties.as_ref().unwrap().help.as_deref(), Some("Host name"));
    /// ```
    pub fn parse(xml: &str) -> Result<Self, DefinitionError> {
        let document = parse_elements(xml)?;
        let roots = document
            .children
            .iter()
            .filter(|element| element.name == "node")
            .filter_map(convert_node)
            .collect();
        Ok(Self { roots })
    }
}

#[derive(Debug, Default)]
struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, DefinitionError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            ..Self::default()
        })
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(|child| child.text.trim().to_string())
    }
}

fn parse_elements(xml: &str) -> Result<XmlElement, DefinitionError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut document: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if stack.is_empty() && document.is_some() {
                    return Err(malformed("multiple document elements"));
                }
                stack.push(XmlElement::from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = XmlElement::from_start(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None if document.is_none() => document = Some(element),
                    None => return Err(malformed("multiple document elements")),
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| malformed("unexpected closing tag"))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => document = Some(element),
                }
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                append_text(&mut stack, &text)?;
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                append_text(&mut stack, &text)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(malformed("unclosed element at end of document"));
    }
    document.ok_or_else(|| malformed("document has no root element"))
}

fn append_text(stack: &mut [XmlElement], text: &str) -> Result<(), DefinitionError> {
    match stack.last_mut() {
        // Text after the first child element is not part of `text`.
        Some(element) if element.children.is_empty() => element.text.push_str(text),
        Some(_) => {}
        None if text.trim().is_empty() => {}
        None => return Err(malformed("text outside the document element")),
    }
    Ok(())
}

fn malformed(reason: &str) -> DefinitionError {
    DefinitionError::Malformed(reason.to_string())
}

fn convert_node(element: &XmlElement) -> Option<DefinitionNode> {
    let kind = NodeKind::from_tag(&element.name)?;
    let name = element.attribute("name").filter(|name| !name.is_empty())?;

    let properties = element.child("properties").map(convert_properties);
    let children = element
        .child("children")
        .map(|children| children.children.iter().filter_map(convert_node).collect());

    Some(DefinitionNode {
        kind,
        name: name.to_string(),
        properties,
        children,
    })
}

fn convert_properties(element: &XmlElement) -> NodeProperties {
    let value_help = element
        .children
        .iter()
        .filter(|child| child.name == "valueHelp")
        .map(|value_help| ValueHelp {
            format: value_help.child_text("format").unwrap_or_default(),
            description: value_help.child_text("description"),
        })
        .collect();

    NodeProperties {
        help: element.child_text("help"),
        value_help,
        valueless: element.child("valueless").is_some(),
        multi: element.child("multi").is_some(),
    }
}
