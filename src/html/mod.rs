/*!
 * HTML tree access.
 *
 * The template engine reads and rewrites templates through the `Document`
 * trait. `HtmlDocument` is the implementation used by default: a lenient,
 * lossless arena tree that writes untouched input back exactly as it was read.
 */

pub mod document;
pub mod tokenizer;

pub use document::HtmlDocument;

/// Handle to a node in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// The kind of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Element,
    Text,
    Comment,
    Doctype,
    /// End tag that closes no open element
    StrayEndTag,
}

/// An HTML tree that can be inspected and rewritten.
///
/// Attribute names are matched case-insensitively and reported in lowercase.
/// Attribute values, text and inner HTML are source text; character
/// references are neither decoded nor encoded.
pub trait Document: Sized {
    /// Parses an HTML fragment or document
    fn parse(html: &str) -> Self;

    /// The root node, whose children are the top-level nodes
    fn root(&self) -> NodeId;

    /// Kind of a node, or `None` for an id not in this document
    fn node_kind(&self, id: NodeId) -> Option<NodeKind>;

    /// Child nodes, in document order. Empty for an id not in this document.
    fn children(&self, id: NodeId) -> &[NodeId];

    /// Lowercase tag name of an element
    fn tag_name(&self, id: NodeId) -> Option<&str>;

    /// Names of the attributes of an element, in source order
    fn attribute_names(&self, id: NodeId) -> Vec<String>;

    /// Value of an attribute. A bare attribute has an empty value.
    fn attribute(&self, id: NodeId, name: &str) -> Option<&str>;

    /// Sets an attribute, keeping its position if it already exists
    fn set_attribute(&mut self, id: NodeId, name: &str, value: &str);

    fn remove_attribute(&mut self, id: NodeId, name: &str);

    /// Content of a text node
    fn text(&self, id: NodeId) -> Option<&str>;

    fn set_text(&mut self, id: NodeId, text: &str);

    /// Serialized children of a node
    fn inner_html(&self, id: NodeId) -> String;

    /// Replaces the children of a node with the parsed `html`
    fn set_inner_html(&mut self, id: NodeId, html: &str);

    /// Serializes the whole document
    fn to_html(&self) -> String;
}
