/*!
 * Arena-backed HTML document.
 *
 * Nodes live in a single vector and refer to their children by index. Each
 * element remembers the source text of its start tag parts and end tag, and
 * is written back from that text until it is modified. A modified attribute
 * is written with the quote style it was read with.
 */

use super::tokenizer::{self, QuoteStyle, RawAttribute, Token};
use super::{Document, NodeId, NodeKind};

#[derive(Debug, Clone)]
struct Attribute {
    /// Lowercase name, used for lookups
    name: String,
    /// Name as written, used when the attribute is serialized
    source_name: String,
    value: Option<String>,
    quote: QuoteStyle,
    /// Source text, cleared when the attribute is modified
    raw: Option<String>,
}

impl Attribute {
    fn from_raw(attr: &RawAttribute<'_>) -> Self {
        Self {
            name: attr.name.to_ascii_lowercase(),
            source_name: attr.name.to_string(),
            value: attr.value.map(str::to_string),
            quote: attr.quote,
            raw: Some(attr.raw.to_string()),
        }
    }

    fn write(&self, out: &mut String) {
        if let Some(raw) = &self.raw {
            out.push_str(raw);
            return;
        }

        out.push(' ');
        out.push_str(&self.source_name);

        let Some(value) = &self.value else {
            return;
        };

        let needs_quotes = value.is_empty()
            || value
                .bytes()
                .any(|b| b.is_ascii_whitespace() || matches!(b, b'"' | b'\'' | b'=' | b'<' | b'>' | b'`'));

        match self.quote {
            QuoteStyle::Single => {
                out.push_str("='");
                out.push_str(&value.replace('\'', "&apos;"));
                out.push('\'');
            }
            QuoteStyle::Unquoted if !needs_quotes => {
                out.push('=');
                out.push_str(value);
            }
            _ => {
                out.push_str("=\"");
                out.push_str(&value.replace('"', "&quot;"));
                out.push('"');
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Element {
    /// Lowercase tag name
    name: String,
    source_name: String,
    attributes: Vec<Attribute>,
    /// Source text closing the start tag
    tag_end: String,
    /// Source text of the end tag, if one was read
    end_tag: Option<String>,
}

#[derive(Debug, Clone)]
enum NodeData {
    Root,
    Element(Element),
    Text(String),
    Comment(String),
    Doctype(String),
    /// End tag without a matching open element, kept as written
    StrayEndTag(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    children: Vec<NodeId>,
}

/// Lossless HTML document
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    nodes: Vec<Node>,
}

/// Open elements closed by the start tag `name`, as long as they are the
/// current element
fn implied_closes(name: &str) -> &'static [&'static str] {
    const P: &[&str] = &["p"];
    const FORM: &[&str] = &["input", "option", "optgroup", "select", "button", "datalist", "textarea"];

    match name {
        "tr" => &["tr", "th", "td"],
        "th" => &["th"],
        "td" => &["thead", "th", "td"],
        "body" => &["head", "link", "script"],
        "li" => &["li"],
        "option" => &["option"],
        "optgroup" => &["optgroup", "option"],
        "dd" | "dt" => &["dd", "dt"],
        "rt" | "rp" => &["rt", "rp"],
        "tbody" | "tfoot" => &["thead", "tbody"],
        "select" | "input" | "output" | "button" | "datalist" | "textarea" => FORM,
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "address" | "article" | "aside" | "blockquote"
        | "details" | "div" | "dl" | "fieldset" | "figcaption" | "figure" | "footer" | "form"
        | "header" | "hr" | "main" | "nav" | "ol" | "pre" | "section" | "table" | "ul" => P,
        _ => &[],
    }
}

impl HtmlDocument {
    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            children: Vec::new(),
        });
        id
    }

    fn add_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let child = self.push(data);
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(child);
        }
        child
    }

    fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes.get(id.0)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(id.0)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Builds the nodes for `html` as children of `parent`.
    ///
    /// A start tag first closes the current element while HTML implies its
    /// end, such as an open `li` before another `li`. An end tag closes the
    /// nearest open element with the same name, along with every element
    /// opened after it. End tags without a matching open element are kept
    /// as stray end tags.
    fn append_fragment(&mut self, parent: NodeId, html: &str) {
        let mut open_elements: Vec<NodeId> = Vec::new();

        for token in tokenizer::tokenize(html) {
            let current = open_elements.last().copied().unwrap_or(parent);

            match token {
                Token::Text(text) => {
                    self.add_child(current, NodeData::Text(text.to_string()));
                }
                Token::Comment(raw) => {
                    self.add_child(current, NodeData::Comment(raw.to_string()));
                }
                Token::Doctype(raw) => {
                    self.add_child(current, NodeData::Doctype(raw.to_string()));
                }
                Token::StartTag(tag) => {
                    let name = tag.name.to_ascii_lowercase();
                    let closes = implied_closes(&name);

                    while open_elements
                        .last()
                        .and_then(|&id| self.element(id))
                        .is_some_and(|element| closes.contains(&element.name.as_str()))
                    {
                        open_elements.pop();
                    }

                    let current = open_elements.last().copied().unwrap_or(parent);
                    let leaf = tag.self_closing || tokenizer::is_void_element(&name);
                    let element = Element {
                        name,
                        source_name: tag.name.to_string(),
                        attributes: tag.attributes.iter().map(Attribute::from_raw).collect(),
                        tag_end: tag.tag_end.to_string(),
                        end_tag: None,
                    };
                    let id = self.add_child(current, NodeData::Element(element));

                    if !leaf {
                        open_elements.push(id);
                    }
                }
                Token::EndTag { name, raw } => {
                    let position = open_elements
                        .iter()
                        .rposition(|&id| self.element(id).is_some_and(|e| e.name == name));

                    match position {
                        Some(position) => {
                            let id = open_elements[position];
                            open_elements.truncate(position);

                            if let Some(element) = self.element_mut(id) {
                                element.end_tag = Some(raw.to_string());
                            }
                        }
                        None => {
                            self.add_child(current, NodeData::StrayEndTag(raw.to_string()));
                        }
                    }
                }
            }
        }
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(id.0) else {
            return;
        };

        match &node.data {
            NodeData::Root => self.write_children(id, out),
            NodeData::Text(text) => out.push_str(text),
            NodeData::Comment(raw) | NodeData::Doctype(raw) | NodeData::StrayEndTag(raw) => out.push_str(raw),
            NodeData::Element(element) => {
                out.push('<');
                out.push_str(&element.source_name);
                for attribute in &element.attributes {
                    attribute.write(out);
                }
                out.push_str(&element.tag_end);

                self.write_children(id, out);

                if let Some(end_tag) = &element.end_tag {
                    out.push_str(end_tag);
                }
            }
        }
    }

    fn write_children(&self, id: NodeId, out: &mut String) {
        for &child in self.children(id) {
            self.write_node(child, out);
        }
    }
}

impl Document for HtmlDocument {
    fn parse(html: &str) -> Self {
        let mut document = Self { nodes: Vec::new() };
        let root = document.push(NodeData::Root);
        document.append_fragment(root, html);
        document
    }

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn node_kind(&self, id: NodeId) -> Option<NodeKind> {
        let kind = match &self.nodes.get(id.0)?.data {
            NodeData::Root => NodeKind::Root,
            NodeData::Element(_) => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Comment(_) => NodeKind::Comment,
            NodeData::Doctype(_) => NodeKind::Doctype,
            NodeData::StrayEndTag(_) => NodeKind::StrayEndTag,
        };

        Some(kind)
    }

    fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.name.as_str())
    }

    fn attribute_names(&self, id: NodeId) -> Vec<String> {
        self.element(id)
            .map(|element| element.attributes.iter().map(|a| a.name.clone()).collect())
            .unwrap_or_default()
    }

    fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_deref().unwrap_or_default())
    }

    fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(element) = self.element_mut(id) else {
            return;
        };

        match element
            .attributes
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
        {
            Some(attribute) => {
                if attribute.value.as_deref() != Some(value) {
                    attribute.value = Some(value.to_string());
                    attribute.raw = None;
                }
            }
            None => element.attributes.push(Attribute {
                name: name.to_ascii_lowercase(),
                source_name: name.to_string(),
                value: Some(value.to_string()),
                quote: QuoteStyle::Double,
                raw: None,
            }),
        }
    }

    fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(element) = self.element_mut(id) {
            element.attributes.retain(|a| !a.name.eq_ignore_ascii_case(name));
        }
    }

    fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(id.0)?.data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(Node {
            data: NodeData::Text(current),
            ..
        }) = self.nodes.get_mut(id.0)
        {
            *current = text.to_string();
        }
    }

    fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_children(id, &mut out);
        out
    }

    fn set_inner_html(&mut self, id: NodeId, html: &str) {
        let raw_text = self
            .element(id)
            .is_some_and(|element| tokenizer::is_raw_text_element(&element.name));

        let Some(node) = self.nodes.get_mut(id.0) else {
            return;
        };
        node.children.clear();

        if raw_text {
            if !html.is_empty() {
                self.add_child(id, NodeData::Text(html.to_string()));
            }
        } else {
            self.append_fragment(id, html);
        }
    }

    fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_node(self.root(), &mut out);
        out
    }
}
