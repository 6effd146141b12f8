//! Arena-owned document tree.
//!
//! All nodes of a document live in a single `Vec` owned by [`DocumentTree`]
//! and refer to each other through [`NodeId`] indices. Moving a node from one
//! parent to another is an index update, so structural passes never hold
//! references into the tree while mutating it.
//!
//! # Examples
//!
//! ```
//! use sidedoc_markdown::DocumentTree;
//!
//! let mut tree = DocumentTree::new();
//! let div = tree.create_element("div", &[("class", "content")]);
//! let text = tree.create_text("a < b");
//! tree.append(div, text);
//! tree.append(tree.root(), div);
//!
//! assert_eq!(tree.serialize(), r#"<div class="content">a &lt; b</div>"#);
//! ```
use std::fmt::Write;

/// Index of a node inside a [`DocumentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Payload of a tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
  /// The document root. Serializes to its children only.
  Root,
  /// An HTML element with ordered attributes.
  Element {
    tag:   String,
    attrs: Vec<(String, String)>,
  },
  /// Plain text, escaped on serialization.
  Text(String),
  /// Pre-rendered markup, emitted verbatim.
  Html(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
  kind:     NodeKind,
  parent:   Option<NodeId>,
  children: Vec<NodeId>,
}

/// Rooted, ordered tree of document nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTree {
  nodes: Vec<Node>,
}

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

impl DocumentTree {
  /// Create a tree holding only the root node.
  #[must_use]
  pub fn new() -> Self {
    Self {
      nodes: vec![Node {
        kind:     NodeKind::Root,
        parent:   None,
        children: Vec::new(),
      }],
    }
  }

  /// The root node.
  #[must_use]
  pub const fn root(&self) -> NodeId {
    NodeId(0)
  }

  fn push(&mut self, kind: NodeKind) -> NodeId {
    let id = NodeId(self.nodes.len());
    self.nodes.push(Node {
      kind,
      parent: None,
      children: Vec::new(),
    });
    id
  }

  /// Create a detached element node.
  pub fn create_element(&mut self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    self.push(NodeKind::Element {
      tag:   tag.to_string(),
      attrs: attrs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect(),
    })
  }

  /// Create a detached text node.
  pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
    self.push(NodeKind::Text(text.into()))
  }

  /// Create a detached node of raw, already rendered markup.
  pub fn create_html(&mut self, html: impl Into<String>) -> NodeId {
    self.push(NodeKind::Html(html.into()))
  }

  #[must_use]
  pub fn children(&self, id: NodeId) -> &[NodeId] {
    &self.nodes[id.0].children
  }

  /// Tag name of an element node, `None` for any other kind.
  #[must_use]
  pub fn tag(&self, id: NodeId) -> Option<&str> {
    match &self.nodes[id.0].kind {
      NodeKind::Element { tag, .. } => Some(tag),
      _ => None,
    }
  }

  /// Value of an attribute on an element node.
  #[must_use]
  pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
    match &self.nodes[id.0].kind {
      NodeKind::Element { attrs, .. } => {
        attrs
          .iter()
          .find(|(key, _)| key == name)
          .map(|(_, value)| value.as_str())
      },
      _ => None,
    }
  }

  /// Whether an element's `class` attribute contains `class`.
  #[must_use]
  pub fn has_class(&self, id: NodeId, class: &str) -> bool {
    self
      .attr(id, "class")
      .is_some_and(|value| value.split_whitespace().any(|c| c == class))
  }

  /// Remove a node from its parent. The node and its subtree stay in the
  /// arena and can be re-attached.
  pub fn detach(&mut self, id: NodeId) {
    if let Some(parent) = self.nodes[id.0].parent.take() {
      self.nodes[parent.0].children.retain(|child| *child != id);
    }
  }

  /// Append `child` as the last child of `parent`, detaching it first.
  pub fn append(&mut self, parent: NodeId, child: NodeId) {
    self.detach(child);
    self.nodes[child.0].parent = Some(parent);
    self.nodes[parent.0].children.push(child);
  }

  /// Serialize every node reachable from the root.
  #[must_use]
  pub fn serialize(&self) -> String {
    let mut out = String::new();
    self.serialize_node(self.root(), &mut out);
    out
  }

  /// Serialize a single subtree.
  pub fn serialize_node(&self, id: NodeId, out: &mut String) {
    let node = &self.nodes[id.0];
    match &node.kind {
      NodeKind::Root => {
        for child in &node.children {
          self.serialize_node(*child, out);
        }
      },
      NodeKind::Text(text) => out.push_str(&html_escape::encode_text(text)),
      NodeKind::Html(html) => out.push_str(html),
      NodeKind::Element { tag, attrs } => {
        out.push('<');
        out.push_str(tag);
        for (key, value) in attrs {
          // Writing to String is infallible
          let _ = write!(
            out,
            " {key}=\"{}\"",
            html_escape::encode_double_quoted_attribute(value)
          );
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&tag.as_str()) {
          return;
        }
        for child in &node.children {
          self.serialize_node(*child, out);
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
      },
    }
  }
}

impl Default for DocumentTree {
  fn default() -> Self {
    Self::new()
  }
}
