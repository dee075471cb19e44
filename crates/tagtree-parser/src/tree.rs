//! Arena-backed node tree.
//!
//! Every node lives in a single `Vec` owned by [`Tree`] and refers to its
//! parent and children by [`NodeId`]. The root is always at index 0.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use serde::Serialize;

/// Tag of the synthetic root node.
pub const ROOT_TAG: &str = "root";

/// Tag sentinel for text nodes.
pub const TEXT_TAG: &str = "TEXT";

/// Attribute name to value.
pub type Attrs = BTreeMap<String, String>;

/// Index of a node in its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// An element, a text run, or the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub tag: String,
    pub attrs: Attrs,
    pub children: Vec<NodeId>,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Back-reference for walking upwards. Ownership lives in [`Tree`].
    pub parent: Option<NodeId>,
}

impl Node {
    /// A fresh root: no parent, no children, no attributes, depth 0.
    pub fn root() -> Self {
        Self {
            tag: ROOT_TAG.to_string(),
            attrs: Attrs::new(),
            children: Vec::new(),
            depth: 0,
            content: None,
            parent: None,
        }
    }

    pub fn element(tag: impl Into<String>, attrs: Attrs) -> Self {
        Self {
            tag: tag.into(),
            attrs,
            children: Vec::new(),
            depth: 0,
            content: None,
            parent: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            tag: TEXT_TAG.to_string(),
            attrs: Attrs::new(),
            children: Vec::new(),
            depth: 0,
            content: Some(content.into()),
            parent: None,
        }
    }

    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG && self.content.is_some()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// Owns every node. Built once by the parser; callers may mutate it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// A tree holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::root()],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Mutable access for callers editing a finished tree.
    /// Structural fields (`parent`, `children`, `depth`) are the caller's to keep consistent.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a tree made by [`Tree::new`].
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Allocate `node` as the last child of `parent`.
    ///
    /// Sets the new node's `parent` and `depth` (one below `parent`).
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not in this tree.
    pub fn append_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.depth = self[parent].depth + 1;
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Pre-order walk below `from` (excluding `from` itself).
    pub fn descendants(&self, from: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(from).to_vec();
        stack.reverse();
        Descendants { tree: self, stack }
    }

    /// First element below the root with the given tag, in document order.
    pub fn find_first(&self, tag: &str) -> Option<NodeId> {
        self.descendants(NodeId::ROOT)
            .find(|&id| self[id].tag == tag && !self[id].is_text())
    }

    /// Concatenated text of every text node below `id`, separated by spaces.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(content) = self.get(id).and_then(|n| n.content.as_deref()) {
            return content.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self[d].content.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Indented tag outline of every node below the root, one per line.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for id in self.descendants(NodeId::ROOT) {
            let node = &self[id];
            out.push_str(&"  ".repeat(node.depth));
            match &node.content {
                Some(content) => out.push_str(&format!("{} {content:?}", node.tag)),
                None => out.push_str(&node.tag),
            }
            out.push('\n');
        }
        out
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.outline())
    }
}

/// Iterator returned by [`Tree::descendants`].
pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
