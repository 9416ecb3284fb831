//! Retained SVG element tree.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. The board keeps
//! handles to the nodes it owns and mutates them in place; the tree is
//! exported through the `svg` crate when a document is needed.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use svg::node::element::Element;
use svg::node::{Node as _, Text};

/// Handle of a node in an [`SvgTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena of SVG elements with a single root.
pub struct SvgTree {
    nodes: Vec<Option<Node>>,
    free: Vec<u32>,
    root: NodeId,
}

impl SvgTree {
    /// Create a tree whose root element is `root_tag`.
    pub fn new(root_tag: &str) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.create(root_tag);
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached element.
    pub fn create(&mut self, tag: &str) -> NodeId {
        let node = Node {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            text: None,
            parent: None,
            children: Vec::new(),
        };
        match self.free.pop() {
            Some(index) => {
                self.nodes[index as usize] = Some(node);
                NodeId(index)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() as u32 - 1)
            }
        }
    }

    /// Create a detached element with the given attributes.
    pub fn element<'a, V: fmt::Display + 'a>(
        &mut self,
        tag: &str,
        attrs: impl IntoIterator<Item = (&'a str, V)>,
    ) -> NodeId {
        let id = self.create(tag);
        for (name, value) in attrs {
            self.set_attr(id, name, value);
        }
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|node| node.tag.as_str())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)?.attrs.get(name).map(String::as_str)
    }

    /// Attributes of a node, sorted by name.
    pub fn attrs(&self, id: NodeId) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.node(id)
            .into_iter()
            .flat_map(|node| node.attrs.iter().map(|(name, value)| (name.as_str(), value.as_str())))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl fmt::Display) {
        if let Some(node) = self.node_mut(id) {
            node.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(node) = self.node_mut(id) {
            node.attrs.remove(name);
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id)?.text.as_deref()
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(node) = self.node_mut(id) {
            node.text = Some(text.into());
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    /// Append `child` as the last child of `parent`, moving it if attached.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let len = self.children(parent).len();
        self.insert_at(parent, len, child);
    }

    /// Insert `child` into `parent` right before `before`.
    ///
    /// Appends when `before` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, before: NodeId) {
        self.detach(child);
        let index = self
            .children(parent)
            .iter()
            .position(|&id| id == before)
            .unwrap_or_else(|| self.children(parent).len());
        self.insert_at(parent, index, child);
    }

    /// Insert `child` at position `index` among `parent`'s children.
    pub fn insert_at(&mut self, parent: NodeId, index: usize, child: NodeId) {
        if parent == child || !self.contains(child) || self.is_ancestor(child, parent) {
            return;
        }
        self.detach(child);
        let Some(node) = self.node_mut(parent) else {
            return;
        };
        let index = index.min(node.children.len());
        node.children.insert(index, child);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
    }

    /// Put `new` where `old` is and free `old` with its subtree.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        match self.parent(old) {
            Some(parent) => {
                let index = self.children(parent).iter().position(|&id| id == old).unwrap_or(0);
                self.insert_at(parent, index, new);
            }
            None => self.detach(new),
        }
        self.remove(old);
    }

    /// Unlink a node from its parent, keeping it alive.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|&child| child != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// Detach a node and free it together with all its descendants.
    ///
    /// The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root || !self.contains(id) {
            return;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(next.0 as usize).and_then(Option::take) {
                stack.extend(node.children);
                self.free.push(next.0);
            }
        }
    }

    /// Remove every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        for child in children {
            self.remove(child);
        }
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Whether `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(id) && self.is_ancestor(self.root, id)
    }

    /// Export a subtree as an `svg` crate element.
    pub fn export(&self, id: NodeId) -> Option<Element> {
        let node = self.node(id)?;
        let mut element = Element::new(node.tag.as_str());
        for (name, value) in &node.attrs {
            element.assign(name.as_str(), value.as_str());
        }
        if let Some(text) = &node.text {
            element.append(Text::new(text.as_str()));
        }
        for &child in &node.children {
            if let Some(child) = self.export(child) {
                element.append(child);
            }
        }
        Some(element)
    }

    /// Deterministic markup of a subtree (attributes sorted by name).
    ///
    /// Used to compare snapshots of the tree. The `svg` crate keeps element
    /// attributes in a hash map, so two exports of the same tree may list
    /// them in different orders; use [`Self::export`] for output.
    pub fn markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        let _ = write!(out, "<{}", node.tag);
        for (name, value) in &node.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        if node.text.is_none() && node.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(text) = &node.text {
            out.push_str(&escape(text));
        }
        for &child in &node.children {
            self.write_markup(child, out);
        }
        let _ = write!(out, "</{}>", node.tag);
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::as_mut)
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
