//! Shared `<defs>` entries (gradients, filters, markers).

use super::tree::{NodeId, SvgTree};
use std::collections::HashMap;

/// Definitions shared by every object of one board.
///
/// Each def is created on first use, appended to the board's `<defs>` node and
/// kept for the board's lifetime. Ids are `<prefix>-<key>`, so boards with
/// different prefixes can live in the same document.
pub struct DefsPool {
    node: NodeId,
    prefix: String,
    defined: HashMap<String, String>,
}

impl DefsPool {
    pub fn new(node: NodeId, prefix: impl Into<String>) -> Self {
        Self {
            node,
            prefix: prefix.into(),
            defined: HashMap::new(),
        }
    }

    /// The `<defs>` node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Id of the def registered under `key`, building it on first use.
    pub fn define<F>(&mut self, tree: &mut SvgTree, key: &str, build: F) -> String
    where
        F: FnOnce(&mut SvgTree) -> NodeId,
    {
        if let Some(id) = self.defined.get(key) {
            return id.clone();
        }
        let id = self.id_for(key);
        let node = build(tree);
        tree.set_attr(node, "id", &id);
        tree.append(self.node, node);
        self.defined.insert(key.to_string(), id.clone());
        log::trace!("defined shared svg def {}", id);
        id
    }

    pub fn contains(&self, key: &str) -> bool {
        self.defined.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.defined.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defined.is_empty()
    }

    /// Id a def registered under `key` gets (or has).
    pub fn id_for(&self, key: &str) -> String {
        format!("{}-{}", self.prefix, key)
    }
}

/// `url(#id)` reference to a def.
pub fn url(id: &str) -> String {
    format!("url(#{})", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_once() {
        let mut tree = SvgTree::new("svg");
        let defs = tree.create("defs");
        tree.append(tree.root(), defs);
        let mut pool = DefsPool::new(defs, "board1");

        let mut builds = 0;
        let first = pool.define(&mut tree, "glass-black", |tree| {
            builds += 1;
            tree.create("radialGradient")
        });
        let second = pool.define(&mut tree, "glass-black", |tree| {
            builds += 1;
            tree.create("radialGradient")
        });

        assert_eq!(first, "board1-glass-black");
        assert_eq!(first, second);
        assert_eq!(builds, 1);
        assert_eq!(tree.children(defs).len(), 1);
        assert_eq!(tree.attr(tree.children(defs)[0], "id"), Some("board1-glass-black"));
        assert_eq!(url(&first), "url(#board1-glass-black)");
    }
}
