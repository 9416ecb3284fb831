//! Vector draw-handler contract.

use super::defs::DefsPool;
use super::tree::{NodeId, SvgTree};
use goban_core::config::BoardConfig;
use goban_core::objects::BoardObject;
use std::collections::BTreeMap;

/// Containers object elements are attached to, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SvgLayer {
    /// The grid mask: black shapes here erase grid lines.
    GridMask,
    /// Stone shadows, below every object.
    Shadows,
    /// Stones and markers.
    Objects,
}

/// The nodes one object owns, by layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectElements {
    nodes: BTreeMap<SvgLayer, NodeId>,
}

impl ObjectElements {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single node in the objects layer.
    pub fn single(node: NodeId) -> Self {
        Self::new().with(SvgLayer::Objects, node)
    }

    pub fn with(mut self, layer: SvgLayer, node: NodeId) -> Self {
        self.nodes.insert(layer, node);
        self
    }

    pub fn get(&self, layer: SvgLayer) -> Option<NodeId> {
        self.nodes.get(&layer).copied()
    }

    /// The objects-layer node.
    pub fn main(&self) -> Option<NodeId> {
        self.get(SvgLayer::Objects)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SvgLayer, NodeId)> + '_ {
        self.nodes.iter().map(|(&layer, &node)| (layer, node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// What a handler gets when it creates elements.
pub struct SvgContext<'a> {
    pub tree: &'a mut SvgTree,
    pub config: &'a BoardConfig,
    defs: &'a mut DefsPool,
}

impl<'a> SvgContext<'a> {
    pub fn new(tree: &'a mut SvgTree, defs: &'a mut DefsPool, config: &'a BoardConfig) -> Self {
        Self { tree, config, defs }
    }

    /// Register a shared def under `key` (once per board) and return its id.
    pub fn define<F>(&mut self, key: &str, build: F) -> String
    where
        F: FnOnce(&mut SvgTree) -> NodeId,
    {
        self.defs.define(self.tree, key, build)
    }
}

/// Vector drawing strategy of an object type.
///
/// `create_element` builds detached nodes; the board attaches them to their
/// layer containers and immediately calls `update_element`. Later updates
/// mutate the same nodes and never recreate them.
pub trait SvgDrawHandler {
    fn create_element(&self, cx: &mut SvgContext<'_>) -> ObjectElements;

    fn update_element(
        &self,
        tree: &mut SvgTree,
        elements: &ObjectElements,
        object: &SvgObject,
        config: &BoardConfig,
    );
}

/// A board object drawn by the vector backend.
pub type SvgObject = BoardObject<dyn SvgDrawHandler>;
