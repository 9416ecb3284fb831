//! Retained-mode vector board.

use super::defs::{DefsPool, url};
use super::elements::{ObjectElements, SvgContext, SvgDrawHandler, SvgLayer, SvgObject};
use super::handlers::default_svg_handlers;
use super::tree::{NodeId, SvgTree};
use crate::board::Board;
use goban_core::board::{BoardBase, BoardResult};
use goban_core::config::BoardConfig;
use goban_core::geometry::{Viewport, column_label, row_label, star_points};
use goban_core::objects::ObjectId;
use goban_core::registry::HandlerRegistry;
use kurbo::{BezPath, Size};
use std::collections::BTreeMap;
use std::rc::Rc;
use svg::Document;
use svg::node::Node as _;
use uuid::Uuid;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

struct TrackedElements {
    handler: Rc<dyn SvgDrawHandler>,
    elements: ObjectElements,
}

/// Board rendered into a retained SVG element tree.
///
/// Every object owns a small set of nodes that are created once, mutated in
/// place on update and freed on removal; only [`Board::redraw`] rebuilds them.
pub struct SvgBoard {
    base: BoardBase<dyn SvgDrawHandler>,
    tree: SvgTree,
    defs: DefsPool,
    grid_mask: NodeId,
    grid_mask_base: Option<NodeId>,
    grid: Option<NodeId>,
    coordinates: Option<NodeId>,
    layers: BTreeMap<SvgLayer, NodeId>,
    elements: Vec<Option<TrackedElements>>,
}

impl SvgBoard {
    /// Board drawing the built-in object kinds.
    pub fn new(config: BoardConfig) -> BoardResult<Self> {
        Self::with_handlers(config, default_svg_handlers())
    }

    pub fn with_handlers(
        config: BoardConfig,
        handlers: HandlerRegistry<dyn SvgDrawHandler>,
    ) -> BoardResult<Self> {
        let base = BoardBase::new(config, handlers)?;
        let uuid = Uuid::new_v4().simple().to_string();
        let prefix = format!("goban-{}", &uuid[..8]);

        let mut tree = SvgTree::new("svg");
        let root = tree.root();
        tree.set_attr(root, "xmlns", SVG_NAMESPACE);
        let defs_node = tree.create("defs");
        tree.append(root, defs_node);
        let grid_mask = tree.element("mask", [("id", format!("{}-grid-mask", prefix))]);
        tree.append(root, grid_mask);

        let mut board = Self {
            base,
            tree,
            defs: DefsPool::new(defs_node, prefix),
            grid_mask,
            grid_mask_base: None,
            grid: None,
            coordinates: None,
            layers: BTreeMap::new(),
            elements: Vec::new(),
        };
        board.apply_view_box();
        board.resize();
        board.redraw();
        log::debug!(
            "created {}x{} svg board {}",
            board.base.size(),
            board.base.size(),
            board.defs.prefix()
        );
        Ok(board)
    }

    pub fn tree(&self) -> &SvgTree {
        &self.tree
    }

    pub fn defs(&self) -> &DefsPool {
        &self.defs
    }

    /// Prefix of every id this board generates.
    pub fn id_prefix(&self) -> &str {
        self.defs.prefix()
    }

    /// Nodes owned by an object.
    pub fn elements(&self, id: ObjectId) -> Option<&ObjectElements> {
        if !self.base.contains(id) {
            return None;
        }
        self.elements
            .get(id.index())
            .and_then(Option::as_ref)
            .map(|tracked| &tracked.elements)
    }

    /// Number of objects with live element groups.
    pub fn tracked_count(&self) -> usize {
        self.elements.iter().flatten().count()
    }

    /// Container node of a layer, if it exists.
    pub fn layer(&self, layer: SvgLayer) -> Option<NodeId> {
        match layer {
            SvgLayer::GridMask => Some(self.grid_mask),
            _ => self.layers.get(&layer).copied(),
        }
    }

    pub fn grid(&self) -> Option<NodeId> {
        self.grid
    }

    pub fn coordinates_group(&self) -> Option<NodeId> {
        self.coordinates
    }

    /// Deterministic markup of the whole board, for comparing snapshots.
    /// [`Self::to_svg_string`] is the export path.
    pub fn markup(&self) -> String {
        self.tree.markup(self.tree.root())
    }

    /// Export the board as an `svg` crate document.
    pub fn to_document(&self) -> Document {
        let root = self.tree.root();
        let mut document = Document::new();
        for (name, value) in self.tree.attrs(root) {
            document.assign(name, value);
        }
        for &child in self.tree.children(root) {
            if let Some(element) = self.tree.export(child) {
                document.append(element);
            }
        }
        document
    }

    pub fn to_svg_string(&self) -> String {
        self.to_document().to_string()
    }

    /// Size of the element hosting the board, used when no explicit
    /// width or height is configured.
    pub fn set_container_size(&mut self, size: Option<Size>) {
        self.base.set_container_size(size);
        self.resize();
    }

    fn apply_view_box(&mut self) {
        let root = self.tree.root();
        self.tree.set_attr(root, "viewBox", self.base.frame().view_box());
    }

    fn apply_root_style(&mut self) {
        let theme = &self.base.config().theme;
        let mut style = format!(
            "display:block;cursor:default;background-color:{}",
            theme.background_color.to_css()
        );
        if let Some(image) = &theme.background_image {
            style.push_str(&format!(";background-image:url('{}');background-size:cover", image));
        }
        let root = self.tree.root();
        self.tree.set_attr(root, "style", style);
    }

    fn draw_grid(&mut self) {
        let size = self.base.size();
        let n = size as f64;
        let last = n - 1.0;
        let theme = &self.base.config().theme.grid;

        let mask_base = self.tree.element(
            "rect",
            [("x", -0.5), ("y", -0.5), ("width", n), ("height", n)],
        );
        self.tree.set_attr(mask_base, "fill", "white");
        match self.grid_mask_base.replace(mask_base) {
            Some(old) => self.tree.replace(old, mask_base),
            None => self.tree.insert_at(self.grid_mask, 0, mask_base),
        }

        let grid = self.tree.create("g");
        self.tree.set_attr(grid, "mask", url(&self.defs.id_for("grid-mask")));

        // All lines in one path.
        let mut lines = BezPath::new();
        for i in 0..size {
            let i = i as f64;
            lines.move_to((0.0, i));
            lines.line_to((last, i));
            lines.move_to((i, 0.0));
            lines.line_to((i, last));
        }
        let path = self.tree.element("path", [("fill", "none")]);
        self.tree.set_attr(path, "d", lines.to_svg());
        self.tree.set_attr(path, "stroke", theme.line_color.to_css());
        self.tree.set_attr(path, "stroke-width", theme.line_width);
        self.tree.set_attr(path, "stroke-linecap", "square");
        self.tree.append(grid, path);

        for point in star_points(size) {
            let star = self.tree.element("circle", [("cx", point.x), ("cy", point.y)]);
            self.tree.set_attr(star, "r", theme.star_size);
            self.tree.set_attr(star, "fill", theme.star_color.to_css());
            self.tree.append(grid, star);
        }

        match self.grid.replace(grid) {
            Some(old) => self.tree.replace(old, grid),
            None => {
                let root = self.tree.root();
                self.tree.append(root, grid);
            }
        }
    }

    fn draw_coordinates(&mut self) {
        let size = self.base.size();
        let n = size as f64;
        let config = self.base.config();
        let theme = &config.theme.coordinates;
        let offset = 0.5 + theme.font_size / 2.0;

        let group = self.tree.element(
            "g",
            [("text-anchor", "middle"), ("dominant-baseline", "central")],
        );
        self.tree.set_attr(group, "fill", theme.color.to_css());
        self.tree.set_attr(group, "font-size", theme.font_size);
        self.tree.set_attr(group, "font-family", &theme.font_family);
        self.tree.set_attr(group, "opacity", if config.coordinates { 1 } else { 0 });

        let mut labels = Vec::with_capacity(size as usize * 4);
        for x in 0..size {
            let text = column_label(&theme.labels_x, x);
            labels.push((text.clone(), x as f64, -offset));
            labels.push((text, x as f64, n - 1.0 + offset));
        }
        for y in 0..size {
            let text = row_label(size, y);
            labels.push((text.clone(), -offset, y as f64));
            labels.push((text, n - 1.0 + offset, y as f64));
        }
        for (text, x, y) in labels {
            let node = self.tree.element("text", [("x", x), ("y", y)]);
            self.tree.set_text(node, text);
            self.tree.append(group, node);
        }

        match self.coordinates.replace(group) {
            Some(old) => self.tree.replace(old, group),
            None => {
                let root = self.tree.root();
                self.tree.append(root, group);
            }
        }
    }

    fn draw_objects(&mut self) {
        for tracked in self.elements.drain(..).flatten() {
            for (_, node) in tracked.elements.iter() {
                self.tree.remove(node);
            }
        }
        for (_, container) in std::mem::take(&mut self.layers) {
            self.tree.remove(container);
        }
        self.layer_container(SvgLayer::Objects);

        let ids = self.base.objects().ids().to_vec();
        for id in ids {
            let Some(object) = self.base.object(id) else {
                continue;
            };
            match self.base.handler_for(object) {
                Ok(handler) => self.attach(id, handler),
                Err(err) => log::warn!("skipping object {:?} in redraw: {}", id, err),
            }
        }
    }

    fn layer_container(&mut self, layer: SvgLayer) -> NodeId {
        if layer == SvgLayer::GridMask {
            return self.grid_mask;
        }
        if let Some(&node) = self.layers.get(&layer) {
            return node;
        }
        let node = self.tree.create("g");
        let root = self.tree.root();
        match (layer, self.layers.get(&SvgLayer::Objects)) {
            (SvgLayer::Shadows, Some(&objects)) => self.tree.insert_before(root, node, objects),
            _ => self.tree.append(root, node),
        }
        self.layers.insert(layer, node);
        node
    }

    fn create_elements(&mut self, handler: &Rc<dyn SvgDrawHandler>) -> ObjectElements {
        let mut cx = SvgContext::new(&mut self.tree, &mut self.defs, self.base.config());
        handler.create_element(&mut cx)
    }

    fn sync(&mut self, id: ObjectId, handler: Rc<dyn SvgDrawHandler>, elements: ObjectElements) {
        if let Some(object) = self.base.object(id) {
            handler.update_element(&mut self.tree, &elements, object, self.base.config());
        }
        let index = id.index();
        if self.elements.len() <= index {
            self.elements.resize_with(index + 1, || None);
        }
        self.elements[index] = Some(TrackedElements { handler, elements });
    }

    /// Create an object's nodes and attach them on top of their layers.
    fn attach(&mut self, id: ObjectId, handler: Rc<dyn SvgDrawHandler>) {
        let elements = self.create_elements(&handler);
        for (layer, node) in elements.iter() {
            let container = self.layer_container(layer);
            self.tree.append(container, node);
        }
        self.sync(id, handler, elements);
    }

    /// Recreate an object's nodes after its handler changed, keeping its place
    /// in every layer it already occupied.
    fn rebuild(&mut self, id: ObjectId, handler: Rc<dyn SvgDrawHandler>) {
        let old = self
            .elements
            .get_mut(id.index())
            .and_then(Option::take)
            .map(|tracked| tracked.elements)
            .unwrap_or_default();
        let elements = self.create_elements(&handler);
        for (layer, node) in elements.iter() {
            match old.get(layer) {
                Some(previous) => self.tree.replace(previous, node),
                None => {
                    let container = self.layer_container(layer);
                    self.tree.append(container, node);
                }
            }
        }
        for (layer, node) in old.iter() {
            if elements.get(layer).is_none() {
                self.tree.remove(node);
            }
        }
        log::debug!("rebuilt elements of object {:?} after handler change", id);
        self.sync(id, handler, elements);
    }

    fn release(&mut self, id: ObjectId) {
        let Some(tracked) = self.elements.get_mut(id.index()).and_then(Option::take) else {
            return;
        };
        for (_, node) in tracked.elements.iter() {
            self.tree.remove(node);
        }
    }
}

impl Board for SvgBoard {
    type Handler = dyn SvgDrawHandler;

    fn base(&self) -> &BoardBase<dyn SvgDrawHandler> {
        &self.base
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SvgObject> {
        self.base.object_mut(id)
    }

    fn add_object(&mut self, object: SvgObject) -> BoardResult<ObjectId> {
        let (id, handler) = self.base.insert(object)?;
        self.attach(id, handler);
        Ok(id)
    }

    fn remove_object(&mut self, id: ObjectId) -> Option<SvgObject> {
        let object = self.base.remove(id)?;
        self.release(id);
        Some(object)
    }

    fn update_object(&mut self, id: ObjectId) -> BoardResult<bool> {
        let Some(handler) = self.base.revalidate(id)? else {
            return Ok(false);
        };
        let tracked = self.elements.get(id.index()).and_then(Option::as_ref);
        match tracked {
            Some(tracked) if std::ptr::addr_eq(Rc::as_ptr(&tracked.handler), Rc::as_ptr(&handler)) => {
                if let Some(object) = self.base.object(id) {
                    tracked
                        .handler
                        .update_element(&mut self.tree, &tracked.elements, object, self.base.config());
                }
            }
            Some(_) => self.rebuild(id, handler),
            None => self.attach(id, handler),
        }
        Ok(true)
    }

    fn set_size(&mut self, size: u32) -> BoardResult<()> {
        self.base.set_size(size)?;
        self.draw_grid();
        self.draw_coordinates();
        self.apply_view_box();
        self.resize();
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.base.set_viewport(viewport);
        self.apply_view_box();
        self.resize();
    }

    fn set_coordinates(&mut self, coordinates: bool) {
        self.base.set_coordinates(coordinates);
        if let Some(group) = self.coordinates {
            self.tree.set_attr(group, "opacity", if coordinates { 1 } else { 0 });
        }
        self.apply_view_box();
        self.resize();
    }

    fn resize(&mut self) -> Size {
        let size = self.base.resize();
        let config = self.base.config();
        let (width, height) = match (config.width, config.height) {
            (Some(width), Some(height)) => (format!("{}px", width), format!("{}px", height)),
            (Some(width), None) => (format!("{}px", width), "auto".to_string()),
            (None, Some(height)) => ("auto".to_string(), format!("{}px", height)),
            (None, None) => ("100%".to_string(), "auto".to_string()),
        };
        let root = self.tree.root();
        self.tree.set_attr(root, "width", width);
        self.tree.set_attr(root, "height", height);
        size
    }

    fn redraw(&mut self) {
        self.apply_root_style();
        self.draw_grid();
        self.draw_coordinates();
        self.draw_objects();
        log::debug!("redrew svg board with {} objects", self.base.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goban_core::board::BoardError;
    use goban_core::geometry::GridPoint;
    use goban_core::objects::{BoardObject, Color, ObjectKind, Placement};

    fn board() -> SvgBoard {
        SvgBoard::new(BoardConfig::default()).unwrap()
    }

    fn objects_layer(board: &SvgBoard) -> Vec<NodeId> {
        let layer = board.layer(SvgLayer::Objects).unwrap();
        board.tree().children(layer).to_vec()
    }

    #[test]
    fn test_redraw_is_idempotent() {
        let mut board = board();
        board.add_object(BoardObject::stone(Color::Black, 3, 3)).unwrap();
        board.add_object(BoardObject::stone(Color::White, 15, 15)).unwrap();
        board.add_object(BoardObject::label(10, 10, "A")).unwrap();
        board
            .add_object(BoardObject::line(ObjectKind::Arrow, (0, 0), (5, 2)).unwrap())
            .unwrap();

        board.redraw();
        let first = board.markup();
        board.redraw();
        assert_eq!(first, board.markup());
    }

    #[test]
    fn test_tracked_groups_follow_objects() {
        let mut board = board();
        let ids: Vec<ObjectId> = (0..5)
            .map(|x| board.add_object(BoardObject::stone(Color::Black, x, 0)).unwrap())
            .collect();
        let removed: Vec<NodeId> = [ids[1], ids[3]]
            .iter()
            .flat_map(|&id| board.elements(id).unwrap().iter().map(|(_, node)| node).collect::<Vec<_>>())
            .collect();

        board.remove_objects(&[ids[1], ids[3]]);
        assert_eq!(board.tracked_count(), board.base().len());
        assert_eq!(board.tracked_count(), 3);
        for node in removed {
            assert!(!board.tree().is_attached(node));
        }
        assert_eq!(objects_layer(&board).len(), 3);
    }

    #[test]
    fn test_paint_order() {
        let mut board = board();
        let a = board.add_object(BoardObject::stone(Color::Black, 3, 3)).unwrap();
        let b = board.add_object(BoardObject::stone(Color::White, 3, 3)).unwrap();
        let layer = objects_layer(&board);
        let pos = |id| {
            let node = board.elements(id).unwrap().main().unwrap();
            layer.iter().position(|&n| n == node).unwrap()
        };
        assert!(pos(a) < pos(b));
    }

    #[test]
    fn test_add_remove_roundtrip() {
        let mut board = board();
        // Shared defs are created on first use and kept.
        board.add_object(BoardObject::stone(Color::Black, 0, 0)).unwrap();
        let nodes = board.tree().len();
        let markup = board.markup();

        let id = board.add_object(BoardObject::stone(Color::Black, 1, 1)).unwrap();
        assert!(board.tree().len() > nodes);
        assert!(board.remove_object(id).is_some());
        assert_eq!(board.tree().len(), nodes);
        assert_eq!(board.markup(), markup);
        assert!(board.remove_object(id).is_none());
    }

    #[test]
    fn test_shared_defs() {
        let mut board = board();
        board.add_object(BoardObject::stone(Color::Black, 0, 0)).unwrap();
        board.add_object(BoardObject::stone(Color::Black, 1, 0)).unwrap();
        assert_eq!(board.defs().len(), 2);
        board.add_object(BoardObject::stone(Color::White, 2, 0)).unwrap();
        assert_eq!(board.defs().len(), 3);

        let defs = board.defs().node();
        let prefix = format!("{}-", board.id_prefix());
        for &def in board.tree().children(defs) {
            assert!(board.tree().attr(def, "id").unwrap().starts_with(&prefix));
        }
    }

    #[test]
    fn test_view_box_follows_frame() {
        let mut board = SvgBoard::new(BoardConfig::default().with_coordinates(true)).unwrap();
        let root = board.tree().root();
        assert_eq!(board.tree().attr(root, "viewBox"), Some("-1.25 -1.25 20.5 20.5"));

        let id = board.add_object(BoardObject::stone(Color::Black, 5, 5)).unwrap();
        let stone = board.elements(id).unwrap().main().unwrap();
        let before = board.tree().markup(stone);

        board.set_viewport(Viewport::new(1, 0, 0, 0));
        assert_eq!(board.tree().attr(root, "viewBox"), Some("-1.25 0.25 20.5 19"));
        assert_eq!(board.elements(id).unwrap().main(), Some(stone));
        assert_eq!(board.tree().markup(stone), before);
    }

    #[test]
    fn test_resize_sets_dimensions() {
        let mut config = BoardConfig::default();
        config.width = Some(300.0);
        let mut board = SvgBoard::new(config).unwrap();
        let root = board.tree().root();
        assert_eq!(board.tree().attr(root, "width"), Some("300px"));
        assert_eq!(board.tree().attr(root, "height"), Some("auto"));
        assert_eq!(board.base().surface_size(), Size::new(300.0, 300.0));

        let board = self::board();
        let root = board.tree().root();
        assert_eq!(board.tree().attr(root, "width"), Some("100%"));
        assert_eq!(board.tree().attr(root, "height"), Some("auto"));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let mut board = board();
        let err = board
            .add_object(BoardObject::field(ObjectKind::from("SMILE"), 1, 1))
            .unwrap_err();
        assert_eq!(err.to_string(), "no handler registered for type SMILE");
        assert_eq!(board.tracked_count(), 0);
        assert!(board.base().is_empty());
    }

    #[test]
    fn test_ghost_stone_moves_in_place() {
        let mut board = board();
        let ghost = board
            .add_object(BoardObject::stone(Color::White, 3, 3).with_opacity(0.35))
            .unwrap();
        let node = board.elements(ghost).unwrap().main().unwrap();
        assert_eq!(board.tree().attr(node, "opacity"), Some("0.35"));

        assert!(board.edit_object(ghost, |o| o.set_position(4, 5)).unwrap());
        assert_eq!(board.elements(ghost).unwrap().main(), Some(node));
        assert_eq!(board.tree().attr(node, "transform"), Some("translate(4,5)"));

        board.remove_object(ghost);
        assert!(!board.tree().contains(node));
        assert!(!board.update_object(ghost).unwrap());
    }

    #[test]
    fn test_handler_change_keeps_place() {
        let mut board = board();
        let a = board.add_object(BoardObject::stone(Color::Black, 3, 3)).unwrap();
        let b = board.add_object(BoardObject::stone(Color::Black, 4, 4)).unwrap();
        let shadow = board.elements(a).unwrap().get(SvgLayer::Shadows).unwrap();

        board
            .edit_object(a, |o| o.kind = ObjectKind::Triangle.into())
            .unwrap();
        let elements = board.elements(a).unwrap().clone();
        assert!(elements.get(SvgLayer::Shadows).is_none());
        assert!(elements.get(SvgLayer::GridMask).is_some());
        assert!(!board.tree().contains(shadow));

        let layer = objects_layer(&board);
        let main_b = board.elements(b).unwrap().main().unwrap();
        assert_eq!(layer, vec![elements.main().unwrap(), main_b]);
    }

    #[test]
    fn test_markers_mask_the_grid() {
        let mut board = board();
        let mask = board.layer(SvgLayer::GridMask).unwrap();
        let base_children = board.tree().children(mask).len();
        let label = board.add_object(BoardObject::label(2, 2, "B")).unwrap();
        assert_eq!(board.tree().children(mask).len(), base_children + 1);
        board.remove_object(label);
        assert_eq!(board.tree().children(mask).len(), base_children);
    }

    #[test]
    fn test_coordinates_toggle_keeps_group() {
        let mut board = board();
        let group = board.coordinates_group().unwrap();
        assert_eq!(board.tree().attr(group, "opacity"), Some("0"));
        board.set_coordinates(true);
        assert_eq!(board.coordinates_group(), Some(group));
        assert_eq!(board.tree().attr(group, "opacity"), Some("1"));
    }

    #[test]
    fn test_rejected_edit_is_rolled_back() {
        let mut board = board();
        let stone = board.add_object(BoardObject::stone(Color::Black, 3, 3)).unwrap();
        let arrow = board
            .add_object(BoardObject::line(ObjectKind::Arrow, (0, 0), (4, 4)).unwrap())
            .unwrap();

        let result = board.edit_object(stone, |o| o.kind = ObjectKind::from("SMILE").into());
        assert!(matches!(result, Err(BoardError::NoHandler(_))));
        let result = board.edit_object(arrow, |o| {
            o.placement = Placement::Line {
                start: GridPoint::new(2, 2),
                end: GridPoint::new(2, 2),
            }
        });
        assert!(matches!(result, Err(BoardError::DegenerateLine(_))));
        assert!(board.edit_object(stone, |o| o.set_position(30, 3)).is_err());

        assert_eq!(board.object(stone).unwrap().kind.kind(), Some(&ObjectKind::Black));
        assert_eq!(board.object(stone).unwrap().position(), Some(GridPoint::new(3, 3)));
        assert_eq!(board.object(arrow).unwrap().segment().map(|(_, end)| end), Some(GridPoint::new(4, 4)));

        board.redraw();
        assert_eq!(board.tracked_count(), board.base().len());
        assert!(!board.markup().contains("NaN"));
    }

    #[test]
    fn test_set_size_keeps_objects() {
        let mut board = board();
        let id = board.add_object(BoardObject::stone(Color::Black, 2, 2)).unwrap();
        let stone = board.elements(id).unwrap().main().unwrap();
        board.set_size(9).unwrap();
        assert!(board.tree().is_attached(stone));
        let root = board.tree().root();
        assert_eq!(board.tree().attr(root, "viewBox"), Some("-0.75 -0.75 9.5 9.5"));
        assert!(board.set_size(0).is_err());
    }

    #[test]
    fn test_layer_order() {
        let mut board = board();
        board.add_object(BoardObject::stone(Color::Black, 0, 0)).unwrap();
        let root = board.tree().root();
        let children = board.tree().children(root).to_vec();
        let index = |node| children.iter().position(|&n| n == node).unwrap();
        let shadows = board.layer(SvgLayer::Shadows).unwrap();
        let objects = board.layer(SvgLayer::Objects).unwrap();
        assert!(index(board.grid().unwrap()) < index(shadows));
        assert!(index(shadows) < index(objects));
        assert!(board.to_svg_string().contains("viewBox"));
    }
}
