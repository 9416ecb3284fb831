//! Backend-independent board state.

use crate::config::{BoardConfig, ConfigError, validate_size};
use crate::geometry::{BoardFrame, DEFAULT_FIELD_PIXELS, GridPoint, Viewport};
use crate::objects::{BoardObject, ObjectCollection, ObjectId, ObjectKind};
use crate::registry::HandlerRegistry;
use kurbo::{Affine, Point, Size};
use std::rc::Rc;
use thiserror::Error;

/// Structural errors raised by board mutations.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("no handler registered for type {0}")]
    NoHandler(ObjectKind),
    #[error("line object starts and ends at the same point ({}, {})", .0.x, .0.y)]
    DegenerateLine(GridPoint),
    #[error("point ({}, {}) is outside the {size}x{size} grid", .point.x, .point.y)]
    OutOfBounds { point: GridPoint, size: u32 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// State shared by every backend: configuration, handler registry, the object
/// collection and the current frame.
///
/// Backends embed a `BoardBase` and add their own rendering on top; the base
/// never draws anything itself.
pub struct BoardBase<H: ?Sized> {
    config: BoardConfig,
    handlers: HandlerRegistry<H>,
    objects: ObjectCollection<H>,
    frame: BoardFrame,
    surface_size: Size,
    container_size: Option<Size>,
}

impl<H: ?Sized> BoardBase<H> {
    /// Create a board base from a resolved configuration.
    pub fn new(config: BoardConfig, handlers: HandlerRegistry<H>) -> BoardResult<Self> {
        config.validate()?;
        let frame = compute_frame(&config);
        let mut base = Self {
            config,
            handlers,
            objects: ObjectCollection::new(),
            frame,
            surface_size: Size::ZERO,
            container_size: None,
        };
        base.resize();
        Ok(base)
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn handlers(&self) -> &HandlerRegistry<H> {
        &self.handlers
    }

    pub fn objects(&self) -> &ObjectCollection<H> {
        &self.objects
    }

    pub fn frame(&self) -> &BoardFrame {
        &self.frame
    }

    pub fn size(&self) -> u32 {
        self.config.size
    }

    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    pub fn coordinates(&self) -> bool {
        self.config.coordinates
    }

    /// Surface size in pixels, as of the last [`Self::resize`].
    pub fn surface_size(&self) -> Size {
        self.surface_size
    }

    pub fn object(&self, id: ObjectId) -> Option<&BoardObject<H>> {
        self.objects.get(id)
    }

    /// Mutable access for external updates; call the backend's
    /// `update_object` afterwards to resynchronize the rendering.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut BoardObject<H>> {
        self.objects.get_mut(id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Resolve the drawing handler of an object.
    pub fn handler_for(&self, object: &BoardObject<H>) -> BoardResult<Rc<H>> {
        self.handlers.resolve(object)
    }

    /// Validate and append an object. Returns its handle and handler.
    ///
    /// Nothing is inserted when validation fails.
    pub fn insert(&mut self, object: BoardObject<H>) -> BoardResult<(ObjectId, Rc<H>)> {
        self.check(&object)?;
        let handler = self.handlers.resolve(&object)?;
        let id = self.objects.insert(object);
        Ok((id, handler))
    }

    /// Remove an object. Stale handles are a no-op.
    pub fn remove(&mut self, id: ObjectId) -> Option<BoardObject<H>> {
        let removed = self.objects.remove(id);
        if removed.is_none() {
            log::debug!("remove of object {:?} ignored: not on the board", id);
        }
        removed
    }

    /// Re-validate an object after external mutation.
    ///
    /// Returns `Ok(None)` when the handle is stale.
    pub fn revalidate(&self, id: ObjectId) -> BoardResult<Option<Rc<H>>> {
        let Some(object) = self.objects.get(id) else {
            log::debug!("update of object {:?} ignored: not on the board", id);
            return Ok(None);
        };
        self.check(object)?;
        self.handlers.resolve(object).map(Some)
    }

    /// Change the grid dimension and recompute the frame.
    pub fn set_size(&mut self, size: u32) -> BoardResult<()> {
        validate_size(size)?;
        self.config.size = size;
        self.update_frame();
        let outside = self.objects.iter().filter(|(_, object)| !object.fits(size)).count();
        if outside > 0 {
            log::debug!("{} objects lie outside the resized {}x{} grid", outside, size, size);
        }
        Ok(())
    }

    /// Replace the crop margins and recompute the frame.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.config.viewport = viewport.clamped(self.config.size);
        self.update_frame();
    }

    /// Toggle coordinate labels and recompute the frame.
    pub fn set_coordinates(&mut self, coordinates: bool) {
        self.config.coordinates = coordinates;
        self.update_frame();
    }

    /// Size of the element hosting the board, used when no explicit
    /// width or height is configured.
    pub fn set_container_size(&mut self, size: Option<Size>) {
        self.container_size = size;
        self.resize();
    }

    /// Recompute the surface pixel size from the configuration.
    pub fn resize(&mut self) -> Size {
        let aspect = self.frame.aspect_ratio();
        self.surface_size = match (self.config.width, self.config.height) {
            (Some(width), Some(height)) => Size::new(width, height),
            (Some(width), None) => Size::new(width, width / aspect),
            (None, Some(height)) => Size::new(height * aspect, height),
            (None, None) => match self.container_size {
                Some(container) => Size::new(container.width, container.width / aspect),
                None => Size::new(
                    self.frame.rect.width() * DEFAULT_FIELD_PIXELS,
                    self.frame.rect.height() * DEFAULT_FIELD_PIXELS,
                ),
            },
        };
        self.surface_size
    }

    /// Transform from grid units to surface pixels.
    pub fn grid_to_surface(&self) -> Affine {
        self.frame.grid_to_surface(self.surface_size)
    }

    /// Map a surface pixel position to the nearest visible intersection.
    pub fn pointer_to_grid(&self, point: Point) -> Option<GridPoint> {
        self.frame.pointer_to_grid(self.surface_size, point)
    }

    fn check(&self, object: &BoardObject<H>) -> BoardResult<()> {
        object.validate()?;
        let size = self.config.size;
        match object.points().into_iter().find(|point| point.x >= size || point.y >= size) {
            Some(point) => Err(BoardError::OutOfBounds { point, size }),
            None => Ok(()),
        }
    }

    fn update_frame(&mut self) {
        self.frame = compute_frame(&self.config);
        self.resize();
    }
}

fn compute_frame(config: &BoardConfig) -> BoardFrame {
    BoardFrame::compute(
        config.size,
        config.viewport,
        config.theme.margin_size,
        config.coordinates,
        config.theme.coordinates.font_size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BoardBase<&'static str> {
        let handlers = HandlerRegistry::new()
            .with(ObjectKind::Black, Rc::new("black"))
            .with(ObjectKind::Line, Rc::new("line"));
        BoardBase::new(BoardConfig::default(), handlers).unwrap()
    }

    #[test]
    fn test_insert_validates_before_mutating() {
        let mut base = base();
        let unknown = BoardObject::field(ObjectKind::Triangle, 0, 0);
        assert!(matches!(base.insert(unknown), Err(BoardError::NoHandler(ObjectKind::Triangle))));
        assert!(base.is_empty());

        let (id, handler) = base.insert(BoardObject::field(ObjectKind::Black, 3, 3)).unwrap();
        assert_eq!(*handler, "black");
        assert!(base.contains(id));
    }

    #[test]
    fn test_revalidate_catches_mutated_line() {
        let mut base = base();
        let line = BoardObject::line(ObjectKind::Line, (0, 0), (2, 2)).unwrap();
        let (id, _) = base.insert(line).unwrap();

        if let Some(object) = base.object_mut(id) {
            object.placement = crate::objects::Placement::Line {
                start: GridPoint::new(1, 1),
                end: GridPoint::new(1, 1),
            };
        }
        assert!(matches!(base.revalidate(id), Err(BoardError::DegenerateLine(_))));

        base.remove(id);
        assert!(matches!(base.revalidate(id), Ok(None)));
    }

    #[test]
    fn test_points_must_lie_on_the_grid() {
        let mut base = base();
        let outside = BoardObject::field(ObjectKind::Black, 19, 3);
        assert!(matches!(
            base.insert(outside),
            Err(BoardError::OutOfBounds { size: 19, .. })
        ));
        let line = BoardObject::line(ObjectKind::Line, (0, 0), (2, 40)).unwrap();
        assert!(base.insert(line).is_err());
        assert!(base.is_empty());

        let (id, _) = base.insert(BoardObject::field(ObjectKind::Black, 18, 18)).unwrap();
        if let Some(object) = base.object_mut(id) {
            object.set_position(18, 19);
        }
        assert!(matches!(base.revalidate(id), Err(BoardError::OutOfBounds { .. })));

        // Shrinking keeps objects that no longer fit.
        if let Some(object) = base.object_mut(id) {
            object.set_position(18, 18);
        }
        base.set_size(9).unwrap();
        assert!(base.contains(id));
        assert!(matches!(base.revalidate(id), Err(BoardError::OutOfBounds { size: 9, .. })));
    }

    #[test]
    fn test_resize_modes() {
        let mut base = base();
        let square = base.frame().aspect_ratio();
        assert!((square - 1.0).abs() < 1e-9);

        base.set_container_size(Some(Size::new(400.0, 900.0)));
        assert_eq!(base.surface_size(), Size::new(400.0, 400.0));

        base.config.width = Some(300.0);
        assert_eq!(base.resize(), Size::new(300.0, 300.0));

        base.config.width = None;
        base.config.height = Some(250.0);
        assert_eq!(base.resize(), Size::new(250.0, 250.0));

        base.config.width = Some(100.0);
        assert_eq!(base.resize(), Size::new(100.0, 250.0));
    }

    #[test]
    fn test_set_viewport_recomputes_frame() {
        let mut base = base();
        let full = base.frame().rect;
        base.set_viewport(Viewport::new(0, 9, 9, 0));
        let cropped = base.frame().rect;
        assert_eq!(cropped.x0, full.x0);
        assert!((cropped.width() - (full.width() - 9.0)).abs() < 1e-9);
    }

    #[test]
    fn test_set_size_validates() {
        let mut base = base();
        assert!(base.set_size(1).is_err());
        assert_eq!(base.size(), 19);
        base.set_size(9).unwrap();
        assert_eq!(base.frame().size, 9);
    }

    #[test]
    fn test_pointer_to_grid_uses_surface() {
        let mut base = base();
        base.set_container_size(Some(Size::new(390.0, 390.0)));
        let center = base.grid_to_surface() * Point::new(9.0, 9.0);
        assert_eq!(base.pointer_to_grid(center), Some(GridPoint::new(9, 9)));
    }
}
