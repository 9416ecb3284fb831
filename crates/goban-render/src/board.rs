//! The contract every board backend implements.

use goban_core::board::{BoardBase, BoardResult};
use goban_core::geometry::{GridPoint, Viewport};
use goban_core::objects::{BoardObject, ObjectId};
use kurbo::{Point, Size};

/// Object management and view operations shared by the vector and raster
/// backends.
///
/// All operations update the logical model synchronously. Backends may defer
/// pixel output (the raster backend waits for image assets), never the model.
pub trait Board {
    /// Drawing-handler type of this backend.
    type Handler: ?Sized;

    /// Shared board state.
    fn base(&self) -> &BoardBase<Self::Handler>;

    /// Mutable access to an object. Call [`Board::update_object`] afterwards.
    fn object_mut(&mut self, id: ObjectId) -> Option<&mut BoardObject<Self::Handler>>;

    /// Add an object on top of the paint order.
    ///
    /// Fails without touching the board when the object's type has no handler
    /// or a line object starts and ends at the same point.
    fn add_object(&mut self, object: BoardObject<Self::Handler>) -> BoardResult<ObjectId>;

    /// Remove an object and release the rendering resources tied to it.
    /// Stale handles are a no-op.
    fn remove_object(&mut self, id: ObjectId) -> Option<BoardObject<Self::Handler>>;

    /// Re-render an object after it was mutated in place.
    ///
    /// Returns `Ok(false)` when the object is not on the board.
    fn update_object(&mut self, id: ObjectId) -> BoardResult<bool>;

    /// Change the grid dimension.
    fn set_size(&mut self, size: u32) -> BoardResult<()>;

    /// Replace the crop margins.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Show or hide coordinate labels.
    fn set_coordinates(&mut self, coordinates: bool);

    /// Recompute the surface size from the configuration.
    fn resize(&mut self) -> Size;

    /// Re-render grid, labels and every object from scratch.
    fn redraw(&mut self);

    /// Add several objects, preserving their relative order.
    fn add_objects<I>(&mut self, objects: I) -> BoardResult<Vec<ObjectId>>
    where
        Self: Sized,
        I: IntoIterator<Item = BoardObject<Self::Handler>>,
    {
        objects
            .into_iter()
            .map(|object| self.add_object(object))
            .collect()
    }

    /// Remove several objects; stale handles are skipped.
    fn remove_objects(&mut self, ids: &[ObjectId]) -> Vec<BoardObject<Self::Handler>>
    where
        Self: Sized,
    {
        ids.iter().filter_map(|&id| self.remove_object(id)).collect()
    }

    /// Update several objects. Returns how many were on the board.
    fn update_objects(&mut self, ids: &[ObjectId]) -> BoardResult<usize>
    where
        Self: Sized,
    {
        let mut updated = 0;
        for &id in ids {
            if self.update_object(id)? {
                updated += 1;
            }
        }
        Ok(updated)
    }

    /// Apply `edit` to an object and resynchronize its rendering.
    ///
    /// A rejected edit is rolled back, leaving the object as it was.
    fn edit_object<F>(&mut self, id: ObjectId, edit: F) -> BoardResult<bool>
    where
        Self: Sized,
        F: FnOnce(&mut BoardObject<Self::Handler>),
    {
        let Some(object) = self.object_mut(id) else {
            return Ok(false);
        };
        let previous = object.clone();
        edit(object);
        match self.update_object(id) {
            Err(err) => {
                if let Some(object) = self.object_mut(id) {
                    *object = previous;
                }
                Err(err)
            }
            updated => updated,
        }
    }

    fn object(&self, id: ObjectId) -> Option<&BoardObject<Self::Handler>> {
        self.base().object(id)
    }

    /// Map a surface pixel position to the nearest visible intersection.
    fn pointer_to_grid(&self, point: Point) -> Option<GridPoint> {
        self.base().pointer_to_grid(point)
    }
}
