//! Ordered arena of board objects.

use super::BoardObject;

/// Stable handle of an object on a board.
///
/// Handles carry a generation, so a handle kept after its object was removed
/// never aliases a newer object that reuses the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    index: u32,
    generation: u32,
}

impl ObjectId {
    /// Dense slot index, suitable for indexing per-backend resource vectors.
    pub fn index(self) -> usize {
        self.index as usize
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

struct Slot<H: ?Sized> {
    generation: u32,
    object: Option<BoardObject<H>>,
}

/// Objects owned by a board, in paint order (back to front).
pub struct ObjectCollection<H: ?Sized> {
    slots: Vec<Slot<H>>,
    free: Vec<u32>,
    order: Vec<ObjectId>,
}

impl<H: ?Sized> Default for ObjectCollection<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> ObjectCollection<H> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Append an object on top of the paint order.
    pub fn insert(&mut self, object: BoardObject<H>) -> ObjectId {
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.object = Some(object);
                ObjectId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    object: Some(object),
                });
                ObjectId { index, generation: 0 }
            }
        };
        self.order.push(id);
        id
    }

    /// Remove an object. Stale handles return `None`.
    pub fn remove(&mut self, id: ObjectId) -> Option<BoardObject<H>> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        let object = slot.object.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.order.retain(|&other| other != id);
        Some(object)
    }

    pub fn get(&self, id: ObjectId) -> Option<&BoardObject<H>> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.object.as_ref())
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut BoardObject<H>> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.object.as_mut())
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Objects in paint order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &BoardObject<H>)> {
        self.order
            .iter()
            .filter_map(|&id| self.get(id).map(|object| (id, object)))
    }

    /// Handles in paint order.
    pub fn ids(&self) -> &[ObjectId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of slots ever allocated (live or free).
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Remove every object, returning them in paint order.
    pub fn drain(&mut self) -> Vec<(ObjectId, BoardObject<H>)> {
        let ids = std::mem::take(&mut self.order);
        let mut drained = Vec::with_capacity(ids.len());
        for id in ids {
            let slot = &mut self.slots[id.index()];
            if let Some(object) = slot.object.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
                drained.push((id, object));
            }
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ObjectKind;

    fn stone(x: u32) -> BoardObject<()> {
        BoardObject::field(ObjectKind::Black, x, 0)
    }

    #[test]
    fn test_insertion_order_is_paint_order() {
        let mut objects = ObjectCollection::new();
        let a = objects.insert(stone(0));
        let b = objects.insert(stone(1));
        let c = objects.insert(stone(2));
        assert_eq!(objects.ids(), &[a, b, c]);

        objects.remove(b);
        let xs: Vec<u32> = objects
            .iter()
            .filter_map(|(_, o)| o.position().map(|p| p.x))
            .collect();
        assert_eq!(xs, vec![0, 2]);
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let mut objects = ObjectCollection::new();
        let a = objects.insert(stone(0));
        assert!(objects.remove(a).is_some());
        assert!(objects.remove(a).is_none());

        // The slot is reused, but the old handle does not see the new object.
        let b = objects.insert(stone(5));
        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(objects.get(a).is_none());
        assert!(objects.get_mut(a).is_none());
        assert_eq!(objects.get(b).and_then(|o| o.position()).map(|p| p.x), Some(5));
        assert_eq!(objects.slot_count(), 1);
    }

    #[test]
    fn test_drain() {
        let mut objects = ObjectCollection::new();
        let a = objects.insert(stone(0));
        let b = objects.insert(stone(1));
        let drained: Vec<ObjectId> = objects.drain().into_iter().map(|(id, _)| id).collect();
        assert_eq!(drained, vec![a, b]);
        assert!(objects.is_empty());
        assert!(!objects.contains(a));
    }
}
