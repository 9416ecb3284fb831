//! Object-kind → drawing-handler registry.

use crate::board::{BoardError, BoardResult};
use crate::objects::{BoardObject, ObjectKind, ObjectType};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Maps object kinds to the handler a backend draws them with.
pub struct HandlerRegistry<H: ?Sized> {
    handlers: HashMap<ObjectKind, Rc<H>>,
}

impl<H: ?Sized> Default for HandlerRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> Clone for HandlerRegistry<H> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<H: ?Sized> HandlerRegistry<H> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register (or replace) the handler for a kind.
    pub fn register(&mut self, kind: ObjectKind, handler: Rc<H>) -> &mut Self {
        self.handlers.insert(kind, handler);
        self
    }

    /// Builder-style [`Self::register`].
    pub fn with(mut self, kind: ObjectKind, handler: Rc<H>) -> Self {
        self.register(kind, handler);
        self
    }

    pub fn get(&self, kind: &ObjectKind) -> Option<&Rc<H>> {
        self.handlers.get(kind)
    }

    pub fn contains(&self, kind: &ObjectKind) -> bool {
        self.handlers.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Resolve the handler for an object: its own handler when it carries one,
    /// otherwise the handler registered for its kind.
    pub fn resolve(&self, object: &BoardObject<H>) -> BoardResult<Rc<H>> {
        match &object.kind {
            ObjectType::Handler(handler) => Ok(Rc::clone(handler)),
            ObjectType::Kind(kind) => self
                .handlers
                .get(kind)
                .cloned()
                .ok_or_else(|| BoardError::NoHandler(kind.clone())),
        }
    }
}

impl<H: ?Sized> fmt::Debug for HandlerRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&ObjectKind> = self.handlers.keys().collect();
        kinds.sort();
        f.debug_struct("HandlerRegistry").field("kinds", &kinds).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_registered_kind() {
        let handler = Rc::new("black stone");
        let registry = HandlerRegistry::new().with(ObjectKind::Black, Rc::clone(&handler));
        let object = BoardObject::field(ObjectKind::Black, 3, 3);
        assert!(Rc::ptr_eq(&registry.resolve(&object).unwrap(), &handler));
    }

    #[test]
    fn test_object_handler_overrides_registry() {
        let registered = Rc::new("registered");
        let own = Rc::new("own");
        let registry = HandlerRegistry::new().with(ObjectKind::Black, registered);
        let object = BoardObject::field(Rc::clone(&own), 3, 3);
        assert!(Rc::ptr_eq(&registry.resolve(&object).unwrap(), &own));
    }

    #[test]
    fn test_unknown_kind_fails() {
        let registry: HandlerRegistry<&str> = HandlerRegistry::new();
        let object = BoardObject::field(ObjectKind::from("SMILE"), 0, 0);
        let err = registry.resolve(&object).unwrap_err();
        assert_eq!(err.to_string(), "no handler registered for type SMILE");
    }
}
