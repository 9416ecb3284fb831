//! Board objects: stones, markers and line annotations.

mod collection;

pub use collection::{ObjectCollection, ObjectId};

use crate::board::{BoardError, BoardResult};
use crate::geometry::GridPoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Stone color of an intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
    #[default]
    Empty,
}

impl Color {
    /// The other player's color (`Empty` stays `Empty`).
    pub fn opposite(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
            Color::Empty => Color::Empty,
        }
    }
}

/// Registry key of an object type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Black,
    White,
    Circle,
    Square,
    Triangle,
    Label,
    Dot,
    XMark,
    Line,
    Arrow,
    /// Application-defined type.
    Custom(String),
}

impl ObjectKind {
    /// Short string key, as used in themes and position files.
    pub fn as_str(&self) -> &str {
        match self {
            ObjectKind::Black => "B",
            ObjectKind::White => "W",
            ObjectKind::Circle => "CR",
            ObjectKind::Square => "SQ",
            ObjectKind::Triangle => "TR",
            ObjectKind::Label => "LB",
            ObjectKind::Dot => "DD",
            ObjectKind::XMark => "MA",
            ObjectKind::Line => "LN",
            ObjectKind::Arrow => "AR",
            ObjectKind::Custom(name) => name,
        }
    }

    /// Stone kind for a color, `None` for `Empty`.
    pub fn stone(color: Color) -> Option<Self> {
        match color {
            Color::Black => Some(ObjectKind::Black),
            Color::White => Some(ObjectKind::White),
            Color::Empty => None,
        }
    }
}

impl From<&str> for ObjectKind {
    fn from(key: &str) -> Self {
        match key {
            "B" => ObjectKind::Black,
            "W" => ObjectKind::White,
            "CR" => ObjectKind::Circle,
            "SQ" => ObjectKind::Square,
            "TR" => ObjectKind::Triangle,
            "LB" => ObjectKind::Label,
            "DD" => ObjectKind::Dot,
            "MA" => ObjectKind::XMark,
            "LN" => ObjectKind::Line,
            "AR" => ObjectKind::Arrow,
            other => ObjectKind::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an object finds its drawing strategy.
pub enum ObjectType<H: ?Sized> {
    /// Look the kind up in the board's handler registry.
    Kind(ObjectKind),
    /// Use this handler, bypassing the registry.
    Handler(Rc<H>),
}

impl<H: ?Sized> ObjectType<H> {
    /// Registry kind, if the object is not using its own handler.
    pub fn kind(&self) -> Option<&ObjectKind> {
        match self {
            ObjectType::Kind(kind) => Some(kind),
            ObjectType::Handler(_) => None,
        }
    }
}

impl<H: ?Sized> Clone for ObjectType<H> {
    fn clone(&self) -> Self {
        match self {
            ObjectType::Kind(kind) => ObjectType::Kind(kind.clone()),
            ObjectType::Handler(handler) => ObjectType::Handler(Rc::clone(handler)),
        }
    }
}

impl<H: ?Sized> fmt::Debug for ObjectType<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectType::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            ObjectType::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

impl<H: ?Sized> From<ObjectKind> for ObjectType<H> {
    fn from(kind: ObjectKind) -> Self {
        ObjectType::Kind(kind)
    }
}

impl<H: ?Sized> From<&str> for ObjectType<H> {
    fn from(key: &str) -> Self {
        ObjectType::Kind(ObjectKind::from(key))
    }
}

impl<H: ?Sized> From<Rc<H>> for ObjectType<H> {
    fn from(handler: Rc<H>) -> Self {
        ObjectType::Handler(handler)
    }
}

/// Where an object sits on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Not tied to an intersection.
    Board,
    /// A single intersection (stones, point markers).
    Field(GridPoint),
    /// A directed two-point annotation (lines, arrows).
    Line { start: GridPoint, end: GridPoint },
}

/// Free-form rendering attributes read by handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectAttrs {
    /// Overall opacity (0.0 = invisible, 1.0 = opaque).
    pub opacity: f64,
    /// Color of the stone under a marker, or the stone's own color.
    pub color: Option<Color>,
    /// Text for labels.
    pub text: Option<String>,
    /// Relative size multiplier.
    pub scale: f64,
    /// Handler-specific values.
    pub custom: BTreeMap<String, serde_json::Value>,
}

impl Default for ObjectAttrs {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            color: None,
            text: None,
            scale: 1.0,
            custom: BTreeMap::new(),
        }
    }
}

/// A renderable entity placed relative to the grid.
///
/// Identity is the [`ObjectId`] handed out when the object is added to a board;
/// two objects are never compared by value.
pub struct BoardObject<H: ?Sized> {
    pub kind: ObjectType<H>,
    pub placement: Placement,
    pub attrs: ObjectAttrs,
}

impl<H: ?Sized> BoardObject<H> {
    /// Object without a grid position.
    pub fn new(kind: impl Into<ObjectType<H>>) -> Self {
        Self {
            kind: kind.into(),
            placement: Placement::Board,
            attrs: ObjectAttrs::default(),
        }
    }

    /// Object on a single intersection.
    pub fn field(kind: impl Into<ObjectType<H>>, x: u32, y: u32) -> Self {
        Self {
            placement: Placement::Field(GridPoint::new(x, y)),
            ..Self::new(kind)
        }
    }

    /// Stone of the given color. `Empty` yields a plain circle marker.
    pub fn stone(color: Color, x: u32, y: u32) -> Self {
        let kind = ObjectKind::stone(color).unwrap_or(ObjectKind::Circle);
        Self::field(kind, x, y).with_color(color)
    }

    /// Text label on an intersection.
    pub fn label(x: u32, y: u32, text: impl Into<String>) -> Self {
        Self::field(ObjectKind::Label, x, y).with_text(text)
    }

    /// Two-point annotation. Fails when both points coincide.
    pub fn line(
        kind: impl Into<ObjectType<H>>,
        start: impl Into<GridPoint>,
        end: impl Into<GridPoint>,
    ) -> BoardResult<Self> {
        let object = Self {
            placement: Placement::Line {
                start: start.into(),
                end: end.into(),
            },
            ..Self::new(kind)
        };
        object.validate()?;
        Ok(object)
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.attrs.opacity = opacity;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.attrs.color = Some(color);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.attrs.text = Some(text.into());
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.attrs.scale = scale;
        self
    }

    /// Attach a handler-specific attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attrs.custom.insert(key.into(), value.into());
        self
    }

    /// Move the object to an intersection (line objects become field objects).
    pub fn set_position(&mut self, x: u32, y: u32) {
        self.placement = Placement::Field(GridPoint::new(x, y));
    }

    /// The intersection the object is drawn relative to (a line's start point).
    pub fn position(&self) -> Option<GridPoint> {
        match self.placement {
            Placement::Board => None,
            Placement::Field(point) => Some(point),
            Placement::Line { start, .. } => Some(start),
        }
    }

    /// Start and end of a line object.
    pub fn segment(&self) -> Option<(GridPoint, GridPoint)> {
        match self.placement {
            Placement::Line { start, end } => Some((start, end)),
            _ => None,
        }
    }

    /// Every intersection the object touches.
    pub fn points(&self) -> Vec<GridPoint> {
        match self.placement {
            Placement::Board => Vec::new(),
            Placement::Field(point) => vec![point],
            Placement::Line { start, end } => vec![start, end],
        }
    }

    /// Whether all of the object's points lie on a `size` grid.
    pub fn fits(&self, size: u32) -> bool {
        self.points().iter().all(|point| point.x < size && point.y < size)
    }

    /// Color of the stone this object is (or sits on).
    pub fn stone_color(&self) -> Color {
        match (&self.attrs.color, self.kind.kind()) {
            (Some(color), _) => *color,
            (None, Some(ObjectKind::Black)) => Color::Black,
            (None, Some(ObjectKind::White)) => Color::White,
            _ => Color::Empty,
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> BoardResult<()> {
        match self.placement {
            Placement::Line { start, end } if start == end => Err(BoardError::DegenerateLine(start)),
            _ => Ok(()),
        }
    }
}

impl<H: ?Sized> Clone for BoardObject<H> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            placement: self.placement,
            attrs: self.attrs.clone(),
        }
    }
}

impl<H: ?Sized> fmt::Debug for BoardObject<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardObject")
            .field("kind", &self.kind)
            .field("placement", &self.placement)
            .field("attrs", &self.attrs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Object = BoardObject<()>;

    #[test]
    fn test_kind_keys() {
        for key in ["B", "W", "CR", "SQ", "TR", "LB", "DD", "MA", "LN", "AR"] {
            assert_eq!(ObjectKind::from(key).as_str(), key);
        }
        assert_eq!(ObjectKind::from("SMILE"), ObjectKind::Custom("SMILE".into()));
    }

    #[test]
    fn test_degenerate_line_rejected() {
        let result = Object::line(ObjectKind::Line, (3, 3), (3, 3));
        assert!(matches!(result, Err(BoardError::DegenerateLine(p)) if p == GridPoint::new(3, 3)));
        assert!(Object::line(ObjectKind::Arrow, (3, 3), (4, 5)).is_ok());
    }

    #[test]
    fn test_stone_color() {
        assert_eq!(Object::field(ObjectKind::Black, 0, 0).stone_color(), Color::Black);
        assert_eq!(Object::stone(Color::White, 0, 0).stone_color(), Color::White);
        let marker = Object::field(ObjectKind::Triangle, 0, 0).with_color(Color::Black);
        assert_eq!(marker.stone_color(), Color::Black);
        assert_eq!(Object::field(ObjectKind::Circle, 0, 0).stone_color(), Color::Empty);
    }

    #[test]
    fn test_position() {
        let mut stone = Object::field(ObjectKind::Black, 2, 5);
        assert_eq!(stone.position(), Some(GridPoint::new(2, 5)));
        stone.set_position(7, 1);
        assert_eq!(stone.placement, Placement::Field(GridPoint::new(7, 1)));

        let line = Object::line(ObjectKind::Line, (1, 1), (4, 1)).unwrap();
        assert_eq!(line.position(), Some(GridPoint::new(1, 1)));
        assert_eq!(line.segment(), Some((GridPoint::new(1, 1), GridPoint::new(4, 1))));
        assert_eq!(Object::new(ObjectKind::Dot).position(), None);
    }

    #[test]
    fn test_handler_override_has_no_kind() {
        let object: Object = BoardObject::field(Rc::new(()), 0, 0);
        assert!(object.kind.kind().is_none());
        assert_eq!(format!("{:?}", object.kind), "Handler(..)");
    }
}
