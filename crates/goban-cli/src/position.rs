//! JSON description of a board position.

use goban_core::board::BoardResult;
use goban_core::config::BoardConfig;
use goban_core::geometry::GridPoint;
use goban_core::objects::{BoardObject, Color, ObjectKind};
use serde::{Deserialize, Serialize};

/// A board configuration plus the objects to place on it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub config: BoardConfig,
    pub objects: Vec<ObjectSpec>,
}

/// One object of a position, keyed by its short type name (`B`, `CR`, `LB`...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<GridPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<GridPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl Position {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let position: Position = serde_json::from_str(json)?;
        Ok(position)
    }
}

impl ObjectSpec {
    /// Build the board object. Objects with neither a point nor a segment
    /// are placed on the board itself.
    pub fn to_object<H: ?Sized>(&self) -> BoardResult<BoardObject<H>> {
        let kind = ObjectKind::from(self.kind.as_str());
        let mut object = match (self.start, self.end, self.x, self.y) {
            (Some(start), Some(end), _, _) => BoardObject::line(kind, start, end)?,
            (_, _, Some(x), Some(y)) => BoardObject::field(kind, x, y),
            _ => BoardObject::new(kind),
        };
        if let Some(color) = self.color {
            object = object.with_color(color);
        }
        if let Some(text) = &self.text {
            object = object.with_text(text.clone());
        }
        if let Some(opacity) = self.opacity {
            object = object.with_opacity(opacity);
        }
        Ok(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goban_core::objects::Placement;

    #[test]
    fn test_parse_position() {
        let json = r#"{
            "config": { "size": 9, "coordinates": true },
            "objects": [
                { "type": "B", "x": 2, "y": 2 },
                { "type": "LB", "x": 4, "y": 4, "text": "A" },
                { "type": "AR", "start": { "x": 0, "y": 0 }, "end": { "x": 3, "y": 3 } }
            ]
        }"#;
        let position = Position::from_json(json).unwrap();
        assert_eq!(position.config.size, 9);
        assert!(position.config.coordinates);
        assert_eq!(position.objects.len(), 3);

        let stone: BoardObject<()> = position.objects[0].to_object().unwrap();
        assert_eq!(stone.stone_color(), Color::Black);
        assert_eq!(stone.position(), Some(GridPoint::new(2, 2)));

        let label: BoardObject<()> = position.objects[1].to_object().unwrap();
        assert_eq!(label.attrs.text.as_deref(), Some("A"));

        let arrow: BoardObject<()> = position.objects[2].to_object().unwrap();
        assert!(matches!(arrow.placement, Placement::Line { .. }));
    }

    #[test]
    fn test_degenerate_line_rejected() {
        let spec = ObjectSpec {
            kind: "LN".into(),
            x: None,
            y: None,
            start: Some(GridPoint::new(1, 1)),
            end: Some(GridPoint::new(1, 1)),
            text: None,
            color: None,
            opacity: None,
        };
        assert!(spec.to_object::<()>().is_err());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let position = Position::from_json("{}").unwrap();
        assert_eq!(position.config.size, 19);
        assert!(position.objects.is_empty());
    }
}
