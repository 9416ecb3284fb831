//! Marker geometry shared by the vector and raster backends.
//!
//! Paths are centered on the origin and sized relative to the stone radius,
//! in grid units.

use goban_core::config::{MarkupTheme, Rgba};
use goban_core::objects::{BoardObject, Color, ObjectKind};
use kurbo::{BezPath, Circle, Point, Rect, Shape, Vec2};

const PATH_TOLERANCE: f64 = 1e-3;

/// Point markers drawn on top of an intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Square,
    Triangle,
    Dot,
    XMark,
}

impl MarkerShape {
    /// Marker shape of a built-in kind.
    pub fn for_kind(kind: &ObjectKind) -> Option<Self> {
        match kind {
            ObjectKind::Circle => Some(MarkerShape::Circle),
            ObjectKind::Square => Some(MarkerShape::Square),
            ObjectKind::Triangle => Some(MarkerShape::Triangle),
            ObjectKind::Dot => Some(MarkerShape::Dot),
            ObjectKind::XMark => Some(MarkerShape::XMark),
            _ => None,
        }
    }

    /// Filled rather than stroked.
    pub fn is_filled(self) -> bool {
        matches!(self, MarkerShape::Dot)
    }

    /// Outline for a stone of radius `r`.
    pub fn path(self, r: f64) -> BezPath {
        match self {
            MarkerShape::Circle => Circle::new(Point::ZERO, r * 0.5).to_path(PATH_TOLERANCE),
            MarkerShape::Square => {
                let half = r * 0.45;
                Rect::new(-half, -half, half, half).to_path(PATH_TOLERANCE)
            }
            MarkerShape::Triangle => {
                let mut path = BezPath::new();
                path.move_to((0.0, -r * 0.6));
                path.line_to((r * 0.52, r * 0.3));
                path.line_to((-r * 0.52, r * 0.3));
                path.close_path();
                path
            }
            MarkerShape::Dot => Circle::new(Point::ZERO, r * 0.25).to_path(PATH_TOLERANCE),
            MarkerShape::XMark => {
                let d = r * 0.35;
                let mut path = BezPath::new();
                path.move_to((-d, -d));
                path.line_to((d, d));
                path.move_to((d, -d));
                path.line_to((-d, d));
                path
            }
        }
    }
}

/// Ink color for a marker, chosen by the stone it sits on.
pub fn markup_color<H: ?Sized>(theme: &MarkupTheme, object: &BoardObject<H>) -> Rgba {
    match object.stone_color() {
        Color::Black => theme.black_color,
        Color::White => theme.white_color,
        Color::Empty => theme.empty_color,
    }
}

/// Font size of a label, relative to the stone radius.
pub fn label_font_size(stone_size: f64, text: &str) -> f64 {
    match text.chars().count() {
        0 | 1 => stone_size * 1.1,
        2 => stone_size * 0.95,
        _ => stone_size * 0.75,
    }
}

/// Straight segment from the origin to `end`.
pub fn line_path(end: Vec2) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(Point::ZERO);
    path.line_to(end.to_point());
    path
}

/// Arrow head at the tip of a segment from the origin to `end`.
///
/// Empty for a zero-length segment, which has no direction.
pub fn arrow_head(end: Vec2, size: f64) -> BezPath {
    if end.hypot2() <= f64::EPSILON {
        return BezPath::new();
    }
    let direction = end.normalize();
    let normal = Vec2::new(-direction.y, direction.x);
    let tip = end.to_point();
    let base = tip - direction * size;

    let mut path = BezPath::new();
    path.move_to(tip);
    path.line_to(base + normal * (size * 0.5));
    path.line_to(base - normal * (size * 0.5));
    path.close_path();
    path
}

/// Segment shortened so the arrow head covers its tip.
pub fn arrow_shaft(end: Vec2, head: f64) -> BezPath {
    let length = end.length();
    let shaft = if length > head { end * ((length - head) / length) } else { end };
    line_path(shaft)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_kinds() {
        assert_eq!(MarkerShape::for_kind(&ObjectKind::Triangle), Some(MarkerShape::Triangle));
        assert_eq!(MarkerShape::for_kind(&ObjectKind::Label), None);
        assert!(MarkerShape::Dot.is_filled());
        assert!(!MarkerShape::Square.is_filled());
    }

    #[test]
    fn test_marker_fits_inside_stone() {
        for shape in [
            MarkerShape::Circle,
            MarkerShape::Square,
            MarkerShape::Triangle,
            MarkerShape::Dot,
            MarkerShape::XMark,
        ] {
            let bounds = shape.path(0.47).bounding_box();
            assert!(bounds.x0 >= -0.47 && bounds.x1 <= 0.47, "{:?}", shape);
            assert!(bounds.y0 >= -0.47 && bounds.y1 <= 0.47, "{:?}", shape);
        }
    }

    #[test]
    fn test_markup_color_follows_stone() {
        let theme = MarkupTheme::default();
        let on_black: BoardObject<()> = BoardObject::field(ObjectKind::Circle, 0, 0).with_color(Color::Black);
        let on_empty: BoardObject<()> = BoardObject::field(ObjectKind::Circle, 0, 0);
        assert_eq!(markup_color(&theme, &on_black), theme.black_color);
        assert_eq!(markup_color(&theme, &on_empty), theme.empty_color);
    }

    #[test]
    fn test_arrow_head_points_at_tip() {
        let end = Vec2::new(3.0, 0.0);
        let head = arrow_head(end, 0.3).bounding_box();
        assert!((head.x1 - 3.0).abs() < 1e-9);
        assert!((head.x0 - 2.7).abs() < 1e-9);
        let shaft = arrow_shaft(end, 0.3).bounding_box();
        assert!((shaft.x1 - 2.7).abs() < 1e-9);
    }

    #[test]
    fn test_zero_length_arrow_has_no_head() {
        let head = arrow_head(Vec2::ZERO, 0.3);
        assert!(head.elements().is_empty());
        let shaft = arrow_shaft(Vec2::ZERO, 0.3);
        assert!(!shaft.to_svg().contains("NaN"));
    }
}
