//! Grid geometry and the viewport transform.
//!
//! Everything here works in *grid units*: one unit is the distance between two
//! neighbouring intersections, and intersection `(x, y)` sits at `(x, y)`.
//! Backends map grid units to surface pixels with [`BoardFrame::grid_to_surface`].

use kurbo::{Affine, Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Pixels per grid unit used when neither an explicit size nor a container
/// size is known.
pub const DEFAULT_FIELD_PIXELS: f64 = 32.0;

/// Default column labels (the letter `I` is skipped, as is customary).
pub const DEFAULT_COLUMN_LABELS: &str = "ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Intersection coordinates on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: u32,
    pub y: u32,
}

impl GridPoint {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Position of the intersection in grid units.
    pub fn to_point(self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }
}

impl From<(u32, u32)> for GridPoint {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

/// Margins (in whole intersections) cropped from each edge of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Viewport {
    pub const fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self { top, right, bottom, left }
    }

    /// Clamp the margins so at least one intersection stays visible on each axis.
    pub fn clamped(self, size: u32) -> Self {
        let max = size.saturating_sub(1);
        let left = self.left.min(max);
        let right = self.right.min(max - left);
        let top = self.top.min(max);
        let bottom = self.bottom.min(max - top);
        Self { top, right, bottom, left }
    }

    /// Whether the viewport crops nothing.
    pub fn is_full(&self) -> bool {
        *self == Self::default()
    }

    /// Whether an intersection lies inside the visible region of a `size` grid.
    pub fn contains(&self, size: u32, point: GridPoint) -> bool {
        point.x >= self.left
            && point.y >= self.top
            && point.x < size.saturating_sub(self.right)
            && point.y < size.saturating_sub(self.bottom)
    }
}

/// The surface-space frame around the visible part of the grid.
///
/// The frame extends half a unit beyond the outermost visible intersections
/// (lines run through intersection centers), plus the theme margin, plus one
/// font-size unit for coordinate labels on every edge that is not cropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardFrame {
    /// Frame rectangle in grid units.
    pub rect: Rect,
    /// Grid dimension the frame was computed for.
    pub size: u32,
    /// Viewport after clamping.
    pub viewport: Viewport,
}

impl BoardFrame {
    /// Compute the frame for a board.
    pub fn compute(
        size: u32,
        viewport: Viewport,
        margin: f64,
        coordinates: bool,
        font_size: f64,
    ) -> Self {
        let size = size.max(1);
        let viewport = viewport.clamped(size);
        let label = |crop: u32| if coordinates && crop == 0 { font_size } else { 0.0 };
        let n = size as f64;

        let top = viewport.top as f64 - 0.5 - label(viewport.top) - margin;
        let left = viewport.left as f64 - 0.5 - label(viewport.left) - margin;
        let bottom = n - viewport.bottom as f64 - 0.5 + label(viewport.bottom) + margin;
        let right = n - viewport.right as f64 - 0.5 + label(viewport.right) + margin;

        Self {
            rect: Rect::new(left, top, right, bottom),
            size,
            viewport,
        }
    }

    /// The frame as an SVG `viewBox` value (`min-x min-y width height`).
    pub fn view_box(&self) -> String {
        format!(
            "{} {} {} {}",
            self.rect.x0,
            self.rect.y0,
            self.rect.width(),
            self.rect.height()
        )
    }

    /// Width divided by height of the frame.
    pub fn aspect_ratio(&self) -> f64 {
        self.rect.width() / self.rect.height().max(f64::EPSILON)
    }

    /// Uniform scale fitting the frame into `surface`.
    pub fn scale_for(&self, surface: Size) -> f64 {
        let sx = surface.width / self.rect.width().max(f64::EPSILON);
        let sy = surface.height / self.rect.height().max(f64::EPSILON);
        sx.min(sy)
    }

    /// Transform from grid units to surface pixels.
    ///
    /// Scales uniformly and centers the frame in the surface, like SVG's
    /// default `xMidYMid meet`.
    pub fn grid_to_surface(&self, surface: Size) -> Affine {
        let scale = self.scale_for(surface);
        let offset_x = (surface.width - self.rect.width() * scale) / 2.0;
        let offset_y = (surface.height - self.rect.height() * scale) / 2.0;
        Affine::translate((offset_x, offset_y))
            * Affine::scale(scale)
            * Affine::translate((-self.rect.x0, -self.rect.y0))
    }

    /// Inverse of [`Self::grid_to_surface`].
    pub fn surface_to_grid(&self, surface: Size, point: Point) -> Point {
        self.grid_to_surface(surface).inverse() * point
    }

    /// Map a surface point to the nearest visible intersection.
    pub fn pointer_to_grid(&self, surface: Size, point: Point) -> Option<GridPoint> {
        let grid = self.surface_to_grid(surface, point);
        let x = grid.x.round();
        let y = grid.y.round();
        let limit = self.size as f64;
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 || x >= limit || y >= limit {
            return None;
        }
        let point = GridPoint::new(x as u32, y as u32);
        self.viewport.contains(self.size, point).then_some(point)
    }
}

/// Star points for the common board sizes.
pub fn star_points(size: u32) -> Vec<GridPoint> {
    let (lines, center_only): (&[u32], bool) = match size {
        19 => (&[3, 9, 15], false),
        13 => (&[3, 9], true),
        9 => (&[2, 6], true),
        _ => return Vec::new(),
    };

    let mut points: Vec<GridPoint> = lines
        .iter()
        .flat_map(|&x| lines.iter().map(move |&y| GridPoint::new(x, y)))
        .collect();
    if center_only {
        points.push(GridPoint::new(size / 2, size / 2));
    }
    points
}

/// Label for column `x`, taken from `labels` or numbered when it runs out.
pub fn column_label(labels: &str, x: u32) -> String {
    labels
        .chars()
        .nth(x as usize)
        .map(String::from)
        .unwrap_or_else(|| (x + 1).to_string())
}

/// Label for row `y` on a `size` grid (rows count up from the bottom).
pub fn row_label(size: u32, y: u32) -> String {
    size.saturating_sub(y).to_string()
}
