//! Immediate-mode drawing surface used by the raster backend.

use crate::canvas::assets::ImageAsset;
use goban_core::config::Rgba;
use kurbo::{Affine, BezPath, Point, Rect};

/// How a path is filled or stroked.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    /// Two-point radial gradient, like the 2D canvas `createRadialGradient`.
    RadialGradient {
        start: Point,
        start_radius: f64,
        end: Point,
        end_radius: f64,
        stops: Vec<(f32, Rgba)>,
    },
}

impl From<Rgba> for Paint {
    fn from(color: Rgba) -> Self {
        Paint::Solid(color)
    }
}

/// A 2D drawing surface.
///
/// Coordinates go through the current transform; `alpha` multiplies into the
/// opacity of everything drawn until the matching `restore`.
pub trait RasterContext {
    /// Drop everything drawn so far and reset the state stack.
    fn clear(&mut self);

    fn save(&mut self);

    fn restore(&mut self);

    /// Post-multiply the current transform.
    fn transform(&mut self, affine: Affine);

    /// Multiply the current alpha.
    fn set_alpha(&mut self, alpha: f64);

    fn fill(&mut self, path: &BezPath, paint: &Paint);

    fn stroke(&mut self, path: &BezPath, width: f64, paint: &Paint);

    /// Draw an image stretched over `rect`.
    fn draw_image(&mut self, image: &ImageAsset, rect: Rect);

    /// Draw a single line of text centered on `center`.
    fn fill_text(&mut self, text: &str, center: Point, font_size: f64, font_family: &str, color: Rgba);

    fn translate(&mut self, offset: Point) {
        self.transform(Affine::translate(offset.to_vec2()));
    }
}

/// Transform and alpha with save/restore.
#[derive(Debug, Clone)]
pub struct StateStack {
    current: (Affine, f64),
    saved: Vec<(Affine, f64)>,
}

impl Default for StateStack {
    fn default() -> Self {
        Self {
            current: (Affine::IDENTITY, 1.0),
            saved: Vec::new(),
        }
    }
}

impl StateStack {
    pub fn transform(&self) -> Affine {
        self.current.0
    }

    pub fn alpha(&self) -> f64 {
        self.current.1
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Pop the last saved state. Unbalanced calls are ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.current = state;
        }
    }

    pub fn apply(&mut self, affine: Affine) {
        self.current.0 = self.current.0 * affine;
    }

    pub fn multiply_alpha(&mut self, alpha: f64) {
        self.current.1 *= alpha.clamp(0.0, 1.0);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

/// One recorded drawing call, with the transform and alpha in effect.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill {
        transform: Affine,
        alpha: f64,
        path: BezPath,
        paint: Paint,
    },
    Stroke {
        transform: Affine,
        alpha: f64,
        path: BezPath,
        width: f64,
        paint: Paint,
    },
    Image {
        transform: Affine,
        alpha: f64,
        rect: Rect,
        width: u32,
        height: u32,
    },
    Text {
        transform: Affine,
        alpha: f64,
        text: String,
        center: Point,
        font_size: f64,
        color: Rgba,
    },
}

impl DrawCommand {
    pub fn transform(&self) -> Affine {
        match self {
            DrawCommand::Fill { transform, .. }
            | DrawCommand::Stroke { transform, .. }
            | DrawCommand::Image { transform, .. }
            | DrawCommand::Text { transform, .. } => *transform,
        }
    }

    pub fn alpha(&self) -> f64 {
        match self {
            DrawCommand::Fill { alpha, .. }
            | DrawCommand::Stroke { alpha, .. }
            | DrawCommand::Image { alpha, .. }
            | DrawCommand::Text { alpha, .. } => *alpha,
        }
    }
}

/// Context that records a display list instead of rasterizing.
#[derive(Debug, Clone, Default)]
pub struct RecordingContext {
    state: StateStack,
    commands: Vec<DrawCommand>,
    clears: usize,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded since the last clear.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of times the surface was cleared.
    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn images(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Image { .. }))
    }
}

impl RasterContext for RecordingContext {
    fn clear(&mut self) {
        self.commands.clear();
        self.state.reset();
        self.clears += 1;
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn transform(&mut self, affine: Affine) {
        self.state.apply(affine);
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.state.multiply_alpha(alpha);
    }

    fn fill(&mut self, path: &BezPath, paint: &Paint) {
        self.commands.push(DrawCommand::Fill {
            transform: self.state.transform(),
            alpha: self.state.alpha(),
            path: path.clone(),
            paint: paint.clone(),
        });
    }

    fn stroke(&mut self, path: &BezPath, width: f64, paint: &Paint) {
        self.commands.push(DrawCommand::Stroke {
            transform: self.state.transform(),
            alpha: self.state.alpha(),
            path: path.clone(),
            width,
            paint: paint.clone(),
        });
    }

    fn draw_image(&mut self, image: &ImageAsset, rect: Rect) {
        self.commands.push(DrawCommand::Image {
            transform: self.state.transform(),
            alpha: self.state.alpha(),
            rect,
            width: image.width(),
            height: image.height(),
        });
    }

    fn fill_text(&mut self, text: &str, center: Point, font_size: f64, _font_family: &str, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            transform: self.state.transform(),
            alpha: self.state.alpha(),
            text: text.to_string(),
            center,
            font_size,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Circle, Shape};

    #[test]
    fn test_state_stack() {
        let mut ctx = RecordingContext::new();
        ctx.transform(Affine::scale(2.0));
        ctx.save();
        ctx.translate(Point::new(3.0, 4.0));
        ctx.set_alpha(0.5);
        let circle = Circle::new(Point::ZERO, 1.0).to_path(0.1);
        ctx.fill(&circle, &Paint::Solid(Rgba::BLACK));
        ctx.restore();
        ctx.fill(&circle, &Paint::Solid(Rgba::BLACK));

        let commands = ctx.commands();
        assert_eq!(commands[0].transform() * Point::ZERO, Point::new(6.0, 8.0));
        assert_eq!(commands[0].alpha(), 0.5);
        assert_eq!(commands[1].transform(), Affine::scale(2.0));
        assert_eq!(commands[1].alpha(), 1.0);
    }

    #[test]
    fn test_clear_resets() {
        let mut ctx = RecordingContext::new();
        ctx.save();
        ctx.set_alpha(0.2);
        ctx.fill_text("A", Point::ZERO, 0.5, "serif", Rgba::BLACK);
        ctx.clear();
        assert!(ctx.commands().is_empty());
        assert_eq!(ctx.clears(), 1);
        assert_eq!(ctx.state.alpha(), 1.0);
        assert_eq!(ctx.state.depth(), 0);
    }
}
