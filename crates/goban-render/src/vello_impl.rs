//! Vello-based raster context.

use crate::canvas::{ImageAsset, Paint, RasterContext, StateStack};
use goban_core::config::Rgba;
use kurbo::{Affine, BezPath, Point, Rect, Stroke};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill, Gradient, Mix};
use vello::Scene;

/// Draws into a [`vello::Scene`]; the host renders the scene to its surface.
pub struct VelloContext {
    scene: Scene,
    state: StateStack,
    font_cx: FontContext,
    layout_cx: LayoutContext<Brush>,
}

impl Default for VelloContext {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloContext {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            state: StateStack::default(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn into_scene(self) -> Scene {
        self.scene
    }

    fn brush(&self, paint: &Paint) -> Brush {
        let brush = match paint {
            Paint::Solid(color) => Brush::Solid(Color::from(*color)),
            Paint::RadialGradient {
                start,
                start_radius,
                end,
                end_radius,
                stops,
            } => {
                let stops: Vec<(f32, Color)> = stops.iter().map(|(offset, color)| (*offset, Color::from(*color))).collect();
                Brush::Gradient(
                    Gradient::new_two_point_radial(*start, *start_radius as f32, *end, *end_radius as f32)
                        .with_stops(stops.as_slice()),
                )
            }
        };
        brush.multiply_alpha(self.state.alpha() as f32)
    }

    /// Uniform scale of the current transform, used to lay out text at its
    /// final pixel size.
    fn pixel_scale(&self) -> f64 {
        let [a, b, c, d, _, _] = self.state.transform().as_coeffs();
        let scale = (a * d - b * c).abs().sqrt();
        if scale > f64::EPSILON { scale } else { 1.0 }
    }
}

impl RasterContext for VelloContext {
    fn clear(&mut self) {
        self.scene.reset();
        self.state.reset();
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
        let brush = self.brush(paint);
        self.scene.fill(Fill::NonZero, self.state.transform(), &brush, None, path);
    }

    fn stroke(&mut self, path: &BezPath, width: f64, paint: &Paint) {
        let brush = self.brush(paint);
        self.scene
            .stroke(&Stroke::new(width), self.state.transform(), &brush, None, path);
    }

    fn draw_image(&mut self, image: &ImageAsset, rect: Rect) {
        if image.width() == 0 || image.height() == 0 {
            return;
        }
        let transform = self.state.transform();
        let image_transform = transform
            * Affine::translate((rect.x0, rect.y0))
            * Affine::scale_non_uniform(
                rect.width() / image.width() as f64,
                rect.height() / image.height() as f64,
            );

        let alpha = self.state.alpha();
        let layered = alpha < 1.0;
        if layered {
            self.scene.push_layer(Mix::Normal, alpha as f32, transform, &rect);
        }
        self.scene.draw_image(&image.image_data().clone().into(), image_transform);
        if layered {
            self.scene.pop_layer();
        }
    }

    fn fill_text(&mut self, text: &str, center: Point, font_size: f64, font_family: &str, color: Rgba) {
        if text.is_empty() {
            return;
        }
        let brush = self.brush(&Paint::Solid(color));
        let scale = self.pixel_scale();
        let px = (font_size * scale) as f32;

        let mut builder = self.layout_cx.ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(px));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Single(
            parley::FontFamily::Named(font_family.to_string().into()),
        )));
        let mut layout = builder.build(text);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());

        // Lay out in pixels, then map back to grid units centered on `center`.
        let text_transform = self.state.transform()
            * Affine::translate(center.to_vec2())
            * Affine::scale(1.0 / scale)
            * Affine::translate((-(layout.width() as f64) / 2.0, -(layout.height() as f64) / 2.0));

        let mut glyph_count = 0;
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let glyph_xform = run
                    .synthesis()
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph { id: glyph.id, x: gx, y: gy }
                    })
                    .collect();
                glyph_count += glyphs.len();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(run.font_size())
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }
        if glyph_count == 0 {
            log::trace!("no glyphs for {:?} in font {}", text, font_family);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::canvas::{CanvasBoard, ManualLoader, default_canvas_handlers};
    use goban_core::config::BoardConfig;
    use goban_core::objects::{BoardObject, Color as StoneColor};

    #[test]
    fn test_pixel_scale() {
        let mut ctx = VelloContext::new();
        assert_eq!(ctx.pixel_scale(), 1.0);
        ctx.transform(Affine::scale(32.0));
        assert!((ctx.pixel_scale() - 32.0).abs() < 1e-9);
        ctx.clear();
        assert_eq!(ctx.pixel_scale(), 1.0);
    }

    #[test]
    fn test_board_paints_into_scene() {
        let mut board = CanvasBoard::with_parts(
            BoardConfig::default().with_coordinates(true),
            default_canvas_handlers(),
            VelloContext::new(),
            Box::new(ManualLoader::new()),
        )
        .unwrap();
        board.add_object(BoardObject::stone(StoneColor::Black, 3, 3)).unwrap();
        board.add_object(BoardObject::label(4, 4, "A")).unwrap();
        assert!(!board.context().scene().encoding().is_empty());
    }
}
