//! Raster draw handlers: a capability record of optional layer painters.

use super::assets::AssetStore;
use super::context::{Paint, RasterContext};
use crate::shapes::{MarkerShape, arrow_head, arrow_shaft, label_font_size, line_path, markup_color};
use goban_core::config::{BoardConfig, Rgba};
use goban_core::objects::{BoardObject, Color, ObjectKind};
use goban_core::registry::HandlerRegistry;
use kurbo::{Circle, Point, Shape};
use std::fmt;
use std::rc::Rc;

const PATH_TOLERANCE: f64 = 1e-3;

/// A board object drawn by the raster backend.
pub type CanvasObject = BoardObject<CanvasDrawHandler>;

/// Raster layers, painted in this order for all objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanvasLayer {
    Grid,
    Shadow,
    Stone,
}

impl CanvasLayer {
    pub const ALL: [CanvasLayer; 3] = [CanvasLayer::Grid, CanvasLayer::Shadow, CanvasLayer::Stone];
}

/// What a painter may read or request while drawing.
pub struct DrawEnv<'a> {
    pub config: &'a BoardConfig,
    pub assets: &'a mut AssetStore,
}

/// Paints one layer of an object.
///
/// The context is already translated to the object's intersection (a line's
/// start point), scaled to grid units and carries the object's opacity.
pub trait LayerPainter {
    fn draw(&self, ctx: &mut dyn RasterContext, object: &CanvasObject, env: &mut DrawEnv<'_>);
}

/// Raster drawing strategy of an object type. Absent layers are skipped.
#[derive(Clone, Default)]
pub struct CanvasDrawHandler {
    pub grid: Option<Rc<dyn LayerPainter>>,
    pub shadow: Option<Rc<dyn LayerPainter>>,
    pub stone: Option<Rc<dyn LayerPainter>>,
}

impl CanvasDrawHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grid(mut self, painter: impl LayerPainter + 'static) -> Self {
        self.grid = Some(Rc::new(painter));
        self
    }

    pub fn with_shadow(mut self, painter: impl LayerPainter + 'static) -> Self {
        self.shadow = Some(Rc::new(painter));
        self
    }

    pub fn with_stone(mut self, painter: impl LayerPainter + 'static) -> Self {
        self.stone = Some(Rc::new(painter));
        self
    }

    pub fn painter(&self, layer: CanvasLayer) -> Option<&Rc<dyn LayerPainter>> {
        match layer {
            CanvasLayer::Grid => self.grid.as_ref(),
            CanvasLayer::Shadow => self.shadow.as_ref(),
            CanvasLayer::Stone => self.stone.as_ref(),
        }
    }
}

impl fmt::Debug for CanvasDrawHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasDrawHandler")
            .field("grid", &self.grid.is_some())
            .field("shadow", &self.shadow.is_some())
            .field("stone", &self.stone.is_some())
            .finish()
    }
}

/// Glass stone handler (shadow + gradient stone) for a color.
pub fn glass_stone_handler(color: Color) -> CanvasDrawHandler {
    CanvasDrawHandler::new()
        .with_shadow(ShadowPainter)
        .with_stone(GlassStonePainter::new(color))
}

/// Registry with a handler for every built-in object kind.
pub fn default_canvas_handlers() -> HandlerRegistry<CanvasDrawHandler> {
    let mut registry = HandlerRegistry::new();
    registry
        .register(ObjectKind::Black, Rc::new(glass_stone_handler(Color::Black)))
        .register(ObjectKind::White, Rc::new(glass_stone_handler(Color::White)))
        .register(
            ObjectKind::Label,
            Rc::new(CanvasDrawHandler::new().with_grid(GridEraser).with_stone(LabelPainter)),
        )
        .register(
            ObjectKind::Line,
            Rc::new(CanvasDrawHandler::new().with_stone(LinePainter { arrow: false })),
        )
        .register(
            ObjectKind::Arrow,
            Rc::new(CanvasDrawHandler::new().with_stone(LinePainter { arrow: true })),
        );
    for kind in [
        ObjectKind::Circle,
        ObjectKind::Square,
        ObjectKind::Triangle,
        ObjectKind::Dot,
        ObjectKind::XMark,
    ] {
        if let Some(shape) = MarkerShape::for_kind(&kind) {
            registry.register(kind, Rc::new(CanvasDrawHandler::new().with_stone(MarkerPainter { shape })));
        }
    }
    registry
}

fn radius(object: &CanvasObject, config: &BoardConfig) -> f64 {
    config.theme.stone_size * object.attrs.scale
}

/// Stone filled with an off-center radial gradient.
#[derive(Debug, Clone, Copy)]
pub struct GlassStonePainter {
    color: Color,
}

impl GlassStonePainter {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl LayerPainter for GlassStonePainter {
    fn draw(&self, ctx: &mut dyn RasterContext, object: &CanvasObject, env: &mut DrawEnv<'_>) {
        let r = radius(object, env.config);
        let paint = match self.color {
            Color::White => Paint::RadialGradient {
                start: Point::new(-2.0 * r / 5.0, -2.0 * r / 5.0),
                start_radius: r / 3.0,
                end: Point::new(-r / 5.0, -r / 5.0),
                end_radius: r,
                stops: vec![(0.0, Rgba::WHITE), (1.0, Rgba::rgb(0xaa, 0xaa, 0xaa))],
            },
            _ => Paint::RadialGradient {
                start: Point::new(-2.0 * r / 5.0, -2.0 * r / 5.0),
                start_radius: r / 10.0,
                end: Point::new(-r / 5.0, -r / 5.0),
                end_radius: 4.0 * r / 5.0,
                stops: vec![(0.0, Rgba::rgb(0x55, 0x55, 0x55)), (1.0, Rgba::BLACK)],
            },
        };
        ctx.fill(&Circle::new(Point::ZERO, r).to_path(PATH_TOLERANCE), &paint);
    }
}

/// Soft shadow offset from the stone.
#[derive(Debug, Clone, Copy)]
pub struct ShadowPainter;

impl LayerPainter for ShadowPainter {
    fn draw(&self, ctx: &mut dyn RasterContext, object: &CanvasObject, env: &mut DrawEnv<'_>) {
        let r = radius(object, env.config);
        let shadow = &env.config.theme.shadow;
        let center = Point::new(shadow.offset_x, shadow.offset_y);
        let paint = Paint::RadialGradient {
            start: center,
            start_radius: (r - shadow.blur).max(0.0),
            end: center,
            end_radius: r + shadow.blur,
            stops: vec![(0.0, shadow.color), (1.0, shadow.color.with_opacity(0.0))],
        };
        ctx.fill(&Circle::new(center, r + shadow.blur).to_path(PATH_TOLERANCE), &paint);
    }
}

/// Circle, square, triangle, dot or x-mark.
#[derive(Debug, Clone, Copy)]
pub struct MarkerPainter {
    pub shape: MarkerShape,
}

impl LayerPainter for MarkerPainter {
    fn draw(&self, ctx: &mut dyn RasterContext, object: &CanvasObject, env: &mut DrawEnv<'_>) {
        let markup = &env.config.theme.markup;
        let path = self.shape.path(radius(object, env.config));
        let paint = Paint::Solid(markup_color(markup, object));
        if self.shape.is_filled() {
            ctx.fill(&path, &paint);
        } else {
            ctx.stroke(&path, markup.line_width, &paint);
        }
    }
}

/// Text label.
#[derive(Debug, Clone, Copy)]
pub struct LabelPainter;

impl LayerPainter for LabelPainter {
    fn draw(&self, ctx: &mut dyn RasterContext, object: &CanvasObject, env: &mut DrawEnv<'_>) {
        let Some(text) = object.attrs.text.as_deref().filter(|text| !text.is_empty()) else {
            return;
        };
        let markup = &env.config.theme.markup;
        let font_size = label_font_size(radius(object, env.config), text);
        ctx.fill_text(text, Point::ZERO, font_size, &markup.font_family, markup_color(markup, object));
    }
}

/// Clears the grid lines under an object with the board background.
#[derive(Debug, Clone, Copy)]
pub struct GridEraser;

impl LayerPainter for GridEraser {
    fn draw(&self, ctx: &mut dyn RasterContext, object: &CanvasObject, env: &mut DrawEnv<'_>) {
        let circle = Circle::new(Point::ZERO, radius(object, env.config)).to_path(PATH_TOLERANCE);
        ctx.fill(&circle, &Paint::Solid(env.config.theme.background_color));
    }
}

/// Line or arrow from the object's start to its end point.
#[derive(Debug, Clone, Copy)]
pub struct LinePainter {
    pub arrow: bool,
}

impl LinePainter {
    const HEAD_SIZE: f64 = 0.3;
}

impl LayerPainter for LinePainter {
    fn draw(&self, ctx: &mut dyn RasterContext, object: &CanvasObject, env: &mut DrawEnv<'_>) {
        let Some((start, end)) = object.segment() else {
            return;
        };
        let markup = &env.config.theme.markup;
        let delta = end.to_point() - start.to_point();
        let paint = Paint::Solid(markup.empty_color);
        if self.arrow {
            ctx.stroke(&arrow_shaft(delta, Self::HEAD_SIZE), markup.line_width * 1.5, &paint);
            ctx.fill(&arrow_head(delta, Self::HEAD_SIZE), &paint);
        } else {
            ctx.stroke(&line_path(delta), markup.line_width * 1.5, &paint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::assets::ManualLoader;
    use crate::canvas::context::{DrawCommand, RecordingContext};

    fn draw(handler: &CanvasDrawHandler, layer: CanvasLayer, object: &CanvasObject) -> RecordingContext {
        let config = BoardConfig::default();
        let mut assets = AssetStore::new(Box::new(ManualLoader::new()));
        let mut env = DrawEnv {
            config: &config,
            assets: &mut assets,
        };
        let mut ctx = RecordingContext::new();
        if let Some(painter) = handler.painter(layer) {
            painter.draw(&mut ctx, object, &mut env);
        }
        ctx
    }

    #[test]
    fn test_default_registry_covers_builtin_kinds() {
        let registry = default_canvas_handlers();
        for key in ["B", "W", "CR", "SQ", "TR", "LB", "DD", "MA", "LN", "AR"] {
            assert!(registry.contains(&ObjectKind::from(key)), "{}", key);
        }
    }

    #[test]
    fn test_capabilities() {
        let stone = glass_stone_handler(Color::Black);
        assert!(stone.painter(CanvasLayer::Grid).is_none());
        assert!(stone.painter(CanvasLayer::Shadow).is_some());
        assert!(stone.painter(CanvasLayer::Stone).is_some());
        assert_eq!(
            format!("{:?}", stone),
            "CanvasDrawHandler { grid: false, shadow: true, stone: true }"
        );
    }

    #[test]
    fn test_marker_ink_on_black_stone() {
        let handler = CanvasDrawHandler::new().with_stone(MarkerPainter {
            shape: MarkerShape::Triangle,
        });
        let object = CanvasObject::field(ObjectKind::Triangle, 3, 3).with_color(Color::Black);
        let ctx = draw(&handler, CanvasLayer::Stone, &object);
        match ctx.commands() {
            [DrawCommand::Stroke { paint, .. }] => {
                assert_eq!(*paint, Paint::Solid(BoardConfig::default().theme.markup.black_color));
            }
            other => panic!("unexpected commands {:?}", other),
        }
    }

    #[test]
    fn test_label_without_text_draws_nothing() {
        let handler = CanvasDrawHandler::new().with_stone(LabelPainter);
        let empty = CanvasObject::field(ObjectKind::Label, 0, 0);
        assert!(draw(&handler, CanvasLayer::Stone, &empty).commands().is_empty());

        let labelled = CanvasObject::label(0, 0, "12");
        let ctx = draw(&handler, CanvasLayer::Stone, &labelled);
        assert!(matches!(&ctx.commands()[0], DrawCommand::Text { text, .. } if text == "12"));
    }

    #[test]
    fn test_arrow_draws_shaft_and_head() {
        let handler = CanvasDrawHandler::new().with_stone(LinePainter { arrow: true });
        let arrow = CanvasObject::line(ObjectKind::Arrow, (1, 1), (4, 1)).unwrap();
        let ctx = draw(&handler, CanvasLayer::Stone, &arrow);
        assert!(matches!(
            ctx.commands(),
            [DrawCommand::Stroke { .. }, DrawCommand::Fill { .. }]
        ));
    }
}
