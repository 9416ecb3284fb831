//! Image-backed stones with a procedural fallback.

use super::context::RasterContext;
use super::handlers::{CanvasDrawHandler, CanvasObject, DrawEnv, LayerPainter, glass_stone_handler};
use goban_core::geometry::GridPoint;
use goban_core::objects::{Color, ObjectKind};
use goban_core::registry::HandlerRegistry;
use kurbo::Rect;
use std::rc::Rc;

/// Stone painted from one of several photos.
///
/// The photo for an intersection is picked with a per-session seed, so the
/// same stone keeps its look across redraws. While the photo is loading (or
/// when it failed to load) the fallback handler's stone painter is used.
pub struct RealisticStone {
    graphics: Vec<String>,
    seed: u32,
    fallback: Rc<CanvasDrawHandler>,
}

impl RealisticStone {
    pub fn new(graphics: Vec<String>, fallback: Rc<CanvasDrawHandler>) -> Self {
        Self {
            graphics,
            seed: session_seed(),
            fallback,
        }
    }

    /// Replace the random seed (for reproducible output).
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn graphics(&self) -> &[String] {
        &self.graphics
    }

    pub fn fallback(&self) -> &Rc<CanvasDrawHandler> {
        &self.fallback
    }

    /// Index of the photo used at `point` on a `size` board.
    ///
    /// Not uniformly distributed; kept stable so boards look the same as
    /// before for a given seed.
    pub fn variant(&self, point: GridPoint, size: u32) -> Option<usize> {
        let count = self.graphics.len() as u64;
        if count == 0 {
            return None;
        }
        let modulus = count + point.x as u64 * size as u64 + point.y as u64;
        Some((self.seed as u64 % modulus % count) as usize)
    }

    /// Handler record painting this stone over the fallback's shadow.
    pub fn into_handler(self) -> CanvasDrawHandler {
        CanvasDrawHandler {
            grid: None,
            shadow: self.fallback.shadow.clone(),
            stone: Some(Rc::new(self)),
        }
    }

    fn draw_fallback(&self, ctx: &mut dyn RasterContext, object: &CanvasObject, env: &mut DrawEnv<'_>) {
        if let Some(stone) = &self.fallback.stone {
            stone.draw(ctx, object, env);
        }
    }
}

impl LayerPainter for RealisticStone {
    fn draw(&self, ctx: &mut dyn RasterContext, object: &CanvasObject, env: &mut DrawEnv<'_>) {
        let name = object
            .position()
            .and_then(|point| self.variant(point, env.config.size))
            .and_then(|index| self.graphics.get(index));
        let image = name.and_then(|name| {
            let path = format!("{}{}", env.config.theme.image_folder, name);
            env.assets.image(&path)
        });

        match image {
            Some(image) => {
                let r = env.config.theme.stone_size * object.attrs.scale;
                ctx.draw_image(&image, Rect::new(-r, -r, r, r));
            }
            None => self.draw_fallback(ctx, object, env),
        }
    }
}

/// Default handlers with black and white stones drawn from photos.
///
/// Names are resolved against the theme's `image_folder`.
pub fn realistic_canvas_handlers(black: Vec<String>, white: Vec<String>) -> HandlerRegistry<CanvasDrawHandler> {
    let mut registry = super::handlers::default_canvas_handlers();
    for (kind, color, graphics) in [
        (ObjectKind::Black, Color::Black, black),
        (ObjectKind::White, Color::White, white),
    ] {
        let fallback = Rc::new(glass_stone_handler(color));
        let stone = RealisticStone::new(graphics, fallback);
        registry.register(kind, Rc::new(stone.into_handler()));
    }
    registry
}

/// Random seed in `1..=9_999_999`, drawn once per stone set.
fn session_seed() -> u32 {
    rand::random_range(1..=9_999_999)
}
