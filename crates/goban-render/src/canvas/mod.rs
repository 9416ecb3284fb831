//! Raster backend: immediate-mode repaint of the whole surface.

mod assets;
mod context;
mod handlers;
mod realistic;
mod scheduler;

pub use assets::{AssetError, AssetEvent, AssetLoader, AssetResult, AssetState, AssetStore, FileLoader, ImageAsset, ManualLoader};
pub use context::{DrawCommand, Paint, RasterContext, RecordingContext, StateStack};
pub use handlers::{
    CanvasDrawHandler, CanvasLayer, CanvasObject, DrawEnv, GlassStonePainter, GridEraser, LabelPainter, LayerPainter,
    LinePainter, MarkerPainter, ShadowPainter, default_canvas_handlers, glass_stone_handler,
};
pub use realistic::{RealisticStone, realistic_canvas_handlers};
pub use scheduler::{DEFAULT_REDRAW_DELAY, RedrawScheduler};

use crate::board::Board;
use goban_core::board::{BoardBase, BoardResult};
use goban_core::config::BoardConfig;
use goban_core::geometry::{GridPoint, Viewport, column_label, row_label, star_points};
use goban_core::objects::{ObjectId, Placement};
use goban_core::registry::HandlerRegistry;
use kurbo::{BezPath, Circle, Point, Shape, Size};
use std::time::{Duration, Instant};

/// Board painted onto a [`RasterContext`].
///
/// Every change repaints the surface. Image assets arrive later: hosts call
/// [`CanvasBoard::pump`] from their event loop, which applies finished loads
/// and runs at most one coalesced redraw once it is due.
pub struct CanvasBoard<C: RasterContext = RecordingContext> {
    base: BoardBase<CanvasDrawHandler>,
    context: C,
    assets: AssetStore,
    scheduler: RedrawScheduler,
    redraws: u64,
}

impl CanvasBoard<RecordingContext> {
    /// Headless board with the built-in handlers, loading assets from the
    /// working directory.
    pub fn new(config: BoardConfig) -> BoardResult<Self> {
        Self::with_parts(
            config,
            default_canvas_handlers(),
            RecordingContext::new(),
            Box::new(FileLoader::default()),
        )
    }
}

impl<C: RasterContext> CanvasBoard<C> {
    pub fn with_parts(
        config: BoardConfig,
        handlers: HandlerRegistry<CanvasDrawHandler>,
        context: C,
        loader: Box<dyn AssetLoader>,
    ) -> BoardResult<Self> {
        let base = BoardBase::new(config, handlers)?;
        let mut board = Self {
            base,
            context,
            assets: AssetStore::new(loader),
            scheduler: RedrawScheduler::default(),
            redraws: 0,
        };
        board.redraw();
        Ok(board)
    }

    /// Change the delay between an asset load and the redraw it triggers.
    pub fn with_redraw_delay(mut self, delay: Duration) -> Self {
        self.scheduler = RedrawScheduler::new(delay);
        self
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn scheduler(&self) -> &RedrawScheduler {
        &self.scheduler
    }

    /// Number of full repaints so far.
    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    /// Size of the element hosting the board, used when no explicit
    /// width or height is configured.
    pub fn set_container_size(&mut self, size: Option<Size>) {
        self.base.set_container_size(size);
        self.redraw();
    }

    /// Record a finished asset load and schedule a coalesced redraw.
    pub fn asset_loaded(&mut self, path: &str, result: AssetResult<ImageAsset>, now: Instant) {
        if self.assets.complete(path, result) {
            self.scheduler.schedule(now);
        }
    }

    /// Apply finished loads and redraw if due. Returns whether it redrew.
    pub fn pump(&mut self, now: Instant) -> bool {
        for event in self.assets.poll_loader() {
            self.asset_loaded(&event.path, event.result, now);
        }
        if self.scheduler.take_due(now) {
            self.redraw();
            true
        } else {
            false
        }
    }

    fn draw_background(&mut self) {
        let theme = &self.base.config().theme;
        let rect = self.base.frame().rect;
        self.context.fill(&rect.to_path(0.1), &Paint::Solid(theme.background_color));
        if let Some(path) = &theme.background_image {
            if let Some(image) = self.assets.image(path) {
                self.context.draw_image(&image, rect);
            }
        }
    }

    /// Grid lines and star points, clipped to the frame so cropped rows and
    /// columns stay hidden when the surface is letterboxed.
    fn draw_grid(&mut self) {
        let theme = &self.base.config().theme.grid;
        let rect = self.base.frame().rect;
        let size = self.base.size();
        let last = size as f64 - 1.0;
        let (x0, x1) = (rect.x0.max(0.0), rect.x1.min(last));
        let (y0, y1) = (rect.y0.max(0.0), rect.y1.min(last));

        let mut lines = BezPath::new();
        for i in 0..size {
            let i = i as f64;
            if (y0..=y1).contains(&i) {
                lines.move_to((x0, i));
                lines.line_to((x1, i));
            }
            if (x0..=x1).contains(&i) {
                lines.move_to((i, y0));
                lines.line_to((i, y1));
            }
        }
        self.context.stroke(&lines, theme.line_width, &Paint::Solid(theme.line_color));

        let mut stars = BezPath::new();
        for point in star_points(size).into_iter().filter(|point| rect.contains(point.to_point())) {
            stars.extend(Circle::new(point.to_point(), theme.star_size).path_elements(1e-3));
        }
        if !stars.elements().is_empty() {
            self.context.fill(&stars, &Paint::Solid(theme.star_color));
        }
    }

    /// Labels for the visible rows and columns, on edges that are not cropped.
    fn draw_coordinates(&mut self) {
        let config = self.base.config();
        if !config.coordinates {
            return;
        }
        let theme = &config.theme.coordinates;
        let size = config.size;
        let viewport = self.base.viewport();
        let far = size as f64 - 1.0 + 0.5 + theme.font_size / 2.0;
        let near = -0.5 - theme.font_size / 2.0;

        let rows: Vec<f64> = [(viewport.top == 0, near), (viewport.bottom == 0, far)]
            .into_iter()
            .filter_map(|(shown, y)| shown.then_some(y))
            .collect();
        let columns: Vec<f64> = [(viewport.left == 0, near), (viewport.right == 0, far)]
            .into_iter()
            .filter_map(|(shown, x)| shown.then_some(x))
            .collect();

        for x in viewport.left..size - viewport.right {
            let text = column_label(&theme.labels_x, x);
            for &y in &rows {
                self.context
                    .fill_text(&text, Point::new(x as f64, y), theme.font_size, &theme.font_family, theme.color);
            }
        }
        for y in viewport.top..size - viewport.bottom {
            let text = row_label(size, y);
            for &x in &columns {
                self.context
                    .fill_text(&text, Point::new(x, y as f64), theme.font_size, &theme.font_family, theme.color);
            }
        }
    }

    fn draw_objects(&mut self) {
        let frame = self.base.frame().rect;
        for layer in CanvasLayer::ALL {
            for (id, object) in self.base.objects().iter() {
                let handler = match self.base.handler_for(object) {
                    Ok(handler) => handler,
                    Err(err) => {
                        if layer == CanvasLayer::Grid {
                            log::warn!("skipping object {:?} in redraw: {}", id, err);
                        }
                        continue;
                    }
                };
                let Some(painter) = handler.painter(layer) else {
                    continue;
                };
                let origin = object.position().map(GridPoint::to_point).unwrap_or(Point::ZERO);
                if matches!(object.placement, Placement::Field(_)) && !frame.contains(origin) {
                    continue;
                }

                self.context.save();
                self.context.translate(origin);
                self.context.set_alpha(object.attrs.opacity);
                let mut env = DrawEnv {
                    config: self.base.config(),
                    assets: &mut self.assets,
                };
                painter.draw(&mut self.context, object, &mut env);
                self.context.restore();
            }
        }
    }
}

impl<C: RasterContext> Board for CanvasBoard<C> {
    type Handler = CanvasDrawHandler;

    fn base(&self) -> &BoardBase<CanvasDrawHandler> {
        &self.base
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut CanvasObject> {
        self.base.object_mut(id)
    }

    fn add_object(&mut self, object: CanvasObject) -> BoardResult<ObjectId> {
        let (id, _) = self.base.insert(object)?;
        self.redraw();
        Ok(id)
    }

    fn remove_object(&mut self, id: ObjectId) -> Option<CanvasObject> {
        let object = self.base.remove(id)?;
        self.redraw();
        Some(object)
    }

    fn update_object(&mut self, id: ObjectId) -> BoardResult<bool> {
        if self.base.revalidate(id)?.is_none() {
            return Ok(false);
        }
        self.redraw();
        Ok(true)
    }

    fn set_size(&mut self, size: u32) -> BoardResult<()> {
        self.base.set_size(size)?;
        self.redraw();
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.base.set_viewport(viewport);
        self.redraw();
    }

    fn set_coordinates(&mut self, coordinates: bool) {
        self.base.set_coordinates(coordinates);
        self.redraw();
    }

    fn resize(&mut self) -> Size {
        let size = self.base.resize();
        self.redraw();
        size
    }

    fn redraw(&mut self) {
        let transform = self.base.grid_to_surface();
        self.context.clear();
        self.context.save();
        self.context.transform(transform);
        self.draw_background();
        self.draw_grid();
        self.draw_coordinates();
        self.draw_objects();
        self.context.restore();
        self.redraws += 1;
        log::debug!("redrew canvas board with {} objects", self.base.len());
    }
}
