//! goban render library
//!
//! Board backends for goban: a retained SVG tree that diffs per object and
//! an immediate-mode raster board that repaints through a [`RasterContext`].
//! With the `vello-renderer` feature the raster board can paint into a
//! Vello scene.

mod board;
pub mod canvas;
pub mod shapes;
pub mod svg;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use board::Board;
pub use canvas::{CanvasBoard, RasterContext, RecordingContext};
pub use svg::SvgBoard;

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloContext;
