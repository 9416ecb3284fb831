//! Vector backend: a retained SVG element tree with per-object diffing.

mod board;
mod defs;
mod elements;
mod handlers;
mod tree;

pub use board::SvgBoard;
pub use defs::{DefsPool, url};
pub use elements::{ObjectElements, SvgContext, SvgDrawHandler, SvgLayer, SvgObject};
pub use handlers::{GlassStone, Label, LineHandler, Marker, default_svg_handlers};
pub use tree::{NodeId, SvgTree};
