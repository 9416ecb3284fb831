//! goban core library
//!
//! Backend-independent pieces of the board renderer: grid geometry and the
//! viewport transform, the board object model, the handler registry and the
//! shared board state every rendering backend builds on.

pub mod board;
pub mod config;
pub mod geometry;
pub mod objects;
pub mod registry;

pub use board::{BoardBase, BoardError, BoardResult};
pub use config::{BoardConfig, ConfigError, ConfigResult, Rgba, ThemeConfig};
pub use geometry::{BoardFrame, GridPoint, Viewport};
pub use objects::{BoardObject, Color, ObjectAttrs, ObjectCollection, ObjectId, ObjectKind, ObjectType, Placement};
pub use registry::HandlerRegistry;
