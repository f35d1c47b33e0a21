//! Raster canvas engine for freehand drawing driven by a stream of pointer
//! events (mouse, stylus, or a hand tracker).
//!
//! Feed [`PointerEvent`]s into a [`CanvasEngine`]; it stamps the selected
//! [`BrushKind`] into the active [`Layer`], fills gaps between sparse samples,
//! and records a bounded undo/redo history at every stroke end.
//!
//! ```
//! use air_canvas::{CanvasEngine, Color, PointerEvent};
//!
//! let mut canvas = CanvasEngine::new(320, 240, Color::WHITE);
//! canvas.handle_pointer(PointerEvent::draw(10, 10, 1.0));
//! canvas.handle_pointer(PointerEvent::draw(90, 10, 1.0));
//! canvas.handle_pointer(PointerEvent::lift());
//! assert_eq!(canvas.history_len(), 2);
//! assert!(canvas.undo());
//! ```

pub mod brush;
pub mod canvas;
pub mod config;
pub mod error;
pub mod history;
pub mod interpolate;
pub mod layer;
pub mod patch;
pub mod rng;
pub mod types;

pub use brush::{BrushKind, BrushSettings};
pub use canvas::{CanvasEngine, PerfCounters};
pub use config::Config;
pub use error::{Error, Result};
pub use history::History;
pub use layer::{Layer, Rect};
pub use types::{Color, FrameBuffer, Point, PointerEvent};
