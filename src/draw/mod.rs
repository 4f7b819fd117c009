//! Canvas bitmap and Cairo rendering primitives.
//!
//! - [`SketchSurface`]: the fixed-size raster strokes are painted into
//! - [`Color`]: RGBA color with the canvas and panel palette
//! - [`DirtyTracker`]: window damage accumulated between frames
//! - Rendering helpers for compositing the canvas and drawing panel text

pub mod color;
pub mod dirty;
pub mod font;
pub mod render;
pub mod sketch;

pub use color::Color;
pub use dirty::DirtyTracker;
pub use font::FontDescriptor;
pub use render::{fill_rounded_rect, measure_text, render_canvas, render_text, stroke_rounded_rect};
pub use sketch::{SketchError, SketchSurface};

pub use color::{ACCENT, BLACK, ERROR_RED, MUTED, PANEL_BG, TEXT, WHITE};
