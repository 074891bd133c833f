//! Rendering engine with pluggable surfaces.
//!
//! This module provides:
//! - Color parsing and theme resolution
//! - Per-cell paint resolution (temporal coloring, overrides, hover)
//! - Frame composition against the [`DotSurface`] trait
//! - Canvas 2D surface (wasm32) and an in-memory recording surface

pub mod backend;
pub mod cache;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod colors;
pub mod frame;
pub mod paint;
pub mod recorder;
pub mod theme;

// Re-export commonly used types
pub use backend::{DotBounds, DotSurface};
pub use cache::ColorParseCache;
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use colors::{palette, parse_color, Rgb};
pub use frame::{
    ensure_surface_size, next_tick, render_frame, surface_size, FrameInput, FrameStats, NextTick,
    SurfaceSize, IDLE_REDRAW_MS,
};
pub use paint::{resolve_paint, ColorOverride, Fill, Glow, PaintContext, PaintSpec};
pub use recorder::{DrawnDot, RecordingSurface, SurfaceOp};
pub use theme::{Theme, ThemeConfig};
