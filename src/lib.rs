//! dotgrid - dot calendar grid for the web
//!
//! Renders one dot per day (or any unit) on a Canvas 2D surface via
//! WebAssembly:
//! - Past, today and future cells colored by an explicit theme
//! - A live "today" dot split by the fraction of the day elapsed
//! - Hover highlighting and click hit testing
//! - Smooth, frame-rate independent zoom onto a focused cell
//! - Per-cell color overrides from JavaScript
//!
//! Everything except the DOM wiring in [`viewer`] is platform independent and
//! can be driven against the in-memory [`render::RecordingSurface`].
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { DotGrid } from 'dotgrid';
//! await init();
//! const grid = new DotGrid(canvas, { totalCells: 365, passedCells: 100 });
//! grid.setOnCellClick((index, x, y) => console.log(index));
//! grid.setFocus(100);
//! ```

pub mod camera;
pub mod clock;
pub mod error;
pub mod layout;
pub mod render;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use camera::{CameraAnimator, Transform};
pub use error::{DotGridError, Result};
pub use layout::{cell_at, GridLayout, HitPolicy, ViewportSize};
pub use render::{RecordingSurface, Rgb, Theme, ThemeConfig};
#[cfg(target_arch = "wasm32")]
pub use viewer::DotGrid;
pub use viewer::{FrameEnv, GridOptions, GridState, TickOutcome};

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
