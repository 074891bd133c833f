//! Drawing surface trait for pluggable backends.
//!
//! Frame composition in [`super::frame`] talks to this trait only, so the same
//! code drives the browser canvas and the in-memory recorder used by the CLI,
//! benches and tests. The trait mirrors a 2D canvas context: paint attributes
//! (`set_fill`, `set_glow`) are sticky until changed, which is exactly why the
//! frame code sets and resets them around every dot.

use super::colors::Rgb;
use super::paint::{Fill, Glow};

/// Bounding square of one dot in surface coordinates (before the camera).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct DotBounds {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl DotBounds {
    pub fn center(&self) -> (f64, f64) {
        let half = self.size / 2.0;
        (self.x + half, self.y + half)
    }
}

/// Trait for dot drawing surfaces.
pub trait DotSurface {
    /// Physical size of the backing store in device pixels.
    fn size(&self) -> (u32, u32);

    /// Resize the backing store. Contents are lost.
    fn resize(&mut self, width: u32, height: u32);

    /// Displayed (CSS) size in logical pixels, as last set.
    fn display_size(&self) -> (f64, f64);

    /// Set the displayed (CSS) size in logical pixels.
    fn set_display_size(&mut self, width: f64, height: f64);

    /// Replace the current transform: `device = point * scale + translate`.
    fn set_transform(&mut self, scale: f64, translate_x: f64, translate_y: f64);

    /// Fill the whole backing store with `color`, ignoring the transform.
    fn clear(&mut self, color: Rgb);

    /// Set the fill used by subsequent [`DotSurface::fill_dot`] calls.
    /// `bounds` anchors gradient fills to the dot.
    fn set_fill(&mut self, fill: &Fill, bounds: &DotBounds);

    /// Set (or with `None`, remove) the halo drawn by subsequent fills.
    fn set_glow(&mut self, glow: Option<&Glow>);

    /// Fill a dot with the current fill and glow.
    fn fill_dot(&mut self, bounds: &DotBounds);
}
