//! In-memory surface that records what a frame draws.
//!
//! Behaves like a 2D canvas context (fill and glow are sticky until changed)
//! and logs every operation, which makes it usable for the CLI's JSON dump,
//! for benches, and for asserting on paint state in tests.

use serde::Serialize;

use super::backend::{DotBounds, DotSurface};
use super::colors::Rgb;
use super::paint::{Fill, Glow};

/// A dot as it was filled, with the paint state active at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawnDot {
    pub bounds: DotBounds,
    pub fill: Fill,
    pub glow: Option<Glow>,
    pub scale: f64,
    pub translate: (f64, f64),
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum SurfaceOp {
    Resize {
        width: u32,
        height: u32,
    },
    DisplaySize {
        width: f64,
        height: f64,
    },
    #[serde(rename_all = "camelCase")]
    Transform {
        scale: f64,
        translate_x: f64,
        translate_y: f64,
    },
    Clear {
        color: Rgb,
    },
    Dot(DrawnDot),
}

/// Recording [`DotSurface`].
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    display: (f64, f64),
    scale: f64,
    translate: (f64, f64),
    fill: Fill,
    glow: Option<Glow>,
    ops: Vec<SurfaceOp>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            display: (0.0, 0.0),
            scale: 1.0,
            translate: (0.0, 0.0),
            fill: Fill::Solid(Rgb::default()),
            glow: None,
            ops: Vec::new(),
        }
    }

    /// Every recorded operation, oldest first.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Only the filled dots, oldest first.
    pub fn dots(&self) -> Vec<DrawnDot> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Dot(dot) => Some(*dot),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded operations but keep size and paint state.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }
}

impl DotSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        // A canvas resize resets its context state.
        self.scale = 1.0;
        self.translate = (0.0, 0.0);
        self.fill = Fill::Solid(Rgb::default());
        self.glow = None;
        self.ops.push(SurfaceOp::Resize { width, height });
    }

    fn display_size(&self) -> (f64, f64) {
        self.display
    }

    fn set_display_size(&mut self, width: f64, height: f64) {
        self.display = (width, height);
        self.ops.push(SurfaceOp::DisplaySize { width, height });
    }

    fn set_transform(&mut self, scale: f64, translate_x: f64, translate_y: f64) {
        self.scale = scale;
        self.translate = (translate_x, translate_y);
        self.ops.push(SurfaceOp::Transform {
            scale,
            translate_x,
            translate_y,
        });
    }

    fn clear(&mut self, color: Rgb) {
        self.ops.push(SurfaceOp::Clear { color });
    }

    fn set_fill(&mut self, fill: &Fill, _bounds: &DotBounds) {
        self.fill = *fill;
    }

    fn set_glow(&mut self, glow: Option<&Glow>) {
        self.glow = glow.copied();
    }

    fn fill_dot(&mut self, bounds: &DotBounds) {
        self.ops.push(SurfaceOp::Dot(DrawnDot {
            bounds: *bounds,
            fill: self.fill,
            glow: self.glow,
            scale: self.scale,
            translate: self.translate,
        }));
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_glow_is_sticky_until_reset() {
        let mut s = RecordingSurface::new();
        let bounds = DotBounds {
            x: 0.0,
            y: 0.0,
            size: 10.0,
        };
        let glow = Glow {
            color: Rgb::new(1, 2, 3),
            blur: 4.0,
        };
        s.set_glow(Some(&glow));
        s.fill_dot(&bounds);
        s.fill_dot(&bounds);
        s.set_glow(None);
        s.fill_dot(&bounds);
        let dots = s.dots();
        assert_eq!(dots[0].glow, Some(glow));
        assert_eq!(dots[1].glow, Some(glow));
        assert_eq!(dots[2].glow, None);
    }

    #[test]
    fn test_resize_resets_state() {
        let mut s = RecordingSurface::new();
        s.set_transform(2.0, 1.0, 1.0);
        s.resize(10, 20);
        assert_eq!(s.size(), (10, 20));
        s.fill_dot(&DotBounds {
            x: 0.0,
            y: 0.0,
            size: 1.0,
        });
        assert_eq!(s.dots()[0].scale, 1.0);
    }
}
