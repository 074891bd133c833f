//! Canvas 2D implementation of [`DotSurface`].

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::{DotGridError, Result};
use crate::render::backend::{DotBounds, DotSurface};
use crate::render::colors::Rgb;
use crate::render::paint::{Fill, Glow};

/// Shadow color that disables the halo even if a blur is left set.
const NO_SHADOW: &str = "rgba(0, 0, 0, 0)";

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    display: (f64, f64),
}

impl CanvasRenderer {
    /// Create a new Canvas renderer from an HtmlCanvasElement
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| DotGridError::Context("Failed to get 2d context".into()))?
            .ok_or_else(|| DotGridError::Context("No 2d context available".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| {
                DotGridError::Context("Failed to cast to CanvasRenderingContext2d".into())
            })?;
        Ok(Self {
            canvas,
            ctx,
            display: (0.0, 0.0),
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Gradient stop offsets are single precision in the Canvas API.
    #[allow(clippy::cast_possible_truncation)]
    fn stop(offset: f64) -> f32 {
        offset.clamp(0.0, 1.0) as f32
    }
}

impl DotSurface for CanvasRenderer {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn display_size(&self) -> (f64, f64) {
        self.display
    }

    fn set_display_size(&mut self, width: f64, height: f64) {
        self.display = (width, height);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{width}px"));
        let _ = style.set_property("height", &format!("{height}px"));
    }

    fn set_transform(&mut self, scale: f64, translate_x: f64, translate_y: f64) {
        let _ = self
            .ctx
            .set_transform(scale, 0.0, 0.0, scale, translate_x, translate_y);
    }

    fn clear(&mut self, color: Rgb) {
        self.ctx.set_fill_style_str(&color.to_hex());
        self.ctx.fill_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
    }

    fn set_fill(&mut self, fill: &Fill, bounds: &DotBounds) {
        match *fill {
            Fill::Solid(color) => self.ctx.set_fill_style_str(&color.to_hex()),
            Fill::DaySplit { bright, dim, split } => {
                let gradient = self.ctx.create_linear_gradient(
                    bounds.x,
                    bounds.y,
                    bounds.x,
                    bounds.y + bounds.size,
                );
                let bright = bright.to_hex();
                let dim = dim.to_hex();
                // Two stops at the same offset give a hard edge.
                let _ = gradient.add_color_stop(0.0, &bright);
                let _ = gradient.add_color_stop(Self::stop(split), &bright);
                let _ = gradient.add_color_stop(Self::stop(split), &dim);
                let _ = gradient.add_color_stop(1.0, &dim);
                self.ctx.set_fill_style_canvas_gradient(&gradient);
            }
        }
    }

    fn set_glow(&mut self, glow: Option<&Glow>) {
        match glow {
            Some(glow) => {
                self.ctx.set_shadow_color(&glow.color.to_hex());
                self.ctx.set_shadow_blur(glow.blur);
            }
            None => {
                self.ctx.set_shadow_blur(0.0);
                self.ctx.set_shadow_color(NO_SHADOW);
            }
        }
    }

    fn fill_dot(&mut self, bounds: &DotBounds) {
        let (cx, cy) = bounds.center();
        self.ctx.begin_path();
        let _ = self.ctx.arc(cx, cy, bounds.size / 2.0, 0.0, TAU);
        self.ctx.fill();
    }
}
