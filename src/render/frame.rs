//! Per-frame composition: surface sizing, repaint, and the next-tick decision.

use serde::Serialize;

use super::backend::{DotBounds, DotSurface};
use super::paint::{resolve_paint, Glow, PaintContext};
use crate::camera::Transform;
use crate::layout::{GridLayout, ViewportSize};

/// Interval of the idle redraw that keeps the today split current (ms).
pub const IDLE_REDRAW_MS: u32 = 60_000;

/// Logical and physical size of the backing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceSize {
    pub css_width: f64,
    pub css_height: f64,
    pub width: u32,
    pub height: u32,
}

/// Surface needed to show every row at `dpr`, or `None` when either side
/// would be empty (the frame is skipped rather than resizing to zero).
pub fn surface_size(
    layout: &GridLayout,
    total_cells: u32,
    container_width: f64,
    viewport: ViewportSize,
    dpr: f64,
) -> Option<SurfaceSize> {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    let css_width = if container_width.is_finite() {
        container_width.max(0.0)
    } else {
        0.0
    };
    let css_height = layout.required_height(total_cells, viewport.height);
    let width = round_to_u32(css_width * dpr);
    let height = round_to_u32(css_height * dpr);
    if width == 0 || height == 0 {
        return None;
    }
    Some(SurfaceSize {
        css_width,
        css_height,
        width,
        height,
    })
}

/// Bring `surface` to `size`. The backing store is resized only when the
/// physical size differs; the display size is updated whenever the CSS size
/// differs, which also covers a DPR change that leaves the physical size
/// unchanged. Returns whether the backing store was resized.
#[allow(clippy::float_cmp)]
pub fn ensure_surface_size<S: DotSurface + ?Sized>(surface: &mut S, size: &SurfaceSize) -> bool {
    let resized = surface.size() != (size.width, size.height);
    if resized {
        tracing::debug!(
            width = size.width,
            height = size.height,
            "resizing surface"
        );
        surface.resize(size.width, size.height);
    }
    if resized || surface.display_size() != (size.css_width, size.css_height) {
        surface.set_display_size(size.css_width, size.css_height);
    }
    resized
}

/// What the scheduler should arm after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextTick {
    /// The camera is still moving; draw again on the next frame.
    AnimationFrame,
    /// Nothing moves; redraw after `delay_ms` so the today split keeps up with
    /// the clock.
    Idle { delay_ms: u32 },
}

pub fn next_tick(camera_animating: bool) -> NextTick {
    if camera_animating {
        NextTick::AnimationFrame
    } else {
        NextTick::Idle {
            delay_ms: IDLE_REDRAW_MS,
        }
    }
}

/// Inputs for one repaint.
pub struct FrameInput<'a> {
    pub total_cells: u32,
    pub layout: &'a GridLayout,
    pub transform: Transform,
    pub dpr: f64,
    pub paint: PaintContext<'a>,
}

/// Summary of a repaint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStats {
    pub cells_drawn: u32,
    pub glowing: u32,
}

/// Repaint the whole grid.
///
/// Clears to the background under the device-pixel transform, applies the
/// camera, then draws every dot. Each dot sets its own fill and glow and
/// clears the glow afterwards, so no paint state carries over to the next dot.
pub fn render_frame<S: DotSurface + ?Sized>(surface: &mut S, input: &FrameInput<'_>) -> FrameStats {
    let dpr = if input.dpr.is_finite() && input.dpr > 0.0 {
        input.dpr
    } else {
        1.0
    };
    let camera = input.transform;
    let layout = input.layout;

    surface.set_transform(1.0, 0.0, 0.0);
    surface.clear(input.paint.theme.background);
    surface.set_transform(
        dpr * camera.scale,
        dpr * camera.translate_x,
        dpr * camera.translate_y,
    );

    // Shadow blur is specified in device pixels, not in transformed space.
    let blur_scale = dpr * camera.scale;

    let mut stats = FrameStats::default();
    for index in 0..input.total_cells {
        let (x, y) = layout.cell_origin(index);
        let bounds = DotBounds {
            x,
            y,
            size: layout.cell_size,
        };
        let paint = resolve_paint(index, &input.paint);
        let glow = paint.glow.map(|g| Glow {
            blur: g.blur * blur_scale,
            ..g
        });

        surface.set_fill(&paint.fill, &bounds);
        surface.set_glow(glow.as_ref());
        surface.fill_dot(&bounds);
        if glow.is_some() {
            stats.glowing += 1;
        }
        surface.set_glow(None);
        stats.cells_drawn += 1;
    }
    stats
}

/// Round a non-negative float to `u32`, saturating at the bounds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_to_u32(v: f64) -> u32 {
    if !v.is_finite() || v <= 0.0 {
        return 0;
    }
    v.round().min(f64::from(u32::MAX)) as u32
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
    use crate::render::paint::{ColorOverride, Fill};
    use crate::render::recorder::{RecordingSurface, SurfaceOp};
    use crate::render::{Rgb, Theme};

    fn layout() -> GridLayout {
        GridLayout::new(400.0, 12.0, 6.0)
    }

    #[test]
    fn test_surface_size_scales_by_dpr() {
        let size = surface_size(&layout(), 365, 400.0, ViewportSize::new(400.0, 300.0), 2.0)
            .unwrap();
        // 19 rows: 19*18 - 6 + 32 = 368
        assert_eq!(size.css_height, 368.0);
        assert_eq!(size.width, 800);
        assert_eq!(size.height, 736);
    }

    #[test]
    fn test_surface_size_floors_to_viewport() {
        let size =
            surface_size(&layout(), 7, 400.0, ViewportSize::new(400.0, 900.0), 1.0).unwrap();
        assert_eq!(size.css_height, 900.0);
        assert_eq!(size.height, 900);
    }

    #[test]
    fn test_zero_area_is_skipped() {
        assert!(surface_size(&layout(), 7, 0.0, ViewportSize::new(0.0, 900.0), 1.0).is_none());
        assert!(surface_size(&layout(), 7, -3.0, ViewportSize::new(0.0, 900.0), 2.0).is_none());
    }

    #[test]
    fn test_ensure_surface_size_only_on_change() {
        let mut surface = RecordingSurface::new();
        let size = surface_size(&layout(), 365, 400.0, ViewportSize::new(400.0, 300.0), 1.0)
            .unwrap();
        assert!(ensure_surface_size(&mut surface, &size));
        assert!(!ensure_surface_size(&mut surface, &size));
        let resizes = surface
            .ops()
            .iter()
            .filter(|op| matches!(op, SurfaceOp::Resize { .. }))
            .count();
        assert_eq!(resizes, 1);
        let display_sizes = surface
            .ops()
            .iter()
            .filter(|op| matches!(op, SurfaceOp::DisplaySize { .. }))
            .count();
        assert_eq!(display_sizes, 1);
    }

    #[test]
    fn test_ensure_surface_size_follows_css_size_at_same_backing_size() {
        let mut surface = RecordingSurface::new();
        let wide = surface_size(&layout(), 365, 800.0, ViewportSize::new(800.0, 800.0), 1.0)
            .unwrap();
        let dense = surface_size(&layout(), 365, 400.0, ViewportSize::new(400.0, 400.0), 2.0)
            .unwrap();
        assert_eq!((wide.width, wide.height), (dense.width, dense.height));
        assert!(ensure_surface_size(&mut surface, &wide));
        surface.clear_ops();
        assert!(!ensure_surface_size(&mut surface, &dense));
        assert_eq!(
            surface.ops(),
            &[SurfaceOp::DisplaySize {
                width: dense.css_width,
                height: dense.css_height,
            }]
        );
        assert_eq!(surface.display_size(), (dense.css_width, dense.css_height));
    }

    #[test]
    fn test_next_tick() {
        assert_eq!(next_tick(true), NextTick::AnimationFrame);
        assert_eq!(
            next_tick(false),
            NextTick::Idle {
                delay_ms: IDLE_REDRAW_MS
            }
        );
    }

    #[test]
    fn test_render_draws_every_cell() {
        let theme = Theme::default();
        let l = layout();
        let mut surface = RecordingSurface::new();
        let stats = render_frame(
            &mut surface,
            &FrameInput {
                total_cells: 365,
                layout: &l,
                transform: Transform::IDENTITY,
                dpr: 2.0,
                paint: PaintContext {
                    passed_cells: 100,
                    theme: &theme,
                    day_fraction: 0.25,
                    hovered: None,
                    color_override: None,
                },
            },
        );
        assert_eq!(stats.cells_drawn, 365);
        assert_eq!(stats.glowing, 1);
        assert_eq!(surface.dots().len(), 365);
        assert_eq!(surface.ops().first(), Some(&SurfaceOp::Transform {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0
        }));
    }

    #[test]
    fn test_glow_does_not_leak_to_next_dot() {
        let theme = Theme::default();
        let l = layout();
        let green = Rgb::new(0x22, 0xC5, 0x5E);
        // Cell 0 glows (distinct override color), cell 1 is plain past.
        let marks = move |i: u32| if i == 0 { Some(green) } else { None };
        let marks: &dyn ColorOverride = &marks;
        let mut surface = RecordingSurface::new();
        render_frame(
            &mut surface,
            &FrameInput {
                total_cells: 2,
                layout: &l,
                transform: Transform::IDENTITY,
                dpr: 1.0,
                paint: PaintContext {
                    passed_cells: 5,
                    theme: &theme,
                    day_fraction: 0.0,
                    hovered: None,
                    color_override: Some(marks),
                },
            },
        );
        let dots = surface.dots();
        assert_eq!(dots[0].fill, Fill::Solid(green));
        assert!(dots[0].glow.is_some());
        assert_eq!(dots[1].fill, Fill::Solid(theme.past));
        assert_eq!(dots[1].glow, None);
    }

    #[test]
    fn test_camera_transform_applied_after_dpr() {
        let theme = Theme::default();
        let l = layout();
        let mut surface = RecordingSurface::new();
        render_frame(
            &mut surface,
            &FrameInput {
                total_cells: 1,
                layout: &l,
                transform: Transform {
                    translate_x: -10.0,
                    translate_y: 5.0,
                    scale: 3.0,
                },
                dpr: 2.0,
                paint: PaintContext {
                    passed_cells: 0,
                    theme: &theme,
                    day_fraction: 0.5,
                    hovered: None,
                    color_override: None,
                },
            },
        );
        let dot = surface.dots()[0];
        assert_eq!(dot.scale, 6.0);
        assert_eq!(dot.translate, (-20.0, 10.0));
        // Today glows; blur grows with the effective scale.
        assert_eq!(
            dot.glow.map(|g| g.blur),
            Some(crate::render::paint::GLOW_BLUR * 6.0)
        );
    }
}
