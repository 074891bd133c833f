//! Camera zoom animation.
//!
//! The camera owns the transform applied before the grid is drawn and eases it
//! toward a target derived from the focused cell. Easing is expressed per
//! elapsed millisecond rather than per frame, so a 30 Hz, 60 Hz or throttled
//! callback cadence all trace the same curve.

use serde::Serialize;

use crate::layout::{GridLayout, ViewportSize};

/// Number of cell pitches visible across the short side of the viewport at
/// full zoom.
pub const ZOOM_CELLS: f64 = 5.0;

/// Fraction of the remaining distance covered per nominal frame.
pub const ZOOM_SPEED: f64 = 0.14;

/// Duration of the nominal frame `ZOOM_SPEED` is expressed against (ms).
pub const NOMINAL_FRAME_MS: f64 = 16.0;

/// Longest step a single tick may integrate (ms).
pub const MAX_TICK_MS: f64 = 1000.0;

/// Convergence threshold for `scale`.
pub const SCALE_EPSILON: f64 = 0.001;

/// Convergence threshold for the translation components (logical pixels).
pub const TRANSLATE_EPSILON: f64 = 0.5;

/// Camera transform: `screen = grid * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    /// Both transforms lie within the convergence thresholds of each other.
    pub fn approx_eq(&self, other: &Self) -> bool {
        (self.scale - other.scale).abs() <= SCALE_EPSILON
            && (self.translate_x - other.translate_x).abs() <= TRANSLATE_EPSILON
            && (self.translate_y - other.translate_y).abs() <= TRANSLATE_EPSILON
    }

    /// Move each component toward `target` by `factor` (0 = stay, 1 = arrive).
    fn step_toward(&mut self, target: &Self, factor: f64) {
        self.translate_x += (target.translate_x - self.translate_x) * factor;
        self.translate_y += (target.translate_y - self.translate_y) * factor;
        self.scale += (target.scale - self.scale) * factor;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Fraction of the remaining distance to cover after `dt_ms` milliseconds.
///
/// `1 - (1 - speed)^(dt / 16)`: two 8 ms ticks land exactly where one 16 ms
/// tick does.
pub fn damping_factor(speed: f64, dt_ms: f64) -> f64 {
    let dt = if dt_ms.is_finite() {
        dt_ms.clamp(0.0, MAX_TICK_MS)
    } else {
        NOMINAL_FRAME_MS
    };
    let retain = (1.0 - speed.clamp(0.0, 1.0)).powf(dt / NOMINAL_FRAME_MS);
    (1.0 - retain).clamp(0.0, 1.0)
}

/// Transform that centers `focus` in the viewport at full zoom, or the
/// identity when nothing is focused.
pub fn target_for(focus: Option<u32>, layout: &GridLayout, viewport: ViewportSize) -> Transform {
    let Some(index) = focus else {
        return Transform::IDENTITY;
    };
    if viewport.is_empty() {
        return Transform::IDENTITY;
    }

    let scale = (viewport.width.min(viewport.height) / (layout.cell_pitch * ZOOM_CELLS)).max(1.0);
    let (cell_x, cell_y) = layout.local_center(index);
    Transform {
        translate_x: viewport.width / 2.0 - (cell_x + layout.padding) * scale,
        translate_y: viewport.height / 2.0 - (cell_y + layout.padding) * scale,
        scale,
    }
}

/// Eases the camera transform toward the focused cell.
#[derive(Debug, Clone)]
pub struct CameraAnimator {
    current: Transform,
    target: Transform,
    speed: f64,
    animating: bool,
}

impl Default for CameraAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraAnimator {
    pub fn new() -> Self {
        Self::with_speed(ZOOM_SPEED)
    }

    pub fn with_speed(speed: f64) -> Self {
        Self {
            current: Transform::IDENTITY,
            target: Transform::IDENTITY,
            speed: speed.clamp(0.01, 1.0),
            animating: false,
        }
    }

    pub fn current(&self) -> Transform {
        self.current
    }

    pub fn target(&self) -> Transform {
        self.target
    }

    /// True until the transform has snapped onto its target.
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// At rest on the identity transform: screen and surface coordinates agree.
    pub fn is_identity_at_rest(&self) -> bool {
        !self.animating && self.current == Transform::IDENTITY
    }

    /// Recompute the target from the current focus and geometry.
    ///
    /// Only the target moves; the current transform keeps its progress so a
    /// focus change mid-flight bends the path instead of restarting it.
    /// Returns `true` when the target changed.
    pub fn retarget(
        &mut self,
        focus: Option<u32>,
        layout: &GridLayout,
        viewport: ViewportSize,
    ) -> bool {
        let target = target_for(focus, layout, viewport);
        if target == self.target {
            return false;
        }
        tracing::debug!(
            ?focus,
            scale = target.scale,
            tx = target.translate_x,
            ty = target.translate_y,
            "camera retarget"
        );
        self.target = target;
        self.animating = self.current != target;
        true
    }

    /// Advance the animation by `dt_ms`. Returns whether more ticks are needed.
    pub fn tick(&mut self, dt_ms: f64) -> bool {
        if !self.animating {
            return false;
        }
        let factor = damping_factor(self.speed, dt_ms);
        let target = self.target;
        self.current.step_toward(&target, factor);
        if self.current.approx_eq(&target) {
            self.current = target;
            self.animating = false;
            tracing::trace!("camera converged");
        }
        self.animating
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

    fn layout() -> GridLayout {
        GridLayout::new(400.0, 12.0, 6.0)
    }

    fn viewport() -> ViewportSize {
        ViewportSize::new(400.0, 800.0)
    }

    #[test]
    fn test_damping_factor_frame_rate_independent() {
        let one = damping_factor(ZOOM_SPEED, 16.0);
        let half = damping_factor(ZOOM_SPEED, 8.0);
        let two_halves = 1.0 - (1.0 - half) * (1.0 - half);
        assert!((one - two_halves).abs() < 1e-12);
        assert!((one - ZOOM_SPEED).abs() < 1e-12);
    }

    #[test]
    fn test_damping_factor_bounds() {
        assert_eq!(damping_factor(ZOOM_SPEED, 0.0), 0.0);
        assert_eq!(damping_factor(ZOOM_SPEED, -50.0), 0.0);
        assert!(damping_factor(ZOOM_SPEED, f64::INFINITY) > 0.0);
        assert!(damping_factor(ZOOM_SPEED, 1e9) <= 1.0);
    }

    #[test]
    fn test_target_for_none_is_identity() {
        assert_eq!(target_for(None, &layout(), viewport()), Transform::IDENTITY);
    }

    #[test]
    fn test_target_centers_cell() {
        let l = layout();
        let vp = viewport();
        let t = target_for(Some(42), &l, vp);
        assert!((t.scale - 400.0 / (18.0 * ZOOM_CELLS)).abs() < 1e-9);
        let (cx, cy) = l.cell_center(42);
        let screen_x = cx * t.scale + t.translate_x;
        let screen_y = cy * t.scale + t.translate_y;
        assert!((screen_x - 200.0).abs() < 1e-9);
        assert!((screen_y - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_target_scale_never_below_one() {
        let t = target_for(Some(0), &layout(), ViewportSize::new(20.0, 20.0));
        assert_eq!(t.scale, 1.0);
    }

    #[test]
    fn test_converges_and_stays() {
        let mut camera = CameraAnimator::new();
        camera.retarget(Some(100), &layout(), viewport());
        assert!(camera.is_animating());

        let mut ticks = 0;
        while camera.tick(16.0) {
            ticks += 1;
            assert!(ticks < 1000, "camera never converged");
        }
        assert_eq!(camera.current(), camera.target());

        let settled = camera.current();
        assert!(!camera.tick(16.0));
        assert!(!camera.tick(250.0));
        assert_eq!(camera.current(), settled);
    }

    #[test]
    fn test_retarget_keeps_progress() {
        let mut camera = CameraAnimator::new();
        camera.retarget(Some(100), &layout(), viewport());
        for _ in 0..5 {
            camera.tick(16.0);
        }
        let mid = camera.current();
        assert!(mid.scale > 1.0);

        camera.retarget(Some(5), &layout(), viewport());
        assert_eq!(camera.current(), mid);
        camera.tick(16.0);
        assert!(camera.current().scale > 1.0);
    }

    #[test]
    fn test_retarget_same_target_is_noop() {
        let mut camera = CameraAnimator::new();
        assert!(!camera.retarget(None, &layout(), viewport()));
        assert!(camera.is_identity_at_rest());
        assert!(camera.retarget(Some(3), &layout(), viewport()));
        assert!(!camera.retarget(Some(3), &layout(), viewport()));
    }

    #[test]
    fn test_returns_to_identity() {
        let mut camera = CameraAnimator::new();
        camera.retarget(Some(7), &layout(), viewport());
        while camera.tick(16.0) {}
        camera.retarget(None, &layout(), viewport());
        assert!(!camera.is_identity_at_rest());
        while camera.tick(33.0) {}
        assert!(camera.is_identity_at_rest());
    }
}
