//! Platform-independent grid state and per-tick logic.
//!
//! Everything the browser wrapper does between events and frames goes through
//! [`GridState`]: pointer events update hover, focus changes retarget the
//! camera, and [`GridState::tick`] advances the camera and repaints. The wasm
//! layer only adds DOM plumbing and scheduling around it.

use serde::Deserialize;

use crate::camera::{CameraAnimator, NOMINAL_FRAME_MS};
use crate::layout::{
    cell_at, GridLayout, HitPolicy, ViewportSize, DEFAULT_CELL_SIZE, DEFAULT_GAP,
};
use crate::render::{
    ensure_surface_size, next_tick, render_frame, surface_size, ColorOverride, DotSurface,
    FrameInput, FrameStats, NextTick, PaintContext, SurfaceSize, Theme, ThemeConfig,
};

/// Construction options, as passed from JavaScript.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOptions {
    pub total_cells: u32,
    /// Signed so a negative value from the caller is clamped instead of
    /// rejected.
    pub passed_cells: i64,
    #[serde(default)]
    pub cell_size: Option<f64>,
    #[serde(default)]
    pub gap: Option<f64>,
    #[serde(default)]
    pub focus_index: Option<u32>,
    #[serde(default)]
    pub click_policy: HitPolicy,
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl GridOptions {
    pub fn new(total_cells: u32, passed_cells: i64) -> Self {
        Self {
            total_cells,
            passed_cells,
            cell_size: None,
            gap: None,
            focus_index: None,
            click_policy: HitPolicy::default(),
            theme: ThemeConfig::default(),
        }
    }
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// `None` when the surface had zero area and the draw was skipped.
    pub stats: Option<FrameStats>,
    pub next: NextTick,
}

/// Per-tick paint inputs that live outside the grid state.
pub struct FrameEnv<'a> {
    pub now_ms: f64,
    pub day_fraction: f64,
    pub theme: &'a Theme,
    pub color_override: Option<&'a dyn ColorOverride>,
}

/// Grid inputs, pointer state and camera.
#[derive(Debug, Clone)]
pub struct GridState {
    total_cells: u32,
    passed_cells: u32,
    cell_size: f64,
    gap: f64,
    container_width: f64,
    viewport: ViewportSize,
    dpr: f64,
    focus: Option<u32>,
    hovered: Option<u32>,
    click_policy: HitPolicy,
    theme_config: ThemeConfig,
    camera: CameraAnimator,
    last_tick_ms: Option<f64>,
}

impl GridState {
    pub fn new(options: &GridOptions) -> Self {
        let mut state = Self {
            total_cells: options.total_cells,
            passed_cells: clamp_passed(options.passed_cells),
            cell_size: options.cell_size.unwrap_or(DEFAULT_CELL_SIZE),
            gap: options.gap.unwrap_or(DEFAULT_GAP),
            container_width: 0.0,
            viewport: ViewportSize::new(0.0, 0.0),
            dpr: 1.0,
            focus: None,
            hovered: None,
            click_policy: options.click_policy,
            theme_config: options.theme.clone(),
            camera: CameraAnimator::new(),
            last_tick_ms: None,
        };
        state.set_focus(options.focus_index);
        state
    }

    pub fn total_cells(&self) -> u32 {
        self.total_cells
    }

    pub fn passed_cells(&self) -> u32 {
        self.passed_cells
    }

    pub fn focus(&self) -> Option<u32> {
        self.focus
    }

    pub fn hovered(&self) -> Option<u32> {
        self.hovered
    }

    pub fn camera(&self) -> &CameraAnimator {
        &self.camera
    }

    pub fn theme_config(&self) -> &ThemeConfig {
        &self.theme_config
    }

    /// Layout for the current inputs. Recomputed on demand, never stored.
    pub fn layout(&self) -> GridLayout {
        GridLayout::new(self.container_width, self.cell_size, self.gap)
    }

    /// Surface needed for the current inputs, `None` when zero-area.
    pub fn surface_size(&self) -> Option<SurfaceSize> {
        surface_size(
            &self.layout(),
            self.total_cells,
            self.container_width,
            self.viewport,
            self.dpr,
        )
    }

    pub fn set_cells(&mut self, total_cells: u32, passed_cells: i64) {
        self.total_cells = total_cells;
        self.passed_cells = clamp_passed(passed_cells);
        if self.hovered.is_some_and(|h| h >= total_cells) {
            self.hovered = None;
        }
        if self.focus.is_some_and(|f| f >= total_cells) {
            self.focus = None;
        }
    }

    /// Change dot size and/or gap. `None` restores the default.
    pub fn set_cell_size(&mut self, cell_size: Option<f64>, gap: Option<f64>) {
        self.cell_size = cell_size.unwrap_or(DEFAULT_CELL_SIZE);
        self.gap = gap.unwrap_or(DEFAULT_GAP);
    }

    pub fn set_click_policy(&mut self, policy: HitPolicy) {
        self.click_policy = policy;
    }

    pub fn set_theme_config(&mut self, config: ThemeConfig) {
        self.theme_config = config;
    }

    /// Focus a cell (or release focus with `None`). Hover is dropped while a
    /// focus is active. Out-of-range indices release focus.
    pub fn set_focus(&mut self, focus: Option<u32>) {
        let focus = match focus {
            Some(i) if i >= self.total_cells => {
                tracing::debug!(
                    index = i,
                    total = self.total_cells,
                    "ignoring out-of-range focus"
                );
                None
            }
            other => other,
        };
        self.focus = focus;
        if focus.is_some() {
            self.hovered = None;
        }
    }

    /// New container width, viewport and device pixel ratio.
    pub fn resize(
        &mut self,
        container_width: f64,
        viewport_width: f64,
        viewport_height: f64,
        dpr: f64,
    ) {
        self.container_width = if container_width.is_finite() {
            container_width.max(0.0)
        } else {
            0.0
        };
        self.viewport = ViewportSize::new(viewport_width, viewport_height);
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    }

    /// Pointer coordinates only map 1:1 onto the layout with no focus and the
    /// camera at rest on the identity transform.
    pub fn hit_testing_enabled(&self) -> bool {
        self.focus.is_none() && self.camera.is_identity_at_rest()
    }

    /// Update hover from a pointer position in surface coordinates.
    /// Returns whether the hovered cell changed.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        let hit = if self.hit_testing_enabled() {
            cell_at(&self.layout(), self.total_cells, x, y, HitPolicy::Loose)
        } else {
            None
        };
        let changed = hit != self.hovered;
        self.hovered = hit;
        changed
    }

    /// Clear hover. Returns whether anything was hovered.
    pub fn pointer_leave(&mut self) -> bool {
        self.hovered.take().is_some()
    }

    /// Cell hit by a click at a surface position, if any.
    pub fn click(&self, x: f64, y: f64) -> Option<u32> {
        if !self.hit_testing_enabled() {
            return None;
        }
        cell_at(&self.layout(), self.total_cells, x, y, self.click_policy)
    }

    /// Advance the camera to `now_ms`. Returns whether it is still moving.
    pub fn advance(&mut self, now_ms: f64) -> bool {
        let was_animating = self.camera.is_animating();
        let elapsed = self.last_tick_ms.map(|prev| now_ms - prev);
        self.last_tick_ms = Some(now_ms);

        let layout = self.layout();
        self.camera.retarget(self.focus, &layout, self.viewport);

        // A camera that was resting measures its first step as a nominal
        // frame, not as the idle gap since the previous redraw.
        let dt = match elapsed {
            Some(dt) if was_animating => dt,
            _ => NOMINAL_FRAME_MS,
        };
        self.camera.tick(dt)
    }

    /// Advance the camera and repaint `surface`.
    pub fn tick<S: DotSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        env: &FrameEnv<'_>,
    ) -> TickOutcome {
        let animating = self.advance(env.now_ms);
        let next = next_tick(animating);

        let Some(size) = self.surface_size() else {
            tracing::trace!("zero-area surface, skipping draw");
            return TickOutcome { stats: None, next };
        };
        ensure_surface_size(surface, &size);

        let layout = self.layout();
        let stats = render_frame(
            surface,
            &FrameInput {
                total_cells: self.total_cells,
                layout: &layout,
                transform: self.camera.current(),
                dpr: self.dpr,
                paint: PaintContext {
                    passed_cells: self.passed_cells,
                    theme: env.theme,
                    day_fraction: env.day_fraction,
                    hovered: self.hovered,
                    color_override: env.color_override,
                },
            },
        );
        TickOutcome {
            stats: Some(stats),
            next,
        }
    }
}

fn clamp_passed(passed: i64) -> u32 {
    u32::try_from(passed.max(0)).unwrap_or(u32::MAX)
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

    fn state() -> GridState {
        let mut s = GridState::new(&GridOptions::new(365, 100));
        s.resize(400.0, 400.0, 800.0, 1.0);
        s
    }

    #[test]
    fn test_negative_passed_is_clamped() {
        let s = GridState::new(&GridOptions::new(10, -4));
        assert_eq!(s.passed_cells(), 0);
    }

    #[test]
    fn test_out_of_range_focus_is_dropped() {
        let mut s = state();
        s.set_focus(Some(365));
        assert_eq!(s.focus(), None);
        s.set_focus(Some(364));
        assert_eq!(s.focus(), Some(364));
        s.set_cells(100, 10);
        assert_eq!(s.focus(), None);
    }

    #[test]
    fn test_hover_suppressed_while_focused() {
        let mut s = state();
        let (x, y) = s.layout().cell_center(3);
        assert!(s.pointer_move(x, y));
        assert_eq!(s.hovered(), Some(3));

        s.set_focus(Some(10));
        assert_eq!(s.hovered(), None);
        assert!(!s.pointer_move(x, y));
        assert_eq!(s.hovered(), None);
        assert_eq!(s.click(x, y), None);
    }

    #[test]
    fn test_hit_testing_waits_for_camera_to_settle() {
        let mut s = state();
        s.set_focus(Some(10));
        let mut now = 0.0;
        while s.advance(now) {
            now += 16.0;
        }
        s.set_focus(None);
        s.advance(now);
        assert!(!s.hit_testing_enabled());
        while s.advance(now) {
            now += 16.0;
        }
        assert!(s.hit_testing_enabled());
    }

    #[test]
    fn test_idle_gap_does_not_jump_camera() {
        let mut s = state();
        // Long idle before the focus arrives.
        s.advance(0.0);
        s.set_focus(Some(50));
        s.advance(60_000.0);
        let scale = s.camera().current().scale;
        let target = s.camera().target().scale;
        assert!(scale > 1.0);
        assert!(scale < target);
    }

    #[test]
    fn test_pointer_leave() {
        let mut s = state();
        let (x, y) = s.layout().cell_center(0);
        s.pointer_move(x, y);
        assert!(s.pointer_leave());
        assert!(!s.pointer_leave());
    }

    #[test]
    fn test_options_deserialize() {
        let options: GridOptions = serde_json::from_str(
            r##"{"totalCells":365,"passedCells":12,"cellSize":10,"clickPolicy":"strict","theme":{"today":"#f00"}}"##,
        )
        .unwrap();
        assert_eq!(options.total_cells, 365);
        assert_eq!(options.passed_cells, 12);
        assert_eq!(options.cell_size, Some(10.0));
        assert_eq!(options.gap, None);
        assert_eq!(options.click_policy, HitPolicy::Strict);
        assert_eq!(options.theme.today.as_deref(), Some("#f00"));
    }

    #[test]
    fn test_options_require_counts() {
        assert!(serde_json::from_str::<GridOptions>(r#"{"totalCells":3}"#).is_err());
    }
}
