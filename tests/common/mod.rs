//! Common test utilities for dotgrid integration tests.
//!
//! Builders for grid state and helpers to drive the tick loop against a
//! recording surface at a fixed frame rate.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use dotgrid::camera::NOMINAL_FRAME_MS;
use dotgrid::render::{ColorOverride, DrawnDot, Theme};
use dotgrid::{FrameEnv, GridOptions, GridState, RecordingSurface, TickOutcome};

/// Container width used by most tests: 20 columns at the default dot size.
pub const CONTAINER_WIDTH: f64 = 400.0;
pub const VIEWPORT_WIDTH: f64 = 400.0;
pub const VIEWPORT_HEIGHT: f64 = 800.0;

/// Give up on convergence after this many simulated frames.
pub const MAX_TICKS: u32 = 2_000;

/// Grid sized to the standard test container at DPR 1.
pub fn grid(total: u32, passed: i64) -> GridState {
    let mut state = GridState::new(&GridOptions::new(total, passed));
    state.resize(CONTAINER_WIDTH, VIEWPORT_WIDTH, VIEWPORT_HEIGHT, 1.0);
    state
}

/// Drives a [`GridState`] at a fixed frame interval.
pub struct Driver {
    pub state: GridState,
    pub surface: RecordingSurface,
    pub theme: Theme,
    pub day_fraction: f64,
    pub now_ms: f64,
    pub frame_ms: f64,
}

impl Driver {
    pub fn new(state: GridState) -> Self {
        Self {
            state,
            surface: RecordingSurface::new(),
            theme: Theme::default(),
            day_fraction: 0.5,
            now_ms: 0.0,
            frame_ms: NOMINAL_FRAME_MS,
        }
    }

    pub fn with_frame_ms(mut self, frame_ms: f64) -> Self {
        self.frame_ms = frame_ms;
        self
    }

    /// One tick; only this frame's operations are kept on the surface.
    pub fn tick_with(&mut self, color_override: Option<&dyn ColorOverride>) -> TickOutcome {
        self.surface.clear_ops();
        let env = FrameEnv {
            now_ms: self.now_ms,
            day_fraction: self.day_fraction,
            theme: &self.theme,
            color_override,
        };
        let outcome = self.state.tick(&mut self.surface, &env);
        self.now_ms += self.frame_ms;
        outcome
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.tick_with(None)
    }

    /// Tick until the camera rests. Returns the number of ticks taken.
    pub fn settle(&mut self) -> u32 {
        let mut ticks = 0;
        loop {
            self.tick();
            ticks += 1;
            if !self.state.camera().is_animating() {
                return ticks;
            }
            assert!(ticks < MAX_TICKS, "camera did not converge");
        }
    }

    pub fn dots(&self) -> Vec<DrawnDot> {
        self.surface.dots()
    }
}
