//! `DotGrid` - the WASM-exported entry point.
//!
//! This module provides the platform-independent [`GridState`] (layout inputs,
//! hover, focus, camera) and, on `wasm32`, the `DotGrid` class that wires it to
//! a canvas:
//! - pointer listeners for hover, cursor feedback and clicks
//! - a `ResizeObserver` on the canvas parent
//! - a tick loop on `requestAnimationFrame` while the camera moves and an
//!   idle `setTimeout` otherwise
//!
//! Listeners and timers hold `Weak` references, so callbacks that arrive after
//! `destroy()` do nothing.

#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod schedule;
pub mod state;

pub use state::{FrameEnv, GridOptions, GridState, TickOutcome};

#[cfg(target_arch = "wasm32")]
use std::cell::{Cell, RefCell, RefMut};
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use js_sys::Function;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::{HtmlCanvasElement, ResizeObserver};

#[cfg(target_arch = "wasm32")]
use crate::clock::{day_fraction_now, now_ms};
#[cfg(target_arch = "wasm32")]
use crate::error::DotGridError;
#[cfg(target_arch = "wasm32")]
use crate::layout::HitPolicy;
#[cfg(target_arch = "wasm32")]
use crate::render::{
    CanvasRenderer, ColorOverride, ColorParseCache, FrameStats, Rgb, Theme, ThemeConfig,
};

/// CSS custom properties consulted for theme slots the caller left empty.
#[cfg(target_arch = "wasm32")]
const THEME_CSS_VARS: [(&str, ThemeSlot); 5] = [
    ("--dot-past", ThemeSlot::Past),
    ("--dot-today", ThemeSlot::Today),
    ("--dot-future", ThemeSlot::Future),
    ("--dot-background", ThemeSlot::Background),
    ("--dot-hover", ThemeSlot::Hover),
];

#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy)]
enum ThemeSlot {
    Past,
    Today,
    Future,
    Background,
    Hover,
}

/// JS `colorOverride(index) -> string | null`, with parsed colors memoized.
#[cfg(target_arch = "wasm32")]
pub(crate) struct JsColorOverride {
    func: Function,
    cache: RefCell<ColorParseCache>,
}

#[cfg(target_arch = "wasm32")]
impl JsColorOverride {
    fn new(func: Function) -> Self {
        Self {
            func,
            cache: RefCell::new(ColorParseCache::default()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl ColorOverride for JsColorOverride {
    fn color_for(&self, index: u32) -> Option<Rgb> {
        let value = match self.func.call1(&JsValue::NULL, &JsValue::from(index)) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(index, ?err, "color override threw, using default");
                return None;
            }
        };
        if value.is_null() || value.is_undefined() {
            return None;
        }
        let Some(css) = value.as_string() else {
            tracing::debug!(index, "color override returned a non-string, using default");
            return None;
        };
        let parsed = self.cache.try_borrow_mut().ok()?.resolve(&css);
        if parsed.is_none() {
            tracing::debug!(index, css = %css, "unparseable override color, using default");
        }
        parsed
    }
}

/// Mutable grid state behind [`Shared`] (wasm32 only)
#[cfg(target_arch = "wasm32")]
pub(crate) struct SharedState {
    pub(crate) grid: GridState,
    pub(crate) renderer: CanvasRenderer,
    /// Merged explicit + CSS theme config the cached `theme` was resolved from.
    pub(crate) theme_source: Option<ThemeConfig>,
    pub(crate) theme: Theme,
    pub(crate) color_override: Option<JsColorOverride>,
    pub(crate) on_cell_click: Option<Function>,
    /// Measure container, window and DPR each tick until `resize()` is called.
    pub(crate) auto_size: bool,
    pub(crate) cursor_pointer: bool,
    pub(crate) frame_id: Option<i32>,
    pub(crate) frame_closure: Option<Closure<dyn FnMut(f64)>>,
    pub(crate) timer_id: Option<i32>,
    pub(crate) timer_closure: Option<Closure<dyn FnMut()>>,
}

/// State reachable from listeners and scheduled callbacks.
///
/// `destroyed` lives outside the `RefCell` so `destroy()` takes effect even
/// when a JS callback invoked mid-tick calls it while the state is borrowed.
#[cfg(target_arch = "wasm32")]
pub(crate) struct Shared {
    pub(crate) destroyed: Cell<bool>,
    pub(crate) state: RefCell<SharedState>,
}

#[cfg(target_arch = "wasm32")]
impl SharedState {
    /// Re-read container width, window size and device pixel ratio.
    fn measure(&mut self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = self.renderer.canvas();
        let container_width = canvas
            .parent_element()
            .map(|parent| f64::from(parent.client_width()))
            .unwrap_or_else(|| f64::from(canvas.client_width()));
        let viewport_width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(container_width);
        let viewport_height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        self.grid.resize(
            container_width,
            viewport_width,
            viewport_height,
            window.device_pixel_ratio(),
        );
    }

    /// Theme slots declared as CSS custom properties on the canvas.
    fn css_theme(&self) -> ThemeConfig {
        let mut config = ThemeConfig::default();
        let Some(style) = web_sys::window()
            .and_then(|w| w.get_computed_style(self.renderer.canvas()).ok().flatten())
        else {
            return config;
        };
        for (name, slot) in THEME_CSS_VARS {
            let value = style
                .get_property_value(name)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
            let target = match slot {
                ThemeSlot::Past => &mut config.past,
                ThemeSlot::Today => &mut config.today,
                ThemeSlot::Future => &mut config.future,
                ThemeSlot::Background => &mut config.background,
                ThemeSlot::Hover => &mut config.hover,
            };
            *target = value;
        }
        config
    }

    /// Resolve explicit, CSS and default colors, reparsing only on change.
    fn refresh_theme(&mut self) {
        let source = self.grid.theme_config().or(&self.css_theme());
        if self.theme_source.as_ref() != Some(&source) {
            self.theme = Theme::resolve(&source);
            self.theme_source = Some(source);
        }
    }
}

/// The dot grid exported to JavaScript
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct DotGrid {
    shared: Rc<Shared>,
    canvas: HtmlCanvasElement,
    listeners: RefCell<Vec<events::MouseListener>>,
    resize_observer: RefCell<Option<ResizeObserver>>,
    // Kept alive while the observer is connected
    resize_closure: RefCell<Option<Closure<dyn FnMut(js_sys::Array)>>>,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl DotGrid {
    /// Create a grid drawing into `canvas`.
    ///
    /// Sizing is measured from the canvas parent and the window on every
    /// tick until `resize()` takes over. The first frame is requested
    /// immediately.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, options: JsValue) -> Result<DotGrid, JsValue> {
        console_error_panic_hook::set_once();

        let options: GridOptions = serde_wasm_bindgen::from_value(options)
            .map_err(|e| DotGridError::Options(e.to_string()))?;
        let renderer = CanvasRenderer::new(canvas.clone())?;

        tracing::debug!(
            total = options.total_cells,
            passed = options.passed_cells,
            "creating dot grid"
        );

        let shared = Rc::new(Shared {
            destroyed: Cell::new(false),
            state: RefCell::new(SharedState {
                grid: GridState::new(&options),
                renderer,
                theme_source: None,
                theme: Theme::default(),
                color_override: None,
                on_cell_click: None,
                auto_size: true,
                cursor_pointer: false,
                frame_id: None,
                frame_closure: None,
                timer_id: None,
                timer_closure: None,
            }),
        });

        let listeners = events::attach_listeners(&canvas, &shared)?;
        let (resize_observer, resize_closure) = Self::observe_parent(&canvas, &shared)?;

        schedule::request_frame(&shared);

        Ok(DotGrid {
            shared,
            canvas,
            listeners: RefCell::new(listeners),
            resize_observer: RefCell::new(resize_observer),
            resize_closure: RefCell::new(resize_closure),
        })
    }

    /// Replace the cell counts. Negative `passed` is treated as zero.
    #[wasm_bindgen(js_name = "setCells")]
    pub fn set_cells(&self, total: u32, passed: f64) {
        if let Some(mut s) = self.state_mut() {
            s.grid.set_cells(total, passed_from_js(passed));
        }
        schedule::request_frame(&self.shared);
    }

    /// Change dot size and gap; omitted values fall back to the defaults.
    #[wasm_bindgen(js_name = "setCellSize")]
    pub fn set_cell_size(&self, cell_size: Option<f64>, gap: Option<f64>) {
        if let Some(mut s) = self.state_mut() {
            s.grid.set_cell_size(cell_size, gap);
        }
        schedule::request_frame(&self.shared);
    }

    /// Zoom to a cell, or back out with `null`/`undefined`.
    #[wasm_bindgen(js_name = "setFocus")]
    pub fn set_focus(&self, index: Option<u32>) {
        if let Some(mut s) = self.state_mut() {
            s.grid.set_focus(index);
            events::sync_cursor(&mut s);
        }
        schedule::request_frame(&self.shared);
    }

    /// Install or remove the per-cell color callback.
    #[wasm_bindgen(js_name = "setColorOverride")]
    pub fn set_color_override(&self, func: Option<Function>) {
        if let Some(mut s) = self.state_mut() {
            s.color_override = func.map(JsColorOverride::new);
        }
        schedule::request_frame(&self.shared);
    }

    /// Install or remove `onCellClick(index, clientX, clientY)`.
    #[wasm_bindgen(js_name = "setOnCellClick")]
    pub fn set_on_cell_click(&self, func: Option<Function>) {
        if let Some(mut s) = self.state_mut() {
            s.on_cell_click = func;
        }
    }

    /// Switch between loose and strict click hit testing.
    #[wasm_bindgen(js_name = "setClickPolicy")]
    pub fn set_click_policy(&self, policy: JsValue) -> Result<(), JsValue> {
        let policy: HitPolicy = serde_wasm_bindgen::from_value(policy)
            .map_err(|e| DotGridError::Options(e.to_string()))?;
        if let Some(mut s) = self.state_mut() {
            s.grid.set_click_policy(policy);
        }
        Ok(())
    }

    /// Replace the explicit theme. Empty slots fall back to CSS variables,
    /// then to the built-in palette.
    #[wasm_bindgen(js_name = "setTheme")]
    pub fn set_theme(&self, theme: JsValue) -> Result<(), JsValue> {
        let config: ThemeConfig = if theme.is_null() || theme.is_undefined() {
            ThemeConfig::default()
        } else {
            serde_wasm_bindgen::from_value(theme)
                .map_err(|e| DotGridError::Options(e.to_string()))?
        };
        if let Some(mut s) = self.state_mut() {
            s.grid.set_theme_config(config);
        }
        schedule::request_frame(&self.shared);
        Ok(())
    }

    /// Set sizing explicitly. Disables automatic measurement.
    #[wasm_bindgen]
    pub fn resize(
        &self,
        container_width: f64,
        viewport_width: f64,
        viewport_height: f64,
        dpr: f64,
    ) {
        if let Some(mut s) = self.state_mut() {
            s.auto_size = false;
            s.grid.resize(container_width, viewport_width, viewport_height, dpr);
        }
        schedule::request_frame(&self.shared);
    }

    /// Draw on the next animation frame.
    #[wasm_bindgen(js_name = "requestRender")]
    pub fn request_render(&self) {
        schedule::request_frame(&self.shared);
    }

    /// Draw one frame now and arm the next tick. Returns the number of cells
    /// drawn, 0 when the frame was skipped or the grid is destroyed.
    #[wasm_bindgen(js_name = "renderNow")]
    pub fn render_now(&self) -> u32 {
        Self::run_tick(&self.shared).map_or(0, |stats| stats.cells_drawn)
    }

    /// Whether an animation frame or idle redraw is pending.
    #[wasm_bindgen(js_name = "isScheduled")]
    pub fn is_scheduled(&self) -> bool {
        self.shared
            .state
            .try_borrow()
            .is_ok_and(|s| s.frame_id.is_some() || s.timer_id.is_some())
    }

    /// Height the canvas needs, in CSS pixels.
    #[wasm_bindgen(js_name = "contentHeight")]
    pub fn content_height(&self) -> f64 {
        self.shared
            .state
            .try_borrow()
            .ok()
            .and_then(|s| s.grid.surface_size())
            .map_or(0.0, |size| size.css_height)
    }

    /// Cancel pending work, detach listeners and stop drawing.
    ///
    /// Safe to call more than once, including from `colorOverride` or
    /// `onCellClick` while a frame or click is being handled.
    #[wasm_bindgen]
    pub fn destroy(&self) {
        schedule::cancel_all(&self.shared);

        if let Ok(mut observer) = self.resize_observer.try_borrow_mut() {
            if let Some(observer) = observer.take() {
                observer.disconnect();
            }
        }
        if let Ok(mut closure) = self.resize_closure.try_borrow_mut() {
            *closure = None;
        }

        // Closures are only released once the canvas no longer references them.
        if let Ok(mut listeners) = self.listeners.try_borrow_mut() {
            listeners.retain(|(name, closure)| {
                let removed = self
                    .canvas
                    .remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
                if removed.is_err() {
                    tracing::warn!(event = *name, "failed to remove listener");
                }
                removed.is_err()
            });
        }
        let _ = self.canvas.style().remove_property("cursor");
        tracing::debug!("dot grid destroyed");
    }
}

#[cfg(target_arch = "wasm32")]
impl DotGrid {
    fn state_mut(&self) -> Option<RefMut<'_, SharedState>> {
        if self.shared.destroyed.get() {
            return None;
        }
        match self.shared.state.try_borrow_mut() {
            Ok(s) => Some(s),
            Err(_) => {
                tracing::warn!("dot grid called re-entrantly from a callback, ignoring");
                None
            }
        }
    }

    /// Watch the canvas parent so width changes trigger a redraw.
    #[allow(clippy::type_complexity)]
    fn observe_parent(
        canvas: &HtmlCanvasElement,
        shared: &Rc<Shared>,
    ) -> Result<(Option<ResizeObserver>, Option<Closure<dyn FnMut(js_sys::Array)>>), DotGridError>
    {
        let Some(parent) = canvas.parent_element() else {
            tracing::debug!("canvas has no parent, resize observer not installed");
            return Ok((None, None));
        };
        let weak_shared = Rc::downgrade(shared);
        let closure = Closure::wrap(Box::new(move |_entries: js_sys::Array| {
            if let Some(shared) = weak_shared.upgrade() {
                schedule::request_frame(&shared);
            }
        }) as Box<dyn FnMut(js_sys::Array)>);
        let observer = ResizeObserver::new(closure.as_ref().unchecked_ref())
            .map_err(|_| DotGridError::Dom("Failed to create ResizeObserver".into()))?;
        observer.observe(&parent);
        Ok((Some(observer), Some(closure)))
    }

    /// Advance and draw one frame, then arm the next tick.
    ///
    /// A `destroy()` from inside the frame (via `colorOverride`) is finished
    /// here once the borrow is released, and nothing is armed.
    pub(crate) fn run_tick(shared: &Rc<Shared>) -> Option<FrameStats> {
        if shared.destroyed.get() {
            return None;
        }
        let outcome = {
            let Ok(mut guard) = shared.state.try_borrow_mut() else {
                return None;
            };
            let s = &mut *guard;
            if s.auto_size {
                s.measure();
            }
            s.refresh_theme();

            let color_override = s.color_override.as_ref().map(|o| o as &dyn ColorOverride);
            let env = FrameEnv {
                now_ms: now_ms(),
                day_fraction: day_fraction_now(),
                theme: &s.theme,
                color_override,
            };
            let outcome = s.grid.tick(&mut s.renderer, &env);
            if let Some(stats) = outcome.stats {
                tracing::trace!(
                    cells = stats.cells_drawn,
                    glowing = stats.glowing,
                    "frame drawn"
                );
            }
            events::sync_cursor(s);
            outcome
        };
        if shared.destroyed.get() {
            schedule::cancel_all(shared);
            return outcome.stats;
        }
        schedule::arm(shared, outcome.next);
        outcome.stats
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for DotGrid {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// JS numbers arrive as `f64`; map to a signed count, NaN as zero.
#[cfg(target_arch = "wasm32")]
#[allow(clippy::cast_possible_truncation)]
fn passed_from_js(passed: f64) -> i64 {
    if passed.is_finite() {
        passed.trunc() as i64
    } else if passed > 0.0 {
        i64::MAX
    } else {
        0
    }
}
