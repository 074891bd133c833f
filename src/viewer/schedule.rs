//! Frame and idle-timer scheduling for `DotGrid`.
//!
//! At most one animation frame and one idle timer are pending at a time.
//! Requesting a frame cancels the idle timer; the timer is only armed after a
//! tick that leaves the camera at rest. Both callbacks are created once and
//! hold `Weak` references to the shared state.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use super::{DotGrid, Shared};
use crate::render::NextTick;

/// Draw on the next animation frame unless one is already pending.
pub(crate) fn request_frame(shared: &Rc<Shared>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if shared.destroyed.get() {
        return;
    }
    let Ok(mut s) = shared.state.try_borrow_mut() else {
        return;
    };
    if s.frame_id.is_some() {
        return;
    }
    if let Some(timer_id) = s.timer_id.take() {
        window.clear_timeout_with_handle(timer_id);
    }
    if s.frame_closure.is_none() {
        let weak_shared = Rc::downgrade(shared);
        let closure = Closure::wrap(Box::new(move |_timestamp: f64| {
            if let Some(shared) = weak_shared.upgrade() {
                if let Ok(mut s) = shared.state.try_borrow_mut() {
                    s.frame_id = None;
                }
                DotGrid::run_tick(&shared);
            }
        }) as Box<dyn FnMut(f64)>);
        s.frame_closure = Some(closure);
    }
    let Some(callback) = s.frame_closure.as_ref() else {
        return;
    };
    match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
        Ok(id) => s.frame_id = Some(id),
        Err(err) => {
            tracing::warn!(?err, "requestAnimationFrame failed");
            s.frame_id = None;
        }
    }
}

/// Arm whatever the last tick asked for.
pub(crate) fn arm(shared: &Rc<Shared>, next: NextTick) {
    match next {
        NextTick::AnimationFrame => request_frame(shared),
        NextTick::Idle { delay_ms } => arm_idle_timer(shared, delay_ms),
    }
}

fn arm_idle_timer(shared: &Rc<Shared>, delay_ms: u32) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if shared.destroyed.get() {
        return;
    }
    let Ok(mut s) = shared.state.try_borrow_mut() else {
        return;
    };
    // A frame requested during the tick supersedes the idle redraw.
    if s.frame_id.is_some() {
        return;
    }
    if let Some(timer_id) = s.timer_id.take() {
        window.clear_timeout_with_handle(timer_id);
    }
    if s.timer_closure.is_none() {
        let weak_shared = Rc::downgrade(shared);
        let closure = Closure::wrap(Box::new(move || {
            if let Some(shared) = weak_shared.upgrade() {
                if let Ok(mut s) = shared.state.try_borrow_mut() {
                    s.timer_id = None;
                }
                DotGrid::run_tick(&shared);
            }
        }) as Box<dyn FnMut()>);
        s.timer_closure = Some(closure);
    }
    let Some(callback) = s.timer_closure.as_ref() else {
        return;
    };
    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        delay,
    ) {
        Ok(id) => s.timer_id = Some(id),
        Err(err) => {
            tracing::warn!(?err, "setTimeout failed");
            s.timer_id = None;
        }
    }
}

/// Refuse further scheduling, then cancel the pending frame and timer and
/// release the callbacks.
///
/// While a tick holds the state only the flag is set; the tick calls this
/// again once it has released the borrow.
pub(crate) fn cancel_all(shared: &Rc<Shared>) {
    shared.destroyed.set(true);
    let Ok(mut s) = shared.state.try_borrow_mut() else {
        return;
    };
    if let Some(window) = web_sys::window() {
        if let Some(frame_id) = s.frame_id.take() {
            let _ = window.cancel_animation_frame(frame_id);
        }
        if let Some(timer_id) = s.timer_id.take() {
            window.clear_timeout_with_handle(timer_id);
        }
    }
    // The callbacks may be mid-invocation; wasm-bindgen defers their release.
    s.frame_closure = None;
    s.timer_closure = None;
    s.color_override = None;
    s.on_cell_click = None;
}
