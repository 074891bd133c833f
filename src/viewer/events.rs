//! Pointer listeners for `DotGrid`.
//!
//! Handlers translate client coordinates into canvas coordinates, update
//! [`GridState`](super::GridState) and request a redraw when the hovered cell
//! changes. JS callbacks are invoked only after the state borrow is released.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent};

use super::{schedule, Shared, SharedState};
use crate::error::{DotGridError, Result};

pub(crate) type MouseListener = (&'static str, Closure<dyn FnMut(MouseEvent)>);

/// Register mousemove, mouseleave and click on the canvas.
pub(crate) fn attach_listeners(
    canvas: &HtmlCanvasElement,
    shared: &Rc<Shared>,
) -> Result<Vec<MouseListener>> {
    let mut listeners: Vec<MouseListener> = Vec::with_capacity(3);

    // Mouse move (hover + cursor)
    {
        let weak_shared = Rc::downgrade(shared);
        let canvas_ref = canvas.clone();
        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            if let Some(shared) = weak_shared.upgrade() {
                let (x, y) = local_point(&canvas_ref, &event);
                pointer_move(&shared, x, y);
            }
        }) as Box<dyn FnMut(MouseEvent)>);
        listeners.push(("mousemove", closure));
    }

    // Mouse leave (clear hover)
    {
        let weak_shared = Rc::downgrade(shared);
        let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
            if let Some(shared) = weak_shared.upgrade() {
                pointer_leave(&shared);
            }
        }) as Box<dyn FnMut(MouseEvent)>);
        listeners.push(("mouseleave", closure));
    }

    // Click (onCellClick)
    {
        let weak_shared = Rc::downgrade(shared);
        let canvas_ref = canvas.clone();
        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            if let Some(shared) = weak_shared.upgrade() {
                let (x, y) = local_point(&canvas_ref, &event);
                click(&shared, x, y, event.client_x(), event.client_y());
            }
        }) as Box<dyn FnMut(MouseEvent)>);
        listeners.push(("click", closure));
    }

    for (name, closure) in &listeners {
        canvas
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            .map_err(|_| DotGridError::Dom(format!("Failed to add {name} listener")))?;
    }
    Ok(listeners)
}

/// Canvas-relative CSS pixel position of a mouse event.
fn local_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    (
        f64::from(event.client_x()) - rect.left(),
        f64::from(event.client_y()) - rect.top(),
    )
}

fn pointer_move(shared: &Rc<Shared>, x: f64, y: f64) {
    let changed = {
        if shared.destroyed.get() {
            return;
        }
        let Ok(mut s) = shared.state.try_borrow_mut() else {
            return;
        };
        let changed = s.grid.pointer_move(x, y);
        sync_cursor(&mut s);
        changed
    };
    if changed {
        schedule::request_frame(shared);
    }
}

fn pointer_leave(shared: &Rc<Shared>) {
    let changed = {
        if shared.destroyed.get() {
            return;
        }
        let Ok(mut s) = shared.state.try_borrow_mut() else {
            return;
        };
        let changed = s.grid.pointer_leave();
        sync_cursor(&mut s);
        changed
    };
    if changed {
        schedule::request_frame(shared);
    }
}

fn click(shared: &Rc<Shared>, x: f64, y: f64, client_x: i32, client_y: i32) {
    let hit = {
        if shared.destroyed.get() {
            return;
        }
        let Ok(s) = shared.state.try_borrow() else {
            return;
        };
        s.grid
            .click(x, y)
            .and_then(|index| s.on_cell_click.clone().map(|func| (index, func)))
    };
    let Some((index, func)) = hit else {
        return;
    };
    tracing::debug!(index, "cell clicked");
    if let Err(err) = func.call3(
        &JsValue::NULL,
        &JsValue::from(index),
        &JsValue::from(client_x),
        &JsValue::from(client_y),
    ) {
        tracing::debug!(index, ?err, "onCellClick threw");
    }
}

/// Show a pointer cursor while a cell is hovered.
pub(crate) fn sync_cursor(s: &mut SharedState) {
    let want_pointer = s.grid.hovered().is_some();
    if want_pointer == s.cursor_pointer {
        return;
    }
    s.cursor_pointer = want_pointer;
    let cursor = if want_pointer { "pointer" } else { "default" };
    let _ = s.renderer.canvas().style().set_property("cursor", cursor);
}
