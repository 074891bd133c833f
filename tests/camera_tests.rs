//! Camera and interaction tests for dotgrid
//!
//! Drives `GridState` through the tick loop: clicking, focusing, zooming
//! back out, and frame-rate independence of the easing.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{grid, Driver, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use dotgrid::camera::{Transform, ZOOM_CELLS};
use dotgrid::render::NextTick;

#[test]
fn test_click_then_focus_zooms_monotonically() {
    let mut driver = Driver::new(grid(365, 100));
    driver.tick();

    // At rest on the identity transform, the click maps straight to a cell.
    let (x, y) = driver.state.layout().cell_center(100);
    assert_eq!(driver.state.click(x, y), Some(100));

    // The caller reacts to the click by focusing the cell.
    driver.state.set_focus(Some(100));
    let expected_scale =
        VIEWPORT_WIDTH.min(VIEWPORT_HEIGHT) / (driver.state.layout().cell_pitch * ZOOM_CELLS);

    let mut previous = driver.state.camera().current().scale;
    let mut ticks = 0;
    loop {
        let outcome = driver.tick();
        ticks += 1;
        let scale = driver.state.camera().current().scale;
        assert!(scale >= previous, "scale dropped at tick {ticks}");
        assert!(scale <= expected_scale + 1e-9);
        previous = scale;
        if outcome.next != NextTick::AnimationFrame {
            break;
        }
        assert!(ticks < common::MAX_TICKS);
    }
    assert!((driver.state.camera().current().scale - expected_scale).abs() < 1e-9);

    // Clicks are ignored while zoomed in.
    assert_eq!(driver.state.click(x, y), None);
}

#[test]
fn test_focused_dot_lands_in_viewport_center() {
    let mut driver = Driver::new(grid(365, 100));
    driver.state.set_focus(Some(123));
    driver.settle();

    let t = driver.state.camera().current();
    let (cx, cy) = driver.state.layout().cell_center(123);
    assert!((cx * t.scale + t.translate_x - VIEWPORT_WIDTH / 2.0).abs() < 1e-6);
    assert!((cy * t.scale + t.translate_y - VIEWPORT_HEIGHT / 2.0).abs() < 1e-6);

    // The drawn transform is the camera transform at DPR 1.
    let dot = driver.dots()[123];
    assert_eq!(dot.scale, t.scale);
    assert_eq!(dot.translate, (t.translate_x, t.translate_y));
}

#[test]
fn test_converged_camera_is_idempotent() {
    let mut driver = Driver::new(grid(365, 100));
    driver.state.set_focus(Some(50));
    driver.settle();
    let settled = driver.state.camera().current();

    for _ in 0..10 {
        let outcome = driver.tick();
        assert!(matches!(outcome.next, NextTick::Idle { .. }));
        assert_eq!(driver.state.camera().current(), settled);
    }
}

#[test]
fn test_refocus_mid_flight_never_jumps_to_identity() {
    let mut driver = Driver::new(grid(365, 100));
    driver.state.set_focus(Some(100));
    for _ in 0..6 {
        driver.tick();
    }
    let mid = driver.state.camera().current();
    assert!(mid.scale > 1.0);

    driver.state.set_focus(Some(300));
    driver.tick();
    let after = driver.state.camera().current();
    assert!(after.scale >= mid.scale - 1e-9);
    assert_ne!(after, Transform::IDENTITY);
}

#[test]
fn test_unfocus_returns_to_identity_and_enables_hit_testing() {
    let mut driver = Driver::new(grid(365, 100));
    driver.state.set_focus(Some(200));
    driver.settle();
    assert!(!driver.state.hit_testing_enabled());

    driver.state.set_focus(None);
    driver.tick();
    // Still zoomed: pointer coordinates are not grid coordinates yet.
    assert!(!driver.state.hit_testing_enabled());
    let (x, y) = driver.state.layout().cell_center(7);
    assert!(!driver.state.pointer_move(x, y));

    driver.settle();
    assert_eq!(driver.state.camera().current(), Transform::IDENTITY);
    assert!(driver.state.hit_testing_enabled());
    assert!(driver.state.pointer_move(x, y));
    assert_eq!(driver.state.hovered(), Some(7));
}

#[test]
fn test_easing_is_frame_rate_independent() {
    let mut at_60 = Driver::new(grid(365, 100));
    let mut at_120 = Driver::new(grid(365, 100)).with_frame_ms(8.0);
    // Prime both so the next ticks measure real intervals.
    at_60.tick();
    at_120.tick();
    at_60.state.set_focus(Some(100));
    at_120.state.set_focus(Some(100));
    // The first tick after a rest always counts as one nominal frame.
    at_60.tick();
    at_120.tick();

    for _ in 0..10 {
        at_60.tick();
        at_120.tick();
        at_120.tick();
    }
    let a = at_60.state.camera().current();
    let b = at_120.state.camera().current();
    // Still mid-flight, so neither side has snapped to the target.
    assert!(at_60.state.camera().is_animating());
    assert!((a.scale - b.scale).abs() < 1e-9, "{} vs {}", a.scale, b.scale);
    assert!((a.translate_x - b.translate_x).abs() < 1e-9);
    assert!((a.translate_y - b.translate_y).abs() < 1e-9);
}

#[test]
fn test_animation_frames_then_idle_timer() {
    let mut driver = Driver::new(grid(365, 100));
    assert!(matches!(driver.tick().next, NextTick::Idle { delay_ms: 60_000 }));

    driver.state.set_focus(Some(10));
    assert_eq!(driver.tick().next, NextTick::AnimationFrame);
    driver.settle();
    assert!(matches!(driver.tick().next, NextTick::Idle { .. }));
}
