//! Frame composition tests for dotgrid
//!
//! Tests for paint-state isolation between dots, device-pixel scaling,
//! surface sizing and skipped frames.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{grid, Driver, CONTAINER_WIDTH};
use dotgrid::render::{ColorOverride, DotSurface, Fill, SurfaceOp};
use dotgrid::{GridOptions, GridState, Rgb, Theme};

#[test]
fn test_glow_does_not_leak_to_next_dot() {
    // Index 2 is today and glows; 3 and 4 are plain future dots.
    let mut driver = Driver::new(grid(5, 2));
    driver.tick();
    let dots = driver.dots();
    assert!(dots[2].glow.is_some());
    assert_eq!(dots[3].glow, None);
    assert_eq!(dots[4].glow, None);
}

#[test]
fn test_override_glow_does_not_leak() {
    let mark = Rgb::new(0xEF, 0x44, 0x44);
    let first_only = move |index: u32| (index == 0).then_some(mark);
    let mut driver = Driver::new(grid(4, 4));
    driver.tick_with(Some(&first_only as &dyn ColorOverride));
    let dots = driver.dots();
    assert_eq!(dots[0].glow.map(|g| g.color), Some(mark));
    assert!(dots[1..].iter().all(|d| d.glow.is_none()));
}

#[test]
fn test_clear_happens_under_unit_transform() {
    let mut driver = Driver::new(grid(10, 3));
    driver.state.resize(CONTAINER_WIDTH, 400.0, 800.0, 2.0);
    driver.tick();
    let ops = driver.surface.ops();
    let clear_at = ops
        .iter()
        .position(|op| matches!(op, SurfaceOp::Clear { .. }))
        .unwrap();
    assert!(matches!(
        ops[clear_at - 1],
        SurfaceOp::Transform { scale, translate_x, translate_y }
            if scale == 1.0 && translate_x == 0.0 && translate_y == 0.0
    ));
    // Dots are drawn under the DPR transform.
    assert!(driver.dots().iter().all(|d| d.scale == 2.0));
}

#[test]
fn test_surface_resized_only_when_size_changes() {
    let mut driver = Driver::new(grid(365, 100));
    driver.tick();
    assert!(matches!(
        driver.surface.ops()[0],
        SurfaceOp::Resize { width: 400, height: 800 }
    ));

    driver.tick();
    assert!(!driver
        .surface
        .ops()
        .iter()
        .any(|op| matches!(op, SurfaceOp::Resize { .. })));

    // Narrower container: more rows, taller than the viewport.
    driver.state.resize(200.0, 200.0, 300.0, 1.0);
    driver.tick();
    let size = driver.state.surface_size().unwrap();
    assert!(size.css_height > 300.0);
    assert_eq!(driver.surface.size(), (size.width, size.height));
}

#[test]
fn test_display_size_follows_dpr_change_at_same_backing_size() {
    let mut state = grid(365, 100);
    state.resize(800.0, 800.0, 800.0, 1.0);
    let mut driver = Driver::new(state);
    driver.tick();
    assert_eq!(driver.surface.size(), (800, 800));
    assert_eq!(driver.surface.display_size(), (800.0, 800.0));

    // Half the CSS size at twice the density: same backing store.
    driver.state.resize(400.0, 400.0, 400.0, 2.0);
    driver.tick();
    let ops = driver.surface.ops();
    assert!(!ops.iter().any(|op| matches!(op, SurfaceOp::Resize { .. })));
    assert!(ops.contains(&SurfaceOp::DisplaySize {
        width: 400.0,
        height: 400.0,
    }));
    assert_eq!(driver.surface.size(), (800, 800));
    assert_eq!(driver.surface.display_size(), (400.0, 400.0));
    assert!(driver.dots().iter().all(|d| d.scale == 2.0));

    // Unchanged sizes touch neither.
    driver.tick();
    assert!(!driver.surface.ops().iter().any(|op| matches!(
        op,
        SurfaceOp::Resize { .. } | SurfaceOp::DisplaySize { .. }
    )));
}

#[test]
fn test_zero_area_skips_draw() {
    let mut state = GridState::new(&GridOptions::new(50, 10));
    state.resize(0.0, 0.0, 0.0, 1.0);
    let mut driver = Driver::new(state);
    let outcome = driver.tick();
    assert_eq!(outcome.stats, None);
    assert!(driver.surface.ops().is_empty());
    assert_eq!(driver.surface.size(), (0, 0));
}

#[test]
fn test_stats_count_every_cell() {
    let mut driver = Driver::new(grid(365, 100));
    let stats = driver.tick().stats.unwrap();
    assert_eq!(stats.cells_drawn, 365);
    // Only today glows without overrides or hover.
    assert_eq!(stats.glowing, 1);
}

#[test]
fn test_everything_passed_has_no_today() {
    let mut driver = Driver::new(grid(12, 40));
    let stats = driver.tick().stats.unwrap();
    assert_eq!(stats.glowing, 0);
    assert!(driver
        .dots()
        .iter()
        .all(|d| d.fill == Fill::Solid(Theme::default().past)));
}
