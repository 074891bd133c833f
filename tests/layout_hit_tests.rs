//! Layout and hit-test tests for dotgrid
//!
//! Tests for column fitting, surface sizing, and the round trip from a cell
//! index to a pointer position and back under both hit policies.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use dotgrid::layout::{GRID_PADDING, MIN_CELL_SIZE};
use dotgrid::{cell_at, GridLayout, HitPolicy, ViewportSize};
use test_case::test_case;

#[test_case(400.0, 12.0, 6.0 ; "default dots")]
#[test_case(1200.0, 12.0, 6.0 ; "wide container")]
#[test_case(320.0, 20.0, 2.0 ; "big dots small gap")]
#[test_case(999.0, 7.5, 3.25 ; "fractional geometry")]
#[test_case(50.0, 12.0, 6.0 ; "narrower than one pitch")]
#[test_case(0.0, 12.0, 6.0 ; "zero width")]
fn test_center_of_every_cell_hits_itself(width: f64, cell_size: f64, gap: f64) {
    let layout = GridLayout::new(width, cell_size, gap);
    let total = 500;
    for index in 0..total {
        let (x, y) = layout.cell_center(index);
        assert_eq!(
            cell_at(&layout, total, x, y, HitPolicy::Strict),
            Some(index),
            "strict miss at {index}"
        );
        assert_eq!(
            cell_at(&layout, total, x, y, HitPolicy::Loose),
            Some(index),
            "loose miss at {index}"
        );
    }
}

#[test_case(-100.0 ; "negative width")]
#[test_case(0.0 ; "zero width")]
#[test_case(f64::NAN ; "nan width")]
#[test_case(10.0 ; "smaller than padding")]
fn test_degenerate_width_gives_one_column(width: f64) {
    let layout = GridLayout::new(width, 12.0, 6.0);
    assert_eq!(layout.columns, 1);
    assert_eq!(layout.rows(5), 5);
}

#[test]
fn test_columns_fit_container() {
    // usable = 400 - 32 + 6 = 374, pitch 18 -> 20 columns
    let layout = GridLayout::new(400.0, 12.0, 6.0);
    assert_eq!(layout.columns, 20);
    assert_eq!(layout.cell_pitch, 18.0);
    assert_eq!(layout.padding, GRID_PADDING);

    // The last column's right edge stays inside the padding.
    let (x, _) = layout.cell_origin(19);
    assert!(x + layout.cell_size <= 400.0 - GRID_PADDING);
}

#[test]
fn test_cell_size_is_clamped() {
    let layout = GridLayout::new(400.0, 0.0, 6.0);
    assert_eq!(layout.cell_size, MIN_CELL_SIZE);
    let layout = GridLayout::new(400.0, 12.0, -3.0);
    assert_eq!(layout.gap, 0.0);
}

#[test]
fn test_gap_hits_only_under_loose_policy() {
    let layout = GridLayout::new(400.0, 12.0, 6.0);
    let (x, y) = layout.cell_origin(21);
    // Inside the gap right of dot 21, vertically centered.
    let gap_x = x + layout.cell_size + layout.gap / 2.0;
    let mid_y = y + layout.cell_size / 2.0;
    assert_eq!(cell_at(&layout, 100, gap_x, mid_y, HitPolicy::Strict), None);
    assert_eq!(cell_at(&layout, 100, gap_x, mid_y, HitPolicy::Loose), Some(21));
}

#[test]
fn test_positions_outside_grid_hit_nothing() {
    let layout = GridLayout::new(400.0, 12.0, 6.0);
    let total = 30;
    for (x, y) in [
        (GRID_PADDING - 1.0, 40.0),
        (40.0, GRID_PADDING - 1.0),
        (-5.0, -5.0),
        (f64::NAN, 20.0),
        (20.0, f64::INFINITY),
        // Right of the last column.
        (GRID_PADDING + 20.0 * 18.0 + 1.0, 20.0),
        // Row 1 exists, but only up to index 29 (col 9).
        (GRID_PADDING + 15.0 * 18.0 + 6.0, GRID_PADDING + 18.0 + 6.0),
    ] {
        assert_eq!(
            cell_at(&layout, total, x, y, HitPolicy::Loose),
            None,
            "({x}, {y})"
        );
    }
}

#[test]
fn test_empty_grid_hits_nothing() {
    let layout = GridLayout::new(400.0, 12.0, 6.0);
    let (x, y) = layout.cell_center(0);
    assert_eq!(cell_at(&layout, 0, x, y, HitPolicy::Loose), None);
    assert_eq!(layout.content_height(0), 2.0 * GRID_PADDING);
}

#[test]
fn test_required_height_never_shorter_than_viewport() {
    let layout = GridLayout::new(400.0, 12.0, 6.0);
    // 365 cells -> 19 rows -> 19*18 - 6 + 32 = 368
    assert_eq!(layout.content_height(365), 368.0);
    assert_eq!(layout.required_height(365, 200.0), 368.0);
    assert_eq!(layout.required_height(365, 1000.0), 1000.0);
}

#[test]
fn test_viewport_sanitizes_input() {
    let viewport = ViewportSize::new(-3.0, f64::NAN);
    assert_eq!(viewport.width, 0.0);
    assert_eq!(viewport.height, 0.0);
    assert!(viewport.is_empty());
    assert!(!ViewportSize::new(1.0, 1.0).is_empty());
}
