//! Cell coloring tests for dotgrid
//!
//! Tests for temporal coloring, the today split, color overrides, theme
//! resolution and hover, observed through complete frames.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{grid, Driver};
use dotgrid::render::{
    parse_color, resolve_paint, ColorOverride, Fill, PaintContext, SurfaceOp,
};
use dotgrid::{Rgb, Theme, ThemeConfig};
use test_case::test_case;

const MARK: Rgb = Rgb::new(0x22, 0xC5, 0x5E);

fn context(theme: &Theme, passed: u32, day_fraction: f64) -> PaintContext<'_> {
    PaintContext {
        passed_cells: passed,
        theme,
        day_fraction,
        hovered: None,
        color_override: None,
    }
}

#[test]
fn test_week_with_three_days_passed() {
    let mut driver = Driver::new(grid(7, 3));
    driver.tick();
    let dots = driver.dots();
    assert_eq!(dots.len(), 7);

    let theme = Theme::default();
    let split: Vec<usize> = dots
        .iter()
        .enumerate()
        .filter(|(_, d)| matches!(d.fill, Fill::DaySplit { .. }))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(split, vec![3]);
    for dot in &dots[..3] {
        assert_eq!(dot.fill, Fill::Solid(theme.past));
    }
    for dot in &dots[4..] {
        assert_eq!(dot.fill, Fill::Solid(theme.future));
    }
}

#[test_case(0.0, false, false ; "start of day is all dim")]
#[test_case(1.0, true, true ; "end of day is all bright")]
#[test_case(0.5, true, false ; "midday splits")]
fn test_today_gradient_extremes(day_fraction: f64, top_bright: bool, bottom_bright: bool) {
    let theme = Theme::default();
    let spec = resolve_paint(3, &context(&theme, 3, day_fraction));
    let expect = |bright: bool| if bright { theme.today } else { theme.today_dim() };
    assert_eq!(spec.fill.color_at(0.0), expect(top_bright));
    assert_eq!(spec.fill.color_at(0.999), expect(bottom_bright));
}

#[test]
fn test_today_split_ignores_bad_fraction() {
    let theme = Theme::default();
    for fraction in [f64::NAN, -2.0] {
        let spec = resolve_paint(0, &context(&theme, 0, fraction));
        assert_eq!(spec.fill.color_at(0.0), theme.today_dim());
    }
    let spec = resolve_paint(0, &context(&theme, 0, 7.0));
    assert_eq!(spec.fill.color_at(0.999), theme.today);
}

#[test]
fn test_null_override_matches_no_override() {
    let nothing = |_: u32| -> Option<Rgb> { None };

    let mut plain = Driver::new(grid(365, 100));
    plain.tick();
    let mut overridden = Driver::new(grid(365, 100));
    overridden.tick_with(Some(&nothing as &dyn ColorOverride));

    assert_eq!(plain.surface.ops(), overridden.surface.ops());
}

#[test]
fn test_override_wins_in_every_region() {
    let theme = Theme::default();
    let mark_all = |_: u32| Some(MARK);
    let ctx = PaintContext {
        color_override: Some(&mark_all),
        ..context(&theme, 3, 0.5)
    };
    // Past, today and future all take the override fill.
    for index in [0, 3, 6] {
        assert_eq!(resolve_paint(index, &ctx).fill, Fill::Solid(MARK));
    }
    // Today keeps the today glow; other overridden cells glow in their own color.
    assert_eq!(resolve_paint(3, &ctx).glow.unwrap().color, theme.today);
    assert_eq!(resolve_paint(0, &ctx).glow.unwrap().color, MARK);
}

#[test]
fn test_sparse_override_in_frame() {
    let even = |index: u32| (index % 2 == 0).then_some(MARK);
    let mut driver = Driver::new(grid(10, 5));
    let outcome = driver.tick_with(Some(&even as &dyn ColorOverride));
    let dots = driver.dots();

    let theme = Theme::default();
    assert_eq!(dots[0].fill, Fill::Solid(MARK));
    assert_eq!(dots[1].fill, Fill::Solid(theme.past));
    assert!(matches!(dots[5].fill, Fill::DaySplit { .. }));
    assert_eq!(dots[7].fill, Fill::Solid(theme.future));
    // 0, 2, 4, 6, 8 glow in the mark color and 5 glows as today.
    assert_eq!(outcome.stats.unwrap().glowing, 6);
}

#[test]
fn test_theme_resolution_falls_back_per_slot() {
    let config = ThemeConfig {
        past: Some("#112233".to_string()),
        today: Some("not a color".to_string()),
        background: Some("rgb(1, 2, 3)".to_string()),
        ..ThemeConfig::default()
    };
    let theme = Theme::resolve(&config);
    let defaults = Theme::default();
    assert_eq!(theme.past, Rgb::new(0x11, 0x22, 0x33));
    assert_eq!(theme.today, defaults.today);
    assert_eq!(theme.future, defaults.future);
    assert_eq!(theme.background, Rgb::new(1, 2, 3));
}

#[test]
fn test_explicit_theme_beats_css_variables() {
    let explicit = ThemeConfig {
        today: Some("#ff0000".to_string()),
        ..ThemeConfig::default()
    };
    let css = ThemeConfig {
        today: Some("#00ff00".to_string()),
        hover: Some("#0000ff".to_string()),
        ..ThemeConfig::default()
    };
    let theme = Theme::resolve(&explicit.or(&css));
    assert_eq!(theme.today, parse_color("#ff0000").unwrap());
    assert_eq!(theme.hover, parse_color("#0000ff").unwrap());
    assert_eq!(theme.past, Theme::default().past);
}

#[test]
fn test_frame_clears_with_theme_background() {
    let mut driver = Driver::new(grid(5, 1));
    driver.theme = Theme::resolve(&ThemeConfig {
        background: Some("#ffffff".to_string()),
        ..ThemeConfig::default()
    });
    driver.tick();
    let white = Rgb::new(255, 255, 255);
    let cleared = driver
        .surface
        .ops()
        .iter()
        .any(|op| matches!(op, SurfaceOp::Clear { color } if *color == white));
    assert!(cleared);
}

#[test]
fn test_hovered_cell_is_tinted_in_frame() {
    let mut driver = Driver::new(grid(30, 10));
    driver.tick();
    let (x, y) = driver.state.layout().cell_center(20);
    assert!(driver.state.pointer_move(x, y));
    driver.tick();
    let dots = driver.dots();
    assert_eq!(dots[20].fill, Fill::Solid(Theme::default().hover));
    assert_eq!(dots[21].fill, Fill::Solid(Theme::default().future));

    assert!(driver.state.pointer_leave());
    driver.tick();
    assert_eq!(driver.dots()[20].fill, Fill::Solid(Theme::default().future));
}
