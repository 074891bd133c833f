//! Per-cell paint resolution.
//!
//! Decides what a single dot looks like from its index, the elapsed count,
//! the hover state and an optional caller-supplied color override. Resolution
//! is pure and cheap; it runs for every dot on every frame because the today
//! split moves with the wall clock.

use serde::Serialize;

use super::colors::Rgb;
use super::theme::Theme;

/// Shadow blur radius for glowing dots (logical pixels).
pub const GLOW_BLUR: f64 = 8.0;

/// Multiplier applied to the glow radius of a hovered glowing dot.
pub const HOVER_GLOW_BOOST: f64 = 2.0;

/// How a dot is filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Fill {
    /// Single flat color.
    Solid(Rgb),
    /// Vertical split: `bright` from the top down to `split` (0..=1 of the dot
    /// height), `dim` below it.
    DaySplit { bright: Rgb, dim: Rgb, split: f64 },
}

impl Fill {
    /// Color at a fractional height `t` down the dot (0 = top edge).
    pub fn color_at(&self, t: f64) -> Rgb {
        match *self {
            Self::Solid(color) => color,
            Self::DaySplit { bright, dim, split } => {
                if t < split {
                    bright
                } else {
                    dim
                }
            }
        }
    }
}

/// Soft halo drawn around a dot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Glow {
    pub color: Rgb,
    pub blur: f64,
}

/// Everything needed to paint one dot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaintSpec {
    pub fill: Fill,
    pub glow: Option<Glow>,
}

/// Caller-supplied per-cell color (habit completion marks and the like).
///
/// `None` means "use the default temporal coloring". Implementations must not
/// fail the frame: anything that goes wrong for one cell is reported as `None`.
pub trait ColorOverride {
    fn color_for(&self, index: u32) -> Option<Rgb>;
}

impl<F> ColorOverride for F
where
    F: Fn(u32) -> Option<Rgb>,
{
    fn color_for(&self, index: u32) -> Option<Rgb> {
        self(index)
    }
}

/// Frame-wide inputs shared by every cell.
#[derive(Clone, Copy)]
pub struct PaintContext<'a> {
    pub passed_cells: u32,
    pub theme: &'a Theme,
    /// Fraction of the current day elapsed, 0..=1.
    pub day_fraction: f64,
    pub hovered: Option<u32>,
    pub color_override: Option<&'a dyn ColorOverride>,
}

/// Resolve the paint for cell `index`.
///
/// Order: override color, then past, then today (split fill, always glowing
/// with the today color), then future. Hover swaps plain dots to the neutral
/// hover tint and strengthens the glow of today/override dots instead.
pub fn resolve_paint(index: u32, ctx: &PaintContext<'_>) -> PaintSpec {
    let theme = ctx.theme;
    let is_today = index == ctx.passed_cells;
    let override_color = ctx.color_override.and_then(|o| o.color_for(index));

    let today_glow = Glow {
        color: theme.today,
        blur: GLOW_BLUR,
    };

    let spec = if let Some(color) = override_color {
        let glow = if is_today {
            Some(today_glow)
        } else if color != theme.past && color != theme.future {
            Some(Glow {
                color,
                blur: GLOW_BLUR,
            })
        } else {
            None
        };
        PaintSpec {
            fill: Fill::Solid(color),
            glow,
        }
    } else if index < ctx.passed_cells {
        PaintSpec {
            fill: Fill::Solid(theme.past),
            glow: None,
        }
    } else if is_today {
        let split = if ctx.day_fraction.is_finite() {
            ctx.day_fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        PaintSpec {
            fill: Fill::DaySplit {
                bright: theme.today,
                dim: theme.today_dim(),
                split,
            },
            glow: Some(today_glow),
        }
    } else {
        PaintSpec {
            fill: Fill::Solid(theme.future),
            glow: None,
        }
    };

    if ctx.hovered != Some(index) {
        return spec;
    }

    if is_today || override_color.is_some() {
        PaintSpec {
            glow: spec.glow.map(|g| Glow {
                blur: g.blur * HOVER_GLOW_BOOST,
                ..g
            }),
            ..spec
        }
    } else {
        PaintSpec {
            fill: Fill::Solid(theme.hover),
            glow: None,
        }
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

    const GREEN: Rgb = Rgb::new(0x22, 0xC5, 0x5E);

    fn ctx<'a>(theme: &'a Theme, hovered: Option<u32>) -> PaintContext<'a> {
        PaintContext {
            passed_cells: 3,
            theme,
            day_fraction: 0.5,
            hovered,
            color_override: None,
        }
    }

    #[test]
    fn test_temporal_order() {
        let theme = Theme::default();
        let c = ctx(&theme, None);
        for i in 0..3 {
            assert_eq!(resolve_paint(i, &c).fill, Fill::Solid(theme.past));
            assert_eq!(resolve_paint(i, &c).glow, None);
        }
        assert!(matches!(resolve_paint(3, &c).fill, Fill::DaySplit { .. }));
        for i in 4..7 {
            assert_eq!(resolve_paint(i, &c).fill, Fill::Solid(theme.future));
        }
    }

    #[test]
    fn test_today_always_glows_today_color() {
        let theme = Theme::default();
        let green = |_: u32| Some(GREEN);
        let c = PaintContext {
            color_override: Some(&green),
            ..ctx(&theme, None)
        };
        let spec = resolve_paint(3, &c);
        assert_eq!(spec.fill, Fill::Solid(GREEN));
        assert_eq!(spec.glow.map(|g| g.color), Some(theme.today));
    }

    #[test]
    fn test_override_glow_only_for_distinct_colors() {
        let theme = Theme::default();
        let past_colored = |_: u32| Some(Theme::default().past);
        let c = PaintContext {
            color_override: Some(&past_colored),
            ..ctx(&theme, None)
        };
        assert_eq!(resolve_paint(5, &c).glow, None);

        let green = |_: u32| Some(GREEN);
        let c = PaintContext {
            color_override: Some(&green),
            ..ctx(&theme, None)
        };
        assert_eq!(resolve_paint(5, &c).glow.map(|g| g.color), Some(GREEN));
    }

    #[test]
    fn test_hover_plain_cell_uses_tint() {
        let theme = Theme::default();
        let spec = resolve_paint(1, &ctx(&theme, Some(1)));
        assert_eq!(spec.fill, Fill::Solid(theme.hover));
        assert_eq!(spec.glow, None);
    }

    #[test]
    fn test_hover_amplifies_today_glow() {
        let theme = Theme::default();
        let plain = resolve_paint(3, &ctx(&theme, None));
        let hovered = resolve_paint(3, &ctx(&theme, Some(3)));
        assert_eq!(plain.fill, hovered.fill);
        assert_eq!(
            hovered.glow.map(|g| g.blur),
            Some(GLOW_BLUR * HOVER_GLOW_BOOST)
        );
    }

    #[test]
    fn test_hover_keeps_override_fill() {
        let theme = Theme::default();
        let green = |_: u32| Some(GREEN);
        let c = PaintContext {
            color_override: Some(&green),
            ..ctx(&theme, Some(6))
        };
        let spec = resolve_paint(6, &c);
        assert_eq!(spec.fill, Fill::Solid(GREEN));
        assert_eq!(spec.glow.map(|g| g.blur), Some(GLOW_BLUR * HOVER_GLOW_BOOST));
    }

    #[test]
    fn test_day_split_extremes() {
        let theme = Theme::default();
        let at = |fraction: f64| {
            let c = PaintContext {
                day_fraction: fraction,
                ..ctx(&theme, None)
            };
            resolve_paint(3, &c).fill
        };
        let start = at(0.0);
        let end = at(1.0);
        for step in 0..100 {
            let t = f64::from(step) / 100.0;
            assert_eq!(start.color_at(t), theme.today_dim());
            assert_eq!(end.color_at(t), theme.today);
        }
    }

    #[test]
    fn test_day_split_clamps() {
        let theme = Theme::default();
        let c = PaintContext {
            day_fraction: 7.0,
            ..ctx(&theme, None)
        };
        assert!(matches!(
            resolve_paint(3, &c).fill,
            Fill::DaySplit { split, .. } if split == 1.0
        ));
        let c = PaintContext {
            day_fraction: f64::NAN,
            ..ctx(&theme, None)
        };
        assert!(matches!(
            resolve_paint(3, &c).fill,
            Fill::DaySplit { split, .. } if split == 0.0
        ));
    }

    #[test]
    fn test_passed_beyond_total_is_all_past() {
        let theme = Theme::default();
        let c = PaintContext {
            passed_cells: 1000,
            ..ctx(&theme, None)
        };
        for i in 0..7 {
            assert_eq!(resolve_paint(i, &c).fill, Fill::Solid(theme.past));
        }
    }
}
