//! Theme colors for the dot grid.
//!
//! [`ThemeConfig`] is what callers hand in (CSS strings, any slot optional);
//! [`Theme`] is the resolved set of colors a frame is painted with.

use serde::{Deserialize, Serialize};

use super::colors::{palette, parse_color, Rgb};

/// How far the "today" color is pulled toward the background for the part of
/// the day that has not happened yet.
const TODAY_DIM_FACTOR: f64 = 0.7;

/// Caller-supplied theme values. Missing or unparseable slots fall back to
/// [`palette`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeConfig {
    pub past: Option<String>,
    pub today: Option<String>,
    pub future: Option<String>,
    pub background: Option<String>,
    pub hover: Option<String>,
}

impl ThemeConfig {
    /// Fill empty slots of `self` from `fallback`.
    pub fn or(&self, fallback: &ThemeConfig) -> ThemeConfig {
        ThemeConfig {
            past: self.past.clone().or_else(|| fallback.past.clone()),
            today: self.today.clone().or_else(|| fallback.today.clone()),
            future: self.future.clone().or_else(|| fallback.future.clone()),
            background: self
                .background
                .clone()
                .or_else(|| fallback.background.clone()),
            hover: self.hover.clone().or_else(|| fallback.hover.clone()),
        }
    }
}

/// Resolved colors for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub past: Rgb,
    pub today: Rgb,
    pub future: Rgb,
    pub background: Rgb,
    pub hover: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            past: palette::PAST,
            today: palette::TODAY,
            future: palette::FUTURE,
            background: palette::BACKGROUND,
            hover: palette::HOVER,
        }
    }
}

impl Theme {
    /// Resolve a config, falling back per slot.
    pub fn resolve(config: &ThemeConfig) -> Self {
        Self {
            past: resolve_slot("past", config.past.as_deref(), palette::PAST),
            today: resolve_slot("today", config.today.as_deref(), palette::TODAY),
            future: resolve_slot("future", config.future.as_deref(), palette::FUTURE),
            background: resolve_slot(
                "background",
                config.background.as_deref(),
                palette::BACKGROUND,
            ),
            hover: resolve_slot("hover", config.hover.as_deref(), palette::HOVER),
        }
    }

    /// The "today" color for the not-yet-elapsed part of the day.
    pub fn today_dim(&self) -> Rgb {
        self.today.mix(self.background, TODAY_DIM_FACTOR)
    }
}

fn resolve_slot(name: &str, value: Option<&str>, fallback: Rgb) -> Rgb {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return fallback;
    };
    parse_color(raw).unwrap_or_else(|| {
        tracing::warn!(slot = name, value = raw, "unparseable theme color, using default");
        fallback
    })
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

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(Theme::resolve(&ThemeConfig::default()), Theme::default());
    }

    #[test]
    fn test_partial_config_falls_back_per_slot() {
        let config = ThemeConfig {
            past: Some("#112233".to_string()),
            today: Some("not a color".to_string()),
            future: Some("   ".to_string()),
            ..ThemeConfig::default()
        };
        let theme = Theme::resolve(&config);
        assert_eq!(theme.past, Rgb::new(0x11, 0x22, 0x33));
        assert_eq!(theme.today, palette::TODAY);
        assert_eq!(theme.future, palette::FUTURE);
        assert_eq!(theme.background, palette::BACKGROUND);
    }

    #[test]
    fn test_or_prefers_self() {
        let explicit = ThemeConfig {
            past: Some("#000001".to_string()),
            ..ThemeConfig::default()
        };
        let css = ThemeConfig {
            past: Some("#000002".to_string()),
            future: Some("#000003".to_string()),
            ..ThemeConfig::default()
        };
        let merged = explicit.or(&css);
        assert_eq!(merged.past.as_deref(), Some("#000001"));
        assert_eq!(merged.future.as_deref(), Some("#000003"));
        assert_eq!(merged.today, None);
    }

    #[test]
    fn test_today_dim_differs_from_today() {
        let theme = Theme::default();
        assert_ne!(theme.today_dim(), theme.today);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let config: ThemeConfig =
            serde_json::from_str(r##"{"background":"#fff","hover":"#eee"}"##).unwrap();
        assert_eq!(config.background.as_deref(), Some("#fff"));
        assert_eq!(config.hover.as_deref(), Some("#eee"));
        assert_eq!(config.past, None);
    }
}
