//! Color parsing and color math for dot rendering.
//!
//! Colors cross the JS boundary as CSS strings (theme values, override
//! callbacks) and are kept as [`Rgb`] inside the crate so paint resolution can
//! compare and blend them without reparsing.

use serde::Serialize;

/// RGB color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse from a hex string (`#RGB` or `#RRGGBB`, `#` optional).
    /// Returns None if the format is invalid.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        match hex.len() {
            3 => {
                let expand = |i: usize| -> Option<u8> {
                    let v = u8::from_str_radix(hex.get(i..=i)?, 16).ok()?;
                    Some(v * 17)
                };
                Some(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => {
                let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
                let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
                let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
                Some(Self::new(r, g, b))
            }
            _ => None,
        }
    }

    /// Convert to CSS hex string (#RRGGBB).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Blend toward `other`. Factor of 0.0 = self, 1.0 = other.
    pub fn mix(self, other: Self, factor: f64) -> Self {
        Self {
            r: Self::blend_component(self.r, other.r, factor),
            g: Self::blend_component(self.g, other.g, factor),
            b: Self::blend_component(self.b, other.b, factor),
        }
    }

    /// Blend a single color component toward a target.
    /// Clamped to [0, 255] before the cast.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn blend_component(from: u8, to: u8, factor: f64) -> u8 {
        let from = f64::from(from);
        let to = f64::from(to);
        let factor = if factor.is_finite() { factor } else { 0.0 };
        let blended = from + (to - from) * factor.clamp(0.0, 1.0);
        blended.clamp(0.0, 255.0).round() as u8
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

/// Parse a CSS color string.
///
/// Supports formats:
/// - "#RGB" / "#RRGGBB" (hex, `#` optional)
/// - "rgb(r, g, b)"
/// - "rgba(r, g, b, a)" (alpha is accepted and discarded; dots are opaque)
pub fn parse_color(s: &str) -> Option<Rgb> {
    let s = s.trim();
    if s.starts_with("rgba(") {
        parse_rgba_string(s)
    } else if s.starts_with("rgb(") {
        parse_rgb_string(s)
    } else {
        Rgb::from_hex(s)
    }
}

fn parse_rgb_string(s: &str) -> Option<Rgb> {
    let inner = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(str::trim);
    let r: u8 = parts.next()?.parse().ok()?;
    let g: u8 = parts.next()?.parse().ok()?;
    let b: u8 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Rgb::new(r, g, b))
}

fn parse_rgba_string(s: &str) -> Option<Rgb> {
    let inner = s.strip_prefix("rgba(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(str::trim);
    let r: u8 = parts.next()?.parse().ok()?;
    let g: u8 = parts.next()?.parse().ok()?;
    let b: u8 = parts.next()?.parse().ok()?;
    let _a: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Rgb::new(r, g, b))
}

/// Fallback colors used when the theme leaves a slot empty or unparseable.
pub mod palette {
    use super::Rgb;

    /// Elapsed dots
    pub const PAST: Rgb = Rgb::new(0xE4, 0xE4, 0xE7);

    /// The current dot
    pub const TODAY: Rgb = Rgb::new(0xF9, 0x73, 0x16);

    /// Remaining dots
    pub const FUTURE: Rgb = Rgb::new(0x3F, 0x3F, 0x46);

    /// Surface background
    pub const BACKGROUND: Rgb = Rgb::new(0x09, 0x09, 0x0B);

    /// Neutral tint for hovered dots
    pub const HOVER: Rgb = Rgb::new(0xA1, 0xA1, 0xAA);
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
    use test_case::test_case;

    #[test_case("#FF0000", Rgb::new(255, 0, 0) ; "hex6")]
    #[test_case("00ff80", Rgb::new(0, 255, 128) ; "hex6 without hash")]
    #[test_case("#f80", Rgb::new(255, 136, 0) ; "hex3")]
    #[test_case("rgb(1, 2, 3)", Rgb::new(1, 2, 3) ; "rgb")]
    #[test_case("rgba(10,20,30,0.5)", Rgb::new(10, 20, 30) ; "rgba")]
    #[test_case("  #22c55e  ", Rgb::new(0x22, 0xC5, 0x5E) ; "whitespace")]
    fn test_parse_color(input: &str, expected: Rgb) {
        assert_eq!(parse_color(input), Some(expected));
    }

    #[test_case("" ; "empty")]
    #[test_case("#12345" ; "bad length")]
    #[test_case("#GGGGGG" ; "bad digits")]
    #[test_case("rgb(1, 2)" ; "missing channel")]
    #[test_case("rgb(1, 2, 3, 4)" ; "extra channel")]
    #[test_case("rgb(300, 0, 0)" ; "out of range")]
    #[test_case("hotpink" ; "named")]
    fn test_parse_color_rejects(input: &str) {
        assert_eq!(parse_color(input), None);
    }

    #[test]
    fn test_to_hex_roundtrip() {
        let c = Rgb::new(0x12, 0xAB, 0xEF);
        assert_eq!(c.to_hex(), "#12ABEF");
        assert_eq!(Rgb::from_hex(&c.to_hex()), Some(c));
    }

    #[test]
    fn test_mix() {
        let black = Rgb::new(0, 0, 0);
        assert_eq!(black.mix(Rgb::new(0, 0, 0), 1.0), black);
        assert_eq!(black.mix(Rgb::new(255, 255, 255), 1.0), Rgb::new(255, 255, 255));
        assert_eq!(black.mix(Rgb::new(200, 100, 0), 0.5), Rgb::new(100, 50, 0));
        assert_eq!(black.mix(Rgb::new(200, 100, 0), f64::NAN), black);
    }
}
