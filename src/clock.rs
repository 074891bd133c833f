//! Wall-clock helpers for the today split.

/// Seconds in a day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Fraction of the day elapsed for a time of day, clamped to `0..=1`.
pub fn day_fraction(seconds_since_midnight: f64) -> f64 {
    if !seconds_since_midnight.is_finite() {
        return 0.0;
    }
    (seconds_since_midnight / SECONDS_PER_DAY).clamp(0.0, 1.0)
}

/// Fraction of the current local day elapsed.
#[cfg(target_arch = "wasm32")]
pub fn day_fraction_now() -> f64 {
    let now = js_sys::Date::new_0();
    let seconds = f64::from(now.get_hours()) * 3600.0
        + f64::from(now.get_minutes()) * 60.0
        + f64::from(now.get_seconds())
        + f64::from(now.get_milliseconds()) / 1000.0;
    day_fraction(seconds)
}

/// Fraction of the current local day elapsed.
#[cfg(not(target_arch = "wasm32"))]
pub fn day_fraction_now() -> f64 {
    use chrono::Timelike;

    let now = chrono::Local::now();
    let seconds = f64::from(now.num_seconds_from_midnight())
        + f64::from(now.nanosecond() % 1_000_000_000) / 1e9;
    day_fraction(seconds)
}

/// Monotonic-ish timestamp in milliseconds for frame timing.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    if let Some(window) = web_sys::window() {
        if let Some(perf) = window.performance() {
            return perf.now();
        }
    }
    js_sys::Date::now()
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
    fn test_day_fraction() {
        assert_eq!(day_fraction(0.0), 0.0);
        assert_eq!(day_fraction(43_200.0), 0.5);
        assert_eq!(day_fraction(SECONDS_PER_DAY), 1.0);
        assert_eq!(day_fraction(-5.0), 0.0);
        assert_eq!(day_fraction(1e9), 1.0);
        assert_eq!(day_fraction(f64::NAN), 0.0);
    }

    #[test]
    fn test_day_fraction_now_in_range() {
        let f = day_fraction_now();
        assert!((0.0..=1.0).contains(&f));
    }
}
