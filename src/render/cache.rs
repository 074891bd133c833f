//! Bounded memo of parsed CSS colors.
//!
//! Override callbacks hand back CSS strings for every dot on every frame.
//! Calendars reuse a handful of colors, so parsing each distinct string once
//! keeps the per-frame cost flat.

use std::collections::{HashMap, VecDeque};

use super::colors::{parse_color, Rgb};

/// Default number of distinct color strings remembered.
pub const COLOR_CACHE_CAP: usize = 256;

/// Insertion-order bounded cache from CSS color strings to parse results.
///
/// Unparseable strings are remembered as `None` too, so a callback that keeps
/// returning garbage is not reparsed every frame. Lookups do not promote
/// entries.
pub struct ColorParseCache {
    entries: HashMap<String, Option<Rgb>>,
    order: VecDeque<String>,
    capacity: usize,
}

impl Default for ColorParseCache {
    fn default() -> Self {
        Self::new(COLOR_CACHE_CAP)
    }
}

impl ColorParseCache {
    /// Create a new cache with the given capacity.
    ///
    /// A capacity of 0 disables caching; every lookup parses.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    /// Parse `css`, consulting and filling the cache.
    pub fn resolve(&mut self, css: &str) -> Option<Rgb> {
        if let Some(hit) = self.entries.get(css) {
            return *hit;
        }
        let parsed = parse_color(css);
        if self.capacity > 0 {
            self.entries.insert(css.to_string(), parsed);
            self.order.push_back(css.to_string());
            self.enforce_cap();
        }
        parsed
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Evict oldest entries until we're at or below capacity.
    fn enforce_cap(&mut self) {
        while self.entries.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            } else {
                break;
            }
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

    #[test]
    fn test_resolve_parses_and_caches() {
        let mut cache = ColorParseCache::new(4);
        assert_eq!(cache.resolve("#22c55e"), Some(Rgb::new(0x22, 0xC5, 0x5E)));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.resolve("#22c55e"), Some(Rgb::new(0x22, 0xC5, 0x5E)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalid_strings_are_cached_as_none() {
        let mut cache = ColorParseCache::new(4);
        assert_eq!(cache.resolve("nope"), None);
        assert_eq!(cache.resolve("nope"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_eviction() {
        let mut cache = ColorParseCache::new(2);
        cache.resolve("#000001");
        cache.resolve("#000002");
        cache.resolve("#000003");
        assert_eq!(cache.len(), 2);
        // Oldest entry was dropped but still resolves by parsing again.
        assert_eq!(cache.resolve("#000001"), Some(Rgb::new(0, 0, 1)));
    }

    #[test]
    fn test_zero_capacity() {
        let mut cache = ColorParseCache::new(0);
        assert_eq!(cache.resolve("#FFFFFF"), Some(Rgb::new(255, 255, 255)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cache = ColorParseCache::new(3);
        cache.resolve("#000001");
        cache.clear();
        assert!(cache.is_empty());
    }
}
