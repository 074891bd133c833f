//! Column/pitch computation for the dot grid.
//!
//! The layout is recomputed from fresh inputs on every frame. It is a pure
//! function of `(container_width, cell_size, gap, padding)`, which is what lets
//! the hit tester invert it exactly.

use serde::Serialize;

/// Padding around the grid on every side (logical pixels).
pub const GRID_PADDING: f64 = 16.0;

/// Default dot diameter (logical pixels).
pub const DEFAULT_CELL_SIZE: f64 = 12.0;

/// Default spacing between adjacent dots (logical pixels).
pub const DEFAULT_GAP: f64 = 6.0;

/// Smallest accepted dot diameter. Keeps the pitch strictly positive.
pub const MIN_CELL_SIZE: f64 = 1.0;

/// Visible area of the page hosting the grid (logical pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    /// True when either side is zero; nothing can be drawn.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Derived grid geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    /// Number of dots per row (always at least 1)
    pub columns: u32,
    /// Dot diameter
    pub cell_size: f64,
    /// Spacing between dots
    pub gap: f64,
    /// Center-to-center spacing (`cell_size + gap`)
    pub cell_pitch: f64,
    /// Padding around the grid
    pub padding: f64,
}

impl GridLayout {
    /// Compute the layout for a container using the standard padding.
    pub fn new(container_width: f64, cell_size: f64, gap: f64) -> Self {
        Self::with_padding(container_width, cell_size, gap, GRID_PADDING)
    }

    /// Compute the layout with an explicit padding.
    ///
    /// Zero, negative or non-finite widths produce a single column.
    pub fn with_padding(container_width: f64, cell_size: f64, gap: f64, padding: f64) -> Self {
        let cell_size = if cell_size.is_finite() {
            cell_size.max(MIN_CELL_SIZE)
        } else {
            DEFAULT_CELL_SIZE
        };
        let gap = if gap.is_finite() { gap.max(0.0) } else { DEFAULT_GAP };
        let padding = sanitize_extent(padding);
        let cell_pitch = cell_size + gap;

        let usable = (sanitize_extent(container_width) - 2.0 * padding + gap).max(0.0);
        let columns = floor_to_u32(usable / cell_pitch).max(1);

        Self {
            columns,
            cell_size,
            gap,
            cell_pitch,
            padding,
        }
    }

    /// Number of rows needed for `total_cells` dots.
    pub fn rows(&self, total_cells: u32) -> u32 {
        total_cells.div_ceil(self.columns)
    }

    /// `(column, row)` of a cell index.
    pub fn cell_position(&self, index: u32) -> (u32, u32) {
        (index % self.columns, index / self.columns)
    }

    /// Top-left corner of a dot's bounding square in surface coordinates.
    pub fn cell_origin(&self, index: u32) -> (f64, f64) {
        let (col, row) = self.cell_position(index);
        (
            self.padding + f64::from(col) * self.cell_pitch,
            self.padding + f64::from(row) * self.cell_pitch,
        )
    }

    /// Center of a dot in surface coordinates.
    pub fn cell_center(&self, index: u32) -> (f64, f64) {
        let (x, y) = self.cell_origin(index);
        let half = self.cell_size / 2.0;
        (x + half, y + half)
    }

    /// Center of a dot in grid-local coordinates (padding excluded).
    pub fn local_center(&self, index: u32) -> (f64, f64) {
        let (col, row) = self.cell_position(index);
        let half = self.cell_size / 2.0;
        (
            f64::from(col) * self.cell_pitch + half,
            f64::from(row) * self.cell_pitch + half,
        )
    }

    /// Height of the drawn grid including padding.
    pub fn content_height(&self, total_cells: u32) -> f64 {
        let rows = self.rows(total_cells);
        if rows == 0 {
            return 2.0 * self.padding;
        }
        f64::from(rows) * self.cell_pitch - self.gap + 2.0 * self.padding
    }

    /// Surface height: the grid height, but never shorter than the viewport so
    /// short grids still fill the screen.
    pub fn required_height(&self, total_cells: u32, viewport_height: f64) -> f64 {
        self.content_height(total_cells)
            .max(sanitize_extent(viewport_height))
    }
}

fn sanitize_extent(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

/// Floor a non-negative float into `u32`, saturating at the bounds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn floor_to_u32(v: f64) -> u32 {
    if !v.is_finite() || v <= 0.0 {
        return 0;
    }
    v.floor().min(f64::from(u32::MAX)) as u32
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
    fn test_columns_from_width() {
        // usable = 400 - 32 + 6 = 374, pitch 18 -> 20 columns
        let layout = GridLayout::new(400.0, 12.0, 6.0);
        assert_eq!(layout.columns, 20);
        assert_eq!(layout.cell_pitch, 18.0);
        assert_eq!(layout.padding, GRID_PADDING);
    }

    #[test]
    fn test_columns_never_zero() {
        assert_eq!(GridLayout::new(0.0, 12.0, 6.0).columns, 1);
        assert_eq!(GridLayout::new(-250.0, 12.0, 6.0).columns, 1);
        assert_eq!(GridLayout::new(f64::NAN, 12.0, 6.0).columns, 1);
        assert_eq!(GridLayout::new(10.0, 12.0, 6.0).columns, 1);
    }

    #[test]
    fn test_degenerate_cell_size_keeps_positive_pitch() {
        let layout = GridLayout::new(400.0, 0.0, 0.0);
        assert!(layout.cell_pitch > 0.0);
        let layout = GridLayout::new(400.0, f64::INFINITY, -3.0);
        assert_eq!(layout.cell_size, DEFAULT_CELL_SIZE);
        assert_eq!(layout.gap, 0.0);
    }

    #[test]
    fn test_rows_round_up() {
        let layout = GridLayout::new(400.0, 12.0, 6.0);
        assert_eq!(layout.rows(0), 0);
        assert_eq!(layout.rows(20), 1);
        assert_eq!(layout.rows(21), 2);
        assert_eq!(layout.rows(365), 19);
    }

    #[test]
    fn test_cell_origin_and_center() {
        let layout = GridLayout::new(400.0, 12.0, 6.0);
        assert_eq!(layout.cell_origin(0), (16.0, 16.0));
        assert_eq!(layout.cell_origin(21), (16.0 + 18.0, 16.0 + 18.0));
        assert_eq!(layout.cell_center(21), (16.0 + 18.0 + 6.0, 16.0 + 18.0 + 6.0));
        assert_eq!(layout.local_center(21), (18.0 + 6.0, 18.0 + 6.0));
    }

    #[test]
    fn test_required_height_fills_viewport() {
        let layout = GridLayout::new(400.0, 12.0, 6.0);
        // 2 rows: 2*18 - 6 + 32 = 62
        assert_eq!(layout.content_height(40), 62.0);
        assert_eq!(layout.required_height(40, 600.0), 600.0);
        assert_eq!(layout.required_height(40, 10.0), 62.0);
        assert_eq!(layout.content_height(0), 32.0);
    }

    #[test]
    fn test_deterministic() {
        let a = GridLayout::new(1234.5, 9.0, 3.0);
        let b = GridLayout::new(1234.5, 9.0, 3.0);
        assert_eq!(a, b);
    }
}
