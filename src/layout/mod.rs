//! Layout engine for placing dots on the grid and mapping pointers back to them.
//!
//! This module handles:
//! - Computing column count and cell pitch from the container width
//! - Cell positions (origin and center) for any cell index
//! - Surface height needed to show every row
//! - Hit testing pointer coordinates back to a cell index

mod grid_layout;

pub use grid_layout::{
    GridLayout, ViewportSize, DEFAULT_CELL_SIZE, DEFAULT_GAP, GRID_PADDING, MIN_CELL_SIZE,
};
pub use hit_test::{cell_at, HitPolicy};
