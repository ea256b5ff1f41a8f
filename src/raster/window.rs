//! Window structure for windowed raster reads
//!
//! A window is a rectangular block of cells in pixel coordinates, where
//! (0, 0) is the top-left cell of the grid.

/// Rectangular block of cells (in pixel coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Column of the left edge
    pub col: usize,
    /// Row of the top edge
    pub row: usize,
    /// Width in cells
    pub width: usize,
    /// Height in cells
    pub height: usize,
}

impl Window {
    /// Create a new window
    ///
    /// # Arguments
    /// * `col` - Column of the top-left cell
    /// * `row` - Row of the top-left cell
    /// * `width` - Width of the window in cells
    /// * `height` - Height of the window in cells
    pub fn new(col: usize, row: usize, width: usize, height: usize) -> Self {
        Window { col, row, width, height }
    }

    /// Window covering a whole grid
    pub fn full(width: usize, height: usize) -> Self {
        Window::new(0, 0, width, height)
    }

    /// Column immediately right of the window (exclusive)
    pub fn end_col(&self) -> usize {
        self.col + self.width
    }

    /// Row immediately below the window (exclusive)
    pub fn end_row(&self) -> usize {
        self.row + self.height
    }

    /// Number of cells in the window
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the cell (row, col) lies inside the window
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row && row < self.end_row() && col >= self.col && col < self.end_col()
    }

    /// Offset of cell (row, col) in a row-major buffer of this window
    pub fn offset_of(&self, row: usize, col: usize) -> Option<usize> {
        if self.contains(row, col) {
            Some((row - self.row) * self.width + (col - self.col))
        } else {
            None
        }
    }

    /// Overlap of two windows, `None` when they are disjoint
    pub fn intersection(&self, other: &Window) -> Option<Window> {
        let col = self.col.max(other.col);
        let row = self.row.max(other.row);
        let end_col = self.end_col().min(other.end_col());
        let end_row = self.end_row().min(other.end_row());

        if col < end_col && row < end_row {
            Some(Window::new(col, row, end_col - col, end_row - row))
        } else {
            None
        }
    }
}
