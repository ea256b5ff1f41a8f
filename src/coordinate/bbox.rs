//! Bounding box structure for locating geometries on a grid

use geo::Rect;

use super::transform::GeoTransform;
use crate::raster::window::Window;

/// An axis-aligned box in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum X coordinate
    pub min_x: f64,
    /// Minimum Y coordinate
    pub min_y: f64,
    /// Maximum X coordinate
    pub max_x: f64,
    /// Maximum Y coordinate
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box, normalising the corner order
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: min_x.max(max_x),
            max_y: min_y.max(max_y),
        }
    }

    /// Bounding box of a `geo` rectangle
    pub fn from_rect(rect: &Rect<f64>) -> Self {
        BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }

    /// World extent of a `width` x `height` grid
    pub fn of_grid(transform: &GeoTransform, width: usize, height: usize) -> Self {
        let corners = [
            transform.apply(0.0, 0.0),
            transform.apply(width as f64, 0.0),
            transform.apply(0.0, height as f64),
            transform.apply(width as f64, height as f64),
        ];
        Self::enclosing(&corners)
    }

    fn enclosing(points: &[(f64, f64)]) -> Self {
        let mut bbox = BoundingBox {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for &(x, y) in points {
            bbox.min_x = bbox.min_x.min(x);
            bbox.min_y = bbox.min_y.min(y);
            bbox.max_x = bbox.max_x.max(x);
            bbox.max_y = bbox.max_y.max(y);
        }
        bbox
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if this bounding box contains a point (edges included)
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Check if two boxes share at least one point
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x && other.min_x <= self.max_x
            && self.min_y <= other.max_y && other.min_y <= self.max_y
    }

    /// Convert to the window of cells whose footprints may touch this box
    ///
    /// The corners are mapped through the inverse geotransform, so rotated
    /// grids yield the enclosing window. The result is clipped to the grid;
    /// `None` means the box lies entirely outside it.
    ///
    /// # Arguments
    /// * `inverse` - World-to-pixel transform of the grid
    /// * `width` - Grid width in cells
    /// * `height` - Grid height in cells
    pub fn to_window(&self, inverse: &GeoTransform, width: usize, height: usize) -> Option<Window> {
        let corners = [
            inverse.apply(self.min_x, self.min_y),
            inverse.apply(self.min_x, self.max_y),
            inverse.apply(self.max_x, self.min_y),
            inverse.apply(self.max_x, self.max_y),
        ];
        let pixel_box = Self::enclosing(&corners);

        // Cells touching the box on an edge are included; the exact tests
        // downstream decide whether they count.
        let col_start = pixel_box.min_x.floor() - 1.0;
        let row_start = pixel_box.min_y.floor() - 1.0;
        let col_end = pixel_box.max_x.floor() + 1.0;
        let row_end = pixel_box.max_y.floor() + 1.0;

        if !(col_start.is_finite() && row_start.is_finite() && col_end.is_finite() && row_end.is_finite()) {
            return None;
        }

        let col_start = col_start.max(0.0) as usize;
        let row_start = row_start.max(0.0) as usize;
        let col_end = col_end.min(width as f64 - 1.0);
        let row_end = row_end.min(height as f64 - 1.0);

        if col_end < 0.0 || row_end < 0.0 {
            return None;
        }
        let (col_end, row_end) = (col_end as usize, row_end as usize);
        if col_start > col_end || row_start > row_end {
            return None;
        }

        Some(Window::new(col_start, row_start, col_end - col_start + 1, row_end - row_start + 1))
    }
}
