//! Grid geometry shared by every raster of a stack

use std::fmt;

use geo::{coord, Coord, LineString, Polygon, Rect};

use crate::coordinate::{BoundingBox, GeoTransform};
use crate::error::{SampleError, SampleResult};
use crate::raster::window::Window;

/// Fraction of a cell two grids may differ by and still count as aligned
pub const ALIGNMENT_TOLERANCE: f64 = 1e-6;

/// Dimensions, geotransform and CRS of a raster
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    pub width: usize,
    pub height: usize,
    pub transform: GeoTransform,
    pub epsg: Option<u32>,
    inverse: GeoTransform,
}

impl GridSpec {
    /// Creates a grid, rejecting degenerate transforms
    pub fn new(width: usize, height: usize, transform: GeoTransform, epsg: Option<u32>) -> SampleResult<Self> {
        let inverse = transform.inverse().ok_or_else(|| {
            SampleError::InvalidRaster(format!("geotransform {} is not invertible", transform))
        })?;

        Ok(GridSpec { width, height, transform, epsg, inverse })
    }

    /// World extent of the grid
    pub fn extent(&self) -> BoundingBox {
        BoundingBox::of_grid(&self.transform, self.width, self.height)
    }

    /// World-to-pixel transform
    pub fn inverse(&self) -> &GeoTransform {
        &self.inverse
    }

    /// Whether another grid has the same shape, transform and CRS
    ///
    /// Transforms are compared with a tolerance proportional to the cell size.
    /// A CRS mismatch is only reported when both grids declare one.
    pub fn is_aligned_with(&self, other: &GridSpec) -> bool {
        self.mismatch(other).is_none()
    }

    /// Fails with `ShapeMismatch` unless `other` is aligned with this grid
    pub fn ensure_aligned(&self, other: &GridSpec, context: &str) -> SampleResult<()> {
        match self.mismatch(other) {
            None => Ok(()),
            Some((expected, found)) => Err(SampleError::shape_mismatch(context, expected, found)),
        }
    }

    fn mismatch(&self, other: &GridSpec) -> Option<(String, String)> {
        if self.width != other.width || self.height != other.height {
            return Some((
                format!("{}x{} cells", self.width, self.height),
                format!("{}x{} cells", other.width, other.height),
            ));
        }

        let (px, py) = self.transform.pixel_size();
        let tolerance = ALIGNMENT_TOLERANCE * px.abs().max(py.abs());
        if !self.transform.approx_eq(&other.transform, tolerance) {
            return Some((
                format!("geotransform {}", self.transform),
                format!("geotransform {}", other.transform),
            ));
        }

        if let (Some(a), Some(b)) = (self.epsg, other.epsg) {
            if a != b {
                return Some((format!("EPSG:{}", a), format!("EPSG:{}", b)));
            }
        }

        None
    }

    /// World coordinate of the centre of cell (row, col)
    pub fn cell_center(&self, row: usize, col: usize) -> Coord<f64> {
        let (x, y) = self.transform.apply(col as f64 + 0.5, row as f64 + 0.5);
        coord! { x: x, y: y }
    }

    /// Footprint of cell (row, col) in world coordinates
    pub fn cell_polygon(&self, row: usize, col: usize) -> Polygon<f64> {
        let (c, r) = (col as f64, row as f64);
        let corners = [(c, r), (c + 1.0, r), (c + 1.0, r + 1.0), (c, r + 1.0), (c, r)];
        let ring: Vec<Coord<f64>> = corners
            .iter()
            .map(|&(c, r)| {
                let (x, y) = self.transform.apply(c, r);
                coord! { x: x, y: y }
            })
            .collect();
        Polygon::new(LineString::from(ring), vec![])
    }

    /// Fractional pixel coordinates (col, row) of a world coordinate
    pub fn to_pixel(&self, point: Coord<f64>) -> (f64, f64) {
        self.inverse.apply(point.x, point.y)
    }

    /// Cell containing a world coordinate
    ///
    /// Cells are half-open: a point on the boundary between two cells belongs
    /// to the one to its lower right in pixel space. Points on the outer
    /// right or bottom edge, or beyond, are outside the grid.
    pub fn cell_of(&self, point: Coord<f64>) -> Option<(usize, usize)> {
        let (col, row) = self.to_pixel(point);
        let (col, row) = (col.floor(), row.floor());
        if !(col.is_finite() && row.is_finite()) || col < 0.0 || row < 0.0 {
            return None;
        }

        let (col, row) = (col as usize, row as usize);
        if col < self.width && row < self.height {
            Some((row, col))
        } else {
            None
        }
    }

    /// Window of cells that may touch a world-space rectangle, clipped to the grid
    pub fn window_for_rect(&self, rect: &Rect<f64>) -> Option<Window> {
        BoundingBox::from_rect(rect).to_window(&self.inverse, self.width, self.height)
    }
}

impl fmt::Display for GridSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} grid, transform {}", self.width, self.height, self.transform)?;
        match self.epsg {
            Some(code) => write!(f, ", EPSG:{}", code),
            None => write!(f, ", no CRS"),
        }
    }
}
