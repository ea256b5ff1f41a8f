//! Affine geotransform between pixel and world coordinates

use std::fmt;

/// Affine transform in GDAL coefficient order
///
/// `x = c[0] + col * c[1] + row * c[2]` and `y = c[3] + col * c[4] + row * c[5]`,
/// where (col, row) = (0, 0) is the outer corner of the top-left pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    coeffs: [f64; 6],
}

impl GeoTransform {
    /// Creates a transform from its six coefficients
    pub fn new(coeffs: [f64; 6]) -> Self {
        GeoTransform { coeffs }
    }

    /// Creates a north-up transform
    ///
    /// # Arguments
    /// * `origin_x` - World X of the top-left corner
    /// * `origin_y` - World Y of the top-left corner
    /// * `pixel_width` - Cell size along X (positive)
    /// * `pixel_height` - Cell size along Y (positive, rows grow southwards)
    pub fn from_origin(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        GeoTransform::new([origin_x, pixel_width, 0.0, origin_y, 0.0, -pixel_height])
    }

    pub fn coefficients(&self) -> [f64; 6] {
        self.coeffs
    }

    /// World coordinates of the top-left corner
    pub fn origin(&self) -> (f64, f64) {
        (self.coeffs[0], self.coeffs[3])
    }

    /// Signed (x, y) cell sizes; y is negative for north-up rasters
    pub fn pixel_size(&self) -> (f64, f64) {
        (self.coeffs[1], self.coeffs[5])
    }

    /// Whether the transform has no rotation or shear terms
    pub fn is_north_up(&self) -> bool {
        self.coeffs[2] == 0.0 && self.coeffs[4] == 0.0
    }

    /// Maps fractional pixel coordinates to world coordinates
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        let c = &self.coeffs;
        (c[0] + col * c[1] + row * c[2], c[3] + col * c[4] + row * c[5])
    }

    /// Inverse transform (world to pixel), `None` when the matrix is singular
    pub fn inverse(&self) -> Option<GeoTransform> {
        let c = &self.coeffs;
        let det = c[1] * c[5] - c[2] * c[4];
        if det == 0.0 || !det.is_finite() {
            return None;
        }

        Some(GeoTransform::new([
            (c[2] * c[3] - c[5] * c[0]) / det,
            c[5] / det,
            -c[2] / det,
            (c[4] * c[0] - c[1] * c[3]) / det,
            -c[4] / det,
            c[1] / det,
        ]))
    }

    /// Transform whose origin sits at pixel (col, row) of this one
    pub fn shifted(&self, col: f64, row: f64) -> GeoTransform {
        let (x, y) = self.apply(col, row);
        let mut coeffs = self.coeffs;
        coeffs[0] = x;
        coeffs[3] = y;
        GeoTransform::new(coeffs)
    }

    /// Coefficient-wise comparison with an absolute tolerance
    pub fn approx_eq(&self, other: &GeoTransform, tolerance: f64) -> bool {
        self.coeffs
            .iter()
            .zip(other.coeffs.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl fmt::Display for GeoTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.coeffs;
        write!(f, "[{}, {}, {}, {}, {}, {}]", c[0], c[1], c[2], c[3], c[4], c[5])
    }
}
