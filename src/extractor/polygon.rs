//! Polygon sampling: cells whose centre lies in the polygon

use geo::{BoundingRect, Intersects, Point, Polygon};

use super::strategy::{extent_status, CellHit, GeometryPlan, SamplingStrategy};
use crate::raster::GridSpec;

/// Samples every cell whose centre intersects a polygon
///
/// The boundary counts as inside, including hole boundaries. Candidates are
/// the cells of the polygon's bounding window, visited row-major.
pub struct PolygonStrategy<'a> {
    polygons: &'a [Polygon<f64>],
}

impl<'a> PolygonStrategy<'a> {
    pub fn new(polygons: &'a [Polygon<f64>]) -> Self {
        PolygonStrategy { polygons }
    }
}

impl SamplingStrategy for PolygonStrategy<'_> {
    fn len(&self) -> usize {
        self.polygons.len()
    }

    fn plan(&self, grid: &GridSpec, index: usize) -> GeometryPlan {
        let Some(polygon) = self.polygons.get(index) else {
            return GeometryPlan::default();
        };

        let bounds = polygon.bounding_rect();
        let mut hits = Vec::new();
        if let Some(window) = bounds.and_then(|rect| grid.window_for_rect(&rect)) {
            for row in window.row..window.end_row() {
                for col in window.col..window.end_col() {
                    let center = Point::from(grid.cell_center(row, col));
                    if polygon.intersects(&center) {
                        hits.push(CellHit::Cell { row, col });
                    }
                }
            }
        }

        let out_of_extent = extent_status(grid, bounds, &hits);
        GeometryPlan { hits, out_of_extent }
    }
}
