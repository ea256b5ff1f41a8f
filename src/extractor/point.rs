//! Point sampling: the one cell containing each point

use geo::Point;

use super::strategy::{CellHit, GeometryPlan, SamplingStrategy};
use crate::raster::GridSpec;

/// Samples the cell under each point
///
/// A point outside the grid still yields one hit, so every point maps to
/// exactly one output row.
pub struct PointStrategy<'a> {
    points: &'a [Point<f64>],
}

impl<'a> PointStrategy<'a> {
    pub fn new(points: &'a [Point<f64>]) -> Self {
        PointStrategy { points }
    }
}

impl SamplingStrategy for PointStrategy<'_> {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn plan(&self, grid: &GridSpec, index: usize) -> GeometryPlan {
        let Some(point) = self.points.get(index) else {
            return GeometryPlan::default();
        };

        match grid.cell_of(point.0) {
            Some((row, col)) => GeometryPlan {
                hits: vec![CellHit::Cell { row, col }],
                out_of_extent: None,
            },
            None => GeometryPlan {
                hits: vec![CellHit::OutOfExtent(point.0)],
                out_of_extent: Some(true),
            },
        }
    }
}
