//! Sampling strategies
//!
//! Each geometry kind has its own rule for which cells it samples. A strategy
//! only plans cells; reading values is left to the engine so that all
//! geometries share one pass over the raster.

use geo::{Coord, Rect};
use log::trace;

use super::line::LineStrategy;
use super::point::PointStrategy;
use super::polygon::PolygonStrategy;
use crate::coordinate::BoundingBox;
use crate::geometry::{Geometries, GeometrySet};
use crate::raster::GridSpec;

/// One planned sample of a geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellHit {
    /// A grid cell, by (row, col)
    Cell { row: usize, col: usize },
    /// A point that falls outside the grid, sampled as a masked row
    OutOfExtent(Coord<f64>),
}

/// Planned samples of one geometry, in emission order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryPlan {
    pub hits: Vec<CellHit>,
    /// `Some(fully)` when the geometry reaches outside the grid extent;
    /// `fully` is set when it yielded no in-extent cell at all
    pub out_of_extent: Option<bool>,
}

impl GeometryPlan {
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.hits.iter().filter_map(|hit| match hit {
            CellHit::Cell { row, col } => Some((*row, *col)),
            CellHit::OutOfExtent(_) => None,
        })
    }
}

/// Plans the cells sampled by each geometry of a set
pub trait SamplingStrategy {
    /// Number of geometries the strategy covers
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cells of the geometry at `index`, in emission order
    fn plan(&self, grid: &GridSpec, index: usize) -> GeometryPlan;
}

/// Picks the strategy matching the kind of a geometry set
pub fn strategy_for(set: &GeometrySet) -> Box<dyn SamplingStrategy + '_> {
    trace!("Sampling {} {} geometries", set.len(), set.kind());
    match set.geometries() {
        Geometries::Point(points) => Box::new(PointStrategy::new(points)),
        Geometries::Polygon(polygons) => Box::new(PolygonStrategy::new(polygons)),
        Geometries::LineString(lines) => Box::new(LineStrategy::new(lines)),
    }
}

/// Extent flag for an areal or linear geometry
///
/// Returns `None` when the geometry's bounding box lies within the grid
/// extent, otherwise whether no cell was sampled.
pub(crate) fn extent_status(grid: &GridSpec, bounds: Option<Rect<f64>>, hits: &[CellHit]) -> Option<bool> {
    let extent = grid.extent();
    let inside = match bounds {
        Some(rect) => {
            let bbox = BoundingBox::from_rect(&rect);
            extent.contains(bbox.min_x, bbox.min_y) && extent.contains(bbox.max_x, bbox.max_y)
        }
        None => false,
    };

    if inside {
        None
    } else {
        Some(hits.is_empty())
    }
}
