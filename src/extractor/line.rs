//! Line sampling: cells whose footprint the path touches

use std::collections::HashSet;

use geo::{BoundingRect, Intersects, Line, LineString};

use super::strategy::{extent_status, CellHit, GeometryPlan, SamplingStrategy};
use crate::raster::GridSpec;

/// Slack on the row-band clipping parameter
const BAND_EPSILON: f64 = 1e-9;

/// Samples every cell whose closed footprint intersects a line string
///
/// Segments are walked vertex to vertex. Within a segment, candidate rows
/// and then columns are visited in the direction of travel and each
/// candidate is confirmed with an exact footprint/segment test. A cell
/// reached again later on the same line is not repeated.
pub struct LineStrategy<'a> {
    lines: &'a [LineString<f64>],
}

impl<'a> LineStrategy<'a> {
    pub fn new(lines: &'a [LineString<f64>]) -> Self {
        LineStrategy { lines }
    }
}

impl SamplingStrategy for LineStrategy<'_> {
    fn len(&self) -> usize {
        self.lines.len()
    }

    fn plan(&self, grid: &GridSpec, index: usize) -> GeometryPlan {
        let Some(line) = self.lines.get(index) else {
            return GeometryPlan::default();
        };

        let mut seen = HashSet::new();
        let mut hits = Vec::new();
        for segment in line.lines() {
            for (row, col) in segment_cells(grid, &segment) {
                if seen.insert((row, col)) {
                    hits.push(CellHit::Cell { row, col });
                }
            }
        }

        let out_of_extent = extent_status(grid, line.bounding_rect(), &hits);
        GeometryPlan { hits, out_of_extent }
    }
}

/// Cells touched by one segment, in the direction of travel
///
/// # Arguments
/// * `grid` - Grid the cells belong to
/// * `segment` - Segment in world coordinates
///
/// # Returns
/// (row, col) pairs, possibly with cells shared with neighbouring segments
pub(crate) fn segment_cells(grid: &GridSpec, segment: &Line<f64>) -> Vec<(usize, usize)> {
    let (c0, r0) = grid.to_pixel(segment.start);
    let (c1, r1) = grid.to_pixel(segment.end);

    let rows = candidate_range(r0.min(r1), r0.max(r1), grid.height);
    let Some((row_start, row_end)) = rows else {
        return Vec::new();
    };

    let mut rows: Vec<usize> = (row_start..=row_end).collect();
    if r1 < r0 {
        rows.reverse();
    }

    let mut cells = Vec::new();
    for row in rows {
        let Some((x_min, x_max)) = band_interval((c0, r0), (c1, r1), row as f64) else {
            continue;
        };
        let Some((col_start, col_end)) = candidate_range(x_min, x_max, grid.width) else {
            continue;
        };

        let mut cols: Vec<usize> = (col_start..=col_end).collect();
        if c1 < c0 {
            cols.reverse();
        }

        for col in cols {
            if grid.cell_polygon(row, col).intersects(segment) {
                cells.push((row, col));
            }
        }
    }
    cells
}

/// Pixel-space column interval of the segment inside the band [row, row + 1]
fn band_interval(start: (f64, f64), end: (f64, f64), row: f64) -> Option<(f64, f64)> {
    let (c0, r0) = start;
    let (c1, r1) = end;
    let dr = r1 - r0;

    if dr.abs() < f64::EPSILON {
        if r0 < row - BAND_EPSILON || r0 > row + 1.0 + BAND_EPSILON {
            return None;
        }
        return Some((c0.min(c1), c0.max(c1)));
    }

    let ta = (row - r0) / dr;
    let tb = (row + 1.0 - r0) / dr;
    let lo = ta.min(tb).max(0.0);
    let hi = ta.max(tb).min(1.0);
    if lo > hi + BAND_EPSILON {
        return None;
    }

    let (lo, hi) = (lo.min(hi), hi.max(lo));
    let xa = c0 + lo * (c1 - c0);
    let xb = c0 + hi * (c1 - c0);
    Some((xa.min(xb), xa.max(xb)))
}

/// Cell indices from one below `min` to one above `max`, clipped to `[0, size)`
fn candidate_range(min: f64, max: f64, size: usize) -> Option<(usize, usize)> {
    if size == 0 || !(min.is_finite() && max.is_finite()) {
        return None;
    }

    let start = (min.floor() - 1.0).max(0.0);
    let end = (max.floor() + 1.0).min(size as f64 - 1.0);
    if end < 0.0 || start > end {
        return None;
    }
    Some((start as usize, end as usize))
}
