//! Property tests comparing the extractor against brute-force scans of the grid

use std::collections::HashSet;

use geo::{Intersects, LineString, Point, Polygon};
use proptest::prelude::*;

use rastersample::extractor::{ExtractOptions, Extractor};
use rastersample::raster::{GridSpec, MemoryRaster, RasterStack};
use rastersample::{ExtractionTable, GeoTransform, GeometrySet};

const ORIGIN_X: f64 = -3.0;
const ORIGIN_Y: f64 = 7.0;

fn grid(width: usize, height: usize) -> GridSpec {
    GridSpec::new(width, height, GeoTransform::from_origin(ORIGIN_X, ORIGIN_Y, 1.0, 1.0), None).unwrap()
}

/// One band holding each cell's row-major index
fn stack(width: usize, height: usize) -> RasterStack {
    let values = (0..width * height).map(|i| i as f64).collect();
    let raster = MemoryRaster::new("index", grid(width, height), vec![values]).unwrap();
    RasterStack::new(Box::new(raster))
}

fn extract(width: usize, height: usize, set: &GeometrySet, options: ExtractOptions) -> ExtractionTable {
    Extractor::new(options)
        .extract(&mut stack(width, height), set)
        .unwrap()
        .into_table()
}

fn cells_of(table: &ExtractionTable, geometry_index: usize, width: usize) -> Vec<(usize, usize)> {
    table
        .rows_of(geometry_index)
        .filter_map(|row| row.values[0])
        .map(|index| (index as usize / width, index as usize % width))
        .collect()
}

fn coordinate(width: usize, height: usize) -> impl Strategy<Value = (f64, f64)> {
    (
        (ORIGIN_X - 2.0)..(ORIGIN_X + width as f64 + 2.0),
        (ORIGIN_Y - height as f64 - 2.0)..(ORIGIN_Y + 2.0),
    )
}

fn sized_points() -> impl Strategy<Value = (usize, usize, Vec<(f64, f64)>)> {
    (1usize..10, 1usize..10).prop_flat_map(|(w, h)| (Just(w), Just(h), prop::collection::vec(coordinate(w, h), 0..20)))
}

fn sized_triangles() -> impl Strategy<Value = (usize, usize, Vec<[(f64, f64); 3]>)> {
    (1usize..10, 1usize..10).prop_flat_map(|(w, h)| {
        let triangle = [coordinate(w, h), coordinate(w, h), coordinate(w, h)];
        (Just(w), Just(h), prop::collection::vec(triangle, 1..5))
    })
}

fn sized_lines() -> impl Strategy<Value = (usize, usize, Vec<Vec<(f64, f64)>>)> {
    (1usize..10, 1usize..10).prop_flat_map(|(w, h)| {
        (Just(w), Just(h), prop::collection::vec(prop::collection::vec(coordinate(w, h), 2..5), 1..4))
    })
}

fn triangle(corners: &[(f64, f64); 3]) -> Polygon<f64> {
    let mut ring = corners.to_vec();
    ring.push(corners[0]);
    Polygon::new(LineString::from(ring), vec![])
}

proptest! {
    #[test]
    fn points_give_one_row_each((width, height, coords) in sized_points()) {
        let set = GeometrySet::points(coords.iter().map(|&(x, y)| Point::new(x, y)).collect());
        let table = extract(width, height, &set, ExtractOptions::default());

        prop_assert_eq!(table.len(), coords.len());
        for (index, (&(x, y), row)) in coords.iter().zip(&table.rows).enumerate() {
            prop_assert_eq!(row.geometry_index, index);
            prop_assert_eq!(row.pixel_index, 0);

            let col = (x - ORIGIN_X).floor();
            let r = (ORIGIN_Y - y).floor();
            let inside = col >= 0.0 && r >= 0.0 && (col as usize) < width && (r as usize) < height;
            prop_assert_eq!(row.in_extent, inside);
            if inside {
                prop_assert_eq!(row.values[0], Some(r * width as f64 + col));
            } else {
                prop_assert_eq!(row.values[0], None);
            }
        }
    }

    #[test]
    fn polygons_sample_cells_whose_centre_they_cover((width, height, triangles) in sized_triangles()) {
        let polygons: Vec<Polygon<f64>> = triangles.iter().map(triangle).collect();
        let grid = grid(width, height);
        let table = extract(width, height, &GeometrySet::polygons(polygons.clone()), ExtractOptions::default());

        for (index, polygon) in polygons.iter().enumerate() {
            let expected: Vec<(usize, usize)> = (0..height)
                .flat_map(|row| (0..width).map(move |col| (row, col)))
                .filter(|&(row, col)| polygon.intersects(&Point::from(grid.cell_center(row, col))))
                .collect();
            prop_assert_eq!(cells_of(&table, index, width), expected);
        }
    }

    #[test]
    fn lines_sample_every_touched_cell_once((width, height, paths) in sized_lines()) {
        let lines: Vec<LineString<f64>> = paths.iter().map(|path| LineString::from(path.clone())).collect();
        let grid = grid(width, height);
        let table = extract(width, height, &GeometrySet::linestrings(lines.clone()), ExtractOptions::default());

        for (index, line) in lines.iter().enumerate() {
            let expected: HashSet<(usize, usize)> = (0..height)
                .flat_map(|row| (0..width).map(move |col| (row, col)))
                .filter(|&(row, col)| grid.cell_polygon(row, col).intersects(line))
                .collect();
            let cells = cells_of(&table, index, width);
            let unique: HashSet<(usize, usize)> = cells.iter().copied().collect();

            prop_assert_eq!(unique.len(), cells.len());
            prop_assert_eq!(unique, expected);
        }
    }

    #[test]
    fn block_size_does_not_change_the_table((width, height, paths) in sized_lines(), block_rows in 1usize..6) {
        let set = GeometrySet::linestrings(paths.into_iter().map(LineString::from).collect());
        let whole = extract(width, height, &set, ExtractOptions::default());
        let blocked = extract(width, height, &set, ExtractOptions::default().with_block_rows(block_rows));
        prop_assert_eq!(whole, blocked);
    }

    #[test]
    fn repeated_polygons_repeat_their_rows((width, height, triangles) in sized_triangles()) {
        let polygon = triangle(&triangles[0]);
        let set = GeometrySet::polygons(vec![polygon.clone(), polygon]);
        let table = extract(width, height, &set, ExtractOptions::default());

        let first: Vec<_> = table.rows_of(0).map(|row| (row.pixel_index, row.values.clone())).collect();
        let second: Vec<_> = table.rows_of(1).map(|row| (row.pixel_index, row.values.clone())).collect();
        prop_assert_eq!(table.len(), first.len() * 2);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn tables_survive_the_array_form((width, height, coords) in sized_points()) {
        let set = GeometrySet::points(coords.iter().map(|&(x, y)| Point::new(x, y)).collect());
        let table = extract(width, height, &set, ExtractOptions::default());
        prop_assert_eq!(table.to_arrays().to_table(), table);
    }

    #[test]
    fn labelled_rows_skip_nodata(
        (width, height, labels) in (1usize..10, 1usize..10)
            .prop_flat_map(|(w, h)| (Just(w), Just(h), prop::collection::vec(0u8..4, w * h))),
        block_rows in 1usize..6,
    ) {
        let values: Vec<f64> = labels.iter().map(|&label| label as f64).collect();
        let mut label_raster = MemoryRaster::new("labels", grid(width, height), vec![values])
            .unwrap()
            .with_nodata(Some(0.0));

        let table = Extractor::new(ExtractOptions::default().with_block_rows(block_rows))
            .extract_from_raster(&mut stack(width, height), &mut label_raster)
            .unwrap();

        let expected: Vec<(usize, f64)> = labels
            .iter()
            .enumerate()
            .filter(|(_, label)| **label != 0)
            .map(|(index, label)| (index, *label as f64))
            .collect();
        let found: Vec<(usize, f64)> = table
            .rows
            .iter()
            .map(|row| (row.row * width + row.col, row.label))
            .collect();
        prop_assert_eq!(found, expected);
        for row in &table.rows {
            prop_assert_eq!(row.values[0], Some((row.row * width + row.col) as f64));
        }
    }
}
