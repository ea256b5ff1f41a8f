//! End-to-end tests: GeoTIFF files on disk, GeoJSON geometries, written tables

extern crate std;

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use rastersample::config::OutputFormat;
use rastersample::extractor::{ExtractOptions, ExtractionWarning, OutputMode};
use rastersample::raster::{GeoTiffRaster, RasterSource, RasterStack, Window};
use rastersample::tiff::{ChunkLayout, GeoTiffWriter, SampleType};
use rastersample::{GeoTransform, GridSpec, RasterSample, SampleError};

const WIDTH: usize = 6;
const HEIGHT: usize = 4;
const ORIGIN_X: f64 = 500000.0;
const ORIGIN_Y: f64 = 4000000.0;

fn transform() -> GeoTransform {
    GeoTransform::from_origin(ORIGIN_X, ORIGIN_Y, 10.0, 10.0)
}

/// Map coordinate of the centre of a cell
fn center(row: usize, col: usize) -> (f64, f64) {
    (ORIGIN_X + 10.0 * col as f64 + 5.0, ORIGIN_Y - 10.0 * row as f64 - 5.0)
}

/// Band holding `offset + row * 10 + col`
fn band(offset: f64) -> Vec<f64> {
    (0..WIDTH * HEIGHT)
        .map(|i| offset + ((i / WIDTH) * 10 + i % WIDTH) as f64)
        .collect()
}

fn write_raster(dir: &Path, name: &str, writer: GeoTiffWriter, bands: &[Vec<f64>]) -> PathBuf {
    let path = dir.join(name);
    writer
        .with_epsg(Some(32633))
        .write(&path, WIDTH, HEIGHT, &transform(), bands)
        .unwrap();
    path
}

/// Two uint16 bands named blue and green, nodata 0 at cell (3, 5)
fn write_scene(dir: &Path) -> PathBuf {
    let mut blue = band(1.0);
    blue[3 * WIDTH + 5] = 0.0;
    let writer = GeoTiffWriter::new(SampleType::U16)
        .with_nodata(Some(0.0))
        .with_band_names(vec!["blue".to_string(), "green".to_string()]);
    write_raster(dir, "scene.tif", writer, &[blue, band(200.0)])
}

fn write_geojson(dir: &Path, name: &str, features: &[String]) -> PathBuf {
    let path = dir.join(name);
    let document = format!(r#"{{"type": "FeatureCollection", "features": [{}]}}"#, features.join(","));
    fs::write(&path, document).unwrap();
    path
}

fn point_feature(x: f64, y: f64, class: &str) -> String {
    format!(
        r#"{{"type": "Feature", "properties": {{"class": "{}"}}, "geometry": {{"type": "Point", "coordinates": [{}, {}]}}}}"#,
        class, x, y
    )
}

#[test]
fn test_layouts_read_back_identically() {
    let dir = TempDir::new().unwrap();
    let signed: Vec<f64> = band(0.0).iter().map(|v| v - 20.0).collect();
    let fractional: Vec<f64> = band(0.0).iter().map(|v| v + 0.25).collect();

    let cases: Vec<(&str, GeoTiffWriter, Vec<Vec<f64>>)> = vec![
        ("strips.tif", GeoTiffWriter::new(SampleType::U8)
            .with_layout(ChunkLayout::Strips { rows_per_strip: 3 }), vec![band(0.0)]),
        ("tiles.tif", GeoTiffWriter::new(SampleType::U16)
            .with_compression("deflate").unwrap()
            .with_layout(ChunkLayout::Tiles { width: 16, height: 16 }), vec![band(0.0), band(1000.0)]),
        ("planar.tif", GeoTiffWriter::new(SampleType::F32)
            .with_compression("zstd").unwrap()
            .with_planar(true), vec![fractional.clone(), band(50.0)]),
        ("predictor.tif", GeoTiffWriter::new(SampleType::I16)
            .with_compression("deflate").unwrap()
            .with_predictor(true)
            .with_layout(ChunkLayout::Strips { rows_per_strip: 1 }), vec![signed.clone(), band(7.0)]),
        ("double.tif", GeoTiffWriter::new(SampleType::F64), vec![fractional.clone()]),
    ];

    for (name, writer, bands) in cases {
        let path = write_raster(dir.path(), name, writer, &bands);
        let mut raster = GeoTiffRaster::open(&path).unwrap();

        std::assert_eq!(raster.band_count(), bands.len(), "{}", name);
        std::assert_eq!(raster.grid().width, WIDTH);
        std::assert_eq!(raster.grid().height, HEIGHT);
        std::assert_eq!(raster.grid().epsg, Some(32633));
        std::assert!(raster.grid().transform.approx_eq(&transform(), 1e-9));

        let full = raster.read_window(Window::full(WIDTH, HEIGHT)).unwrap();
        std::assert_eq!(full.bands, bands, "{}", name);

        // A window crossing chunk boundaries
        let block = raster.read_window(Window::new(2, 1, 3, 3)).unwrap();
        std::assert_eq!(block.value(0, 1, 2), Some(bands[0][WIDTH + 2]), "{}", name);
        std::assert_eq!(block.value(0, 3, 4), Some(bands[0][3 * WIDTH + 4]), "{}", name);
        std::assert_eq!(block.value(0, 0, 0), None);
    }
}

#[test]
fn test_window_outside_grid_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_scene(dir.path());
    let mut raster = GeoTiffRaster::open(&path).unwrap();
    std::assert!(raster.read_window(Window::new(4, 0, 3, 1)).is_err());
}

#[test]
fn test_extract_points_from_files() {
    let dir = TempDir::new().unwrap();
    let scene = write_scene(dir.path());
    let (x, y) = center(1, 2);
    let (nx, ny) = center(3, 5);
    let vector = write_geojson(dir.path(), "points.geojson", &[
        point_feature(x, y, "water"),
        point_feature(0.0, 0.0, "far"),
        point_feature(nx, ny, "shadow"),
    ]);

    let api = RasterSample::default();
    let (result, geometries) = api.extract(&[&scene], &vector).unwrap();
    let table = result.into_table();

    std::assert_eq!(table.band_names, vec!["blue", "green"]);
    std::assert_eq!(table.len(), 3);

    let first = &table.rows[0];
    std::assert!(first.in_extent);
    std::assert_eq!(first.values, vec![Some(13.0), Some(212.0)]);
    std::assert_eq!((first.location.x(), first.location.y()), (x, y));

    let outside = &table.rows[1];
    std::assert!(!outside.in_extent);
    std::assert_eq!(outside.values, vec![None, None]);
    std::assert_eq!(table.warnings, vec![ExtractionWarning::OutOfExtent { geometry_index: 1, fully: true }]);

    // Nodata masks only the band that carries it
    std::assert_eq!(table.rows[2].values, vec![None, Some(235.0)]);

    let classes: Vec<String> = table
        .join_attribute(&geometries, "class")
        .into_iter()
        .map(|value| value.and_then(|v| v.as_str().map(str::to_string)).unwrap_or_default())
        .collect();
    std::assert_eq!(classes, vec!["water", "far", "shadow"]);
}

#[test]
fn test_extract_polygon_and_line_from_files() {
    let dir = TempDir::new().unwrap();
    let scene = write_scene(dir.path());

    // Covers cells rows 1..=2, cols 1..=2 exactly
    let polygon = format!(
        r#"{{"type": "Feature", "properties": {{}}, "geometry": {{"type": "Polygon", "coordinates": [[[{x0}, {y0}], [{x1}, {y0}], [{x1}, {y1}], [{x0}, {y1}], [{x0}, {y0}]]]}}}}"#,
        x0 = ORIGIN_X + 10.0, x1 = ORIGIN_X + 30.0, y0 = ORIGIN_Y - 30.0, y1 = ORIGIN_Y - 10.0
    );
    let polygons = write_geojson(dir.path(), "polygons.geojson", &[polygon]);

    let api = RasterSample::default();
    let table = api.extract(&[&scene], &polygons).unwrap().0.into_table();
    let blue: Vec<Option<f64>> = table.rows.iter().map(|row| row.values[0]).collect();
    std::assert_eq!(blue, vec![Some(12.0), Some(13.0), Some(22.0), Some(23.0)]);
    std::assert!(table.warnings.is_empty());

    // Right to left along the centre line of row 0
    let (_, y) = center(0, 0);
    let line = format!(
        r#"{{"type": "Feature", "properties": {{}}, "geometry": {{"type": "LineString", "coordinates": [[{}, {y}], [{}, {y}]]}}}}"#,
        ORIGIN_X + 59.0, ORIGIN_X + 1.0, y = y
    );
    let lines = write_geojson(dir.path(), "lines.geojson", &[line]);
    let table = api.extract(&[&scene], &lines).unwrap().0.into_table();
    let blue: Vec<Option<f64>> = table.rows.iter().map(|row| row.values[0]).collect();
    std::assert_eq!(blue, vec![Some(6.0), Some(5.0), Some(4.0), Some(3.0), Some(2.0), Some(1.0)]);
    let pixel_indices: Vec<usize> = table.rows.iter().map(|row| row.pixel_index).collect();
    std::assert_eq!(pixel_indices, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_array_mode_and_strict_mode() {
    let dir = TempDir::new().unwrap();
    let scene = write_scene(dir.path());
    let (x, y) = center(0, 0);
    let vector = write_geojson(dir.path(), "points.geojson", &[
        point_feature(x, y, "a"),
        point_feature(-1.0, -1.0, "b"),
    ]);

    let arrays = RasterSample::new(ExtractOptions::default().with_mode(OutputMode::Arrays))
        .extract(&[&scene], &vector)
        .unwrap()
        .0
        .into_arrays();
    std::assert_eq!(arrays.len(), 2);
    std::assert_eq!(arrays.band(0).unwrap()[0].to_option(), Some(1.0));
    std::assert!(!arrays.band(0).unwrap()[1].valid);
    std::assert!(arrays.coordinates[0].valid);
    std::assert!(!arrays.coordinates[1].valid);

    let far_only = write_geojson(dir.path(), "far.geojson", &[point_feature(-1.0, -1.0, "b")]);
    let strict = RasterSample::new(ExtractOptions::default().with_strict(true));
    std::assert!(matches!(strict.extract(&[&scene], &far_only), Err(SampleError::EmptyResult)));
    std::assert!(strict.extract(&[&scene], &vector).is_ok());
}

#[test]
fn test_stacked_files_and_misaligned_grid() {
    let dir = TempDir::new().unwrap();
    let scene = write_scene(dir.path());
    let extra = write_raster(dir.path(), "extra.tif", GeoTiffWriter::new(SampleType::U8), &[band(0.0)]);

    let stack = RasterStack::open(&[&scene, &extra]).unwrap();
    std::assert_eq!(stack.band_count(), 3);
    std::assert_eq!(stack.band_names(), vec!["blue", "green", "extra"]);

    let shifted = dir.path().join("shifted.tif");
    GeoTiffWriter::new(SampleType::U8)
        .write(&shifted, WIDTH, HEIGHT, &GeoTransform::from_origin(ORIGIN_X + 5.0, ORIGIN_Y, 10.0, 10.0), &[band(0.0)])
        .unwrap();
    std::assert!(matches!(RasterStack::open(&[&scene, &shifted]), Err(SampleError::ShapeMismatch { .. })));
}

#[test]
fn test_extract_labels_from_file() {
    let dir = TempDir::new().unwrap();
    let scene = write_scene(dir.path());

    let mut labels = vec![0.0; WIDTH * HEIGHT];
    labels[WIDTH + 4] = 2.0;
    labels[1] = 1.0;
    labels[3 * WIDTH] = 1.0;
    let label_path = write_raster(
        dir.path(),
        "labels.tif",
        GeoTiffWriter::new(SampleType::U8).with_nodata(Some(0.0)),
        &[labels],
    );

    let api = RasterSample::default();
    let table = api.extract_labels(&[&scene], &label_path).unwrap();
    let cells: Vec<(usize, usize)> = table.rows.iter().map(|row| (row.row, row.col)).collect();
    std::assert_eq!(cells, vec![(0, 1), (1, 4), (3, 0)]);
    std::assert_eq!(table.labels(), vec![1.0, 2.0, 1.0]);
    std::assert_eq!(table.feature_matrix()[1], vec![15.0, 214.0]);

    let csv_path = dir.path().join("labels.csv");
    api.write_labelled(&table, &csv_path, OutputFormat::Csv).unwrap();
    let text = fs::read_to_string(&csv_path).unwrap();
    std::assert!(text.starts_with("label,row,col,x,y,blue,green"));
    std::assert!(api.write_labelled(&table, dir.path().join("labels.geojson"), OutputFormat::GeoJson).is_err());
}

#[test]
fn test_write_table_formats() {
    let dir = TempDir::new().unwrap();
    let scene = write_scene(dir.path());
    let (x, y) = center(2, 3);
    let vector = write_geojson(dir.path(), "points.geojson", &[
        point_feature(x, y, "a"),
        point_feature(1.0, 1.0, "b"),
    ]);

    let api = RasterSample::default();
    let table = api.extract(&[&scene], &vector).unwrap().0.into_table();

    let csv_path = dir.path().join("samples.csv");
    api.write_table(&table, &csv_path, OutputFormat::Csv).unwrap();
    let csv_text = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv_text.lines().collect();
    std::assert_eq!(lines[0], "geometry_index,pixel_index,x,y,in_extent,blue,green");
    std::assert_eq!(lines.len(), 3);
    std::assert!(lines[1].ends_with(",true,24,223"));
    std::assert!(lines[2].ends_with(",false,,"));

    let geojson_path = dir.path().join("samples.geojson");
    api.write_table(&table, &geojson_path, OutputFormat::GeoJson).unwrap();
    let collection: geojson::FeatureCollection = fs::read_to_string(&geojson_path).unwrap().parse::<geojson::GeoJson>()
        .unwrap()
        .try_into()
        .unwrap();
    std::assert_eq!(collection.features.len(), 2);
    let properties = collection.features[1].properties.as_ref().unwrap();
    std::assert!(properties["blue"].is_null());

    let json_path = dir.path().join("samples.json");
    api.write_table(&table, &json_path, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    std::assert_eq!(value["bands"], serde_json::json!(["blue", "green"]));
    std::assert_eq!(value["rows"].as_array().unwrap().len(), 2);
    std::assert_eq!(value["warnings"][0]["kind"], "out_of_extent");
}

#[test]
fn test_describe_and_write_surface() {
    let dir = TempDir::new().unwrap();
    let scene = write_scene(dir.path());
    let api = RasterSample::default();

    let description = api.describe(&scene).unwrap();
    std::assert!(description.contains("Size: 6x4"));
    std::assert!(description.contains("EPSG:32633"));
    std::assert!(description.contains("uint16"));
    std::assert!(description.contains("1: blue (nodata 0)"));

    let grid = GridSpec::new(WIDTH, HEIGHT, transform(), Some(32633)).unwrap();
    let mut surface = band(0.5);
    surface[0] = f64::NAN;
    let surface_path = dir.path().join("surface.tif");
    api.write_surface(&surface_path, &grid, surface).unwrap();

    let mut stack = api.open_stack(&[&surface_path]).unwrap();
    let masked = stack.read_masked(Window::new(0, 0, 2, 1)).unwrap();
    std::assert_eq!(masked, vec![vec![None, Some(1.5)]]);
}

#[test]
fn test_missing_inputs_name_the_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.tif");
    match GeoTiffRaster::open(&missing) {
        Err(SampleError::Resource { path, .. }) => std::assert_eq!(path, missing),
        other => std::panic!("expected a resource error, got {:?}", other.map(|_| ())),
    }

    let scene = write_scene(dir.path());
    let vector = dir.path().join("missing.geojson");
    std::assert!(matches!(
        RasterSample::default().extract(&[&scene], &vector),
        Err(SampleError::Resource { .. })
    ));
}
