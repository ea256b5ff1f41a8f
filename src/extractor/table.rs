//! Table-form extraction output

use std::io::Write;

use geo::Point;
use geojson::{Feature, FeatureCollection, JsonObject};
use serde::Serialize;
use serde_json::Value;

use super::masked::{Masked, MaskedArrays};
use super::result::ExtractionWarning;
use crate::error::SampleResult;
use crate::geometry::GeometrySet;

/// One sampled pixel of one geometry
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    /// Position of the source geometry in its set
    pub geometry_index: usize,
    /// Position of the pixel among the geometry's samples, from zero
    pub pixel_index: usize,
    /// Cell centre, or the point itself for an out-of-extent point
    pub location: Point<f64>,
    /// One value per band, `None` where the band is nodata
    pub values: Vec<Option<f64>>,
    pub in_extent: bool,
}

/// Rows of sampled pixels keyed by (geometry index, pixel index)
///
/// Rows follow geometry order, then the pixel order of each geometry's
/// sampling rule.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractionTable {
    pub band_names: Vec<String>,
    pub rows: Vec<SampleRow>,
    pub warnings: Vec<ExtractionWarning>,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    geometry_index: usize,
    pixel_index: usize,
    x: f64,
    y: f64,
    in_extent: bool,
    values: &'a [Option<f64>],
}

#[derive(Serialize)]
struct JsonTable<'a> {
    bands: &'a [String],
    rows: Vec<JsonRow<'a>>,
    warnings: &'a [ExtractionWarning],
}

impl ExtractionTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows of one geometry
    pub fn rows_of(&self, geometry_index: usize) -> impl Iterator<Item = &SampleRow> + '_ {
        self.rows.iter().filter(move |row| row.geometry_index == geometry_index)
    }

    fn complete_rows(&self) -> impl Iterator<Item = &SampleRow> + '_ {
        self.rows
            .iter()
            .filter(|row| row.in_extent && row.values.iter().all(Option::is_some))
    }

    /// Band values of every in-extent row without missing values
    pub fn feature_matrix(&self) -> Vec<Vec<f64>> {
        self.complete_rows()
            .map(|row| row.values.iter().flatten().copied().collect())
            .collect()
    }

    /// Geometry index of each feature matrix row
    ///
    /// Pixels of one geometry share a group, which keeps them on the same
    /// side of a grouped train/test split.
    pub fn groups(&self) -> Vec<usize> {
        self.complete_rows().map(|row| row.geometry_index).collect()
    }

    /// Looks up an attribute of each row's source geometry
    pub fn join_attribute(&self, set: &GeometrySet, key: &str) -> Vec<Option<Value>> {
        self.rows
            .iter()
            .map(|row| set.attribute(row.geometry_index, key).cloned())
            .collect()
    }

    /// Converts to parallel masked arrays
    pub fn to_arrays(&self) -> MaskedArrays {
        let geometry_ids = self.rows.iter().map(|row| Masked::valid(row.geometry_index)).collect();
        let coordinates = self
            .rows
            .iter()
            .map(|row| Masked::new(row.location, row.in_extent))
            .collect();
        let values = (0..self.band_names.len())
            .map(|band| {
                self.rows
                    .iter()
                    .map(|row| Masked::from_option(row.values.get(band).copied().flatten()))
                    .collect()
            })
            .collect();

        MaskedArrays {
            band_names: self.band_names.clone(),
            geometry_ids,
            values,
            coordinates,
            warnings: self.warnings.clone(),
        }
    }

    /// Writes the table as CSV, missing values as empty fields
    ///
    /// # Arguments
    /// * `writer` - Destination of the CSV text
    pub fn write_csv<W: Write>(&self, writer: W) -> SampleResult<()> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = vec![
            "geometry_index".to_string(),
            "pixel_index".to_string(),
            "x".to_string(),
            "y".to_string(),
            "in_extent".to_string(),
        ];
        header.extend(self.band_names.iter().cloned());
        csv.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![
                row.geometry_index.to_string(),
                row.pixel_index.to_string(),
                row.location.x().to_string(),
                row.location.y().to_string(),
                row.in_extent.to_string(),
            ];
            record.extend(row.values.iter().map(|v| v.map(|v| v.to_string()).unwrap_or_default()));
            csv.write_record(&record)?;
        }

        csv.flush()?;
        Ok(())
    }

    /// Writes the table as a JSON document with bands, rows and warnings
    pub fn write_json<W: Write>(&self, writer: W) -> SampleResult<()> {
        let document = JsonTable {
            bands: &self.band_names,
            rows: self
                .rows
                .iter()
                .map(|row| JsonRow {
                    geometry_index: row.geometry_index,
                    pixel_index: row.pixel_index,
                    x: row.location.x(),
                    y: row.location.y(),
                    in_extent: row.in_extent,
                    values: &row.values,
                })
                .collect(),
            warnings: &self.warnings,
        };
        serde_json::to_writer_pretty(writer, &document)?;
        Ok(())
    }

    /// Point features, one per row, with band values as properties
    pub fn to_geojson(&self) -> FeatureCollection {
        let features = self
            .rows
            .iter()
            .map(|row| {
                let mut properties = JsonObject::new();
                properties.insert("geometry_index".to_string(), Value::from(row.geometry_index));
                properties.insert("pixel_index".to_string(), Value::from(row.pixel_index));
                properties.insert("in_extent".to_string(), Value::from(row.in_extent));
                for (name, value) in self.band_names.iter().zip(&row.values) {
                    let value = value.map(Value::from).unwrap_or(Value::Null);
                    properties.insert(name.clone(), value);
                }

                Feature {
                    bbox: None,
                    geometry: Some(geojson::Geometry::new(geojson::Value::Point(vec![
                        row.location.x(),
                        row.location.y(),
                    ]))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    /// Writes [`to_geojson`](Self::to_geojson) as text
    pub fn write_geojson<W: Write>(&self, writer: W) -> SampleResult<()> {
        serde_json::to_writer_pretty(writer, &self.to_geojson())?;
        Ok(())
    }
}
