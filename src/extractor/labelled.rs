//! Output of sampling a stack under a labelled raster

use std::io::Write;

use geo::Point;
use serde::Serialize;

use crate::error::SampleResult;

/// One labelled pixel
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledRow {
    pub label: f64,
    pub row: usize,
    pub col: usize,
    /// Cell centre
    pub location: Point<f64>,
    pub values: Vec<Option<f64>>,
}

/// Labelled pixels in row-major order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelledTable {
    pub band_names: Vec<String>,
    pub rows: Vec<LabelledRow>,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    label: f64,
    row: usize,
    col: usize,
    x: f64,
    y: f64,
    values: &'a [Option<f64>],
}

impl LabelledTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn complete_rows(&self) -> impl Iterator<Item = &LabelledRow> + '_ {
        self.rows.iter().filter(|row| row.values.iter().all(Option::is_some))
    }

    /// Band values of every row without missing values
    pub fn feature_matrix(&self) -> Vec<Vec<f64>> {
        self.complete_rows()
            .map(|row| row.values.iter().flatten().copied().collect())
            .collect()
    }

    /// Label of each feature matrix row
    pub fn labels(&self) -> Vec<f64> {
        self.complete_rows().map(|row| row.label).collect()
    }

    /// Writes the table as CSV, missing values as empty fields
    pub fn write_csv<W: Write>(&self, writer: W) -> SampleResult<()> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header: Vec<String> = ["label", "row", "col", "x", "y"].iter().map(|s| s.to_string()).collect();
        header.extend(self.band_names.iter().cloned());
        csv.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![
                row.label.to_string(),
                row.row.to_string(),
                row.col.to_string(),
                row.location.x().to_string(),
                row.location.y().to_string(),
            ];
            record.extend(row.values.iter().map(|v| v.map(|v| v.to_string()).unwrap_or_default()));
            csv.write_record(&record)?;
        }

        csv.flush()?;
        Ok(())
    }

    /// Writes the table as a JSON document with bands and rows
    pub fn write_json<W: Write>(&self, writer: W) -> SampleResult<()> {
        let rows: Vec<JsonRow<'_>> = self
            .rows
            .iter()
            .map(|row| JsonRow {
                label: row.label,
                row: row.row,
                col: row.col,
                x: row.location.x(),
                y: row.location.y(),
                values: &row.values,
            })
            .collect();

        serde_json::to_writer_pretty(writer, &serde_json::json!({
            "bands": self.band_names,
            "rows": rows,
        }))?;
        Ok(())
    }
}
