//! Array-form extraction output

use geo::Point;

use super::result::ExtractionWarning;
use super::table::{ExtractionTable, SampleRow};

/// A value paired with its validity flag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Masked<T> {
    pub value: T,
    pub valid: bool,
}

impl<T> Masked<T> {
    pub fn new(value: T, valid: bool) -> Self {
        Masked { value, valid }
    }

    pub fn valid(value: T) -> Self {
        Masked { value, valid: true }
    }
}

impl Masked<f64> {
    /// Masked entries hold NaN
    pub fn from_option(value: Option<f64>) -> Self {
        match value {
            Some(value) => Masked::valid(value),
            None => Masked::new(f64::NAN, false),
        }
    }

    pub fn to_option(&self) -> Option<f64> {
        if self.valid { Some(self.value) } else { None }
    }
}

/// Extraction output as parallel masked sequences
///
/// `geometry_ids` and `coordinates` hold one entry per sampled pixel and
/// `values` holds one such sequence per band. A coordinate is masked when
/// its sample lies outside the raster; its value is still the point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaskedArrays {
    pub band_names: Vec<String>,
    pub geometry_ids: Vec<Masked<usize>>,
    /// Indexed by band, then sample
    pub values: Vec<Vec<Masked<f64>>>,
    pub coordinates: Vec<Masked<Point<f64>>>,
    pub warnings: Vec<ExtractionWarning>,
}

impl MaskedArrays {
    pub fn len(&self) -> usize {
        self.geometry_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry_ids.is_empty()
    }

    /// Values of one band
    pub fn band(&self, band: usize) -> Option<&[Masked<f64>]> {
        self.values.get(band).map(Vec::as_slice)
    }

    /// Converts back to table rows
    ///
    /// Pixel indices restart at zero whenever the geometry id changes.
    pub fn to_table(&self) -> ExtractionTable {
        let mut rows = Vec::with_capacity(self.len());
        let mut previous: Option<usize> = None;
        let mut pixel_index = 0;

        for (sample, (id, coordinate)) in self.geometry_ids.iter().zip(&self.coordinates).enumerate() {
            if previous == Some(id.value) {
                pixel_index += 1;
            } else {
                pixel_index = 0;
                previous = Some(id.value);
            }

            let values = self
                .values
                .iter()
                .map(|band| band.get(sample).and_then(Masked::to_option))
                .collect();

            rows.push(SampleRow {
                geometry_index: id.value,
                pixel_index,
                location: coordinate.value,
                values,
                in_extent: coordinate.valid,
            });
        }

        ExtractionTable {
            band_names: self.band_names.clone(),
            rows,
            warnings: self.warnings.clone(),
        }
    }
}
