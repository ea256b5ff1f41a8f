//! TIFF horizontal differencing predictor (Predictor = 2)
//!
//! With the predictor each sample is stored as the difference to the same
//! component of the previous pixel in the row. Differences wrap at the
//! sample width, so the arithmetic here is done on unsigned integers of
//! that width regardless of the sample format.

use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::constants::predictor;
use crate::tiff::errors::{TiffError, TiffResult};

/// Reverts a predictor in place on a decompressed chunk
///
/// # Arguments
/// * `data` - Decompressed chunk, rows of `row_samples` samples
/// * `predictor_code` - Value of the Predictor tag
/// * `row_samples` - Samples per chunk row (pixels times interleaved components)
/// * `stride` - Samples per pixel within the row (1 for planar data)
/// * `bytes_per_sample` - Width of one sample
/// * `handler` - Byte order of the file
pub fn undo_predictor(
    data: &mut [u8],
    predictor_code: u64,
    row_samples: usize,
    stride: usize,
    bytes_per_sample: usize,
    handler: &dyn ByteOrderHandler,
) -> TiffResult<()> {
    match predictor_code {
        predictor::NONE => Ok(()),
        predictor::HORIZONTAL_DIFFERENCING => {
            for_each_row(data, row_samples * bytes_per_sample, |row| {
                accumulate(row, stride, bytes_per_sample, handler)
            })
        }
        other => Err(TiffError::UnsupportedPredictor(other)),
    }
}

/// Applies horizontal differencing in place before compression
pub fn apply_horizontal_differencing(
    data: &mut [u8],
    row_samples: usize,
    stride: usize,
    bytes_per_sample: usize,
    handler: &dyn ByteOrderHandler,
) -> TiffResult<()> {
    for_each_row(data, row_samples * bytes_per_sample, |row| {
        difference(row, stride, bytes_per_sample, handler)
    })
}

fn for_each_row<F>(data: &mut [u8], row_bytes: usize, mut f: F) -> TiffResult<()>
where
    F: FnMut(&mut [u8]) -> TiffResult<()>,
{
    if row_bytes == 0 {
        return Ok(());
    }
    // A short last row happens with truncated strips; it is still differenced.
    for row in data.chunks_mut(row_bytes) {
        f(row)?;
    }
    Ok(())
}

fn accumulate(row: &mut [u8], stride: usize, width: usize, handler: &dyn ByteOrderHandler) -> TiffResult<()> {
    let samples = row.len() / width;
    for i in stride..samples {
        let prev = read_sample(row, i - stride, width, handler)?;
        let cur = read_sample(row, i, width, handler)?;
        write_sample(row, i, width, cur.wrapping_add(prev), handler)?;
    }
    Ok(())
}

fn difference(row: &mut [u8], stride: usize, width: usize, handler: &dyn ByteOrderHandler) -> TiffResult<()> {
    let samples = row.len() / width;
    // Walk backwards so every sample is differenced against its original neighbour.
    for i in (stride..samples).rev() {
        let prev = read_sample(row, i - stride, width, handler)?;
        let cur = read_sample(row, i, width, handler)?;
        write_sample(row, i, width, cur.wrapping_sub(prev), handler)?;
    }
    Ok(())
}

fn read_sample(row: &[u8], index: usize, width: usize, handler: &dyn ByteOrderHandler) -> TiffResult<u64> {
    let bytes = &row[index * width..(index + 1) * width];
    match width {
        1 => Ok(bytes[0] as u64),
        2 => Ok(handler.u16_from(bytes) as u64),
        4 => Ok(handler.u32_from(bytes) as u64),
        8 => Ok(handler.u64_from(bytes)),
        _ => Err(TiffError::GenericError(format!("Predictor not supported for {}-byte samples", width))),
    }
}

fn write_sample(row: &mut [u8], index: usize, width: usize, value: u64, handler: &dyn ByteOrderHandler) -> TiffResult<()> {
    let bytes = &mut row[index * width..(index + 1) * width];
    match width {
        1 => bytes[0] = value as u8,
        2 => handler.write_u16_to(bytes, value as u16),
        4 => handler.write_u32_to(bytes, value as u32),
        8 => handler.write_u64_to(bytes, value),
        _ => return Err(TiffError::GenericError(format!("Predictor not supported for {}-byte samples", width))),
    }
    Ok(())
}
