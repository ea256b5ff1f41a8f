//! Tests for extraction options

extern crate std;

use crate::extractor::{ExtractOptions, OutputMode, DEFAULT_BLOCK_ROWS};

#[test]
fn defaults() {
    let options = ExtractOptions::default();
    std::assert_eq!(options.mode, OutputMode::Table);
    std::assert!(!options.strict);
    std::assert_eq!(options.block_rows, DEFAULT_BLOCK_ROWS);
    std::assert_eq!(ExtractOptions::default().with_block_rows(0).block_rows, 1);
}

#[test]
fn mode_parsing() {
    std::assert_eq!("Arrays".parse::<OutputMode>(), Ok(OutputMode::Arrays));
    std::assert_eq!("table".parse::<OutputMode>(), Ok(OutputMode::Table));
    std::assert!("raster".parse::<OutputMode>().is_err());
    std::assert_eq!(OutputMode::Arrays.to_string(), "arrays");
}
