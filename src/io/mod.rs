//! Low-level I/O helpers for the TIFF decoder

pub mod seekable;
pub mod byte_order;
