//! Seekable reader trait
//!
//! Decoders take `&mut dyn SeekableReader` so the same code reads from a
//! buffered file or from an in-memory cursor in tests.

use std::io::{Read, Seek};

/// Trait for readers that can both read and seek
pub trait SeekableReader: Read + Seek + Send {}

impl<T: Read + Seek + Send> SeekableReader for T {}
