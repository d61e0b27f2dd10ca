//! Error types shared across the conversion pipeline.
//!
//! Validation and transport failures abort a run. Plane size mismatches are
//! not errors: they are corrected in place and reported as
//! [`crate::memory_image::SizeCorrection`] values.

use std::io;
use thiserror::Error;

/// Library result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Image grid does not match the dimensions the pipeline was configured for
    #[error("image is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    InvalidDimensions {
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },
    /// Raw pixel buffer length does not match width x height x channels
    #[error("pixel data has {actual} bytes, expected {expected}")]
    DataLength { expected: usize, actual: usize },
    #[error("unsupported palette: {0}")]
    UnsupportedPalette(String),
    /// A palette index does not fit the declared bit width of a packed field
    #[error("index {value} at position {position} does not fit in {bits} bits")]
    IndexOutOfRange { position: usize, value: u8, bits: u8 },
    /// Display memory address does not fit the 16-bit controller address
    #[error("address {0} exceeds the 16-bit controller address space")]
    AddressOutOfRange(usize),
    #[error("font table has {actual} bytes, expected {expected}")]
    FontSize { expected: usize, actual: usize },
    #[error("invalid hex line {line}: {text:?}")]
    Parse { line: usize, text: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Failures of the serial link. None of these are retried.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to configure {path}: {source}")]
    Configure {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("write failed after {sent} of {total} bytes: {source}")]
    Write {
        sent: usize,
        total: usize,
        #[source]
        source: io::Error,
    },
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
    #[error("unsupported baud rate {0}")]
    UnsupportedBaudRate(u32),
}
