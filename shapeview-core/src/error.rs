//! Error types for shapeview

use thiserror::Error;

/// Main error type for shapeview operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for shapeview operations
pub type Result<T> = std::result::Result<T, Error>;
