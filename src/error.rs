//! Error types for pointmorph.
//!
//! This module provides error types for image decoding, storage access,
//! and engine operations that can fail. No error here is fatal to a running
//! session: per-image failures are caught at the image boundary and the
//! animation tick itself is infallible.

use std::fmt;

/// Errors that can occur while decoding a source image.
#[derive(Debug)]
pub enum DecodeError {
    /// The byte stream could not be decoded as a supported raster format.
    Image(image::ImageError),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Image(e) => write!(f, "Failed to decode image: {}", e),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Image(e) => Some(e),
        }
    }
}

impl From<image::ImageError> for DecodeError {
    fn from(e: image::ImageError) -> Self {
        DecodeError::Image(e)
    }
}

/// Errors reported by an image or settings store.
///
/// Storage failures are non-fatal: callers log them and proceed in memory
/// without persistence.
#[derive(Debug)]
pub struct StorageError {
    /// Human-readable description of the failure.
    pub message: String,
}

impl StorageError {
    /// Create a storage error from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Storage failure: {}", self.message)
    }
}

impl std::error::Error for StorageError {}

/// Errors that can occur when driving the morph engine.
#[derive(Debug)]
pub enum EngineError {
    /// Playback was requested with fewer than two images loaded.
    InsufficientImages,
    /// An image index was outside the current collection.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of images currently loaded.
        len: usize,
    },
    /// A source image failed to decode.
    Decode(DecodeError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InsufficientImages => {
                write!(f, "Need at least 2 images to morph")
            }
            EngineError::IndexOutOfRange { index, len } => {
                write!(f, "Image index {} out of range (have {})", index, len)
            }
            EngineError::Decode(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecodeError> for EngineError {
    fn from(e: DecodeError) -> Self {
        EngineError::Decode(e)
    }
}

impl From<image::ImageError> for EngineError {
    fn from(e: image::ImageError) -> Self {
        EngineError::Decode(DecodeError::Image(e))
    }
}
