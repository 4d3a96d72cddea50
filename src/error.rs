//! Error types for relief.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`ReliefError`].
pub type Result<T> = std::result::Result<T, ReliefError>;

/// Errors that can occur while building or exporting a relief mesh.
#[derive(Error, Debug)]
pub enum ReliefError {
    /// The height field cannot be meshed.
    #[error("invalid heightmap: {0}")]
    InvalidHeightmap(String),

    /// A height value is NaN, infinite, or outside `[0, 1]`.
    #[error("invalid heightmap: value {value} at ({x}, {y}) is not a finite elevation in [0, 1]")]
    InvalidElevation {
        /// Column of the offending cell.
        x: usize,
        /// Row of the offending cell.
        y: usize,
        /// The offending value.
        value: f64,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },

    /// Assembly produced a different mesh than the batch contracts promise.
    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading an image or mesh from file.
    #[error("failed to load {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving an image or mesh to file.
    #[error("failed to save {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}

impl ReliefError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        ReliefError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Whether this error describes a rejected height field.
    pub fn is_invalid_heightmap(&self) -> bool {
        matches!(
            self,
            ReliefError::InvalidHeightmap(_) | ReliefError::InvalidElevation { .. }
        )
    }
}
