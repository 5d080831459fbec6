//! Error types for gridkit.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for gridkit operations.
#[derive(Error, Debug)]
pub enum GridError {
    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Requested dimensions disagree with what the grid stores.
    #[error("dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch { expected: [u32; 3], actual: [u32; 3] },

    /// The lattice holds more nodes than can be addressed.
    #[error("dimensions {dims:?} exceed the addressable point count")]
    DimensionsTooLarge { dims: [usize; 3] },

    /// A coordinate was NaN or infinite.
    #[error("non-finite coordinate {value} on axis {axis}")]
    NonFiniteCoordinate { axis: usize, value: f64 },

    /// Points do not sit on an evenly spaced lattice along an axis.
    #[error("coordinates along axis {axis} are not uniformly spaced")]
    NonUniformSpacing { axis: usize },

    /// A spacing value was NaN or infinite.
    #[error("invalid spacing {value} on axis {axis}")]
    InvalidSpacing { axis: usize, value: f64 },

    /// No reader or writer is registered for the extension.
    #[error("unsupported file format '{0}'")]
    UnsupportedFormat(String),

    /// A format with the given extension is already registered.
    #[error("format '{0}' already registered")]
    FormatExists(String),

    /// The path has no extension to dispatch on.
    #[error("cannot determine file format of '{}': no extension", .0.display())]
    MissingExtension(PathBuf),

    /// A file holds a different kind of grid than the one requested.
    #[error("expected a {expected} but the file contains a {found}")]
    WrongGridKind {
        expected: &'static str,
        found: &'static str,
    },

    /// Flat values cannot be split into tuples of the given width.
    #[error("array '{name}' has {len} values, not a multiple of {n_components} components")]
    RaggedArray {
        name: String,
        n_components: usize,
        len: usize,
    },

    /// An attribute array with the given name was not found.
    #[error("array '{0}' not found")]
    ArrayNotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for gridkit operations.
pub type Result<T> = std::result::Result<T, GridError>;
