//! Core abstractions for gridkit.
//!
//! This crate provides the fundamental traits and types used throughout gridkit:
//! - [`DataSet`] and [`Grid`] traits for geometric datasets
//! - [`DataArray`] and [`AttributeArrays`] for point, cell and field data
//! - The file format registry
//! - Global options and the state that holds them

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Lattice indices are u32; counts are usize
#![allow(clippy::cast_possible_truncation)]

pub mod attributes;
pub mod dataset;
pub mod error;
pub mod format;
pub mod options;
pub mod state;

pub use attributes::{ActiveScalars, Association, AttributeArrays, DataArray};
pub use dataset::{
    base_attributes, check_dimensions, checked_n_points, grid_attributes,
    n_cells_for_dimensions, n_points_for_dimensions, write_summary, DataSet, Grid,
};
pub use error::{GridError, Result};
pub use format::{FileFormat, FormatRegistry};
pub use options::Options;
pub use state::{format_float, reset_options, with_options, with_options_mut};

// Re-export glam types for convenience
pub use glam::{DVec3, UVec3};
