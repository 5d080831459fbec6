//! gridkit: array-friendly rectilinear and uniform volumetric grids.
//!
//! Grids are built from plain coordinate arrays and hand plain arrays back:
//! coordinates per axis, node positions, spacing, origin and dimensions.
//!
//! # Quick Start
//!
//! ```
//! use gridkit::*;
//!
//! fn main() -> Result<()> {
//!     init();
//!
//!     // Duplicate and unsorted coordinates are cleaned up on the way in.
//!     let rect = RectilinearGrid::from_arrays(&[1.0, 0.0, 1.0], &[0.0, 1.0], &[0.0, 1.0])?;
//!     assert_eq!(rect.x(), &[0.0, 1.0]);
//!
//!     // A uniform grid is origin + spacing + dimensions.
//!     let image = UniformGrid::from_specs(UVec3::new(2, 2, 2), DVec3::ONE, DVec3::ZERO)?;
//!     let converted = image.cast_to_rectilinear_grid()?;
//!     assert_eq!(converted.points(), rect.points());
//!     Ok(())
//! }
//! ```
//!
//! # Grids
//!
//! - [`RectilinearGrid`] - independent sorted coordinates per axis
//! - [`UniformGrid`] - constant spacing per axis (image data)
//! - [`StructuredGrid`] - a regular lattice with explicit points
//!
//! All of them implement [`DataSet`] (points, bounds, point/cell/field data)
//! and [`Grid`] (dimensions).

use std::path::Path;

// Re-export core types
pub use gridkit_core::{
    attributes::{ActiveScalars, Association, AttributeArrays, DataArray},
    dataset::{DataSet, Grid},
    error::{GridError, Result},
    format::{FileFormat, FormatRegistry},
    options::Options,
    state::{reset_options, with_options, with_options_mut},
    DVec3, UVec3,
};

// Re-export grids
pub use gridkit_grids::{coords, GridFile, RectilinearGrid, StructuredGrid, UniformGrid};

/// Installs the `env_logger` backend for the `log` records gridkit emits.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init() {
    if env_logger::try_init().is_ok() {
        log::info!("gridkit initialized");
    }
}

/// Reads a grid file of any kind.
///
/// # Errors
///
/// Returns an error if the extension is not a supported format, the file
/// cannot be read, or its contents are not a valid grid.
pub fn read(path: impl AsRef<Path>) -> Result<GridFile> {
    let path = path.as_ref();
    gridkit_grids::io::native_formats().lookup(path)?;
    gridkit_grids::read_grid(path)
}

/// Sets the global options.
pub fn set_options(options: Options) {
    with_options_mut(|opts| *opts = options);
}

/// Returns a copy of the global options.
#[must_use]
pub fn options() -> Options {
    with_options(Clone::clone)
}
