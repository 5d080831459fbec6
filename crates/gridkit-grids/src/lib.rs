//! Grid implementations for gridkit.
//!
//! This crate provides concrete implementations of regular grids:
//! - [`RectilinearGrid`], independent sorted coordinates per axis
//! - [`UniformGrid`], origin + spacing + dimensions
//! - [`StructuredGrid`], a regular lattice with explicit points
//!
//! and the conversions between them.

// Coordinate code intentionally converts between index and float types
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod coords;
pub mod io;
pub mod rectilinear;
pub mod structured;
pub mod uniform;

pub use io::{read_grid, GridFile};
pub use rectilinear::RectilinearGrid;
pub use structured::StructuredGrid;
pub use uniform::UniformGrid;
